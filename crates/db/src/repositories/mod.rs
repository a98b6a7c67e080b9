//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod dashboard_repo;
pub mod image_repo;
pub mod memorial_repo;
pub mod password_reset_repo;
pub mod recent_search_repo;
pub mod session_repo;
pub mod tribute_repo;
pub mod user_repo;

pub use dashboard_repo::DashboardRepo;
pub use image_repo::ImageRepo;
pub use memorial_repo::MemorialRepo;
pub use password_reset_repo::PasswordResetRepo;
pub use recent_search_repo::RecentSearchRepo;
pub use session_repo::SessionRepo;
pub use tribute_repo::TributeRepo;
pub use user_repo::UserRepo;
