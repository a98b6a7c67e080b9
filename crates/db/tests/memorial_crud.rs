//! Integration tests against a live PostgreSQL instance.
//!
//! These run only when `DATABASE_URL` is set; without it each test exits
//! early so the suite stays green on machines without a database.

use chrono::NaiveDate;

use memoria_core::memorial::RECENT_SEARCH_CAP;
use memoria_db::models::image::CreateMemorialImage;
use memoria_db::models::memorial::{CreateMemorial, UpdateMemorial};
use memoria_db::models::tribute::CreateTribute;
use memoria_db::models::user::CreateUserProfile;
use memoria_db::repositories::{
    ImageRepo, MemorialRepo, RecentSearchRepo, SessionRepo, TributeRepo, UserRepo,
};
use memoria_db::DbPool;

async fn test_pool() -> Option<DbPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = memoria_db::create_pool(&url)
        .await
        .expect("connect to test database");
    memoria_db::run_migrations(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

async fn make_user(pool: &DbPool) -> memoria_db::models::user::UserProfile {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    UserRepo::create(
        pool,
        &CreateUserProfile {
            email: format!("owner-{tag}@example.com"),
            password_hash: "$argon2id$test-hash".to_string(),
            full_name: "Test Owner".to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .expect("create user")
}

fn make_memorial_input(created_by: i64, full_name: &str, privacy: &str) -> CreateMemorial {
    CreateMemorial {
        created_by,
        full_name: full_name.to_string(),
        birth_date: NaiveDate::from_ymd_opt(1940, 3, 14).unwrap(),
        death_date: NaiveDate::from_ymd_opt(2020, 11, 2).unwrap(),
        birth_location: "Springfield, Illinois".to_string(),
        resting_place: "Oak Hill Cemetery".to_string(),
        relationship: "grandparent".to_string(),
        biography: "A long and generous life devoted to family, teaching, and the garden behind the old house."
            .to_string(),
        occupation: "Teacher".to_string(),
        hobbies: "Gardening, chess".to_string(),
        favorite_quote: String::new(),
        template: "classic".to_string(),
        privacy: privacy.to_string(),
    }
}

#[tokio::test]
async fn memorial_lifecycle() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = make_user(&pool).await;

    let created = MemorialRepo::create(&pool, &make_memorial_input(user.id, "Ada Example", "public"))
        .await
        .expect("create memorial");
    assert_eq!(created.full_name, "Ada Example");
    assert_eq!(created.view_count, 0);
    assert!(created.is_public());

    let found = MemorialRepo::find_by_id(&pool, created.id)
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(found.id, created.id);

    let updated = MemorialRepo::update(
        &pool,
        created.id,
        &UpdateMemorial {
            occupation: Some("Engineer".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("update")
    .expect("exists");
    assert_eq!(updated.occupation, "Engineer");
    // Untouched fields survive a partial update.
    assert_eq!(updated.full_name, "Ada Example");

    MemorialRepo::increment_view_count(&pool, created.id)
        .await
        .expect("bump views");
    let viewed = MemorialRepo::find_by_id(&pool, created.id)
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(viewed.view_count, 1);

    assert!(MemorialRepo::delete(&pool, created.id).await.expect("delete"));
    assert!(MemorialRepo::find_by_id(&pool, created.id)
        .await
        .expect("find")
        .is_none());
}

#[tokio::test]
async fn deleting_memorial_cascades_to_images_and_tributes() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = make_user(&pool).await;
    let memorial = MemorialRepo::create(&pool, &make_memorial_input(user.id, "Cascade Case", "public"))
        .await
        .expect("create memorial");

    let image = ImageRepo::create(
        &pool,
        &CreateMemorialImage {
            memorial_id: memorial.id,
            image_url: "/media/memorials/1/a.jpg".to_string(),
            caption: None,
            is_primary: true,
        },
    )
    .await
    .expect("create image");
    TributeRepo::create(
        &pool,
        memorial.id,
        &CreateTribute {
            author_name: "A Friend".to_string(),
            // Anonymous tributes carry neither email nor relationship.
            author_email: None,
            relationship: None,
            message: "Fondly remembered.".to_string(),
        },
        true,
    )
    .await
    .expect("create tribute");

    assert!(MemorialRepo::delete(&pool, memorial.id).await.expect("delete"));
    assert!(ImageRepo::find_by_id(&pool, image.id)
        .await
        .expect("find image")
        .is_none());
    assert!(TributeRepo::list_approved(&pool, memorial.id)
        .await
        .expect("list tributes")
        .is_empty());
}

#[tokio::test]
async fn owner_list_annotates_counts_and_main_image() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = make_user(&pool).await;
    let memorial = MemorialRepo::create(&pool, &make_memorial_input(user.id, "Annotated", "private"))
        .await
        .expect("create memorial");

    ImageRepo::create(
        &pool,
        &CreateMemorialImage {
            memorial_id: memorial.id,
            image_url: "/media/first.jpg".to_string(),
            caption: None,
            is_primary: false,
        },
    )
    .await
    .expect("first image");
    ImageRepo::create(
        &pool,
        &CreateMemorialImage {
            memorial_id: memorial.id,
            image_url: "/media/portrait.jpg".to_string(),
            caption: Some("Portrait".to_string()),
            is_primary: true,
        },
    )
    .await
    .expect("primary image");
    TributeRepo::create(
        &pool,
        memorial.id,
        &CreateTribute {
            author_name: "Visitor".to_string(),
            author_email: Some("v@example.com".to_string()),
            relationship: Some("neighbor".to_string()),
            message: "Missed by all.".to_string(),
        },
        false,
    )
    .await
    .expect("pending tribute");

    let owned = MemorialRepo::list_by_owner(&pool, user.id)
        .await
        .expect("list by owner");
    assert_eq!(owned.len(), 1);
    // Pending tributes still count on the owner's dashboard.
    assert_eq!(owned[0].tribute_count, 1);
    // The primary image wins over display order.
    assert_eq!(owned[0].main_image.as_deref(), Some("/media/portrait.jpg"));
}

#[tokio::test]
async fn owner_with_no_memorials_gets_empty_list() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = make_user(&pool).await;
    let owned = MemorialRepo::list_by_owner(&pool, user.id)
        .await
        .expect("list by owner");
    assert!(owned.is_empty());
}

#[tokio::test]
async fn search_matches_public_memorials_only() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = make_user(&pool).await;
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let public_name = format!("Searchable {tag}");
    let private_name = format!("Hidden {tag}");

    MemorialRepo::create(&pool, &make_memorial_input(user.id, &public_name, "public"))
        .await
        .expect("public memorial");
    MemorialRepo::create(&pool, &make_memorial_input(user.id, &private_name, "private"))
        .await
        .expect("private memorial");

    let hits = MemorialRepo::search(&pool, &tag, &Default::default())
        .await
        .expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].memorial.full_name, public_name);

    // Case-insensitive substring match.
    let hits = MemorialRepo::search(&pool, &tag.to_uppercase(), &Default::default())
        .await
        .expect("search");
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn set_primary_leaves_exactly_one_primary() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = make_user(&pool).await;
    let memorial = MemorialRepo::create(&pool, &make_memorial_input(user.id, "Primary Swap", "public"))
        .await
        .expect("create memorial");

    let first = ImageRepo::create(
        &pool,
        &CreateMemorialImage {
            memorial_id: memorial.id,
            image_url: "/media/a.jpg".to_string(),
            caption: None,
            is_primary: true,
        },
    )
    .await
    .expect("first");
    let second = ImageRepo::create(
        &pool,
        &CreateMemorialImage {
            memorial_id: memorial.id,
            image_url: "/media/b.jpg".to_string(),
            caption: None,
            is_primary: false,
        },
    )
    .await
    .expect("second");

    let promoted = ImageRepo::set_primary(&pool, memorial.id, second.id)
        .await
        .expect("set primary")
        .expect("image exists");
    assert!(promoted.is_primary);

    let images = ImageRepo::list_by_memorial(&pool, memorial.id)
        .await
        .expect("list");
    let primaries: Vec<_> = images.iter().filter(|i| i.is_primary).collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0].id, second.id);
    assert!(!images.iter().any(|i| i.id == first.id && i.is_primary));

    // Promoting a missing image changes nothing.
    let missing = ImageRepo::set_primary(&pool, memorial.id, second.id + 100_000)
        .await
        .expect("set primary");
    assert!(missing.is_none());
    assert!(ImageRepo::has_primary(&pool, memorial.id).await.expect("has primary"));
}

#[tokio::test]
async fn recent_searches_dedupe_and_cap() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = make_user(&pool).await;

    for query in ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"] {
        RecentSearchRepo::record(&pool, user.id, query)
            .await
            .expect("record");
    }
    let searches = RecentSearchRepo::list(&pool, user.id).await.expect("list");
    assert_eq!(searches.len() as i64, RECENT_SEARCH_CAP);
    assert_eq!(searches[0].query, "zeta");
    // Oldest entry rotated out.
    assert!(!searches.iter().any(|s| s.query == "alpha"));

    // Repeating moves to front without duplicating.
    RecentSearchRepo::record(&pool, user.id, "gamma")
        .await
        .expect("record repeat");
    let searches = RecentSearchRepo::list(&pool, user.id).await.expect("list");
    assert_eq!(searches.len() as i64, RECENT_SEARCH_CAP);
    assert_eq!(searches[0].query, "gamma");
    assert_eq!(
        searches.iter().filter(|s| s.query == "gamma").count(),
        1
    );

    RecentSearchRepo::clear(&pool, user.id).await.expect("clear");
    assert!(RecentSearchRepo::list(&pool, user.id)
        .await
        .expect("list")
        .is_empty());
}

#[tokio::test]
async fn revoked_sessions_are_not_found_as_active() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user = make_user(&pool).await;
    let token_hash = uuid::Uuid::new_v4().simple().to_string();

    let session = SessionRepo::create(
        &pool,
        &memoria_db::models::session::CreateSession {
            user_id: user.id,
            refresh_token_hash: token_hash.clone(),
            expires_at: chrono::Utc::now() + chrono::Duration::days(30),
        },
    )
    .await
    .expect("create session");

    assert!(SessionRepo::find_active_by_token_hash(&pool, &token_hash)
        .await
        .expect("find")
        .is_some());

    assert!(SessionRepo::revoke(&pool, session.id).await.expect("revoke"));
    assert!(SessionRepo::find_active_by_token_hash(&pool, &token_hash)
        .await
        .expect("find")
        .is_none());
    // Second revoke is a no-op.
    assert!(!SessionRepo::revoke(&pool, session.id).await.expect("revoke again"));
}
