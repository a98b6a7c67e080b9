//! Domain logic for the Memoria memorial-tribute service.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer, the API server, and any future CLI tooling alike.
//! It owns the memorial form model and its validation rules, the local
//! draft store with its autosave loop, search filter plumbing, and the
//! shared error taxonomy.

pub mod draft;
pub mod error;
pub mod form;
pub mod memorial;
pub mod search;
pub mod types;
