//! lifedoc-core - Core library for lifedoc
//!
//! Diary models, the Firebase-style backends (auth, document store, blob
//! store) with in-memory counterparts, and the repository and presenter
//! workflows used by the CLI.

pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod paths;
pub mod presenter;
pub mod repository;
pub mod session;
pub mod storage;
pub mod store;
pub mod util;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use models::{DiaryDate, DiaryDraft, DiaryEntry, DiaryId, DraftImage, UserProfile};
pub use session::Session;
