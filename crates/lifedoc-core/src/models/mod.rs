//! Data models for lifedoc

mod diary;
mod draft;
mod profile;

pub(crate) use diary::recorded_image_id;
pub use diary::{sort_by_date_desc, DiaryDate, DiaryEntry, DiaryId};
pub use draft::{DiaryDraft, DraftImage, UploadedImage};
pub use profile::UserProfile;
