//! Repositories over the document and blob stores

mod diary;
mod profile;

pub use diary::DiaryRepository;
pub use profile::ProfileRepository;
