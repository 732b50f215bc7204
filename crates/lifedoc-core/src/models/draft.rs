//! In-progress edits, before anything touches the backend.

use crate::util::non_blank;
use crate::{Error, Result};

use super::{DiaryDate, DiaryEntry};

/// What to do with the photo of an entry being saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DraftImage {
    /// Reuse the existing entry's photo, if any. Means "no photo" for new entries.
    #[default]
    Keep,
    /// Upload these source bytes (any decodable format) as the new photo.
    Replace(Vec<u8>),
    /// Drop the photo.
    Remove,
}

/// A diary entry as edited by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryDraft {
    pub date: DiaryDate,
    pub text: Option<String>,
    pub image: DraftImage,
}

impl DiaryDraft {
    #[must_use]
    pub const fn new(date: DiaryDate) -> Self {
        Self {
            date,
            text: None,
            image: DraftImage::Keep,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: DraftImage) -> Self {
        self.image = image;
        self
    }

    /// Text with blank input treated as absent.
    #[must_use]
    pub fn normalized_text(&self) -> Option<String> {
        non_blank(self.text.as_deref()).map(ToOwned::to_owned)
    }

    /// Checks date and content against the entry being replaced, if any.
    ///
    /// Runs before any backend call.
    pub fn validate(&self, existing: Option<&DiaryEntry>, today: DiaryDate) -> Result<()> {
        if self.date > today {
            return Err(Error::InvalidInput(format!(
                "Diary date {} is in the future",
                self.date
            )));
        }

        let has_image = match &self.image {
            DraftImage::Replace(bytes) => !bytes.is_empty(),
            DraftImage::Keep => existing.is_some_and(DiaryEntry::has_image),
            DraftImage::Remove => false,
        };
        if self.normalized_text().is_none() && !has_image {
            return Err(Error::IncompleteEntry);
        }
        Ok(())
    }
}

/// A stored photo: its download URL and blob key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub image_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> DiaryDate {
        value.parse().unwrap()
    }

    #[test]
    fn validate_rejects_future_dates() {
        let draft = DiaryDraft::new(date("2024-06-02")).with_text("tomorrow");
        let result = draft.validate(None, date("2024-06-01"));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn validate_requires_text_or_image() {
        let today = date("2024-06-01");
        assert!(matches!(
            DiaryDraft::new(today).with_text("  \n").validate(None, today),
            Err(Error::IncompleteEntry)
        ));
        assert!(DiaryDraft::new(today)
            .with_image(DraftImage::Replace(vec![1, 2, 3]))
            .validate(None, today)
            .is_ok());
    }

    #[test]
    fn keep_counts_only_when_existing_has_image() {
        let today = date("2024-06-01");
        let with_photo = DiaryEntry::new(today).with_image("https://img", "a.jpg");
        let without_photo = DiaryEntry::new(today).with_text("words");

        let keep = DiaryDraft::new(today);
        assert!(keep.validate(Some(&with_photo), today).is_ok());
        assert!(keep.validate(Some(&without_photo), today).is_err());
        assert!(keep.validate(None, today).is_err());

        let remove = DiaryDraft::new(today).with_image(DraftImage::Remove);
        assert!(matches!(
            remove.validate(Some(&with_photo), today),
            Err(Error::IncompleteEntry)
        ));
    }
}
