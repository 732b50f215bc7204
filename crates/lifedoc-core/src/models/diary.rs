//! Diary entry model

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::store::{Document, Fields};
use crate::util::{first_line_preview, non_blank};
use crate::{Error, Result};

pub(crate) const FIELD_DATE: &str = "diaryDate";
pub(crate) const FIELD_TEXT: &str = "diaryText";
pub(crate) const FIELD_IMAGE_URL: &str = "diaryImageURLString";
pub(crate) const FIELD_IMAGE_ID: &str = "diaryImageID";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifier assigned by the document store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiaryId(String);

impl DiaryId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar day of an entry, always rendered as zero-padded `YYYY-MM-DD`.
///
/// Ordering matches the lexicographic order of the rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiaryDate(NaiveDate);

impl DiaryDate {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in the local timezone.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    #[must_use]
    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Two-line label used by list rows: the year, then `MM-DD`.
    #[must_use]
    pub fn stacked_label(&self) -> String {
        format!("{}\n{:02}-{:02}", self.0.year(), self.0.month(), self.0.day())
    }
}

impl fmt::Display for DiaryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for DiaryDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map_err(|error| Error::InvalidInput(format!("Invalid date '{trimmed}': {error}")))?;
        let parsed = Self(date);
        // Reject unpadded forms like 2024-3-1 so stored strings sort correctly.
        if parsed.to_string() != trimmed {
            return Err(Error::InvalidInput(format!(
                "Invalid date '{trimmed}': expected YYYY-MM-DD"
            )));
        }
        Ok(parsed)
    }
}

impl TryFrom<String> for DiaryDate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DiaryDate> for String {
    fn from(value: DiaryDate) -> Self {
        value.to_string()
    }
}

/// A dated diary record with optional text and an optional photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub date: DiaryDate,
    pub text: Option<String>,
    /// Download URL of the uploaded photo
    pub image_url: Option<String>,
    /// Blob key of the uploaded photo, needed to delete it
    pub image_id: Option<String>,
    /// Present once persisted
    pub id: Option<DiaryId>,
}

impl DiaryEntry {
    /// An unsaved entry with no content yet.
    #[must_use]
    pub const fn new(date: DiaryDate) -> Self {
        Self {
            date,
            text: None,
            image_url: None,
            image_id: None,
            id: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>, image_id: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self.image_id = Some(image_id.into());
        self
    }

    #[must_use]
    pub fn has_text(&self) -> bool {
        non_blank(self.text.as_deref()).is_some()
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        non_blank(self.image_url.as_deref()).is_some()
    }

    /// True when the entry may be persisted: it has text, a photo, or both.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.has_text() || self.has_image()
    }

    pub fn ensure_complete(&self) -> Result<()> {
        if self.has_content() {
            Ok(())
        } else {
            Err(Error::IncompleteEntry)
        }
    }

    /// First non-blank line of text, truncated to `max_chars`.
    #[must_use]
    pub fn text_preview(&self, max_chars: usize) -> String {
        self.text
            .as_deref()
            .map(|text| first_line_preview(text, max_chars))
            .unwrap_or_default()
    }

    /// Document fields for this entry. Absent and blank values are not written.
    #[must_use]
    pub fn to_fields(&self) -> Fields {
        Fields::builder()
            .set(FIELD_DATE, self.date.to_string())
            .set_opt(FIELD_TEXT, self.text.as_deref())
            .set_opt(FIELD_IMAGE_URL, self.image_url.as_deref())
            .set_opt(FIELD_IMAGE_ID, self.image_id.as_deref())
            .build()
    }
}

impl TryFrom<Document> for DiaryEntry {
    type Error = Error;

    /// Fails when `diaryDate` is missing or not a `YYYY-MM-DD` date.
    fn try_from(document: Document) -> Result<Self> {
        let Some(raw_date) = document.fields.get(FIELD_DATE) else {
            return Err(Error::InvalidInput(format!(
                "diary document {} has no {FIELD_DATE}",
                document.id
            )));
        };
        let date = raw_date.parse::<DiaryDate>()?;
        let owned = |key: &str| document.fields.get(key).map(ToOwned::to_owned);

        Ok(Self {
            date,
            text: owned(FIELD_TEXT),
            image_url: owned(FIELD_IMAGE_URL),
            image_id: owned(FIELD_IMAGE_ID),
            id: Some(DiaryId::new(document.id.clone())),
        })
    }
}

/// Blob key recorded on a stored diary document, read without parsing the rest.
pub(crate) fn recorded_image_id(document: &Document) -> Option<&str> {
    non_blank(document.fields.get(FIELD_IMAGE_ID))
}

/// Newest date first. Entries sharing a date keep their relative order.
pub fn sort_by_date_desc(entries: &mut [DiaryEntry]) {
    entries.sort_by_key(|entry| Reverse(entry.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(value: &str) -> DiaryDate {
        value.parse().unwrap()
    }

    #[test]
    fn diary_date_parses_and_renders_padded() {
        assert_eq!(date("2024-03-01").to_string(), "2024-03-01");
        assert_eq!(date(" 2023-12-31 ").to_string(), "2023-12-31");
    }

    #[test]
    fn diary_date_rejects_unpadded_and_invalid() {
        assert!("2024-3-1".parse::<DiaryDate>().is_err());
        assert!("2024-02-30".parse::<DiaryDate>().is_err());
        assert!("yesterday".parse::<DiaryDate>().is_err());
    }

    #[test]
    fn stacked_label_splits_year() {
        assert_eq!(date("2024-11-16").stacked_label(), "2024\n11-16");
    }

    #[test]
    fn sort_by_date_desc_orders_newest_first() {
        let mut entries = vec![
            DiaryEntry::new(date("2024-01-05")).with_text("a"),
            DiaryEntry::new(date("2024-03-01")).with_text("b"),
            DiaryEntry::new(date("2023-12-31")).with_text("c"),
        ];
        sort_by_date_desc(&mut entries);
        let order: Vec<String> = entries.iter().map(|entry| entry.date.to_string()).collect();
        assert_eq!(order, vec!["2024-03-01", "2024-01-05", "2023-12-31"]);
    }

    #[test]
    fn has_content_requires_text_or_image() {
        let day = date("2024-01-01");
        assert!(!DiaryEntry::new(day).has_content());
        assert!(!DiaryEntry::new(day).with_text("   ").has_content());
        assert!(DiaryEntry::new(day).with_text("walk").has_content());
        assert!(DiaryEntry::new(day)
            .with_image("https://img", "a.jpg")
            .has_content());
        assert!(matches!(
            DiaryEntry::new(day).ensure_complete(),
            Err(Error::IncompleteEntry)
        ));
    }

    #[test]
    fn to_fields_writes_only_present_values() {
        let fields = DiaryEntry::new(date("2024-01-05")).with_text("rain").to_fields();
        assert_eq!(fields.get(FIELD_DATE), Some("2024-01-05"));
        assert_eq!(fields.get(FIELD_TEXT), Some("rain"));
        assert!(!fields.contains_key(FIELD_IMAGE_URL));
        assert!(!fields.contains_key(FIELD_IMAGE_ID));
    }

    #[test]
    fn try_from_document_reads_fields_and_id() {
        let fields = DiaryEntry::new(date("2024-01-05"))
            .with_image("https://img/a", "a.jpg")
            .to_fields();
        let entry = DiaryEntry::try_from(Document::new("doc-1", fields)).unwrap();
        assert_eq!(entry.id, Some(DiaryId::new("doc-1")));
        assert_eq!(entry.image_id.as_deref(), Some("a.jpg"));
        assert_eq!(entry.text, None);
    }

    #[test]
    fn try_from_document_requires_valid_date() {
        let missing = Fields::builder().set(FIELD_TEXT, "no date").build();
        assert!(DiaryEntry::try_from(Document::new("x", missing)).is_err());

        let malformed = Fields::builder().set(FIELD_DATE, "05/01/2024").build();
        assert!(DiaryEntry::try_from(Document::new("y", malformed)).is_err());
    }

    #[test]
    fn text_preview_uses_first_line() {
        let entry = DiaryEntry::new(date("2024-01-05")).with_text("Beach day\nsunburn");
        assert_eq!(entry.text_preview(40), "Beach day");
        assert_eq!(DiaryEntry::new(date("2024-01-05")).text_preview(40), "");
    }
}
