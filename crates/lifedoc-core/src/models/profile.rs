//! Profile stored at `userInfo/{uid}`

use serde::{Deserialize, Serialize};

use crate::store::{Document, Fields};
use crate::util::non_blank;

pub(crate) const FIELD_NAME: &str = "userName";
pub(crate) const FIELD_IMAGE_URL: &str = "profileImageUrl";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub profile_image_url: Option<String>,
}

impl UserProfile {
    /// Heading for the diary list, e.g. `Ana's Diary`.
    #[must_use]
    pub fn diary_title(&self) -> String {
        non_blank(self.name.as_deref())
            .map_or_else(|| "Diary".to_string(), |name| format!("{name}'s Diary"))
    }

    #[must_use]
    pub fn to_fields(&self) -> Fields {
        Fields::builder()
            .set_opt(FIELD_NAME, self.name.as_deref())
            .set_opt(FIELD_IMAGE_URL, self.profile_image_url.as_deref())
            .build()
    }
}

impl From<&Document> for UserProfile {
    fn from(document: &Document) -> Self {
        Self {
            name: document.fields.get(FIELD_NAME).map(ToOwned::to_owned),
            profile_image_url: document.fields.get(FIELD_IMAGE_URL).map(ToOwned::to_owned),
        }
    }
}
