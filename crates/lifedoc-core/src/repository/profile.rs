//! The `userInfo/{uid}` profile document and profile picture.

use crate::models::UserProfile;
use crate::paths;
use crate::session::Session;
use crate::storage::{encode_jpeg, BlobStore, JpegOptions, JPEG_CONTENT_TYPE};
use crate::store::DocumentStore;
use crate::{Error, Result};

pub struct ProfileRepository<D, B> {
    store: D,
    blobs: B,
    session: Session,
    jpeg: JpegOptions,
}

impl<D: DocumentStore, B: BlobStore> ProfileRepository<D, B> {
    pub fn new(store: D, blobs: B, session: Session) -> Self {
        Self {
            store,
            blobs,
            session,
            jpeg: JpegOptions::default(),
        }
    }

    /// Upload the profile picture, then write the profile document.
    pub async fn create(&self, name: &str, picture: &[u8]) -> Result<UserProfile> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Name cannot be empty".to_string()));
        }

        let user_id = self.session.user_id();
        let jpeg = encode_jpeg(picture, self.jpeg)?;
        let picture_path = paths::profile_picture(user_id);
        self.blobs.put(&picture_path, jpeg, JPEG_CONTENT_TYPE).await?;
        let url = self.blobs.download_url(&picture_path).await?;

        let profile = UserProfile {
            name: Some(name.to_string()),
            profile_image_url: Some(url),
        };
        let document_path = paths::user_info_document(user_id);
        if let Err(error) = self
            .store
            .set_document(&document_path, profile.to_fields())
            .await
        {
            tracing::warn!("Profile picture {} has no profile document", picture_path);
            return Err(error);
        }

        tracing::info!("Created profile for {}", user_id);
        Ok(profile)
    }

    pub async fn fetch(&self) -> Result<UserProfile> {
        let path = paths::user_info_document(self.session.user_id());
        let document = self
            .store
            .get_document(&path)
            .await?
            .ok_or(Error::DocumentNotFound(path))?;
        Ok(UserProfile::from(&document))
    }
}
