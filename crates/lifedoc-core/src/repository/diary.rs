//! Diary entries under `userDiaries/{uid}/diaries`, plus their photos.

use uuid::Uuid;

use crate::models::{
    recorded_image_id, DiaryDate, DiaryDraft, DiaryEntry, DiaryId, DraftImage, UploadedImage,
};
use crate::paths;
use crate::session::Session;
use crate::storage::{encode_jpeg, BlobStore, JpegOptions, JPEG_CONTENT_TYPE};
use crate::store::DocumentStore;
use crate::{Error, Result};

/// Reads and writes one user's diary.
///
/// Entries are never updated in place: an edit inserts a new document and
/// then removes the old one.
pub struct DiaryRepository<D, B> {
    store: D,
    blobs: B,
    session: Session,
    jpeg: JpegOptions,
}

impl<D: DocumentStore, B: BlobStore> DiaryRepository<D, B> {
    pub fn new(store: D, blobs: B, session: Session) -> Self {
        Self {
            store,
            blobs,
            session,
            jpeg: JpegOptions::default(),
        }
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    fn user_id(&self) -> &str {
        self.session.user_id()
    }

    /// Every readable entry, in store order.
    ///
    /// Documents without a valid `diaryDate` are skipped.
    pub async fn fetch_all(&self) -> Result<Vec<DiaryEntry>> {
        let collection = paths::diaries_collection(self.user_id());
        let documents = self.store.list_documents(&collection).await?;

        let mut entries = Vec::with_capacity(documents.len());
        for document in documents {
            let id = document.id.clone();
            match DiaryEntry::try_from(document) {
                Ok(entry) => entries.push(entry),
                Err(error) => {
                    tracing::warn!("Skipping diary document {}: {}", id, error);
                }
            }
        }
        tracing::debug!("Fetched {} diary entries", entries.len());
        Ok(entries)
    }

    /// Re-encode `source` as JPEG, store it, and resolve its download URL.
    pub async fn upload_image(&self, source: &[u8]) -> Result<UploadedImage> {
        let jpeg = encode_jpeg(source, self.jpeg)?;
        let image_id = format!("{}.jpg", Uuid::now_v7());
        let path = paths::diary_image(self.user_id(), &image_id);

        self.blobs.put(&path, jpeg, JPEG_CONTENT_TYPE).await?;
        let url = match self.blobs.download_url(&path).await {
            Ok(url) => url,
            Err(error) => {
                tracing::warn!("Orphaned diary image {}: {}", path, error);
                return Err(error);
            }
        };

        Ok(UploadedImage { url, image_id })
    }

    /// Write `entry` as a new document and return the assigned id.
    pub async fn insert(&self, entry: &DiaryEntry) -> Result<DiaryId> {
        entry.ensure_complete()?;
        let collection = paths::diaries_collection(self.user_id());
        let id = self
            .store
            .add_document(&collection, entry.to_fields())
            .await?;
        tracing::debug!("Inserted diary entry {}", id);
        Ok(DiaryId::new(id))
    }

    /// Remove a stored entry and its photo.
    ///
    /// Both deletes are attempted; when both fail the document error is returned.
    pub async fn delete(&self, id: &DiaryId) -> Result<()> {
        let path = paths::diary_document(self.user_id(), id.as_str());
        let document = self
            .store
            .get_document(&path)
            .await?
            .ok_or_else(|| Error::DocumentNotFound(path.clone()))?;
        let image_id = recorded_image_id(&document).map(ToOwned::to_owned);

        let document_result = self.store.delete_document(&path).await;
        let blob_result = match image_id {
            Some(image_id) => {
                self.blobs
                    .delete(&paths::diary_image(self.user_id(), &image_id))
                    .await
            }
            None => Ok(()),
        };

        document_result?;
        blob_result?;
        tracing::info!("Deleted diary entry {}", id);
        Ok(())
    }

    /// Persist a new entry from a draft.
    pub async fn save(&self, draft: DiaryDraft) -> Result<DiaryEntry> {
        draft.validate(None, DiaryDate::today())?;

        let uploaded = match &draft.image {
            DraftImage::Replace(source) => Some(self.upload_image(source).await?),
            DraftImage::Keep | DraftImage::Remove => None,
        };
        let entry = build_entry(&draft, uploaded.as_ref(), None);
        let id = self.insert_or_discard(&entry, uploaded.as_ref()).await?;

        tracing::info!("Saved diary entry {} for {}", id, entry.date);
        Ok(DiaryEntry {
            id: Some(id),
            ..entry
        })
    }

    /// Replace a stored entry with an edited version.
    ///
    /// The new document is inserted before the old one is deleted. If the old
    /// document cannot be removed, [`Error::ReplaceIncomplete`] names both ids.
    pub async fn replace(&self, existing: &DiaryEntry, draft: DiaryDraft) -> Result<DiaryEntry> {
        let stale = existing
            .id
            .clone()
            .ok_or_else(|| Error::InvalidInput("Cannot replace an unsaved entry".to_string()))?;
        draft.validate(Some(existing), DiaryDate::today())?;

        let uploaded = match &draft.image {
            DraftImage::Replace(source) => Some(self.upload_image(source).await?),
            DraftImage::Keep | DraftImage::Remove => None,
        };
        let entry = build_entry(&draft, uploaded.as_ref(), Some(existing));
        let inserted = self.insert_or_discard(&entry, uploaded.as_ref()).await?;

        let stale_path = paths::diary_document(self.user_id(), stale.as_str());
        if let Err(error) = self.store.delete_document(&stale_path).await {
            tracing::warn!(
                "Replacement {} saved but {} was not removed: {}",
                inserted,
                stale,
                error
            );
            return Err(Error::ReplaceIncomplete {
                inserted: inserted.to_string(),
                stale: stale.to_string(),
                reason: error.to_string(),
            });
        }

        if let Some(old_image_id) = existing.image_id.as_deref() {
            if entry.image_id.as_deref() != Some(old_image_id) {
                let old_path = paths::diary_image(self.user_id(), old_image_id);
                if let Err(error) = self.blobs.delete(&old_path).await {
                    tracing::warn!("Orphaned diary image {}: {}", old_path, error);
                }
            }
        }

        tracing::info!("Replaced diary entry {} with {}", stale, inserted);
        Ok(DiaryEntry {
            id: Some(inserted),
            ..entry
        })
    }

    /// Insert, removing a freshly uploaded photo again when the insert fails.
    async fn insert_or_discard(
        &self,
        entry: &DiaryEntry,
        uploaded: Option<&UploadedImage>,
    ) -> Result<DiaryId> {
        match self.insert(entry).await {
            Ok(id) => Ok(id),
            Err(error) => {
                if let Some(image) = uploaded {
                    let path = paths::diary_image(self.user_id(), &image.image_id);
                    if let Err(cleanup) = self.blobs.delete(&path).await {
                        tracing::warn!("Orphaned diary image {}: {}", path, cleanup);
                    }
                }
                Err(error)
            }
        }
    }
}

fn build_entry(
    draft: &DiaryDraft,
    uploaded: Option<&UploadedImage>,
    existing: Option<&DiaryEntry>,
) -> DiaryEntry {
    let (image_url, image_id) = match (&draft.image, uploaded, existing) {
        (DraftImage::Replace(_), Some(image), _) => {
            (Some(image.url.clone()), Some(image.image_id.clone()))
        }
        (DraftImage::Keep, _, Some(existing)) => {
            (existing.image_url.clone(), existing.image_id.clone())
        }
        _ => (None, None),
    };

    DiaryEntry {
        date: draft.date,
        text: draft.normalized_text(),
        image_url,
        image_id,
        id: None,
    }
}
