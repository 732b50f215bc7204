//! Sorted diary list backing the entry list screen.

use crate::models::{sort_by_date_desc, DiaryEntry};
use crate::repository::DiaryRepository;
use crate::storage::BlobStore;
use crate::store::DocumentStore;
use crate::{Error, Result};

/// Holds the last fetched entries, newest first.
pub struct DiaryListPresenter<D, B> {
    repository: DiaryRepository<D, B>,
    entries: Vec<DiaryEntry>,
}

impl<D: DocumentStore, B: BlobStore> DiaryListPresenter<D, B> {
    pub const fn new(repository: DiaryRepository<D, B>) -> Self {
        Self {
            repository,
            entries: Vec::new(),
        }
    }

    pub const fn repository(&self) -> &DiaryRepository<D, B> {
        &self.repository
    }

    /// Refetch and replace the list. On error the previous list is kept.
    pub async fn refresh(&mut self) -> Result<&[DiaryEntry]> {
        let mut entries = self.repository.fetch_all().await?;
        sort_by_date_desc(&mut entries);
        self.entries = entries;
        Ok(&self.entries)
    }

    pub fn entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&DiaryEntry> {
        self.entries.get(index)
    }

    /// Look up an entry by full id or unique id prefix.
    pub fn find(&self, id_or_prefix: &str) -> Result<&DiaryEntry> {
        let needle = id_or_prefix.trim();
        if needle.is_empty() {
            return Err(Error::InvalidInput("Entry id cannot be empty".to_string()));
        }

        if let Some(exact) = self
            .entries
            .iter()
            .find(|entry| entry.id.as_ref().is_some_and(|id| id.as_str() == needle))
        {
            return Ok(exact);
        }

        let mut matches = self.entries.iter().filter(|entry| {
            entry
                .id
                .as_ref()
                .is_some_and(|id| id.as_str().starts_with(needle))
        });
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry),
            (None, _) => Err(Error::DocumentNotFound(needle.to_string())),
            (Some(_), Some(_)) => Err(Error::InvalidInput(format!(
                "Entry id prefix '{needle}' is ambiguous"
            ))),
        }
    }

    /// Delete the entry shown at `index`, then refresh.
    pub async fn delete_row(&mut self, index: usize) -> Result<()> {
        let id = self
            .entries
            .get(index)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Row {index} is out of range ({} entries)",
                    self.entries.len()
                ))
            })?
            .id
            .clone()
            .ok_or_else(|| Error::InvalidInput(format!("Row {index} has no stored id")))?;

        self.repository.delete(&id).await?;
        self.refresh().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiaryDate;
    use crate::storage::MemoryBlobStore;
    use crate::store::{Fields, MemoryDocumentStore, StoreOp};
    use crate::test_support::session;
    use pretty_assertions::assert_eq;

    const COLLECTION: &str = "userDiaries/uid-1/diaries";

    fn seeded() -> (
        DiaryListPresenter<MemoryDocumentStore, MemoryBlobStore>,
        MemoryDocumentStore,
    ) {
        let store = MemoryDocumentStore::new();
        for (id, date) in [
            ("a1", "2024-01-05"),
            ("b2", "2024-03-01"),
            ("b3", "2023-12-31"),
        ] {
            store.insert_raw(
                COLLECTION,
                id,
                Fields::builder()
                    .set("diaryDate", date)
                    .set("diaryText", format!("entry {id}"))
                    .build(),
            );
        }
        let repository = DiaryRepository::new(store.clone(), MemoryBlobStore::new(), session());
        (DiaryListPresenter::new(repository), store)
    }

    fn dates(presenter: &DiaryListPresenter<MemoryDocumentStore, MemoryBlobStore>) -> Vec<String> {
        presenter
            .entries()
            .iter()
            .map(|entry| entry.date.to_string())
            .collect()
    }

    #[tokio::test]
    async fn refresh_sorts_newest_first() {
        let (mut presenter, _store) = seeded();
        presenter.refresh().await.unwrap();
        assert_eq!(
            dates(&presenter),
            vec!["2024-03-01", "2024-01-05", "2023-12-31"]
        );
        assert_eq!(
            presenter.entry(0).map(|entry| entry.date),
            Some("2024-03-01".parse::<DiaryDate>().unwrap())
        );
    }

    #[tokio::test]
    async fn refresh_failure_keeps_previous_list() {
        let (mut presenter, store) = seeded();
        presenter.refresh().await.unwrap();
        store.fail_on(StoreOp::List);

        assert!(presenter.refresh().await.is_err());
        assert_eq!(presenter.entries().len(), 3);
    }

    #[tokio::test]
    async fn delete_row_removes_entry_and_refreshes() {
        let (mut presenter, store) = seeded();
        presenter.refresh().await.unwrap();

        presenter.delete_row(0).await.unwrap();
        assert_eq!(dates(&presenter), vec!["2024-01-05", "2023-12-31"]);
        assert_eq!(store.document_count(COLLECTION), 2);
    }

    #[tokio::test]
    async fn delete_row_out_of_range_is_invalid() {
        let (mut presenter, store) = seeded();
        presenter.refresh().await.unwrap();
        let calls_before = store.calls().len();

        assert!(matches!(
            presenter.delete_row(3).await,
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(store.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn find_resolves_exact_and_unique_prefix() {
        let (mut presenter, _store) = seeded();
        presenter.refresh().await.unwrap();

        assert_eq!(
            presenter.find("a").unwrap().text.as_deref(),
            Some("entry a1")
        );
        assert_eq!(
            presenter.find("b3").unwrap().text.as_deref(),
            Some("entry b3")
        );
        assert!(matches!(presenter.find("b"), Err(Error::InvalidInput(_))));
        assert!(matches!(
            presenter.find("zz"),
            Err(Error::DocumentNotFound(_))
        ));
    }
}
