use std::io::{self, IsTerminal, Read};
use std::path::Path;

use lifedoc_core::util::first_line_preview;
use lifedoc_core::{DiaryDate, DiaryEntry};
use serde::Serialize;

use crate::backend::CliDiaryPresenter;
use crate::error::CliError;

const SHORT_ID_LEN: usize = 13;

#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub id: String,
    pub date: String,
    pub date_label: String,
    pub preview: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub image_id: Option<String>,
}

pub fn entry_to_list_item(entry: &DiaryEntry) -> EntryListItem {
    EntryListItem {
        id: entry_id(entry),
        date: entry.date.to_string(),
        date_label: entry.date.stacked_label(),
        preview: entry.text_preview(80),
        text: entry.text.clone(),
        image_url: entry.image_url.clone(),
        image_id: entry.image_id.clone(),
    }
}

pub fn format_entry_lines(entries: &[DiaryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let id = entry_id(entry);
            let short_id = id.chars().take(SHORT_ID_LEN).collect::<String>();
            let photo = if entry.has_image() { "[photo]" } else { "" };
            let preview = entry
                .text
                .as_deref()
                .map(|text| first_line_preview(text, 40))
                .unwrap_or_default();
            format!("{short_id:<13}  {}  {photo:<7}  {preview}", entry.date)
                .trim_end()
                .to_string()
        })
        .collect()
}

fn entry_id(entry: &DiaryEntry) -> String {
    entry
        .id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default()
}

pub fn normalize_entry_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyEntryId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn parse_date_arg(value: Option<&str>) -> Result<Option<DiaryDate>, CliError> {
    value
        .map(|raw| raw.parse::<DiaryDate>().map_err(CliError::from))
        .transpose()
}

pub fn read_image(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::ImageRead {
        path: path.display().to_string(),
        source,
    })
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

/// Refresh the list and resolve an id or unique prefix to a row index and entry.
pub async fn resolve_entry(
    presenter: &mut CliDiaryPresenter,
    id: &str,
) -> Result<(usize, DiaryEntry), CliError> {
    let query = normalize_entry_identifier(id)?;
    presenter.refresh().await?;
    let entry = presenter.find(&query)?.clone();
    let index = presenter
        .entries()
        .iter()
        .position(|candidate| candidate.id == entry.id)
        .ok_or_else(|| lifedoc_core::Error::DocumentNotFound(query.clone()))?;
    Ok((index, entry))
}
