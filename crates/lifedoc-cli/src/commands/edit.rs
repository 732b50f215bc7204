use std::path::Path;

use lifedoc_core::{DiaryDraft, DiaryEntry, DraftImage};

use crate::backend::SignedIn;
use crate::commands::common::{parse_date_arg, read_image, resolve_entry};
use crate::error::CliError;

/// Requested changes to a stored entry; unset fields keep their value.
#[derive(Debug, Default)]
pub struct EditRequest<'a> {
    pub date: Option<&'a str>,
    pub text: Option<&'a str>,
    pub clear_text: bool,
    pub image: Option<&'a Path>,
    pub remove_image: bool,
}

impl EditRequest<'_> {
    const fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.text.is_none()
            && !self.clear_text
            && self.image.is_none()
            && !self.remove_image
    }

    pub fn into_draft(self, existing: &DiaryEntry) -> Result<DiaryDraft, CliError> {
        if self.is_empty() {
            return Err(CliError::NothingToEdit);
        }

        let date = parse_date_arg(self.date)?.unwrap_or(existing.date);
        let text = if self.clear_text {
            None
        } else {
            self.text
                .map(ToOwned::to_owned)
                .or_else(|| existing.text.clone())
        };
        let image = match (self.image, self.remove_image) {
            (Some(path), _) => DraftImage::Replace(read_image(path)?),
            (None, true) => DraftImage::Remove,
            (None, false) => DraftImage::Keep,
        };

        Ok(DiaryDraft { date, text, image })
    }
}

pub async fn run_edit(
    id: &str,
    request: EditRequest<'_>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    if request.is_empty() {
        return Err(CliError::NothingToEdit);
    }

    let signed_in = SignedIn::restore(global_profile).await?;
    let mut presenter = signed_in.presenter()?;
    let (_, existing) = resolve_entry(&mut presenter, id).await?;
    let draft = request.into_draft(&existing)?;

    let replaced = presenter.repository().replace(&existing, draft).await?;
    if let Some(id) = replaced.id {
        println!("{id}");
    }
    Ok(())
}
