use std::path::Path;

use lifedoc_core::{DiaryDate, DiaryDraft, DraftImage};

use crate::backend::SignedIn;
use crate::commands::common::{normalize_content, parse_date_arg, read_image, read_piped_stdin};
use crate::error::CliError;

pub async fn run_add(
    date: Option<&str>,
    text: Option<&str>,
    image: Option<&Path>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let date = parse_date_arg(date)?.unwrap_or_else(DiaryDate::today);
    let text = match text.and_then(normalize_content) {
        Some(text) => Some(text),
        None => read_piped_stdin()?,
    };
    let image = match image {
        Some(path) => DraftImage::Replace(read_image(path)?),
        None => DraftImage::Keep,
    };

    let draft = DiaryDraft {
        date,
        text,
        image,
    };
    let signed_in = SignedIn::restore(global_profile).await?;
    let saved = signed_in.diary_repository()?.save(draft).await?;

    if let Some(id) = saved.id {
        println!("{id}");
    }
    Ok(())
}
