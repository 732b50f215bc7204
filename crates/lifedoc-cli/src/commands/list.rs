use crate::backend::SignedIn;
use crate::commands::common::{entry_to_list_item, format_entry_lines, EntryListItem};
use crate::error::CliError;

pub async fn run_list(as_json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let signed_in = SignedIn::restore(global_profile).await?;
    let mut presenter = signed_in.presenter()?;
    let entries = presenter.refresh().await?;

    if as_json {
        let json_items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<EntryListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if entries.is_empty() {
        println!("No diary entries yet.");
    } else {
        for line in format_entry_lines(entries) {
            println!("{line}");
        }
    }

    Ok(())
}
