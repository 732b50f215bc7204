use crate::backend::SignedIn;
use crate::commands::common::resolve_entry;
use crate::error::CliError;

pub async fn run_delete(id: &str, global_profile: Option<&str>) -> Result<(), CliError> {
    let signed_in = SignedIn::restore(global_profile).await?;
    let mut presenter = signed_in.presenter()?;
    let (index, entry) = resolve_entry(&mut presenter, id).await?;

    presenter.delete_row(index).await?;
    if let Some(id) = entry.id {
        println!("{id}");
    }
    Ok(())
}
