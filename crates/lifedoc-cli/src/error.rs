use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] lifedoc_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Entry ID cannot be empty")]
    EmptyEntryId,
    #[error("Nothing to change: pass --date, --text, --clear-text, --image, or --remove-image")]
    NothingToEdit,
    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Not signed in. Run `lifedoc login --email <email> --password <password>` first.")]
    NotSignedIn,
    #[error(
        "Firebase is not configured. Run `lifedoc config init` or set FIREBASE_API_KEY, FIREBASE_PROJECT_ID and FIREBASE_STORAGE_BUCKET."
    )]
    FirebaseNotConfigured,
}
