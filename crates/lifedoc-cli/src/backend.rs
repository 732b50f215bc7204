//! Wiring from CLI profile and stored session to the Firebase backends.

use lifedoc_core::config::FirebaseConfig;
use lifedoc_core::presenter::DiaryListPresenter;
use lifedoc_core::repository::{DiaryRepository, ProfileRepository};
use lifedoc_core::storage::{BlobStore, FirebaseStorageClient, R2Config, R2Storage};
use lifedoc_core::store::FirestoreClient;
use lifedoc_core::Session;

use crate::auth::{account_service, CliAccountService};
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

/// Photo storage: R2 when `R2_*` is configured, otherwise Firebase Storage.
pub enum CliBlobStore {
    Firebase(FirebaseStorageClient),
    R2(R2Storage),
}

impl CliBlobStore {
    pub fn for_session(config: &FirebaseConfig, session: &Session) -> Result<Self, CliError> {
        if let Some(r2) = R2Config::from_env()? {
            tracing::debug!("Using R2 bucket {} for photos", r2.bucket);
            return Ok(Self::R2(R2Storage::new(r2)));
        }
        Ok(Self::Firebase(FirebaseStorageClient::new(config, session)?))
    }

    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Firebase(_) => "firebase-storage",
            Self::R2(_) => "r2",
        }
    }
}

impl BlobStore for CliBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> lifedoc_core::Result<()> {
        match self {
            Self::Firebase(storage) => storage.put(path, bytes, content_type).await,
            Self::R2(storage) => storage.put(path, bytes, content_type).await,
        }
    }

    async fn delete(&self, path: &str) -> lifedoc_core::Result<()> {
        match self {
            Self::Firebase(storage) => storage.delete(path).await,
            Self::R2(storage) => storage.delete(path).await,
        }
    }

    async fn download_url(&self, path: &str) -> lifedoc_core::Result<String> {
        match self {
            Self::Firebase(storage) => storage.download_url(path).await,
            Self::R2(storage) => storage.download_url(path).await,
        }
    }
}

pub type CliDiaryRepository = DiaryRepository<FirestoreClient, CliBlobStore>;
pub type CliProfileRepository = ProfileRepository<FirestoreClient, CliBlobStore>;
pub type CliDiaryPresenter = DiaryListPresenter<FirestoreClient, CliBlobStore>;

/// Profile name and Firebase configuration for this invocation.
pub fn resolve_firebase(global_profile: Option<&str>) -> Result<(String, FirebaseConfig), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let firebase = profile
        .firebase_config()?
        .ok_or(CliError::FirebaseNotConfigured)?;
    Ok((profile_name, firebase))
}

pub fn accounts_for(profile_name: &str, config: &FirebaseConfig) -> Result<CliAccountService, CliError> {
    account_service(profile_name, config).map_err(|error| CliError::Auth(error.to_string()))
}

/// A restored session plus everything needed to reach the user's data.
pub struct SignedIn {
    pub profile_name: String,
    pub config: FirebaseConfig,
    pub session: Session,
}

impl SignedIn {
    pub async fn restore(global_profile: Option<&str>) -> Result<Self, CliError> {
        let (profile_name, config) = resolve_firebase(global_profile)?;
        let session = accounts_for(&profile_name, &config)?
            .restore()
            .await?
            .ok_or(CliError::NotSignedIn)?;
        Ok(Self {
            profile_name,
            config,
            session,
        })
    }

    pub fn from_session(profile_name: String, config: FirebaseConfig, session: Session) -> Self {
        Self {
            profile_name,
            config,
            session,
        }
    }

    pub fn diary_repository(&self) -> Result<CliDiaryRepository, CliError> {
        Ok(DiaryRepository::new(
            FirestoreClient::new(&self.config, &self.session)?,
            CliBlobStore::for_session(&self.config, &self.session)?,
            self.session.clone(),
        ))
    }

    pub fn profile_repository(&self) -> Result<CliProfileRepository, CliError> {
        Ok(ProfileRepository::new(
            FirestoreClient::new(&self.config, &self.session)?,
            CliBlobStore::for_session(&self.config, &self.session)?,
            self.session.clone(),
        ))
    }

    pub fn presenter(&self) -> Result<CliDiaryPresenter, CliError> {
        Ok(DiaryListPresenter::new(self.diary_repository()?))
    }
}
