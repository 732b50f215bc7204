use lifedoc_core::config::{ENV_API_KEY, ENV_PROJECT_ID, ENV_STORAGE_BUCKET};
use lifedoc_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_key,
            project_id,
            storage_bucket,
            no_activate,
        } => run_config_init(
            global_profile,
            ProfileValues {
                api_key,
                project_id,
                storage_bucket,
            },
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

/// Values passed on the command line; unset ones fall back to env, then the saved profile.
#[derive(Debug, Default)]
pub struct ProfileValues {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
}

pub fn run_config_init(
    profile_name: Option<&str>,
    values: ProfileValues,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    merge_profile_values(&mut config, &profile_name, values, |key| {
        std::env::var(key).ok()
    });

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let missing = config
        .profile(&profile_name)
        .map(CliProfile::missing_fields)
        .unwrap_or_default();
    if missing.is_empty() {
        println!(
            "Profile '{profile_name}' is ready. Run `lifedoc register` or `lifedoc login --email <email> --password <password>`."
        );
    } else {
        println!(
            "Profile '{}' is missing: {}",
            profile_name,
            missing.join(", ")
        );
    }
    Ok(())
}

pub fn merge_profile_values(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    values: ProfileValues,
    env_lookup: impl Fn(&str) -> Option<String>,
) {
    let profile = config.profile_mut_or_default(profile_name);
    let merge = |explicit: Option<String>, env_key: &str, existing: Option<String>| {
        normalize_text_option(explicit)
            .or_else(|| normalize_text_option(env_lookup(env_key)))
            .or(existing)
    };

    profile.firebase_api_key = merge(values.api_key, ENV_API_KEY, profile.firebase_api_key.take());
    profile.firebase_project_id = merge(
        values.project_id,
        ENV_PROJECT_ID,
        profile.firebase_project_id.take(),
    );
    profile.firebase_storage_bucket = merge(
        values.storage_bucket,
        ENV_STORAGE_BUCKET,
        profile.firebase_storage_bucket.take(),
    );
}

fn run_config_show(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();

    println!("profile: {profile_name}");
    match profile.firebase_config()? {
        Some(firebase) => println!("{}", serde_json::to_string_pretty(&firebase)?),
        None => println!("Firebase is not configured for this profile."),
    }
    Ok(())
}
