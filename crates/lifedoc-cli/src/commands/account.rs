use std::path::Path;

use lifedoc_core::account::Registration;
use lifedoc_core::Session;

use crate::auth::{clear_stored_session, load_stored_session};
use crate::backend::{accounts_for, resolve_firebase, CliBlobStore, SignedIn};
use crate::commands::common::read_image;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub struct RegisterArgs<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub picture: &'a Path,
}

pub async fn run_register(
    args: RegisterArgs<'_>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let (profile_name, config) = resolve_firebase(global_profile)?;
    let registration = Registration {
        name: args.name.trim().to_string(),
        email: args.email.to_string(),
        password: args.password.to_string(),
        confirm_password: args.confirm_password.to_string(),
        profile_image: Some(read_image(args.picture)?),
    };

    let accounts = accounts_for(&profile_name, &config)?;
    let session = accounts.register(&registration).await?;
    let signed_in = SignedIn::from_session(profile_name, config, session);
    let picture = registration.profile_image.unwrap_or_default();
    let profile = signed_in
        .profile_repository()?
        .create(&registration.name, &picture)
        .await?;

    println!(
        "Registered {} on profile '{}': {}",
        signed_in.session.email().unwrap_or(registration.email.as_str()),
        signed_in.profile_name,
        profile.diary_title()
    );
    Ok(())
}

pub async fn run_login(
    email: &str,
    password: &str,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let (profile_name, config) = resolve_firebase(global_profile)?;
    let session = accounts_for(&profile_name, &config)?
        .sign_in(email, password)
        .await?;

    let email_label = session.email().unwrap_or("(no email)");
    println!("Signed in profile '{profile_name}' as {email_label}");
    Ok(())
}

pub async fn run_logout(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let stored = load_stored_session(&profile_name)
        .map_err(|error| CliError::Auth(error.to_string()))?;

    match (stored, resolve_firebase(Some(profile_name.as_str()))) {
        (Some(stored), Ok((_, firebase))) => {
            let session = Session::from_auth(&stored)?;
            accounts_for(&profile_name, &firebase)?
                .sign_out(session)
                .await?;
        }
        _ => {
            clear_stored_session(&profile_name)
                .map_err(|error| CliError::Auth(error.to_string()))?;
        }
    }

    println!("Signed out profile '{profile_name}'");
    Ok(())
}

pub async fn run_whoami(global_profile: Option<&str>) -> Result<(), CliError> {
    let signed_in = SignedIn::restore(global_profile).await?;
    let profile = match signed_in.profile_repository()?.fetch().await {
        Ok(profile) => profile,
        Err(lifedoc_core::Error::DocumentNotFound(_)) => lifedoc_core::UserProfile::default(),
        Err(error) => return Err(error.into()),
    };
    let photos = CliBlobStore::for_session(&signed_in.config, &signed_in.session)?;

    println!("{}", profile.diary_title());
    println!("profile: {}", signed_in.profile_name);
    println!("user:    {}", signed_in.session.user_id());
    println!(
        "email:   {}",
        signed_in.session.email().unwrap_or("(no email)")
    );
    if let Some(url) = profile.profile_image_url.as_deref() {
        println!("picture: {url}");
    }
    println!("photos:  {}", photos.backend_name());
    if let Some(stored) = load_stored_session(&signed_in.profile_name)
        .map_err(|error| CliError::Auth(error.to_string()))?
    {
        println!("expires: {}", format_expiry(stored.expires_at));
    }
    Ok(())
}

pub fn format_expiry(expires_at: i64) -> String {
    chrono::DateTime::from_timestamp(expires_at, 0).map_or_else(
        || expires_at.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
