//! lifedoc CLI - a dated photo diary from the command line

mod auth;
mod backend;
mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::account::{run_login, run_logout, run_register, run_whoami, RegisterArgs};
use crate::commands::add::run_add;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::{run_edit, EditRequest};
use crate::commands::list::run_list;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "lifedoc=info"
                    .parse()
                    .map_err(|error| CliError::Config(format!("{error}")))?,
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
            picture,
        } => {
            run_register(
                RegisterArgs {
                    name: &name,
                    email: &email,
                    password: &password,
                    confirm_password: &confirm_password,
                    picture: &picture,
                },
                profile,
            )
            .await?;
        }
        Commands::Login { email, password } => run_login(&email, &password, profile).await?,
        Commands::Logout => run_logout(profile).await?,
        Commands::Whoami => run_whoami(profile).await?,
        Commands::List { json } => run_list(json, profile).await?,
        Commands::Add { date, text, image } => {
            run_add(date.as_deref(), text.as_deref(), image.as_deref(), profile).await?;
        }
        Commands::Edit {
            id,
            date,
            text,
            clear_text,
            image,
            remove_image,
        } => {
            let request = EditRequest {
                date: date.as_deref(),
                text: text.as_deref(),
                clear_text,
                image: image.as_deref(),
                remove_image,
            };
            run_edit(&id, request, profile).await?;
        }
        Commands::Delete { id } => run_delete(&id, profile).await?,
        Commands::Config { command } => run_config(command, profile)?,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}
