use clap::Subcommand;
use serde_json::json;

use super::{authenticated_client, client_for};
use crate::cli::config::{load_session, save_session};
use crate::cli::utils::{output_json, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account and log in")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (at least 6 characters)")]
        password: String,
    },

    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show current user information")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut session = load_session()?;

    match cmd {
        AuthCommands::Register { name, email, password } => {
            let response = client_for(&session)?.register(&name, &email, &password).await?;
            session.sign_in(response.token, response.user.email.clone());
            save_session(&session)?;
            output_success(
                &output_format,
                &format!("Registered and logged in as {}", response.user.email),
                Some(json!({ "user": response.user })),
            )
        }
        AuthCommands::Login { email, password } => {
            let response = client_for(&session)?.login(&email, &password).await?;
            session.sign_in(response.token, response.user.email.clone());
            save_session(&session)?;
            output_success(
                &output_format,
                &format!("Logged in as {}", response.user.email),
                Some(json!({ "user": response.user })),
            )
        }
        AuthCommands::Logout => {
            session.sign_out();
            save_session(&session)?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            let user = authenticated_client(&session)?.me().await?;
            match output_format {
                OutputFormat::Json => output_json(&user),
                OutputFormat::Text => {
                    println!("Name:       {}", user.name);
                    println!("Email:      {}", user.email);
                    println!("Categories: {}", user.categories.len());
                    println!("Server:     {}", session.server_url);
                    Ok(())
                }
            }
        }
    }
}
