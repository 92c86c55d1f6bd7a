use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account and print the bearer token")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email address")]
        email: String,
        #[arg(help = "Password")]
        password: String,
    },

    #[command(about = "Log in and print the bearer token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(help = "Password")]
        password: String,
    },

    #[command(about = "Show the authenticated account (requires EXPENSE_API_TOKEN)")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    base_url: &str,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    match cmd {
        AuthCommands::Register {
            name,
            email,
            password,
        } => {
            let url = format!("{}/api/users/register", base_url);
            let res = client
                .post(&url)
                .json(&json!({ "name": name, "email": email, "password": password }))
                .send()
                .await?;
            print_auth_response(res, output_format, "Registered").await
        }
        AuthCommands::Login { email, password } => {
            let url = format!("{}/api/users/login", base_url);
            let res = client
                .post(&url)
                .json(&json!({ "email": email, "password": password }))
                .send()
                .await?;
            print_auth_response(res, output_format, "Logged in").await
        }
        AuthCommands::Whoami => {
            let token = match std::env::var("EXPENSE_API_TOKEN") {
                Ok(t) if !t.is_empty() => t,
                _ => {
                    return output_error(
                        output_format,
                        "EXPENSE_API_TOKEN is not set; log in first",
                    )
                }
            };
            let url = format!("{}/api/users/me", base_url);
            let res = client.get(&url).bearer_auth(token).send().await?;
            let status = res.status();
            let body = res.json::<Value>().await?;
            if status.is_success() {
                output_success(output_format, "Authenticated", Some(body))
            } else {
                output_error(output_format, &format!("Request failed ({}): {}", status, body))
            }
        }
    }
}

async fn print_auth_response(
    res: reqwest::Response,
    output_format: &OutputFormat,
    message: &str,
) -> anyhow::Result<()> {
    let status = res.status();
    let body = res.json::<Value>().await?;
    if status.is_success() {
        output_success(output_format, message, Some(body))
    } else {
        output_error(output_format, &format!("Request failed ({}): {}", status, body))
    }
}
