use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health status from the /health endpoint")]
    Health,

    #[command(about = "Show server information from the API root endpoint")]
    Info,
}

pub async fn handle(
    cmd: ServerCommands,
    base_url: &str,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let client = reqwest::Client::new();

    match cmd {
        ServerCommands::Health => {
            let url = format!("{}/health", base_url);
            match client.get(&url).send().await {
                Ok(res) => {
                    let status = res.status();
                    let body = res.json::<Value>().await.unwrap_or(Value::Null);
                    if status.is_success() {
                        output_success(output_format, "Server is healthy", Some(body))
                    } else {
                        output_error(
                            output_format,
                            &format!("Server degraded ({}): {}", status, body),
                        )
                    }
                }
                Err(e) => output_error(output_format, &format!("Cannot reach {}: {}", url, e)),
            }
        }
        ServerCommands::Info => {
            let url = format!("{}/", base_url);
            let res = client.get(&url).send().await?;
            let body = res.json::<Value>().await?;
            output_success(output_format, "Server info", Some(body))
        }
    }
}
