use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "warden-cli")]
#[command(about = "Operator CLI for the warden gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9998")]
    url: String,

    /// Vault access token, forwarded as Warden-Access-Token.
    #[arg(short, long, env = "WARDEN_ACCESS_TOKEN")]
    token: String,

    /// Optional login state path, forwarded as Warden-State-Path.
    #[arg(long)]
    state_path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a single secret by id
    Get { id: String },
    /// List the secret identifiers of an organization
    List { organization_id: String },
    /// Create a secret
    Create {
        key: String,
        value: String,
        #[arg(long, default_value = "")]
        note: String,
        #[arg(long)]
        organization_id: String,
        #[arg(long)]
        project_id: Vec<String>,
    },
    /// Delete secrets by id
    Delete { ids: Vec<String> },
}

const API_PREFIX: &str = "/rest/api/1";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert("Warden-Access-Token", HeaderValue::from_str(&cli.token)?);
    if let Some(state_path) = &cli.state_path {
        headers.insert("Warden-State-Path", HeaderValue::from_str(state_path)?);
    }

    let endpoint = |path: &str| format!("{}{}{}", cli.url, API_PREFIX, path);

    match cli.command {
        Commands::Get { id } => {
            let res = client
                .get(endpoint("/secret"))
                .headers(headers)
                .json(&json!({ "id": id }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::List { organization_id } => {
            let res = client
                .get(endpoint("/secrets"))
                .headers(headers)
                .json(&json!({ "organizationId": organization_id }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Create {
            key,
            value,
            note,
            organization_id,
            project_id,
        } => {
            let res = client
                .post(endpoint("/secret"))
                .headers(headers)
                .json(&json!({
                    "key": key,
                    "value": value,
                    "note": note,
                    "organizationId": organization_id,
                    "projectIds": project_id,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Delete { ids } => {
            let res = client
                .delete(endpoint("/secret"))
                .headers(headers)
                .json(&json!({ "ids": ids }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text.trim_end());
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
