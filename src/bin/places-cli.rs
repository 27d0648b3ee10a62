use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "places-cli")]
#[command(about = "Query a running places-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Forwarded as the `language` parameter.
    #[arg(short, long)]
    language: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Autocomplete predictions for free text (fixed route)
    Autocomplete { input: String },
    /// Details for a place ID (fixed route)
    Details { place_id: String },
    /// Geocode an address (passthrough route)
    Geocode { address: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let (path, mut query) = match cli.command {
        Commands::Autocomplete { input } => ("proxyPlacesAPI", vec![("input", input)]),
        Commands::Details { place_id } => ("proxyPlacesAPI", vec![("place_id", place_id)]),
        Commands::Geocode { address } => ("geocode/json", vec![("address", address)]),
    };
    if let Some(language) = cli.language {
        query.push(("language", language));
    }

    let res = client
        .get(format!("{}/{}", cli.url.trim_end_matches('/'), path))
        .query(&query)
        .send()
        .await?;
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
