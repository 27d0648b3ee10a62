//! places-proxy
//!
//! Forwards browser requests to the Google Maps/Places web service API,
//! adding the server-held API key, and relays the JSON back with CORS
//! headers.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────┐
//!                   │                  PLACES PROXY                     │
//!  Client Request   │  ┌────────┐   ┌─────────┐   ┌──────────────┐     │
//!  ─────────────────┼─▶│  http  │──▶│  proxy  │──▶│   routing    │     │
//!                   │  │ server │   │ handler │   │ fixed/passth.│     │
//!                   │  └────────┘   └────┬────┘   └──────────────┘     │
//!                   │                    │                              │
//!                   │                    ▼                              │
//!  Client Response  │  ┌────────┐   ┌─────────┐   ┌──────────────┐     │
//!  ◀────────────────┼──│  cors  │◀──│response │◀──│   upstream   │◀────┼── Maps API
//!                   │  └────────┘   └─────────┘   │ (+ key)      │     │
//!                   │                             └──────────────┘     │
//!                   │  config · observability · lifecycle               │
//!                   └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use places_proxy::lifecycle::{self, StartupOptions};

#[derive(Parser)]
#[command(name = "places-proxy")]
#[command(about = "CORS-friendly proxy for the Google Maps/Places API", long_about = None)]
struct Args {
    /// TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides PORT and the config file).
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve even without a credential; proxied requests then answer 500.
    #[arg(long)]
    allow_missing_credential: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let options = StartupOptions {
        config_path: args.config,
        port: args.port,
        allow_missing_credential: args.allow_missing_credential,
    };

    match lifecycle::run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "places-proxy failed");
            eprintln!("places-proxy: {e}");
            e.exit_code()
        }
    }
}
