//! Vouch API CLI
//!
//! Starts the HTTP server for cover letter experience extraction.

use std::env;
use std::process;
use vouch_api::{config::ServerConfig, start_server, ServerError};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // A .env file usually carries the provider API key in development.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        ServerConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        // Use default test configuration
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: vouch-api --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    // Start the server
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Vouch API - Cover Letter Experience Extraction Service");
    println!();
    println!("USAGE:");
    println!("    vouch-api --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    vouch-api --config config/vouch.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8080)");
    println!("    - database_path: SQLite database file (default: 'vouch.db')");
    println!("    - [provider] endpoint: Chat completions URL (default: OpenAI)");
    println!("    - [provider] model: Model name (default: 'gpt-4o-mini')");
    println!("    - [provider] api_key: API key; falls back to OPENAI_API_KEY");
    println!();
}
