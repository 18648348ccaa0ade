use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::tokens::TokensCommands;
use lispbook_cli::Config;
use lispbook_config::constants::LISPBOOK_PUBLIC_URL;

#[derive(Parser)]
#[command(name = "lispbook")]
#[command(about = "Build Your Own Lisp site server and purchase admin")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind (overrides LISPBOOK_HOST)
        #[arg(long)]
        host: Option<std::net::IpAddr>,
    },
    /// Manage purchase tokens
    #[command(subcommand)]
    Tokens(TokensCommands),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    lispbook_cli::init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve { port, host } => {
            let mut config = Config::from_env()?;
            if let Some(port) = port {
                if port == 0 {
                    return Err("port must be between 1 and 65535".into());
                }
                config.port = port;
                if std::env::var(LISPBOOK_PUBLIC_URL).is_err() {
                    config.public_url = format!("http://localhost:{}", port);
                }
            }
            if let Some(host) = host {
                config.host = host;
            }

            println!(
                "{} http://{}:{}",
                "Starting Build Your Own Lisp on".green().bold(),
                config.host,
                config.port
            );
            lispbook_cli::run_server(config).await
        }
        Commands::Tokens(tokens_cmd) => cli::tokens::handle_tokens_command(tokens_cmd).await,
    }
}
