use chrono::Utc;
use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use lispbook_cli::server::{build_mailer, open_configured_ledger};
use lispbook_cli::Config;
use lispbook_core::{format_timestamp, generate_token, TokenRecord};
use lispbook_payments::{download_links, purchase_email, Mailer};
use lispbook_storage::{PurchaseLedger, TokenValidator};

#[derive(Subcommand)]
pub enum TokensCommands {
    /// Issue a download token by hand (for purchases that never got one)
    Issue {
        /// Email the download links to this address
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Check whether a token currently authorizes downloads
    Check {
        /// Token to check
        token: String,
    },
    /// List tokens that are currently valid
    List,
}

pub async fn handle_tokens_command(
    command: TokensCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    match command {
        TokensCommands::Issue { email } => issue_token(&config, email).await,
        TokensCommands::Check { token } => check_token(&config, &token).await,
        TokensCommands::List => list_tokens(&config).await,
    }
}

async fn issue_token(
    config: &Config,
    email: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = open_configured_ledger(config).await?;
    let token = generate_token();
    let record = ledger.issue(&token, Utc::now()).await?;

    println!(
        "{} {} ({})",
        "Issued token".green().bold(),
        record.token,
        format_timestamp(record.issued_at)
    );
    for link in download_links(&config.public_url, &token) {
        println!("  {}", link.cyan());
    }

    if let Some(to) = email {
        let message = purchase_email(&config.mail.from, &to, &config.public_url, &token);
        build_mailer(&config.mail)?.send(&message).await?;
        println!("{} {}", "Emailed links to".green(), to);
    }

    Ok(())
}

async fn check_token(config: &Config, token: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = open_configured_ledger(config).await?;
    let validator = TokenValidator::new(ledger).with_window(config.token_validity);

    if validator.is_valid_now(token).await? {
        println!("{} {}", "Valid:".green().bold(), token);
    } else {
        println!("{} {}", "Invalid or expired:".red().bold(), token);
    }
    Ok(())
}

async fn list_tokens(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = open_configured_ledger(config).await?;
    let now = Utc::now();
    let valid: Vec<_> = ledger
        .records()
        .await?
        .into_iter()
        .filter(|record| record.is_valid_at(now, config.token_validity))
        .collect();

    if valid.is_empty() {
        println!("{}", "No valid tokens".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Token", "Issued", "Expires"]);

    for record in &valid {
        table.add_row(vec![
            record.token.clone(),
            format_timestamp(record.issued_at),
            expiry_label(record, config.token_validity),
        ]);
    }

    println!("{table}");
    println!("{} valid token(s)", valid.len());
    Ok(())
}

/// Expiry time, or `never` when the window runs past the end of representable time
fn expiry_label(record: &TokenRecord, window: chrono::Duration) -> String {
    record
        .issued_at
        .checked_add_signed(window)
        .map(format_timestamp)
        .unwrap_or_else(|| "never".to_string())
}
