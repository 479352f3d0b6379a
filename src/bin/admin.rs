//! CLI administration tool for identity-gate.
//!
//! Runs the same provider clients the server uses, without going through
//! HTTP, to diagnose authentication problems.
//!
//! # Usage
//!
//! ```bash
//! # Verify a bearer token exactly as the auth gate would
//! cargo run --bin admin -- verify eyJhbGciOi...
//!
//! # Look up a user with the service-role key
//! cargo run --bin admin -- user 0d1f6c3e-...
//!
//! # Validate configuration and check provider reachability
//! cargo run --bin admin -- config
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `SUPABASE_URL`, `SUPABASE_ANON_KEY`,
//! `SUPABASE_SERVICE_ROLE_KEY` (see [`identity_gate::config`]).

use identity_gate::config::{self, Config};
use identity_gate::domain::{Identity, IdentityVerifier, UserAdmin, VerifyError};
use identity_gate::infrastructure::supabase::{self, SupabaseAdmin, SupabaseVerifier};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::time::Duration;

/// CLI tool for diagnosing identity-gate authentication.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Verify a bearer token with the identity provider
    Verify {
        /// Raw token (without the `Bearer ` prefix)
        token: String,
    },

    /// Fetch a user by id with the service-role key
    User {
        /// Provider user id
        id: String,
    },

    /// Validate configuration and check provider reachability
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let http = supabase::http_client(Duration::from_secs(config.provider_timeout_secs))?;

    match cli.command {
        Commands::Verify { token } => {
            let verifier = SupabaseVerifier::new(http, &config.supabase_url, &config.anon_key)?;
            verify_token(&verifier, &token).await
        }
        Commands::User { id } => {
            let admin = SupabaseAdmin::new(http, &config.supabase_url, config.admin_key())?;
            show_user(&admin, &id).await
        }
        Commands::Config => {
            let verifier = SupabaseVerifier::new(http, &config.supabase_url, &config.anon_key)?;
            check_config(&config, &verifier).await;
            Ok(())
        }
    }
}

/// Verifies a token and prints the outcome the auth gate would produce.
///
/// # Output Format
///
/// ```text
/// 🔍 Verify Token
///
///   Result: AUTHENTICATED (200)
///   User:   0d1f6c3e-...
/// ```
async fn verify_token(verifier: &impl IdentityVerifier, token: &str) -> Result<()> {
    println!("{}", "🔍 Verify Token".bright_blue().bold());
    println!();

    match verifier.verify(token).await {
        Ok(identity) => {
            println!("  Result: {}", "AUTHENTICATED (200)".green().bold());
            print_identity(&identity)?;
        }
        Err(e @ (VerifyError::Rejected { .. } | VerifyError::Unavailable { .. })) => {
            println!("  Result: {}", "REJECTED (401)".yellow().bold());
            println!("  Reason: {}", e.to_string().bright_black());
        }
        Err(e) => {
            println!("  Result: {}", "FAULT (500)".red().bold());
            println!("  Cause:  {}", format!("{:#}", anyhow::Error::new(e)).red());
        }
    }

    println!();
    Ok(())
}

/// Fetches and prints a user record.
async fn show_user(admin: &impl UserAdmin, user_id: &str) -> Result<()> {
    println!("{}", "👤 User".bright_blue().bold());
    println!();

    let identity = admin
        .get_user(user_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to fetch user: {}", e))?;

    print_identity(&identity)?;
    println!();

    Ok(())
}

/// Prints the configuration summary and provider reachability.
async fn check_config(config: &Config, verifier: &impl IdentityVerifier) {
    println!("{}", "⚙️  Configuration".bright_blue().bold());
    println!();
    println!("  Provider:     {}", config.supabase_url.as_str().cyan());
    println!("  Environment:  {}", config.environment.as_str().cyan());
    println!(
        "  Service key:  {}",
        if config.service_role_key.is_some() {
            "set".green()
        } else {
            "not set (anon key used for admin calls)".yellow()
        }
    );

    let reachable = verifier.health_check().await;
    println!(
        "  Reachable:    {}",
        if reachable { "yes".green() } else { "no".red() }
    );
    println!();
}

fn print_identity(identity: &Identity) -> Result<()> {
    println!("  User:   {}", identity.id.cyan());
    if let Some(email) = identity.email() {
        println!("  Email:  {}", email.cyan());
    }
    println!();
    println!("{}", serde_json::to_string_pretty(identity)?.bright_black());
    Ok(())
}
