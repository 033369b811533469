//! CLI administration tool for snaplink.
//!
//! Works directly against the configured store, without going through the HTTP
//! API. Uses the same services as the server, so every change it makes is also
//! written to the event log.
//!
//! # Usage
//!
//! ```bash
//! # List links
//! cargo run --bin admin -- links list
//!
//! # Show one link with its clicks
//! cargo run --bin admin -- links show aZ3k9Qp
//!
//! # Create a link valid for two hours
//! cargo run --bin admin -- links create https://example.com --minutes 120 --code promo
//!
//! # Remove expired links
//! cargo run --bin admin -- links purge
//!
//! # Inspect or clear the event log
//! cargo run --bin admin -- logs show --limit 20
//! cargo run --bin admin -- logs clear
//!
//! # Check the store
//! cargo run --bin admin -- store check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `STORE_BACKEND`, `STORE_PATH`, `REDIS_URL`, `BASE_URL`.

use snaplink::config::{self, Config, StoreBackend};
use snaplink::domain::entities::{NewLink, RequestedValidity, ShortLink};
use snaplink::server;
use snaplink::state::AppState;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Inspect the event log
    Logs {
        #[command(subcommand)]
        action: LogsAction,
    },

    /// Store diagnostics
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// List all links, newest first
    List,

    /// Show one link with its click history
    Show {
        /// Shortcode (case-sensitive)
        code: String,
    },

    /// Create a new link
    Create {
        /// Destination URL (prompted if omitted)
        url: Option<String>,

        /// Validity in minutes (default: 30)
        #[arg(short, long)]
        minutes: Option<i64>,

        /// Custom shortcode, 3-15 letters or digits
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Remove every expired link
    Purge {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum LogsAction {
    /// Print the most recent entries
    Show {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Delete every entry
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Check that the store is reachable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    if config.store_backend == StoreBackend::Memory {
        println!(
            "{}",
            "⚠️  STORE_BACKEND=memory: nothing done here outlives this process".yellow()
        );
    }

    let store = server::open_store(&config).await?;
    let state = server::build_state(&config, store);

    match cli.command {
        Commands::Links { action } => handle_links_action(action, &state).await?,
        Commands::Logs { action } => handle_logs_action(action, &state).await?,
        Commands::Store { action } => handle_store_action(action, &state, &config).await?,
    }

    Ok(())
}

async fn handle_links_action(action: LinksAction, state: &AppState) -> Result<()> {
    match action {
        LinksAction::List => list_links(state).await,
        LinksAction::Show { code } => show_link(state, &code).await,
        LinksAction::Create { url, minutes, code } => create_link(state, url, minutes, code).await,
        LinksAction::Purge { yes } => purge_links(state, yes).await,
    }
}

/// Lists all links with status indicators.
///
/// ```text
/// 🔗 Short links
///
///   Code             Clicks  Expires              Status   URL
///   ─────────────────────────────────────────────────────────────────────────
///   aZ3k9Qp          3       2026-01-01 12:30     ACTIVE   https://example.com
/// ```
async fn list_links(state: &AppState) -> Result<()> {
    println!("{}", "🔗 Short links".bright_blue().bold());
    println!();

    let links = state.link_store.all().await?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin links create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<16} {:<7} {:<20} {:<8} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Expires".bright_white().bold(),
        "Status".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    let mut expired = 0;
    for link in &links {
        let is_expired = state.link_store.is_expired(link);
        if is_expired {
            expired += 1;
        }

        println!(
            "  {:<16} {:<7} {:<20} {:<8} {}",
            link.shortcode.cyan(),
            link.click_count(),
            link.expire_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status_label(is_expired),
            link.long_url
        );
    }

    println!();
    println!(
        "  Total: {}  Expired: {}",
        links.len().to_string().bright_white().bold(),
        expired.to_string().bright_red()
    );
    println!();

    Ok(())
}

async fn show_link(state: &AppState, code: &str) -> Result<()> {
    let stats = state.link_store.stats(code).await?;
    let link = &stats.link;

    println!("{}", "🔎 Link details".bright_blue().bold());
    println!();
    print_link(state, link);
    println!("  Status:    {}", status_label(stats.expired));
    println!("  Clicks:    {}", stats.click_count.to_string().bright_green().bold());
    println!();

    for click in &link.clicks {
        let referrer = if click.referrer.is_empty() {
            "(direct)".to_string()
        } else {
            click.referrer.clone()
        };

        println!(
            "  {}  {:<8} {:<20} {:<10} {}",
            click.ts.format("%Y-%m-%d %H:%M:%S").to_string().bright_black(),
            click.coarse_locale.language,
            click.coarse_locale.timezone,
            click.source_path,
            referrer.bright_black()
        );
    }

    if !link.clicks.is_empty() {
        println!();
    }

    Ok(())
}

async fn create_link(
    state: &AppState,
    url: Option<String>,
    minutes: Option<i64>,
    code: Option<String>,
) -> Result<()> {
    println!("{}", "✨ Create short link".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Destination URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    let draft = NewLink {
        long_url: url,
        validity: minutes.map_or(RequestedValidity::Default, RequestedValidity::Minutes),
        shortcode: code,
    };

    let link = state.link_store.insert(draft).await?;

    println!("{}", "✅ Link created successfully!".green().bold());
    println!();
    print_link(state, &link);
    println!();

    Ok(())
}

/// Removes expired links after confirmation (default: No).
async fn purge_links(state: &AppState, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge expired links".bright_blue().bold());
    println!();

    let links = state.link_store.all().await?;
    let expired = links
        .iter()
        .filter(|link| state.link_store.is_expired(link))
        .count();

    if expired == 0 {
        println!("{}", "  Nothing to purge".yellow());
        return Ok(());
    }

    println!("  Expired links: {}", expired.to_string().bright_red().bold());
    println!();

    if !skip_confirm && !confirm("Remove them permanently?")? {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let report = state.link_store.purge_expired().await?;

    println!(
        "{}",
        format!("✅ Removed {} link(s)", report.removed_count)
            .green()
            .bold()
    );
    println!();

    Ok(())
}

async fn handle_logs_action(action: LogsAction, state: &AppState) -> Result<()> {
    match action {
        LogsAction::Show { limit } => {
            println!("{}", "📜 Event log".bright_blue().bold());
            println!();

            let entries = state.event_log.read().await?;

            if entries.is_empty() {
                println!("{}", "  Log is empty".yellow());
                return Ok(());
            }

            for entry in entries.iter().take(limit) {
                println!(
                    "  {}  {:<17} {}",
                    entry
                        .timestamp
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                        .bright_black(),
                    entry.event_name.to_string().cyan(),
                    entry.payload
                );
            }

            println!();
            println!(
                "  Showing {} of {}",
                limit.min(entries.len()).to_string().bright_white().bold(),
                entries.len()
            );
            println!();
        }
        LogsAction::Clear { yes } => {
            if !yes && !confirm("Delete every log entry?")? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            state.event_log.clear().await?;
            println!("{}", "✅ Event log cleared".green().bold());
        }
    }

    Ok(())
}

async fn handle_store_action(action: StoreAction, state: &AppState, config: &Config) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!(
                "{}",
                format!("🔍 Checking {} store...", config.store_backend).bright_blue()
            );

            if state.store.health_check().await {
                println!("{}", "✅ Store OK".green().bold());
            } else {
                anyhow::bail!("Store is not reachable");
            }
        }
    }

    Ok(())
}

fn print_link(state: &AppState, link: &ShortLink) {
    println!("  Code:      {}", link.shortcode.cyan());
    println!(
        "  Short URL: {}",
        state.short_url(&link.shortcode).bright_yellow().bold()
    );
    println!("  Target:    {}", link.long_url);
    println!(
        "  Created:   {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
    );
    println!(
        "  Expires:   {} ({} min)",
        link.expire_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black(),
        link.validity_minutes()
    );
}

fn status_label(expired: bool) -> ColoredString {
    if expired {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
