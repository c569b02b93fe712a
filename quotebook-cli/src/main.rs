//! quotebook-cli: command-line client for the Quotebook HTTP API
//!
//! # Subcommands
//! - `random [--category <slug>]`  draw one quote
//! - `list [--category <slug>]`    list quotes
//! - `get <id>`                    show one quote
//! - `add <quote> [--author] [--category]`
//! - `thinkers`                    list thinkers
//! - `status`                      show server health

use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

/// Category slugs as they appear in `/quotes/<slug>`. Must stay in step with
/// `quotebook_core::Category`; `test_categories_match_server_table` pins them.
const CATEGORIES: [&str; 6] = [
    "ancient",
    "enlightenment",
    "modern",
    "artists",
    "entrepreneurs",
    "scientists",
];

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "quotebook-cli", version, about = "Quotebook command-line client")]
struct Cli {
    /// Quotebook HTTP server URL (overrides QUOTEBOOK_URL env var)
    #[arg(long, env = "QUOTEBOOK_URL", default_value = DEFAULT_SERVER)]
    server: String,

    /// Print raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Draw a random quote
    Random {
        #[arg(short, long, value_parser = CATEGORIES)]
        category: Option<String>,
    },

    /// List quotes, optionally restricted to one category
    List {
        #[arg(short, long, value_parser = CATEGORIES)]
        category: Option<String>,
    },

    /// Show a single quote by id
    Get { id: String },

    /// Store a new quote
    Add {
        quote: String,

        #[arg(short, long)]
        author: Option<String>,

        #[arg(short, long, value_parser = CATEGORIES)]
        category: Option<String>,
    },

    /// List thinkers
    Thinkers,

    /// Show Quotebook server status
    Status,
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinker: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThinkerRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddQuoteBody<'a> {
    quote: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

// ============================================================================
// Formatting
// ============================================================================

/// Stored category name for a slug: "ancient" -> "Ancient".
pub fn category_name(slug: &str) -> String {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Two-line rendering: quoted text, then attribution and category.
pub fn format_quote(q: &QuoteRecord) -> String {
    let text = q.quote.as_deref().unwrap_or("(no text)");
    let author = q.author.as_deref().unwrap_or("Unknown");
    match q.category.as_deref() {
        Some(category) => format!("\"{}\"\n    - {} [{}]", text, author, category),
        None => format!("\"{}\"\n    - {}", text, author),
    }
}

pub fn format_thinker(t: &ThinkerRecord) -> String {
    let name = t.name.as_deref().unwrap_or("(unnamed)");
    match t.discipline.as_deref() {
        Some(discipline) => format!("{}  {} ({})", t.id, name, discipline),
        None => format!("{}  {}", t.id, name),
    }
}

/// Path for a listing, with or without a category segment.
pub fn list_path(category: Option<&str>) -> String {
    match category {
        Some(slug) => format!("/quotes/{}", slug),
        None => "/quotes".to_string(),
    }
}

pub fn random_path(category: Option<&str>) -> String {
    match category {
        Some(slug) => format!("/quotes/{}/random", slug),
        None => "/quotes/random".to_string(),
    }
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client() -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?)
}

/// Read the `error` field of a failed response, falling back to the raw body.
fn error_message(resp: reqwest::blocking::Response) -> String {
    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(v) if v["error"].is_string() => {
            format!("{} ({})", v["error"].as_str().unwrap_or_default(), status)
        }
        _ => format!("server returned {}: {}", status, body),
    }
}

fn print_output<T: Serialize>(value: &T, json: bool, render: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", render(value));
    }
    Ok(())
}

fn do_random(server: &str, category: Option<&str>, json: bool) -> anyhow::Result<()> {
    let url = format!("{}{}", server, random_path(category));
    let resp = client()?.get(&url).send()?;

    match resp.status() {
        StatusCode::NO_CONTENT => {
            eprintln!("No quotes to choose from.");
            Ok(())
        }
        s if s.is_success() => {
            let quote: QuoteRecord = resp.json()?;
            print_output(&quote, json, format_quote)
        }
        _ => anyhow::bail!(error_message(resp)),
    }
}

fn do_list(server: &str, category: Option<&str>, json: bool) -> anyhow::Result<()> {
    let url = format!("{}{}", server, list_path(category));
    let resp = client()?.get(&url).send()?;
    if !resp.status().is_success() {
        anyhow::bail!(error_message(resp));
    }

    let quotes: Vec<QuoteRecord> = resp.json()?;
    if quotes.is_empty() && !json {
        eprintln!("No quotes found.");
        return Ok(());
    }
    print_output(&quotes, json, |qs| {
        qs.iter()
            .map(|q| format!("{}\n{}", q.id, format_quote(q)))
            .collect::<Vec<_>>()
            .join("\n\n")
    })
}

fn do_get(server: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let url = format!("{}/quotes/{}", server, id);
    let resp = client()?.get(&url).send()?;
    if !resp.status().is_success() {
        anyhow::bail!(error_message(resp));
    }

    let quote: QuoteRecord = resp.json()?;
    print_output(&quote, json, format_quote)
}

fn do_add(
    server: &str,
    quote: &str,
    author: Option<&str>,
    category: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let url = format!("{}/quotes", server);
    let body = AddQuoteBody {
        quote,
        author,
        category: category.map(category_name),
    };
    let resp = client()?.post(&url).json(&body).send()?;
    if !resp.status().is_success() {
        anyhow::bail!(error_message(resp));
    }

    let created: QuoteRecord = resp.json()?;
    print_output(&created, json, |q| format!("Created {}", q.id))
}

fn do_thinkers(server: &str, json: bool) -> anyhow::Result<()> {
    let url = format!("{}/thinkers", server);
    let resp = client()?.get(&url).send()?;
    if !resp.status().is_success() {
        anyhow::bail!(error_message(resp));
    }

    let thinkers: Vec<ThinkerRecord> = resp.json()?;
    print_output(&thinkers, json, |ts| {
        ts.iter().map(format_thinker).collect::<Vec<_>>().join("\n")
    })
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let url = format!("{}/health", server);

    match client()?.get(&url).send() {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Quotebook server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:          {}", body["version"].as_str().unwrap_or("?"));
            println!("Storage:          {}", body["storage"].as_str().unwrap_or("?"));
            Ok(())
        }
        Ok(r) => anyhow::bail!("server unhealthy (HTTP {})", r.status()),
        Err(e) => anyhow::bail!("cannot reach {}: {}", url, e),
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Random { category } => do_random(&server, category.as_deref(), cli.json),
        Commands::List { category } => do_list(&server, category.as_deref(), cli.json),
        Commands::Get { id } => do_get(&server, &id, cli.json),
        Commands::Add {
            quote,
            author,
            category,
        } => do_add(
            &server,
            &quote,
            author.as_deref(),
            category.as_deref(),
            cli.json,
        ),
        Commands::Thinkers => do_thinkers(&server, cli.json),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("quotebook-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
