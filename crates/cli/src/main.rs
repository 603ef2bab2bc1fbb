//! Scout workflow driver
//!
//! Asks Reddit, web search and Twitter about one keyword (in that order),
//! through the proxy by default, and prints the combined result.

mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use scout_core::application::workflow::{WorkflowDriver, WorkflowReport};
use scout_daemon::config::{base_url, LogSettings};
use scout_daemon::{logging, ScoutConfig};
use scout_infra_http::HttpSearchGateway;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tabled::Table;
use tracing::info;

const KEYWORD_PROMPT: &str = "Enter the keyword to search: ";

#[derive(Parser)]
#[command(name = "scout-workflow")]
#[command(about = "Search Reddit, the web and Twitter for one keyword", long_about = None)]
#[command(version)]
struct Cli {
    /// Keyword to search (prompted for when omitted)
    #[arg(short, long)]
    keyword: Option<String>,

    /// Proxy URL (defaults to the configured `endpoints.proxy`)
    #[arg(long, env = "SCOUT_PROXY_URL")]
    proxy_url: Option<String>,

    /// Call the adapters at their configured addresses instead of the proxy
    #[arg(long)]
    direct: bool,

    /// Print the aggregate as JSON
    #[arg(long)]
    json: bool,

    /// Also print logs to stdout
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Explicit flag or env var, else the address the proxy is configured to listen on
    fn proxy_url(&self, config: &ScoutConfig) -> String {
        self.proxy_url
            .as_deref()
            .map(base_url)
            .unwrap_or_else(|| base_url(&config.endpoints.proxy))
    }

    fn gateway(&self, config: &ScoutConfig) -> HttpSearchGateway {
        if self.direct {
            let endpoints = &config.endpoints;
            HttpSearchGateway::new(
                base_url(&endpoints.reddit),
                base_url(&endpoints.twitter),
                base_url(&endpoints.web_search),
            )
        } else {
            HttpSearchGateway::via_proxy(self.proxy_url(config))
        }
    }
}

fn prompt_keyword() -> Result<String> {
    print!("{KEYWORD_PROMPT}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read keyword")?;
    Ok(line.trim().to_string())
}

fn print_report(report: &WorkflowReport) {
    println!();
    println!(
        "{}",
        format!("Results for \"{}\"", report.keyword).cyan().bold()
    );
    for section in &report.sections {
        println!();
        let header = format!("=== {} ===", section.source);
        if section.succeeded {
            println!("{}", header.green().bold());
            println!("{}", section.output.trim_end());
        } else {
            println!("{}", header.red().bold());
            println!("{}", section.output.red());
        }
    }
    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", Table::new(summary::rows(report)));
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ScoutConfig::load()?;
    let log_settings = LogSettings {
        console: cli.verbose,
        ..config.log.clone()
    };
    let _guard = logging::init("workflow", &log_settings)?;

    let gateway = cli.gateway(&config);
    info!(direct = cli.direct, proxy_url = %cli.proxy_url(&config), "Workflow driver starting");

    let keyword = match cli.keyword {
        Some(keyword) => keyword,
        None => prompt_keyword()?,
    };

    let driver = WorkflowDriver::new(Arc::new(gateway));
    let report = driver.run(&keyword).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    info!(failures = report.failures(), "Workflow driver finished");
    Ok(())
}
