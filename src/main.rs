// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing events go to stderr)
// 3. Load the page, check every link, build the report
// 4. Print the report (text or JSON) to stdout
// 5. Exit with proper code (0 = done, 1 = broken links with --fail-on-broken,
//    2 = the page could not be checked at all)
// =============================================================================

mod checker; // src/checker/ - link extraction and validation
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - runtime settings
mod error; // src/error.rs - error types
mod page; // src/page/ - loading the page and reading its DOM
mod pipeline; // src/pipeline.rs - load -> extract -> validate -> report
mod report; // src/report.rs - aggregating and printing results

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use checker::ReqwestProbe;
use cli::Cli;
use page::HttpPageLoader;
use report::LinkReport;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = report produced (broken links are informational by default)
//   Ok(1) = broken links found and --fail-on-broken was given
//   Err   = page load failure or bad configuration
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = cli.to_config();
    let loader = HttpPageLoader::new(&config)?;
    let probe = ReqwestProbe::new(&config.user_agent)?;

    let report = pipeline::check_page(&cli.url, &config, &loader, probe)
        .await
        .with_context(|| format!("could not check {}", cli.url))?;

    print_report(&report, cli.json)?;

    if cli.fail_on_broken && report.has_broken_links() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn print_report(report: &LinkReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for line in report.summary_lines() {
            println!("{}", line);
        }
    }
    Ok(())
}
