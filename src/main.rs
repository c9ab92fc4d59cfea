use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use prettytable::{Cell, Row, Table};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::signal;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{error, info};

use contract_scout::contract::{ContractPageProcessor, PageOutcome, RawPage};
use contract_scout::environment::{self, Settings};
use contract_scout::logging;
use contract_scout::report::{self, ContractStats};
use contract_scout::saved_urls::{
    self, now_timestamp, JsonFileStore, SavedUrlEntry, SavedUrlRepository,
};
use contract_scout::web::{HttpFetcher, Scanner};

#[derive(Parser)]
#[command(author, version, about = "Find and structure IT contract announcements", long_about = None)]
struct Cli {
    /// Saved URL file (defaults to SCOUT_SAVED_URLS_PATH or saved_urls.json)
    #[arg(long, global = true)]
    saved_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch pages and extract contract records
    Scan {
        /// URLs to process (defaults to SCOUT_URLS when none are given)
        urls: Vec<String>,

        /// Also process every saved URL
        #[arg(long)]
        saved: bool,

        /// Write records to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write records to a JSON file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Keep records published on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Keep records published on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Pause between requests in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Number of sentences in each summary
        #[arg(long)]
        sentences: Option<usize>,
    },

    /// Run the extraction pipeline on a local HTML file
    Extract {
        /// HTML file to read
        file: PathBuf,

        /// URL to record as the page source
        #[arg(long)]
        url: Option<String>,
    },

    /// Manage the saved URL list
    Saved {
        #[command(subcommand)]
        action: SavedCommand,
    },
}

#[derive(Subcommand)]
enum SavedCommand {
    /// Show all saved URLs
    List,

    /// Save a URL
    Add {
        url: String,

        /// Short description of the source
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Remove a saved URL
    Remove { url: String },

    /// Import URLs from a file with one URL per line
    Import {
        file: PathBuf,

        /// Read URLs from the first column of a CSV file instead
        #[arg(long)]
        csv: bool,

        /// Description given to every imported URL
        #[arg(short, long, default_value = "Imported")]
        description: String,
    },

    /// Export the saved list as JSON (to stdout when no file is given)
    Export { file: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::configure_logging(&environment::log_dir_from_env());
    let mut settings = Settings::from_env();

    if let Some(path) = cli.saved_file {
        settings.saved_urls_path = path;
    }

    match cli.command {
        Commands::Scan {
            urls,
            saved,
            csv,
            json,
            from,
            to,
            delay_ms,
            timeout_secs,
            sentences,
        } => {
            if let Some(ms) = delay_ms {
                settings.request_delay = Duration::from_millis(ms);
            }
            if let Some(secs) = timeout_secs {
                settings.request_timeout = Duration::from_secs(secs);
            }
            if let Some(n) = sentences {
                settings.summary_sentences = n;
            }
            let options = ScanOptions {
                saved,
                csv,
                json,
                from,
                to,
            };
            run_scan(&settings, urls, options).await
        }
        Commands::Extract { file, url } => run_extract(&settings, &file, url),
        Commands::Saved { action } => {
            let mut store = JsonFileStore::new(&settings.saved_urls_path);
            run_saved(&mut store, action)
        }
    }
}

struct ScanOptions {
    saved: bool,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

async fn run_scan(settings: &Settings, mut urls: Vec<String>, options: ScanOptions) -> Result<()> {
    if urls.is_empty() && !options.saved {
        urls = settings.urls.clone();
    }
    if options.saved {
        let store = JsonFileStore::new(&settings.saved_urls_path);
        let entries = store
            .load()
            .with_context(|| format!("Failed to load saved URLs from {}", store.path().display()))?;
        urls.extend(entries.into_iter().map(|e| e.url));
    }
    if urls.is_empty() {
        bail!("No URLs to scan: pass URLs, use --saved, or set SCOUT_URLS");
    }

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_err() {
            error!("Failed to listen for ctrl-c");
            return;
        }
        info!("Ctrl-C received, stopping after the current page");
        let _ = cancel_tx.send(true);
    });

    let fetcher = HttpFetcher::new()
        .context("Failed to create HTTP client")?
        .with_timeout(settings.request_timeout);
    let processor = ContractPageProcessor::new().with_summary_sentences(settings.summary_sentences);
    let scanner = Scanner::new(&fetcher)
        .with_processor(processor)
        .with_request_delay(settings.request_delay);

    println!("Scanning {} URLs...", urls.len().to_string().bright_yellow());
    let scan = scanner.scan(&urls, &cancel_rx).await;

    println!(
        "{} attempted, {} extracted, {} unreachable, {} empty, {} without a contract mention",
        scan.attempted,
        scan.extracted().to_string().bright_green(),
        scan.unreachable.to_string().bright_red(),
        scan.empty,
        scan.unqualified
    );
    if scan.cancelled {
        println!("{}", "Scan cancelled before all URLs were processed".bright_yellow());
    }

    let records = report::filter_by_date_range(scan.records, options.from, options.to);
    if records.is_empty() {
        println!(
            "{}",
            "No qualifying contract announcements found.".bright_yellow()
        );
        return Ok(());
    }

    println!(
        "\n{}",
        format!("Found {} qualifying contract announcements", records.len()).bright_green()
    );
    report::print_table(&records);

    let stats = ContractStats::from_records(&records);
    println!("\n{}", "Summary".bright_blue());
    println!("{}", "─".repeat(40).dimmed());
    println!("{:<24} {}", "Total Contract Value", stats.total_value_display());
    println!("{:<24} {}", "Avg Duration", stats.average_duration_display());
    println!("{:<24} {}", "Service Types", stats.service_types);
    println!("{:<24} {}", "Unique Vendors", stats.vendors);

    let breakdown = report::service_type_breakdown(&records);
    if !breakdown.is_empty() {
        println!("\n{}", "Service Type Breakdown".bright_blue());
        println!("{}", "─".repeat(40).dimmed());
        for (service, count) in breakdown {
            println!("{:<24} {} {}", service, "█".repeat(count).bright_cyan(), count);
        }
    }

    if let Some(path) = options.csv {
        let path = if path.is_dir() {
            path.join(report::default_csv_filename(&Local::now()))
        } else {
            path
        };
        let csv = report::export_csv(&records)?;
        write_output(&path, &csv)?;
        println!("CSV written to {}", path.display().to_string().bright_yellow());
    }
    if let Some(path) = options.json {
        let json = report::export_records_json(&records)?;
        write_output(&path, &json)?;
        println!("JSON written to {}", path.display().to_string().bright_yellow());
    }

    Ok(())
}

fn run_extract(settings: &Settings, file: &Path, url: Option<String>) -> Result<()> {
    let html = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let url = url.unwrap_or_else(|| file.display().to_string());
    let page = RawPage::new(&url, html);

    let processor = ContractPageProcessor::new().with_summary_sentences(settings.summary_sentences);
    match processor.evaluate_page(&url, &page) {
        PageOutcome::Extracted(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        PageOutcome::Rejected(reason) => {
            println!("{}: {}", "No contract record".bright_red(), reason);
        }
    }
    Ok(())
}

fn run_saved<R: SavedUrlRepository>(store: &mut R, action: SavedCommand) -> Result<()> {
    match action {
        SavedCommand::List => {
            let entries = store.load().context("Failed to load saved URLs")?;
            if entries.is_empty() {
                println!("No saved URLs.");
                return Ok(());
            }
            let mut table = Table::new();
            table.add_row(Row::new(vec![
                Cell::new("URL"),
                Cell::new("Description"),
                Cell::new("Added"),
            ]));
            for entry in &entries {
                table.add_row(Row::new(vec![
                    Cell::new(&entry.url),
                    Cell::new(&entry.description),
                    Cell::new(&entry.added_at),
                ]));
            }
            table.printstd();
        }

        SavedCommand::Add { url, description } => {
            if store.save(SavedUrlEntry::new(&url, &description))? {
                println!("{} {}", "Saved".bright_green(), url);
            } else {
                println!("{} {}", "Already saved:".bright_yellow(), url);
            }
        }

        SavedCommand::Remove { url } => {
            if store.remove(&url)? {
                println!("{} {}", "Removed".bright_green(), url);
            } else {
                println!("{} {}", "Not found:".bright_yellow(), url);
            }
        }

        SavedCommand::Import {
            file,
            csv,
            description,
        } => {
            let data = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let stamp = now_timestamp();
            let entries = if csv {
                saved_urls::import_csv_first_column(&data, &description, &stamp)?
            } else {
                saved_urls::import_lines(&data, &description, &stamp)
            };

            let found = entries.len();
            let mut added = 0;
            for entry in entries {
                if store.save(entry)? {
                    added += 1;
                }
            }
            println!(
                "Imported {} new URLs ({} found, {} already saved)",
                added.to_string().bright_green(),
                found,
                found - added
            );
        }

        SavedCommand::Export { file } => {
            let entries = store.load().context("Failed to load saved URLs")?;
            let json = saved_urls::export_json(&entries)?;
            match file {
                Some(path) => {
                    write_output(&path, &json)?;
                    println!("Exported {} URLs to {}", entries.len(), path.display());
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
