use anyhow::Result;
use colored::Colorize;
use std::env;
use std::process;

use contract_scout::contract::normalizer::{decode_body, normalize_page};
use contract_scout::contract::processor::QUALIFYING_TERM;
use contract_scout::contract::{
    assign_parties, classify_service_type, extract_currency, extract_duration,
    extract_organizations, summarize, RawPage,
};
use contract_scout::environment::{self, Settings};
use contract_scout::logging;
use contract_scout::web::{HtmlFetcher, HttpFetcher};

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging(&environment::log_dir_from_env());
    let settings = Settings::from_env();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        return Ok(());
    }

    let target = &args[1];
    let from_file = args.iter().any(|arg| arg == "--file");

    println!("Testing contract extraction: {}", target);

    let page = if from_file {
        match std::fs::read(target) {
            Ok(bytes) => RawPage::new(target, bytes),
            Err(err) => {
                eprintln!("Failed to read {}: {}", target, err);
                process::exit(2);
            }
        }
    } else {
        let fetcher = HttpFetcher::new()?.with_timeout(settings.request_timeout);
        match fetcher.fetch(target).await {
            Ok(page) => page,
            Err(err) => {
                eprintln!("Failed to fetch page: {}", err);
                process::exit(2);
            }
        }
    };

    println!("\n{}", "═".repeat(100).bright_blue());
    println!(
        "{}  {}",
        "EXTRACTION DIAGNOSTICS".bright_blue(),
        target.bright_yellow()
    );
    println!("{}", "═".repeat(100).bright_blue());

    match page.content_type {
        Some(ref content_type) => println!("{}: {}", "Content-Type".bright_blue(), content_type),
        None => println!("{}: {}", "Content-Type".bright_blue(), "None".dimmed()),
    }
    println!("{}: {}", "Bytes".bright_blue(), page.html.len());
    println!(
        "{}: {}",
        "Decoded Characters".bright_blue(),
        decode_body(&page).chars().count()
    );

    let text = match normalize_page(&page) {
        Some(text) => text,
        None => {
            eprintln!("{}", "Page has no visible text".bright_red());
            process::exit(1);
        }
    };

    println!("{}: {}", "Title".bright_blue(), text.title.bright_white());
    println!("{}: {}", "Publication Date".bright_blue(), text.publication_date);

    println!("\n{}", "Text Preview".bright_blue());
    println!("{}", "─".repeat(80).dimmed());
    println!("{}", text.original.chars().take(500).collect::<String>());

    let qualifies = text.lowercase.contains(QUALIFYING_TERM);
    println!(
        "\n{}: {}",
        "Mentions \"contract\"".bright_blue(),
        if qualifies {
            "yes".bright_green()
        } else {
            "no".bright_red()
        }
    );

    println!("\n{}", "Extractors".bright_blue());
    println!("{}", "─".repeat(80).dimmed());
    print_field(
        "Estimated Value",
        extract_currency(&text.lowercase).map(|v| format!("${:.2}M", v)),
    );
    print_field(
        "Duration",
        extract_duration(&text.lowercase).map(|m| format!("{} months", m)),
    );

    let organizations = extract_organizations(&text.original);
    if organizations.is_empty() {
        print_field("Organizations", None);
    } else {
        println!("{}:", "Organizations".bright_magenta());
        for (i, name) in organizations.iter().enumerate() {
            println!("  {}. {}", i + 1, name);
        }
    }
    let (vendor, client) = assign_parties(&organizations);
    print_field("Vendor", vendor);
    print_field("Client", client);
    print_field(
        "Service Type",
        classify_service_type(&text.lowercase).map(str::to_string),
    );

    println!("\n{}", "Summary".bright_blue());
    println!("{}", "─".repeat(80).dimmed());
    println!("{}", summarize(&text.original, settings.summary_sentences));

    println!("\n{}", "═".repeat(100).bright_blue());

    if qualifies {
        println!("Page would produce a contract record");
        process::exit(0);
    } else {
        eprintln!("Page would be rejected: no mention of \"contract\"");
        process::exit(1);
    }
}

fn print_field(label: &str, value: Option<String>) {
    match value {
        Some(value) => println!("{}: {}", label.bright_magenta(), value.bright_white()),
        None => println!("{}: {}", label.bright_magenta(), "not found".dimmed()),
    }
}

// Print usage instructions
fn print_usage(program_name: &str) {
    println!("Usage: {} <url> [--file]", program_name);
    println!("\nOptions:");
    println!("  --file    Treat the argument as a local HTML file instead of a URL");
    println!("\nExamples:");
    println!("  {} https://www.example.com/news/contract-award", program_name);
    println!("  {} saved_page.html --file", program_name);
}
