//! Command-line interface for the harvester.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{ClientConfig, DEFAULT_PAGE_SIZE};
use crate::error::Result;
use crate::harvester::{convert_file, harvest, HarvestRequest};
use crate::output::generate_json;
use crate::session::SearchSession;

/// LexML Harvester - Search Brazilian legislation over SRU and convert results.
#[derive(Parser)]
#[command(name = "lexml-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log progress notices (sets the default log level to info)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Page through all results of a CQL query and save each page as XML.
    Search {
        /// CQL query (e.g., "date=2019")
        query: String,

        /// First record to request (1-based)
        #[arg(long, default_value_t = 1)]
        start: u64,

        /// Records per page
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u64,

        /// Stop after this many pages (at least 1)
        #[arg(long)]
        max_pages: Option<NonZeroUsize>,

        /// Output directory (default: results/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base name of saved files (default: lexml_<today>)
        #[arg(short, long)]
        name: Option<String>,

        /// SRU endpoint to query instead of the LexML default
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Fetch a single page and print its counts.
    Fetch {
        /// CQL query
        query: String,

        /// First record to request (1-based)
        #[arg(long, default_value_t = 1)]
        start: u64,

        /// Records per page
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u64,

        /// SRU endpoint to query instead of the LexML default
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Convert a saved result page to JSON records.
    Convert {
        /// Saved XML page
        input: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip items with missing fields instead of failing
        #[arg(long)]
        lenient: bool,
    },
}

/// Run an already parsed command line.
pub fn run_with(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search {
            query,
            start,
            page_size,
            max_pages,
            output,
            name,
            base_url,
        } => {
            let mut config = client_config(base_url);
            if let Some(max_pages) = max_pages {
                config = config.with_max_pages(max_pages.get());
            }
            let name = name.unwrap_or_else(default_base_filename);
            let output = output.unwrap_or_else(|| PathBuf::from("results"));
            search_command(&query, start, page_size, &output, &name, config)
        }
        Commands::Fetch {
            query,
            start,
            page_size,
            base_url,
        } => fetch_command(&query, start, page_size, client_config(base_url)),
        Commands::Convert {
            input,
            output,
            lenient,
        } => convert_command(&input, output.as_deref(), lenient),
    }
}

fn client_config(base_url: Option<String>) -> ClientConfig {
    let config = ClientConfig::from_env();
    match base_url {
        Some(url) => config.with_base_url(url),
        None => config,
    }
}

/// Base filename derived from today's date.
fn default_base_filename() -> String {
    format!("lexml_{}", chrono::Local::now().format("%Y-%m-%d"))
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Execute the search command.
fn search_command(
    query: &str,
    start: u64,
    page_size: u64,
    output: &Path,
    name: &str,
    config: ClientConfig,
) -> Result<()> {
    println!(
        "{} {} ({} records per page)",
        style("Searching").bold(),
        style(query).cyan(),
        style(page_size).green()
    );
    println!();

    let pb = spinner("Fetching pages...");
    let request = HarvestRequest {
        query,
        start_record: start,
        page_size,
        output_dir: output,
        base_filename: name,
    };
    let report = harvest(&request, config);
    pb.finish_and_clear();
    let report = report?;

    let summary = report.summary;
    println!(
        "  Total records: {}",
        summary
            .total_count
            .map_or_else(|| "unknown".to_string(), |t| t.to_string())
    );
    println!("  Pages fetched: {}", summary.pages_fetched);
    if !summary.completed {
        println!(
            "  {}",
            style("Page limit reached before all records were fetched").yellow().bold()
        );
    }

    println!();
    println!(
        "{} {} file(s) in {}",
        style("Saved").green().bold(),
        report.files.len(),
        output.display()
    );

    Ok(())
}

/// Execute the fetch command.
fn fetch_command(query: &str, start: u64, page_size: u64, config: ClientConfig) -> Result<()> {
    let mut session = SearchSession::with_config(query, config)?;

    let pb = spinner("Fetching page...");
    let outcome = session.fetch_page(start, page_size);
    pb.finish_and_clear();
    let outcome = outcome?;

    println!("  Total records: {}", outcome.page.number_of_records());
    println!("  Records in page: {}", outcome.page.records_returned());
    println!("  Next start record: {}", outcome.next_start_record);

    Ok(())
}

/// Execute the convert command.
fn convert_command(input: &Path, output: Option<&Path>, lenient: bool) -> Result<()> {
    let (records, warnings) = convert_file(input, output, lenient)?;

    for warning in &warnings {
        eprintln!("{} {warning}", style("Skipped:").yellow());
    }

    match output {
        Some(path) => println!(
            "{} {} record(s) to {}",
            style("Saved").green().bold(),
            records.len(),
            path.display()
        ),
        None => print!("{}", generate_json(&records)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_search() {
        let cli = Cli::parse_from(["lexml-harvester", "search", "date=2019"]);

        let Commands::Search {
            query,
            start,
            page_size,
            max_pages,
            output,
            name,
            base_url,
        } = cli.command
        else {
            panic!("expected search command");
        };
        assert_eq!(query, "date=2019");
        assert_eq!(start, 1);
        assert_eq!(page_size, DEFAULT_PAGE_SIZE);
        assert!(max_pages.is_none());
        assert!(output.is_none());
        assert!(name.is_none());
        assert!(base_url.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_search_with_options() {
        let cli = Cli::parse_from([
            "lexml-harvester",
            "search",
            "tipoDocumento = Lei",
            "--page-size",
            "10",
            "--max-pages",
            "3",
            "--name",
            "leis",
            "-v",
        ]);

        let Commands::Search {
            query,
            page_size,
            max_pages,
            name,
            ..
        } = cli.command
        else {
            panic!("expected search command");
        };
        assert_eq!(query, "tipoDocumento = Lei");
        assert_eq!(page_size, 10);
        assert_eq!(max_pages.map(NonZeroUsize::get), Some(3));
        assert_eq!(name, Some("leis".to_string()));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_zero_max_pages() {
        let result = Cli::try_parse_from([
            "lexml-harvester",
            "search",
            "date=2019",
            "--max-pages",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_convert() {
        let cli = Cli::parse_from(["lexml-harvester", "convert", "0_leis.xml", "--lenient"]);

        let Commands::Convert {
            input,
            output,
            lenient,
        } = cli.command
        else {
            panic!("expected convert command");
        };
        assert_eq!(input, PathBuf::from("0_leis.xml"));
        assert!(output.is_none());
        assert!(lenient);
    }

    #[test]
    fn test_default_base_filename() {
        let name = default_base_filename();
        assert!(name.starts_with("lexml_"));
        assert!(crate::config::validate_base_filename(&name).is_ok());
    }
}
