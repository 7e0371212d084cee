use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::Client;
use tracing::{info, warn};

use marketlens::config::Config;
use marketlens::exa::ExaClient;
use marketlens::report::{FileStore, NullStore, ReportGenerator, ReportOutcome};
use marketlens::search::{ComprehensiveFilters, ContentsFlags, SearchService};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "marketlens", version, about = "Assemble analysis reports and run Exa searches")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a report from an analysis input JSON file
    Report {
        /// Path to the analysis input (a JSON object)
        #[arg(long)]
        input: PathBuf,
        /// Session identifier threaded into metadata and storage paths
        #[arg(long, default_value = "")]
        session: String,
        /// Report store root (overrides REPORT_STORE_DIR)
        #[arg(long)]
        store_dir: Option<PathBuf>,
        /// Do not persist the report
        #[arg(long)]
        no_save: bool,
    },
    /// Comprehensive neural search with basic-search fallback
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        num_results: u32,
        #[arg(long = "include-domain")]
        include_domains: Vec<String>,
        #[arg(long = "exclude-domain")]
        exclude_domains: Vec<String>,
        /// Crawl date lower bound (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        start_date: Option<String>,
        /// Crawl date upper bound (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        min_length: Option<usize>,
        #[arg(long)]
        max_length: Option<usize>,
    },
    /// Fetch contents for result ids
    Contents {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        highlights: bool,
        #[arg(long)]
        summary: bool,
    },
    /// Find pages similar to a URL
    Similar {
        url: String,
        #[arg(long, default_value_t = 10)]
        num_results: u32,
        /// Keep results from the source URL's own domain
        #[arg(long)]
        include_source_domain: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marketlens=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Report {
            input,
            session,
            store_dir,
            no_save,
        } => {
            let raw = std::fs::read_to_string(&input)?;
            let analysis: serde_json::Value = serde_json::from_str(&raw)?;
            let outcome = if no_save {
                ReportGenerator::new(NullStore).generate_complete_report(&analysis, &session)
            } else {
                let root = store_dir.unwrap_or(config.report.store_dir);
                info!(root = %root.display(), "saving report");
                ReportGenerator::new(FileStore::new(root))
                    .generate_complete_report(&analysis, &session)
            };
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if let ReportOutcome::Emergency(_) = outcome {
                std::process::exit(2);
            }
        }
        Command::Search {
            query,
            num_results,
            include_domains,
            exclude_domains,
            start_date,
            end_date,
            min_length,
            max_length,
        } => {
            let service = search_service(&config)?;
            let filters = ComprehensiveFilters {
                include_domains,
                exclude_domains,
                start_date,
                end_date,
                min_length,
                max_length,
            };
            let outcome = service
                .search_comprehensive(&query, num_results, &filters)
                .await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if !outcome.success {
                std::process::exit(1);
            }
        }
        Command::Contents {
            ids,
            highlights,
            summary,
        } => {
            let service = search_service(&config)?;
            let flags = ContentsFlags {
                text: true,
                highlights,
                summary,
            };
            let response = service
                .get_contents(&ids, &flags)
                .await
                .ok_or("contents request failed (see log)")?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Similar {
            url,
            num_results,
            include_source_domain,
        } => {
            let service = search_service(&config)?;
            let response = service
                .find_similar(&url, num_results, !include_source_domain)
                .await
                .ok_or("find_similar request failed (see log)")?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn search_service(config: &Config) -> Result<SearchService<ExaClient>, reqwest::Error> {
    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(config.exa.timeout)
        .build()?;
    let client = ExaClient::from_config(http, &config.exa)
        .inspect_err(|e| warn!("Exa client not available: {e}"))
        .ok();
    Ok(SearchService::new(client))
}
