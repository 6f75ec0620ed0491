//! Scout: find and rank X influencers for promo campaigns

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use scout::aggregator::AuthorTable;
use scout::analyzer::ranking::sort_by_reach;
use scout::config::{default_config_json, load_config, Config, CONFIG_FILENAME};
use scout::reporter::csv_report::{
    read_recommendations, write_influencers, write_recommendations, INFLUENCERS_FILENAME,
    RECOMMENDATIONS_FILENAME,
};
use scout::reporter::console::DEFAULT_TOP;
use scout::reporter::html::HTML_FILENAME;
use scout::reporter::{ConsoleReporter, HtmlReporter, InfluencerRow, JsonReporter, RecommendationRow};
use scout::search::{run_queries, Credentials, QueryOutcome, SearchOptions, XClient};
use scout::{assess_authors, AuthorRecord};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Scout: find and rank X influencers by engagement
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (default: search .scoutrc.json in current dir and parents)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for generated reports (default: config outputDir or current dir)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Maximum result pages fetched per query
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// Quiet mode (no progress or tables)
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Verbose output (info-level diagnostics)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search tracked keywords and write influencers.csv ranked by reach
    Find {
        /// Authors listed in the console table
        #[arg(long, default_value_t = DEFAULT_TOP as u64, value_parser = clap::value_parser!(u64).range(1..))]
        top: u64,
    },

    /// Search, classify authors and write recommendations.csv + recommendations.html
    Analyze {
        /// Print a JSON summary instead of the console table
        #[arg(long)]
        json: bool,

        /// Skip writing recommendations.html
        #[arg(long)]
        no_html: bool,
    },

    /// Render recommendations.html from an existing recommendations.csv (no network)
    Export {
        /// CSV to read (default: recommendations.csv in the output dir)
        #[arg(long)]
        input: Option<PathBuf>,

        /// HTML file to write (default: recommendations.html next to the input)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create .scoutrc.json with the default queries and thresholds
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    scout::logger::init(args.verbose);

    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    if let Commands::Init { dir } = &args.command {
        return run_init(dir.as_deref().unwrap_or(&cwd), args.max_pages);
    }

    // Load config (CLI flags override config file)
    let config = load_config(&cwd, args.config.as_deref())?
        .merge_with_cli(args.max_pages, args.output_dir.clone());

    match &args.command {
        Commands::Find { top } => run_find(&config, *top as usize, args.quiet),
        Commands::Analyze { json, no_html } => run_analyze(&config, args.quiet, *json, *no_html),
        Commands::Export { input, output } => {
            run_export(&config, input.as_deref(), output.as_deref(), args.quiet)
        }
        Commands::Init { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn run_find(config: &Config, top: usize, quiet: bool) -> Result<ExitCode> {
    let mut authors = search_authors(config, quiet)?;
    sort_by_reach(&mut authors);

    let out_dir = prepare_output_dir(config)?;
    let csv_path = out_dir.join(INFLUENCERS_FILENAME);
    let rows: Vec<InfluencerRow> = authors
        .iter()
        .map(|a| InfluencerRow::from_author(a, config.profile_base_url()))
        .collect();
    write_influencers(&csv_path, &rows)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;

    if !quiet {
        ConsoleReporter::new().top(top).report_find(&authors, &csv_path);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_analyze(config: &Config, quiet: bool, json: bool, no_html: bool) -> Result<ExitCode> {
    let authors = search_authors(config, quiet)?;
    let assessments = assess_authors(authors, config);

    let out_dir = prepare_output_dir(config)?;
    let csv_path = out_dir.join(RECOMMENDATIONS_FILENAME);
    let rows: Vec<RecommendationRow> = assessments
        .iter()
        .map(|a| RecommendationRow::from_assessment(a, config.profile_base_url()))
        .collect();
    write_recommendations(&csv_path, &rows)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;

    let mut outputs = vec![csv_path.clone()];
    if !no_html {
        let html_path = out_dir.join(HTML_FILENAME);
        let html = HtmlReporter::new()
            .subtitle(query_labels(config))
            .profile_base_url(config.profile_base_url())
            .report(&rows);
        std::fs::write(&html_path, html)
            .with_context(|| format!("Failed to write {}", html_path.display()))?;
        outputs.push(html_path);
    }

    if json {
        println!("{}", JsonReporter::new().pretty().report(&assessments));
    } else if !quiet {
        let paths: Vec<&Path> = outputs.iter().map(PathBuf::as_path).collect();
        ConsoleReporter::new().report_recommendations(&assessments, &paths);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_export(
    config: &Config,
    input: Option<&Path>,
    output: Option<&Path>,
    quiet: bool,
) -> Result<ExitCode> {
    let input = input
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_dir().join(RECOMMENDATIONS_FILENAME));
    let output = output.map(Path::to_path_buf).unwrap_or_else(|| {
        input
            .parent()
            .unwrap_or(Path::new("."))
            .join(HTML_FILENAME)
    });

    let rows = read_recommendations(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let html = HtmlReporter::new()
        .subtitle(query_labels(config))
        .profile_base_url(config.profile_base_url())
        .report(&rows);
    std::fs::write(&output, html)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if !quiet {
        eprintln!(
            "{}: Wrote {} ({} authors)",
            "Done".green().bold(),
            output.display(),
            rows.len()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn run_init(dir: &Path, max_pages: Option<u32>) -> Result<ExitCode> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let json = default_config_json(max_pages)?;
    std::fs::write(&config_path, json)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with the default queries and thresholds",
        "Done".green().bold(),
        config_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Authenticate, run every configured query and fold the results into author records
fn search_authors(config: &Config, quiet: bool) -> Result<Vec<AuthorRecord>> {
    let credentials = Credentials::from_env()?;
    let client = XClient::connect(
        config.api_base_url(),
        &credentials,
        config.effective_max_results(),
    )
    .context("Failed to authenticate with the X API")?;

    let queries = config.effective_queries();
    let options = SearchOptions::from_config(config);
    let results = run_queries(&client, &queries, &options, |outcome| {
        report_outcome(outcome, quiet)
    })?;

    if results.all_failed() {
        anyhow::bail!("All {} queries failed; no data collected", queries.len());
    }

    let table = AuthorTable::build(
        &results.tweets,
        &results.users,
        config.effective_sample_limit(),
    );
    if table.skipped() > 0 {
        log::warn!(
            "Skipped {} tweets without a matching author",
            table.skipped()
        );
    }
    Ok(table.into_records())
}

fn report_outcome(outcome: &QueryOutcome, quiet: bool) {
    if !quiet {
        eprintln!(
            "{}: {}: {} tweets, {} unique authors ({} pages)",
            "Info".blue(),
            outcome.label,
            outcome.tweets.len(),
            outcome.unique_authors(),
            outcome.pages_fetched
        );
    }
    if outcome.pages_skipped > 0 {
        eprintln!(
            "{}: {}: skipped {} malformed page(s)",
            "Warning".yellow(),
            outcome.label,
            outcome.pages_skipped
        );
    }
    if let Some(reason) = &outcome.aborted {
        eprintln!(
            "{}: {}: query abandoned: {}",
            "Warning".yellow(),
            outcome.label,
            reason
        );
    }
}

fn prepare_output_dir(config: &Config) -> Result<PathBuf> {
    let dir = config.output_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    Ok(dir)
}

fn query_labels(config: &Config) -> String {
    config
        .effective_queries()
        .iter()
        .map(|q| q.label.as_str())
        .collect::<Vec<_>>()
        .join(" & ")
}
