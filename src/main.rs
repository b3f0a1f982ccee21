use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use prio_bro::config::Config;
use prio_bro::features::{self, LoadedFeatures, ScoringReport};
use prio_bro::scoring::Model;
use prio_bro::suggest::{suggest_best_effort, HttpSuggester, SuggestionOutcome};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Aligned table for reading
    #[default]
    Table,
    /// Same bytes as the export file
    Csv,
    /// Tab-separated, no header, for scripting
    Tsv,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every feature in a YAML/JSON feature file and print the results
    Score {
        /// Feature file (.yaml, .yml or .json)
        file: PathBuf,

        /// Rank rows by priority instead of file order
        #[arg(long)]
        sort: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also write the CSV export to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip range checks (what-if scoring with out-of-range inputs)
        #[arg(long)]
        no_validate: bool,
    },
    /// Enter features interactively; each one is scored as soon as it is entered
    Session {
        /// Preselect a model (rice, moscow, value_vs_effort, kano, ice, weighted_scoring)
        #[arg(short, long, value_parser = parse_model)]
        model: Option<Model>,
    },
    /// Score a feature file and write prioritization_results.csv
    Export {
        file: PathBuf,

        /// Export path (defaults to config export_path, then prioritization_results.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rank rows by priority instead of file order
        #[arg(long)]
        sort: bool,
    },
    /// Browse scored features in a terminal UI
    View { file: PathBuf },
    /// List the prioritization models, their inputs and ranges
    Models,
    /// Ask the suggestion service which model fits a set of features
    Suggest {
        /// Feature file whose descriptions are sent
        #[arg(required_unless_present = "description", conflicts_with = "description")]
        file: Option<PathBuf>,

        /// Feature description (repeatable)
        #[arg(short, long)]
        description: Vec<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "prio-bro")]
#[command(about = "Feature prioritization scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/prio-bro/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_model(s: &str) -> Result<Model, String> {
    Model::parse(s).ok_or_else(|| {
        let tags: Vec<&str> = Model::ALL.iter().map(|m| m.tag()).collect();
        format!("unknown model '{}' (expected one of: {})", s, tags.join(", "))
    })
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "prio_bro=debug" } else { "prio_bro=warn" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    // Logs go to stderr so stdout stays clean for tables and CSV
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(prio_bro::stderr_buffer::writer))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        tracing::debug!("rustls crypto provider already installed");
    }

    let config_path = cli.config.map(PathBuf::from);
    let config = match prio_bro::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = prio_bro::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let code = match cli.command {
        Commands::Score {
            file,
            sort,
            format,
            output,
            no_validate,
        } => cmd_score(&file, sort || config.sort, format, output, !no_validate),
        Commands::Session { model } => cmd_session(&config, model).await,
        Commands::Export { file, output, sort } => {
            cmd_export(&config, &file, output, sort || config.sort)
        }
        Commands::View { file } => cmd_view(&config, &file).await,
        Commands::Models => {
            println!(
                "{}",
                prio_bro::output::format_model_catalogue(prio_bro::output::should_use_colors())
            );
            EXIT_SUCCESS
        }
        Commands::Suggest { file, description } => cmd_suggest(&config, file, description).await,
    };

    std::process::exit(code);
}

/// Load a feature file and score it, reporting skipped features on stderr.
///
/// Returns the exit code to use when there is nothing to show.
fn load_and_score(file: &Path, validate: bool) -> Result<(LoadedFeatures, ScoringReport), i32> {
    let start_time = Instant::now();

    let loaded = match features::load_features(file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            return Err(EXIT_INPUT);
        }
    };

    let report = features::score_loaded(&loaded, validate);

    if report.has_errors() {
        eprintln!("Skipped features:");
        for error in &report.errors {
            eprintln!("  - {}", error);
        }
    }

    tracing::debug!(
        "Scored {}/{} features in {:?}",
        report.table.len(),
        loaded.total(),
        start_time.elapsed()
    );

    if loaded.total() > 0 && report.table.is_empty() {
        eprintln!("No feature could be scored.");
        return Err(EXIT_INPUT);
    }

    Ok((loaded, report))
}

fn cmd_score(
    file: &Path,
    sort: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
    validate: bool,
) -> i32 {
    let (_, report) = match load_and_score(file, validate) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let table = report.table;

    match format {
        OutputFormat::Table => {
            let rows = table.view(sort);
            let use_colors = prio_bro::output::should_use_colors();
            println!("{}", prio_bro::output::format_results_table(&rows, use_colors));
        }
        OutputFormat::Csv => {
            let text = if sort {
                table.to_ranked_delimited_text()
            } else {
                table.to_delimited_text()
            };
            match text {
                Ok(t) => print!("{}", t),
                Err(e) => {
                    eprintln!("Failed to format CSV: {:#}", e);
                    return EXIT_IO;
                }
            }
        }
        OutputFormat::Tsv => {
            let rows = table.view(sort);
            if !rows.is_empty() {
                println!("{}", prio_bro::output::format_tsv(&rows));
            }
        }
    }

    if let Some(path) = output {
        if let Err(e) = prio_bro::export::write_csv(&path, &table, sort) {
            eprintln!("Export failed: {:#}", e);
            return EXIT_IO;
        }
        eprintln!("Results written to {}", path.display());
    }

    EXIT_SUCCESS
}

fn cmd_export(config: &Config, file: &Path, output: Option<PathBuf>, sort: bool) -> i32 {
    let (_, report) = match load_and_score(file, true) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let path = prio_bro::export::resolve_export_path(output, config);
    if let Err(e) = prio_bro::export::write_csv(&path, &report.table, sort) {
        eprintln!("Export failed: {:#}", e);
        return EXIT_IO;
    }

    println!("Wrote {} rows to {}", report.table.len(), path.display());
    EXIT_SUCCESS
}

/// Build the HTTP suggester when a `suggest` section is configured.
fn build_suggester(config: &Config) -> Option<HttpSuggester> {
    let suggest_config = config.suggest.as_ref()?;
    match HttpSuggester::from_config(suggest_config) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!("Suggestions disabled: {:#}", e);
            None
        }
    }
}

async fn cmd_session(config: &Config, model: Option<Model>) -> i32 {
    let suggester = build_suggester(config);
    let stdin = std::io::stdin();
    let mut prompter = features::session::Prompter::new(stdin.lock(), std::io::stdout());

    let result = features::run_session(
        &mut prompter,
        config,
        model,
        suggester.as_ref().map(|s| (s, s.timeout())),
    )
    .await;

    match result {
        Ok(outcome) => {
            tracing::debug!("Session finished with {} features", outcome.table.len());
            // The session already told the user why the export failed
            if outcome.export_error.is_some() {
                EXIT_IO
            } else {
                EXIT_SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Session error: {:#}", e);
            EXIT_INPUT
        }
    }
}

async fn cmd_view(config: &Config, file: &Path) -> i32 {
    let (loaded, report) = match load_and_score(file, true) {
        Ok(r) => r,
        Err(code) => return code,
    };

    // Theme detection queries the terminal, so it runs before the TUI starts
    let theme = prio_bro::tui::resolve_theme(config.theme);
    let app = prio_bro::tui::App::new(
        report.table,
        features::descriptions(loaded.inputs()),
        config.sort,
        prio_bro::export::resolve_export_path(None, config),
        theme,
    )
    .with_source(file.display().to_string());

    if let Err(e) = prio_bro::tui::run_tui(app, build_suggester(config)).await {
        eprintln!("Terminal error: {:#}", e);
        return EXIT_IO;
    }
    EXIT_SUCCESS
}

async fn cmd_suggest(config: &Config, file: Option<PathBuf>, description: Vec<String>) -> i32 {
    let descriptions = match file {
        Some(path) => match features::load_features(&path) {
            Ok(loaded) => features::descriptions(loaded.inputs()),
            Err(e) => {
                eprintln!("Input error: {:#}", e);
                return EXIT_INPUT;
            }
        },
        None => description,
    };

    // Suggestions are advisory: every failure is reported and still exits 0
    let outcome = match build_suggester(config) {
        Some(s) => suggest_best_effort(&s, &descriptions, s.timeout()).await,
        None => SuggestionOutcome::Unavailable("no suggestion service configured".to_string()),
    };

    println!("{}", outcome);
    EXIT_SUCCESS
}
