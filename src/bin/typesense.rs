//! Typesense CLI - Command-line interface for the keystroke analyzer
//!
//! Commands:
//! - analyze: Analyze one session (batch mode)
//! - run: Analyze NDJSON sessions from stdin (streaming mode)
//! - validate: Validate session payloads
//! - history: List stored sessions
//! - schema: Print input/output schemas

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use typesense::adapter::{self, SessionPayload};
use typesense::encoder::AnalysisEncoder;
use typesense::store::{JsonlSessionStore, SessionRecord, SessionStore, DEFAULT_HISTORY_LIMIT};
use typesense::{AnalyzerConfig, SessionAnalysis, SessionAnalyzer, SessionInput};
use typesense::{ANALYZER_VERSION, PRODUCER_NAME};

/// Typesense - Deterministic keystroke-timing analyzer
#[derive(Parser)]
#[command(name = "typesense")]
#[command(version = ANALYZER_VERSION)]
#[command(about = "Analyze typing sessions into metrics, mood and scores", long_about = None)]
struct Cli {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Analyzer config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the pause threshold (milliseconds)
    #[arg(long, global = true)]
    pause_threshold_ms: Option<u64>,

    /// Override the burst threshold (milliseconds)
    #[arg(long, global = true)]
    burst_threshold_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single session (batch mode)
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Append the analyzed session to this JSONL store
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Analyze NDJSON sessions from stdin (streaming mode)
    Run {
        /// Append analyzed sessions to this JSONL store
        #[arg(long)]
        store: Option<PathBuf>,

        /// Buffer output instead of flushing after each record
        #[arg(long)]
        no_flush: bool,
    },

    /// Validate session payloads
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored sessions, newest first
    History {
        /// JSONL store to read
        #[arg(long)]
        store: PathBuf,

        /// Maximum number of sessions to list
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// A single session object, or a JSON array of sessions
    Json,
    /// Newline-delimited JSON (one session per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Session payload schema
    Input,
    /// Analysis result schema
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout only carries results
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn run(cli: Cli) -> Result<(), TypesenseCliError> {
    let config = resolve_config(
        cli.config.as_deref(),
        cli.pause_threshold_ms,
        cli.burst_threshold_ms,
    )?;

    match cli.command {
        Commands::Analyze {
            input,
            output,
            format,
            store,
        } => {
            let analyzer = SessionAnalyzer::with_config(config)?;
            cmd_analyze(&analyzer, &input, &output, format, store.as_deref())
        }

        Commands::Run { store, no_flush } => {
            let analyzer = SessionAnalyzer::with_config(config)?;
            cmd_run(&analyzer, store.as_deref(), !no_flush)
        }

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::History { store, limit, json } => cmd_history(&store, limit, json),

        Commands::Schema { schema_type } => cmd_schema(schema_type),
    }
}

fn resolve_config(
    path: Option<&Path>,
    pause_threshold_ms: Option<u64>,
    burst_threshold_ms: Option<u64>,
) -> Result<AnalyzerConfig, TypesenseCliError> {
    let mut config = match path {
        Some(path) => AnalyzerConfig::load_from(path)?,
        None => AnalyzerConfig::default(),
    };

    if let Some(ms) = pause_threshold_ms {
        config.pause_threshold_ms = ms;
    }
    if let Some(ms) = burst_threshold_ms {
        config.burst_threshold_ms = ms;
    }

    tracing::debug!(
        pause_threshold_ms = config.pause_threshold_ms,
        burst_threshold_ms = config.burst_threshold_ms,
        "resolved analyzer config"
    );
    Ok(config)
}

fn cmd_analyze(
    analyzer: &SessionAnalyzer,
    input: &Path,
    output: &Path,
    format: OutputFormat,
    store: Option<&Path>,
) -> Result<(), TypesenseCliError> {
    let input_data = read_input(input)?;

    let session = adapter::parse_session_input(&input_data)?;
    let analysis = analyzer.analyze(&session)?;

    let output_data = match format {
        OutputFormat::Json => AnalysisEncoder::encode_to_json(&analysis)?,
        OutputFormat::JsonPretty => AnalysisEncoder::encode_to_json_pretty(&analysis)?,
    };

    if let Some(path) = store {
        persist(path, session, analysis)?;
    }

    if output.to_string_lossy() == "-" {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data + "\n")?;
    }

    Ok(())
}

fn cmd_run(
    analyzer: &SessionAnalyzer,
    store: Option<&Path>,
    flush: bool,
) -> Result<(), TypesenseCliError> {
    if atty::is(atty::Stream::Stdin) {
        eprintln!("Reading sessions from stdin, one JSON object per line (Ctrl-D to finish)");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut analyzed = 0usize;
    let mut rejected = 0usize;

    for (line_num, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        // A bad session is reported on its own output line and does not stop the stream
        let output = match analyze_line(analyzer, trimmed, store) {
            Ok(json) => {
                analyzed += 1;
                json
            }
            Err(e) => {
                rejected += 1;
                let report = LineError {
                    line: line_num + 1,
                    error: CliError::from(e),
                };
                serde_json::to_string(&report)?
            }
        };

        writeln!(stdout, "{}", output)?;
        if flush {
            stdout.flush()?;
        }
    }

    stdout.flush()?;
    tracing::info!(analyzed, rejected, "finished session stream");
    Ok(())
}

fn analyze_line(
    analyzer: &SessionAnalyzer,
    line: &str,
    store: Option<&Path>,
) -> Result<String, TypesenseCliError> {
    let session = adapter::parse_session_input(line)?;
    let analysis = analyzer.analyze(&session)?;
    let json = AnalysisEncoder::encode_to_json(&analysis)?;

    if let Some(path) = store {
        persist(path, session, analysis)?;
    }

    Ok(json)
}

fn persist(
    path: &Path,
    session: SessionInput,
    analysis: SessionAnalysis,
) -> Result<(), TypesenseCliError> {
    let mut store = JsonlSessionStore::new(path);
    let record = SessionRecord::new(session, analysis);
    let id = record.id;
    store.save(record)?;
    tracing::info!(%id, path = %path.display(), "stored session");
    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    json: bool,
) -> Result<(), TypesenseCliError> {
    let input_data = read_input(input)?;

    let sessions: Vec<SessionPayload> = match input_format {
        InputFormat::Ndjson => adapter::parse_ndjson(&input_data)?,
        InputFormat::Json if input_data.trim_start().starts_with('[') => {
            adapter::parse_array(&input_data)?
        }
        InputFormat::Json => vec![adapter::parse_session(&input_data)?],
    };

    let failures = adapter::validate_sessions(&sessions);

    let report = ValidationReport {
        total_sessions: sessions.len(),
        valid_sessions: sessions.len() - failures.len(),
        invalid_sessions: failures.len(),
        errors: failures
            .iter()
            .map(|f| ValidationErrorDetail {
                index: f.index,
                session_id: f.session_id.clone(),
                field: f.error.field(),
                error: f.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total sessions:   {}", report.total_sessions);
        println!("Valid sessions:   {}", report.valid_sessions);
        println!("Invalid sessions: {}", report.invalid_sessions);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Session {} (index {}): {}",
                    err.session_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_sessions > 0 {
        Err(TypesenseCliError::ValidationFailed(report.invalid_sessions))
    } else {
        Ok(())
    }
}

fn cmd_history(store: &Path, limit: usize, json: bool) -> Result<(), TypesenseCliError> {
    let store = JsonlSessionStore::new(store);
    let entries: Vec<_> = store
        .recent(limit)?
        .iter()
        .map(SessionRecord::summary)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No sessions recorded");
        return Ok(());
    }

    println!(
        "{:<36}  {:<20}  {:>8}  {:>5}  {:>11}  Mood",
        "ID", "Recorded", "Duration", "WPM", "Corrections"
    );
    for entry in &entries {
        println!(
            "{:<36}  {:<20}  {:>7}s  {:>5}  {:>11}  {} {}",
            entry.id,
            entry.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.duration_seconds,
            entry.words_per_minute,
            entry.correction_count,
            entry.mood,
            entry.mood.emoji()
        );
    }

    Ok(())
}

fn cmd_schema(schema_type: SchemaType) -> Result<(), TypesenseCliError> {
    let schema = match schema_type {
        SchemaType::Input => get_input_json_schema(),
        SchemaType::Output => get_output_json_schema(),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, TypesenseCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn get_input_json_schema() -> serde_json::Value {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "typesense.session.v1",
        "description": "A finished typing session",
        "type": "object",
        "required": ["durationSeconds", "keystrokes", "correctionCount", "rawText"],
        "properties": {
            "sessionId": { "type": "string" },
            "durationSeconds": { "type": "number", "minimum": 0 },
            "keystrokes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["timestampMillis"],
                    "properties": {
                        "timestampMillis": { "type": "integer" }
                    }
                }
            },
            "correctionCount": { "type": "integer", "minimum": 0 },
            "rawText": { "type": "string" }
        }
    })
}

fn get_output_json_schema() -> serde_json::Value {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "typesense.analysis.v1",
        "description": "Metrics and assessment for one typing session",
        "type": "object",
        "properties": {
            "producer": { "type": "string", "const": PRODUCER_NAME },
            "analyzerVersion": { "type": "string" },
            "wordsPerMinute": { "type": "integer", "minimum": 0 },
            "mood": {
                "type": "string",
                "enum": ["Stressed", "Thoughtful", "Confident", "Focused", "Relaxed", "Neutral"]
            },
            "moodEmoji": { "type": "string" },
            "confidenceScore": { "type": "integer", "minimum": 0, "maximum": 100 },
            "focusScore": { "type": "integer", "minimum": 0, "maximum": 100 },
            "suggestion": { "type": "string" },
            "pauseCount": { "type": "integer", "minimum": 0 },
            "averagePauseDurationMillis": { "type": "number", "minimum": 0 },
            "burstCount": { "type": "integer", "minimum": 0 },
            "totalKeystrokes": { "type": "integer", "minimum": 0 }
        }
    })
}

// Error types

#[derive(Debug)]
enum TypesenseCliError {
    Io(io::Error),
    Compute(typesense::ComputeError),
    Json(serde_json::Error),
    Validation(typesense::ValidationError),
    ValidationFailed(usize),
}

impl From<io::Error> for TypesenseCliError {
    fn from(e: io::Error) -> Self {
        TypesenseCliError::Io(e)
    }
}

impl From<typesense::ComputeError> for TypesenseCliError {
    fn from(e: typesense::ComputeError) -> Self {
        match e {
            typesense::ComputeError::Validation(v) => TypesenseCliError::Validation(v),
            other => TypesenseCliError::Compute(other),
        }
    }
}

impl From<serde_json::Error> for TypesenseCliError {
    fn from(e: serde_json::Error) -> Self {
        TypesenseCliError::Json(e)
    }
}

impl From<typesense::ValidationError> for TypesenseCliError {
    fn from(e: typesense::ValidationError) -> Self {
        TypesenseCliError::Validation(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<TypesenseCliError> for CliError {
    fn from(e: TypesenseCliError) -> Self {
        match e {
            TypesenseCliError::Io(e)
            | TypesenseCliError::Compute(typesense::ComputeError::Io(e)) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TypesenseCliError::Compute(typesense::ComputeError::ConfigError(msg)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: msg,
                hint: Some("Check the config file and threshold overrides".to_string()),
            },
            TypesenseCliError::Compute(typesense::ComputeError::StoreError(msg)) => CliError {
                code: "STORE_ERROR".to_string(),
                message: msg,
                hint: Some("Check the session store file".to_string()),
            },
            TypesenseCliError::Compute(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'typesense schema input' for the expected shape".to_string()),
            },
            TypesenseCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            TypesenseCliError::Validation(e) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(format!("Fix the '{}' field", e.field())),
            },
            TypesenseCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} sessions failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct LineError {
    line: usize,
    error: CliError,
}

#[derive(serde::Serialize)]
struct ValidationReport {
    total_sessions: usize,
    valid_sessions: usize,
    invalid_sessions: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    session_id: Option<String>,
    field: String,
    error: String,
}
