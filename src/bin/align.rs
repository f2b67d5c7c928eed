//! Align CLI - Command-line interface for the lifealign engine
//!
//! Commands:
//! - score: Score an align.input.v1 document into an alignment report
//! - validate: Validate an input document's records
//! - schema: Print schema information
//! - doctor: Diagnose engine health and configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use lifealign::pipeline::AlignmentEngine;
use lifealign::schema::{InputAdapter, INPUT_SCHEMA_VERSION};
use lifealign::{EngineError, ENGINE_VERSION, PRODUCER_NAME};

/// Align - Alignment scoring engine for declared standards and habit logs
#[derive(Parser)]
#[command(name = "align")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score habit logs against declared standards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an input document into an alignment report
    Score {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Treat this date (YYYY-MM-DD) as today instead of the local
        /// calendar date
        #[arg(long)]
        as_of: Option<String>,

        /// Load previous-pass snapshots from file for trend detection
        #[arg(long)]
        load_snapshots: Option<PathBuf>,

        /// Save this pass's snapshots to file after scoring
        #[arg(long)]
        save_snapshots: Option<PathBuf>,
    },

    /// Validate an input document's records
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },

    /// Diagnose engine health and configuration
    Doctor {
        /// Check snapshots file
        #[arg(long)]
        snapshots: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
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
    /// Input schema (align.input.v1)
    Input,
    /// Output schema (align.report.v1)
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

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

fn run(cli: Cli) -> Result<(), AlignCliError> {
    match cli.command {
        Commands::Score {
            input,
            output,
            output_format,
            as_of,
            load_snapshots,
            save_snapshots,
        } => cmd_score(
            &input,
            &output,
            output_format,
            as_of.as_deref(),
            load_snapshots.as_deref(),
            save_snapshots.as_deref(),
        ),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),

        Commands::Doctor { snapshots, json } => cmd_doctor(snapshots.as_deref(), json),
    }
}

fn cmd_score(
    input: &PathBuf,
    output: &PathBuf,
    output_format: OutputFormat,
    as_of: Option<&str>,
    load_snapshots: Option<&std::path::Path>,
    save_snapshots: Option<&std::path::Path>,
) -> Result<(), AlignCliError> {
    let input_data = read_input(input)?;
    let today = parse_as_of(as_of)?;

    let mut engine = AlignmentEngine::new();

    if let Some(snapshots_path) = load_snapshots {
        let snapshots_json = fs::read_to_string(snapshots_path)?;
        engine.load_snapshots(&snapshots_json)?;
    }

    let report_json = engine.review_json_on(&input_data, today)?;

    if let Some(snapshots_path) = save_snapshots {
        let snapshots_json = engine.save_snapshots()?;
        fs::write(snapshots_path, snapshots_json)?;
    }

    let output_data = match output_format {
        OutputFormat::JsonPretty => report_json,
        OutputFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(&report_json)?;
            serde_json::to_string(&value)?
        }
    };

    if output.to_string_lossy() == "-" {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &PathBuf, json: bool) -> Result<(), AlignCliError> {
    let input_data = read_input(input)?;
    let doc = InputAdapter::parse_document(&input_data)?;

    // Document-level check: record issues are reported individually below
    let mut document_errors: Vec<String> = Vec::new();
    if let Some(range) = &doc.range {
        if range.from > range.to {
            document_errors.push(
                lifealign::ValidationError::InvertedRange {
                    from: range.from,
                    to: range.to,
                }
                .to_string(),
            );
        }
    }

    let issues = InputAdapter::validate_records(&doc);
    let total_records = doc.pillars.len() + doc.standards.len() + doc.habits.len() + doc.logs.len();

    let report = ValidationReport {
        total_records,
        invalid_records: issues.len(),
        errors: issues
            .iter()
            .map(|issue| ValidationErrorDetail {
                record: issue.record.to_string(),
                index: issue.index,
                id: issue.id.clone(),
                error: issue.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", report.total_records);
        println!("Invalid records: {}", report.invalid_records);

        if !document_errors.is_empty() {
            println!("\nDocument errors:");
            for err in &document_errors {
                println!("  - {}", err);
            }
        }

        if !report.errors.is_empty() {
            println!("\nRecord errors:");
            for err in &report.errors {
                println!(
                    "  - {} {} (index {}): {}",
                    err.record,
                    err.id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if !report.errors.is_empty() || !document_errors.is_empty() {
        Err(AlignCliError::ValidationFailed(
            report.errors.len() + document_errors.len(),
        ))
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), AlignCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", INPUT_SCHEMA_VERSION);
                println!();
                println!("The align.input.v1 document carries the host store's records:");
                println!();
                println!("- pillars: declared life domains (id, name, color)");
                println!("- standards: quantified targets under a pillar");
                println!("  (id, pillarId, name, target, unit)");
                println!("- habits: recurring practices under a pillar");
                println!("  (id, pillarId, name, targetDaysPerWeek, archived)");
                println!("- logs: dated completion records (id, habitId, date, completed)");
                println!("- reflections: journal entries, not scored");
                println!("- snapshots: previous-period pillar scores for trend detection");
                println!("- range: optional explicit scoring window (from, to, inclusive);");
                println!("  the trailing 28-day window applies when absent");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: align.report.v1");
                println!();
                println!("The alignment report contains:");
                println!();
                println!("- reportVersion: Schema version (align.report.v1)");
                println!("- producer: {{ name, version, instanceId }}");
                println!("- computedAtUtc: When the report was computed");
                println!("- range: The scoring window (from, to)");
                println!("- summary: {{ pillarCount, meanScore }}");
                println!("- pillars: One entry per pillar containing:");
                println!("  - pillarId, pillarName, pillarColor");
                println!("  - score (0-100), state, trend");
                println!("  - standards: per-standard breakdown with observed rate and label");
                println!("  - habitCount, completedToday");
                println!();
                println!("States: aligned, improving, drifting, regressing, avoiding");
                println!("Trends: up, down, flat");
            }
        }
    }

    Ok(())
}

fn cmd_doctor(snapshots: Option<&std::path::Path>, json: bool) -> Result<(), AlignCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Engine version {}", ENGINE_VERSION),
    });

    checks.push(DoctorCheck {
        name: "schema_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Input schema: {}", INPUT_SCHEMA_VERSION),
    });

    if let Some(snapshots_path) = snapshots {
        if snapshots_path.exists() {
            match fs::read_to_string(snapshots_path) {
                Ok(content) => {
                    let mut probe = AlignmentEngine::new();
                    match probe.load_snapshots(&content) {
                        Ok(()) => {
                            checks.push(DoctorCheck {
                                name: "snapshots".to_string(),
                                status: CheckStatus::Ok,
                                message: format!(
                                    "Snapshots file valid ({} pillar snapshots)",
                                    probe.snapshot_count()
                                ),
                            });
                        }
                        Err(e) => {
                            checks.push(DoctorCheck {
                                name: "snapshots".to_string(),
                                status: CheckStatus::Error,
                                message: format!("Invalid snapshots JSON: {}", e),
                            });
                        }
                    }
                }
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "snapshots".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Cannot read snapshots file: {}", e),
                    });
                }
            }
        } else {
            checks.push(DoctorCheck {
                name: "snapshots".to_string(),
                status: CheckStatus::Warning,
                message: "Snapshots file does not exist (trends will read flat)".to_string(),
            });
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (document input ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Align Doctor Report");
        println!("===================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(AlignCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(input: &PathBuf) -> Result<String, AlignCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_as_of(as_of: Option<&str>) -> Result<NaiveDate, AlignCliError> {
    match as_of {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AlignCliError::BadDate(s.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://lifealign.dev/schemas/align.input.v1.json",
        "title": "align.input.v1",
        "description": "Lifealign input document schema",
        "type": "object",
        "required": ["schemaVersion"],
        "properties": {
            "schemaVersion": {
                "type": "string",
                "const": "align.input.v1"
            },
            "exportedAtUtc": { "type": "string", "format": "date-time" },
            "range": {
                "type": "object",
                "required": ["from", "to"],
                "properties": {
                    "from": { "type": "string", "format": "date" },
                    "to": { "type": "string", "format": "date" }
                }
            },
            "pillars": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "name", "color"],
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "color": { "type": "string" }
                    }
                }
            },
            "standards": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "pillarId", "name", "target", "unit"],
                    "properties": {
                        "id": { "type": "string" },
                        "pillarId": { "type": "string" },
                        "name": { "type": "string" },
                        "target": { "type": "number" },
                        "unit": { "type": "string" }
                    }
                }
            },
            "habits": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "pillarId", "name", "targetDaysPerWeek"],
                    "properties": {
                        "id": { "type": "string" },
                        "pillarId": { "type": "string" },
                        "name": { "type": "string" },
                        "targetDaysPerWeek": { "type": "integer", "minimum": 0, "maximum": 7 },
                        "archived": { "type": "boolean", "default": false }
                    }
                }
            },
            "logs": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "habitId", "date", "completed"],
                    "properties": {
                        "id": { "type": "string" },
                        "habitId": { "type": "string" },
                        "date": { "type": "string", "format": "date" },
                        "completed": { "type": "boolean" }
                    }
                }
            },
            "reflections": { "type": "array", "items": { "type": "object" } },
            "snapshots": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["pillarId", "score"],
                    "properties": {
                        "pillarId": { "type": "string" },
                        "score": { "type": "integer", "minimum": 0, "maximum": 100 }
                    }
                }
            }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://lifealign.dev/schemas/align.report.v1.json",
        "title": "align.report.v1",
        "description": "Lifealign alignment report schema",
        "type": "object",
        "required": ["reportVersion", "producer", "computedAtUtc", "range", "summary", "pillars"],
        "properties": {
            "reportVersion": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instanceId": { "type": "string" }
                }
            },
            "computedAtUtc": { "type": "string", "format": "date-time" },
            "range": {
                "type": "object",
                "properties": {
                    "from": { "type": "string", "format": "date" },
                    "to": { "type": "string", "format": "date" }
                }
            },
            "summary": {
                "type": "object",
                "properties": {
                    "pillarCount": { "type": "integer" },
                    "meanScore": { "type": "integer", "minimum": 0, "maximum": 100 }
                }
            },
            "pillars": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["pillarId", "score", "state", "trend"],
                    "properties": {
                        "pillarId": { "type": "string" },
                        "pillarName": { "type": "string" },
                        "pillarColor": { "type": "string" },
                        "score": { "type": "integer", "minimum": 0, "maximum": 100 },
                        "state": {
                            "type": "string",
                            "enum": ["aligned", "improving", "drifting", "regressing", "avoiding"]
                        },
                        "trend": {
                            "type": "string",
                            "enum": ["up", "down", "flat"]
                        },
                        "standards": { "type": "array", "items": { "type": "object" } },
                        "habitCount": { "type": "integer" },
                        "completedToday": { "type": "integer" }
                    }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum AlignCliError {
    Io(io::Error),
    Engine(EngineError),
    Json(serde_json::Error),
    BadDate(String),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for AlignCliError {
    fn from(e: io::Error) -> Self {
        AlignCliError::Io(e)
    }
}

impl From<EngineError> for AlignCliError {
    fn from(e: EngineError) -> Self {
        AlignCliError::Engine(e)
    }
}

impl From<serde_json::Error> for AlignCliError {
    fn from(e: serde_json::Error) -> Self {
        AlignCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<AlignCliError> for CliError {
    fn from(e: AlignCliError) -> Self {
        match e {
            AlignCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            AlignCliError::Engine(e) => CliError {
                code: "ENGINE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches the align.input.v1 schema".to_string()),
            },
            AlignCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            AlignCliError::BadDate(s) => CliError {
                code: "BAD_DATE".to_string(),
                message: format!("Invalid --as-of date: {}", s),
                hint: Some("Use YYYY-MM-DD".to_string()),
            },
            AlignCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} validation errors", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            AlignCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    record: String,
    index: usize,
    id: Option<String>,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
