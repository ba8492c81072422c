//! Proctor CLI - Command-line interface for Synheart Proctor
//!
//! Commands:
//! - replay: Process recorded frame events into alert records (batch mode)
//! - run: Process streaming input from stdin (streaming mode)
//! - validate: Validate frame event schema
//! - doctor: Diagnose configuration and environment
//! - schema: Print input/output schema information

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use synheart_proctor::encoder::ALERT_SCHEMA_VERSION;
use synheart_proctor::schema::{FrameEvent, FrameEventAdapter, Payload, SCHEMA_VERSION};
use synheart_proctor::sink::NdjsonSink;
use synheart_proctor::types::AlertRecord;
use synheart_proctor::{
    runtime, AutoClearPolicy, FaceBatch, MonitorConfig, MonitorProcessor, PRODUCER_NAME,
    PROCTOR_VERSION,
};

/// Proctor - On-device attentiveness monitor for remote exams
#[derive(Parser)]
#[command(name = "proctor")]
#[command(author = "Synheart AI Inc")]
#[command(version = PROCTOR_VERSION)]
#[command(about = "Turn face landmark streams into proctoring alerts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay recorded frame events into alert records (batch mode)
    Replay {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Emit a diagnostics record on every tick
        #[arg(long)]
        diagnostics: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Process streaming input from stdin (streaming mode)
    Run {
        /// Drive ticks from the wall clock instead of event timestamps
        #[arg(long)]
        live: bool,

        /// Emit a diagnostics record on every tick
        #[arg(long)]
        diagnostics: bool,

        /// Flush output after each record
        #[arg(long, default_value = "true")]
        flush: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Validate frame event schema
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check a monitor configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
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
}

/// Monitor configuration: a JSON file, then individual overrides
#[derive(Args)]
struct ConfigArgs {
    /// Monitor configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling tick interval in milliseconds
    #[arg(long)]
    tick_interval_ms: Option<u64>,

    /// Positive ticks tolerated before a detector fires
    #[arg(long)]
    dwell_ticks: Option<u32>,

    /// Head angle (degrees) beyond which the subject is looking away
    #[arg(long)]
    angle_threshold: Option<f64>,

    /// Outer-eye distance (px) below which the subject is too far or turned
    #[arg(long)]
    proximity_threshold: Option<f64>,

    /// Eyelid gap (px) below which an eye counts as closed
    #[arg(long)]
    eye_closed_threshold: Option<f64>,

    /// Violations before the final warning
    #[arg(long)]
    final_warning_threshold: Option<u32>,

    /// How long a warning stays displayed, in milliseconds
    #[arg(long)]
    auto_clear_ms: Option<u64>,

    /// What a new message does to a pending auto-clear
    #[arg(long)]
    auto_clear_policy: Option<PolicyArg>,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<MonitorConfig, ProctorCliError> {
        let mut config = match &self.config {
            Some(path) => MonitorConfig::load(path)?,
            None => MonitorConfig::default(),
        };

        if let Some(v) = self.tick_interval_ms {
            config.tick_interval_ms = v;
        }
        if let Some(v) = self.dwell_ticks {
            config.dwell_ticks = v;
        }
        if let Some(v) = self.angle_threshold {
            config.angle_threshold_deg = v;
        }
        if let Some(v) = self.proximity_threshold {
            config.proximity_threshold_px = v;
        }
        if let Some(v) = self.eye_closed_threshold {
            config.eye_closed_threshold_px = v;
        }
        if let Some(v) = self.final_warning_threshold {
            config.final_warning_threshold = v;
        }
        if let Some(v) = self.auto_clear_ms {
            config.auto_clear_ms = v;
        }
        if let Some(policy) = &self.auto_clear_policy {
            config.auto_clear_policy = match policy {
                PolicyArg::Refresh => AutoClearPolicy::Refresh,
                PolicyArg::KeepPending => AutoClearPolicy::KeepPending,
            };
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Clone, ValueEnum)]
enum PolicyArg {
    /// Each new message gets its full display time
    Refresh,
    /// Keep the earlier deadline running
    KeepPending,
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one event per line)
    Ndjson,
    /// JSON array of events
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one alert record per line)
    Ndjson,
    /// JSON array of alert records
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (proctor.frame_event.v1)
    Input,
    /// Output schema (proctor.alert.v1)
    Output,
}

fn main() -> ExitCode {
    env_logger::init();
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

fn run(cli: Cli) -> Result<(), ProctorCliError> {
    match cli.command {
        Commands::Replay {
            input,
            output,
            input_format,
            output_format,
            diagnostics,
            config,
        } => cmd_replay(
            &input,
            &output,
            input_format,
            output_format,
            diagnostics,
            config.resolve()?,
        ),

        Commands::Run {
            live,
            diagnostics,
            flush,
            config,
        } => {
            let config = config.resolve()?;
            if live {
                cmd_run_live(config, diagnostics, flush)
            } else {
                cmd_run(config, diagnostics, flush)
            }
        }

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn read_input(input: &Path) -> Result<String, ProctorCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_events(data: &str, format: InputFormat) -> Result<Vec<FrameEvent>, ProctorCliError> {
    Ok(match format {
        InputFormat::Ndjson => FrameEventAdapter::parse_ndjson(data)?,
        InputFormat::Json => FrameEventAdapter::parse_array(data)?,
    })
}

fn cmd_replay(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    diagnostics: bool,
    config: MonitorConfig,
) -> Result<(), ProctorCliError> {
    let input_data = read_input(input)?;
    let events = parse_events(&input_data, input_format)?;

    if events.is_empty() {
        return Err(ProctorCliError::NoEvents);
    }

    let inputs = FrameEventAdapter::to_inputs(events)?;

    let mut processor = MonitorProcessor::new(config)?;
    processor.set_emit_diagnostics(diagnostics);
    let mut records = processor.replay(inputs);
    records.extend(processor.drain());

    let output_data = format_output(&records, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn parse_stream_line(line: &str) -> Result<FrameEvent, ProctorCliError> {
    let event = FrameEventAdapter::parse_line(line)
        .map_err(|e| ProctorCliError::ParseError(format!("Failed to parse event: {}", e)))?;
    event.validate()?;
    Ok(event)
}

fn cmd_run(config: MonitorConfig, diagnostics: bool, flush: bool) -> Result<(), ProctorCliError> {
    let mut processor = MonitorProcessor::new(config)?;
    processor.set_emit_diagnostics(diagnostics);
    processor.set_sink(Box::new(NdjsonSink::new(io::stdout(), flush)));

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let event = parse_stream_line(trimmed)?;
        processor.ingest(event.into());
    }

    processor.drain();
    io::stdout().flush()?;
    Ok(())
}

fn cmd_run_live(
    config: MonitorConfig,
    diagnostics: bool,
    flush: bool,
) -> Result<(), ProctorCliError> {
    let (handle, alerts) = runtime::spawn(config, diagnostics)?;

    let printer = thread::spawn(move || -> Result<(), ProctorCliError> {
        let mut stdout = io::stdout();
        for record in alerts.iter() {
            writeln!(stdout, "{}", serde_json::to_string(&record)?)?;
            if flush {
                stdout.flush()?;
            }
        }
        stdout.flush()?;
        Ok(())
    });

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        // Event timestamps are ignored: the worker stamps inputs on arrival
        let event = parse_stream_line(trimmed)?;
        match event.payload {
            Payload::Faces { faces } => handle.push_faces(FaceBatch::new(faces.faces))?,
            Payload::Visibility { visibility } => handle.push_visibility(visibility.state)?,
            Payload::ModelReady { .. } => handle.model_ready()?,
        }
    }

    handle.shutdown()?;
    printer.join().map_err(|_| ProctorCliError::OutputFailed)?
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), ProctorCliError> {
    let input_data = read_input(input)?;
    let events = parse_events(&input_data, input_format)?;

    let results = FrameEventAdapter::validate_events(&events);

    let report = ValidationReport {
        total_events: events.len(),
        valid_events: events.len() - results.len(),
        invalid_events: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                event_id: r.event_id.clone(),
                error: r.result.as_ref().map(|e| e.to_string()).unwrap_or_default(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total events:   {}", report.total_events);
        println!("Valid events:   {}", report.valid_events);
        println!("Invalid events: {}", report.invalid_events);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Event {} (index {}): {}",
                    err.event_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_events > 0 {
        Err(ProctorCliError::ValidationFailed(report.invalid_events))
    } else {
        Ok(())
    }
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), ProctorCliError> {
    let mut checks: Vec<DoctorCheck> = vec![
        DoctorCheck {
            name: "proctor_version".to_string(),
            status: CheckStatus::Ok,
            message: format!("Proctor version {}", PROCTOR_VERSION),
        },
        DoctorCheck {
            name: "schema_version".to_string(),
            status: CheckStatus::Ok,
            message: format!("Input schema: {}, output schema: {}", SCHEMA_VERSION, ALERT_SCHEMA_VERSION),
        },
    ];

    if let Some(config_path) = config {
        let check = if !config_path.exists() {
            DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Warning,
                message: "Config file does not exist; defaults will be used".to_string(),
            }
        } else {
            match MonitorConfig::load(config_path) {
                Ok(loaded) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Config valid (tick {} ms, dwell {} ticks, final warning after {})",
                        loaded.tick_interval_ms, loaded.dwell_ticks, loaded.final_warning_threshold
                    ),
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: e.to_string(),
                },
            }
        };
        checks.push(check);
    }

    // Check stdin is available (for streaming mode)
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
            message: "stdin is a pipe (streaming mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: PROCTOR_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Proctor Doctor Report");
        println!("=====================");
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
        Err(ProctorCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), ProctorCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", SCHEMA_VERSION);
                println!();
                println!("The proctor.frame_event.v1 schema supports three record types:");
                println!();
                println!("1. faces - Landmark meshes for one video frame");
                println!("   - payload.faces.faces: array of {{ mesh: [[x, y], ...], confidence? }}");
                println!("   - indices used: 33/263 outer eye corners, 159/145 and 386/374 eyelids, 4 nose tip");
                println!();
                println!("2. visibility - Host page gained or lost the foreground");
                println!("   - payload.visibility.state: visible | hidden");
                println!();
                println!("3. model_ready - The landmark model finished loading");
                println!("   - payload.model_ready.model_name (optional)");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: {}", ALERT_SCHEMA_VERSION);
                println!();
                println!("Each alert record contains:");
                println!();
                println!("- schema_version: {}", ALERT_SCHEMA_VERSION);
                println!("- producer: {{ name, version, instance_id }}");
                println!("- session_id, emitted_at_utc");
                println!("- event: tagged by kind");
                println!("  - violation: {{ violation, detector?, message, tally }}");
                println!("  - final_warning: {{ message, triggered_by }}");
                println!("  - status: {{ message }}");
                println!("  - message_cleared");
                println!("  - diagnostics: {{ stats, readout }}");
                println!("- state: {{ violation_tally, current_message, auto_clear_scheduled }}");
            }
        }
    }

    Ok(())
}

// Helper functions

fn format_output(records: &[AlertRecord], format: &OutputFormat) -> Result<String, ProctorCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(records)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://synheart.ai/schemas/proctor.frame_event.v1.json",
        "title": "proctor.frame_event.v1",
        "description": "Synheart proctor frame event schema",
        "type": "object",
        "required": ["schema_version", "timestamp", "record_type", "payload"],
        "properties": {
            "schema_version": {
                "type": "string",
                "const": SCHEMA_VERSION
            },
            "event_id": { "type": "string" },
            "timestamp": { "type": "string", "format": "date-time" },
            "source": {
                "type": "object",
                "properties": {
                    "model": { "type": "string" },
                    "camera_id": { "type": "string" },
                    "host": { "type": "string" }
                }
            },
            "record_type": {
                "type": "string",
                "enum": ["faces", "visibility", "model_ready"]
            },
            "payload": {
                "type": "object",
                "oneOf": [
                    {
                        "required": ["faces"],
                        "properties": {
                            "faces": {
                                "type": "object",
                                "properties": {
                                    "faces": {
                                        "type": "array",
                                        "items": {
                                            "type": "object",
                                            "required": ["mesh"],
                                            "properties": {
                                                "mesh": {
                                                    "type": "array",
                                                    "items": {
                                                        "type": "array",
                                                        "items": { "type": "number" },
                                                        "minItems": 2,
                                                        "maxItems": 3
                                                    }
                                                },
                                                "confidence": { "type": "number" }
                                            }
                                        }
                                    },
                                    "frame_width": { "type": "integer" },
                                    "frame_height": { "type": "integer" }
                                }
                            }
                        }
                    },
                    {
                        "required": ["visibility"],
                        "properties": {
                            "visibility": {
                                "type": "object",
                                "required": ["state"],
                                "properties": {
                                    "state": { "type": "string", "enum": ["visible", "hidden"] }
                                }
                            }
                        }
                    },
                    {
                        "required": ["model_ready"],
                        "properties": {
                            "model_ready": {
                                "type": "object",
                                "properties": { "model_name": { "type": "string" } }
                            }
                        }
                    }
                ]
            }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://synheart.ai/schemas/proctor.alert.v1.json",
        "title": "proctor.alert.v1",
        "description": "Synheart proctor alert record schema",
        "type": "object",
        "required": ["schema_version", "producer", "session_id", "emitted_at_utc", "event", "state"],
        "properties": {
            "schema_version": { "type": "string", "const": ALERT_SCHEMA_VERSION },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "session_id": { "type": "string" },
            "emitted_at_utc": { "type": "string", "format": "date-time" },
            "event": {
                "type": "object",
                "required": ["kind"],
                "properties": {
                    "kind": {
                        "type": "string",
                        "enum": ["violation", "final_warning", "status", "message_cleared", "diagnostics"]
                    }
                }
            },
            "state": {
                "type": "object",
                "properties": {
                    "violation_tally": { "type": "integer" },
                    "current_message": { "type": "string" },
                    "auto_clear_scheduled": { "type": "boolean" }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum ProctorCliError {
    Io(io::Error),
    Compute(synheart_proctor::ComputeError),
    Json(serde_json::Error),
    Validation(synheart_proctor::schema::ValidationError),
    NoEvents,
    ValidationFailed(usize),
    DoctorFailed,
    OutputFailed,
    ParseError(String),
}

impl From<io::Error> for ProctorCliError {
    fn from(e: io::Error) -> Self {
        ProctorCliError::Io(e)
    }
}

impl From<synheart_proctor::ComputeError> for ProctorCliError {
    fn from(e: synheart_proctor::ComputeError) -> Self {
        ProctorCliError::Compute(e)
    }
}

impl From<serde_json::Error> for ProctorCliError {
    fn from(e: serde_json::Error) -> Self {
        ProctorCliError::Json(e)
    }
}

impl From<synheart_proctor::schema::ValidationError> for ProctorCliError {
    fn from(e: synheart_proctor::schema::ValidationError) -> Self {
        ProctorCliError::Validation(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ProctorCliError> for CliError {
    fn from(e: ProctorCliError) -> Self {
        match e {
            ProctorCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            ProctorCliError::Compute(e @ synheart_proctor::ComputeError::InvalidConfig(_)) => {
                CliError {
                    code: "CONFIG_ERROR".to_string(),
                    message: e.to_string(),
                    hint: Some("Run 'proctor doctor --config <file>' for details".to_string()),
                }
            }
            ProctorCliError::Compute(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches proctor.frame_event.v1 schema".to_string()),
            },
            ProctorCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            ProctorCliError::Validation(e) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'proctor validate' for details".to_string()),
            },
            ProctorCliError::NoEvents => CliError {
                code: "NO_EVENTS".to_string(),
                message: "No events found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            ProctorCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} events failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            ProctorCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            ProctorCliError::OutputFailed => CliError {
                code: "OUTPUT_FAILED".to_string(),
                message: "Alert writer stopped unexpectedly".to_string(),
                hint: None,
            },
            ProctorCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_events: usize,
    valid_events: usize,
    invalid_events: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    event_id: Option<String>,
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
