use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;
use uplink_decoder_core::{UplinkInput, UplinkOutput, decode_uplink};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("UPLINK_BUILD_COMMIT"),
    ", built ",
    env!("UPLINK_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "uplink-decoder")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode LoRaWAN-style uplink payloads into JSON records.",
    long_about = None,
    after_help = "Examples:\n  uplink-decoder decode --fport 1 --bytes ffe6ff00\n  uplink-decoder decode -p 1 -b 255,230,255,0 --pretty\n  uplink-decoder decode-file uplink.json -o decoded.json"
)]
struct Cli {
    /// Log level for diagnostics on stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", value_parser = clap::value_parser!(Level))]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a payload given on the command line.
    Decode {
        /// Application port the payload arrived on
        #[arg(short = 'p', long = "fport", value_name = "FPORT")]
        f_port: u8,

        /// Payload as hex (ffe6ff00, 0x prefix allowed) or a comma-separated
        /// decimal list (255,230,255,0)
        #[arg(short = 'b', long, allow_hyphen_values = true)]
        bytes: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode an uplink input record ({"bytes", "fPort", "variables"}) stored as JSON.
    #[command(alias = "decode-json")]
    DecodeFile {
        /// Path to a .json input record (a glob matching one file is accepted)
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output path (JSON); stdout when omitted
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write JSON output to stdout
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    #[allow(dead_code)] // only consulted by clap for the --pretty conflict
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let result = match cli.command {
        Commands::Decode {
            f_port,
            bytes,
            output,
        } => cmd_decode(f_port, &bytes, &output),
        Commands::DecodeFile { input, output } => cmd_decode_file(&input, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(log_level: Option<Level>) {
    let level = log_level.unwrap_or(Level::WARN);

    FmtSubscriber::builder()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_decode(f_port: u8, bytes: &str, output: &OutputArgs) -> Result<(), CliError> {
    let payload = parse_payload(bytes)?;
    debug!(f_port, payload_len = payload.len(), "decoding payload from arguments");
    let decoded = decode(&UplinkInput::new(payload, f_port))?;
    emit_output(&decoded, output, None)
}

fn cmd_decode_file(input: &Path, output: &OutputArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    info!(path = %resolved_input.display(), "decoding uplink input file");
    let raw = fs::read_to_string(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    let uplink: UplinkInput = serde_json::from_str(&raw).map_err(|err| {
        CliError::new(
            format!("invalid uplink input '{}': {}", resolved_input.display(), err),
            Some("expected {\"bytes\": [..], \"fPort\": n, \"variables\": {..}}".to_string()),
        )
    })?;

    let decoded = decode(&uplink)?;
    emit_output(&decoded, output, Some(&input_abs))
}

fn decode(uplink: &UplinkInput) -> Result<UplinkOutput, CliError> {
    decode_uplink(uplink).map_err(|err| {
        CliError::new(
            format!("decoding failed: {}", err),
            Some("fPort 1 payloads carry a 2-byte counter".to_string()),
        )
    })
}

fn emit_output(
    decoded: &UplinkOutput,
    args: &OutputArgs,
    input_abs: Option<&Path>,
) -> Result<(), CliError> {
    let json = serialize_output(decoded, args.pretty)?;

    let target = match (&args.output, args.stdout) {
        (Some(path), false) => path,
        _ => {
            println!("{}", json);
            return Ok(());
        }
    };

    if let Some(input_abs) = input_abs {
        ensure_distinct_output(target, input_abs)?;
    }

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(target, json)
        .with_context(|| format!("Failed to write output: {}", target.display()))?;

    if !args.quiet {
        eprintln!("OK: output written -> {}", target.display());
    }
    Ok(())
}

fn ensure_distinct_output(output: &Path, input_abs: &Path) -> Result<(), CliError> {
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A parent that does not exist yet cannot contain the input.
    let Ok(output_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = output
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid output path: {}", output.display()))?;
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_output(decoded: &UplinkOutput, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(decoded)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(decoded)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn parse_payload(raw: &str) -> Result<Vec<u8>, CliError> {
    let trimmed = raw.trim();
    if trimmed.contains(',') {
        return trimmed
            .split(',')
            .map(|item| {
                let item = item.trim();
                item.parse::<u8>().map_err(|_| {
                    CliError::new(
                        format!("invalid byte '{}' in payload list", item),
                        Some("list entries must be decimal values in 0..=255".to_string()),
                    )
                })
            })
            .collect();
    }

    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CliError::new(
            format!("invalid hex payload '{}'", raw),
            Some("use an even number of hex digits, or a comma-separated decimal list".to_string()),
        ));
    }
    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| CliError::new(format!("invalid hex payload '{}'", raw), None))
        })
        .collect()
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a .json uplink input record".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a .json uplink input record".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "json" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .json file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected a .json file".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single input file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
