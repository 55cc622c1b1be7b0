use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use serde_json::Value;
use zoia_core::{IoValue, ModuleCatalog, PatchDocument};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("ZOIA_BUILD_COMMIT"),
    ", built ",
    env!("ZOIA_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "zoia")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for ZOIA binary patch exports.",
    long_about = None,
    after_help = "Examples:\n  zoia patch decode 001_zoia_Tremolo.bin --module-index ModuleIndex.json -o tremolo.json\n  zoia patch parse '064_*.bin' --module-index ModuleIndex.json --stdout --pretty"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on patch exports.
    Patch {
        #[command(subcommand)]
        command: PatchCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PatchCommands {
    /// Decode a patch export into a JSON document.
    #[command(alias = "parse")]
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path to a .bin patch export (a glob matching exactly one file is accepted)
    input: PathBuf,

    /// Module metadata index (JSON keyed by module type id)
    #[arg(long, value_name = "JSON")]
    module_index: PathBuf,

    /// Output document path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    output: Option<PathBuf>,

    /// Write the JSON document to stdout
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Print patch meta (cpu, counts, I/O) to stderr
    #[arg(long)]
    summary: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Patch { command } => match command {
            PatchCommands::Decode(args) => cmd_patch_decode(args),
        },
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

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
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
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_patch_decode(args: DecodeArgs) -> Result<(), CliError> {
    let DecodeArgs {
        input,
        module_index,
        output,
        stdout,
        pretty,
        compact,
        quiet,
        summary,
    } = args;

    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let output = if stdout {
        None
    } else {
        Some(output.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--output or --stdout".to_string()),
            )
        })?)
    };

    if let Some(output_path) = output.as_ref() {
        ensure_distinct_output(output_path, &input_abs)?;
    }

    let catalog = load_catalog(&module_index)?;
    tracing::info!(
        input = %resolved_input.display(),
        module_types = catalog.len(),
        "decoding patch"
    );
    let document = zoia_core::decode_patch_file(&resolved_input, &catalog).map_err(|err| {
        CliError::new(
            format!("{}: {}", resolved_input.display(), err),
            Some("check that the file is a patch export and the module index matches its firmware".to_string()),
        )
    })?;
    let json = serialize_document(&document, pretty, compact)?;

    let Some(output) = output else {
        print!("{}", json);
        if summary && !quiet {
            print_summary(&document);
        }
        return Ok(());
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(&output, json)
        .with_context(|| format!("Failed to write document: {}", output.display()))?;

    if summary && !quiet {
        print_summary(&document);
    }
    if !quiet {
        eprintln!("OK: document written -> {}", output.display());
    }
    Ok(())
}

fn ensure_distinct_output(output_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let output_dir = output_path
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose();
    // A parent that does not exist yet cannot hold the input.
    let Ok(Some(output_dir)) = output_dir else {
        return Ok(());
    };
    let file_name = output_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid output path: {}", output_path.display()))?;
    if output_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "output path must differ from input: {}",
                output_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn load_catalog(path: &Path) -> Result<ModuleCatalog, CliError> {
    if !path.is_file() {
        return Err(CliError::new(
            format!("module index not found: {}", path.display()),
            Some("pass the module metadata JSON with --module-index".to_string()),
        ));
    }
    ModuleCatalog::from_path(path).map_err(|err| {
        CliError::new(
            format!("invalid module index {}: {}", path.display(), err),
            Some("expected a JSON object keyed by module type id".to_string()),
        )
    })
}

fn serialize_document(
    document: &PatchDocument,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(document)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(document)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_summary(document: &PatchDocument) {
    let meta = &document.meta;
    eprintln!("Patch: {}", meta.name);
    eprintln!("  cpu: {}", meta.cpu);
    eprintln!(
        "  modules: {}  connections: {}  pages: {}  starred: {}",
        meta.n_modules, meta.n_connections, meta.n_pages, meta.n_starred
    );
    eprintln!("  inputs: {}", render_io(meta.i_o.inputs.as_ref()));
    eprintln!("  outputs: {}", render_io(meta.i_o.outputs.as_ref()));
    eprintln!("  midi channel: {}", render_io(meta.i_o.midi_channel.as_ref()));
    eprintln!("  stompswitches: {}", render_io(meta.i_o.stompswitches.as_ref()));
}

fn render_io(value: Option<&IoValue>) -> String {
    match value {
        None => "-".to_string(),
        Some(IoValue::One(value)) => render_value(value),
        Some(IoValue::Many(values)) => values
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .bin patch export".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .bin patch export".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "bin" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .bin patch export".to_string()),
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

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected a .bin patch export".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        n => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if n > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}",
                    pattern, n, listed
                ),
                Some("pass a single patch file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
