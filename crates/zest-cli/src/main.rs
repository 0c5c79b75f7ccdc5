//! Command-line inspector for Zest script documents.
//!
//! Scripts are read as JSON documents produced by serializing
//! [`zest_core::script::ZestScript`].
//!
//! # Usage
//!
//! ```bash
//! # Show every statement with its global index
//! zest tree login.json
//!
//! # List the variables and browser window handles a script can use
//! zest vars login.json
//! zest handles login.json --format json
//!
//! # Point a recorded script at another host
//! zest prefix login.json --new https://staging.example.com
//! zest prefix login.json --old http://localhost:8080 --new https://staging.example.com --write
//!
//! # Validate a script
//! zest check login.json
//!
//! # Show the effective configuration
//! zest config
//!
//! # Debug logging to a file
//! RUST_LOG=debug zest --log-file /tmp/zest.log tree login.json
//! ```

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use zest_core::config::ZestConfig;
use zest_core::script::ZestScript;
use zest_core::ZestError;

use render::ScriptRenderer;

/// Inspect and edit Zest scripts.
#[derive(Parser)]
#[command(name = "zest")]
#[command(about = "Inspect and edit Zest security-testing scripts")]
#[command(version)]
struct Cli {
    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Write logs to this file instead of stderr
    #[arg(long, env = "ZEST_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Print every statement with its global index
    Tree {
        /// Script file (JSON)
        file: PathBuf,
    },

    /// List every variable name the script can reference
    Vars {
        /// Script file (JSON)
        file: PathBuf,
    },

    /// List every browser window handle the script defines
    Handles {
        /// Script file (JSON)
        file: PathBuf,
    },

    /// Rewrite the URL prefix of every request and browser launch
    Prefix {
        /// Script file (JSON)
        file: PathBuf,
        /// New prefix
        #[arg(long = "new")]
        new_prefix: String,
        /// Prefix to replace (defaults to the script's own prefix)
        #[arg(long = "old")]
        old_prefix: Option<String>,
        /// Save the result back to the file instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// Validate a script and print a summary
    Check {
        /// Script file (JSON)
        file: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("Error: {}", e);
        return e.exit_code();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<(), CliError> {
    match log_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let name = path
                .file_name()
                .ok_or_else(|| CliError::Usage(format!("Invalid log file: {}", path.display())))?;
            std::fs::create_dir_all(&dir).map_err(|e| CliError::Io(e.to_string()))?;
            let file_appender = tracing_appender::rolling::never(&dir, name);
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_writer(file_appender)
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[derive(Debug)]
enum CliError {
    Usage(String),
    Script(String),
    Io(String),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Usage(_) => ExitCode::from(2),
            CliError::Script(_) => ExitCode::from(3),
            CliError::Io(_) => ExitCode::from(4),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Script(msg) => write!(f, "Invalid script: {}", msg),
            CliError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl From<ZestError> for CliError {
    fn from(e: ZestError) -> Self {
        match e {
            ZestError::Io(e) => CliError::Io(e.to_string()),
            other => CliError::Script(other.to_string()),
        }
    }
}

fn load_script(path: &Path) -> Result<ZestScript, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {}", path.display(), e)))?;
    let script = ZestScript::from_json(&content)?;
    debug!(path = %path.display(), statements = script.statement_count(), "script loaded");
    Ok(script)
}

fn print_names(names: Vec<String>, format: OutputFormat, key: &str) {
    match format {
        OutputFormat::Json => {
            let mut object = serde_json::Map::new();
            object.insert(key.to_string(), serde_json::Value::from(names));
            println!("{}", serde_json::Value::Object(object));
        }
        OutputFormat::Text => {
            for name in names {
                println!("{}", name);
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Tree { file } => {
            let script = load_script(&file)?;
            match cli.format {
                OutputFormat::Json => {
                    let entries: Vec<_> = script
                        .chain()
                        .map(|(index, stmt)| {
                            serde_json::json!({
                                "index": index,
                                "kind": stmt.name(),
                                "enabled": stmt.enabled,
                                "label": ScriptRenderer::label(stmt),
                            })
                        })
                        .collect();
                    println!("{}", serde_json::Value::Array(entries));
                }
                OutputFormat::Text => print!("{}", ScriptRenderer::tree(&script)),
            }
        }
        Command::Vars { file } => {
            let script = load_script(&file)?;
            print_names(ScriptRenderer::names(script.variable_names()), cli.format, "variables");
        }
        Command::Handles { file } => {
            let script = load_script(&file)?;
            print_names(ScriptRenderer::names(script.client_window_handles()), cli.format, "handles");
        }
        Command::Prefix {
            file,
            new_prefix,
            old_prefix,
            write,
        } => {
            if new_prefix.is_empty() {
                return Err(CliError::Usage("--new must not be empty".to_string()));
            }
            let mut script = load_script(&file)?;
            match old_prefix {
                Some(old) => script.rewrite_prefix(&old, &new_prefix),
                None => script.set_prefix(&new_prefix),
            }
            let json = script.to_json_pretty()?;
            if write {
                std::fs::write(&file, json + "\n")
                    .map_err(|e| CliError::Io(format!("{}: {}", file.display(), e)))?;
                info!(path = %file.display(), prefix = %new_prefix, "prefix rewritten");
            } else {
                println!("{}", json);
            }
        }
        Command::Check { file } => {
            let script = load_script(&file)?;
            let summary = ScriptRenderer::summary(&script);
            match cli.format {
                OutputFormat::Json => {
                    let json = serde_json::to_string(&summary).map_err(|e| CliError::Script(e.to_string()))?;
                    println!("{}", json);
                }
                OutputFormat::Text => {
                    println!("title:      {}", summary.title);
                    println!("type:       {}", summary.script_type.as_deref().unwrap_or("-"));
                    println!("version:    {}", summary.zest_version);
                    println!("statements: {}", summary.statements);
                    println!("parameters: {}", summary.parameters);
                    println!("passive:    {}", summary.passive);
                }
            }
        }
        Command::Config => {
            let config = ZestConfig::load();
            match cli.format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&config).map_err(|e| CliError::Script(e.to_string()))?;
                    println!("{}", json);
                }
                OutputFormat::Text => {
                    println!("token_start:  {}", config.token_start);
                    println!("token_end:    {}", config.token_end);
                    println!("skip_sleeps:  {}", config.skip_sleeps);
                    match config.max_sleep_ms {
                        Some(ms) => println!("max_sleep_ms: {}", ms),
                        None => println!("max_sleep_ms: -"),
                    }
                }
            }
        }
    }
    Ok(())
}
