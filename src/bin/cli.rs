//! logkv CLI
//!
//! Command-line interface over a logkv data directory.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logkv::storage::LogEntry;
use logkv::{AppendOnlyLog, Config, OpenMode, RecordKind, StorageEngine};
use tracing_subscriber::{fmt, EnvFilter};

/// logkv CLI
#[derive(Parser, Debug)]
#[command(name = "logkv")]
#[command(about = "Append-only log key-value store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./logkv_data")]
    data_dir: String,

    /// Tablespace (log file name without extension)
    #[arg(short, long, default_value = "default")]
    tablespace: String,

    /// Skip scanning the log on startup (the index starts empty)
    #[arg(long)]
    no_replay: bool,

    /// fsync after every write
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Log(LogCommand),

    /// Run a short set/get/delete walkthrough in a temporary directory
    Demo,
}

/// Commands that operate on the configured log
#[derive(Subcommand, Debug)]
enum LogCommand {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Print every record in the log
    Dump,

    /// Print live key count and log size
    Stats,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,logkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("Command failed: {}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> logkv::Result<()> {
    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .tablespace(&args.tablespace)
        .sync_on_write(args.sync)
        .replay_on_open(!args.no_replay)
        .build();

    match args.command {
        Commands::Log(command) => run_command(&config, command),
        Commands::Demo => run_demo(),
    }
}

fn run_command(config: &Config, command: LogCommand) -> logkv::Result<()> {
    tracing::debug!("Opening {}", config.log_path().display());
    let mut log = AppendOnlyLog::open(config)?;

    match command {
        LogCommand::Get { key } => match log.get(key.as_bytes()) {
            Ok(value) => println!("{}", String::from_utf8_lossy(&value)),
            Err(e) if e.is_not_found() => println!("(nil)"),
            Err(e) => return Err(e),
        },
        LogCommand::Set { key, value } => {
            log.set(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        LogCommand::Del { key } => match log.delete(key.as_bytes()) {
            Ok(()) => println!("OK"),
            Err(e) if e.is_not_found() => println!("(nil)"),
            Err(e) => return Err(e),
        },
        LogCommand::Dump => {
            for entry in log.scan() {
                print_entry(&entry?);
            }
        }
        LogCommand::Stats => {
            println!("live keys: {}", log.len());
            println!("log bytes: {}", log.log_len());
        }
    }

    log.close()
}

fn print_entry(entry: &LogEntry) {
    let kind = match entry.record.kind() {
        RecordKind::Value => "SET",
        RecordKind::Tombstone => "DEL",
    };

    println!(
        "{:>10}  {}  {}  ({} bytes)",
        entry.offset,
        kind,
        entry.record.key().escape_ascii(),
        entry.record.value_bytes().len()
    );
}

/// hello/world walkthrough, ending with a reopen that skips replay
fn run_demo() -> logkv::Result<()> {
    let data_dir: PathBuf = std::env::temp_dir().join(format!("logkv-demo-{}", std::process::id()));
    println!("TEMP DIR: {}", data_dir.display());

    let config = Config::builder()
        .data_dir(&data_dir)
        .tablespace("demo")
        .open_mode(OpenMode::Truncate)
        .build();

    let mut log = AppendOnlyLog::open(&config)?;

    let writes: [(&[u8], &[u8]); 3] = [(b"hello", b"world"), (b"hello", b"all"), (b"name", b"logkv")];
    for (key, value) in writes {
        log.set(key, value)?;
        println!(
            "SET: {} = {}",
            String::from_utf8_lossy(key),
            String::from_utf8_lossy(value)
        );
    }

    let value = log.get(b"hello")?;
    println!("GET: hello = {}", String::from_utf8_lossy(&value));

    log.delete(b"hello")?;
    println!("DEL: hello");

    match log.get(b"hello") {
        Err(e) if e.is_not_found() => println!("GET: hello -> {}", e),
        other => println!("GET: hello -> unexpected {:?}", other),
    }
    log.close()?;

    // Reopen without replay: "name" is still on disk, but the index is empty
    let reopened = AppendOnlyLog::open(&Config {
        open_mode: OpenMode::Append,
        ..config
    })?;
    println!(
        "REOPEN: {} bytes on disk, contains(name) = {}",
        reopened.log_len(),
        reopened.contains(b"name")
    );
    reopened.close()?;

    std::fs::remove_dir_all(&data_dir)?;
    Ok(())
}
