use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::clipboard::{ClipboardWatcher, ReaderSource, SelectionKind, SelectionSource};
use crate::config::{DEFAULT_CAPACITY, DEFAULT_PREVIEW_WIDTH, DedupMode, StoreConfig};
use crate::daemon::{DEFAULT_POLL_INTERVAL, Daemon, DaemonOptions};
use crate::line_cache::{index_path, read_index, write_index};
use crate::models::IndexRecord;
use crate::store::{EntryStore, InsertOutcome};
use crate::utils::{StorageLock, resolve_storage_dir, sanitize_for_terminal};

#[derive(Parser)]
#[command(name = "scm")]
#[command(version)]
#[command(about = "Keep a bounded, file-backed history of clipboard selections", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Enable debug logging
    #[arg(global = true, short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args)]
pub struct StoreArgs {
    /// Storage directory [default: <data dir>/scm]
    #[arg(global = true, short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Maximum number of entries to keep
    #[arg(
        global = true,
        short = 'n',
        long,
        default_value_t = DEFAULT_CAPACITY as u32,
        value_parser = clap::value_parser!(u32).range(1..=10_000)
    )]
    pub capacity: u32,

    /// Keep evicted entries on disk, only dropping them from the line cache
    #[arg(global = true, short = 'k', long)]
    pub keep: bool,

    /// Total width of a preview line, suffix included
    #[arg(
        global = true,
        short = 'w',
        long,
        default_value_t = DEFAULT_PREVIEW_WIDTH as u16,
        value_parser = clap::value_parser!(u16).range(16..=1024)
    )]
    pub preview_width: u16,

    /// How new text is compared against existing entries
    #[arg(global = true, long, value_enum, default_value_t = DedupMode::Preview)]
    pub dedup: DedupMode,
}

impl StoreArgs {
    pub fn to_config(&self) -> StoreConfig {
        StoreConfig {
            capacity: self.capacity as usize,
            retain_on_evict: self.keep,
            preview_width: self.preview_width as usize,
            dedup: self.dedup,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch the clipboard and record each new text selection (default)
    Watch(WatchArgs),
    /// Store text read from stdin as a new entry
    Add,
    /// Rescan the storage directory and rewrite the line cache
    Rebuild,
    /// Print the line cache, newest first
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct WatchArgs {
    /// Store the current selection once and exit
    #[arg(short = '1', long)]
    pub oneshot: bool,

    /// Watch the primary selection instead of the clipboard (X11/Wayland)
    #[arg(short, long)]
    pub primary: bool,

    /// Milliseconds between clipboard polls
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub interval_ms: u64,
}

impl Default for WatchArgs {
    fn default() -> Self {
        Self {
            oneshot: false,
            primary: false,
            interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = resolve_storage_dir(cli.store.dir.as_deref())?;
    let config = cli.store.to_config();

    match cli.command {
        Some(Commands::Watch(args)) => watch(&root, config, &args),
        Some(Commands::Add) => add(&root, config),
        Some(Commands::Rebuild) => rebuild(&root, config),
        Some(Commands::List { json }) => list(&root, json),
        None => watch(&root, config, &WatchArgs::default()),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info,scm=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

fn open_store(root: &Path, config: StoreConfig) -> Result<EntryStore> {
    let mut store = EntryStore::open(root, config).context("Failed to open storage directory")?;
    store.scan().context("Failed to scan storage directory")?;
    Ok(store)
}

fn watch(root: &Path, config: StoreConfig, args: &WatchArgs) -> Result<()> {
    let _lock = StorageLock::acquire(root)?;
    let store = EntryStore::open(root, config).context("Failed to open storage directory")?;

    let kind = if args.primary { SelectionKind::Primary } else { SelectionKind::Clipboard };
    let source = ClipboardWatcher::new(kind)?;
    let options =
        DaemonOptions { poll_interval: Duration::from_millis(args.interval_ms), oneshot: args.oneshot };

    Daemon::new(store, source, options).run()
}

fn add(root: &Path, config: StoreConfig) -> Result<()> {
    let _lock = StorageLock::acquire(root)?;
    let mut store = open_store(root, config)?;

    let text = ReaderSource::new(io::stdin()).fetch_selection_text()?.unwrap_or_default();
    match store.insert(&text).context("Failed to store entry")? {
        InsertOutcome::Stored(entry) => {
            write_index(&store).context("Failed to write line cache")?;
            println!("{}", entry.path.display());
        }
        InsertOutcome::Rejected(reason) => {
            println!("Not stored: {}", reason);
        }
    }

    Ok(())
}

fn rebuild(root: &Path, config: StoreConfig) -> Result<()> {
    let _lock = StorageLock::acquire(root)?;
    let store = open_store(root, config)?;
    let path = write_index(&store).context("Failed to write line cache")?;

    println!("Indexed {} entries into {}", store.len(), path.display());
    Ok(())
}

fn list(root: &Path, json: bool) -> Result<()> {
    let records = read_index(&index_path(root))?;

    if json {
        let out = serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
        println!("{}", out);
        return Ok(());
    }

    for record in &records {
        println!("{}", format_record(record));
    }
    Ok(())
}

fn format_record(record: &IndexRecord) -> String {
    let preview = sanitize_for_terminal(&record.preview);
    match record.id().and_then(|id| id.created_at()) {
        Some(created) => format!("{}  {}", created.format("%Y-%m-%d %H:%M:%S"), preview),
        None => format!("{}  {}", record.path.display(), preview),
    }
}
