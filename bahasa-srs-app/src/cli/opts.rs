use bahasa_srs_core::{ALL_CATEGORIES, DEFAULT_NEW_LIMIT};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum StoreKind {
    Json,
    Sqlite,
    /// Throwaway in-process store
    Memory,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "bahasa-srs", version, about = "Spaced-repetition vocabulary review")]
pub struct Cli {
    /// Storage backend
    #[arg(long, value_enum, default_value_t = StoreKind::Json)]
    pub store: StoreKind,

    /// Directory for the JSON store and its backups (defaults to app data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// SQLite DB path when --store sqlite (defaults to app data dir)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Vocabulary CSV (id,en,notes,category); the bundled list is used otherwise
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Counts of total/learned/due/new/mature items
    Stats(Filter),
    /// Items due today
    Due(Filter),
    /// Items never reviewed
    New {
        #[command(flatten)]
        filter: Filter,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Scheduling state of one item
    Show { id: String },
    /// Record one grade (again|good|easy)
    Grade { id: String, grade: String },
    /// Interactive review loop
    Review(ReviewCmd),
    /// List catalog categories
    Categories,
    /// Write all progress records as JSON
    Export { path: PathBuf },
    /// Delete all progress
    Reset {
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args, Clone)]
pub struct Filter {
    #[arg(long, default_value = ALL_CATEGORIES)]
    pub category: String,
}

#[derive(Debug, Args, Clone)]
pub struct ReviewCmd {
    #[command(flatten)]
    pub filter: Filter,
    /// New items added on top of the due ones
    #[arg(long, default_value_t = DEFAULT_NEW_LIMIT)]
    pub new_limit: usize,
    /// Seed for deck shuffling and requeue positions
    #[arg(long)]
    pub seed: Option<u64>,
}
