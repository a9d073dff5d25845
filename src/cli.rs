use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for capex
#[derive(Parser, Debug, Default)]
#[command(version, about = "CapEx Analyzer: quarterly capital-expenditure comparisons")]
pub struct Args {
    /// Dataset file (CSV with a header row). Defaults to dataset.default_path from the config.
    pub path: Option<PathBuf>,

    /// Specify the delimiter to use when reading the dataset
    #[arg(long = "delimiter")]
    pub delimiter: Option<char>,

    /// Name of the column holding company names
    #[arg(long = "key-column")]
    pub key_column: Option<String>,

    /// Preselect a company (repeatable). Names are matched approximately.
    #[arg(long = "company", short = 'c')]
    pub companies: Vec<String>,

    /// Number of companies to show (0 = all)
    #[arg(long = "count", short = 'n')]
    pub count: Option<usize>,

    /// Start with results already shown, as if Run had been pressed
    #[arg(long = "run", action)]
    pub run: bool,

    /// Print the results table to stdout and exit instead of starting the interface
    #[arg(long = "print", action)]
    pub print: bool,

    /// Load configuration from this file on top of the user config
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Write the default configuration file and exit
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Overwrite an existing configuration file with --generate-config
    #[arg(long = "force", action, requires = "generate_config")]
    pub force: bool,

    /// Clear all cache data (including the log file) and exit
    #[arg(long = "clear-cache", action)]
    pub clear_cache: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    /// Write logs to this file instead of the cache directory
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,
}
