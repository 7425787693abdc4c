use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// One-way directory synchronizer: makes DST mirror SRC.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Source directory
    pub src: PathBuf,
    /// Destination directory
    pub dst: PathBuf,

    /// Report additions during the initial copy into an empty destination
    #[clap(long, short)]
    pub verbose: bool,

    /// Write the paths of changed destination entries to this file
    #[clap(long, short)]
    pub listfile: Option<PathBuf>,

    /// Exclude relative paths matching this shell pattern (repeatable)
    #[clap(long, short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Leave absolute symlinks into the source tree as they are
    #[clap(long = "nofix-symlinks")]
    pub nofix_symlinks: bool,

    /// Exclude entries whose name starts with a dot
    #[clap(long)]
    pub skip_hidden: bool,

    #[clap(long, short = 'L', default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
