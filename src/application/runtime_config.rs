use std::path::PathBuf;

use crate::cli::Cli;
use crate::filter::{HIDDEN_ENTRY_PATTERNS, PathFilter};

/// Everything a sync run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Report additions even when the destination started out empty.
    pub verbose_initial: bool,
    /// Where to write the list of changed destination paths, if anywhere.
    pub listfile: Option<PathBuf>,
    pub exclude_patterns: Vec<String>,
    pub skip_fix_symlinks: bool,
}

impl RuntimeConfig {
    pub fn path_filter(&self) -> PathFilter {
        if self.exclude_patterns.is_empty() {
            return PathFilter::allow_all();
        }
        PathFilter::new(self.exclude_patterns.clone())
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let mut exclude_patterns = Vec::with_capacity(cli.exclude.len() + 2);
        if cli.skip_hidden {
            exclude_patterns.extend(HIDDEN_ENTRY_PATTERNS.iter().map(|p| p.to_string()));
        }
        exclude_patterns.extend(cli.exclude);

        Self {
            source: cli.src,
            destination: cli.dst,
            verbose_initial: cli.verbose,
            listfile: cli.listfile,
            exclude_patterns,
            skip_fix_symlinks: cli.nofix_symlinks,
        }
    }
}
