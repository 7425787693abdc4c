use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::ext::BestEffortPathExt;
use crate::relocate::SymlinkRelocator;
use crate::sync::{Reporter, SyncError, SyncSummary, Synchronizer};

pub struct Application;

impl Application {
    pub fn run(config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let config: RuntimeConfig = config.into();
        let mut reporter = Reporter::stdout();
        Self::run_with(&config, &mut reporter)?;
        Ok(())
    }

    /// One full invocation: sync, then optionally repair symlinks.
    pub fn run_with(
        config: &RuntimeConfig,
        reporter: &mut Reporter,
    ) -> Result<SyncSummary, ApplicationError> {
        reporter.line(format_args!(
            "Sync: {} -> {}",
            config.source.best_effort_path_display(),
            config.destination.best_effort_path_display()
        ));

        let filter = config.path_filter();
        debug!("Using {:?}", filter);

        let summary = Synchronizer::new(config, &filter)
            .run(reporter)
            .context(SyncSnafu)?;
        info!(
            "Sync finished with {} failed operations, {} paths in the change list",
            summary.failures,
            summary.change_list.len()
        );

        if config.skip_fix_symlinks {
            debug!("Symlink repair disabled");
        } else {
            SymlinkRelocator::new(config, &filter).run(reporter);
        }

        reporter.line(summary.completion_line());
        Ok(summary)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during synchronization"))]
    SyncError { source: SyncError },
}
