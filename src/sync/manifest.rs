use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;

/// Absolute destination paths added or changed during a pass, in the order
/// they were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeManifest {
    entries: Vec<PathBuf>,
}

impl ChangeManifest {
    pub fn record(&mut self, path: PathBuf) {
        self.entries.push(path);
    }

    pub fn into_entries(self) -> Vec<PathBuf> {
        self.entries
    }

    /// Writes one path per line to `path`, replacing any previous content.
    pub fn write_to(&self, path: &Path) -> Result<(), ManifestError> {
        debug!(
            "Writing {} manifest entries to {}",
            self.entries.len(),
            path.display()
        );
        let file = File::create(path).context(OpenSnafu { path })?;
        let mut writer = BufWriter::new(file);
        for entry in &self.entries {
            write_path_line(&mut writer, entry).context(WriteSnafu { path })?;
        }
        writer.flush().context(WriteSnafu { path })?;
        Ok(())
    }
}

#[cfg(unix)]
fn write_path_line(writer: &mut impl Write, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;

    writer.write_all(path.as_os_str().as_bytes())?;
    writer.write_all(b"\n")
}

#[cfg(not(unix))]
fn write_path_line(writer: &mut impl Write, path: &Path) -> io::Result<()> {
    writeln!(writer, "{}", path.to_string_lossy())
}

#[derive(Debug, Snafu)]
pub enum ManifestError {
    #[snafu(display("Couldn't open list file {}", path.best_effort_path_display()))]
    OpenError { path: PathBuf, source: io::Error },
    #[snafu(display("Couldn't write list file {}", path.best_effort_path_display()))]
    WriteError { path: PathBuf, source: io::Error },
}
