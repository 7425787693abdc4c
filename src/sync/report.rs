use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;

use colored::{Color, Colorize};
use supports_color::Stream;
use tracing::debug;

use crate::filesystem::{EntryKind, RelativePath};

/// One line of progress output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Added {
        kind: EntryKind,
        path: PathBuf,
        target: Option<PathBuf>,
    },
    Changed {
        kind: EntryKind,
        path: PathBuf,
        target: Option<PathBuf>,
    },
    Removed {
        path: PathBuf,
    },
    Relinked {
        path: PathBuf,
        target: PathBuf,
    },
}

impl SyncAction {
    pub fn render(&self, colorize: bool) -> String {
        match self {
            SyncAction::Added { kind, path, target } => {
                let tag = paint("[add]", Color::Green, colorize);
                with_target(format!("{tag} {kind} {}", path.display()), target.as_ref())
            }
            SyncAction::Changed { kind, path, target } => {
                let tag = paint("[chg]", Color::Yellow, colorize);
                with_target(format!("{tag} {kind} {}", path.display()), target.as_ref())
            }
            SyncAction::Removed { path } => {
                let tag = paint("[rm]", Color::Red, colorize);
                format!("{tag} {}", path.display())
            }
            SyncAction::Relinked { path, target } => {
                let tag = paint("[fixlink]", Color::Cyan, colorize);
                format!("{tag} {} -> {}", path.display(), target.display())
            }
        }
    }
}

fn paint(tag: &str, color: Color, colorize: bool) -> String {
    if colorize {
        tag.color(color).to_string()
    } else {
        tag.to_string()
    }
}

fn with_target(line: String, target: Option<&PathBuf>) -> String {
    match target {
        Some(target) => format!("{line} -> {}", target.display()),
        None => line,
    }
}

/// Tally of what a pass applied to the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: Vec<RelativePath>,
    pub changed: Vec<RelativePath>,
    pub removed: Vec<RelativePath>,
    /// Entries whose operation failed or was skipped.
    pub failures: usize,
    /// Absolute destination paths written to the change manifest, empty when
    /// no manifest was requested.
    pub change_list: Vec<PathBuf>,
}

impl SyncSummary {
    pub fn completion_line(&self) -> String {
        format!(
            "Done. {} added, {} changed, {} removed",
            self.added.len(),
            self.changed.len(),
            self.removed.len()
        )
    }
}

/// Line-oriented progress output, standard output by default.
pub struct Reporter {
    out: Box<dyn Write>,
    colorize: bool,
}

impl Reporter {
    pub fn stdout() -> Self {
        let colorize = supports_color::on(Stream::Stdout).is_some();
        colored::control::set_override(colorize);
        Self {
            colorize,
            ..Self::to_writer(io::stdout())
        }
    }

    #[cfg(test)]
    pub fn silent() -> Self {
        Self::to_writer(io::sink())
    }

    pub fn to_writer(out: impl Write + 'static) -> Self {
        Self {
            out: Box::new(out),
            colorize: false,
        }
    }

    pub fn action(&mut self, action: &SyncAction) {
        let line = action.render(self.colorize);
        self.line(line);
    }

    pub fn line(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{text}") {
            debug!("Failed to write progress output: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(
        SyncAction::Added { kind: EntryKind::RegularFile, path: "/dst/a.txt".into(), target: None },
        "[add] file /dst/a.txt"
    )]
    #[case(
        SyncAction::Added { kind: EntryKind::Directory, path: "/dst/sub".into(), target: None },
        "[add] dir /dst/sub"
    )]
    #[case(
        SyncAction::Added {
            kind: EntryKind::Symlink,
            path: "/dst/lib.so".into(),
            target: Some("lib.so.1".into()),
        },
        "[add] link /dst/lib.so -> lib.so.1"
    )]
    #[case(
        SyncAction::Changed { kind: EntryKind::RegularFile, path: "/dst/a.txt".into(), target: None },
        "[chg] file /dst/a.txt"
    )]
    #[case(SyncAction::Removed { path: "/dst/old".into() }, "[rm] /dst/old")]
    #[case(
        SyncAction::Relinked { path: "/dst/bin/tool".into(), target: "../libexec/tool".into() },
        "[fixlink] /dst/bin/tool -> ../libexec/tool"
    )]
    fn test_render_plain(#[case] action: SyncAction, #[case] expected: &str) {
        assert_eq!(action.render(false), expected);
    }

    #[test]
    fn test_render_colored_keeps_text() {
        colored::control::set_override(true);
        let rendered = SyncAction::Removed {
            path: "/dst/old".into(),
        }
        .render(true);

        assert!(rendered.contains("[rm]"));
        assert!(rendered.ends_with("/dst/old"));
    }

    #[test]
    fn test_completion_line() {
        let summary = SyncSummary {
            added: vec![RelativePath::new("a"), RelativePath::new("b")],
            changed: vec![RelativePath::new("c")],
            ..SyncSummary::default()
        };

        assert_eq!(
            summary.completion_line(),
            "Done. 2 added, 1 changed, 0 removed"
        );
    }
}
