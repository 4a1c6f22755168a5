//! External editor round trip for the rename listing.
//!
//! The original path list is written one path per line to a temporary
//! listing file, the user's editor is spawned on it, and the edited list is
//! read back once the editor exits. Empty lines are dropped so users can
//! leave blank separators without confusing the count check downstream.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

/// Errors from the editor round trip.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Listing file could not be created, written or read back.
    #[error("listing file error: {0}")]
    Io(#[from] std::io::Error),

    /// Editor process exited with a non-zero status.
    #[error("editor exited with status {0}")]
    EditorFailed(std::process::ExitStatus),

    /// The configured editor command was empty.
    #[error("editor command is empty")]
    EmptyCommand,
}

/// Resolve the preferred editor command.
///
/// Checks `$VISUAL`, then `$EDITOR`, then falls back to `vi`.
pub fn resolve_editor() -> String {
    std::env::var("VISUAL")
        .ok()
        .filter(|value| !value.is_empty())
        .or_else(|| std::env::var("EDITOR").ok().filter(|value| !value.is_empty()))
        .unwrap_or_else(|| "vi".to_string())
}

/// Write `paths` to a temporary listing, run `editor` on it, and read the
/// edited paths back.
///
/// The editor string is split on whitespace so commands like `code --wait`
/// work; the listing path is appended as the final argument. The listing
/// file is removed when this function returns.
pub fn edit_paths(paths: &[PathBuf], editor: &str) -> Result<Vec<PathBuf>, EditorError> {
    let mut listing = tempfile::Builder::new()
        .prefix("edmv-")
        .suffix(".list")
        .tempfile()?;

    for path in paths {
        writeln!(listing, "{}", path.display())?;
    }
    listing.flush()?;

    let mut parts = editor.split_whitespace();
    let program = parts.next().ok_or(EditorError::EmptyCommand)?;

    tracing::debug!(editor = program, listing = %listing.path().display(), "spawning editor");
    let status = Command::new(program)
        .args(parts)
        .arg(listing.path())
        .status()?;
    if !status.success() {
        return Err(EditorError::EditorFailed(status));
    }

    let contents = fs::read_to_string(listing.path())?;
    Ok(read_listing(&contents))
}

/// Parse an edited listing back into paths, dropping empty lines.
pub fn read_listing(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_listing_drops_empty_lines() {
        let parsed = read_listing("a.txt\n\nb.txt\n\n\nc.txt\n");
        assert_eq!(
            parsed,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("c.txt")
            ]
        );
    }

    #[test]
    fn test_read_listing_handles_crlf() {
        let parsed = read_listing("a.txt\r\nb.txt\r\n");
        assert_eq!(parsed, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn test_read_listing_keeps_spaces_in_names() {
        let parsed = read_listing("my file.txt\n");
        assert_eq!(parsed, vec![PathBuf::from("my file.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_paths_round_trip_with_noop_editor() {
        // `true` exits 0 without touching the listing, so the edited list
        // equals the original list.
        let paths = vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")];
        let edited = edit_paths(&paths, "true").unwrap();
        assert_eq!(edited, paths);
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_paths_reports_editor_failure() {
        let err = edit_paths(&[PathBuf::from("/tmp/a")], "false").unwrap_err();
        assert!(matches!(err, EditorError::EditorFailed(_)));
    }

    #[test]
    fn test_empty_editor_command() {
        let err = edit_paths(&[PathBuf::from("/tmp/a")], "   ").unwrap_err();
        assert!(matches!(err, EditorError::EmptyCommand));
    }
}
