use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{OntokitError, Result};
use crate::install::policy::{InstallDecision, PolicySet};

/// Line prefix introducing a new embedded file in a dynamic template's
/// rendered output. The remainder of the line is the file's relative path.
pub const FILE_MARKER: &str = "^^^ ";

/// One embedded file parsed out of a multi-file blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    /// Path relative to the unpack base directory.
    pub path: PathBuf,
    /// Literal content, every line newline-terminated.
    pub content: String,
}

/// Parse a multi-file blob into its embedded file blocks.
///
/// Grammar (line oriented): optional blank lines, then one or more
/// blocks, each introduced by a marker line and extending to the next
/// marker or end of input. Non-blank text before the first marker is a
/// format error; every byte must be attributed to some file.
pub fn parse_blocks(text: &str) -> Result<Vec<FileBlock>> {
    let mut blocks: Vec<FileBlock> = Vec::new();

    let mut lines: Vec<&str> = text.split('\n').collect();
    // A trailing newline terminates the last content line rather than
    // opening an empty one.
    if lines.last() == Some(&"") {
        lines.pop();
    }

    for line in lines {
        if let Some(path) = line.strip_prefix(FILE_MARKER) {
            blocks.push(FileBlock {
                path: PathBuf::from(path.trim()),
                content: String::new(),
            });
        } else {
            match blocks.last_mut() {
                Some(block) => {
                    block.content.push_str(line);
                    block.content.push('\n');
                }
                None if line.trim().is_empty() => continue,
                None => {
                    return Err(OntokitError::UnpackFormat {
                        line: line.to_string(),
                    });
                }
            }
        }
    }

    Ok(blocks)
}

/// Materialize a multi-file blob under `base_dir`.
///
/// Parsing happens up front, so a malformed blob fails before any file is
/// created. Each block is checked against the install policies using its
/// relative path; skipped blocks are discarded but parsing of the
/// remainder is unaffected. Returns exactly the paths written. Blocks are
/// written one at a time, so consecutive blocks naming the same file
/// never interleave.
pub fn unpack(base_dir: &Path, text: &str, policies: &PolicySet) -> Result<Vec<PathBuf>> {
    let blocks = parse_blocks(text)?;
    let mut written: Vec<PathBuf> = Vec::new();

    for block in blocks {
        let target = base_dir.join(&block.path);
        // Existence is judged against the pre-run state: a block written
        // earlier in this same blob does not shadow a later block for the
        // same nominal filename.
        let preexisted = target.exists() && !written.contains(&target);
        if policies.decide(&block.path, preexisted) == InstallDecision::Skip {
            debug!("skipping {} (install policy)", block.path.display());
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| OntokitError::io(format!("creating {}", parent.display()), e))?;
        }
        fs::write(&target, &block.content)
            .map_err(|e| OntokitError::io(format!("writing {}", target.display()), e))?;
        info!("unpacked {}", target.display());
        if !written.contains(&target) {
            written.push(target);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::policy::InstallAction;

    #[test]
    fn round_trip_two_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let text = "^^^ a/x.txt\nhello\n^^^ b/y.txt\nworld\n";

        let written = unpack(dir.path(), text, &PolicySet::empty()).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("a/x.txt"), dir.path().join("b/y.txt")]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("a/x.txt")).unwrap(),
            "hello\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("b/y.txt")).unwrap(),
            "world\n"
        );
    }

    #[test]
    fn content_before_first_marker_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = unpack(dir.path(), "stray line\n^^^ a.txt\nok\n", &PolicySet::empty())
            .unwrap_err();
        assert!(matches!(err, OntokitError::UnpackFormat { .. }));
        assert!(!dir.path().join("a.txt").exists());
    }

    #[test]
    fn leading_blank_lines_are_tolerated() {
        let blocks = parse_blocks("\n\n^^^ a.txt\nok\n").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "ok\n");
    }

    #[test]
    fn blank_lines_inside_a_block_are_content() {
        let blocks = parse_blocks("^^^ a.txt\nfirst\n\nlast\n").unwrap();
        assert_eq!(blocks[0].content, "first\n\nlast\n");
    }

    #[test]
    fn skipped_blocks_do_not_stop_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let policies =
            PolicySet::new(&[("a.txt", InstallAction::Never)]).unwrap();
        let text = "^^^ a.txt\nprotected\n^^^ b.txt\nwanted\n";

        let written = unpack(dir.path(), text, &policies).unwrap();

        assert_eq!(written, vec![dir.path().join("b.txt")]);
        assert!(!dir.path().join("a.txt").exists());
    }

    #[test]
    fn consecutive_blocks_same_filename_last_wins() {
        let dir = tempfile::tempdir().unwrap();
        let text = "^^^ a.txt\nfirst\n^^^ a.txt\nsecond\n";

        let written = unpack(dir.path(), text, &PolicySet::empty()).unwrap();

        assert_eq!(written, vec![dir.path().join("a.txt")]);
        assert_eq!(
            fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "second\n"
        );
    }
}
