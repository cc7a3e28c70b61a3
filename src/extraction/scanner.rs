//! Directory walk that finds RAR volumes by file name.

use crate::types::ArchivePart;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `.rar`, or `.r` followed by two or three digits (`.r00`..`.r999`)
// Literal pattern, cannot fail to compile
#[allow(clippy::expect_used)]
static ARCHIVE_PART_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:rar|r[0-9]{2,3})$").expect("valid archive part regex")
});

/// Check if a path names a RAR volume
///
/// Matches the whole extension case-insensitively: `movie.rar`, `movie.R01` and
/// `movie.r001` qualify, `movie.rar5`, `movie.r1` and `movie.part1.zip` do not.
pub fn is_archive_part(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ARCHIVE_PART_EXTENSION.is_match(ext))
}

/// Find every RAR volume below `root` that is not in `processed`
///
/// The walk descends into all subdirectories. A directory that cannot be read
/// contributes nothing instead of failing the scan. Symlinks to files are
/// considered, symlinks to directories are not followed.
///
/// The result is sorted by path.
pub async fn scan_archive_parts(root: &Path, processed: &HashSet<PathBuf>) -> Vec<ArchivePart> {
    let mut found = Vec::new();
    collect_archive_parts(root, processed, &mut found).await;
    found.sort();

    debug!(?root, candidates = found.len(), "scan complete");

    found.into_iter().map(ArchivePart::from).collect()
}

fn collect_archive_parts<'a>(
    dir: &'a Path,
    processed: &'a HashSet<PathBuf>,
    found: &'a mut Vec<PathBuf>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
        use tokio::fs;

        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = ?dir, error = %e, "failed to read directory while searching for archives");
                return;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(path = ?dir, error = %e, "failed to read directory entry");
                    break;
                }
            };
            let entry_path = entry.path();

            let file_type = match entry.file_type().await {
                Ok(ft) => ft,
                Err(_) => continue,
            };

            let is_file = if file_type.is_symlink() {
                // Broken links fail metadata() and are skipped
                fs::metadata(&entry_path)
                    .await
                    .map(|m| m.is_file())
                    .unwrap_or(false)
            } else {
                file_type.is_file()
            };

            if is_file {
                if is_archive_part(&entry_path) && !processed.contains(&entry_path) {
                    found.push(entry_path);
                }
            } else if file_type.is_dir() {
                collect_archive_parts(&entry_path, processed, found).await;
            }
        }
    })
}
