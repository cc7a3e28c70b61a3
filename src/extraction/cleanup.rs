//! Removal of archive parts that have been extracted

use crate::error::{PostProcessError, Result};
use crate::types::RunStatus;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Delete one leftover archive part
pub async fn remove_leftover(path: &Path) -> Result<()> {
    tokio::fs::remove_file(path).await.map_err(|e| {
        PostProcessError::CleanupFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Delete every extracted archive part
///
/// Each file is handled independently: a failure marks the run as failed and
/// the remaining files are still attempted. Returns the paths actually removed.
pub(crate) async fn remove_leftovers(leftovers: &[PathBuf], status: &mut RunStatus) -> Vec<PathBuf> {
    info!("Deleting leftover rar files");

    let mut deleted = Vec::with_capacity(leftovers.len());
    for path in leftovers {
        info!("Deleting {}", path.display());
        match remove_leftover(path).await {
            Ok(()) => deleted.push(path.clone()),
            Err(e) => {
                error!("Delete failed: {}", e);
                status.fail();
            }
        }
    }

    info!(
        deleted = deleted.len(),
        failed = leftovers.len() - deleted.len(),
        "cleanup complete"
    );

    deleted
}
