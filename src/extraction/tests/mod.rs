use super::*;
use crate::config::ExtractionConfig;
use crate::types::{ArchivePart, ExtractionOutcome, PostProcessExit, RunStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Extractor double that records calls and plays back scripted behavior
#[derive(Default)]
struct ScriptedExtractor {
    calls: Mutex<Vec<PathBuf>>,
    /// archive file name -> files written into the destination on success
    outputs: HashMap<&'static str, Vec<&'static str>>,
    /// archive file name -> exit code (default 0)
    exit_codes: HashMap<&'static str, i32>,
    /// remove the archive itself while "extracting" it
    consume_archives: bool,
}

impl ScriptedExtractor {
    fn with_output(mut self, archive: &'static str, files: &[&'static str]) -> Self {
        self.outputs.insert(archive, files.to_vec());
        self
    }

    fn with_exit_code(mut self, archive: &'static str, code: i32) -> Self {
        self.exit_codes.insert(archive, code);
        self
    }

    fn consuming(mut self) -> Self {
        self.consume_archives = true;
        self
    }

    fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    fn called_names(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract(&self, archive: &ArchivePart, dest: &Path) -> ExtractionOutcome {
        self.calls.lock().unwrap().push(archive.path().to_path_buf());

        let name = archive
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let code = self.exit_codes.get(name).copied().unwrap_or(0);
        let outcome = ExtractionOutcome::from_exit_code(code);

        if outcome.is_success() {
            for file in self.outputs.get(name).into_iter().flatten() {
                let target = dest.join(file);
                if let Some(parent) = target.parent() {
                    tokio::fs::create_dir_all(parent).await.unwrap();
                }
                tokio::fs::write(target, b"extracted").await.unwrap();
            }
            if self.consume_archives {
                tokio::fs::remove_file(archive.path()).await.unwrap();
            }
        }

        outcome
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

async fn write_files(root: &Path, names: &[&str]) {
    for name in names {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.unwrap();
        }
        tokio::fs::write(path, b"archive data").await.unwrap();
    }
}

fn engine(root: &Path, delete_leftover: bool, extractor: Arc<ScriptedExtractor>) -> ExtractionEngine {
    let config = ExtractionConfig::new("unused", root).with_delete_leftover(delete_leftover);
    ExtractionEngine::new(config, extractor)
}

#[tokio::test]
async fn tree_without_archives_is_an_empty_fixed_point() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["movie.mkv", "movie.nfo", "sub/sample.avi"]).await;

    let extractor = Arc::new(ScriptedExtractor::default());
    let summary = engine(temp.path(), true, extractor.clone()).run().await;

    assert!(extractor.calls().is_empty());
    assert_eq!(summary.status, RunStatus::Clean);
    assert_eq!(summary.rounds, 0);
    assert!(summary.deleted.is_empty());
    assert_eq!(summary.exit_code(), PostProcessExit::Success);
    assert!(temp.path().join("movie.mkv").exists());
}

#[tokio::test]
async fn every_volume_is_extracted_once() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.rar", "b.rar", "c/d.rar", "e.r000"]).await;

    let extractor = Arc::new(ScriptedExtractor::default());
    let summary = engine(temp.path(), false, extractor.clone()).run().await;

    assert_eq!(extractor.calls().len(), 4);
    assert_eq!(summary.extracted.len(), 4);
    assert_eq!(summary.rounds, 1);
    assert_eq!(summary.status, RunStatus::Clean);
}

#[tokio::test]
async fn single_archive_kept_without_delete_leftover() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.rar"]).await;

    let extractor = Arc::new(ScriptedExtractor::default().with_output("a.rar", &["a.txt"]));
    let summary = engine(temp.path(), false, extractor.clone()).run().await;

    assert_eq!(extractor.called_names(), vec!["a.rar"]);
    assert_eq!(summary.exit_code(), PostProcessExit::Success);
    assert!(temp.path().join("a.txt").exists());
    assert!(temp.path().join("a.rar").exists());
    assert!(summary.deleted.is_empty());
}

#[tokio::test]
async fn single_archive_removed_with_delete_leftover() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.rar"]).await;

    let extractor = Arc::new(ScriptedExtractor::default().with_output("a.rar", &["a.txt"]));
    let summary = engine(temp.path(), true, extractor.clone()).run().await;

    assert_eq!(extractor.called_names(), vec!["a.rar"]);
    assert_eq!(summary.exit_code(), PostProcessExit::Success);
    assert!(temp.path().join("a.txt").exists());
    assert!(!temp.path().join("a.rar").exists());
    assert_eq!(summary.deleted, vec![temp.path().join("a.rar")]);
}

#[tokio::test]
async fn old_style_split_volumes_are_all_matched() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["b.r01", "b.r02", "b.r03"]).await;

    let extractor = Arc::new(
        ScriptedExtractor::default()
            .with_output("b.r01", &["b.bin"])
            .with_exit_code("b.r02", 10)
            .with_exit_code("b.r03", 10),
    );
    let summary = engine(temp.path(), true, extractor.clone()).run().await;

    assert_eq!(extractor.called_names(), vec!["b.r01", "b.r02", "b.r03"]);
    assert_eq!(summary.rounds, 1);
    assert_eq!(summary.status, RunStatus::Clean);
    assert!(temp.path().join("b.bin").exists());
    for name in ["b.r01", "b.r02", "b.r03"] {
        assert!(!temp.path().join(name).exists(), "{name} should be deleted");
    }
}

#[tokio::test]
async fn failure_aborts_remaining_candidates() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["c.rar", "d.rar", "e.rar"]).await;

    let extractor = Arc::new(ScriptedExtractor::default().with_exit_code("c.rar", 3));
    let summary = engine(temp.path(), true, extractor.clone()).run().await;

    assert_eq!(extractor.called_names(), vec!["c.rar"]);
    assert_eq!(summary.status, RunStatus::Failed);
    assert_eq!(summary.exit_code(), PostProcessExit::None);
    assert!(summary.extracted.is_empty());
    assert!(summary.deleted.is_empty());
    for name in ["c.rar", "d.rar", "e.rar"] {
        assert!(temp.path().join(name).exists());
    }
}

#[tokio::test]
async fn failure_mid_round_stops_later_parts_in_scan_order() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.rar", "b.rar", "c.rar"]).await;

    let extractor = Arc::new(ScriptedExtractor::default().with_exit_code("b.rar", 1));
    let summary = engine(temp.path(), false, extractor.clone()).run().await;

    assert_eq!(extractor.called_names(), vec!["a.rar", "b.rar"]);
    assert_eq!(summary.extracted, vec![temp.path().join("a.rar")]);
    assert_eq!(summary.status, RunStatus::Failed);
}

#[tokio::test]
async fn nested_archive_is_found_in_next_round() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["outer.rar"]).await;

    let extractor = Arc::new(
        ScriptedExtractor::default()
            .with_output("outer.rar", &["inner.rar"])
            .with_output("inner.rar", &["payload.mkv"]),
    );
    let summary = engine(temp.path(), true, extractor.clone()).run().await;

    assert_eq!(extractor.called_names(), vec!["outer.rar", "inner.rar"]);
    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.status, RunStatus::Clean);
    assert!(temp.path().join("payload.mkv").exists());
    assert!(!temp.path().join("outer.rar").exists());
    assert!(!temp.path().join("inner.rar").exists());
}

#[tokio::test]
async fn nested_archive_in_subdirectory_is_found() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["outer.rar"]).await;

    let extractor = Arc::new(
        ScriptedExtractor::default().with_output("outer.rar", &["disc1/inner.r00", "disc1/inner.rar"]),
    );
    let summary = engine(temp.path(), false, extractor.clone()).run().await;

    assert_eq!(
        extractor.called_names(),
        vec!["outer.rar", "inner.r00", "inner.rar"]
    );
    assert_eq!(summary.rounds, 2);
}

#[tokio::test]
async fn failure_in_later_round_still_removes_earlier_leftovers() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["outer.rar"]).await;

    let extractor = Arc::new(
        ScriptedExtractor::default()
            .with_output("outer.rar", &["inner.rar"])
            .with_exit_code("inner.rar", 3),
    );
    let summary = engine(temp.path(), true, extractor.clone()).run().await;

    assert_eq!(extractor.called_names(), vec!["outer.rar", "inner.rar"]);
    assert_eq!(summary.status, RunStatus::Failed);
    assert_eq!(summary.deleted, vec![temp.path().join("outer.rar")]);
    assert!(temp.path().join("inner.rar").exists());
}

#[tokio::test]
async fn archives_left_in_place_are_not_extracted_twice() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.rar", "a.r00", "a.r01"]).await;

    // The nested archive appears only after the first round, forcing a rescan
    // that still sees the original volumes on disk.
    let extractor = Arc::new(
        ScriptedExtractor::default()
            .with_output("a.rar", &["nested.rar"])
            .with_exit_code("a.r00", 10)
            .with_exit_code("a.r01", 10),
    );
    let summary = engine(temp.path(), false, extractor.clone()).run().await;

    let calls = extractor.calls();
    let unique: std::collections::HashSet<_> = calls.iter().collect();
    assert_eq!(calls.len(), unique.len());
    assert_eq!(calls.len(), 4);
    assert_eq!(summary.rounds, 2);
}

#[tokio::test]
async fn delete_error_marks_failure_but_continues() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.rar", "b.rar"]).await;

    // The double removes a.rar itself, so deleting it afterwards fails
    let extractor = Arc::new(ScriptedExtractor::default().consuming());
    let config = ExtractionConfig::new("unused", temp.path()).with_delete_leftover(true);

    let mut ctx = RunContext::default();
    let engine = ExtractionEngine::new(config, extractor.clone());
    engine.extract_until_fixed_point(&mut ctx).await;
    assert_eq!(ctx.status(), RunStatus::Clean);
    assert_eq!(ctx.processed().len(), 2);

    // Recreate one file so exactly one deletion succeeds
    write_files(temp.path(), &["b.rar"]).await;
    let mut status = ctx.status();
    let deleted = super::cleanup::remove_leftovers(
        &[temp.path().join("a.rar"), temp.path().join("b.rar")],
        &mut status,
    )
    .await;

    assert_eq!(status, RunStatus::Failed);
    assert_eq!(deleted, vec![temp.path().join("b.rar")]);
}

#[tokio::test]
async fn consumed_archives_fail_the_run_on_cleanup() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.rar"]).await;

    let extractor = Arc::new(ScriptedExtractor::default().consuming());
    let summary = engine(temp.path(), true, extractor.clone()).run().await;

    assert_eq!(extractor.called_names(), vec!["a.rar"]);
    assert_eq!(summary.status, RunStatus::Failed);
    assert!(summary.deleted.is_empty());
    assert_eq!(summary.exit_code(), PostProcessExit::None);
}

#[tokio::test]
async fn runs_do_not_share_state() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["a.rar", "b.rar"]).await;

    let extractor = Arc::new(ScriptedExtractor::default());
    let engine = engine(temp.path(), false, extractor.clone());

    let first = engine.run().await;
    let second = engine.run().await;

    assert_eq!(first, second);
    assert_eq!(extractor.calls().len(), 4);
}

#[tokio::test]
async fn extracted_outputs_survive_cleanup() {
    let temp = TempDir::new().unwrap();
    write_files(temp.path(), &["show.rar", "show.r00", "extras/bonus.rar"]).await;

    let extractor = Arc::new(
        ScriptedExtractor::default()
            .with_output("show.rar", &["show.mkv"])
            .with_exit_code("show.r00", 10)
            .with_output("bonus.rar", &["extras/bonus.mkv"]),
    );
    let summary = engine(temp.path(), true, extractor).run().await;
    assert_eq!(summary.status, RunStatus::Clean);

    let mut remaining: Vec<PathBuf> = walkdir::WalkDir::new(temp.path())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(temp.path()).unwrap().to_path_buf())
        .collect();
    remaining.sort();
    assert_eq!(
        remaining,
        vec![PathBuf::from("extras/bonus.mkv"), PathBuf::from("show.mkv")]
    );
}
