//! End-to-end extraction tasks against a real filesystem.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use arcwatch_core::ArchiveEvent;
use arcwatch_core::ArchiveKind;
use arcwatch_core::CompressionCodec;
use arcwatch_core::ExtractOutcome;
use arcwatch_core::ExtractionError;
use arcwatch_core::ExtractionTask;
use arcwatch_core::Extractor;
use arcwatch_core::RetryPolicy;
use arcwatch_core::SkipReason;
use arcwatch_core::SourceOpener;
use arcwatch_core::SourceReader;
use arcwatch_core::TaskStatus;
use arcwatch_core::classify;
use arcwatch_core::extraction::FsOpener;
use arcwatch_core::sink::MemorySink;
use arcwatch_core::test_utils::TarTestBuilder;
use arcwatch_core::test_utils::create_test_sevenz;
use arcwatch_core::test_utils::create_test_tar;
use arcwatch_core::test_utils::create_test_zip;
use arcwatch_core::test_utils::gzip;
use tempfile::TempDir;

const FAILURE_SUFFIX: &str = "File may still be locked.";

/// `Downloads/` and `Installations/` under a fresh temp dir.
struct Layout {
    _temp: TempDir,
    downloads: PathBuf,
    installs: PathBuf,
}

impl Layout {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let downloads = temp.path().join("Downloads");
        let installs = temp.path().join("Installations");
        fs::create_dir_all(&downloads).unwrap();
        fs::create_dir_all(&installs).unwrap();
        Self {
            _temp: temp,
            downloads,
            installs,
        }
    }

    fn put(&self, release: &str, name: &str, data: &[u8]) -> PathBuf {
        let dir = self.downloads.join(release);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, data).unwrap();
        path
    }

    fn installs_is_empty(&self) -> bool {
        fs::read_dir(&self.installs).unwrap().next().is_none()
    }
}

/// Fails with a sharing violation for the first `failures` opens.
struct FlakyOpener {
    failures: u32,
    opens: Arc<AtomicU32>,
}

impl SourceOpener for FlakyOpener {
    fn open(&self, path: &Path) -> io::Result<Box<dyn SourceReader>> {
        if self.opens.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "being used by another process",
            ));
        }
        FsOpener.open(path)
    }
}

/// Hands out a write-only handle, so every read of the source fails.
struct WriteOnlyOpener;

impl SourceOpener for WriteOnlyOpener {
    fn open(&self, path: &Path) -> io::Result<Box<dyn SourceReader>> {
        Ok(Box::new(File::options().write(true).open(path)?))
    }
}

fn flaky_extractor(failures: u32, max_attempts: u32) -> (Extractor, Arc<AtomicU32>) {
    let opens = Arc::new(AtomicU32::new(0));
    let extractor = Extractor::new()
        .with_retry(RetryPolicy::new(max_attempts, Duration::from_millis(2)))
        .with_opener(FlakyOpener {
            failures,
            opens: Arc::clone(&opens),
        });
    (extractor, opens)
}

fn run_task(
    source: &Path,
    dest: &Path,
    extractor: &Extractor,
    sink: &MemorySink,
) -> ExtractionTask {
    let mut task = ExtractionTask::new(ArchiveEvent::new(source), dest);
    let _ = task.run(extractor, sink);
    task
}

#[test]
fn test_archives_are_grouped_by_parent_folder() {
    let layout = Layout::new();
    let zip = layout.put(
        "ReleaseA",
        "part1.zip",
        &create_test_zip(&[("game.exe", "MZ"), ("data/level1.pak", "one")]),
    );
    let tgz = layout.put(
        "ReleaseA",
        "part2.tar.gz",
        &gzip(&create_test_tar(&[("data/level2.pak", "two")])),
    );
    let sink = MemorySink::new();
    let extractor = Extractor::new();

    assert_eq!(run_task(&zip, &layout.installs, &extractor, &sink).status(), TaskStatus::Succeeded);
    assert_eq!(run_task(&tgz, &layout.installs, &extractor, &sink).status(), TaskStatus::Succeeded);

    let release = layout.installs.join("ReleaseA");
    assert_eq!(fs::read_to_string(release.join("game.exe")).unwrap(), "MZ");
    assert_eq!(fs::read_to_string(release.join("data/level1.pak")).unwrap(), "one");
    assert_eq!(fs::read_to_string(release.join("data/level2.pak")).unwrap(), "two");
    assert!(!layout.installs.join("part1").exists());
    assert_eq!(sink.count_containing("Extracted ReleaseA into "), 2);
}

#[test]
fn test_every_tar_codec_extracts() {
    let layout = Layout::new();
    let tar = create_test_tar(&[("readme.txt", "compressed")]);

    let mut bz = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::fast());
    bz.write_all(&tar).unwrap();
    let mut xz = xz2::write::XzEncoder::new(Vec::new(), 1);
    xz.write_all(&tar).unwrap();

    let cases = [
        ("ReleaseGz", "a.tgz", gzip(&tar), CompressionCodec::Gzip),
        ("ReleaseBz", "a.tbz", bz.finish().unwrap(), CompressionCodec::Bzip2),
        ("ReleaseXz", "a.txz", xz.finish().unwrap(), CompressionCodec::Xz),
        (
            "ReleaseZst",
            "a.tzst",
            zstd::encode_all(tar.as_slice(), 1).unwrap(),
            CompressionCodec::Zstd,
        ),
    ];

    for (release, name, data, codec) in cases {
        let source = layout.put(release, name, &data);
        assert_eq!(classify(&source), ArchiveKind::Tar(Some(codec)));

        let outcome = Extractor::new().extract(&source, &layout.installs).unwrap();
        assert_eq!(outcome.extracted().unwrap().kind, ArchiveKind::Tar(Some(codec)));
        assert_eq!(
            fs::read_to_string(layout.installs.join(release).join("readme.txt")).unwrap(),
            "compressed"
        );
    }
}

#[test]
fn test_lock_released_before_budget() {
    let layout = Layout::new();
    let source = layout.put("ReleaseA", "game.zip", &create_test_zip(&[("a.txt", "a")]));
    let (extractor, opens) = flaky_extractor(5, 360);
    let sink = MemorySink::new();

    let task = run_task(&source, &layout.installs, &extractor, &sink);

    assert_eq!(task.status(), TaskStatus::Succeeded);
    assert_eq!(task.attempts(), 6);
    assert_eq!(opens.load(Ordering::SeqCst), 6);
    assert!(layout.installs.join("ReleaseA/a.txt").exists());
    assert_eq!(sink.count_containing(FAILURE_SUFFIX), 0);
    assert_eq!(sink.lines().len(), 1);
}

#[test]
fn test_lock_never_released() {
    let layout = Layout::new();
    let source = layout.put("ReleaseA", "game.zip", &create_test_zip(&[("a.txt", "a")]));
    let (extractor, opens) = flaky_extractor(u32::MAX, 5);
    let sink = MemorySink::new();

    let task = run_task(&source, &layout.installs, &extractor, &sink);

    assert_eq!(task.status(), TaskStatus::Failed);
    assert_eq!(opens.load(Ordering::SeqCst), 5);
    assert_eq!(
        sink.lines(),
        vec!["Extraction failed after 5 retries. File may still be locked.".to_string()]
    );
    assert!(layout.installs_is_empty());
}

#[test]
fn test_unreadable_source_fails_loudly() {
    let layout = Layout::new();
    let source = layout.put("ReleaseA", "game.zip", &create_test_zip(&[("a.txt", "a")]));
    let extractor = Extractor::new()
        .with_retry(RetryPolicy::new(3, Duration::from_millis(1)))
        .with_opener(WriteOnlyOpener);
    let sink = MemorySink::new();

    let task = run_task(&source, &layout.installs, &extractor, &sink);

    // Linux reports EBADF (a hard failure); Windows reports access denied,
    // which is retried as a lock. Either way the task must not be skipped.
    assert_eq!(task.status(), TaskStatus::Failed);
    assert_eq!(sink.lines().len(), 1);
    assert!(sink.lines()[0].contains("failed"));
    assert!(layout.installs_is_empty());
}

#[test]
fn test_non_archive_writes_nothing() {
    let layout = Layout::new();
    let source = layout.put("ReleaseA", "readme.nfo", b"greetings from the scene");
    let sink = MemorySink::new();

    let task = run_task(&source, &layout.installs, &Extractor::new(), &sink);

    assert_eq!(task.status(), TaskStatus::Skipped);
    assert!(sink.lines().is_empty());
    assert!(layout.installs_is_empty());
}

#[test]
fn test_sevenz_extracts_into_release_folder() {
    let layout = Layout::new();
    let source = layout.put(
        "ReleaseA",
        "game.7z",
        &create_test_sevenz(&[("a.txt", "alpha"), ("sub/deeper/b.txt", "beta")]),
    );
    assert_eq!(classify(&source), ArchiveKind::SevenZip);
    let sink = MemorySink::new();

    let task = run_task(&source, &layout.installs, &Extractor::new(), &sink);

    assert_eq!(task.status(), TaskStatus::Succeeded);
    let release = layout.installs.join("ReleaseA");
    assert_eq!(fs::read_to_string(release.join("a.txt")).unwrap(), "alpha");
    assert_eq!(fs::read_to_string(release.join("sub/deeper/b.txt")).unwrap(), "beta");
    assert_eq!(sink.count_containing("Extracted ReleaseA into "), 1);
    assert!(source.exists());
}

#[test]
fn test_misnamed_sevenz_fails_once() {
    let layout = Layout::new();
    let source = layout.put("ReleaseA", "game.7z", b"this is not a 7z archive");
    assert_eq!(classify(&source), ArchiveKind::SevenZip);

    let sink = MemorySink::new();
    let task = run_task(&source, &layout.installs, &Extractor::new(), &sink);

    assert_eq!(task.status(), TaskStatus::Failed);
    assert_eq!(sink.lines().len(), 1);
    assert!(sink.lines()[0].contains("game.7z"));
}

#[test]
fn test_traversal_entry_is_rejected() {
    let layout = Layout::new();
    let data = TarTestBuilder::new()
        .add_file("ok.txt", b"fine")
        .add_raw_path_file("../../escape.txt", b"evil")
        .build();
    let source = layout.put("ReleaseA", "bad.tar", &data);

    let err = Extractor::new().extract(&source, &layout.installs).unwrap_err();

    assert!(matches!(err, ExtractionError::PathTraversal { .. }));
    assert!(!layout.installs.join("escape.txt").exists());
    assert!(!layout.installs.parent().unwrap().join("escape.txt").exists());
}

#[test]
fn test_vanished_between_detection_and_open() {
    let layout = Layout::new();
    let source = layout.put("ReleaseA", "game.zip", &create_test_zip(&[("a.txt", "a")]));
    fs::remove_file(&source).unwrap();

    let outcome = Extractor::new().extract(&source, &layout.installs).unwrap();
    assert!(matches!(
        outcome,
        ExtractOutcome::Skipped(SkipReason::VanishedSource)
    ));
}

#[test]
fn test_concurrent_tasks_on_same_path() {
    let layout = Layout::new();
    let source = layout.put(
        "ReleaseA",
        "game.zip",
        &create_test_zip(&[("a.txt", "alpha"), ("nested/b.txt", "beta")]),
    );
    let extractor = Arc::new(Extractor::new());
    let sink = Arc::new(MemorySink::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let extractor = Arc::clone(&extractor);
            let sink = Arc::clone(&sink);
            let source = source.clone();
            let dest = layout.installs.clone();
            thread::spawn(move || run_task(&source, &dest, &extractor, &sink).status())
        })
        .collect();

    for handle in handles {
        let status = handle.join().expect("task thread panicked");
        assert!(status.is_terminal());
    }

    assert_eq!(
        fs::read_to_string(layout.installs.join("ReleaseA/nested/b.txt")).unwrap(),
        "beta"
    );
    assert!(source.exists());
}

#[test]
fn test_reextraction_overwrites() {
    let layout = Layout::new();
    let first = layout.put("ReleaseA", "v1.zip", &create_test_zip(&[("version.txt", "1")]));
    Extractor::new().extract(&first, &layout.installs).unwrap();

    let second = layout.put("ReleaseA", "v2.zip", &create_test_zip(&[("version.txt", "2")]));
    Extractor::new().extract(&second, &layout.installs).unwrap();

    assert_eq!(
        fs::read_to_string(layout.installs.join("ReleaseA/version.txt")).unwrap(),
        "2"
    );
}
