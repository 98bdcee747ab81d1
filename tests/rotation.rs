//! File sink rotation scenarios driven through a full logger.

use bitlog::tag::TagRegistry;
use bitlog::{
    CronFileSink, FlagSet, Level, Logger, Scheduler, SinkError, SizeFileSink, args,
};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn plain_logger(sink: impl bitlog::Sink + 'static, level: Level) -> Logger {
    Logger::builder()
        .levels(level.into())
        .flags(FlagSet::EMPTY)
        .tag_registry(Arc::new(TagRegistry::new()))
        .sink(sink)
        .build()
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn size_rotation_after_threshold() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.log");
    let sink = SizeFileSink::new(&path, 100).unwrap();
    let logger = plain_logger(sink, Level::Info);

    // five 30-byte records: 29 bytes of message plus the newline
    let msg = "abcdefghijklmnopqrstuvwxyz012";
    assert_eq!(msg.len(), 29);
    for _ in 0..5 {
        logger.info(&args![msg]);
    }

    let names = dir_entries(dir.path());
    assert_eq!(names.len(), 2, "expected exactly one rotation: {names:?}");
    let backup = names.iter().find(|n| n.contains(".bak.")).unwrap();

    // backup name carries a compact 12-digit timestamp
    let stamp = backup.rsplit('.').next().unwrap();
    assert_eq!(stamp.len(), 12);
    assert!(stamp.chars().all(|c| c.is_ascii_digit()));

    // first four records rotated away, fifth in the fresh file
    let rotated = fs::read_to_string(dir.path().join(backup)).unwrap();
    assert_eq!(rotated.lines().count(), 4);
    let current = fs::read_to_string(&path).unwrap();
    assert_eq!(current, format!("{msg}\n"));
}

#[test]
fn unbounded_threshold_never_rotates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.log");
    let sink = SizeFileSink::new(&path, 0).unwrap();
    let logger = plain_logger(sink, Level::Info);

    for i in 0..200 {
        logger.infof(format_args!("record number {i}"));
    }
    assert_eq!(dir_entries(dir.path()).len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 200);
}

#[test]
fn construction_fails_for_unwritable_directory() {
    let dir = tempdir().unwrap();
    // a file where a directory is needed
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"x").unwrap();
    let result = SizeFileSink::new(blocker.join("t.log"), 10);
    assert!(matches!(result, Err(SinkError::Io(_))));
}

#[derive(Default)]
struct ManualScheduler {
    jobs: Mutex<Vec<Box<dyn Fn() + Send + Sync>>>,
}

impl ManualScheduler {
    fn fire(&self) {
        for job in self.jobs.lock().unwrap().iter() {
            job();
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(
        &self,
        _spec: &str,
        job: Box<dyn Fn() + Send + Sync + 'static>,
    ) -> Result<(), SinkError> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

#[test]
fn cron_rotation_is_independent_of_write_volume() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.log");
    let scheduler = ManualScheduler::default();
    let sink = CronFileSink::new(&path, "0 0 * * *", &scheduler).unwrap();
    let logger = plain_logger(sink, Level::Info);

    logger.info(&args!["before rotation"]);
    scheduler.fire();
    logger.info(&args!["after rotation"]);

    let names = dir_entries(dir.path());
    assert_eq!(names.len(), 2);
    let backup = names.iter().find(|n| n.contains(".bak.")).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join(backup)).unwrap(),
        "before rotation\n"
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "after rotation\n");
}

#[test]
fn close_through_logger_stops_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.log");
    let sink = SizeFileSink::new(&path, 0).unwrap();
    let logger = plain_logger(sink, Level::Info);

    logger.info(&args!["kept"]);
    logger.close().unwrap();
    logger.info(&args!["dropped"]);
    assert_eq!(fs::read_to_string(&path).unwrap(), "kept\n");
}
