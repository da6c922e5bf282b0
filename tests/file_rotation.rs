// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::sync::Arc;
use std::sync::Mutex;

use logsink::Level;
use logsink::Logger;
use logsink::Error;
use logsink::Record;
use logsink::Sink;
use logsink::Trap;
use logsink::layout::CustomLayout;
use logsink::sink::FileBuilder;
use rand::Rng;
use rand::distr::Alphanumeric;
use tempfile::TempDir;

fn raw_layout() -> CustomLayout {
    CustomLayout::new(|record: &Record, _: bool| Ok(format!("{}\n", record.payload())))
}

#[derive(Debug, Clone, Default)]
struct CountingTrap {
    errors: Arc<Mutex<Vec<String>>>,
}

impl Trap for CountingTrap {
    fn trap(&self, err: &Error) {
        self.errors.lock().unwrap().push(err.to_string());
    }
}

fn generate_random_string() -> String {
    let mut rng = rand::rng();
    let len = rng.random_range(50..=100);
    std::iter::repeat(())
        .map(|()| rng.sample(Alphanumeric))
        .map(char::from)
        .take(len)
        .collect()
}

#[test]
fn test_rotation_moves_full_file_to_backup() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("service.log");

    let logger = Logger::new("rotation");
    let sink = logger.create_sink(
        FileBuilder::utf8(&path)
            .max_size(100)
            .layout(raw_layout())
            .build(),
    );

    let first = "1".repeat(59);
    let second = "2".repeat(49);
    logger.log(Level::Info, format_args!("{first}"));
    assert_eq!(fs::read_to_string(&path).unwrap().len(), 60);
    logger.log(Level::Info, format_args!("{second}"));

    assert_eq!(
        fs::read_to_string(sink.backup_path()).unwrap(),
        format!("{first}\n")
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), format!("{second}\n"));
    assert!(sink.is_open());
}

#[test]
fn test_rotation_replaces_previous_backup() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("service.log");
    let sink = FileBuilder::utf8(&path)
        .max_size(200)
        .layout(raw_layout())
        .build();

    let mut written = Vec::new();
    for _ in 0..40 {
        let line = generate_random_string();
        sink.consume(&Record::new(Level::Info, line.clone()));
        written.push(line);
    }

    let backup = fs::read_to_string(sink.backup_path()).unwrap();
    let live = fs::read_to_string(&path).unwrap();
    assert!(backup.len() < 200 + 101, "backup too large: {}", backup.len());
    assert!(live.len() < 200, "live file too large: {}", live.len());

    // No record is split across files, and the two files hold the most recent records in order.
    let tail: Vec<&str> = backup.lines().chain(live.lines()).collect();
    let expected: Vec<&str> = written[written.len() - tail.len()..]
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(tail, expected);
}

#[test]
fn test_existing_file_counts_toward_threshold() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("service.log");
    fs::write(&path, "x".repeat(90)).unwrap();

    let sink = FileBuilder::utf8(&path)
        .max_size(100)
        .layout(raw_layout())
        .build();
    assert_eq!(sink.size(), 90);
    sink.consume(&Record::new(Level::Warn, "0123456789"));

    assert_eq!(fs::read_to_string(sink.backup_path()).unwrap(), "x".repeat(90));
    assert_eq!(fs::read_to_string(&path).unwrap(), "0123456789\n");
}

#[test]
fn test_blocked_backup_keeps_writing_to_live_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("blocked.log");
    let backup = temp_dir.path().join("blocked.log.bak");
    // a non-empty directory cannot be replaced by the rotated file
    fs::create_dir_all(backup.join("blocker")).unwrap();

    let trap = CountingTrap::default();
    let sink = FileBuilder::utf8(&path)
        .max_size(100)
        .layout(raw_layout())
        .trap(trap.clone())
        .build();

    sink.consume(&Record::new(Level::Info, "a".repeat(59)));
    sink.consume(&Record::new(Level::Info, "b".repeat(49)));

    assert!(sink.is_open());
    let errors = trap.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("failed to move log file to backup"), "{}", errors[0]);
    assert_eq!(fs::read_to_string(&path).unwrap(), format!("{}\n", "b".repeat(49)));
    assert_eq!(sink.size(), 50);
    assert!(backup.join("blocker").is_dir());
}
