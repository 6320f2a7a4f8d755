//! Concurrent writers against one store.
//!
//! Saving and marking-as-read both rewrite the whole log. Without a single
//! writer, two interleaved rewrites lose one of the updates. These tests
//! hammer the store from several threads, through one shared handle and
//! through separate handles on one database file, and check nothing goes
//! missing.

use std::sync::Arc;
use std::thread;

use gigmate_chat::{MessageStore, SaveMessageInput, SqliteKv};

const THREADS: usize = 8;
const PER_THREAD: usize = 25;

#[test]
fn test_concurrent_saves_lose_nothing() {
    let store = Arc::new(MessageStore::new(SqliteKv::open_in_memory().unwrap()));

    thread::scope(|s| {
        for t in 0..THREADS {
            let store = &store;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    store
                        .save_message(SaveMessageInput::new(
                            format!("J{}", t),
                            "A",
                            "B",
                            format!("thread {} message {}", t, i),
                        ))
                        .unwrap();
                }
            });
        }
    });

    let log = store.get_messages().unwrap();
    assert_eq!(log.len(), THREADS * PER_THREAD);
    for t in 0..THREADS {
        assert_eq!(
            store.get_messages_by_job_id(&format!("J{}", t)).unwrap().len(),
            PER_THREAD
        );
    }
    assert!(log.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_save_racing_mark_as_read() {
    let store = MessageStore::new(SqliteKv::open_in_memory().unwrap());
    for i in 0..PER_THREAD {
        store
            .save_message(SaveMessageInput::new("J1", "B", "A", format!("old {}", i)))
            .unwrap();
    }

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..PER_THREAD {
                store
                    .save_message(SaveMessageInput::new("J2", "C", "A", format!("new {}", i)))
                    .unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..PER_THREAD {
                store.mark_messages_as_read("J1", "A").unwrap();
            }
        });
    });

    let log = store.get_messages().unwrap();
    assert_eq!(log.len(), PER_THREAD * 2);
    // Every J1 message was marked and none of the concurrent J2 sends vanished
    assert!(log.iter().filter(|m| m.job_id == "J1").all(|m| m.read));
    assert_eq!(
        log.iter().filter(|m| m.job_id == "J2" && !m.read).count(),
        PER_THREAD
    );
}

#[test]
fn test_separate_handles_on_one_file_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gigmate.db");
    // Create the schema before the writers race to open the file
    SqliteKv::open(&path).unwrap();

    const HANDLES: usize = 4;
    thread::scope(|s| {
        for t in 0..HANDLES {
            let path = &path;
            s.spawn(move || {
                // Each thread plays a separate `gigmate` process
                let store = MessageStore::new(SqliteKv::open(path).unwrap());
                for i in 0..PER_THREAD {
                    store
                        .save_message(SaveMessageInput::new(
                            format!("J{}", t),
                            "A",
                            "B",
                            format!("handle {} message {}", t, i),
                        ))
                        .unwrap();
                }
            });
        }
    });

    let store = MessageStore::new(SqliteKv::open(&path).unwrap());
    let log = store.get_messages().unwrap();
    assert_eq!(log.len(), HANDLES * PER_THREAD);
    for t in 0..HANDLES {
        assert_eq!(
            store.get_messages_by_job_id(&format!("J{}", t)).unwrap().len(),
            PER_THREAD
        );
    }
}

#[test]
fn test_separate_handles_save_racing_mark_as_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gigmate.db");

    let seeder = MessageStore::new(SqliteKv::open(&path).unwrap());
    for i in 0..PER_THREAD {
        seeder
            .save_message(SaveMessageInput::new("J1", "B", "A", format!("old {}", i)))
            .unwrap();
    }

    thread::scope(|s| {
        s.spawn(|| {
            let store = MessageStore::new(SqliteKv::open(&path).unwrap());
            for i in 0..PER_THREAD {
                store
                    .save_message(SaveMessageInput::new("J2", "C", "A", format!("new {}", i)))
                    .unwrap();
            }
        });
        s.spawn(|| {
            let store = MessageStore::new(SqliteKv::open(&path).unwrap());
            for _ in 0..PER_THREAD {
                store.mark_messages_as_read("J1", "A").unwrap();
            }
        });
    });

    let log = seeder.get_messages().unwrap();
    assert_eq!(log.len(), PER_THREAD * 2);
    assert!(log.iter().filter(|m| m.job_id == "J1").all(|m| m.read));
    assert_eq!(
        log.iter().filter(|m| m.job_id == "J2" && !m.read).count(),
        PER_THREAD
    );
}
