//! メモリの load / save をログに記録する MemoryStore のラッパ

use crate::domain::Memory;
use crate::ports::outbound::MemoryStore;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

pub struct LoggingMemoryStore {
    inner: Arc<dyn MemoryStore>,
    log: Arc<dyn Log>,
}

impl LoggingMemoryStore {
    pub fn new(inner: Arc<dyn MemoryStore>, log: Arc<dyn Log>) -> Self {
        Self { inner, log }
    }
}

fn with_counts(rec: LogRecord, memory: &Memory) -> LogRecord {
    rec.field("reminders", memory.reminders.len())
        .field("notes", memory.notes.len())
        .field("tasks", memory.tasks.len())
}

impl MemoryStore for LoggingMemoryStore {
    fn load(&self) -> Memory {
        let memory = self.inner.load();
        let rec = LogRecord::new(LogLevel::Info, "memory read")
            .layer("adapter")
            .kind("memory")
            .field("operation", "load");
        let _ = self.log.log(&with_counts(rec, &memory));
        memory
    }

    fn save(&self, memory: &Memory) -> Result<(), Error> {
        match self.inner.save(memory) {
            Ok(()) => {
                let rec = LogRecord::new(LogLevel::Info, "memory write")
                    .layer("adapter")
                    .kind("memory")
                    .field("operation", "save");
                let _ = self.log.log(&with_counts(rec, memory));
                Ok(())
            }
            Err(e) => {
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Error, "memory write failed")
                        .layer("adapter")
                        .kind("memory")
                        .field("operation", "save")
                        .field("error", e.to_string()),
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CaptureLog(Mutex<Vec<LogRecord>>);

    impl Log for CaptureLog {
        fn log(&self, record: &LogRecord) -> Result<(), Error> {
            self.0.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingStore;

    impl MemoryStore for FailingStore {
        fn load(&self) -> Memory {
            let mut m = Memory::default();
            m.tasks.push(Task::new("x"));
            m
        }
        fn save(&self, _memory: &Memory) -> Result<(), Error> {
            Err(Error::io_msg("disk full"))
        }
    }

    #[test]
    fn test_logs_load_and_failed_save() {
        let log = Arc::new(CaptureLog::default());
        let store = LoggingMemoryStore::new(Arc::new(FailingStore), log.clone());

        let m = store.load();
        assert_eq!(m.tasks.len(), 1);
        assert_eq!(store.save(&m), Err(Error::io_msg("disk full")));

        let records = log.0.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "memory read");
        assert_eq!(records[0].fields.as_ref().unwrap()["tasks"], 1);
        assert_eq!(records[1].level, LogLevel::Error);
        assert_eq!(records[1].fields.as_ref().unwrap()["error"], "disk full");
    }
}
