use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::record::{ExchangeRecord, RecordKind};
use crate::signal::SignalSet;

/// Append-only audit sink, opened once at process start and shared by every
/// request handler. Each record kind gets one file per local calendar day;
/// appends are serialized behind a per-kind mutex so concurrent requests
/// never interleave partial lines.
///
/// Recording never fails toward the caller: a write that goes wrong is
/// reported to the diagnostic subscriber and dropped.
pub struct AuditLog {
    dir: PathBuf,
    request: Mutex<DailyFile>,
    exchange: Mutex<DailyFile>,
}

struct DailyFile {
    kind: RecordKind,
    date: NaiveDate,
    file: Option<File>,
}

impl DailyFile {
    fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            date: Local::now().date_naive(),
            file: None,
        }
    }

    /// Handle for today's file, rolling over when the date has changed
    /// since the last append.
    fn file_for_today(&mut self, dir: &Path) -> std::io::Result<&mut File> {
        let today = Local::now().date_naive();
        if self.file.is_none() || self.date != today {
            let name = format!("{}_{}.log", self.kind.file_prefix(), today.format("%Y-%m-%d"));
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(name))?;
            self.date = today;
            self.file = Some(file);
        }
        Ok(self.file.as_mut().unwrap())
    }
}

impl AuditLog {
    /// Create the log directory if needed and set up both record streams.
    /// Called once at startup; a failure here is a real error, unlike the
    /// per-record writes later.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            request: Mutex::new(DailyFile::new(RecordKind::Request)),
            exchange: Mutex::new(DailyFile::new(RecordKind::Exchange)),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append one inbound-request record.
    pub fn record_request(&self, signals: &SignalSet) {
        self.append(&self.request, signals);
    }

    /// Append one classifier-exchange record.
    pub fn record_exchange(&self, record: &ExchangeRecord) {
        self.append(&self.exchange, record);
    }

    fn append<T: Serialize>(&self, slot: &Mutex<DailyFile>, payload: &T) {
        let line = match serde_json::to_string(payload) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(target: "cloakgate.audit", error = %e, "audit serialize failed");
                return;
            }
        };

        let mut daily = match slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let kind = daily.kind;

        let result = daily.file_for_today(&self.dir).and_then(|file| {
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")
        });

        if let Err(e) = result {
            // A failed handle is not worth keeping; retry with a fresh open
            // on the next record.
            daily.file = None;
            tracing::warn!(
                target: "cloakgate.audit",
                kind = kind.file_prefix(),
                error = %e,
                "audit append failed"
            );
        }
    }
}
