//! `--debug-dump` sink: one JSON object per processed action.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::warn;
use serde::Serialize;

use crate::core::action::Action;

#[derive(Serialize)]
struct Record<'a> {
    seq: u64,
    at: String,
    action: &'a Action,
}

pub struct DebugDump {
    writer: BufWriter<Box<dyn Write + Send>>,
    seq: u64,
    failed: bool,
}

impl DebugDump {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(Box::new(file)))
    }

    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: BufWriter::new(writer),
            seq: 0,
            failed: false,
        }
    }

    /// Append one action. The first write error is logged and the dump is
    /// disabled; chat keeps running.
    pub fn record(&mut self, action: &Action) {
        if self.failed {
            return;
        }
        self.seq += 1;
        let record = Record {
            seq: self.seq,
            at: chrono::Local::now().to_rfc3339(),
            action,
        };
        let result = serde_json::to_writer(&mut self.writer, &record)
            .map_err(io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = result {
            warn!("Debug dump write failed, disabling: {e}");
            self.failed = true;
        }
    }
}
