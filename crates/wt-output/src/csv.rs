//! CSV report backend.
//!
//! Creates two files in the configured output directory:
//! - `tick_summaries.csv`
//! - `queue_depths.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, QueueDepthRow, TickSummaryRow};

/// Writes run reports to two CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    depths: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["time_secs", "pending_total", "completed_total", "working_agents"])?;

        let mut depths = Writer::from_path(dir.join("queue_depths.csv"))?;
        depths.write_record(["time_secs", "queue_id", "pending", "completed"])?;

        Ok(Self { summaries, depths, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.time_secs.to_string(),
            row.pending_total.to_string(),
            row.completed_total.to_string(),
            row.working_agents.to_string(),
        ])?;
        Ok(())
    }

    fn write_depths(&mut self, rows: &[QueueDepthRow]) -> OutputResult<()> {
        for row in rows {
            self.depths.write_record(&[
                row.time_secs.to_string(),
                row.queue_id.to_string(),
                row.pending.to_string(),
                row.completed.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.depths.flush()?;
        Ok(())
    }
}
