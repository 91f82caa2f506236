use anyhow::{Context, Result};
use aoss_shared::FrameReport;
use std::io::Write;

/// Numbers frames from 0, in the log and in the report alike
#[derive(Debug, Default)]
pub struct FrameCounter {
    next: u64,
}

impl FrameCounter {
    pub fn next_frame(&mut self) -> u64 {
        let frame = self.next;
        self.next += 1;
        frame
    }
}

/// Writes one JSON object per analyzed frame
pub struct ReportWriter<W: Write> {
    out: W,
    written: u64,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn write(&mut self, report: &FrameReport) -> Result<()> {
        let line = report.to_json_line().context("Failed to serialize frame report")?;
        writeln!(self.out, "{}", line).context("Failed to write frame report")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
