//! Per-stage run summaries.
//!
//! Every stage reports how many inputs it saw, how many it skipped and how
//! many symbols it wrote, so a run can be audited without opening the tables.

use crate::export::{ExportError, ExportFormat, Exporter, csv_into_string, headerless_writer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Counts reported by one pipeline stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageSummary {
    /// Stage name.
    pub stage: String,

    /// Input files discovered.
    pub files_found: usize,

    /// Input files that contributed rows.
    pub files_processed: usize,

    /// Input files skipped for schema or naming problems.
    pub files_skipped: usize,

    /// Symbols in the stage output.
    pub symbols: usize,

    /// Symbols without a sector, for the layout stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmapped: Option<usize>,

    /// Output file written.
    pub output: Option<PathBuf>,
}

impl StageSummary {
    /// Empty summary for a named stage.
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            ..Self::default()
        }
    }

    /// Record a discovered input file.
    pub const fn found(&mut self, n: usize) {
        self.files_found += n;
    }

    /// Record a processed input file.
    pub const fn processed(&mut self) {
        self.files_processed += 1;
    }

    /// Record a skipped input file.
    pub const fn skipped(&mut self) {
        self.files_skipped += 1;
    }

    /// Set the output symbol count and location.
    pub fn wrote(mut self, symbols: usize, output: impl Into<PathBuf>) -> Self {
        self.symbols = symbols;
        self.output = Some(output.into());
        self
    }

    /// Set the unmapped-symbol count.
    pub fn with_unmapped(mut self, unmapped: usize) -> Self {
        self.unmapped = Some(unmapped);
        self
    }
}

impl fmt::Display for StageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stage: {}", self.stage)?;
        if self.files_found > 0 {
            writeln!(
                f,
                "  Files: {} found, {} processed, {} skipped",
                self.files_found, self.files_processed, self.files_skipped
            )?;
        }
        writeln!(f, "  Symbols: {}", self.symbols)?;
        if let Some(unmapped) = self.unmapped {
            writeln!(f, "  Unmapped: {unmapped}")?;
        }
        if let Some(output) = &self.output {
            writeln!(f, "  Output: {}", output.display())?;
        }
        Ok(())
    }
}

/// Summaries of every stage in a run, in execution order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    /// Stage summaries.
    pub stages: Vec<StageSummary>,
}

impl RunSummary {
    /// Append a finished stage.
    pub fn push(&mut self, stage: StageSummary) {
        self.stages.push(stage);
    }

    /// Total files skipped across stages.
    pub fn files_skipped(&self) -> usize {
        self.stages.iter().map(|s| s.files_skipped).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Summary ({} stages)", self.stages.len())?;
        for stage in &self.stages {
            write!(f, "{stage}")?;
        }
        writeln!(f, "  Total skipped files: {}", self.files_skipped())
    }
}

impl Exporter for RunSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = headerless_writer();
                wtr.write_record([
                    "stage",
                    "files_found",
                    "files_processed",
                    "files_skipped",
                    "symbols",
                    "unmapped",
                    "output",
                ])?;
                for s in &self.stages {
                    wtr.write_record([
                        s.stage.clone(),
                        s.files_found.to_string(),
                        s.files_processed.to_string(),
                        s.files_skipped.to_string(),
                        s.symbols.to_string(),
                        s.unmapped.map(|n| n.to_string()).unwrap_or_default(),
                        s.output
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default(),
                    ])?;
                }
                csv_into_string(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly() -> StageSummary {
        let mut s = StageSummary::new("monthly");
        s.found(3);
        s.processed();
        s.processed();
        s.skipped();
        s.wrote(42, "out/monthly.csv")
    }

    #[test]
    fn test_stage_counts() {
        let s = monthly();
        assert_eq!(s.files_found, 3);
        assert_eq!(s.files_processed, 2);
        assert_eq!(s.files_skipped, 1);
        assert_eq!(s.symbols, 42);
        assert_eq!(s.unmapped, None);
    }

    #[test]
    fn test_stage_display() {
        let text = monthly().to_string();
        assert!(text.contains("Stage: monthly"));
        assert!(text.contains("3 found, 2 processed, 1 skipped"));
        assert!(text.contains("Symbols: 42"));
        assert!(!text.contains("Unmapped"));
    }

    #[test]
    fn test_run_summary() {
        let mut run = RunSummary::default();
        run.push(monthly());
        run.push(StageSummary::new("layout").wrote(10, "out/layout.csv").with_unmapped(2));
        assert_eq!(run.files_skipped(), 1);

        let text = run.to_string();
        assert!(text.contains("Run Summary (2 stages)"));
        assert!(text.contains("Unmapped: 2"));

        let csv = run.export_to_string(ExportFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("layout,0,0,0,10,2,out/layout.csv"));

        let json = run.export_to_string(ExportFormat::Json).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, run);
    }
}
