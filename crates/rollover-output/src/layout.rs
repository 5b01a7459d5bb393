//! Grouped-with-separator layout.
//!
//! Rows are sorted by `(group, order)` and emitted block by block, with one
//! blank separator row after every block, the last one included. The result
//! pastes straight into a spreadsheet with visible gaps between groups.

use crate::export::{ExportError, ExportFormat, Exporter, csv_into_string, headerless_writer};
use serde::Serialize;

/// One line of a sectioned layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LayoutRow<R> {
    /// A data row.
    Record(R),

    /// Blank line closing a group.
    Separator,
}

impl<R> LayoutRow<R> {
    /// The data row, if this is not a separator.
    pub const fn record(&self) -> Option<&R> {
        match self {
            Self::Record(r) => Some(r),
            Self::Separator => None,
        }
    }

    /// Whether this line is a separator.
    pub const fn is_separator(&self) -> bool {
        matches!(self, Self::Separator)
    }
}

/// Sort `rows` by group then order key and insert a separator after each group.
pub fn sectioned<R, G, O>(
    mut rows: Vec<R>,
    group: impl Fn(&R) -> G,
    order: impl Fn(&R) -> O,
) -> Vec<LayoutRow<R>>
where
    G: Ord,
    O: Ord,
{
    rows.sort_by(|a, b| group(a).cmp(&group(b)).then_with(|| order(a).cmp(&order(b))));

    let mut out = Vec::with_capacity(rows.len() * 2);
    let mut rows = rows.into_iter().peekable();
    while let Some(row) = rows.next() {
        let closes_group = rows.peek().is_none_or(|next| group(next) != group(&row));
        out.push(LayoutRow::Record(row));
        if closes_group {
            out.push(LayoutRow::Separator);
        }
    }
    out
}

/// A sectioned layout with its column headers.
#[derive(Debug, Clone, Copy)]
pub struct SectionedTable<'a, R> {
    columns: &'static [&'static str],
    rows: &'a [LayoutRow<R>],
}

impl<'a, R> SectionedTable<'a, R> {
    /// Wrap laid-out rows; `columns` must follow the record's field order.
    pub const fn new(columns: &'static [&'static str], rows: &'a [LayoutRow<R>]) -> Self {
        Self { columns, rows }
    }

    /// Number of data rows, separators excluded.
    pub fn record_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_separator()).count()
    }
}

impl<R: Serialize> Exporter for SectionedTable<'_, R> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let blank = vec![""; self.columns.len()];
                let mut wtr = headerless_writer();
                wtr.write_record(self.columns)?;
                for row in self.rows {
                    match row {
                        LayoutRow::Record(r) => wtr.serialize(r)?,
                        LayoutRow::Separator => wtr.write_record(&blank)?,
                    }
                }
                csv_into_string(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self.rows)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self.rows)?),
        }
    }
}
