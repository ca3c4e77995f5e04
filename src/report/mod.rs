//! Report generation: issue normalization and the output sink.

mod fallback;
mod normalize;
mod row;
mod xlsx;

use std::path::PathBuf;

use thiserror::Error;

pub use fallback::Fallback;
pub use normalize::{normalize, parse_created};
pub use row::{Cell, NormalizedRow, COLUMNS, NOT_AVAILABLE};
pub use xlsx::XlsxReport;

/// Errors raised while persisting the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The target is open in another program or not writable.
    #[error("Cannot write {}: the file is locked or read-only. Close the spreadsheet and run again.", .0.display())]
    Locked(PathBuf),

    /// Filesystem failure other than a lock.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workbook could not be assembled.
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Destination for normalized rows.
pub trait ReportSink {
    /// Persist all rows, returning where they went.
    fn write(&mut self, rows: &[NormalizedRow]) -> Result<PathBuf, ReportError>;
}
