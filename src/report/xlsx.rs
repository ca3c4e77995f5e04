//! Excel workbook output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::{debug, info, instrument};

use super::row::{Cell, NormalizedRow, COLUMNS};
use super::{ReportError, ReportSink};

/// Windows `ERROR_SHARING_VIOLATION` / `ERROR_LOCK_VIOLATION`.
const SHARING_VIOLATION_CODES: [i32; 2] = [32, 33];

/// Writes rows to a single-sheet `.xlsx` file.
#[derive(Debug, Clone)]
pub struct XlsxReport {
    path: PathBuf,
}

impl XlsxReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn build(rows: &[NormalizedRow]) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Issues")?;

        for (col, name) in (0u16..).zip(COLUMNS.iter()) {
            worksheet.write_string_with_format(0, col, *name, &header)?;
        }

        for (row_idx, row) in (1u32..).zip(rows.iter()) {
            for (col, cell) in (0u16..).zip(row.cells().iter()) {
                match cell {
                    Cell::Text(text) => worksheet.write_string(row_idx, col, text)?,
                    Cell::Number(n) => worksheet.write_number(row_idx, col, *n as f64)?,
                };
            }
        }

        let last_row = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofilter(0, 0, last_row, (COLUMNS.len() - 1) as u16)?;

        Ok(workbook)
    }

    fn map_save_error(&self, err: XlsxError) -> ReportError {
        match err {
            XlsxError::IoError(e) if is_locked(&e) => ReportError::Locked(self.path.clone()),
            XlsxError::IoError(e) => ReportError::Io {
                path: self.path.clone(),
                source: e,
            },
            other => ReportError::Xlsx(other),
        }
    }
}

impl ReportSink for XlsxReport {
    #[instrument(skip(self, rows), fields(path = %self.path.display(), rows = rows.len()))]
    fn write(&mut self, rows: &[NormalizedRow]) -> Result<PathBuf, ReportError> {
        info!("Generating Excel report with {} records", rows.len());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ReportError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut workbook = Self::build(rows)?;
        workbook
            .save(&self.path)
            .map_err(|e| self.map_save_error(e))?;

        let location = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        debug!(location = %location.display(), "Workbook saved");
        Ok(location)
    }
}

fn is_locked(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
        || (cfg!(windows)
            && err
                .raw_os_error()
                .is_some_and(|code| SHARING_VIOLATION_CODES.contains(&code)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Issue;
    use crate::report::normalize;

    fn rows(count: usize) -> Vec<NormalizedRow> {
        (1..=count)
            .map(|i| {
                let issue: Issue = serde_json::from_str(&format!(
                    r#"{{"id": "{i}", "key": "GDP-{i}", "fields": {{"created": "2025-01-0{d}T10:00:00.000+0000"}}}}"#,
                    i = i,
                    d = (i % 9) + 1
                ))
                .unwrap();
                normalize(&issue, "https://company.atlassian.net")
            })
            .collect()
    }

    #[test]
    fn test_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let mut sink = XlsxReport::new(&path);

        let location = sink.write(&rows(3)).unwrap();

        assert!(path.exists());
        assert!(fs::metadata(&path).unwrap().len() > 0);
        assert!(location.is_absolute());
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.xlsx");

        XlsxReport::new(&path).write(&rows(1)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_rows_still_produce_header_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        XlsxReport::new(&path).write(&[]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_directory_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = XlsxReport::new(dir.path()).write(&rows(1)).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Io { .. } | ReportError::Locked(_) | ReportError::Xlsx(_)
        ));
    }

    #[test]
    fn test_permission_denied_maps_to_locked() {
        let sink = XlsxReport::new("held.xlsx");
        let err = sink.map_save_error(XlsxError::IoError(io::Error::from(
            io::ErrorKind::PermissionDenied,
        )));
        assert!(matches!(err, ReportError::Locked(ref p) if p == Path::new("held.xlsx")));
        assert!(err.to_string().contains("Close the spreadsheet"));
    }

    #[test]
    #[cfg(windows)]
    fn test_sharing_violation_maps_to_locked() {
        let sink = XlsxReport::new("held.xlsx");
        let err = sink.map_save_error(XlsxError::IoError(io::Error::from_raw_os_error(32)));
        assert!(matches!(err, ReportError::Locked(_)));
    }

    #[test]
    fn test_other_io_error_is_not_locked() {
        let sink = XlsxReport::new("gone.xlsx");
        let err = sink.map_save_error(XlsxError::IoError(io::Error::from(io::ErrorKind::NotFound)));
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
