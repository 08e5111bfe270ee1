// ── Telemetry spreadsheet export ──
//
// Writes every loaded telemetry record (not just the visible page) to
// `<samId>_<YYYY-MM-DD>.xlsx`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::info;

use crate::error::CoreError;
use crate::model::TelemetryRecord;

pub const EXPORT_HEADERS: [&str; 5] = ["No", "Device ID", "Timestamp", "Over Speed", "Speed"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One spreadsheet data row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub number: u32,
    pub device_id: String,
    pub timestamp: String,
    pub over_speed: bool,
    pub speed: f64,
}

/// Project records into spreadsheet rows, numbered from 1.
pub fn telemetry_rows(records: &[Arc<TelemetryRecord>]) -> Vec<ExportRow> {
    (1u32..)
        .zip(records)
        .map(|(number, r)| ExportRow {
            number,
            device_id: r.sam_id.clone(),
            timestamp: r.created_at.format(TIMESTAMP_FORMAT).to_string(),
            over_speed: r.is_over_speed(),
            speed: r.speed,
        })
        .collect()
}

/// File name for an export taken on `date`.
pub fn export_file_name(sam_id: &str, date: NaiveDate) -> String {
    let safe: String = sam_id
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{safe}_{}.xlsx", date.format("%Y-%m-%d"))
}

/// Write `records` as a spreadsheet into `dir`, returning the file path.
///
/// An empty record set writes nothing and returns
/// [`CoreError::NothingToExport`].
pub fn export_telemetry(
    records: &[Arc<TelemetryRecord>],
    sam_id: &str,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, CoreError> {
    if records.is_empty() {
        return Err(CoreError::NothingToExport);
    }

    let path = dir.join(export_file_name(sam_id, date));
    let rows = telemetry_rows(records);
    write_workbook(&rows, &path).map_err(|e| CoreError::Export {
        message: e.to_string(),
    })?;

    info!(path = %path.display(), rows = rows.len(), "telemetry exported");
    Ok(path)
}

fn write_workbook(rows: &[ExportRow], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Telemetry")?;

    for (col, title) in (0u16..).zip(EXPORT_HEADERS) {
        sheet.write_string_with_format(0, col, title, &header)?;
    }

    for (row, data) in (1u32..).zip(rows) {
        sheet.write_number(row, 0, f64::from(data.number))?;
        sheet.write_string(row, 1, &data.device_id)?;
        sheet.write_string(row, 2, &data.timestamp)?;
        sheet.write_boolean(row, 3, data.over_speed)?;
        sheet.write_number(row, 4, data.speed)?;
    }

    sheet.set_column_width(1, 16)?;
    sheet.set_column_width(2, 20)?;

    workbook.save(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::SpeedCategory;

    fn record(id: i64, speed: f64, category: SpeedCategory) -> Arc<TelemetryRecord> {
        Arc::new(TelemetryRecord {
            id,
            speed,
            category,
            sam_id: "SAM-001".into(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
        })
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
    }

    #[test]
    fn empty_records_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_telemetry(&[], "SAM-001", dir.path(), date());

        assert!(matches!(result, Err(CoreError::NothingToExport)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn one_record_gives_one_data_row() {
        let records = vec![record(1, 72.5, SpeedCategory::OverSpeed)];
        let rows = telemetry_rows(&records);

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            ExportRow {
                number: 1,
                device_id: "SAM-001".into(),
                timestamp: "2024-06-15 10:30:00".into(),
                over_speed: true,
                speed: 72.5,
            }
        );
        assert_eq!(EXPORT_HEADERS.len(), 5);
    }

    #[test]
    fn writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record(1, 40.0, SpeedCategory::Normal),
            record(2, 90.0, SpeedCategory::OverSpeed),
        ];

        let path = export_telemetry(&records, "SAM-001", dir.path(), date()).unwrap();

        assert_eq!(path.file_name().unwrap(), "SAM-001_2024-06-20.xlsx");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn workbook_has_header_and_one_row_per_record() {
        use calamine::{Data, Reader, Xlsx, open_workbook};

        let dir = tempfile::tempdir().unwrap();
        let records = vec![record(1, 72.5, SpeedCategory::OverSpeed)];
        let path = export_telemetry(&records, "SAM-001", dir.path(), date()).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let sheet = workbook.worksheet_range("Telemetry").unwrap();
        assert_eq!(sheet.get_size(), (2, 5));

        let rows: Vec<&[Data]> = sheet.rows().collect();
        let header: Vec<String> = rows[0].iter().map(ToString::to_string).collect();
        assert_eq!(header, EXPORT_HEADERS);
        assert_eq!(
            rows[1],
            [
                Data::Float(1.0),
                Data::String("SAM-001".into()),
                Data::String("2024-06-15 10:30:00".into()),
                Data::Bool(true),
                Data::Float(72.5),
            ]
        );
    }

    #[test]
    fn file_name_is_sanitized() {
        assert_eq!(export_file_name("SAM/01 A", date()), "SAM_01_A_2024-06-20.xlsx");
    }
}
