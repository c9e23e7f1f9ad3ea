//! CSV decoding for session import.

use std::io::Read;

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::json;

use crate::domain::Error;
use crate::domain::SleepSessionInput;
use crate::domain::ports::ImportRow;

use super::{AWAKENINGS, END, LATENCY_MINUTES, NOTES, QUALITY, START, TAGS};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Column positions resolved from the header row.
struct Columns {
    start: usize,
    end: usize,
    quality: Option<usize>,
    latency_minutes: Option<usize>,
    awakenings: Option<usize>,
    tags: Option<usize>,
    notes: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, Error> {
        let position = |name: &str| headers.iter().position(|header| header == name);
        let (Some(start), Some(end)) = (position(START), position(END)) else {
            return Err(
                Error::invalid_request("CSV header must include start and end columns.")
                    .with_details(json!({
                        "field": "file",
                        "code": "missing_columns",
                        "value": headers.iter().collect::<Vec<_>>().join(","),
                    })),
            );
        };
        Ok(Self {
            start,
            end,
            quality: position(QUALITY),
            latency_minutes: position(LATENCY_MINUTES),
            awakenings: position(AWAKENINGS),
            tags: position(TAGS),
            notes: position(NOTES),
        })
    }

    /// Decode one record; `None` means the row is skipped.
    fn decode(&self, record: &StringRecord) -> Option<Result<SleepSessionInput, String>> {
        let field = |index: Option<usize>| index.and_then(|i| record.get(i)).unwrap_or("");
        let start = field(Some(self.start));
        let end = field(Some(self.end));
        if start.is_empty() || end.is_empty() {
            return None;
        }

        Some(self.decode_present(record, start, end))
    }

    fn decode_present(
        &self,
        record: &StringRecord,
        start: &str,
        end: &str,
    ) -> Result<SleepSessionInput, String> {
        let field = |index: Option<usize>| index.and_then(|i| record.get(i)).unwrap_or("");
        let text = |index: Option<usize>| Some(field(index).to_owned()).filter(|s| !s.is_empty());

        let window = SleepSessionInput::window(
            parse_timestamp(START, start)?,
            parse_timestamp(END, end)?,
        );
        Ok(SleepSessionInput {
            quality: parse_count(QUALITY, field(self.quality))?,
            latency_minutes: parse_count(LATENCY_MINUTES, field(self.latency_minutes))?,
            awakenings: parse_count(AWAKENINGS, field(self.awakenings))?,
            notes: text(self.notes),
            tags: text(self.tags),
            ..window
        })
    }
}

/// Parse an RFC 3339 timestamp, or a naive one read as UTC.
fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("{column} '{raw}' is not a valid date/time"))
}

/// Blank counters fall back to the entity defaults.
fn parse_count(column: &str, raw: &str) -> Result<Option<i64>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| format!("{column} '{raw}' is not a whole number"))
}

/// Decode an uploaded CSV file into numbered import rows.
///
/// Data rows are numbered from 1. Rows with a blank `start` or `end` are
/// skipped but still consume a number. A record the CSV reader cannot decode
/// becomes a failed row and ends the scan.
///
/// # Errors
///
/// Returns `invalid_request` when the header lacks a `start` or `end`
/// column, so nothing is imported from a file of the wrong shape.
pub fn read_import_rows(input: impl Read) -> Result<Vec<ImportRow>, Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|err| {
            Error::invalid_request(format!("Error importing CSV: {err}"))
                .with_details(json!({ "field": "file", "code": "unreadable_csv" }))
        })?
        .clone();
    let columns = Columns::locate(&headers)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row = index + 1;
        match record {
            Ok(record) => {
                if let Some(parsed) = columns.decode(&record) {
                    rows.push(ImportRow { row, parsed });
                }
            }
            Err(err) => {
                rows.push(ImportRow {
                    row,
                    parsed: Err(err.to_string()),
                });
                break;
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("valid timestamp")
    }

    fn rows(csv: &str) -> Vec<ImportRow> {
        read_import_rows(csv.as_bytes()).expect("readable csv")
    }

    #[rstest]
    fn reads_full_rows_with_defaults_for_blank_counters() {
        let parsed = rows(
            "start,end,quality,latency_minutes,awakenings,tags,notes\n\
             2024-03-01T22:00:00Z,2024-03-02T06:00:00Z,4,15,2,\"caffeine,late\",restless\n\
             2024-03-02 23:00,2024-03-03 07:30,,,,,\n",
        );

        assert_eq!(parsed.len(), 2);
        let first = parsed[0].parsed.as_ref().expect("first row parses");
        assert_eq!(first.start, utc(2024, 3, 1, 22, 0));
        assert_eq!(first.quality, Some(4));
        assert_eq!(first.tags.as_deref(), Some("caffeine,late"));
        assert_eq!(first.notes.as_deref(), Some("restless"));

        let second = parsed[1].parsed.as_ref().expect("second row parses");
        assert_eq!(second.end, utc(2024, 3, 3, 7, 30));
        assert_eq!(second.quality, None);
        assert_eq!(second.tags, None);
        assert_eq!(parsed[1].row, 2);
    }

    #[rstest]
    fn rows_missing_start_or_end_are_skipped_but_counted() {
        let parsed = rows(
            "start,end\n\
             ,2024-03-02T06:00:00Z\n\
             2024-03-02T22:00:00Z,\n\
             2024-03-03T22:00:00Z,2024-03-04T06:00:00Z\n",
        );

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].row, 3);
    }

    #[rstest]
    fn offsets_are_normalised_to_utc() {
        let parsed = rows("end,start\n2024-03-02T08:00:00+02:00,2024-03-01T23:00:00+01:00\n");
        let input = parsed[0].parsed.as_ref().expect("row parses");
        assert_eq!(input.start, utc(2024, 3, 1, 22, 0));
        assert_eq!(input.end, utc(2024, 3, 2, 6, 0));
    }

    #[rstest]
    #[case("yesterday,2024-03-02T06:00:00Z", "start 'yesterday' is not a valid date/time")]
    #[case(
        "2024-03-01T22:00:00Z,2024-03-02T06:00:00Z,great",
        "quality 'great' is not a whole number"
    )]
    fn bad_values_become_row_errors(#[case] line: &str, #[case] reason: &str) {
        let parsed = rows(&format!("start,end,quality\n{line}\n"));
        assert_eq!(parsed[0].parsed, Err(reason.to_owned()));
    }

    #[rstest]
    #[case("begin,finish\n2024-03-01T22:00:00Z,2024-03-02T06:00:00Z\n")]
    #[case("")]
    fn files_without_start_and_end_columns_are_rejected(#[case] csv: &str) {
        let err = read_import_rows(csv.as_bytes()).expect_err("missing columns");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
            Some("missing_columns")
        );
    }

    #[rstest]
    fn undecodable_records_stop_the_scan() {
        let mut bytes = b"start,end\n2024-03-01T22:00:00Z,".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"2024-03-03T22:00:00Z,2024-03-04T06:00:00Z\n");

        let parsed = read_import_rows(bytes.as_slice()).expect("header readable");
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].parsed.is_err());
    }
}
