//! CSV encoding for session export.

use std::io::Write;

use csv::Writer;

use crate::domain::{Error, SessionView};

use super::{AWAKENINGS, DURATION_HOURS, END, LATENCY_MINUTES, NOTES, QUALITY, START, TAGS};

/// Download name offered in `Content-Disposition`.
pub const EXPORT_FILENAME: &str = "sleep_sessions.csv";

const HEADER: [&str; 8] = [
    START,
    END,
    QUALITY,
    LATENCY_MINUTES,
    AWAKENINGS,
    TAGS,
    NOTES,
    DURATION_HOURS,
];

fn csv_failure(err: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to write CSV export: {err}"))
}

/// Write the header and one record per view, in the order given.
///
/// # Errors
///
/// Returns an internal error if the underlying writer fails.
pub fn write_sessions<W: Write>(out: W, views: &[SessionView]) -> Result<W, Error> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(HEADER).map_err(csv_failure)?;
    for view in views {
        let session = &view.session;
        writer
            .write_record([
                session.start().to_rfc3339(),
                session.end().to_rfc3339(),
                session.quality().to_string(),
                session.latency_minutes().to_string(),
                session.awakenings().to_string(),
                session.tags().as_str().to_owned(),
                session.notes().to_owned(),
                format!("{:.2}", view.duration_hours),
            ])
            .map_err(csv_failure)?;
    }
    writer.into_inner().map_err(csv_failure)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domain::{SleepSession, SleepSessionInput, UserId};

    fn view(day: u32, minutes: i64, tags: &str, notes: &str) -> SessionView {
        let start = Utc
            .with_ymd_and_hms(2024, 3, day, 22, 30, 0)
            .single()
            .expect("valid timestamp");
        let input = SleepSessionInput {
            tags: Some(tags.to_owned()),
            notes: Some(notes.to_owned()),
            ..SleepSessionInput::window(start, start + Duration::minutes(minutes))
        };
        let session = SleepSession::new(input.into_draft(Uuid::nil(), UserId::random()))
            .expect("valid session");
        SessionView::new(session, None)
    }

    fn render(views: &[SessionView]) -> String {
        let bytes = write_sessions(Vec::new(), views).expect("export succeeds");
        String::from_utf8(bytes).expect("utf-8 output")
    }

    #[test]
    fn export_writes_header_and_quotes_embedded_commas() {
        let csv = render(&[
            view(2, 450, "caffeine,late", ""),
            view(1, 500, "", "woke \"twice\""),
        ]);

        insta::assert_snapshot!(csv, @r#"
        start,end,quality,latency_minutes,awakenings,tags,notes,duration_hours
        2024-03-02T22:30:00+00:00,2024-03-03T06:00:00+00:00,3,0,0,"caffeine,late",,7.50
        2024-03-01T22:30:00+00:00,2024-03-02T06:50:00+00:00,3,0,0,,"woke ""twice""",8.33
        "#);
    }

    #[test]
    fn empty_export_is_just_the_header() {
        insta::assert_snapshot!(render(&[]), @"start,end,quality,latency_minutes,awakenings,tags,notes,duration_hours");
    }
}
