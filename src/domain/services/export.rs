use chrono::NaiveDate;

use crate::domain::models::participation::AttendanceRow;

const CSV_HEADER: &str = "name,status,note,event_name,start_time,end_time";

/// Renders export rows as CSV, RFC 4180 style quoting. Statuses are
/// exported as their canonical tokens so the file is stable across label
/// changes.
pub fn attendance_csv(rows: &[AttendanceRow]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let start = row.start_time.format("%d.%m.%Y %H:%M").to_string();
        let end = row.end_time.format("%d.%m.%Y %H:%M").to_string();
        let fields = [
            row.user_name.as_str(),
            row.status.as_canonical(),
            row.note.as_deref().unwrap_or(""),
            row.event_name.as_str(),
            start.as_str(),
            end.as_str(),
        ];
        let line = fields.map(csv_field).join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn export_filename(start: NaiveDate, end: NaiveDate) -> String {
    format!("attendance_{}_to_{}.csv", start, end)
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
