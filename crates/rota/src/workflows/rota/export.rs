use std::io::Write;

use super::domain::WeekRecord;

pub const CSV_HEADER: [&str; 3] = ["Week commencing (Friday)", "Weekend", "Week"];

/// Byte-order mark so spreadsheet tools open the file as UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write the rota as CSV: BOM, header row, UK-formatted dates, CRLF lines.
pub fn write_csv<W: Write>(rows: &[WeekRecord], mut writer: W) -> Result<(), csv::Error> {
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for row in rows {
        let date = row.week_commencing.format("%d/%m/%Y").to_string();
        csv_writer.write_record([
            date.as_str(),
            row.weekend.as_deref().unwrap_or(""),
            row.week.as_deref().unwrap_or(""),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(rows: &[WeekRecord]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err).into())
}

/// Base name for exported files, e.g. `rotagen_2026-01-02_52w`.
pub fn export_file_stem(start_date_iso: &str, weeks: i64) -> String {
    let start = if start_date_iso.trim().is_empty() {
        "start"
    } else {
        start_date_iso.trim()
    };
    format!("rotagen_{start}_{weeks}w")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn csv_has_bom_header_and_uk_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).expect("valid date");
        let rows = vec![
            WeekRecord::new(date, "Ann", "Bob"),
            WeekRecord {
                week_commencing: date + chrono::Duration::weeks(1),
                weekend: Some("O'Neil, Cara".into()),
                week: None,
            },
        ];

        let csv = to_csv_string(&rows).expect("csv renders");
        assert_eq!(
            csv,
            "\u{feff}Week commencing (Friday),Weekend,Week\r\n\
             02/01/2026,Ann,Bob\r\n\
             09/01/2026,\"O'Neil, Cara\",\r\n"
        );
    }

    #[test]
    fn csv_string_keeps_accented_names() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).expect("valid date");
        let rows = vec![WeekRecord::new(date, "Zoë", "Łukasz")];

        let csv = to_csv_string(&rows).expect("csv renders");
        assert!(csv.ends_with("02/01/2026,Zoë,Łukasz\r\n"));
        assert!(!csv.contains('\u{fffd}'));
    }

    #[test]
    fn file_stem_falls_back_when_start_missing() {
        assert_eq!(export_file_stem("2026-01-02", 52), "rotagen_2026-01-02_52w");
        assert_eq!(export_file_stem(" ", 4), "rotagen_start_4w");
    }
}
