//! CSV export for the historical trace and the weekly forecast.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::forecast::{DailyForecast, PredictionPoint};

/// Column header for the 24-hour trace.
pub const TRACE_HEADER: &str = "hour,consumption_kw,cost,efficiency_percent";

/// Column header for the weekly forecast.
pub const WEEKLY_HEADER: &str = "day_of_week,day,predicted_kwh,target_kwh,cost";

/// Exports the historical trace to a CSV file at the given path.
///
/// Writes a header row followed by one row per hour, oldest first. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_trace_csv(trace: &[PredictionPoint], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_trace_csv(trace, io::BufWriter::new(file))
}

/// Writes the historical trace as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_trace_csv(trace: &[PredictionPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(TRACE_HEADER.split(','))?;
    for p in trace {
        wtr.write_record(&[
            p.hour.to_string(),
            format!("{:.4}", p.consumption_kw),
            format!("{:.4}", p.cost),
            format!("{:.2}", p.efficiency_percent),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports the weekly forecast to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_weekly_csv(week: &[DailyForecast], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_weekly_csv(week, io::BufWriter::new(file))
}

/// Writes the weekly forecast as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_weekly_csv(week: &[DailyForecast], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(WEEKLY_HEADER.split(','))?;
    for d in week {
        wtr.write_record(&[
            d.day_of_week.to_string(),
            d.day.to_string(),
            format!("{:.4}", d.predicted_kwh),
            format!("{:.1}", d.target_kwh),
            format!("{:.4}", d.cost),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_point(hour: u8) -> PredictionPoint {
        PredictionPoint {
            hour,
            consumption_kw: 2.0 + f64::from(hour) * 0.1,
            cost: (2.0 + f64::from(hour) * 0.1) * 6.5,
            efficiency_percent: 72.5,
        }
    }

    fn make_day(day_of_week: u8) -> DailyForecast {
        DailyForecast {
            day_of_week,
            day: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"][usize::from(day_of_week)],
            predicted_kwh: 50.0,
            target_kwh: 45.0,
            cost: 325.0,
        }
    }

    fn to_string(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn trace_header_and_row_count() {
        let trace: Vec<PredictionPoint> = (0..24).map(make_point).collect();
        let mut buf = Vec::new();
        write_trace_csv(&trace, &mut buf).ok();
        let output = to_string(buf);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "hour,consumption_kw,cost,efficiency_percent");
        // 1 header + 24 data rows
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[1], "0,2.0000,13.0000,72.50");
    }

    #[test]
    fn weekly_header_and_rows() {
        let week: Vec<DailyForecast> = [5, 6, 0, 1, 2, 3, 4].into_iter().map(make_day).collect();
        let mut buf = Vec::new();
        write_weekly_csv(&week, &mut buf).ok();
        let output = to_string(buf);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "day_of_week,day,predicted_kwh,target_kwh,cost");
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[1], "5,Fri,50.0000,45.0,325.0000");
    }

    #[test]
    fn deterministic_output() {
        let trace: Vec<PredictionPoint> = (0..5).map(make_point).collect();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_trace_csv(&trace, &mut buf1).ok();
        write_trace_csv(&trace, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn trace_rows_parse_back() {
        let trace: Vec<PredictionPoint> = (0..3).map(make_point).collect();
        let mut buf = Vec::new();
        write_trace_csv(&trace, &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(4));

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.expect("every row should parse");
            assert!(rec[0].parse::<u8>().is_ok());
            for i in 1..4 {
                assert!(rec[i].parse::<f64>().is_ok(), "column {i} should parse as f64");
            }
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }

    #[test]
    fn export_writes_file() {
        let path = std::env::temp_dir().join(format!("greensense-week-{}.csv", std::process::id()));
        let week: Vec<DailyForecast> = (0..7).map(make_day).collect();
        export_weekly_csv(&week, &path).expect("export");
        let content = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(content.lines().count(), 8);
        std::fs::remove_file(&path).ok();
    }
}
