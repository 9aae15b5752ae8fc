use super::{Formatter, VitalsReading, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, reading: &VitalsReading) -> String {
        let hr = reading
            .heart_rate_bpm
            .map_or(String::new(), |v| format!("{:.1}", v));
        let spo2 = reading
            .spo2_percent
            .map_or(String::new(), |v| format!("{:.1}", v));
        format!(
            "{},{},{},{}",
            iso8601_timestamp(),
            reading.sample_index,
            hr,
            spo2
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,sample,heart_rate_bpm,spo2_percent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_columns_match_header() {
        let reading = VitalsReading {
            sample_index: 7,
            heart_rate_bpm: Some(72.04),
            spo2_percent: None,
        };
        let line = CsvFormatter.format(&reading);
        let fields: Vec<&str> = line.split(',').collect();
        let header = CsvFormatter.header().unwrap();
        assert_eq!(fields.len(), header.split(',').count());
        assert_eq!(&fields[1..], &["7", "72.0", ""]);
    }
}
