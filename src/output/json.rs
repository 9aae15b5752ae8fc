use super::{Formatter, VitalsReading, iso8601_timestamp};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, reading: &VitalsReading) -> String {
        let hr = reading
            .heart_rate_bpm
            .map_or("null".to_string(), |v| format!("{:.1}", v));
        let spo2 = reading
            .spo2_percent
            .map_or("null".to_string(), |v| format!("{:.1}", v));
        format!(
            r#"{{"ts":"{}","sample":{},"heart_rate_bpm":{},"spo2_percent":{}}}"#,
            iso8601_timestamp(),
            reading.sample_index,
            hr,
            spo2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_is_parseable() {
        let reading = VitalsReading {
            sample_index: 42,
            heart_rate_bpm: None,
            spo2_percent: Some(97.25),
        };
        let line = JsonFormatter.format(&reading);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["sample"], 42);
        assert!(value["heart_rate_bpm"].is_null());
        assert!((value["spo2_percent"].as_f64().unwrap() - 97.2).abs() < 0.11);
    }
}
