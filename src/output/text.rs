use super::{Formatter, VitalsReading};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, reading: &VitalsReading) -> String {
        let hr = reading
            .heart_rate_bpm
            .map_or("  -  ".to_string(), |v| format!("{:>5.1}", v));
        let spo2 = reading
            .spo2_percent
            .map_or("  -  ".to_string(), |v| format!("{:>5.1}", v));

        if self.verbose {
            let seconds = reading.sample_index as f32 / crate::constants::SAMPLE_RATE_HZ;
            format!(
                "[{:>8.2}s #{:>7}] HR: {} BPM  SpO2: {} %",
                seconds, reading.sample_index, hr, spo2
            )
        } else {
            format!("HR: {} BPM  SpO2: {} %", hr, spo2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_format() {
        let reading = VitalsReading {
            sample_index: 250,
            heart_rate_bpm: Some(60.0),
            spo2_percent: None,
        };
        assert_eq!(
            TextFormatter::new(false).format(&reading),
            "HR:  60.0 BPM  SpO2:   -   %"
        );
        assert_eq!(
            TextFormatter::new(true).format(&reading),
            "[    5.00s #    250] HR:  60.0 BPM  SpO2:   -   %"
        );
    }
}
