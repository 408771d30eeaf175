use std::time::Duration;

/// Validation rules for user-supplied labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRules {
    /// Maximum label length after trimming (default: 50).
    pub max_length: usize,

    /// Punctuation characters allowed in addition to ASCII alphanumerics
    /// (default: `_` and `-`).
    pub allowed_punctuation: Vec<char>,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            max_length: 50,
            allowed_punctuation: vec!['_', '-'],
        }
    }
}

/// Configuration for a capture workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfiguration {
    /// Total sampling window in milliseconds (default: 5000).
    pub sampling_duration_ms: u64,

    /// Target number of frames per session (default: 50).
    pub target_frame_count: u32,

    /// Countdown lead-in before sampling starts, in seconds (default: 3).
    /// Zero skips the countdown phase entirely.
    pub countdown_secs: u32,

    /// File extension for archive frame entries (default: "jpg").
    pub frame_extension: String,

    /// DEFLATE compression level for the archive, 0-9 (default: 6).
    pub compression_level: i64,

    /// Label validation rules.
    pub label_rules: LabelRules,
}

impl CaptureConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.sampling_duration_ms == 0 {
            return Err("sampling duration must be positive".into());
        }
        if self.target_frame_count == 0 {
            return Err("target frame count must be positive".into());
        }
        if self.sampling_duration_ms < self.target_frame_count as u64 {
            return Err("sampling interval is below one millisecond".into());
        }
        if !(0..=9).contains(&self.compression_level) {
            return Err(format!(
                "unsupported compression level: {}",
                self.compression_level
            ));
        }
        if self.frame_extension.is_empty() {
            return Err("frame extension must not be empty".into());
        }
        if self.label_rules.max_length == 0 {
            return Err("label max length must be positive".into());
        }
        Ok(())
    }

    /// Fixed sampling interval: duration / target frame count.
    pub fn sampling_interval(&self) -> Duration {
        Duration::from_secs_f64(
            self.sampling_duration_ms as f64 / self.target_frame_count as f64 / 1000.0,
        )
    }

    pub fn sampling_duration(&self) -> Duration {
        Duration::from_millis(self.sampling_duration_ms)
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            sampling_duration_ms: 5000,
            target_frame_count: 50,
            countdown_secs: 3,
            frame_extension: "jpg".into(),
            compression_level: 6,
            label_rules: LabelRules::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = CaptureConfiguration::default();
        config.validate().unwrap();
        assert_eq!(config.sampling_interval(), Duration::from_millis(100));
    }

    #[test]
    fn rejects_zero_duration_and_count() {
        let mut config = CaptureConfiguration::default();
        config.sampling_duration_ms = 0;
        assert!(config.validate().is_err());

        let mut config = CaptureConfiguration::default();
        config.target_frame_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_sub_millisecond_interval() {
        let config = CaptureConfiguration {
            sampling_duration_ms: 10,
            target_frame_count: 100,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_compression() {
        let config = CaptureConfiguration {
            compression_level: 12,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn interval_divides_duration() {
        let config = CaptureConfiguration {
            sampling_duration_ms: 1000,
            target_frame_count: 8,
            ..Default::default()
        };
        assert_eq!(config.sampling_interval(), Duration::from_millis(125));
    }
}
