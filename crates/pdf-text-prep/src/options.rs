use crate::error::AnalyzeError;

/// Minimum trimmed character count below which a PDF is assumed to be a scan.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;

/// Share of pages, in percent, a line must appear on to count as boilerplate.
pub const DEFAULT_BOILERPLATE_PERCENT: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    pub min_text_chars: usize,
    pub boilerplate_percent: u8,
}

impl AnalyzeOptions {
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        if self.boilerplate_percent == 0 || self.boilerplate_percent > 100 {
            return Err(AnalyzeError::InvalidOption(format!(
                "boilerplate_percent must be within 1..=100, got {}",
                self.boilerplate_percent
            )));
        }
        Ok(())
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            boilerplate_percent: DEFAULT_BOILERPLATE_PERCENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AnalyzeOptions;

    #[test]
    fn defaults_are_valid() {
        let options = AnalyzeOptions::default();
        assert_eq!(options.min_text_chars, 50);
        assert_eq!(options.boilerplate_percent, 70);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_percent() {
        for percent in [0, 101, 255] {
            let options = AnalyzeOptions {
                boilerplate_percent: percent,
                ..AnalyzeOptions::default()
            };
            let err = options.validate().expect_err("percent should be rejected");
            assert!(err.to_string().contains("boilerplate_percent"));
        }
    }
}
