use thiserror::Error;

/// Structural problems with an input table. These abort the run.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Missing required column '{column}' in {table} table")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("The {table} table has no usable rows")]
    EmptyInput { table: &'static str },
}

/// Invalid indicator parameters.
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("Invalid {name} period: {value} (must be > 0)")]
    InvalidPeriod { name: &'static str, value: usize },

    #[error("MACD fast period {fast} must be shorter than slow period {slow}")]
    InvalidMacdPeriods { fast: usize, slow: usize },

    #[error("Indicator backend rejected {name}: {reason}")]
    Backend { name: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_formatting() {
        let error = DatasetError::MissingColumn {
            table: "news",
            column: "headline",
        };

        let msg = error.to_string();
        assert!(msg.contains("headline"));
        assert!(msg.contains("news"));
    }

    #[test]
    fn test_macd_period_formatting() {
        let error = IndicatorError::InvalidMacdPeriods { fast: 26, slow: 12 };

        let msg = error.to_string();
        assert!(msg.contains("26"));
        assert!(msg.contains("12"));
    }
}
