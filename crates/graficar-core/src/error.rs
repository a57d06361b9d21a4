//! Engine error type.

use crate::data::ChartKind;

/// Errors surfaced to the host.
///
/// The engine recovers locally from malformed data (non-finite values are
/// excluded from bounds and geometry); the only fatal condition is asking
/// for a chart type no controller is registered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    /// No controller is registered for the requested chart type.
    UnknownChartType(ChartKind),
    /// A dataset referenced a scale id that does not exist.
    UnknownScale(String),
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownChartType(kind) => write!(f, "no controller registered for {kind:?}"),
            Self::UnknownScale(id) => write!(f, "no scale with id {id:?}"),
        }
    }
}

impl std::error::Error for ChartError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChartError::UnknownScale("y2".to_string());
        assert_eq!(err.to_string(), "no scale with id \"y2\"");
    }
}
