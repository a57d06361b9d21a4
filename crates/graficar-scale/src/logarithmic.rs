//! Base-10 logarithmic scale.

use crate::ticks::{auto_skip, format_number};
use crate::{AxisKind, DataBounds, Scale, ScaleOptions, ScaleState, Tick};

/// A log10 scale with ticks at every significand within each decade.
///
/// The scale only represents strictly positive values; zero and
/// negatives map to NaN pixels and are skipped by elements.
#[derive(Debug, Clone)]
pub struct LogarithmicScale {
    state: ScaleState,
}

impl LogarithmicScale {
    /// Create a logarithmic scale from options.
    #[must_use]
    pub fn new(options: ScaleOptions) -> Self {
        let mut state = ScaleState::new(options);
        if state.min <= 0.0 {
            state.min = 1.0;
        }
        if state.max <= state.min {
            state.max = state.min * 10.0;
        }
        Self { state }
    }

    fn log_span(&self) -> (f64, f64) {
        let log_min = self.state.min.log10();
        let log_max = self.state.max.log10();
        (log_min, log_max - log_min)
    }
}

impl Scale for LogarithmicScale {
    fn state(&self) -> &ScaleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScaleState {
        &mut self.state
    }

    fn axis(&self) -> AxisKind {
        if self.state.options.position.is_horizontal() {
            AxisKind::X
        } else {
            AxisKind::Y
        }
    }

    fn set_data_bounds(&mut self, bounds: &DataBounds) {
        let positive_or = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        let raw_min = self
            .state
            .options
            .min
            .map_or_else(|| positive_or(bounds.min, 1.0), |v| positive_or(v, 1.0));
        let raw_max = self
            .state
            .options
            .max
            .map_or_else(|| positive_or(bounds.max, raw_min * 10.0), |v| {
                positive_or(v, raw_min * 10.0)
            });
        // Snap outward to decade boundaries.
        let mut min = 10f64.powf(raw_min.log10().floor());
        let mut max = 10f64.powf(raw_max.log10().ceil());
        if min == max {
            min /= 10.0;
            max *= 10.0;
        }
        self.state.min = min;
        self.state.max = max;
    }

    fn build_ticks(&mut self) {
        let min = self.state.min;
        let max = self.state.max;
        let first_decade = min.log10().floor() as i32;
        let last_decade = max.log10().ceil() as i32;
        let mut ticks = Vec::new();
        for decade in first_decade..=last_decade {
            let magnitude = 10f64.powi(decade);
            for significand in 1..=9 {
                let value = f64::from(significand) * magnitude;
                if value < min * (1.0 - 1e-9) || value > max * (1.0 + 1e-9) {
                    continue;
                }
                ticks.push(Tick {
                    value,
                    label: format_number(value, magnitude),
                    major: significand == 1,
                });
            }
        }
        self.state.ticks = auto_skip(ticks, self.state.options.max_ticks_limit);
    }

    fn pixel_for_value(&self, value: f64) -> f64 {
        if !value.is_finite() || value <= 0.0 {
            return f64::NAN;
        }
        let (log_min, span) = self.log_span();
        if span == 0.0 {
            return self.state.range.pixel_for_decimal(0.0);
        }
        self.state
            .range
            .pixel_for_decimal((value.log10() - log_min) / span)
    }

    fn value_for_pixel(&self, pixel: f64) -> f64 {
        let (log_min, span) = self.log_span();
        let d = self.state.range.decimal_for_pixel(pixel);
        10f64.powf(span.mul_add(d, log_min))
    }

    fn label_for_value(&self, value: f64) -> String {
        if !value.is_finite() || value <= 0.0 {
            return String::new();
        }
        let magnitude = 10f64.powf(value.log10().floor());
        format_number(value, magnitude)
    }
}
