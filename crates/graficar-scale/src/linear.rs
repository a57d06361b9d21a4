//! Continuous numeric scale with nice-number tick spacing.

use crate::ticks::{auto_skip, format_number, linear_tick_values};
use crate::{AxisKind, DataBounds, Scale, ScaleOptions, ScaleState, Tick};

/// A linear numeric scale.
#[derive(Debug, Clone)]
pub struct LinearScale {
    state: ScaleState,
    spacing: f64,
    min_defined: bool,
    max_defined: bool,
}

impl LinearScale {
    /// Create a linear scale from options.
    #[must_use]
    pub fn new(options: ScaleOptions) -> Self {
        let min_defined = options.min.is_some();
        let max_defined = options.max.is_some();
        Self {
            state: ScaleState::new(options),
            spacing: 1.0,
            min_defined,
            max_defined,
        }
    }

    /// Tick spacing chosen by the last `build_ticks`.
    #[must_use]
    pub const fn spacing(&self) -> f64 {
        self.spacing
    }
}

/// Resolve a linear range from data bounds and option overrides.
///
/// Shared with the radial scale, which ranges the same way.
pub(crate) fn resolve_linear_range(options: &ScaleOptions, bounds: &DataBounds) -> (f64, f64) {
    let data_min = if bounds.min.is_finite() {
        bounds.min
    } else {
        0.0
    };
    let data_max = if bounds.max.is_finite() {
        bounds.max
    } else {
        1.0
    };
    let mut min = options.min.unwrap_or(data_min);
    let mut max = options.max.unwrap_or(data_max);
    if options.begin_at_zero {
        if min > 0.0 {
            min = 0.0;
        }
        if max < 0.0 {
            max = 0.0;
        }
    }
    if min > max {
        std::mem::swap(&mut min, &mut max);
    }
    // A collapsed range gets one unit of headroom on each side.
    if min == max {
        min -= 1.0;
        max += 1.0;
    }
    (min, max)
}

impl Scale for LinearScale {
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
        let (min, max) = resolve_linear_range(&self.state.options, bounds);
        self.state.min = min;
        self.state.max = max;
    }

    fn build_ticks(&mut self) {
        let step_size = self.state.options.step_size;
        let limit = self.state.options.max_ticks_limit;
        let (values, spacing) = linear_tick_values(
            self.state.min,
            self.state.max,
            step_size,
            limit,
            self.min_defined,
            self.max_defined,
        );
        self.spacing = spacing;
        // The rendered range follows the (possibly extended) tick grid.
        if let (Some(first), Some(last)) = (values.first(), values.last()) {
            self.state.min = *first;
            self.state.max = *last;
        }
        let mut ticks = Vec::with_capacity(values.len());
        for &v in &values {
            let label = self
                .state
                .label_cache
                .get_or_insert_with(v, || format_number(v, spacing))
                .to_string();
            ticks.push(Tick::new(v, label));
        }
        self.state.label_cache.shrink_to_live(&values);
        self.state.ticks = auto_skip(ticks, limit);
    }

    fn pixel_for_value(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        let span = self.state.max - self.state.min;
        if span == 0.0 {
            return self.state.range.pixel_for_decimal(0.0);
        }
        self.state
            .range
            .pixel_for_decimal((value - self.state.min) / span)
    }

    fn value_for_pixel(&self, pixel: f64) -> f64 {
        let d = self.state.range.decimal_for_pixel(pixel);
        (self.state.max - self.state.min).mul_add(d, self.state.min)
    }

    fn label_for_value(&self, value: f64) -> String {
        format_number(value, self.spacing)
    }
}
