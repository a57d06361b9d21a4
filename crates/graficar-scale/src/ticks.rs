//! Shared tick math: nice numbers, linear tick generation, auto-skip.

use crate::Tick;

/// Round a range to a "nice" value (1, 2, or 5 times a power of ten).
///
/// With `round`, picks the nearest nice value; otherwise the smallest
/// nice value not below the input.
#[must_use]
pub fn nice_num(range: f64, round: bool) -> f64 {
    if range == 0.0 || !range.is_finite() {
        return 0.0;
    }
    let exponent = range.abs().log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = range.abs() / magnitude;
    let nice = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Format a tick value with the decimal places its spacing implies.
#[must_use]
pub fn format_number(value: f64, spacing: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let places = if spacing > 0.0 && spacing.is_finite() {
        (-spacing.log10().floor()).clamp(0.0, 10.0) as usize
    } else {
        0
    };
    format!("{value:.places$}")
}

/// Snap an accumulated tick value back onto the spacing grid's precision.
fn align(value: f64, spacing: f64) -> f64 {
    let places = (-spacing.log10().floor()).clamp(0.0, 12.0) as i32;
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Generate evenly spaced tick values covering `[min, max]`.
///
/// Without explicit bounds the range is extended outward to the spacing
/// grid. Explicit bounds are kept exact as edge ticks, with interior
/// ticks still grid-aligned. A `step_size` that would exceed the tick
/// limit is widened by a whole multiple.
pub(crate) fn linear_tick_values(
    min: f64,
    max: f64,
    step_size: Option<f64>,
    max_ticks: usize,
    min_defined: bool,
    max_defined: bool,
) -> (Vec<f64>, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (Vec::new(), 1.0);
    }
    let max_ticks = max_ticks.max(2);
    if min == max {
        return (vec![min], 1.0);
    }
    let span = max - min;
    let mut spacing =
        step_size.unwrap_or_else(|| nice_num(span / (max_ticks - 1) as f64, true));
    if spacing <= 0.0 {
        return (vec![min, max], span);
    }
    let count = (span / spacing).ceil();
    if count as usize + 1 > max_ticks {
        let factor = (count / (max_ticks - 1) as f64).ceil();
        spacing *= factor;
    }

    let eps = spacing * 1e-6;
    let mut ticks = Vec::new();
    if min_defined {
        ticks.push(min);
    }
    let start_idx = (min / spacing).floor() as i64;
    let end_idx = if max_defined {
        ((max - eps) / spacing).floor() as i64
    } else {
        ((max - eps) / spacing).ceil() as i64
    };
    for i in start_idx..=end_idx {
        let v = align(i as f64 * spacing, spacing);
        if min_defined && v <= min + eps {
            continue;
        }
        ticks.push(v);
    }
    if max_defined {
        ticks.push(max);
    }
    (ticks, spacing)
}

/// Thin a tick list down to at most roughly `limit` entries.
///
/// The stride is the smallest integer factor of `len - 1` that brings
/// the count within the limit, falling back to plain `ceil(len / limit)`
/// when no factor exists. The first and last ticks always survive, and
/// major ticks are kept regardless of stride.
pub(crate) fn auto_skip(ticks: Vec<Tick>, limit: usize) -> Vec<Tick> {
    let len = ticks.len();
    if limit == 0 || len <= limit {
        return ticks;
    }
    let needed = len.div_ceil(limit);
    let span = len - 1;
    let stride = (needed..=span).find(|s| span % s == 0).unwrap_or(needed);
    ticks
        .into_iter()
        .enumerate()
        .filter(|(i, t)| i % stride == 0 || *i == len - 1 || t.major)
        .map(|(_, t)| t)
        .collect()
}
