//! Discrete category scale: one slot per label.

use crate::ticks::auto_skip;
use crate::{AxisKind, DataBounds, Scale, ScaleOptions, ScaleState, Tick};

/// A scale over label indices `0..count`.
///
/// With `offset` enabled the band shifts by half a slot so bar-style
/// elements center inside their category instead of sitting on the
/// gridline.
#[derive(Debug, Clone)]
pub struct CategoryScale {
    state: ScaleState,
    count: usize,
}

impl CategoryScale {
    /// Create a category scale from options.
    #[must_use]
    pub fn new(options: ScaleOptions) -> Self {
        let count = options.labels.len();
        let mut state = ScaleState::new(options);
        state.min = 0.0;
        state.max = count.saturating_sub(1) as f64;
        Self { state, count }
    }

    /// Number of category slots.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Width of one category band in pixels.
    #[must_use]
    pub fn band_width(&self) -> f64 {
        let span = (self.state.range.end - self.state.range.start).abs();
        span / self.value_range()
    }

    /// Denominator of the index-to-decimal mapping: the slot count with
    /// offset, one less without (endpoints sit on the range edges).
    fn value_range(&self) -> f64 {
        let slots = if self.state.options.offset {
            self.count
        } else {
            self.count.saturating_sub(1)
        };
        slots.max(1) as f64
    }

    fn label_at(&self, index: usize) -> String {
        self.state
            .options
            .labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| index.to_string())
    }
}

impl Scale for CategoryScale {
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
        self.count = self.state.options.labels.len().max(bounds.count);
        self.state.min = 0.0;
        self.state.max = self.count.saturating_sub(1) as f64;
    }

    fn build_ticks(&mut self) {
        let ticks: Vec<Tick> = (0..self.count)
            .map(|i| Tick::new(i as f64, self.label_at(i)))
            .collect();
        self.state.ticks = auto_skip(ticks, self.state.options.max_ticks_limit);
    }

    fn pixel_for_value(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        let shift = if self.state.options.offset { 0.5 } else { 0.0 };
        self.state
            .range
            .pixel_for_decimal((value + shift) / self.value_range())
    }

    fn value_for_pixel(&self, pixel: f64) -> f64 {
        let shift = if self.state.options.offset { 0.5 } else { 0.0 };
        self.state
            .range
            .decimal_for_pixel(pixel)
            .mul_add(self.value_range(), -shift)
    }

    fn label_for_value(&self, value: f64) -> String {
        if value < 0.0 {
            return String::new();
        }
        self.label_at(value.round() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelRange;
    use graficar_layout::Position;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn fitted(options: ScaleOptions) -> CategoryScale {
        let mut scale = CategoryScale::new(options);
        scale.set_data_bounds(&DataBounds::default());
        scale.build_ticks();
        scale.set_pixel_range(PixelRange::new(0.0, 300.0, false));
        scale
    }

    #[test]
    fn test_endpoints_without_offset() {
        // Five labels: the first maps to the start pixel, the last to the end
        let options =
            ScaleOptions::new("x", Position::Bottom).labels(labels(&["a", "b", "c", "d", "e"]));
        let scale = fitted(options);
        assert_eq!(scale.pixel_for_value(0.0), 0.0);
        assert_eq!(scale.pixel_for_value(4.0), 300.0);
        assert_eq!(scale.pixel_for_value(2.0), 150.0);
    }

    #[test]
    fn test_offset_centers_bands() {
        let options = ScaleOptions::new("x", Position::Bottom)
            .labels(labels(&["a", "b", "c"]))
            .offset(true);
        let scale = fitted(options);
        // Three bands of 100px, centers at 50/150/250
        assert_eq!(scale.pixel_for_value(0.0), 50.0);
        assert_eq!(scale.pixel_for_value(1.0), 150.0);
        assert_eq!(scale.pixel_for_value(2.0), 250.0);
        assert_eq!(scale.band_width(), 100.0);
    }

    #[test]
    fn test_single_category_does_not_divide_by_zero() {
        let options = ScaleOptions::new("x", Position::Bottom).labels(labels(&["only"]));
        let scale = fitted(options);
        assert!(scale.pixel_for_value(0.0).is_finite());
    }

    #[test]
    fn test_count_from_data_when_labels_short() {
        let options = ScaleOptions::new("x", Position::Bottom).labels(labels(&["a"]));
        let mut scale = CategoryScale::new(options);
        scale.set_data_bounds(&DataBounds {
            min: f64::NAN,
            max: f64::NAN,
            count: 5,
        });
        scale.build_ticks();
        assert_eq!(scale.count(), 5);
        // Missing labels fall back to the index
        assert_eq!(scale.ticks()[3].label, "3");
    }

    #[test]
    fn test_tick_per_label() {
        let options =
            ScaleOptions::new("x", Position::Bottom).labels(labels(&["jan", "feb", "mar"]));
        let scale = fitted(options);
        let names: Vec<&str> = scale.ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(names, vec!["jan", "feb", "mar"]);
    }

    #[test]
    fn test_value_pixel_round_trip() {
        let options = ScaleOptions::new("x", Position::Bottom)
            .labels(labels(&["a", "b", "c", "d"]))
            .offset(true);
        let scale = fitted(options);
        let v = scale.value_for_pixel(scale.pixel_for_value(2.0));
        assert!((v - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_many_labels_auto_skip() {
        let many: Vec<String> = (0..50).map(|i| format!("c{i}")).collect();
        let mut options = ScaleOptions::new("x", Position::Bottom).labels(many);
        options.max_ticks_limit = 10;
        let scale = fitted(options);
        assert!(scale.ticks().len() <= 11);
        assert_eq!(scale.ticks().first().map(|t| t.value), Some(0.0));
        assert_eq!(scale.ticks().last().map(|t| t.value), Some(49.0));
    }
}
