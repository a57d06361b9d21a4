//! Radial linear scale for radar and polar-area charts.

use crate::linear::resolve_linear_range;
use crate::ticks::{auto_skip, format_number, linear_tick_values};
use crate::{AxisKind, DataBounds, Scale, ScaleOptions, ScaleState, Tick, LABEL_GAP};
use graficar_core::{Canvas, PathSegment, Point, Rect, StrokeStyle, TextAlign, TextStyle};
use std::f64::consts::{FRAC_PI_2, TAU};

/// A linear scale measured as distance from a center point.
///
/// Point labels (one per category, from the options' labels) are placed
/// just outside the outer ring; the drawing radius shrinks until they
/// fit inside the chart area.
#[derive(Debug, Clone)]
pub struct RadialLinearScale {
    state: ScaleState,
    center: Point,
    drawing_area: f64,
    spacing: f64,
}

impl RadialLinearScale {
    /// Create a radial scale from options.
    #[must_use]
    pub fn new(options: ScaleOptions) -> Self {
        Self {
            state: ScaleState::new(options),
            center: Point::ORIGIN,
            drawing_area: 0.0,
            spacing: 1.0,
        }
    }

    /// Center of the rings, set by `fit`.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// Usable radius in pixels, set by `fit`.
    #[must_use]
    pub const fn drawing_area(&self) -> f64 {
        self.drawing_area
    }

    /// Angle of a category spoke, starting at 12 o'clock.
    #[must_use]
    pub fn angle_for_index(index: usize, count: usize) -> f64 {
        if count == 0 {
            return -FRAC_PI_2;
        }
        (index as f64 / count as f64).mul_add(TAU, -FRAC_PI_2)
    }

    /// Radial distance of a value from the center.
    #[must_use]
    pub fn distance_from_center(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return f64::NAN;
        }
        let span = self.state.max - self.state.min;
        if span == 0.0 {
            return 0.0;
        }
        (value - self.state.min) / span * self.drawing_area
    }

    /// Position of a value along a category spoke.
    #[must_use]
    pub fn point_position(&self, index: usize, count: usize, value: f64) -> Point {
        let angle = Self::angle_for_index(index, count);
        let distance = self.distance_from_center(value);
        Point::new(
            angle.cos().mul_add(distance, self.center.x),
            angle.sin().mul_add(distance, self.center.y),
        )
    }

    /// Size the rings inside the chart area.
    ///
    /// Starts from the inscribed circle and shrinks the radius, at most
    /// four times, by the worst point-label overflow past the area edges.
    pub fn fit(&mut self, area: &Rect) {
        self.center = area.center();
        let mut radius = area.width.min(area.height) / 2.0;
        let labels = &self.state.options.labels;
        if labels.is_empty() {
            self.drawing_area = radius.max(0.0);
            return;
        }
        let style = TextStyle {
            size: self.state.options.font_size,
            ..TextStyle::default()
        };
        let count = labels.len();
        for _ in 0..4 {
            let mut shrink = 0.0f64;
            for (i, label) in labels.iter().enumerate() {
                let angle = Self::angle_for_index(i, count);
                let size = style.measure(label);
                let tip_x = angle.cos().mul_add(radius + LABEL_GAP, self.center.x);
                let tip_y = angle.sin().mul_add(radius + LABEL_GAP, self.center.y);
                let half_w = size.width / 2.0;
                let half_h = size.height / 2.0;
                shrink = shrink
                    .max(area.x - (tip_x - half_w))
                    .max((tip_x + half_w) - area.right())
                    .max(area.y - (tip_y - half_h))
                    .max((tip_y + half_h) - area.bottom());
            }
            if shrink <= 0.0 {
                break;
            }
            radius -= shrink;
        }
        self.drawing_area = radius.max(0.0);
    }

    /// Draw the concentric grid rings and category spokes.
    pub fn draw_rings(&self, canvas: &mut dyn Canvas) {
        let grid = &self.state.options.grid;
        let stroke = StrokeStyle {
            color: grid.color,
            width: grid.line_width,
            ..StrokeStyle::default()
        };
        for tick in &self.state.ticks {
            let distance = self.distance_from_center(tick.value);
            if !(distance.is_finite() && distance > 0.0) {
                continue;
            }
            canvas.path(
                vec![PathSegment::Arc {
                    center: self.center,
                    radius: distance,
                    start_angle: 0.0,
                    end_angle: TAU,
                }],
                false,
                None,
                Some(stroke.clone()),
            );
        }
        let count = self.state.options.labels.len();
        for i in 0..count {
            let edge = self.point_position(i, count, self.state.max);
            canvas.line(self.center, edge, stroke.clone());
        }
    }

    /// Draw the tick labels (up the 12 o'clock spoke) and point labels.
    pub fn draw_axis(&self, canvas: &mut dyn Canvas) {
        let style = TextStyle {
            size: self.state.options.font_size,
            align: TextAlign::Center,
            ..TextStyle::default()
        };
        for tick in &self.state.ticks {
            let distance = self.distance_from_center(tick.value);
            if !distance.is_finite() {
                continue;
            }
            canvas.text(
                &tick.label,
                Point::new(self.center.x, self.center.y - distance),
                &style,
            );
        }
        let labels = &self.state.options.labels;
        let count = labels.len();
        for (i, label) in labels.iter().enumerate() {
            let angle = Self::angle_for_index(i, count);
            let position = Point::new(
                angle
                    .cos()
                    .mul_add(self.drawing_area + LABEL_GAP, self.center.x),
                angle
                    .sin()
                    .mul_add(self.drawing_area + LABEL_GAP, self.center.y),
            );
            canvas.text(label, position, &style);
        }
    }
}

impl Scale for RadialLinearScale {
    fn state(&self) -> &ScaleState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScaleState {
        &mut self.state
    }

    fn axis(&self) -> AxisKind {
        AxisKind::R
    }

    fn set_data_bounds(&mut self, bounds: &DataBounds) {
        let (min, max) = resolve_linear_range(&self.state.options, bounds);
        self.state.min = min;
        self.state.max = max;
    }

    fn build_ticks(&mut self) {
        let options = &self.state.options;
        let (values, spacing) = linear_tick_values(
            self.state.min,
            self.state.max,
            options.step_size,
            options.max_ticks_limit,
            options.min.is_some(),
            options.max.is_some(),
        );
        self.spacing = spacing;
        if let (Some(first), Some(last)) = (values.first(), values.last()) {
            self.state.min = *first;
            self.state.max = *last;
        }
        let limit = self.state.options.max_ticks_limit;
        let ticks = values
            .iter()
            .map(|&v| Tick::new(v, format_number(v, spacing)))
            .collect();
        self.state.ticks = auto_skip(ticks, limit);
    }

    /// For a radial scale the "pixel" is the distance from the center.
    fn pixel_for_value(&self, value: f64) -> f64 {
        self.distance_from_center(value)
    }

    fn value_for_pixel(&self, pixel: f64) -> f64 {
        if self.drawing_area == 0.0 {
            return self.state.min;
        }
        let span = self.state.max - self.state.min;
        (pixel / self.drawing_area).mul_add(span, self.state.min)
    }

    fn label_for_value(&self, value: f64) -> String {
        format_number(value, self.spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(labels: &[&str], min: f64, max: f64, area: Rect) -> RadialLinearScale {
        let options = ScaleOptions::default()
            .labels(labels.iter().map(|s| (*s).to_string()).collect())
            .begin_at_zero(true);
        let mut scale = RadialLinearScale::new(options);
        scale.set_data_bounds(&DataBounds::from_range(min, max));
        scale.build_ticks();
        scale.fit(&area);
        scale
    }

    #[test]
    fn test_first_spoke_points_up() {
        let angle = RadialLinearScale::angle_for_index(0, 4);
        assert!((angle + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_spokes_evenly_spaced() {
        let a0 = RadialLinearScale::angle_for_index(0, 4);
        let a1 = RadialLinearScale::angle_for_index(1, 4);
        assert!((a1 - a0 - TAU / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_without_labels_uses_inscribed_circle() {
        let scale = fitted(&[], 0.0, 10.0, Rect::new(0.0, 0.0, 400.0, 300.0));
        assert_eq!(scale.drawing_area(), 150.0);
        assert_eq!(scale.center(), Point::new(200.0, 150.0));
    }

    #[test]
    fn test_fit_shrinks_for_point_labels() {
        let bare = fitted(&[], 0.0, 10.0, Rect::new(0.0, 0.0, 300.0, 300.0));
        let labeled = fitted(
            &["alpha", "bravo", "charlie", "delta"],
            0.0,
            10.0,
            Rect::new(0.0, 0.0, 300.0, 300.0),
        );
        assert!(labeled.drawing_area() < bare.drawing_area());
        assert!(labeled.drawing_area() > 0.0);
    }

    #[test]
    fn test_distance_scales_linearly() {
        let scale = fitted(&[], 0.0, 10.0, Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(scale.distance_from_center(0.0), 0.0);
        assert_eq!(scale.distance_from_center(10.0), 100.0);
        assert_eq!(scale.distance_from_center(5.0), 50.0);
    }

    #[test]
    fn test_point_position_on_first_spoke() {
        let scale = fitted(&[], 0.0, 10.0, Rect::new(0.0, 0.0, 200.0, 200.0));
        let p = scale.point_position(0, 4, 10.0);
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_distance_is_nan() {
        let scale = fitted(&[], 0.0, 10.0, Rect::new(0.0, 0.0, 200.0, 200.0));
        assert!(scale.distance_from_center(f64::NAN).is_nan());
    }

    #[test]
    fn test_rings_drawn_per_tick() {
        let scale = fitted(&[], 0.0, 10.0, Rect::new(0.0, 0.0, 200.0, 200.0));
        let mut canvas = graficar_core::RecordingCanvas::new();
        scale.draw_rings(&mut canvas);
        let rings = canvas
            .commands()
            .iter()
            .filter(|c| matches!(c, graficar_core::DrawCommand::Path { .. }))
            .count();
        // One ring per tick with a positive radius
        let positive = scale.ticks().iter().filter(|t| t.value > 0.0).count();
        assert_eq!(rings, positive);
    }

    #[test]
    fn test_value_round_trip() {
        let scale = fitted(&[], 0.0, 10.0, Rect::new(0.0, 0.0, 200.0, 200.0));
        let v = scale.value_for_pixel(scale.distance_from_center(7.0));
        assert!((v - 7.0).abs() < 1e-9);
    }
}
