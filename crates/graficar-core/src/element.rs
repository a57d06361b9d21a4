//! Visual elements: arc, line, point, rectangle.
//!
//! Elements are the retained geometry a chart draws and hit-tests. Dataset
//! controllers own them (one per data index, plus a shared line element for
//! line-family charts) and rewrite their geometry on every update; the
//! animator writes individual properties while a transition is in flight.

use crate::canvas::{Canvas, PathSegment, StrokeStyle};
use crate::color::Color;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// An animatable scalar property of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimProp {
    /// Center/anchor x
    X,
    /// Center/anchor y
    Y,
    /// Baseline coordinate (bars, filled lines)
    Base,
    /// Width (bars)
    Width,
    /// Point radius
    Radius,
    /// Inner radius (arcs)
    InnerRadius,
    /// Outer radius (arcs)
    OuterRadius,
    /// Start angle (arcs)
    StartAngle,
    /// End angle (arcs)
    EndAngle,
}

/// Resolved paint properties shared by all element kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintOptions {
    /// Fill color
    pub background: Color,
    /// Border color
    pub border_color: Color,
    /// Border width in pixels
    pub border_width: f64,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            background: Color::rgb(0.2, 0.47, 0.96),
            border_color: Color::rgb(0.2, 0.47, 0.96),
            border_width: 1.0,
        }
    }
}

/// Common element behavior: property access, hit tests, drawing.
pub trait VisualElement {
    /// Read an animatable property. Unknown properties read as 0.
    fn get_prop(&self, prop: AnimProp) -> f64;

    /// Write an animatable property. Unknown properties are ignored.
    fn set_prop(&mut self, prop: AnimProp, value: f64);

    /// Center point used for distance-based interaction.
    fn center(&self) -> Point;

    /// Full containment hit test.
    fn in_range(&self, x: f64, y: f64) -> bool;

    /// Hit test restricted to the x axis.
    fn in_x_range(&self, x: f64) -> bool;

    /// Hit test restricted to the y axis.
    fn in_y_range(&self, y: f64) -> bool;

    /// Draw into a canvas.
    fn draw(&self, canvas: &mut dyn Canvas);
}

// =============================================================================
// PointElement
// =============================================================================

/// A circular point marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointElement {
    /// Center x
    pub x: f64,
    /// Center y
    pub y: f64,
    /// Drawn radius
    pub radius: f64,
    /// Extra radius accepted by hit tests
    pub hit_radius: f64,
    /// Skip flag: parsed value was not finite, element takes no part in
    /// geometry or hit tests but keeps its index slot
    pub skip: bool,
    /// Stop flag: path break before this point (span-gaps)
    pub stop: bool,
    /// Paint properties
    pub options: PaintOptions,
}

impl Default for PointElement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius: 3.0,
            hit_radius: 1.0,
            skip: false,
            stop: false,
            options: PaintOptions::default(),
        }
    }
}

impl PointElement {
    /// Create a point at a position.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }
}

impl VisualElement for PointElement {
    fn get_prop(&self, prop: AnimProp) -> f64 {
        match prop {
            AnimProp::X => self.x,
            AnimProp::Y => self.y,
            AnimProp::Radius => self.radius,
            _ => 0.0,
        }
    }

    fn set_prop(&mut self, prop: AnimProp, value: f64) {
        match prop {
            AnimProp::X => self.x = value,
            AnimProp::Y => self.y = value,
            AnimProp::Radius => self.radius = value,
            _ => {}
        }
    }

    fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn in_range(&self, x: f64, y: f64) -> bool {
        if self.skip {
            return false;
        }
        let reach = self.radius + self.hit_radius;
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy < reach * reach
    }

    fn in_x_range(&self, x: f64) -> bool {
        !self.skip && (x - self.x).abs() < self.radius + self.hit_radius
    }

    fn in_y_range(&self, y: f64) -> bool {
        !self.skip && (y - self.y).abs() < self.radius + self.hit_radius
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.skip || self.radius <= 0.0 {
            return;
        }
        canvas.path(
            vec![PathSegment::Arc {
                center: self.center(),
                radius: self.radius,
                start_angle: 0.0,
                end_angle: TAU,
            }],
            true,
            Some(self.options.background),
            Some(StrokeStyle {
                color: self.options.border_color,
                width: self.options.border_width,
                ..StrokeStyle::default()
            }),
        );
    }
}

// =============================================================================
// RectElement
// =============================================================================

/// A bar rectangle spanning from a baseline to a value coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectElement {
    /// Category-axis center
    pub x: f64,
    /// Value-axis coordinate of the bar head
    pub y: f64,
    /// Value-axis coordinate of the bar base
    pub base: f64,
    /// Bar thickness along the category axis
    pub width: f64,
    /// Bars grow along y when false, along x when true
    pub horizontal: bool,
    /// Skip flag, as on [`PointElement`]
    pub skip: bool,
    /// Paint properties
    pub options: PaintOptions,
}

impl Default for RectElement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            base: 0.0,
            width: 0.0,
            horizontal: false,
            skip: false,
            options: PaintOptions::default(),
        }
    }
}

impl RectElement {
    /// Axis-aligned bounds as (left, top, right, bottom).
    #[must_use]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let half = self.width / 2.0;
        if self.horizontal {
            let (lo, hi) = min_max(self.y, self.base);
            (lo, self.x - half, hi, self.x + half)
        } else {
            let (lo, hi) = min_max(self.y, self.base);
            (self.x - half, lo, self.x + half, hi)
        }
    }
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl VisualElement for RectElement {
    fn get_prop(&self, prop: AnimProp) -> f64 {
        match prop {
            AnimProp::X => self.x,
            AnimProp::Y => self.y,
            AnimProp::Base => self.base,
            AnimProp::Width => self.width,
            _ => 0.0,
        }
    }

    fn set_prop(&mut self, prop: AnimProp, value: f64) {
        match prop {
            AnimProp::X => self.x = value,
            AnimProp::Y => self.y = value,
            AnimProp::Base => self.base = value,
            AnimProp::Width => self.width = value,
            _ => {}
        }
    }

    fn center(&self) -> Point {
        if self.horizontal {
            Point::new((self.y + self.base) / 2.0, self.x)
        } else {
            Point::new(self.x, (self.y + self.base) / 2.0)
        }
    }

    fn in_range(&self, x: f64, y: f64) -> bool {
        if self.skip {
            return false;
        }
        let (left, top, right, bottom) = self.bounds();
        x >= left && x <= right && y >= top && y <= bottom
    }

    fn in_x_range(&self, x: f64) -> bool {
        if self.skip {
            return false;
        }
        let (left, _, right, _) = self.bounds();
        x >= left && x <= right
    }

    fn in_y_range(&self, y: f64) -> bool {
        if self.skip {
            return false;
        }
        let (_, top, _, bottom) = self.bounds();
        y >= top && y <= bottom
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.skip {
            return;
        }
        let (left, top, right, bottom) = self.bounds();
        canvas.rect(
            crate::geometry::Rect::new(left, top, right - left, bottom - top),
            Some(self.options.background),
            (self.options.border_width > 0.0).then(|| StrokeStyle {
                color: self.options.border_color,
                width: self.options.border_width,
                ..StrokeStyle::default()
            }),
        );
    }
}

// =============================================================================
// ArcElement
// =============================================================================

/// A doughnut/pie/polar slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcElement {
    /// Center x
    pub x: f64,
    /// Center y
    pub y: f64,
    /// Inner radius (0 for pie slices)
    pub inner_radius: f64,
    /// Outer radius
    pub outer_radius: f64,
    /// Start angle in radians
    pub start_angle: f64,
    /// End angle in radians
    pub end_angle: f64,
    /// Circumference covered by this slice, in radians
    pub circumference: f64,
    /// Paint properties
    pub options: PaintOptions,
}

impl Default for ArcElement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            inner_radius: 0.0,
            outer_radius: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
            circumference: 0.0,
            options: PaintOptions::default(),
        }
    }
}

impl VisualElement for ArcElement {
    fn get_prop(&self, prop: AnimProp) -> f64 {
        match prop {
            AnimProp::X => self.x,
            AnimProp::Y => self.y,
            AnimProp::InnerRadius => self.inner_radius,
            AnimProp::OuterRadius => self.outer_radius,
            AnimProp::StartAngle => self.start_angle,
            AnimProp::EndAngle => self.end_angle,
            _ => 0.0,
        }
    }

    fn set_prop(&mut self, prop: AnimProp, value: f64) {
        match prop {
            AnimProp::X => self.x = value,
            AnimProp::Y => self.y = value,
            AnimProp::InnerRadius => self.inner_radius = value,
            AnimProp::OuterRadius => self.outer_radius = value,
            AnimProp::StartAngle => self.start_angle = value,
            AnimProp::EndAngle => self.end_angle = value,
            _ => {}
        }
    }

    fn center(&self) -> Point {
        let half_angle = (self.start_angle + self.end_angle) / 2.0;
        let half_radius = (self.inner_radius + self.outer_radius) / 2.0;
        Point::new(
            half_angle.cos().mul_add(half_radius, self.x),
            half_angle.sin().mul_add(half_radius, self.y),
        )
    }

    fn in_range(&self, x: f64, y: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        let distance = dx.hypot(dy);
        if distance < self.inner_radius || distance > self.outer_radius {
            return false;
        }
        // Normalize the pointer angle into the slice's angular window.
        let mut angle = dy.atan2(dx);
        while angle < self.start_angle {
            angle += TAU;
        }
        angle <= self.end_angle
    }

    fn in_x_range(&self, x: f64) -> bool {
        self.in_range(x, self.y)
    }

    fn in_y_range(&self, y: f64) -> bool {
        self.in_range(self.x, y)
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.outer_radius <= 0.0 || (self.end_angle - self.start_angle).abs() < f64::EPSILON {
            return;
        }
        let mut segments = vec![PathSegment::Arc {
            center: Point::new(self.x, self.y),
            radius: self.outer_radius,
            start_angle: self.start_angle,
            end_angle: self.end_angle,
        }];
        if self.inner_radius > 0.0 {
            segments.push(PathSegment::Arc {
                center: Point::new(self.x, self.y),
                radius: self.inner_radius,
                start_angle: self.end_angle,
                end_angle: self.start_angle,
            });
        } else {
            segments.push(PathSegment::LineTo(Point::new(self.x, self.y)));
        }
        canvas.path(
            segments,
            true,
            Some(self.options.background),
            (self.options.border_width > 0.0).then(|| StrokeStyle {
                color: self.options.border_color,
                width: self.options.border_width,
                ..StrokeStyle::default()
            }),
        );
    }
}

// =============================================================================
// LineElement
// =============================================================================

/// A vertex of a line stroke, carrying its Bézier control points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineVertex {
    /// Vertex position
    pub point: Point,
    /// Control point toward the previous vertex
    pub cp_prev: Point,
    /// Control point toward the next vertex
    pub cp_next: Point,
    /// Vertex is excluded (non-finite source value)
    pub skip: bool,
    /// Path breaks before this vertex (span-gaps)
    pub stop: bool,
}

/// The shared stroke of a line/radar dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineElement {
    /// Ordered vertices
    pub vertices: Vec<LineVertex>,
    /// Bézier tension; 0 draws straight segments
    pub tension: f64,
    /// Close the path (radar)
    pub closed: bool,
    /// Stroke color
    pub color: Color,
    /// Stroke width
    pub width: f64,
    /// Fill color under the stroke (filled line/area)
    pub fill: Option<Color>,
}

impl Default for LineElement {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            tension: 0.0,
            closed: false,
            color: Color::rgb(0.2, 0.47, 0.96),
            width: 2.0,
            fill: None,
        }
    }
}

impl LineElement {
    /// Build the path segments for the current vertices.
    #[must_use]
    pub fn build_path(&self) -> Vec<PathSegment> {
        let mut segments = Vec::with_capacity(self.vertices.len());
        let mut prev: Option<&LineVertex> = None;
        for vertex in &self.vertices {
            if vertex.skip {
                continue;
            }
            match prev {
                None => segments.push(PathSegment::MoveTo(vertex.point)),
                Some(_) if vertex.stop => segments.push(PathSegment::MoveTo(vertex.point)),
                Some(p) if self.tension > 0.0 => segments.push(PathSegment::BezierTo {
                    cp1: p.cp_next,
                    cp2: vertex.cp_prev,
                    to: vertex.point,
                }),
                Some(_) => segments.push(PathSegment::LineTo(vertex.point)),
            }
            prev = Some(vertex);
        }
        segments
    }

    /// Draw into a canvas.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let segments = self.build_path();
        if segments.len() < 2 {
            return;
        }
        canvas.path(
            segments,
            self.closed,
            self.fill,
            Some(StrokeStyle {
                color: self.color,
                width: self.width,
                join: LineJoinForTension(self.tension).into(),
                ..StrokeStyle::default()
            }),
        );
    }

    /// Recompute Bézier control points for the current vertices.
    ///
    /// Uses the cardinal-spline construction: each vertex's control points
    /// lie along the chord between its neighbors, scaled by the tension.
    /// Called once per layout pass, not per draw.
    pub fn update_control_points(&mut self) {
        let n = self.vertices.len();
        if n < 2 || self.tension <= 0.0 {
            return;
        }
        for i in 0..n {
            if self.vertices[i].skip {
                continue;
            }
            let current = self.vertices[i].point;
            let before = if i > 0 { self.vertices[i - 1].point } else { current };
            let after = if i + 1 < n {
                self.vertices[i + 1].point
            } else {
                current
            };

            let d01 = before.distance(&current);
            let d12 = current.distance(&after);
            let total = d01 + d12;
            if total == 0.0 {
                self.vertices[i].cp_prev = current;
                self.vertices[i].cp_next = current;
                continue;
            }
            let s01 = self.tension * (d01 / total);
            let s12 = self.tension * (d12 / total);
            let span = after - before;
            self.vertices[i].cp_prev =
                Point::new(span.x.mul_add(-s01, current.x), span.y.mul_add(-s01, current.y));
            self.vertices[i].cp_next =
                Point::new(span.x.mul_add(s12, current.x), span.y.mul_add(s12, current.y));
        }
    }
}

struct LineJoinForTension(f64);

impl From<LineJoinForTension> for crate::canvas::LineJoin {
    fn from(value: LineJoinForTension) -> Self {
        if value.0 > 0.0 {
            Self::Round
        } else {
            Self::Miter
        }
    }
}
