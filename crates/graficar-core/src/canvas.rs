//! Drawing surface abstraction and the recording canvas.
//!
//! All rendering reduces to [`DrawCommand`] primitives. The engine draws
//! into any [`Canvas`]; the [`RecordingCanvas`] implementation records
//! commands for testing, serialization, and frame export.

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    /// Flat cap at endpoint
    #[default]
    Butt,
    /// Rounded cap
    Round,
    /// Square cap extending beyond endpoint
    Square,
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    /// Sharp corner
    #[default]
    Miter,
    /// Rounded corner
    Round,
    /// Beveled corner
    Bevel,
}

/// Stroke style for path rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub width: f64,
    /// Line cap style
    pub cap: LineCap,
    /// Line join style
    pub join: LineJoin,
    /// Dash pattern (empty = solid)
    pub dash: Vec<f64>,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            dash: Vec::new(),
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    /// Anchor at the left edge
    #[default]
    Left,
    /// Anchor at the horizontal center
    Center,
    /// Anchor at the right edge
    Right,
}

/// Text rendering style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f64,
    /// Text color
    pub color: Color,
    /// Horizontal alignment relative to the anchor point
    pub align: TextAlign,
    /// Rotation around the anchor, in radians
    pub rotation: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 12.0,
            color: Color::BLACK,
            align: TextAlign::Left,
            rotation: 0.0,
        }
    }
}

impl TextStyle {
    /// Estimated rendered size of a string in this style.
    ///
    /// The engine is host-agnostic, so metrics use a fixed advance-width
    /// model; hosts with real font metrics can override via their own
    /// [`Canvas`] implementation.
    #[must_use]
    pub fn measure(&self, text: &str) -> Size {
        Size::new(
            text.chars().count() as f64 * self.size * 0.6,
            self.size * 1.2,
        )
    }
}

/// One segment of a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    /// Start a new subpath at a point
    MoveTo(Point),
    /// Straight line to a point
    LineTo(Point),
    /// Cubic Bézier curve to a point with two control points
    BezierTo {
        /// First control point
        cp1: Point,
        /// Second control point
        cp2: Point,
        /// End point
        to: Point,
    },
    /// Circular arc around a center
    Arc {
        /// Arc center
        center: Point,
        /// Arc radius
        radius: f64,
        /// Start angle in radians
        start_angle: f64,
        /// End angle in radians
        end_angle: f64,
    },
}

/// A recorded draw operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Filled and/or stroked rectangle
    Rect {
        /// Rectangle bounds
        bounds: Rect,
        /// Fill color (None = no fill)
        fill: Option<Color>,
        /// Stroke (None = no stroke)
        stroke: Option<StrokeStyle>,
    },
    /// Filled and/or stroked path
    Path {
        /// Path segments
        segments: Vec<PathSegment>,
        /// Close the path before painting
        closed: bool,
        /// Fill color (None = no fill)
        fill: Option<Color>,
        /// Stroke (None = no stroke)
        stroke: Option<StrokeStyle>,
    },
    /// Text run
    Text {
        /// The string to render
        text: String,
        /// Anchor position
        position: Point,
        /// Style
        style: TextStyle,
    },
    /// Push a clip rectangle
    PushClip(Rect),
    /// Pop the innermost clip rectangle
    PopClip,
}

/// A minimal immediate-mode 2D drawing surface.
///
/// This is the only interface the engine requires from its host.
pub trait Canvas {
    /// Draw a rectangle.
    fn rect(&mut self, bounds: Rect, fill: Option<Color>, stroke: Option<StrokeStyle>);

    /// Draw a path.
    fn path(
        &mut self,
        segments: Vec<PathSegment>,
        closed: bool,
        fill: Option<Color>,
        stroke: Option<StrokeStyle>,
    );

    /// Draw a text run.
    fn text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Measure a text run without drawing it.
    fn measure_text(&self, text: &str, style: &TextStyle) -> Size {
        style.measure(text)
    }

    /// Push a clip rectangle.
    fn push_clip(&mut self, bounds: Rect);

    /// Pop the innermost clip rectangle.
    fn pop_clip(&mut self);

    /// Draw a straight line between two points.
    fn line(&mut self, from: Point, to: Point, stroke: StrokeStyle) {
        self.path(
            vec![PathSegment::MoveTo(from), PathSegment::LineTo(to)],
            false,
            None,
            Some(stroke),
        );
    }
}

/// A [`Canvas`] that records draw operations as [`DrawCommand`]s.
///
/// This is useful for:
/// - Testing (verify what was painted)
/// - Serialization (export a frame to the host)
/// - Diffing (compare render outputs)
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    clip_depth: usize,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the recorded commands, clearing the canvas.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        self.clip_depth = 0;
        std::mem::take(&mut self.commands)
    }

    /// Get the number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clear all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_depth = 0;
    }

    /// Current clip nesting depth.
    #[must_use]
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    /// Serialize the recorded frame to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.commands)
    }
}

impl Canvas for RecordingCanvas {
    fn rect(&mut self, bounds: Rect, fill: Option<Color>, stroke: Option<StrokeStyle>) {
        self.commands.push(DrawCommand::Rect {
            bounds,
            fill,
            stroke,
        });
    }

    fn path(
        &mut self,
        segments: Vec<PathSegment>,
        closed: bool,
        fill: Option<Color>,
        stroke: Option<StrokeStyle>,
    ) {
        self.commands.push(DrawCommand::Path {
            segments,
            closed,
            fill,
            stroke,
        });
    }

    fn text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn push_clip(&mut self, bounds: Rect) {
        self.clip_depth += 1;
        self.commands.push(DrawCommand::PushClip(bounds));
    }

    fn pop_clip(&mut self) {
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopClip);
    }
}
