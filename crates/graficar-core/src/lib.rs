//! Core types for the Graficar charting engine.
//!
//! This crate provides the foundations shared by every other engine crate:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`], [`Padding`]
//! - Color representation: [`Color`]
//! - The drawing surface: [`Canvas`], [`RecordingCanvas`], [`DrawCommand`]
//! - Visual elements: [`ArcElement`], [`LineElement`], [`PointElement`],
//!   [`RectElement`]
//! - The animation scheduler: [`Animator`], [`Tween`], [`Easing`]
//! - The data model and diff API: [`ChartData`], [`Dataset`], [`DataPatch`]
//! - Layered option resolution: [`OptionResolver`]

mod animation;
mod canvas;
mod color;
mod data;
mod element;
mod error;
mod geometry;
mod options;

pub use animation::{AnimationKey, Animator, ChartId, Easing, TickOutcome, Tween};
pub use canvas::{
    Canvas, DrawCommand, LineCap, LineJoin, PathSegment, RecordingCanvas, StrokeStyle, TextAlign,
    TextStyle,
};
pub use color::{Color, ColorParseError};
pub use data::{BarThickness, ChartData, ChartKind, DataPatch, DataValue, Dataset};
pub use element::{
    AnimProp, ArcElement, LineElement, LineVertex, PaintOptions, PointElement, RectElement,
    VisualElement,
};
pub use error::ChartError;
pub use geometry::{Padding, Point, Rect, Size};
pub use options::{
    palette_color, AnimationOptions, ElementOverrides, HoverOptions, InteractionMode,
    OptionResolver, ResolvedElementOptions, PALETTE,
};
