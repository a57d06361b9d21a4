//! The Graficar charting engine.
//!
//! A retained, animated chart model driven entirely by the host: the host
//! owns the clock and the drawing surface, the engine owns the data model,
//! scales, layout and element geometry. Construct a [`Chart`] from a
//! [`ChartConfig`], then drive it with `update` / `tick` / `render`.
//!
//! Six chart kinds ship with the engine: line, bar, bubble, doughnut/pie,
//! polar area and radar. Each is a controller that turns parsed data into
//! target element geometry; the chart core diffs those targets against the
//! retained elements and animates the difference.

mod bar;
mod bubble;
mod chart;
mod controller;
mod doughnut;
mod interaction;
mod line;
mod meta;
mod plugins;
mod polar;
mod radar;

pub use chart::{Chart, ChartConfig, ChartOptions, ScaleConfig};
pub use interaction::ActiveElement;
pub use meta::{DatasetMeta, ElementSlot, ParsedPoint, StackTable, UpdateMode};
pub use plugins::{LegendBox, LegendItem, Plugin, PluginContext, TitleBox, TooltipModel};

// The types hosts need from the engine crates, so typical integrations
// depend on this crate alone.
pub use graficar_core::{
    AnimationOptions, ArcElement, Canvas, ChartData, ChartError, ChartKind, Color, DataPatch,
    DataValue, Dataset, DrawCommand, Easing, HoverOptions, InteractionMode, LineElement, Padding,
    Point, PointElement, Rect, RecordingCanvas, RectElement,
};
pub use graficar_layout::Position;
pub use graficar_scale::{Scale, ScaleItem, ScaleKind, ScaleOptions, TickSource, TimeDistribution};
