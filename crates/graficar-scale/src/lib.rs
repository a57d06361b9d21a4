//! Axis scales for the Graficar charting engine.
//!
//! A scale maps data values to pixel positions and generates the ticks,
//! labels, and grid lines for one axis. Five scale types are provided:
//! - [`CategoryScale`]: discrete label indices
//! - [`LinearScale`]: continuous numeric with "nice" tick spacing
//! - [`LogarithmicScale`]: base-10 log with per-decade ticks
//! - [`RadialLinearScale`]: radial distance for radar and polar charts
//! - [`TimeScale`]: epoch-millisecond timestamps via a [`DateAdapter`]
//!
//! The set is closed: charts address scales through the [`ScaleItem`]
//! enum, which also participates in layout as a [`LayoutBox`].

mod category;
mod linear;
mod logarithmic;
mod radial;
mod ticks;
mod time;

pub use category::CategoryScale;
pub use linear::LinearScale;
pub use logarithmic::LogarithmicScale;
pub use radial::RadialLinearScale;
pub use ticks::{format_number, nice_num};
pub use time::{DateAdapter, EpochAdapter, TimeScale, TimeUnit};

use graficar_core::{Canvas, Color, Padding, Point, Rect, Size, StrokeStyle, TextAlign, TextStyle};
use graficar_layout::{LayoutBox, Position};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Gap between tick marks and their labels, in pixels.
const LABEL_GAP: f64 = 4.0;

// ==========================================================================
// Shared scale types
// ==========================================================================

/// Which axis a scale drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisKind {
    /// Horizontal axis
    X,
    /// Vertical axis
    Y,
    /// Radial axis (distance from center)
    R,
}

/// One generated tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Data-space value of the tick
    pub value: f64,
    /// Rendered label
    pub label: String,
    /// Major ticks survive auto-skip preferentially
    pub major: bool,
}

impl Tick {
    /// Create a minor tick.
    #[must_use]
    pub const fn new(value: f64, label: String) -> Self {
        Self {
            value,
            label,
            major: false,
        }
    }
}

/// The pixel interval a scale maps onto.
///
/// `start` corresponds to decimal 0 and `end` to decimal 1; for vertical
/// axes `start` is the bottom edge so larger values render higher.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRange {
    /// Pixel at decimal 0
    pub start: f64,
    /// Pixel at decimal 1
    pub end: f64,
    /// Flip the mapping direction
    pub reverse: bool,
}

impl PixelRange {
    /// Create a pixel range.
    #[must_use]
    pub const fn new(start: f64, end: f64, reverse: bool) -> Self {
        Self {
            start,
            end,
            reverse,
        }
    }

    /// Map a normalized decimal in `[0, 1]` to a pixel.
    #[must_use]
    pub fn pixel_for_decimal(&self, decimal: f64) -> f64 {
        let d = if self.reverse { 1.0 - decimal } else { decimal };
        (self.end - self.start).mul_add(d, self.start)
    }

    /// Map a pixel back to a normalized decimal.
    #[must_use]
    pub fn decimal_for_pixel(&self, pixel: f64) -> f64 {
        let span = self.end - self.start;
        if span == 0.0 {
            return 0.0;
        }
        let d = (pixel - self.start) / span;
        if self.reverse {
            1.0 - d
        } else {
            d
        }
    }
}

/// Aggregated data bounds a scale measures itself against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DataBounds {
    /// Smallest finite value seen (NaN if none)
    pub min: f64,
    /// Largest finite value seen (NaN if none)
    pub max: f64,
    /// Number of category slots (labels or data length)
    pub count: usize,
}

impl DataBounds {
    /// Bounds from a min/max pair.
    #[must_use]
    pub const fn from_range(min: f64, max: f64) -> Self {
        Self { min, max, count: 0 }
    }
}

/// Where a time scale takes its tick values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickSource {
    /// Generated from the calendar unit ladder
    #[default]
    Auto,
    /// One tick per data timestamp
    Data,
    /// One tick per parsed chart label
    Labels,
}

/// How a time scale spreads timestamps along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeDistribution {
    /// Positions proportional to elapsed time
    #[default]
    Linear,
    /// Each data point takes an equal share of the axis, however
    /// irregular the sampling
    Series,
}

/// Grid line appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridOptions {
    /// Draw grid lines across the chart area
    pub display: bool,
    /// Grid line color
    pub color: Color,
    /// Grid line width
    pub line_width: f64,
    /// Draw tick marks on the axis
    pub draw_ticks: bool,
    /// Tick mark length in pixels
    pub tick_length: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            display: true,
            color: Color::new(0.0, 0.0, 0.0, 0.1),
            line_width: 1.0,
            draw_ticks: true,
            tick_length: 8.0,
        }
    }
}

/// Configuration for one scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleOptions {
    /// Scale id referenced by datasets (e.g. "x", "y", "y2")
    pub id: String,
    /// Edge the axis is drawn on
    pub position: Position,
    /// Render the axis at all
    pub display: bool,
    /// Explicit lower bound (overrides data)
    pub min: Option<f64>,
    /// Explicit upper bound (overrides data)
    pub max: Option<f64>,
    /// Force the range to include zero
    pub begin_at_zero: bool,
    /// Explicit tick spacing (overrides the nice-number algorithm)
    pub step_size: Option<f64>,
    /// Upper bound on generated tick count
    pub max_ticks_limit: usize,
    /// Shift categories by half a band so bars center in their slot
    pub offset: bool,
    /// Flip the axis direction
    pub reverse: bool,
    /// Grid line appearance
    pub grid: GridOptions,
    /// Label font size
    pub font_size: f64,
    /// Layout ordering among boxes on the same edge
    pub weight: f64,
    /// Category labels (category and time scales)
    pub labels: Vec<String>,
    /// Tick placement source (time scales)
    pub time_source: TickSource,
    /// Timestamp distribution along the axis (time scales)
    pub time_distribution: TimeDistribution,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            id: "y".to_string(),
            position: Position::Left,
            display: true,
            min: None,
            max: None,
            begin_at_zero: false,
            step_size: None,
            max_ticks_limit: 11,
            offset: false,
            reverse: false,
            grid: GridOptions::default(),
            font_size: 12.0,
            weight: 0.0,
            labels: Vec::new(),
            time_source: TickSource::default(),
            time_distribution: TimeDistribution::default(),
        }
    }
}

impl ScaleOptions {
    /// Options with an id and edge position.
    #[must_use]
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            ..Self::default()
        }
    }

    /// Set an explicit bound pair.
    #[must_use]
    pub const fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Force the range to include zero.
    #[must_use]
    pub const fn begin_at_zero(mut self, value: bool) -> Self {
        self.begin_at_zero = value;
        self
    }

    /// Shift categories by half a band.
    #[must_use]
    pub const fn offset(mut self, value: bool) -> Self {
        self.offset = value;
        self
    }

    /// Flip the axis direction.
    #[must_use]
    pub const fn reverse(mut self, value: bool) -> Self {
        self.reverse = value;
        self
    }

    /// Set the category labels.
    #[must_use]
    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Set the time tick source.
    #[must_use]
    pub const fn time_source(mut self, source: TickSource) -> Self {
        self.time_source = source;
        self
    }

    /// Set the timestamp distribution.
    #[must_use]
    pub const fn time_distribution(mut self, distribution: TimeDistribution) -> Self {
        self.time_distribution = distribution;
        self
    }
}

// ==========================================================================
// Label cache
// ==========================================================================

/// Memoizes formatted tick labels keyed by value bits.
///
/// Rebuilt labels dominate tick generation cost on animated charts;
/// the cache shrinks itself whenever it grows past twice the live tick
/// count so it cannot leak across range changes.
#[derive(Debug, Clone, Default)]
pub struct LabelCache {
    entries: HashMap<u64, String>,
}

impl LabelCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a label, formatting it on a miss.
    pub fn get_or_insert_with(&mut self, value: f64, make: impl FnOnce() -> String) -> &str {
        self.entries.entry(value.to_bits()).or_insert_with(make)
    }

    /// Drop entries not present in `live` once the cache has grown past
    /// twice the live set.
    pub fn shrink_to_live(&mut self, live: &[f64]) {
        if self.entries.len() <= live.len().saturating_mul(2) {
            return;
        }
        let keep: HashSet<u64> = live.iter().map(|v| v.to_bits()).collect();
        self.entries.retain(|k, _| keep.contains(k));
    }

    /// Number of cached labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================================================
// Scale trait
// ==========================================================================

/// State shared by every scale type.
#[derive(Debug, Clone)]
pub struct ScaleState {
    /// Configuration
    pub options: ScaleOptions,
    /// Resolved lower bound
    pub min: f64,
    /// Resolved upper bound
    pub max: f64,
    /// Generated ticks
    pub ticks: Vec<Tick>,
    /// Pixel interval set at layout time
    pub range: PixelRange,
    pub(crate) label_cache: LabelCache,
    pub(crate) size: Size,
    pub(crate) rect: Rect,
}

impl ScaleState {
    pub(crate) fn new(options: ScaleOptions) -> Self {
        let min = options.min.unwrap_or(0.0);
        let max = options.max.unwrap_or(1.0);
        Self {
            options,
            min,
            max,
            ticks: Vec::new(),
            range: PixelRange::default(),
            label_cache: LabelCache::new(),
            size: Size::ZERO,
            rect: Rect::default(),
        }
    }

    /// The rect assigned by layout.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }
}

/// Behavior common to every scale type.
pub trait Scale {
    /// Shared state.
    fn state(&self) -> &ScaleState;
    /// Shared state, mutably.
    fn state_mut(&mut self) -> &mut ScaleState;
    /// Which axis this scale drives.
    fn axis(&self) -> AxisKind;
    /// Resolve min/max from data bounds and option overrides.
    fn set_data_bounds(&mut self, bounds: &DataBounds);
    /// Generate ticks for the resolved range.
    fn build_ticks(&mut self);
    /// Map a data value to a pixel.
    fn pixel_for_value(&self, value: f64) -> f64;
    /// Map a pixel back to a data value.
    fn value_for_pixel(&self, pixel: f64) -> f64;
    /// Format a value the way this scale labels ticks.
    fn label_for_value(&self, value: f64) -> String;

    /// Scale configuration.
    fn options(&self) -> &ScaleOptions {
        &self.state().options
    }

    /// Scale id.
    fn id(&self) -> &str {
        &self.state().options.id
    }

    /// Resolved lower bound.
    fn min(&self) -> f64 {
        self.state().min
    }

    /// Resolved upper bound.
    fn max(&self) -> f64 {
        self.state().max
    }

    /// Generated ticks.
    fn ticks(&self) -> &[Tick] {
        &self.state().ticks
    }

    /// Assign the pixel interval.
    fn set_pixel_range(&mut self, range: PixelRange) {
        self.state_mut().range = range;
    }

    /// The value bars and fills grow from: zero when it is in range,
    /// else the bound nearest zero.
    fn base_value(&self) -> f64 {
        let (min, max) = (self.min(), self.max());
        if min <= 0.0 && max >= 0.0 {
            0.0
        } else if max < 0.0 {
            max
        } else {
            min
        }
    }

    /// Pixel of the base value.
    fn base_pixel(&self) -> f64 {
        self.pixel_for_value(self.base_value())
    }
}

// ==========================================================================
// Closed scale registry
// ==========================================================================

/// Scale type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    /// Discrete label indices
    Category,
    /// Continuous numeric
    Linear,
    /// Base-10 logarithmic
    Logarithmic,
    /// Radial distance from center
    RadialLinear,
    /// Epoch-millisecond timestamps
    Time,
}

/// The closed set of scale implementations.
#[derive(Debug)]
pub enum ScaleItem {
    /// Discrete label indices
    Category(CategoryScale),
    /// Continuous numeric
    Linear(LinearScale),
    /// Base-10 logarithmic
    Logarithmic(LogarithmicScale),
    /// Radial distance from center
    RadialLinear(RadialLinearScale),
    /// Epoch-millisecond timestamps
    Time(TimeScale),
}

impl ScaleItem {
    /// Construct a scale of the given kind.
    #[must_use]
    pub fn new(kind: ScaleKind, options: ScaleOptions) -> Self {
        match kind {
            ScaleKind::Category => Self::Category(CategoryScale::new(options)),
            ScaleKind::Linear => Self::Linear(LinearScale::new(options)),
            ScaleKind::Logarithmic => Self::Logarithmic(LogarithmicScale::new(options)),
            ScaleKind::RadialLinear => Self::RadialLinear(RadialLinearScale::new(options)),
            ScaleKind::Time => Self::Time(TimeScale::new(options)),
        }
    }

    /// Which kind this scale is.
    #[must_use]
    pub const fn kind(&self) -> ScaleKind {
        match self {
            Self::Category(_) => ScaleKind::Category,
            Self::Linear(_) => ScaleKind::Linear,
            Self::Logarithmic(_) => ScaleKind::Logarithmic,
            Self::RadialLinear(_) => ScaleKind::RadialLinear,
            Self::Time(_) => ScaleKind::Time,
        }
    }

    fn inner(&self) -> &dyn Scale {
        match self {
            Self::Category(s) => s,
            Self::Linear(s) => s,
            Self::Logarithmic(s) => s,
            Self::RadialLinear(s) => s,
            Self::Time(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Scale {
        match self {
            Self::Category(s) => s,
            Self::Linear(s) => s,
            Self::Logarithmic(s) => s,
            Self::RadialLinear(s) => s,
            Self::Time(s) => s,
        }
    }

    /// The radial scale, when this is one.
    #[must_use]
    pub const fn as_radial(&self) -> Option<&RadialLinearScale> {
        match self {
            Self::RadialLinear(s) => Some(s),
            _ => None,
        }
    }

    /// The time scale, when this is one.
    #[must_use]
    pub const fn as_time(&self) -> Option<&TimeScale> {
        match self {
            Self::Time(s) => Some(s),
            _ => None,
        }
    }

    /// The time scale mutably, when this is one.
    pub fn as_time_mut(&mut self) -> Option<&mut TimeScale> {
        match self {
            Self::Time(s) => Some(s),
            _ => None,
        }
    }

    /// Draw this scale's grid lines across the chart area.
    pub fn draw_grid(&self, canvas: &mut dyn Canvas, chart_area: &Rect) {
        let opts = self.options();
        if !opts.display || !opts.grid.display {
            return;
        }
        if let Self::RadialLinear(radial) = self {
            radial.draw_rings(canvas);
            return;
        }
        let stroke = StrokeStyle {
            color: opts.grid.color,
            width: opts.grid.line_width,
            ..StrokeStyle::default()
        };
        let horizontal = opts.position.is_horizontal();
        for tick in self.ticks() {
            let pixel = self.pixel_for_value(tick.value);
            if !pixel.is_finite() {
                continue;
            }
            let (from, to) = if horizontal {
                (
                    Point::new(pixel, chart_area.y),
                    Point::new(pixel, chart_area.bottom()),
                )
            } else {
                (
                    Point::new(chart_area.x, pixel),
                    Point::new(chart_area.right(), pixel),
                )
            };
            canvas.line(from, to, stroke.clone());
        }
    }

    fn label_style(&self, align: TextAlign) -> TextStyle {
        TextStyle {
            size: self.options().font_size,
            align,
            ..TextStyle::default()
        }
    }
}

impl Scale for ScaleItem {
    fn state(&self) -> &ScaleState {
        self.inner().state()
    }

    fn state_mut(&mut self) -> &mut ScaleState {
        self.inner_mut().state_mut()
    }

    fn axis(&self) -> AxisKind {
        self.inner().axis()
    }

    fn set_data_bounds(&mut self, bounds: &DataBounds) {
        self.inner_mut().set_data_bounds(bounds);
    }

    fn build_ticks(&mut self) {
        self.inner_mut().build_ticks();
    }

    fn pixel_for_value(&self, value: f64) -> f64 {
        self.inner().pixel_for_value(value)
    }

    fn value_for_pixel(&self, pixel: f64) -> f64 {
        self.inner().value_for_pixel(pixel)
    }

    fn label_for_value(&self, value: f64) -> String {
        self.inner().label_for_value(value)
    }
}

// ==========================================================================
// Layout participation
// ==========================================================================

impl LayoutBox for ScaleItem {
    fn position(&self) -> Position {
        if matches!(self, Self::RadialLinear(_)) {
            // Radial scales live inside the chart area and claim no edge.
            Position::ChartArea
        } else {
            self.options().position
        }
    }

    fn weight(&self) -> f64 {
        self.options().weight
    }

    fn update(&mut self, max_width: f64, max_height: f64, _margins: &Padding) {
        let size = if !self.options().display || matches!(self, Self::RadialLinear(_)) {
            Size::ZERO
        } else {
            let opts = self.options();
            let style = TextStyle {
                size: opts.font_size,
                ..TextStyle::default()
            };
            let tick_len = if opts.grid.draw_ticks {
                opts.grid.tick_length
            } else {
                0.0
            };
            if opts.position.is_horizontal() {
                let label_height = style.measure("0").height;
                Size::new(max_width, tick_len + LABEL_GAP + label_height)
            } else {
                let widest = self
                    .ticks()
                    .iter()
                    .map(|t| style.measure(&t.label).width)
                    .fold(0.0, f64::max);
                Size::new(tick_len + LABEL_GAP + widest, max_height)
            }
        };
        self.state_mut().size = size;
    }

    fn size(&self) -> Size {
        self.state().size
    }

    fn margins(&self) -> Padding {
        let opts = self.options();
        if !opts.display || matches!(self, Self::RadialLinear(_)) {
            return Padding::ZERO;
        }
        let style = TextStyle {
            size: opts.font_size,
            ..TextStyle::default()
        };
        let ticks = self.ticks();
        if opts.position.is_horizontal() {
            // Endpoint labels overhang the chart area horizontally.
            let first = ticks
                .first()
                .map_or(0.0, |t| style.measure(&t.label).width / 2.0);
            let last = ticks
                .last()
                .map_or(0.0, |t| style.measure(&t.label).width / 2.0);
            Padding::new(first, 0.0, last, 0.0)
        } else {
            let half = style.measure("0").height / 2.0;
            Padding::new(0.0, half, 0.0, half)
        }
    }

    fn place(&mut self, area: Rect) {
        if let Self::RadialLinear(radial) = self {
            radial.fit(&area);
            radial.state_mut().rect = area;
            return;
        }
        let opts = self.options();
        let reverse = opts.reverse;
        let range = if opts.position.is_horizontal() {
            PixelRange::new(area.x, area.right(), reverse)
        } else {
            // Bottom of the box maps to decimal 0 so values grow upward.
            PixelRange::new(area.bottom(), area.y, reverse)
        };
        let state = self.state_mut();
        state.rect = area;
        state.range = range;
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let opts = self.options();
        if !opts.display {
            return;
        }
        if let Self::RadialLinear(radial) = self {
            radial.draw_axis(canvas);
            return;
        }
        let rect = self.state().rect;
        let tick_len = if opts.grid.draw_ticks {
            opts.grid.tick_length
        } else {
            0.0
        };
        let stroke = StrokeStyle {
            color: opts.grid.color.with_alpha(1.0),
            width: opts.grid.line_width,
            ..StrokeStyle::default()
        };
        match opts.position {
            Position::Bottom => {
                canvas.line(
                    Point::new(rect.x, rect.y),
                    Point::new(rect.right(), rect.y),
                    stroke.clone(),
                );
                for tick in self.ticks() {
                    let x = self.pixel_for_value(tick.value);
                    if !x.is_finite() {
                        continue;
                    }
                    canvas.line(
                        Point::new(x, rect.y),
                        Point::new(x, rect.y + tick_len),
                        stroke.clone(),
                    );
                    canvas.text(
                        &tick.label,
                        Point::new(x, rect.y + tick_len + LABEL_GAP),
                        &self.label_style(TextAlign::Center),
                    );
                }
            }
            Position::Top => {
                canvas.line(
                    Point::new(rect.x, rect.bottom()),
                    Point::new(rect.right(), rect.bottom()),
                    stroke.clone(),
                );
                for tick in self.ticks() {
                    let x = self.pixel_for_value(tick.value);
                    if !x.is_finite() {
                        continue;
                    }
                    canvas.line(
                        Point::new(x, rect.bottom() - tick_len),
                        Point::new(x, rect.bottom()),
                        stroke.clone(),
                    );
                    let style = self.label_style(TextAlign::Center);
                    let h = style.measure(&tick.label).height;
                    canvas.text(
                        &tick.label,
                        Point::new(x, rect.bottom() - tick_len - LABEL_GAP - h),
                        &style,
                    );
                }
            }
            Position::Left => {
                canvas.line(
                    Point::new(rect.right(), rect.y),
                    Point::new(rect.right(), rect.bottom()),
                    stroke.clone(),
                );
                for tick in self.ticks() {
                    let y = self.pixel_for_value(tick.value);
                    if !y.is_finite() {
                        continue;
                    }
                    canvas.line(
                        Point::new(rect.right() - tick_len, y),
                        Point::new(rect.right(), y),
                        stroke.clone(),
                    );
                    canvas.text(
                        &tick.label,
                        Point::new(rect.right() - tick_len - LABEL_GAP, y),
                        &self.label_style(TextAlign::Right),
                    );
                }
            }
            Position::Right => {
                canvas.line(
                    Point::new(rect.x, rect.y),
                    Point::new(rect.x, rect.bottom()),
                    stroke.clone(),
                );
                for tick in self.ticks() {
                    let y = self.pixel_for_value(tick.value);
                    if !y.is_finite() {
                        continue;
                    }
                    canvas.line(
                        Point::new(rect.x, y),
                        Point::new(rect.x + tick_len, y),
                        stroke.clone(),
                    );
                    canvas.text(
                        &tick.label,
                        Point::new(rect.x + tick_len + LABEL_GAP, y),
                        &self.label_style(TextAlign::Left),
                    );
                }
            }
            Position::ChartArea => {}
        }
    }
}
