//! Plugin hooks and the built-in legend, title and tooltip boxes.

use crate::interaction::ActiveElement;
use crate::meta::DatasetMeta;
use graficar_core::{
    Canvas, Color, Dataset, Padding, Point, Rect, Size, StrokeStyle, TextAlign, TextStyle,
};
use graficar_layout::{LayoutBox, Position};

/// Gap between a legend swatch and its label, and between items.
const LEGEND_GAP: f64 = 6.0;
/// Side of the square color swatch.
const SWATCH_SIZE: f64 = 10.0;
/// Padding inside the tooltip bubble.
const TOOLTIP_PADDING: f64 = 6.0;

// =============================================================================
// Plugin hooks
// =============================================================================

/// Chart state a hook may inspect.
#[derive(Debug, Clone, Copy)]
pub struct PluginContext<'a> {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
    /// Plot region from the last layout pass
    pub chart_area: Rect,
    /// Currently active (hovered) elements
    pub active: &'a [ActiveElement],
}

/// Lifecycle hooks around the chart pipeline.
///
/// Hooks dispatch in registration order. A `false` return from a
/// `before_*` hook cancels the remaining plugins and the phase itself;
/// cancellation is cooperative control flow, not an error.
#[allow(unused_variables)]
pub trait Plugin {
    /// Stable identifier, used in logs and duplicate checks.
    fn name(&self) -> &'static str;

    /// Before first-time chart setup.
    fn before_init(&mut self, ctx: &PluginContext<'_>) -> bool {
        true
    }
    /// After first-time chart setup.
    fn after_init(&mut self, ctx: &PluginContext<'_>) {}

    /// Before an update cycle.
    fn before_update(&mut self, ctx: &PluginContext<'_>) -> bool {
        true
    }
    /// After an update cycle.
    fn after_update(&mut self, ctx: &PluginContext<'_>) {}

    /// Before the layout pass of an update.
    fn before_layout(&mut self, ctx: &PluginContext<'_>) -> bool {
        true
    }
    /// After the layout pass.
    fn after_layout(&mut self, ctx: &PluginContext<'_>) {}

    /// Before per-dataset element updates.
    fn before_datasets_update(&mut self, ctx: &PluginContext<'_>) -> bool {
        true
    }
    /// After per-dataset element updates.
    fn after_datasets_update(&mut self, ctx: &PluginContext<'_>) {}

    /// Before a render begins.
    fn before_render(&mut self, ctx: &PluginContext<'_>) -> bool {
        true
    }
    /// After a render completes.
    fn after_render(&mut self, ctx: &PluginContext<'_>) {}

    /// Before anything is drawn this frame.
    fn before_draw(&mut self, ctx: &PluginContext<'_>, canvas: &mut dyn Canvas) -> bool {
        true
    }
    /// After the frame is drawn.
    fn after_draw(&mut self, ctx: &PluginContext<'_>, canvas: &mut dyn Canvas) {}

    /// Before the dataset layer is drawn.
    fn before_datasets_draw(&mut self, ctx: &PluginContext<'_>, canvas: &mut dyn Canvas) -> bool {
        true
    }
    /// After the dataset layer is drawn.
    fn after_datasets_draw(&mut self, ctx: &PluginContext<'_>, canvas: &mut dyn Canvas) {}

    /// Before a pointer event is resolved.
    fn before_event(&mut self, ctx: &PluginContext<'_>, position: Point) -> bool {
        true
    }
    /// After a pointer event was resolved.
    fn after_event(&mut self, ctx: &PluginContext<'_>, position: Point) {}
}

// =============================================================================
// Legend
// =============================================================================

/// One legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    /// Dataset label
    pub label: String,
    /// Swatch color
    pub color: Color,
    /// Dataset this entry toggles
    pub dataset_index: usize,
    /// Whether the dataset is currently hidden
    pub hidden: bool,
}

/// Horizontal legend strip across the top of the canvas.
#[derive(Debug, Default)]
pub struct LegendBox {
    items: Vec<LegendItem>,
    font_size: f64,
    size: Size,
    rect: Rect,
    /// Item hit regions, index-aligned with `items`; rebuilt on `place`
    hit_rects: Vec<Rect>,
}

impl LegendBox {
    /// Create an empty legend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            font_size: 12.0,
            ..Self::default()
        }
    }

    /// Rebuild entries from the datasets.
    pub fn sync(&mut self, datasets: &[Dataset], metas: &[DatasetMeta]) {
        self.items = datasets
            .iter()
            .enumerate()
            .map(|(i, dataset)| LegendItem {
                label: dataset.label.clone(),
                color: dataset
                    .background
                    .unwrap_or_else(|| graficar_core::palette_color(i)),
                dataset_index: i,
                hidden: metas.get(i).is_some_and(|meta| !meta.visible(dataset)),
            })
            .collect();
    }

    /// Legend entries.
    #[must_use]
    pub fn items(&self) -> &[LegendItem] {
        &self.items
    }

    /// Dataset index under a click, if any.
    #[must_use]
    pub fn handle_click(&self, x: f64, y: f64) -> Option<usize> {
        let point = Point::new(x, y);
        self.hit_rects
            .iter()
            .zip(&self.items)
            .find(|(rect, _)| rect.contains_point(&point))
            .map(|(_, item)| item.dataset_index)
    }

    fn style(&self) -> TextStyle {
        TextStyle {
            size: self.font_size,
            ..TextStyle::default()
        }
    }

    /// Item rects for the current placement, centered as a single row.
    fn layout_items(&self) -> Vec<Rect> {
        let style = self.style();
        let row_height = style.measure("M").height;
        let widths: Vec<f64> = self
            .items
            .iter()
            .map(|item| SWATCH_SIZE + LEGEND_GAP + style.measure(&item.label).width)
            .collect();
        let total = widths.iter().sum::<f64>()
            + LEGEND_GAP * (self.items.len().saturating_sub(1)) as f64;
        let mut x = self.rect.x + (self.rect.width - total).max(0.0) / 2.0;
        let y = self.rect.y + (self.rect.height - row_height) / 2.0;
        widths
            .iter()
            .map(|&width| {
                let rect = Rect::new(x, y, width, row_height);
                x += width + LEGEND_GAP;
                rect
            })
            .collect()
    }
}

impl LayoutBox for LegendBox {
    fn position(&self) -> Position {
        Position::Top
    }

    fn weight(&self) -> f64 {
        // Sits between the title (above) and the axes (below)
        50.0
    }

    fn update(&mut self, max_width: f64, _max_height: f64, _margins: &Padding) {
        let height = if self.items.is_empty() {
            0.0
        } else {
            2.0f64.mul_add(LEGEND_GAP, self.style().measure("M").height)
        };
        self.size = Size::new(max_width, height);
    }

    fn size(&self) -> Size {
        self.size
    }

    fn place(&mut self, area: Rect) {
        self.rect = area;
        self.hit_rects = self.layout_items();
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        let style = self.style();
        for (item, rect) in self.items.iter().zip(&self.hit_rects) {
            let swatch = Rect::new(
                rect.x,
                rect.y + (rect.height - SWATCH_SIZE) / 2.0,
                SWATCH_SIZE,
                SWATCH_SIZE,
            );
            canvas.rect(swatch, Some(item.color), None);
            let mut text_style = style.clone();
            if item.hidden {
                text_style.color = text_style.color.with_alpha(0.4);
            }
            canvas.text(
                &item.label,
                Point::new(rect.x + SWATCH_SIZE + LEGEND_GAP, rect.y),
                &text_style,
            );
            if item.hidden {
                // Strike-through for toggled-off datasets
                let mid = rect.y + rect.height / 2.0;
                canvas.line(
                    Point::new(rect.x + SWATCH_SIZE + LEGEND_GAP, mid),
                    Point::new(rect.right(), mid),
                    StrokeStyle {
                        color: text_style.color,
                        width: 1.0,
                        ..StrokeStyle::default()
                    },
                );
            }
        }
    }
}

// =============================================================================
// Title
// =============================================================================

/// Chart title box spanning the full canvas width.
#[derive(Debug, Default)]
pub struct TitleBox {
    text: String,
    font_size: f64,
    size: Size,
    rect: Rect,
}

impl TitleBox {
    /// Create a title. An empty string collapses to zero height.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 16.0,
            size: Size::ZERO,
            rect: Rect::default(),
        }
    }

    /// Title text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    fn style(&self, align: TextAlign) -> TextStyle {
        TextStyle {
            size: self.font_size,
            align,
            ..TextStyle::default()
        }
    }
}

impl LayoutBox for TitleBox {
    fn position(&self) -> Position {
        Position::Top
    }

    fn full_size(&self) -> bool {
        true
    }

    fn update(&mut self, max_width: f64, _max_height: f64, _margins: &Padding) {
        let height = if self.text.is_empty() {
            0.0
        } else {
            2.0f64.mul_add(
                LEGEND_GAP,
                self.style(TextAlign::Left).measure(&self.text).height,
            )
        };
        self.size = Size::new(max_width, height);
    }

    fn size(&self) -> Size {
        self.size
    }

    fn place(&mut self, area: Rect) {
        self.rect = area;
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.text.is_empty() {
            return;
        }
        let style = self.style(TextAlign::Center);
        let height = style.measure(&self.text).height;
        canvas.text(
            &self.text,
            Point::new(
                self.rect.x + self.rect.width / 2.0,
                self.rect.y + (self.rect.height - height) / 2.0,
            ),
            &style,
        );
    }
}

// =============================================================================
// Tooltip
// =============================================================================

/// Tooltip overlay model.
///
/// Takes no layout space; the chart feeds it the active elements and it
/// draws last, over everything else.
#[derive(Debug, Default)]
pub struct TooltipModel {
    lines: Vec<String>,
    anchor: Point,
    visible: bool,
}

impl TooltipModel {
    /// Create a hidden tooltip.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the tooltip at the active elements.
    ///
    /// The anchor is the average of the active element centers; the body
    /// lines are `label: value` per active element. An empty line set
    /// hides the tooltip.
    pub fn set_active(&mut self, anchor: Point, lines: Vec<String>) {
        self.visible = !lines.is_empty();
        self.anchor = anchor;
        self.lines = lines;
    }

    /// Hide the tooltip.
    pub fn clear(&mut self) {
        self.visible = false;
        self.lines.clear();
    }

    /// Whether the tooltip will draw.
    #[must_use]
    pub const fn visible(&self) -> bool {
        self.visible
    }

    /// Body lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Draw the bubble, clamped inside the canvas bounds.
    pub fn draw(&self, canvas: &mut dyn Canvas, width: f64, height: f64) {
        if !self.visible {
            return;
        }
        let style = TextStyle {
            size: 11.0,
            color: Color::WHITE,
            ..TextStyle::default()
        };
        let line_height = style.measure("M").height;
        let widest = self
            .lines
            .iter()
            .map(|line| style.measure(line).width)
            .fold(0.0, f64::max);
        let box_width = 2.0f64.mul_add(TOOLTIP_PADDING, widest);
        let box_height = (self.lines.len() as f64).mul_add(line_height, 2.0 * TOOLTIP_PADDING);

        let x = (self.anchor.x + LEGEND_GAP).min(width - box_width).max(0.0);
        let y = (self.anchor.y - box_height / 2.0)
            .min(height - box_height)
            .max(0.0);
        canvas.rect(
            Rect::new(x, y, box_width, box_height),
            Some(Color::BLACK.with_alpha(0.8)),
            None,
        );
        for (i, line) in self.lines.iter().enumerate() {
            canvas.text(
                line,
                Point::new(
                    x + TOOLTIP_PADDING,
                    (i as f64).mul_add(line_height, y + TOOLTIP_PADDING),
                ),
                &style,
            );
        }
    }
}
