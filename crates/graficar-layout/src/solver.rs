//! The box-fitting algorithm.

use graficar_core::{Canvas, Padding, Rect, Size};
use serde::{Deserialize, Serialize};

/// Where a box sits relative to the chart area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Position {
    /// Left edge (vertical box, consumes width)
    Left,
    /// Top edge (horizontal box, consumes height)
    Top,
    /// Right edge
    Right,
    /// Bottom edge
    #[default]
    Bottom,
    /// Inside the chart area (consumes no edge space)
    ChartArea,
}

impl Position {
    /// Horizontal boxes consume height; vertical boxes consume width.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// A participant in the box-fitting pass.
///
/// `update` must be side-effect-idempotent: the solver may call it again
/// with the same inputs during the refit retry and expects the same size.
pub trait LayoutBox {
    /// Edge this box claims.
    fn position(&self) -> Position;

    /// Sort weight within its edge bucket (ties break by insertion order).
    fn weight(&self) -> f64 {
        0.0
    }

    /// Span the full canvas extent instead of the chart area extent.
    fn full_size(&self) -> bool {
        false
    }

    /// Measure against a tentative allocation.
    fn update(&mut self, max_width: f64, max_height: f64, margins: &Padding);

    /// Measured size after the last `update`.
    fn size(&self) -> Size;

    /// Overhang envelope this box needs beyond its own rect (e.g. half of
    /// an outermost tick label).
    fn margins(&self) -> Padding {
        Padding::ZERO
    }

    /// Receive the final placement.
    fn place(&mut self, area: Rect);

    /// Draw into a canvas after placement.
    fn draw(&self, canvas: &mut dyn Canvas);
}

/// The solved layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    /// The region left for dataset geometry
    pub chart_area: Rect,
}

struct Wrap {
    index: usize,
    position: Position,
    weight: f64,
}

fn ordered_indices(wraps: &[Wrap], position: Position, reversed: bool) -> Vec<usize> {
    let mut bucket: Vec<&Wrap> = wraps.iter().filter(|w| w.position == position).collect();
    bucket.sort_by(|a, b| {
        let ord = a
            .weight
            .partial_cmp(&b.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.index.cmp(&b.index));
        if reversed {
            ord.reverse()
        } else {
            ord
        }
    });
    bucket.iter().map(|w| w.index).collect()
}

/// Partition `width × height` among the boxes and return the chart area.
///
/// One measuring pass runs in dependency order — vertical boxes first
/// (they consume width the horizontal boxes must not use), then horizontal
/// boxes — accumulating consumed space and the max-padding envelope. If
/// re-measuring any non-full-size box against the final chart dimensions
/// changes its size, a single refit pass re-runs the accumulation and its
/// result is accepted as-is. The single-retry cap is the algorithm's only
/// convergence bound, by contract; an oscillating box gets the second
/// pass's answer.
pub fn solve(
    boxes: &mut [&mut dyn LayoutBox],
    width: f64,
    height: f64,
    padding: &Padding,
) -> ChartLayout {
    let wraps: Vec<Wrap> = boxes
        .iter()
        .enumerate()
        .map(|(index, b)| Wrap {
            index,
            position: b.position(),
            weight: b.weight(),
        })
        .collect();

    let left = ordered_indices(&wraps, Position::Left, false);
    let right = ordered_indices(&wraps, Position::Right, true);
    let top = ordered_indices(&wraps, Position::Top, false);
    let bottom = ordered_indices(&wraps, Position::Bottom, true);

    let verticals: Vec<usize> = left.iter().chain(right.iter()).copied().collect();
    let horizontals: Vec<usize> = top.iter().chain(bottom.iter()).copied().collect();

    // One accumulation pass. Vertical boxes measure against
    // `vertical_height` (the full budget on the first pass, the first
    // pass's outcome on the retry).
    let run_pass = |boxes: &mut [&mut dyn LayoutBox],
                    margins: &Padding,
                    vertical_height: f64|
     -> (Vec<Size>, f64, f64) {
        let mut chart_w = (width - padding.horizontal()).max(0.0);
        let mut chart_h = (height - padding.vertical()).max(0.0);
        let mut sizes = vec![Size::ZERO; boxes.len()];
        for &i in &verticals {
            boxes[i].update(chart_w, vertical_height, margins);
            let size = boxes[i].size();
            sizes[i] = size;
            chart_w = (chart_w - size.width).max(0.0);
        }
        for &i in &horizontals {
            boxes[i].update(chart_w, chart_h, margins);
            let size = boxes[i].size();
            sizes[i] = size;
            chart_h = (chart_h - size.height).max(0.0);
        }
        (sizes, chart_w, chart_h)
    };

    let full_height = (height - padding.vertical()).max(0.0);
    let (first_sizes, mut chart_w, mut chart_h) = run_pass(boxes, &Padding::ZERO, full_height);

    // Max-padding envelope from the measured boxes.
    let mut max_padding = Padding::ZERO;
    for b in boxes.iter() {
        max_padding = max_padding.max(&b.margins());
    }

    // Refit check: re-measure non-full boxes against the final chart
    // dimensions; any size change triggers exactly one more pass.
    let mut refit = false;
    for &i in verticals.iter().chain(horizontals.iter()) {
        if boxes[i].full_size() {
            continue;
        }
        boxes[i].update(chart_w, chart_h, &max_padding);
        if boxes[i].size() != first_sizes[i] {
            refit = true;
        }
    }
    if refit {
        let (_, w, h) = run_pass(boxes, &max_padding, chart_h);
        chart_w = w;
        chart_h = h;
    } else {
        // Restore the first pass's measurements (the refit probe may have
        // remeasured against different dimensions).
        let (_, w, h) = run_pass(boxes, &Padding::ZERO, full_height);
        chart_w = w;
        chart_h = h;
    }

    let sum_heights = |ids: &[usize], boxes: &[&mut dyn LayoutBox]| -> f64 {
        ids.iter().map(|&i| boxes[i].size().height).sum()
    };
    let sum_widths = |ids: &[usize], boxes: &[&mut dyn LayoutBox]| -> f64 {
        ids.iter().map(|&i| boxes[i].size().width).sum()
    };
    let top_used = sum_heights(&top, boxes);
    let left_used = sum_widths(&left, boxes);

    let area_left = padding.left + left_used.max(max_padding.left);
    let area_top = padding.top + top_used.max(max_padding.top);
    let chart_area = Rect::new(area_left, area_top, chart_w, chart_h);

    place_boxes(
        boxes,
        &top,
        &bottom,
        &left,
        &right,
        width,
        height,
        padding,
        &chart_area,
    );

    ChartLayout { chart_area }
}

#[allow(clippy::too_many_arguments)]
fn place_boxes(
    boxes: &mut [&mut dyn LayoutBox],
    top: &[usize],
    bottom: &[usize],
    left: &[usize],
    right: &[usize],
    width: f64,
    height: f64,
    padding: &Padding,
    chart_area: &Rect,
) {
    // Horizontal boxes: walk cursors inward from the outer edges.
    let mut cursor = padding.top;
    for &i in top {
        let h = boxes[i].size().height;
        let (x, w) = horizontal_extent(boxes[i].full_size(), width, padding, chart_area);
        boxes[i].place(Rect::new(x, cursor, w, h));
        cursor += h;
    }
    let mut cursor = height - padding.bottom;
    for &i in bottom {
        let h = boxes[i].size().height;
        cursor -= h;
        let (x, w) = horizontal_extent(boxes[i].full_size(), width, padding, chart_area);
        boxes[i].place(Rect::new(x, cursor, w, h));
    }

    // Vertical boxes span the chart area's height.
    let mut cursor = padding.left;
    for &i in left {
        let w = boxes[i].size().width;
        boxes[i].place(Rect::new(cursor, chart_area.y, w, chart_area.height));
        cursor += w;
    }
    let mut cursor = width - padding.right;
    for &i in right {
        let w = boxes[i].size().width;
        cursor -= w;
        boxes[i].place(Rect::new(cursor, chart_area.y, w, chart_area.height));
    }
}

fn horizontal_extent(
    full_size: bool,
    width: f64,
    padding: &Padding,
    chart_area: &Rect,
) -> (f64, f64) {
    if full_size {
        (padding.left, (width - padding.horizontal()).max(0.0))
    } else {
        (chart_area.x, chart_area.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A box with a fixed footprint.
    struct Fixed {
        position: Position,
        weight: f64,
        size: Size,
        placed: Option<Rect>,
        full: bool,
    }

    impl Fixed {
        fn new(position: Position, w: f64, h: f64) -> Self {
            Self {
                position,
                weight: 0.0,
                size: Size::new(w, h),
                placed: None,
                full: false,
            }
        }
    }

    impl LayoutBox for Fixed {
        fn position(&self) -> Position {
            self.position
        }
        fn weight(&self) -> f64 {
            self.weight
        }
        fn full_size(&self) -> bool {
            self.full
        }
        fn update(&mut self, _max_width: f64, _max_height: f64, _margins: &Padding) {}
        fn size(&self) -> Size {
            self.size
        }
        fn place(&mut self, area: Rect) {
            self.placed = Some(area);
        }
        fn draw(&self, _canvas: &mut dyn Canvas) {}
    }

    /// A left box whose width depends on the height it is offered,
    /// exercising the refit retry.
    struct HeightSensitive {
        width_tall: f64,
        width_short: f64,
        threshold: f64,
        size: Size,
    }

    impl LayoutBox for HeightSensitive {
        fn position(&self) -> Position {
            Position::Left
        }
        fn update(&mut self, _max_width: f64, max_height: f64, _margins: &Padding) {
            let w = if max_height >= self.threshold {
                self.width_tall
            } else {
                self.width_short
            };
            self.size = Size::new(w, max_height);
        }
        fn size(&self) -> Size {
            self.size
        }
        fn place(&mut self, _area: Rect) {}
        fn draw(&self, _canvas: &mut dyn Canvas) {}
    }

    #[test]
    fn test_single_bottom_box_consumes_height() {
        let mut axis = Fixed::new(Position::Bottom, 0.0, 30.0);
        let mut boxes: Vec<&mut dyn LayoutBox> = vec![&mut axis];
        let layout = solve(&mut boxes, 400.0, 300.0, &Padding::ZERO);
        assert_eq!(layout.chart_area, Rect::new(0.0, 0.0, 400.0, 270.0));
        assert_eq!(axis.placed, Some(Rect::new(0.0, 270.0, 400.0, 30.0)));
    }

    #[test]
    fn test_two_edges() {
        let mut y_axis = Fixed::new(Position::Left, 40.0, 0.0);
        let mut x_axis = Fixed::new(Position::Bottom, 0.0, 30.0);
        let mut boxes: Vec<&mut dyn LayoutBox> = vec![&mut y_axis, &mut x_axis];
        let layout = solve(&mut boxes, 400.0, 300.0, &Padding::ZERO);
        assert_eq!(layout.chart_area, Rect::new(40.0, 0.0, 360.0, 270.0));
        // Vertical boxes span the chart area height
        assert_eq!(y_axis.placed, Some(Rect::new(0.0, 0.0, 40.0, 270.0)));
    }

    #[test]
    fn test_weight_orders_same_edge() {
        let mut outer = Fixed::new(Position::Left, 20.0, 0.0);
        outer.weight = 0.0;
        let mut inner = Fixed::new(Position::Left, 30.0, 0.0);
        inner.weight = 1.0;
        let mut boxes: Vec<&mut dyn LayoutBox> = vec![&mut inner, &mut outer];
        let _ = solve(&mut boxes, 400.0, 300.0, &Padding::ZERO);
        // Lower weight sits closer to the outer edge
        assert_eq!(outer.placed.unwrap().x, 0.0);
        assert_eq!(inner.placed.unwrap().x, 20.0);
    }

    #[test]
    fn test_full_size_box_spans_canvas() {
        let mut title = Fixed::new(Position::Top, 0.0, 20.0);
        title.full = true;
        let mut y_axis = Fixed::new(Position::Left, 40.0, 0.0);
        let mut boxes: Vec<&mut dyn LayoutBox> = vec![&mut title, &mut y_axis];
        let _ = solve(&mut boxes, 400.0, 300.0, &Padding::ZERO);
        let placed = title.placed.unwrap();
        assert_eq!(placed.x, 0.0);
        assert_eq!(placed.width, 400.0);
    }

    #[test]
    fn test_outer_padding_respected() {
        let mut axis = Fixed::new(Position::Bottom, 0.0, 30.0);
        let mut boxes: Vec<&mut dyn LayoutBox> = vec![&mut axis];
        let layout = solve(&mut boxes, 400.0, 300.0, &Padding::uniform(10.0));
        assert_eq!(layout.chart_area, Rect::new(10.0, 10.0, 380.0, 250.0));
        assert_eq!(axis.placed.unwrap().y, 260.0);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut y_axis = Fixed::new(Position::Left, 40.0, 0.0);
        let mut x_axis = Fixed::new(Position::Bottom, 0.0, 30.0);
        let mut legend = Fixed::new(Position::Top, 0.0, 25.0);
        let first = {
            let mut boxes: Vec<&mut dyn LayoutBox> = vec![&mut y_axis, &mut x_axis, &mut legend];
            solve(&mut boxes, 400.0, 300.0, &Padding::ZERO)
        };
        let second = {
            let mut boxes: Vec<&mut dyn LayoutBox> = vec![&mut y_axis, &mut x_axis, &mut legend];
            solve(&mut boxes, 400.0, 300.0, &Padding::ZERO)
        };
        assert_eq!(first.chart_area, second.chart_area);
    }

    #[test]
    fn test_refit_accepts_second_pass() {
        // Tall budget (300) measures 60 wide; after the bottom box consumes
        // height the retry sees 270 and settles at 40 wide.
        let mut y_axis = HeightSensitive {
            width_tall: 60.0,
            width_short: 40.0,
            threshold: 280.0,
            size: Size::ZERO,
        };
        let mut x_axis = Fixed::new(Position::Bottom, 0.0, 30.0);
        let mut boxes: Vec<&mut dyn LayoutBox> = vec![&mut y_axis, &mut x_axis];
        let layout = solve(&mut boxes, 400.0, 300.0, &Padding::ZERO);
        assert_eq!(layout.chart_area, Rect::new(40.0, 0.0, 360.0, 270.0));
    }

    proptest::proptest! {
        #[test]
        fn prop_chart_area_within_canvas(
            w in 50.0f64..2000.0,
            h in 50.0f64..2000.0,
            axis_w in 0.0f64..40.0,
            axis_h in 0.0f64..40.0
        ) {
            let mut y_axis = Fixed::new(Position::Left, axis_w, 0.0);
            let mut x_axis = Fixed::new(Position::Bottom, 0.0, axis_h);
            let mut boxes: Vec<&mut dyn LayoutBox> = vec![&mut y_axis, &mut x_axis];
            let layout = solve(&mut boxes, w, h, &Padding::ZERO);
            let area = layout.chart_area;
            proptest::prop_assert!(area.x >= 0.0 && area.y >= 0.0);
            proptest::prop_assert!(area.right() <= w + 1e-9);
            proptest::prop_assert!(area.bottom() <= h + 1e-9);
        }
    }
}
