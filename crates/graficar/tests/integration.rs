//! End-to-end engine tests: configuration, animated updates, layout,
//! interaction and frame serialization.

use graficar::{
    ActiveElement, Chart, ChartConfig, ChartData, ChartKind, DataPatch, DataValue, Dataset,
    ElementSlot, InteractionMode, Position, RecordingCanvas, Scale, ScaleConfig, ScaleKind,
    ScaleOptions, UpdateMode,
};

fn line_chart(values: &[f64]) -> Chart {
    let mut data = ChartData::new();
    data.labels = (0..values.len()).map(|i| format!("c{i}")).collect();
    data.datasets
        .push(Dataset::new("series").values(values.iter().copied()));
    Chart::new(ChartConfig::new(ChartKind::Line, data), 400.0, 300.0).expect("chart")
}

fn point_y(chart: &Chart, dataset: usize, index: usize) -> f64 {
    match &chart.meta(dataset).expect("meta").elements[index] {
        ElementSlot::Point(p) => p.y,
        other => panic!("expected point, got {other:?}"),
    }
}

// ============================================================================
// Lifecycle: construct, animate in, settle
// ============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn test_elements_animate_in_from_baseline() {
        let mut chart = line_chart(&[2.0, 8.0]);
        let base = chart.scales()[1].base_pixel();
        assert_eq!(point_y(&chart, 0, 1), base);

        chart.update(UpdateMode::Default);
        assert!(chart.wants_tick());
        chart.tick(200.0);
        let midway = point_y(&chart, 0, 1);
        assert!(midway < base);
        chart.tick(400.0);
        assert!(!chart.wants_tick());

        let expected = chart.scales()[1].pixel_for_value(8.0);
        assert!((point_y(&chart, 0, 1) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_animated_and_snapped_updates_agree_on_final_geometry() {
        let mut animated = line_chart(&[1.0, 5.0, 3.0]);
        animated.update(UpdateMode::Default);
        animated.tick(400.0);

        let mut snapped = line_chart(&[1.0, 5.0, 3.0]);
        snapped.update(UpdateMode::None);

        for i in 0..3 {
            assert!((point_y(&animated, 0, i) - point_y(&snapped, 0, i)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_retarget_mid_flight_starts_from_current_value() {
        let mut chart = line_chart(&[0.0, 10.0]);
        chart.update(UpdateMode::Default);
        chart.tick(200.0);
        let midway = point_y(&chart, 0, 1);

        // Interrupt: a second update keeps the on-screen value as the
        // tween start, so nothing jumps.
        chart.update(UpdateMode::Default);
        assert_eq!(point_y(&chart, 0, 1), midway);
    }

    #[test]
    fn test_render_emits_grid_axes_and_elements() {
        let mut chart = line_chart(&[1.0, 2.0, 3.0]);
        chart.update(UpdateMode::None);
        let mut canvas = RecordingCanvas::new();
        chart.render(&mut canvas);
        // Grid lines, two axes with labels, three points, legend
        assert!(canvas.command_count() > 10);
    }

    #[test]
    fn test_layout_reserves_axis_and_legend_space() {
        let mut chart = line_chart(&[1.0, 2.0]);
        chart.update(UpdateMode::None);
        let area = chart.chart_area();
        assert!(area.x > 0.0);
        assert!(area.y > 0.0);
        assert!(area.bottom() < 300.0);
    }

    #[test]
    fn test_resize_scales_geometry() {
        let mut chart = line_chart(&[1.0, 2.0]);
        chart.update(UpdateMode::None);
        let narrow = chart.chart_area().width;
        chart.resize(false, 800.0, 300.0);
        assert!(chart.chart_area().width > narrow);
        assert!(!chart.wants_tick()); // resize never animates
    }
}

// ============================================================================
// Stacked bars
// ============================================================================

mod stacking {
    use super::*;

    fn stacked_bar_chart() -> Chart {
        let mut data = ChartData::new();
        data.labels = vec!["a".into(), "b".into()];
        data.datasets
            .push(Dataset::new("lower").values([3.0, 1.0]).stack("s"));
        data.datasets
            .push(Dataset::new("upper").values([2.0, 4.0]).stack("s"));
        Chart::new(ChartConfig::new(ChartKind::Bar, data), 400.0, 300.0).expect("chart")
    }

    fn bar(chart: &Chart, dataset: usize, index: usize) -> graficar::RectElement {
        match &chart.meta(dataset).expect("meta").elements[index] {
            ElementSlot::Rect(r) => r.clone(),
            other => panic!("expected rect, got {other:?}"),
        }
    }

    #[test]
    fn test_upper_bar_sits_on_lower_bar() {
        let mut chart = stacked_bar_chart();
        chart.update(UpdateMode::None);
        let lower = bar(&chart, 0, 0);
        let upper = bar(&chart, 1, 0);
        assert!((upper.base - lower.y).abs() < 1e-9);
        assert_eq!(lower.x, upper.x); // stacked bars share the slot
    }

    #[test]
    fn test_value_scale_covers_stacked_total() {
        let mut chart = stacked_bar_chart();
        chart.update(UpdateMode::None);
        // Column totals are 5 and 5; the y scale must reach them
        assert!(chart.scales()[1].max() >= 5.0);
    }

    #[test]
    fn test_hiding_a_layer_drops_the_total() {
        let mut chart = stacked_bar_chart();
        chart.update(UpdateMode::None);
        let stacked_top = bar(&chart, 1, 1).y;
        chart.hide(0);
        chart.stop_animations();
        let alone_top = bar(&chart, 1, 1).y;
        // With the lower layer gone the upper bar starts at the axis base,
        // so its top pixel moves down (larger y) or the scale rescales.
        assert!((alone_top - stacked_top).abs() > 1e-9);
    }
}

// ============================================================================
// Radial chart kinds
// ============================================================================

mod radial {
    use super::*;

    #[test]
    fn test_radar_points_sit_on_spokes() {
        let mut data = ChartData::new();
        data.labels = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        data.datasets
            .push(Dataset::new("d").values([10.0, 10.0, 10.0, 10.0]));
        let mut chart =
            Chart::new(ChartConfig::new(ChartKind::Radar, data), 400.0, 400.0).expect("chart");
        chart.update(UpdateMode::None);

        let radial = chart.scales()[0].as_radial().expect("radial scale");
        let center = radial.center();
        match &chart.meta(0).expect("meta").elements[0] {
            ElementSlot::Point(p) => {
                // First spoke points straight up from the center
                assert!((p.x - center.x).abs() < 1e-9);
                assert!(p.y < center.y);
            }
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_polar_max_value_reaches_drawing_area() {
        let mut data = ChartData::new();
        data.labels = vec!["a".into(), "b".into()];
        data.datasets.push(Dataset::new("d").values([5.0, 10.0]));
        let mut chart =
            Chart::new(ChartConfig::new(ChartKind::PolarArea, data), 400.0, 400.0).expect("chart");
        chart.update(UpdateMode::None);

        let radial = chart.scales()[0].as_radial().expect("radial scale");
        match &chart.meta(0).expect("meta").elements[1] {
            ElementSlot::Arc(a) => {
                assert!((a.outer_radius - radial.drawing_area()).abs() < 1e-6);
            }
            other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn test_pie_slices_tile_the_circle() {
        let mut data = ChartData::new();
        data.datasets.push(Dataset::new("d").values([1.0, 1.0, 2.0]));
        let mut chart =
            Chart::new(ChartConfig::new(ChartKind::Pie, data), 400.0, 400.0).expect("chart");
        chart.update(UpdateMode::None);

        let meta = chart.meta(0).expect("meta");
        let total: f64 = meta
            .elements
            .iter()
            .map(|slot| match slot {
                ElementSlot::Arc(a) => a.circumference,
                other => panic!("expected arc, got {other:?}"),
            })
            .sum();
        assert!((total - std::f64::consts::TAU).abs() < 1e-9);
    }
}

// ============================================================================
// Interaction
// ============================================================================

mod interaction {
    use super::*;

    fn scatter_chart() -> Chart {
        let mut data = ChartData::new();
        data.datasets
            .push(Dataset::new("d").points([(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)]));
        let mut config = ChartConfig::new(ChartKind::Line, data);
        config.options.legend = false;
        config.scales = vec![
            ScaleConfig::new(
                ScaleKind::Linear,
                ScaleOptions::new("x", Position::Bottom).range(0.0, 20.0),
            ),
            ScaleConfig::new(
                ScaleKind::Linear,
                ScaleOptions::new("y", Position::Left).range(0.0, 10.0),
            ),
        ];
        Chart::new(config, 400.0, 300.0).expect("chart")
    }

    #[test]
    fn test_nearest_returns_single_closest_point() {
        let mut chart = scatter_chart();
        chart.update(UpdateMode::None);
        let x = chart.scales()[0].pixel_for_value(9.0);
        let y = chart.scales()[1].pixel_for_value(9.0);
        let hits = chart.elements_at_event_for_mode(x, y, InteractionMode::Nearest, false);
        assert_eq!(hits, vec![ActiveElement::new(0, 1)]);
    }

    #[test]
    fn test_index_mode_resolves_by_x() {
        let mut chart = scatter_chart();
        chart.update(UpdateMode::None);
        let x = chart.scales()[0].pixel_for_value(18.0);
        let hits = chart.elements_at_event_for_mode(x, 0.0, InteractionMode::Index, false);
        assert_eq!(hits, vec![ActiveElement::new(0, 2)]);
    }

    #[test]
    fn test_hover_updates_active_set() {
        let mut chart = scatter_chart();
        chart.update(UpdateMode::None);
        let x = chart.scales()[0].pixel_for_value(10.0);
        let y = chart.scales()[1].pixel_for_value(10.0);
        let active = chart.hover(x, y);
        assert_eq!(active, vec![ActiveElement::new(0, 1)]);
        assert_eq!(chart.active(), active.as_slice());
    }
}

// ============================================================================
// Time axes
// ============================================================================

mod time_axis {
    use super::*;
    use graficar::{TickSource, TimeDistribution};

    const DAY: f64 = 86_400_000.0;

    fn time_chart(x_options: ScaleOptions) -> Chart {
        let mut data = ChartData::new();
        data.datasets.push(Dataset::new("d").points([
            (0.0, 1.0),
            (10.0 * DAY, 2.0),
            (100.0 * DAY, 3.0),
        ]));
        let mut config = ChartConfig::new(ChartKind::Line, data);
        config.options.legend = false;
        config.scales = vec![
            ScaleConfig::new(ScaleKind::Time, x_options),
            ScaleConfig::new(ScaleKind::Linear, ScaleOptions::new("y", Position::Left)),
        ];
        Chart::new(config, 400.0, 300.0).expect("chart")
    }

    fn point_x(chart: &Chart, index: usize) -> f64 {
        match &chart.meta(0).expect("meta").elements[index] {
            ElementSlot::Point(p) => p.x,
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_series_distribution_spaces_irregular_samples_evenly() {
        let mut chart = time_chart(
            ScaleOptions::new("x", Position::Bottom)
                .time_distribution(TimeDistribution::Series),
        );
        chart.update(UpdateMode::None);
        let x0 = point_x(&chart, 0);
        let x1 = point_x(&chart, 1);
        let x2 = point_x(&chart, 2);
        // 0 / 10 / 100 days apart, but one axis slot each
        assert!((x1 - x0) > 1.0);
        assert!(((x1 - x0) - (x2 - x1)).abs() < 1e-6);
    }

    #[test]
    fn test_linear_distribution_keeps_time_proportions() {
        let mut chart = time_chart(ScaleOptions::new("x", Position::Bottom));
        chart.update(UpdateMode::None);
        let x0 = point_x(&chart, 0);
        let x1 = point_x(&chart, 1);
        let x2 = point_x(&chart, 2);
        // 10 days vs 90 days between samples
        assert!((x2 - x1) > 5.0 * (x1 - x0));
    }

    #[test]
    fn test_data_tick_source_marks_every_sample() {
        let mut chart = time_chart(
            ScaleOptions::new("x", Position::Bottom).time_source(TickSource::Data),
        );
        chart.update(UpdateMode::None);
        let scale = chart.scales()[0].as_time().expect("time scale");
        let values: Vec<f64> = scale.ticks().iter().map(|t| t.value).collect();
        assert_eq!(values, vec![0.0, 10.0 * DAY, 100.0 * DAY]);
    }
}

// ============================================================================
// Data patches
// ============================================================================

mod patches {
    use super::*;

    #[test]
    fn test_insert_then_animate_to_new_point() {
        let mut chart = line_chart(&[1.0, 2.0]);
        chart.update(UpdateMode::None);
        chart.apply_patch(&DataPatch::Insert {
            dataset_index: 0,
            index: 2,
            values: vec![DataValue::Scalar(3.0)],
        });
        chart.stop_animations();
        assert_eq!(chart.data().datasets[0].data.len(), 3);
        assert_eq!(chart.meta(0).expect("meta").elements.len(), 3);
    }

    #[test]
    fn test_replace_moves_existing_element() {
        let mut chart = line_chart(&[1.0, 2.0]);
        chart.update(UpdateMode::None);
        let before = point_y(&chart, 0, 0);
        chart.apply_patch(&DataPatch::Replace {
            dataset_index: 0,
            index: 0,
            values: vec![DataValue::Scalar(2.0)],
        });
        chart.stop_animations();
        assert!(point_y(&chart, 0, 0) < before); // larger value, higher up
    }

    #[test]
    fn test_remove_truncates_elements() {
        let mut chart = line_chart(&[1.0, 2.0, 3.0]);
        chart.update(UpdateMode::None);
        chart.apply_patch(&DataPatch::Remove {
            dataset_index: 0,
            index: 1,
            count: 2,
        });
        assert_eq!(chart.meta(0).expect("meta").elements.len(), 1);
    }
}

// ============================================================================
// Frame serialization
// ============================================================================

mod serialization {
    use super::*;

    #[test]
    fn test_snapshot_is_valid_json() {
        let mut chart = line_chart(&[1.0, 2.0]);
        chart.update(UpdateMode::None);
        let json = chart.snapshot_json().expect("snapshot");
        let frame: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert!(frame.as_array().is_some_and(|cmds| !cmds.is_empty()));
    }

    #[test]
    fn test_identical_charts_produce_identical_frames() {
        let mut a = line_chart(&[1.0, 2.0, 3.0]);
        let mut b = line_chart(&[1.0, 2.0, 3.0]);
        a.update(UpdateMode::None);
        b.update(UpdateMode::None);
        assert_eq!(a.snapshot_json().expect("a"), b.snapshot_json().expect("b"));
    }
}
