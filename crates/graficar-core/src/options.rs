//! Layered option resolution.
//!
//! Options resolve through explicit layers, global → per-type → per-dataset
//! → per-element, into an immutable snapshot taken once per update cycle.
//! Nothing in the engine mutates a shared options object.

use crate::animation::Easing;
use crate::color::Color;
use crate::data::ChartKind;
use crate::element::PaintOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default dataset color palette, cycled when a dataset configures none.
pub const PALETTE: [Color; 7] = [
    Color {
        r: 0.216,
        g: 0.467,
        b: 0.96,
        a: 1.0,
    },
    Color {
        r: 1.0,
        g: 0.412,
        b: 0.38,
        a: 1.0,
    },
    Color {
        r: 0.29,
        g: 0.76,
        b: 0.49,
        a: 1.0,
    },
    Color {
        r: 1.0,
        g: 0.65,
        b: 0.18,
        a: 1.0,
    },
    Color {
        r: 0.58,
        g: 0.46,
        b: 0.9,
        a: 1.0,
    },
    Color {
        r: 0.3,
        g: 0.78,
        b: 0.82,
        a: 1.0,
    },
    Color {
        r: 0.78,
        g: 0.78,
        b: 0.3,
        a: 1.0,
    },
];

/// Palette color for a dataset index, wrapping around.
#[must_use]
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Pointer-to-element resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    /// All elements at the same data index as the closest match
    Index,
    /// All elements of the dataset containing the closest match
    Dataset,
    /// Elements whose shape contains the pointer
    Point,
    /// The single nearest element (ties keep all equidistant matches)
    #[default]
    Nearest,
    /// Elements intersecting the pointer's x
    X,
    /// Elements intersecting the pointer's y
    Y,
}

/// Animation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationOptions {
    /// Transition duration in milliseconds; 0 disables animation
    pub duration: f64,
    /// Easing function
    pub easing: Easing,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration: 400.0,
            easing: Easing::EaseInOut,
        }
    }
}

/// Hover/interaction configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverOptions {
    /// Resolution mode
    pub mode: InteractionMode,
    /// Require shape containment
    pub intersect: bool,
}

impl Default for HoverOptions {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Nearest,
            intersect: true,
        }
    }
}

/// A partial layer of element options; `None` defers to the layer below.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementOverrides {
    /// Fill color
    pub background: Option<Color>,
    /// Border color
    pub border_color: Option<Color>,
    /// Border width
    pub border_width: Option<f64>,
    /// Point radius (line/radar/bubble families)
    pub point_radius: Option<f64>,
    /// Point hit radius
    pub hit_radius: Option<f64>,
    /// Line tension
    pub tension: Option<f64>,
    /// Line stroke width
    pub line_width: Option<f64>,
}

impl ElementOverrides {
    /// Merge with a lower-precedence layer; `self` wins where set.
    #[must_use]
    pub fn over(self, below: Self) -> Self {
        Self {
            background: self.background.or(below.background),
            border_color: self.border_color.or(below.border_color),
            border_width: self.border_width.or(below.border_width),
            point_radius: self.point_radius.or(below.point_radius),
            hit_radius: self.hit_radius.or(below.hit_radius),
            tension: self.tension.or(below.tension),
            line_width: self.line_width.or(below.line_width),
        }
    }
}

/// Fully resolved element options for one dataset in one update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedElementOptions {
    /// Fill color
    pub background: Color,
    /// Border color
    pub border_color: Color,
    /// Border width
    pub border_width: f64,
    /// Point radius
    pub point_radius: f64,
    /// Point hit radius
    pub hit_radius: f64,
    /// Line tension
    pub tension: f64,
    /// Line stroke width
    pub line_width: f64,
}

impl ResolvedElementOptions {
    /// Paint properties for element construction.
    #[must_use]
    pub const fn paint(&self) -> PaintOptions {
        PaintOptions {
            background: self.background,
            border_color: self.border_color,
            border_width: self.border_width,
        }
    }
}

/// The layered defaults resolver, constructed once per configuration.
#[derive(Debug, Clone, Default)]
pub struct OptionResolver {
    global: ElementOverrides,
    per_kind: HashMap<ChartKind, ElementOverrides>,
}

impl OptionResolver {
    /// Create a resolver with empty layers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global layer.
    #[must_use]
    pub fn global(mut self, layer: ElementOverrides) -> Self {
        self.global = layer;
        self
    }

    /// Set a per-type layer.
    #[must_use]
    pub fn for_kind(mut self, kind: ChartKind, layer: ElementOverrides) -> Self {
        self.per_kind.insert(kind, layer);
        self
    }

    /// Resolve options for one dataset.
    ///
    /// Precedence: per-element > per-dataset > per-type > global > built-in.
    /// The palette supplies colors no layer configured.
    #[must_use]
    pub fn resolve(
        &self,
        kind: ChartKind,
        dataset_index: usize,
        dataset_layer: ElementOverrides,
        element_layer: ElementOverrides,
    ) -> ResolvedElementOptions {
        let kind_layer = self.per_kind.get(&kind).copied().unwrap_or_default();
        let merged = element_layer
            .over(dataset_layer)
            .over(kind_layer)
            .over(self.global);

        let fallback = palette_color(dataset_index);
        ResolvedElementOptions {
            background: merged.background.unwrap_or(fallback),
            border_color: merged.border_color.unwrap_or(fallback),
            border_width: merged.border_width.unwrap_or(1.0),
            point_radius: merged.point_radius.unwrap_or(3.0),
            hit_radius: merged.hit_radius.unwrap_or(1.0),
            tension: merged.tension.unwrap_or(0.0),
            line_width: merged.line_width.unwrap_or(2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(0), palette_color(PALETTE.len()));
    }

    #[test]
    fn test_resolver_built_in_defaults() {
        let resolver = OptionResolver::new();
        let resolved = resolver.resolve(
            ChartKind::Line,
            0,
            ElementOverrides::default(),
            ElementOverrides::default(),
        );
        assert_eq!(resolved.point_radius, 3.0);
        assert_eq!(resolved.background, palette_color(0));
    }

    #[test]
    fn test_layer_precedence() {
        let resolver = OptionResolver::new()
            .global(ElementOverrides {
                border_width: Some(4.0),
                point_radius: Some(9.0),
                ..ElementOverrides::default()
            })
            .for_kind(
                ChartKind::Bar,
                ElementOverrides {
                    border_width: Some(2.0),
                    ..ElementOverrides::default()
                },
            );

        let dataset_layer = ElementOverrides {
            point_radius: Some(5.0),
            ..ElementOverrides::default()
        };
        let resolved = resolver.resolve(
            ChartKind::Bar,
            0,
            dataset_layer,
            ElementOverrides::default(),
        );
        // per-type beats global, per-dataset beats both
        assert_eq!(resolved.border_width, 2.0);
        assert_eq!(resolved.point_radius, 5.0);
    }

    #[test]
    fn test_element_layer_wins() {
        let resolver = OptionResolver::new();
        let dataset_layer = ElementOverrides {
            background: Some(Color::BLACK),
            ..ElementOverrides::default()
        };
        let element_layer = ElementOverrides {
            background: Some(Color::WHITE),
            ..ElementOverrides::default()
        };
        let resolved = resolver.resolve(ChartKind::Line, 0, dataset_layer, element_layer);
        assert_eq!(resolved.background, Color::WHITE);
    }

    #[test]
    fn test_palette_fallback_follows_dataset_index() {
        let resolver = OptionResolver::new();
        let a = resolver.resolve(
            ChartKind::Line,
            0,
            ElementOverrides::default(),
            ElementOverrides::default(),
        );
        let b = resolver.resolve(
            ChartKind::Line,
            1,
            ElementOverrides::default(),
            ElementOverrides::default(),
        );
        assert_ne!(a.background, b.background);
    }
}
