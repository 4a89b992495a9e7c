//! Exclusive-zone arrangement of layer surfaces on one output.

use tracing::{debug, warn};

use crate::types::{LayerId, Rect};

use super::state::{Anchor, Layer, LayerState, Margins};

/// Result of arranging one output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    /// Area left for views, in output-local coordinates.
    pub usable_area: Rect,
    /// Box for each surface that fits, in output-local coordinates.
    pub placements: Vec<(LayerId, Rect)>,
    /// Surfaces whose margins leave them a negative size.
    pub rejected: Vec<LayerId>,
}

/// Arranges `surfaces` inside `full_area`, the output-local box of the output.
///
/// Surfaces reserving an exclusive zone are placed first, topmost layer
/// first, each shrinking the usable area from its anchored edge. Surfaces
/// without a reservation are then placed inside whatever is left.
pub fn arrange_layers(full_area: Rect, surfaces: &[(LayerId, LayerState)]) -> Arrangement {
    let mut arrangement = Arrangement {
        usable_area: full_area,
        placements: Vec::new(),
        rejected: Vec::new(),
    };
    for exclusive in [true, false] {
        for layer in Layer::ARRANGE_ORDER {
            arrange_layer(full_area, surfaces, layer, exclusive, &mut arrangement);
        }
    }
    debug!(usable_area = ?arrangement.usable_area, placed = arrangement.placements.len(), "Arranged layers");
    arrangement
}

fn arrange_layer(
    full_area: Rect,
    surfaces: &[(LayerId, LayerState)],
    layer: Layer,
    exclusive: bool,
    arrangement: &mut Arrangement,
) {
    for (id, state) in surfaces.iter().filter(|(_, s)| s.layer == layer) {
        if state.has_exclusive_zone() != exclusive {
            continue;
        }
        let bounds = if state.exclusive_zone < 0 {
            full_area
        } else {
            arrangement.usable_area
        };
        let Some(geometry) = place_in(bounds, state) else {
            warn!(layer = %id, ?state, "Layer surface has negative size after margins");
            arrangement.rejected.push(*id);
            continue;
        };
        apply_exclusive(&mut arrangement.usable_area, state.anchor, state.exclusive_zone, state.margin);
        arrangement.placements.push((*id, geometry));
    }
}

/// Computes the box of one surface inside `bounds`.
fn place_in(bounds: Rect, state: &LayerState) -> Option<Rect> {
    let mut rect = Rect::new(
        0,
        0,
        state.desired_size.width as i32,
        state.desired_size.height as i32,
    );
    let anchor = state.anchor;
    let margin = state.margin;

    let both_horiz = Anchor::LEFT | Anchor::RIGHT;
    if anchor.contains(both_horiz) && rect.width == 0 {
        rect.x = bounds.x;
        rect.width = bounds.width;
    } else if anchor.contains(Anchor::LEFT) {
        rect.x = bounds.x;
    } else if anchor.contains(Anchor::RIGHT) {
        rect.x = bounds.x + (bounds.width - rect.width);
    } else {
        rect.x = bounds.x + (bounds.width / 2 - rect.width / 2);
    }

    let both_vert = Anchor::TOP | Anchor::BOTTOM;
    if anchor.contains(both_vert) && rect.height == 0 {
        rect.y = bounds.y;
        rect.height = bounds.height;
    } else if anchor.contains(Anchor::TOP) {
        rect.y = bounds.y;
    } else if anchor.contains(Anchor::BOTTOM) {
        rect.y = bounds.y + (bounds.height - rect.height);
    } else {
        rect.y = bounds.y + (bounds.height / 2 - rect.height / 2);
    }

    if anchor.contains(both_horiz) {
        rect.x += margin.left;
        rect.width -= margin.left + margin.right;
    } else if anchor.contains(Anchor::LEFT) {
        rect.x += margin.left;
    } else if anchor.contains(Anchor::RIGHT) {
        rect.x -= margin.right;
    }

    if anchor.contains(both_vert) {
        rect.y += margin.top;
        rect.height -= margin.top + margin.bottom;
    } else if anchor.contains(Anchor::TOP) {
        rect.y += margin.top;
    } else if anchor.contains(Anchor::BOTTOM) {
        rect.y -= margin.bottom;
    }

    if rect.width < 0 || rect.height < 0 {
        None
    } else {
        Some(rect)
    }
}

/// Shrinks `usable` by the zone reserved along the surface's edge.
///
/// A surface reserves an edge when it is anchored to that edge alone, or to
/// that edge plus both perpendicular ones.
fn apply_exclusive(usable: &mut Rect, anchor: Anchor, exclusive: i32, margin: Margins) {
    if exclusive <= 0 {
        return;
    }
    let reserved = |edge: Anchor, perpendicular: Anchor, edge_margin: i32| {
        let anchored = anchor == edge || anchor == edge | perpendicular;
        if anchored && exclusive + edge_margin > 0 {
            exclusive + edge_margin
        } else {
            0
        }
    };
    let horiz = Anchor::LEFT | Anchor::RIGHT;
    let vert = Anchor::TOP | Anchor::BOTTOM;

    let top = reserved(Anchor::TOP, horiz, margin.top);
    usable.y += top;
    usable.height -= top;
    usable.height -= reserved(Anchor::BOTTOM, horiz, margin.bottom);
    let left = reserved(Anchor::LEFT, vert, margin.left);
    usable.x += left;
    usable.width -= left;
    usable.width -= reserved(Anchor::RIGHT, vert, margin.right);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Size;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const OUTPUT: Rect = Rect::from_size(1920, 1080);

    fn surface(layer: Layer, anchor: Anchor, exclusive_zone: i32, width: u32, height: u32) -> LayerState {
        LayerState {
            layer,
            anchor,
            margin: Margins::default(),
            exclusive_zone,
            desired_size: Size::new(width, height),
        }
    }

    #[test]
    fn top_panel_reserves_its_zone() {
        let panel = LayerId::new_v4();
        let result = arrange_layers(OUTPUT, &[(panel, surface(Layer::Top, Anchor::TOP, 30, 1920, 30))]);

        assert_eq!(result.usable_area, Rect::new(0, 30, 1920, 1050));
        assert_eq!(result.placements, vec![(panel, Rect::new(0, 0, 1920, 30))]);
    }

    #[rstest]
    #[case(Anchor::TOP | Anchor::LEFT | Anchor::RIGHT, Rect::new(0, 30, 1920, 1050))]
    #[case(Anchor::BOTTOM | Anchor::LEFT | Anchor::RIGHT, Rect::new(0, 0, 1920, 1050))]
    #[case(Anchor::LEFT | Anchor::TOP | Anchor::BOTTOM, Rect::new(30, 0, 1890, 1080))]
    #[case(Anchor::RIGHT, Rect::new(0, 0, 1890, 1080))]
    #[case(Anchor::TOP | Anchor::LEFT, Rect::new(0, 0, 1920, 1080))]
    fn exclusive_edge_selection(#[case] anchor: Anchor, #[case] expected: Rect) {
        let result = arrange_layers(OUTPUT, &[(LayerId::new_v4(), surface(Layer::Top, anchor, 30, 0, 0))]);
        assert_eq!(result.usable_area, expected);
    }

    #[test]
    fn fill_uses_bounds_and_margins() {
        let mut state = surface(Layer::Bottom, Anchor::TOP | Anchor::LEFT | Anchor::RIGHT, 20, 0, 20);
        state.margin = Margins {
            top: 5,
            right: 10,
            bottom: 0,
            left: 10,
        };
        let id = LayerId::new_v4();
        let result = arrange_layers(OUTPUT, &[(id, state)]);

        assert_eq!(result.placements, vec![(id, Rect::new(10, 5, 1900, 20))]);
        assert_eq!(result.usable_area, Rect::new(0, 25, 1920, 1055));
    }

    #[test]
    fn higher_layers_claim_first_and_non_exclusive_follow() {
        let background = LayerId::new_v4();
        let bottom_bar = LayerId::new_v4();
        let top_bar = LayerId::new_v4();
        let surfaces = [
            (background, surface(Layer::Background, Anchor::all(), 0, 0, 0)),
            (bottom_bar, surface(Layer::Bottom, Anchor::TOP, 20, 1920, 20)),
            (top_bar, surface(Layer::Overlay, Anchor::TOP, 30, 1920, 30)),
        ];
        let result = arrange_layers(OUTPUT, &surfaces);

        assert_eq!(
            result.placements,
            vec![
                (top_bar, Rect::new(0, 0, 1920, 30)),
                (bottom_bar, Rect::new(0, 30, 1920, 20)),
                (background, Rect::new(0, 50, 1920, 1030)),
            ]
        );
        assert_eq!(result.usable_area, Rect::new(0, 50, 1920, 1030));
    }

    #[rstest]
    #[case(-1)]
    #[case(-5)]
    fn negative_exclusive_zone_ignores_reservations(#[case] zone: i32) {
        let panel = LayerId::new_v4();
        let wallpaper = LayerId::new_v4();
        let surfaces = [
            (panel, surface(Layer::Top, Anchor::TOP, 30, 1920, 30)),
            (wallpaper, surface(Layer::Background, Anchor::all(), zone, 0, 0)),
        ];
        let result = arrange_layers(OUTPUT, &surfaces);
        assert!(result.placements.contains(&(wallpaper, OUTPUT)));
    }

    #[test]
    fn oversized_margins_are_rejected() {
        let mut state = surface(Layer::Top, Anchor::LEFT | Anchor::RIGHT, 0, 0, 10);
        state.margin.left = 1000;
        state.margin.right = 1000;
        let id = LayerId::new_v4();
        let result = arrange_layers(OUTPUT, &[(id, state)]);
        assert_eq!(result.rejected, vec![id]);
        assert!(result.placements.is_empty());
    }
}
