//! Outputs as seen by the view core: a box in layout space, the usable area
//! left by layer surfaces, and accumulated repaint damage.

use crate::types::{LayerId, OutputId, Rect, ViewId};

/// Damage accumulated on one output since the last repaint, in output-local
/// coordinates.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DamageTracker {
    regions: Vec<Rect>,
    whole: bool,
}

impl DamageTracker {
    pub fn add(&mut self, rect: Rect) {
        if self.whole || rect.is_empty() || self.regions.contains(&rect) {
            return;
        }
        self.regions.push(rect);
    }

    /// Marks the entire output for repaint.
    pub fn damage_whole(&mut self) {
        self.whole = true;
        self.regions.clear();
    }

    pub fn is_whole(&self) -> bool {
        self.whole
    }

    pub fn is_damaged(&self) -> bool {
        self.whole || !self.regions.is_empty()
    }

    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    /// Takes the accumulated damage, leaving the tracker clean.
    pub fn take(&mut self) -> DamageTracker {
        std::mem::take(self)
    }
}

#[derive(Debug)]
pub struct Output {
    id: OutputId,
    name: String,
    /// Box in layout coordinates.
    layout: Rect,
    /// Usable area in output-local coordinates.
    usable_area: Rect,
    layers: Vec<LayerId>,
    fullscreen_view: Option<ViewId>,
    damage: DamageTracker,
}

impl Output {
    pub(crate) fn new(id: OutputId, name: impl Into<String>, layout: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            layout,
            usable_area: Rect::from_size(layout.width, layout.height),
            layers: Vec::new(),
            fullscreen_view: None,
            damage: DamageTracker::default(),
        }
    }

    pub fn id(&self) -> OutputId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Box in layout coordinates.
    pub fn layout_box(&self) -> Rect {
        self.layout
    }

    /// The output's own extent, at the origin.
    pub fn local_box(&self) -> Rect {
        Rect::from_size(self.layout.width, self.layout.height)
    }

    /// Usable area in output-local coordinates.
    pub fn usable_area(&self) -> Rect {
        self.usable_area
    }

    /// Usable area translated into layout coordinates.
    pub fn usable_area_in_layout(&self) -> Rect {
        self.usable_area.translated(self.layout.x, self.layout.y)
    }

    /// Returns whether the area changed.
    pub(crate) fn set_usable_area(&mut self, area: Rect) -> bool {
        if self.usable_area == area {
            return false;
        }
        self.usable_area = area;
        true
    }

    /// Layer surfaces bound to this output, in creation order.
    pub fn layers(&self) -> &[LayerId] {
        &self.layers
    }

    pub(crate) fn add_layer(&mut self, layer: LayerId) {
        self.layers.push(layer);
    }

    pub(crate) fn remove_layer(&mut self, layer: LayerId) {
        self.layers.retain(|l| *l != layer);
    }

    pub fn fullscreen_view(&self) -> Option<ViewId> {
        self.fullscreen_view
    }

    pub(crate) fn set_fullscreen_view(&mut self, view: Option<ViewId>) {
        self.fullscreen_view = view;
    }

    pub fn damage(&self) -> &DamageTracker {
        &self.damage
    }

    /// Takes the damage accumulated since the last repaint.
    pub fn take_damage(&mut self) -> DamageTracker {
        self.damage.take()
    }

    /// Damages the part of `rect`, given in layout coordinates, that falls on this output.
    pub(crate) fn damage_layout_rect(&mut self, rect: Rect) {
        if let Some(visible) = rect.intersection(&self.layout) {
            self.damage.add(visible.translated(-self.layout.x, -self.layout.y));
        }
    }

    pub(crate) fn damage_whole(&mut self) {
        self.damage.damage_whole();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_damage_is_clipped_and_localized() {
        let mut output = Output::new(OutputId::new_v4(), "HDMI-A-1", Rect::new(1920, 0, 1280, 1024));
        output.damage_layout_rect(Rect::new(1900, 10, 100, 100));
        output.damage_layout_rect(Rect::new(0, 0, 10, 10));

        assert_eq!(output.damage().regions(), &[Rect::new(0, 10, 80, 100)]);
        let taken = output.take_damage();
        assert!(taken.is_damaged());
        assert!(!output.damage().is_damaged());
    }

    #[test]
    fn whole_damage_absorbs_regions() {
        let mut tracker = DamageTracker::default();
        tracker.add(Rect::new(0, 0, 5, 5));
        tracker.damage_whole();
        tracker.add(Rect::new(1, 1, 5, 5));
        assert!(tracker.is_whole());
        assert!(tracker.regions().is_empty());
    }

    #[test]
    fn usable_area_translates_to_layout() {
        let mut output = Output::new(OutputId::new_v4(), "DP-1", Rect::new(100, 50, 800, 600));
        assert!(output.set_usable_area(Rect::new(0, 30, 800, 570)));
        assert!(!output.set_usable_area(Rect::new(0, 30, 800, 570)));
        assert_eq!(output.usable_area_in_layout(), Rect::new(100, 80, 800, 570));
    }
}
