use std::rc::Rc;

use bitflags::bitflags;
use tracing::{debug, trace};

use crate::provider::{Configure, LayerProvider, Serial, SerialCounter, SurfaceProvider, ToplevelState};
use crate::types::{LayerId, LayerPopupId, OutputId, Point, ProviderId, Rect, Size};

/// Stacking layer of a layer surface, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Background,
    Bottom,
    Top,
    Overlay,
}

impl Layer {
    /// Order in which layers claim exclusive zones: topmost first.
    pub const ARRANGE_ORDER: [Layer; 4] = [Layer::Overlay, Layer::Top, Layer::Bottom, Layer::Background];
}

bitflags! {
    /// Output edges a layer surface is attached to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Anchor: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

/// Distance kept from each anchored edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// Placement request committed by a layer-shell client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerState {
    pub layer: Layer,
    pub anchor: Anchor,
    pub margin: Margins,
    /// Pixels reserved from the anchored edge. Zero reserves nothing but
    /// honours other reservations; a negative zone ignores them and uses the full output.
    pub exclusive_zone: i32,
    /// Zero in a dimension means "fill the bounds", given both anchors on that axis.
    pub desired_size: Size<u32>,
}

impl LayerState {
    pub fn new(layer: Layer) -> Self {
        Self {
            layer,
            anchor: Anchor::empty(),
            margin: Margins::default(),
            exclusive_zone: 0,
            desired_size: Size::new(0, 0),
        }
    }

    pub fn has_exclusive_zone(&self) -> bool {
        self.exclusive_zone > 0
    }
}

/// A panel, background or overlay surface bound to one output.
#[derive(Debug)]
pub struct LayerSurface {
    id: LayerId,
    output: OutputId,
    provider: Rc<dyn LayerProvider>,
    state: LayerState,
    /// Box in output-local coordinates.
    geometry: Rect,
    configured: bool,
    mapped: bool,
    serials: SerialCounter,
    last_configure: Option<Serial>,
    configured_size: Option<Size<u32>>,
    popups: Vec<LayerPopupId>,
}

impl LayerSurface {
    pub(crate) fn new(id: LayerId, output: OutputId, provider: Rc<dyn LayerProvider>) -> Self {
        let state = provider.layer_state();
        Self {
            id,
            output,
            provider,
            state,
            geometry: Rect::default(),
            configured: false,
            mapped: false,
            serials: SerialCounter::new(),
            last_configure: None,
            configured_size: None,
            popups: Vec::new(),
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn output(&self) -> OutputId {
        self.output
    }

    pub fn provider(&self) -> &Rc<dyn LayerProvider> {
        &self.provider
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    pub fn layer(&self) -> Layer {
        self.state.layer
    }

    /// Box in output-local coordinates.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Whether the client has acknowledged a configure. Stays set once it has.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub(crate) fn set_mapped(&mut self, mapped: bool) {
        self.mapped = mapped;
    }

    pub fn popups(&self) -> &[LayerPopupId] {
        &self.popups
    }

    pub(crate) fn add_popup(&mut self, popup: LayerPopupId) {
        self.popups.push(popup);
    }

    pub(crate) fn remove_popup(&mut self, popup: LayerPopupId) {
        self.popups.retain(|p| *p != popup);
    }

    /// Re-reads the committed state. Returns whether it changed.
    pub(crate) fn refresh_state(&mut self) -> bool {
        let state = self.provider.layer_state();
        if state == self.state {
            return false;
        }
        trace!(layer = %self.id, ?state, "Layer surface state changed");
        self.state = state;
        true
    }

    /// Records an acknowledged configure carried by a commit.
    pub(crate) fn acknowledge(&mut self, acked: Option<Serial>) {
        if let (Some(acked), Some(last)) = (acked, self.last_configure) {
            if acked >= last && !self.configured {
                debug!(layer = %self.id, serial = ?acked, "Layer surface configured");
                self.configured = true;
            }
        }
    }

    /// Applies an arranged box, configuring the client when its size changed.
    /// Returns whether the box moved or resized.
    pub(crate) fn place(&mut self, geometry: Rect) -> bool {
        let size = Size::new(geometry.width.max(0) as u32, geometry.height.max(0) as u32);
        if self.configured_size != Some(size) {
            let serial = self.serials.next_serial();
            self.provider.send_configure(&Configure {
                serial: Some(serial),
                position: None,
                size,
                states: ToplevelState::empty(),
            });
            self.configured_size = Some(size);
            self.last_configure = Some(serial);
        }
        let changed = self.geometry != geometry;
        self.geometry = geometry;
        changed
    }

    /// Asks the client to close the surface.
    pub(crate) fn close(&self) {
        debug!(layer = %self.id, "Closing layer surface");
        self.provider.send_close();
    }
}

/// A popup opened by a layer surface, possibly nested under another popup.
#[derive(Debug)]
pub struct LayerPopup {
    id: LayerPopupId,
    layer: LayerId,
    parent: Option<LayerPopupId>,
    provider: Rc<dyn SurfaceProvider>,
    children: Vec<LayerPopupId>,
    mapped: bool,
}

impl LayerPopup {
    pub(crate) fn new(
        id: LayerPopupId,
        layer: LayerId,
        parent: Option<LayerPopupId>,
        provider: Rc<dyn SurfaceProvider>,
    ) -> Self {
        Self {
            id,
            layer,
            parent,
            provider,
            children: Vec::new(),
            mapped: false,
        }
    }

    pub fn id(&self) -> LayerPopupId {
        self.id
    }

    /// The layer surface at the root of this popup's tree.
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn parent(&self) -> Option<LayerPopupId> {
        self.parent
    }

    pub fn provider(&self) -> &Rc<dyn SurfaceProvider> {
        &self.provider
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }

    pub fn children(&self) -> &[LayerPopupId] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: LayerPopupId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: LayerPopupId) {
        self.children.retain(|c| *c != child);
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub(crate) fn set_mapped(&mut self, mapped: bool) {
        self.mapped = mapped;
    }

    /// Offset relative to the parent surface.
    pub fn offset(&self) -> Point<i32> {
        self.provider.offset()
    }
}
