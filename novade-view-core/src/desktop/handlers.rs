//! Surface creation, event routing and teardown.

use std::rc::Rc;

use tracing::{debug, info, trace, warn};

use crate::input::CursorMode;
use crate::layer_shell::{LayerPopup, LayerSurface};
use crate::provider::{
    DecorationMode, LayerProvider, LegacyRole, LegacyState, ShellGeneration, SurfaceEvent, SurfaceProvider,
};
use crate::signal::Signal;
use crate::types::{ChildId, LayerId, LayerPopupId, OutputId, ProviderId, Rect, SeatHandle, ViewId};
use crate::view::{ChildKind, View, ViewBackend, ViewChild, ViewKind, WlShellSurface, XdgShellSurface, XwaylandSurface};

use super::{Desktop, Owner};

const SURFACE_SIGNALS: [Signal; 5] = [
    Signal::Destroy,
    Signal::Map,
    Signal::Unmap,
    Signal::Commit,
    Signal::NewSubsurface,
];

fn view_signals(kind: ViewKind) -> Vec<Signal> {
    let mut signals = SURFACE_SIGNALS.to_vec();
    signals.extend([Signal::NewPopup, Signal::RequestMove, Signal::RequestResize]);
    match kind {
        ViewKind::WlShell => signals.push(Signal::SetState),
        ViewKind::XdgShellV6 => signals.extend([Signal::RequestMaximize, Signal::RequestFullscreen]),
        ViewKind::XdgShell => signals.extend([
            Signal::RequestMaximize,
            Signal::RequestFullscreen,
            Signal::RequestDecorationMode,
        ]),
        ViewKind::Xwayland => signals.extend([
            Signal::RequestMaximize,
            Signal::RequestFullscreen,
            Signal::RequestConfigure,
        ]),
    }
    signals
}

impl Desktop {
    /// Registers a legacy-shell surface. Popups are not top-level views;
    /// they arrive through their parent's `NewPopup` event instead.
    pub fn new_wl_shell_surface(&mut self, provider: Rc<dyn SurfaceProvider>, role: LegacyRole) -> Option<ViewId> {
        if role == LegacyRole::Popup {
            debug!(provider = %provider.id(), "Ignoring top-level announcement of a wl_shell popup");
            return None;
        }
        let id = self.insert_view(provider, ViewBackend::WlShell(WlShellSurface::new()));
        if let LegacyRole::Transient { parent, x, y } = role {
            let origin = self
                .view_for_provider(parent)
                .and_then(|parent| self.views.get(&parent))
                .map(|parent| parent.geometry());
            match (origin, self.views.get_mut(&id)) {
                (Some(origin), Some(view)) => view.place_unmapped(origin.x + x as f64, origin.y + y as f64),
                _ => debug!(view = %id, %parent, "Transient parent is not a known view"),
            }
        }
        Some(id)
    }

    /// Registers a negotiated-shell top-level surface.
    pub fn new_xdg_surface(&mut self, provider: Rc<dyn SurfaceProvider>, generation: ShellGeneration) -> ViewId {
        self.insert_view(provider, ViewBackend::XdgShell(XdgShellSurface::new(generation)))
    }

    /// Registers a window of the remote display protocol bridge.
    pub fn new_xwayland_surface(&mut self, provider: Rc<dyn SurfaceProvider>) -> ViewId {
        self.insert_view(provider, ViewBackend::Xwayland(XwaylandSurface::new()))
    }

    fn insert_view(&mut self, provider: Rc<dyn SurfaceProvider>, backend: ViewBackend) -> ViewId {
        let id = ViewId::new_v4();
        let provider_id = provider.id();
        let view = View::new(id, self.current_workspace, provider, backend, self.config.decoration);
        let kind = view.kind();
        self.signals.subscribe_all(provider_id, &view_signals(kind), Owner::View(id));
        self.views.insert(id, view);
        self.provider_views.insert(provider_id, id);
        if let Ok(workspace) = self.workspace_mut(self.current_workspace) {
            workspace.add_view(id);
        }
        debug!(view = %id, provider = %provider_id, %kind, "View created");
        id
    }

    /// Registers a layer-shell surface on the output it asked for, or the
    /// first output. Without any output the surface is closed.
    pub fn new_layer_surface(&mut self, provider: Rc<dyn LayerProvider>) -> Option<LayerId> {
        let output = provider
            .requested_output()
            .filter(|requested| self.output(*requested).is_some())
            .or_else(|| self.outputs.first().map(|o| o.id()));
        let Some(output) = output else {
            warn!(provider = %provider.id(), "No output for layer surface, closing it");
            provider.send_close();
            return None;
        };

        let id = LayerId::new_v4();
        let provider_id = provider.id();
        self.signals.subscribe_all(
            provider_id,
            &[Signal::Destroy, Signal::Map, Signal::Unmap, Signal::Commit, Signal::NewPopup],
            Owner::Layer(id),
        );
        self.layers.insert(id, LayerSurface::new(id, output, provider));
        if let Ok(output) = self.output_mut(output) {
            output.add_layer(id);
        }
        debug!(layer = %id, %output, "Layer surface created");
        self.arrange_output(output);
        Some(id)
    }

    /// Routes an event from `provider` to every owner subscribed to it.
    ///
    /// Owners are snapshotted before routing and re-validated one by one,
    /// since a handler may tear down other owners. After a destroy event the
    /// provider's remaining subscriptions are revoked.
    pub fn dispatch(&mut self, provider: ProviderId, event: SurfaceEvent) {
        let signal = event.signal();
        let owners = self.signals.subscribers(provider, signal);
        trace!(%provider, ?signal, owners = owners.len(), "Dispatching event");
        for owner in owners {
            if !self.is_alive(owner) {
                trace!(?owner, "Skipping owner torn down during dispatch");
                continue;
            }
            match owner {
                Owner::View(id) => self.handle_view_event(id, &event),
                Owner::Child(id) => self.handle_child_event(id, &event),
                Owner::Layer(id) => self.handle_layer_event(id, &event),
                Owner::LayerPopup(id) => self.handle_layer_popup_event(id, &event),
            }
        }
        if signal == Signal::Destroy {
            self.signals.revoke_provider(provider);
        }
    }

    fn is_alive(&self, owner: Owner) -> bool {
        match owner {
            Owner::View(id) => self.views.contains_key(&id),
            Owner::Child(id) => self.children.contains_key(&id),
            Owner::Layer(id) => self.layers.contains_key(&id),
            Owner::LayerPopup(id) => self.layer_popups.contains_key(&id),
        }
    }

    fn handle_view_event(&mut self, id: ViewId, event: &SurfaceEvent) {
        match event {
            SurfaceEvent::Destroy => self.destroy_view(id),
            SurfaceEvent::Map => self.handle_view_map(id),
            SurfaceEvent::Unmap => self.handle_view_unmap(id),
            SurfaceEvent::Commit { acked_serial } => {
                if let Some(view) = self.views.get_mut(&id) {
                    view.handle_commit(*acked_serial);
                }
                self.after_view_change(id);
            }
            SurfaceEvent::NewPopup(popup) => {
                let Some(kind) = self.views.get(&id).map(View::kind) else {
                    return;
                };
                if !kind.supports_popups() {
                    panic!("{kind} views cannot have popups (view {id})");
                }
                self.create_child(id, None, Rc::clone(popup), ChildKind::Popup);
            }
            SurfaceEvent::NewSubsurface(subsurface) => {
                self.create_child(id, None, Rc::clone(subsurface), ChildKind::Subsurface);
            }
            SurfaceEvent::RequestMove { seat } => self.handle_request_move(id, *seat),
            SurfaceEvent::RequestResize { seat, edges } => {
                if !self.seat_is_idle(id, *seat) {
                    return;
                }
                if let Some(view) = self.views.get(&id) {
                    let geometry = view.geometry();
                    self.input.begin_resize(*seat, id, geometry, *edges);
                }
            }
            SurfaceEvent::RequestMaximize { maximized } => {
                if let Err(err) = self.maximize(id, *maximized) {
                    debug!(view = %id, %err, "Maximize request not honoured");
                }
            }
            SurfaceEvent::RequestFullscreen { fullscreen, output } => {
                if let Err(err) = self.set_fullscreen(id, *fullscreen, *output) {
                    debug!(view = %id, %err, "Fullscreen request not honoured");
                }
            }
            SurfaceEvent::RequestConfigure { x, y, width, height } => {
                if let Some(view) = self.views.get_mut(&id) {
                    view.configure_requested(*x as f64, *y as f64, *width, *height);
                }
                self.after_view_change(id);
            }
            SurfaceEvent::RequestDecorationMode(mode) => self.handle_decoration_mode(id, *mode),
            SurfaceEvent::SetState(state) => self.handle_legacy_state(id, *state),
        }
    }

    fn handle_view_map(&mut self, id: ViewId) {
        let Some(view) = self.views.get_mut(&id) else {
            return;
        };
        view.map();
        let positioned = view.is_positioned();
        let existing = view.provider().subsurfaces();
        for subsurface in existing {
            self.create_child(id, None, subsurface, ChildKind::Subsurface);
        }
        if !positioned && self.config.placement.center_new_views {
            if let Err(err) = self.center_view(id) {
                debug!(view = %id, %err, "View not centered");
            }
        }
        self.after_view_change(id);
        if let Err(err) = self.focus_view(id) {
            debug!(view = %id, %err, "Newly mapped view not focused");
        }
    }

    fn handle_view_unmap(&mut self, id: ViewId) {
        let Some(view) = self.views.get_mut(&id) else {
            return;
        };
        view.unmap();
        let workspace = view.workspace();
        let children = view.children().to_vec();
        // Mapping adopts the provider's subsurfaces again.
        for child in children {
            self.destroy_child(child);
        }
        self.after_view_change(id);
        let was_focused = self.workspace(workspace).is_some_and(|w| w.is_focused(id));
        if was_focused {
            self.focus_next(workspace, id);
        }
    }

    fn handle_request_move(&mut self, id: ViewId, seat: SeatHandle) {
        if !self.seat_is_idle(id, seat) {
            return;
        }
        if let Some(view) = self.views.get(&id) {
            let geometry = view.geometry();
            self.input.begin_move(seat, id, geometry);
        }
    }

    /// Interactive grabs start only from a seat whose cursor is idle.
    fn seat_is_idle(&self, id: ViewId, seat: SeatHandle) -> bool {
        match self.input.cursor_mode(seat) {
            Some(CursorMode::Passthrough) => true,
            Some(mode) => {
                debug!(view = %id, ?seat, ?mode, "Seat is busy, dropping grab request");
                false
            }
            None => {
                debug!(view = %id, ?seat, "No seat for grab request");
                false
            }
        }
    }

    fn handle_decoration_mode(&mut self, id: ViewId, mode: DecorationMode) {
        let Some(view) = self.views.get_mut(&id) else {
            return;
        };
        let accepted = match view.backend_mut() {
            ViewBackend::XdgShell(surface) => surface.set_decoration_mode(mode),
            _ => false,
        };
        if !accepted {
            debug!(view = %id, ?mode, "Decoration mode not negotiable for this view");
            return;
        }
        view.update_decorated(mode == DecorationMode::ServerSide);
        self.after_view_change(id);
    }

    /// Follows the state a legacy client reports, overriding local state.
    fn handle_legacy_state(&mut self, id: ViewId, state: LegacyState) {
        let Some(view) = self.views.get(&id) else {
            return;
        };
        let maximized = view.is_maximized();
        let fullscreen = view.fullscreen_output().is_some();
        let result = match state {
            LegacyState::Maximized if !maximized => {
                info!(view = %id, "Client reports maximized state, following it");
                self.maximize(id, true)
            }
            LegacyState::Fullscreen { output } if !fullscreen => {
                info!(view = %id, "Client reports fullscreen state, following it");
                self.set_fullscreen(id, true, output)
            }
            LegacyState::Toplevel | LegacyState::Transient | LegacyState::Popup if maximized || fullscreen => {
                info!(view = %id, ?state, "Client left maximized or fullscreen state, following it");
                self.maximize(id, false).and_then(|_| self.set_fullscreen(id, false, None))
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            debug!(view = %id, %err, "Could not follow client state");
        }
    }

    pub(crate) fn create_child(
        &mut self,
        view: ViewId,
        parent: Option<ChildId>,
        provider: Rc<dyn SurfaceProvider>,
        kind: ChildKind,
    ) -> Option<ChildId> {
        let view_kind = self.views.get(&view)?.kind();
        let id = ChildId::new_v4();
        match parent {
            Some(parent) => self.children.get_mut(&parent)?.add_child(id),
            None => self.views.get_mut(&view)?.add_child(id),
        }

        let mut signals = SURFACE_SIGNALS.to_vec();
        if kind == ChildKind::Popup {
            signals.push(Signal::NewPopup);
            if view_kind == ViewKind::WlShell {
                signals.push(Signal::SetState);
            }
        }
        self.signals.subscribe_all(provider.id(), &signals, Owner::Child(id));
        self.children.insert(id, ViewChild::new(id, view, parent, provider, kind));
        debug!(child = %id, %view, ?kind, "View child created");

        if kind == ChildKind::Popup {
            self.unconstrain_popup(id);
        }
        Some(id)
    }

    /// Asks a popup to stay on its view's output.
    fn unconstrain_popup(&self, id: ChildId) {
        let Some(child) = self.children.get(&id) else {
            return;
        };
        let Some(output) = self.view_output(child.view()).and_then(|o| self.output(o)) else {
            return;
        };
        let Some(parent_origin) = self.child_parent_origin(child) else {
            return;
        };
        let bounds = output
            .layout_box()
            .translated(-(parent_origin.0 as i32), -(parent_origin.1 as i32));
        child.provider().unconstrain(bounds);
    }

    /// Layout position of the surface a child is attached to.
    fn child_parent_origin(&self, child: &ViewChild) -> Option<(f64, f64)> {
        let view = self.views.get(&child.view())?;
        let content = view.content_box();
        let (mut x, mut y) = (content.x as f64, content.y as f64);
        let mut ancestors = Vec::new();
        let mut next = child.parent();
        while let Some(id) = next {
            let ancestor = self.children.get(&id)?;
            ancestors.push(ancestor.offset());
            next = ancestor.parent();
        }
        for offset in ancestors {
            x += offset.x as f64;
            y += offset.y as f64;
        }
        Some((x, y))
    }

    /// Box of a child in layout coordinates.
    fn child_box(&self, child: &ViewChild) -> Option<Rect> {
        let (x, y) = self.child_parent_origin(child)?;
        let offset = child.offset();
        let size = child.provider().committed_size();
        Some(Rect::new(
            x as i32 + offset.x,
            y as i32 + offset.y,
            size.width as i32,
            size.height as i32,
        ))
    }

    fn damage_child(&mut self, id: ChildId) {
        let Some(child) = self.children.get(&id) else {
            return;
        };
        let rotated = self.views.get(&child.view()).map(|v| (v.rotation() != 0.0, v.damage_box()));
        let rect = match rotated {
            Some((true, view_box)) => Some(view_box),
            _ => self.child_box(child),
        };
        if let Some(rect) = rect {
            self.damage_layout_rect(rect);
        }
    }

    fn handle_child_event(&mut self, id: ChildId, event: &SurfaceEvent) {
        match event {
            SurfaceEvent::Destroy => self.destroy_child(id),
            SurfaceEvent::Map => {
                if let Some(child) = self.children.get_mut(&id) {
                    child.set_mapped(true);
                }
                self.damage_child(id);
            }
            SurfaceEvent::Unmap => {
                self.damage_child(id);
                if let Some(child) = self.children.get_mut(&id) {
                    child.set_mapped(false);
                }
            }
            SurfaceEvent::Commit { .. } => {
                let Some(view) = self.children.get(&id).map(ViewChild::view) else {
                    return;
                };
                if !self.views.contains_key(&view) {
                    panic!("commit on child {id} after its view {view} was destroyed");
                }
                self.damage_child(id);
            }
            SurfaceEvent::NewPopup(popup) => {
                if let Some(view) = self.children.get(&id).map(ViewChild::view) {
                    self.create_child(view, Some(id), Rc::clone(popup), ChildKind::Popup);
                }
            }
            SurfaceEvent::NewSubsurface(subsurface) => {
                if let Some(view) = self.children.get(&id).map(ViewChild::view) {
                    self.create_child(view, Some(id), Rc::clone(subsurface), ChildKind::Subsurface);
                }
            }
            SurfaceEvent::SetState(_) => {
                debug!(child = %id, "Legacy popup dismissed by state change");
                self.destroy_child(id);
            }
            other => trace!(child = %id, signal = ?other.signal(), "Ignoring event on view child"),
        }
    }

    /// Destroys a child and its descendants depth-first, detaching it from
    /// its parent.
    pub(crate) fn destroy_child(&mut self, id: ChildId) {
        self.damage_child(id);
        self.signals.revoke_owner(Owner::Child(id));
        let Some(child) = self.children.remove(&id) else {
            return;
        };
        for grandchild in child.children().to_vec() {
            self.destroy_child_subtree(grandchild);
        }
        match child.parent() {
            Some(parent) => {
                if let Some(parent) = self.children.get_mut(&parent) {
                    parent.remove_child(id);
                }
            }
            None => {
                if let Some(view) = self.views.get_mut(&child.view()) {
                    view.remove_child(id);
                }
            }
        }
        debug!(child = %id, "View child destroyed");
    }

    /// Removes a child whose parent is being destroyed too.
    fn destroy_child_subtree(&mut self, id: ChildId) {
        self.signals.revoke_owner(Owner::Child(id));
        if let Some(child) = self.children.remove(&id) {
            for grandchild in child.children().to_vec() {
                self.destroy_child_subtree(grandchild);
            }
        }
    }

    /// Destroys a view, its children and its workspace membership.
    pub(crate) fn destroy_view(&mut self, id: ViewId) {
        self.signals.revoke_owner(Owner::View(id));
        let Some(view) = self.views.get_mut(&id) else {
            return;
        };
        view.unmap();
        let children = view.children().to_vec();
        let fullscreen_output = view.fullscreen_output();
        let workspace = view.workspace();
        let provider = view.provider_id();
        self.after_view_change(id);

        for child in children {
            self.destroy_child_subtree(child);
        }
        if let Some(output) = fullscreen_output {
            if let Ok(output) = self.output_mut(output) {
                if output.fullscreen_view() == Some(id) {
                    output.set_fullscreen_view(None);
                }
            }
        }
        let was_focused = self.workspace(workspace).is_some_and(|w| w.is_focused(id));
        if let Ok(ws) = self.workspace_mut(workspace) {
            ws.remove_view(id);
        }
        self.views.remove(&id);
        if self.provider_views.get(&provider) == Some(&id) {
            self.provider_views.remove(&provider);
        }
        if was_focused {
            self.focus_next(workspace, id);
        }
        debug!(view = %id, "View destroyed");
    }

    fn handle_layer_event(&mut self, id: LayerId, event: &SurfaceEvent) {
        match event {
            SurfaceEvent::Destroy => self.destroy_layer(id),
            SurfaceEvent::Map => {
                if let Some(layer) = self.layers.get_mut(&id) {
                    layer.set_mapped(true);
                }
                self.damage_layer(id);
            }
            SurfaceEvent::Unmap => {
                self.damage_layer(id);
                if let Some(layer) = self.layers.get_mut(&id) {
                    layer.set_mapped(false);
                }
            }
            SurfaceEvent::Commit { acked_serial } => {
                let Some(layer) = self.layers.get_mut(&id) else {
                    return;
                };
                layer.acknowledge(*acked_serial);
                let output = layer.output();
                if layer.refresh_state() {
                    self.arrange_output(output);
                }
                self.damage_layer(id);
            }
            SurfaceEvent::NewPopup(popup) => self.create_layer_popup(id, None, Rc::clone(popup)),
            other => trace!(layer = %id, signal = ?other.signal(), "Ignoring event on layer surface"),
        }
    }

    fn layer_layout_box(&self, id: LayerId) -> Option<Rect> {
        let layer = self.layers.get(&id)?;
        let output = self.output(layer.output())?.layout_box();
        Some(layer.geometry().translated(output.x, output.y))
    }

    fn damage_layer(&mut self, id: LayerId) {
        if let Some(rect) = self.layer_layout_box(id) {
            self.damage_layout_rect(rect);
        }
    }

    fn create_layer_popup(&mut self, layer: LayerId, parent: Option<LayerPopupId>, provider: Rc<dyn SurfaceProvider>) {
        let Some(layer_box) = self.layer_layout_box(layer) else {
            return;
        };
        let id = LayerPopupId::new_v4();
        match parent {
            Some(parent) => match self.layer_popups.get_mut(&parent) {
                Some(parent) => parent.add_child(id),
                None => return,
            },
            None => match self.layers.get_mut(&layer) {
                Some(surface) => surface.add_popup(id),
                None => return,
            },
        }
        self.signals.subscribe_all(
            provider.id(),
            &[Signal::Destroy, Signal::Map, Signal::Unmap, Signal::Commit, Signal::NewPopup],
            Owner::LayerPopup(id),
        );
        let popup = LayerPopup::new(id, layer, parent, provider);
        self.layer_popups.insert(id, popup);

        // Keep the popup on its output, relative to the surface it opens from.
        let output = self
            .layers
            .get(&layer)
            .and_then(|l| self.output(l.output()))
            .map(|o| o.layout_box());
        if let (Some(output), Some(origin)) = (output, self.layer_popup_parent_origin(id, layer_box)) {
            if let Some(popup) = self.layer_popups.get(&id) {
                popup.provider().unconstrain(output.translated(-origin.0, -origin.1));
            }
        }
        debug!(popup = %id, %layer, "Layer popup created");
    }

    fn layer_popup_parent_origin(&self, id: LayerPopupId, layer_box: Rect) -> Option<(i32, i32)> {
        let (mut x, mut y) = (layer_box.x, layer_box.y);
        let mut next = self.layer_popups.get(&id)?.parent();
        while let Some(parent) = next {
            let popup = self.layer_popups.get(&parent)?;
            let offset = popup.offset();
            x += offset.x;
            y += offset.y;
            next = popup.parent();
        }
        Some((x, y))
    }

    fn layer_popup_box(&self, id: LayerPopupId) -> Option<Rect> {
        let popup = self.layer_popups.get(&id)?;
        let layer_box = self.layer_layout_box(popup.layer())?;
        let (x, y) = self.layer_popup_parent_origin(id, layer_box)?;
        let offset = popup.offset();
        let size = popup.provider().committed_size();
        Some(Rect::new(x + offset.x, y + offset.y, size.width as i32, size.height as i32))
    }

    fn handle_layer_popup_event(&mut self, id: LayerPopupId, event: &SurfaceEvent) {
        match event {
            SurfaceEvent::Destroy => self.destroy_layer_popup(id),
            SurfaceEvent::Map | SurfaceEvent::Unmap => {
                let mapped = matches!(event, SurfaceEvent::Map);
                if let Some(popup) = self.layer_popups.get_mut(&id) {
                    popup.set_mapped(mapped);
                }
                self.damage_layer_popup(id);
            }
            SurfaceEvent::Commit { .. } => self.damage_layer_popup(id),
            SurfaceEvent::NewPopup(popup) => {
                if let Some(layer) = self.layer_popups.get(&id).map(LayerPopup::layer) {
                    self.create_layer_popup(layer, Some(id), Rc::clone(popup));
                }
            }
            other => trace!(popup = %id, signal = ?other.signal(), "Ignoring event on layer popup"),
        }
    }

    fn damage_layer_popup(&mut self, id: LayerPopupId) {
        if let Some(rect) = self.layer_popup_box(id) {
            self.damage_layout_rect(rect);
        }
    }

    fn destroy_layer_popup(&mut self, id: LayerPopupId) {
        self.damage_layer_popup(id);
        let Some(popup) = self.layer_popups.get(&id) else {
            return;
        };
        let (layer, parent) = (popup.layer(), popup.parent());
        self.destroy_layer_popup_subtree(id);
        match parent {
            Some(parent) => {
                if let Some(parent) = self.layer_popups.get_mut(&parent) {
                    parent.remove_child(id);
                }
            }
            None => {
                if let Some(layer) = self.layers.get_mut(&layer) {
                    layer.remove_popup(id);
                }
            }
        }
    }

    fn destroy_layer_popup_subtree(&mut self, id: LayerPopupId) {
        self.signals.revoke_owner(Owner::LayerPopup(id));
        if let Some(popup) = self.layer_popups.remove(&id) {
            for child in popup.children().to_vec() {
                self.destroy_layer_popup_subtree(child);
            }
        }
    }

    /// Destroys a layer surface and its popups, then re-arranges its output.
    pub(crate) fn destroy_layer(&mut self, id: LayerId) {
        let Some(output) = self.remove_layer(id) else {
            return;
        };
        self.arrange_output(output);
    }

    /// Tears down a layer surface without re-arranging. Returns its output.
    pub(crate) fn remove_layer(&mut self, id: LayerId) -> Option<OutputId> {
        self.damage_layer(id);
        self.signals.revoke_owner(Owner::Layer(id));
        let layer = self.layers.remove(&id)?;
        for popup in layer.popups().to_vec() {
            self.destroy_layer_popup_subtree(popup);
        }
        if let Ok(output) = self.output_mut(layer.output()) {
            output.remove_layer(id);
        }
        debug!(layer = %id, "Layer surface destroyed");
        Some(layer.output())
    }
}
