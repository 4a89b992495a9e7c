use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::DecorationConfig;
use crate::provider::{Serial, SurfaceProvider};
use crate::types::{ChildId, OutputId, ProviderId, Rect, Size, ViewId, WorkspaceId};

use super::backend::{AckOutcome, ContentRequest, GeometryOutcome, ViewBackend, ViewKind};

/// Position and size of a view's outer box in layout coordinates.
///
/// The outer box includes server-side decorations when the view is decorated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewGeometry {
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

impl ViewGeometry {
    pub fn new(x: f64, y: f64, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// The geometry as an integer box, truncating the position.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x as i32, self.y as i32, self.width as i32, self.height as i32)
    }
}

/// Geometry remembered before maximizing or going fullscreen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedGeometry {
    pub geometry: ViewGeometry,
    pub rotation: f32,
}

/// A move/resize waiting for the client to acknowledge its configure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMoveResize {
    pub update_x: bool,
    pub update_y: bool,
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

/// A top-level window managed by the compositor.
#[derive(Debug)]
pub struct View {
    id: ViewId,
    workspace: WorkspaceId,
    provider: Rc<dyn SurfaceProvider>,
    backend: ViewBackend,
    decoration: DecorationConfig,
    mapped: bool,
    active: bool,
    maximized: bool,
    decorated: bool,
    /// Set once the position was chosen before mapping.
    positioned: bool,
    geometry: ViewGeometry,
    rotation: f32,
    alpha: f32,
    fullscreen_output: Option<OutputId>,
    saved: Option<SavedGeometry>,
    pending_move_resize: Option<PendingMoveResize>,
    children: Vec<ChildId>,
    outputs: Vec<OutputId>,
    damage: Vec<Rect>,
}

impl View {
    pub(crate) fn new(
        id: ViewId,
        workspace: WorkspaceId,
        provider: Rc<dyn SurfaceProvider>,
        backend: ViewBackend,
        decoration: DecorationConfig,
    ) -> Self {
        Self {
            id,
            workspace,
            provider,
            backend,
            decoration,
            mapped: false,
            active: false,
            maximized: false,
            decorated: false,
            positioned: false,
            geometry: ViewGeometry::default(),
            rotation: 0.0,
            alpha: 1.0,
            fullscreen_output: None,
            saved: None,
            pending_move_resize: None,
            children: Vec::new(),
            outputs: Vec::new(),
            damage: Vec::new(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn kind(&self) -> ViewKind {
        self.backend.kind()
    }

    pub fn backend(&self) -> &ViewBackend {
        &self.backend
    }

    pub(crate) fn backend_mut(&mut self) -> &mut ViewBackend {
        &mut self.backend
    }

    pub fn provider(&self) -> &Rc<dyn SurfaceProvider> {
        &self.provider
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }

    pub fn workspace(&self) -> WorkspaceId {
        self.workspace
    }

    pub(crate) fn set_workspace(&mut self, workspace: WorkspaceId) {
        self.workspace = workspace;
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn is_decorated(&self) -> bool {
        self.decorated
    }

    pub fn geometry(&self) -> ViewGeometry {
        self.geometry
    }

    /// Whether the view got its position before it was first mapped.
    pub fn is_positioned(&self) -> bool {
        self.positioned
    }

    /// The outer box in layout coordinates.
    pub fn get_box(&self) -> Rect {
        self.geometry.to_rect()
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn fullscreen_output(&self) -> Option<OutputId> {
        self.fullscreen_output
    }

    pub fn saved_geometry(&self) -> Option<SavedGeometry> {
        self.saved
    }

    pub fn pending_move_resize(&self) -> Option<PendingMoveResize> {
        self.pending_move_resize
    }

    /// Serial of the configure the view is waiting on, for negotiated protocols.
    pub fn pending_configure_serial(&self) -> Option<Serial> {
        self.backend.shell_ref().outstanding_serial()
    }

    /// Direct children (popups and subsurfaces), oldest first.
    pub fn children(&self) -> &[ChildId] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: ChildId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: ChildId) {
        self.children.retain(|c| *c != child);
    }

    /// Outputs the view currently overlaps.
    pub fn outputs(&self) -> &[OutputId] {
        &self.outputs
    }

    pub fn border_width(&self) -> i32 {
        if self.decorated {
            self.decoration.border_width
        } else {
            0
        }
    }

    pub fn titlebar_height(&self) -> i32 {
        if self.decorated {
            self.decoration.titlebar_height
        } else {
            0
        }
    }

    /// Geometry the view is heading to: the pending move/resize if one is
    /// outstanding, the current geometry otherwise.
    pub fn effective_geometry(&self) -> ViewGeometry {
        match self.pending_move_resize {
            Some(pending) => ViewGeometry {
                x: if pending.update_x { pending.x } else { self.geometry.x },
                y: if pending.update_y { pending.y } else { self.geometry.y },
                width: pending.width,
                height: pending.height,
            },
            None => self.geometry,
        }
    }

    fn extents(&self) -> (u32, u32) {
        let border = self.border_width().max(0) as u32;
        let titlebar = self.titlebar_height().max(0) as u32;
        (2 * border, 2 * border + titlebar)
    }

    fn outer_size(&self, content: Size<u32>) -> (u32, u32) {
        let (dx, dy) = self.extents();
        (content.width + dx, content.height + dy)
    }

    fn content_request(&self, x: f64, y: f64, width: u32, height: u32) -> ContentRequest {
        let (dx, dy) = self.extents();
        let border = self.border_width() as f64;
        ContentRequest {
            x: x + border,
            y: y + border + self.titlebar_height() as f64,
            width: width.saturating_sub(dx),
            height: height.saturating_sub(dy),
        }
    }

    pub(crate) fn map(&mut self) {
        let committed = self.provider.committed_size();
        self.backend.shell().mapped(committed);
        let (width, height) = self.outer_size(committed);
        self.geometry.width = width;
        self.geometry.height = height;
        self.mapped = true;
        self.damage_whole();
        debug!(view = %self.id, kind = %self.kind(), width, height, "View mapped");
    }

    pub(crate) fn unmap(&mut self) {
        if !self.mapped {
            return;
        }
        self.damage_whole();
        self.mapped = false;
        self.pending_move_resize = None;
        debug!(view = %self.id, "View unmapped");
    }

    /// Places a view that is not mapped yet. Mapped views ignore this.
    pub(crate) fn place_unmapped(&mut self, x: f64, y: f64) {
        if self.mapped {
            return;
        }
        self.geometry.x = x;
        self.geometry.y = y;
        self.positioned = true;
    }

    /// Handles a client that configures its own window: `width` and
    /// `height` are content sizes.
    pub(crate) fn configure_requested(&mut self, x: f64, y: f64, width: u32, height: u32) {
        let (dx, dy) = self.extents();
        if self.mapped {
            self.move_resize(x, y, width + dx, height + dy);
            return;
        }
        self.place_unmapped(x, y);
        let content = self.content_request(x, y, width + dx, height + dy);
        self.backend.shell().do_move_resize(self.provider.as_ref(), content);
    }

    /// Moves the outer box. Applies immediately for every protocol.
    pub fn move_to(&mut self, x: f64, y: f64) {
        if !self.mapped || (x == self.geometry.x && y == self.geometry.y) {
            return;
        }
        let content = self.content_request(x, y, self.geometry.width, self.geometry.height);
        self.backend.shell().do_move(self.provider.as_ref(), content);
        self.update_position(x, y);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.mapped {
            return;
        }
        let (x, y) = (self.geometry.x, self.geometry.y);
        let content = self.content_request(x, y, width, height);
        let outcome = self.backend.shell().do_resize(self.provider.as_ref(), content);
        self.settle(
            outcome,
            PendingMoveResize {
                update_x: false,
                update_y: false,
                x,
                y,
                width,
                height,
            },
        );
    }

    pub fn move_resize(&mut self, x: f64, y: f64, width: u32, height: u32) {
        if !self.mapped {
            return;
        }
        let update_x = x != self.geometry.x;
        let update_y = y != self.geometry.y;
        if !update_x && !update_y {
            self.resize(width, height);
            return;
        }
        let content = self.content_request(x, y, width, height);
        let outcome = self.backend.shell().do_move_resize(self.provider.as_ref(), content);
        self.settle(
            outcome,
            PendingMoveResize {
                update_x,
                update_y,
                x,
                y,
                width,
                height,
            },
        );
    }

    fn settle(&mut self, outcome: GeometryOutcome, request: PendingMoveResize) {
        match outcome {
            GeometryOutcome::Immediate { width, height } => {
                let (dx, dy) = self.extents();
                self.pending_move_resize = None;
                self.update_position(request.x, request.y);
                self.update_size(width + dx, height + dy);
            }
            GeometryOutcome::Negotiated(serial) => {
                trace!(view = %self.id, ?serial, "Move/resize waits for acknowledgment");
                self.pending_move_resize = Some(request);
            }
            GeometryOutcome::Unchanged => {
                if self.backend.shell_ref().outstanding_serial().is_none() {
                    self.pending_move_resize = None;
                    self.update_position(request.x, request.y);
                } else {
                    self.pending_move_resize = Some(request);
                }
            }
        }
    }

    /// Handles a content commit from the provider.
    ///
    /// For negotiated protocols, a pending move/resize applies only once the
    /// commit acknowledges the outstanding configure. When the origin moves,
    /// the opposite edge stays anchored: the new position is the requested
    /// one shifted by the difference between requested and committed size.
    pub(crate) fn handle_commit(&mut self, acked: Option<Serial>) {
        if !self.mapped {
            return;
        }
        let committed = self.provider.committed_size();
        match self.backend.shell().acknowledge(acked, committed) {
            AckOutcome::Stale => {
                trace!(view = %self.id, ?acked, "Ignoring stale configure acknowledgment");
            }
            AckOutcome::Satisfied => {
                let (width, height) = self.outer_size(committed);
                if let Some(pending) = self.pending_move_resize.take() {
                    let mut x = self.geometry.x;
                    let mut y = self.geometry.y;
                    if pending.update_x {
                        x = pending.x + pending.width as f64 - width as f64;
                    }
                    if pending.update_y {
                        y = pending.y + pending.height as f64 - height as f64;
                    }
                    self.update_position(x, y);
                }
                self.update_size(width, height);
            }
            AckOutcome::NothingOutstanding => {
                let (width, height) = self.outer_size(committed);
                self.update_size(width, height);
            }
        }
        self.damage_whole();
    }

    fn update_position(&mut self, x: f64, y: f64) {
        if x == self.geometry.x && y == self.geometry.y {
            return;
        }
        self.damage_whole();
        self.geometry.x = x;
        self.geometry.y = y;
        self.damage_whole();
    }

    fn update_size(&mut self, width: u32, height: u32) {
        if width == self.geometry.width && height == self.geometry.height {
            return;
        }
        self.damage_whole();
        self.geometry.width = width;
        self.geometry.height = height;
        self.damage_whole();
    }

    /// Maximizes into `usable`, the usable area of the view's output in
    /// layout coordinates, or restores the saved geometry.
    pub(crate) fn maximize(&mut self, maximized: bool, usable: Rect) {
        if !self.mapped || self.maximized == maximized {
            return;
        }
        if maximized && self.fullscreen_output.is_some() {
            self.set_fullscreen(false, None);
        }
        self.backend.shell().do_maximize(self.provider.as_ref(), maximized);
        if maximized {
            self.saved = Some(SavedGeometry {
                geometry: self.effective_geometry(),
                rotation: self.rotation,
            });
            self.maximized = true;
            self.rotation = 0.0;
            self.arrange_maximized(usable);
        } else {
            self.maximized = false;
            self.restore_saved();
        }
    }

    /// Refits a maximized view to a changed usable area.
    pub(crate) fn arrange_maximized(&mut self, usable: Rect) {
        if !self.maximized {
            return;
        }
        self.move_resize(
            usable.x as f64,
            usable.y as f64,
            usable.width.max(0) as u32,
            usable.height.max(0) as u32,
        );
    }

    /// Enters fullscreen on `output` (its id and full layout box), or leaves it.
    ///
    /// Returns whether the fullscreen state changed.
    pub(crate) fn set_fullscreen(&mut self, fullscreen: bool, output: Option<(OutputId, Rect)>) -> bool {
        if !self.mapped || self.fullscreen_output.is_some() == fullscreen {
            return false;
        }
        if fullscreen {
            let Some((output_id, bounds)) = output else {
                return false;
            };
            if self.maximized {
                self.maximize(false, Rect::default());
            }
            self.backend.shell().do_set_fullscreen(self.provider.as_ref(), true);
            self.saved = Some(SavedGeometry {
                geometry: self.effective_geometry(),
                rotation: self.rotation,
            });
            self.rotation = 0.0;
            self.fullscreen_output = Some(output_id);
            self.move_resize(
                bounds.x as f64,
                bounds.y as f64,
                bounds.width.max(0) as u32,
                bounds.height.max(0) as u32,
            );
        } else {
            self.backend.shell().do_set_fullscreen(self.provider.as_ref(), false);
            self.fullscreen_output = None;
            self.restore_saved();
        }
        true
    }

    fn restore_saved(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.rotation = saved.rotation;
            let geometry = saved.geometry;
            self.move_resize(geometry.x, geometry.y, geometry.width, geometry.height);
        }
    }

    pub fn activate(&mut self, active: bool) {
        if !self.mapped || self.active == active {
            return;
        }
        self.active = active;
        self.backend.shell().do_activate(self.provider.as_ref(), active);
    }

    pub fn close(&mut self) {
        if !self.mapped {
            return;
        }
        debug!(view = %self.id, kind = %self.kind(), "Closing view");
        self.backend.shell().do_close(self.provider.as_ref());
    }

    /// Sets the rotation around the view's center, in radians.
    pub fn rotate(&mut self, rotation: f32) {
        if !self.mapped || self.rotation == rotation {
            return;
        }
        self.damage_whole();
        self.rotation = rotation;
        self.damage_whole();
    }

    /// Lowers the alpha by `step`, wrapping back to opaque below `min`.
    pub fn cycle_alpha(&mut self, step: f32, min: f32) {
        if !self.mapped {
            return;
        }
        self.alpha -= step;
        if self.alpha < min {
            self.alpha = 1.0;
        }
        self.damage_whole();
    }

    /// Toggles server-side decorations, keeping the content area in place.
    pub(crate) fn update_decorated(&mut self, decorated: bool) {
        if self.decorated == decorated {
            return;
        }
        if !self.mapped {
            self.decorated = decorated;
            return;
        }
        self.damage_whole();
        let (old_dx, old_dy) = self.extents();
        let old_left = self.border_width() as f64;
        let old_top = old_left + self.titlebar_height() as f64;
        self.decorated = decorated;
        let (dx, dy) = self.extents();
        let left = self.border_width() as f64;
        let top = left + self.titlebar_height() as f64;
        self.geometry.x += old_left - left;
        self.geometry.y += old_top - top;
        self.geometry.width = (self.geometry.width + dx).saturating_sub(old_dx);
        self.geometry.height = (self.geometry.height + dy).saturating_sub(old_dy);
        self.damage_whole();
    }

    /// Centers the view inside `area`.
    pub(crate) fn center_in(&mut self, area: Rect) {
        let x = area.x as f64 + (area.width as f64 - self.geometry.width as f64) / 2.0;
        let y = area.y as f64 + (area.height as f64 - self.geometry.height as f64) / 2.0;
        self.move_to(x.floor(), y.floor());
    }

    /// Converts layout coordinates into coordinates relative to the
    /// unrotated outer box.
    pub fn view_local(&self, lx: f64, ly: f64) -> (f64, f64) {
        let mut sx = lx - self.geometry.x;
        let mut sy = ly - self.geometry.y;
        if self.rotation != 0.0 {
            let half_w = self.geometry.width as f64 / 2.0;
            let half_h = self.geometry.height as f64 / 2.0;
            let (sin, cos) = (self.rotation as f64).sin_cos();
            let ox = sx - half_w;
            let oy = sy - half_h;
            sx = cos * ox + sin * oy + half_w;
            sy = cos * oy - sin * ox + half_h;
        }
        (sx, sy)
    }

    /// Recomputes which outputs the view overlaps and notifies the provider
    /// about outputs entered and left.
    pub(crate) fn update_outputs(&mut self, outputs: &[(OutputId, Rect)]) {
        let bounds = self.damage_box();
        let current: Vec<OutputId> = if self.mapped {
            outputs
                .iter()
                .filter(|(_, layout)| layout.intersects(&bounds))
                .map(|(id, _)| *id)
                .collect()
        } else {
            Vec::new()
        };
        for left in self.outputs.iter().filter(|id| !current.contains(id)) {
            self.provider.output_leave(*left);
        }
        for entered in current.iter().filter(|id| !self.outputs.contains(id)) {
            self.provider.output_enter(*entered);
        }
        self.outputs = current;
    }

    /// Bounding box of the outer box after rotation.
    pub fn damage_box(&self) -> Rect {
        let rect = self.get_box();
        if self.rotation == 0.0 {
            return rect;
        }
        let center = rect.center();
        let (sin, cos) = (self.rotation as f64).sin_cos();
        let half_w = rect.width as f64 / 2.0;
        let half_h = rect.height as f64 / 2.0;
        let extent_x = (half_w * cos).abs() + (half_h * sin).abs();
        let extent_y = (half_w * sin).abs() + (half_h * cos).abs();
        let x = (center.x - extent_x).floor() as i32;
        let y = (center.y - extent_y).floor() as i32;
        let right = (center.x + extent_x).ceil() as i32;
        let bottom = (center.y + extent_y).ceil() as i32;
        Rect::new(x, y, right - x, bottom - y)
    }

    fn damage_whole(&mut self) {
        if self.mapped {
            let rect = self.damage_box();
            self.damage.push(rect);
        }
    }

    /// Drains the damage accumulated since the last call.
    pub(crate) fn take_damage(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.damage)
    }
}
