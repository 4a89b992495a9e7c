//! Window-management operations and hit-testing.

use tracing::{debug, info};

use crate::error::{Result, ViewCoreError};
use crate::layer_shell::{arrange_layers, LayerState};
use crate::output::{DamageTracker, Output};
use crate::types::{ChildId, LayerId, OutputId, ProviderId, Rect, ViewId, WorkspaceId};
use crate::view::DecoPart;

use super::Desktop;

/// What a point on a view lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A client surface: the view itself, a popup or a subsurface.
    Surface(ProviderId),
    /// Server-side decoration of the view.
    Decoration(DecoPart),
}

/// Result of a hit-test. `sx`/`sy` are relative to the surface hit, or to
/// the view's outer box for decorations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub view: ViewId,
    pub target: HitTarget,
    pub sx: f64,
    pub sy: f64,
}

impl Desktop {
    /// Adds an output at `layout` and returns its id.
    pub fn add_output(&mut self, name: impl Into<String>, layout: Rect) -> OutputId {
        let mut output = Output::new(OutputId::new_v4(), name, layout);
        output.damage_whole();
        let id = output.id();
        info!(output = %id, name = output.name(), ?layout, "Output added");
        self.outputs.push(output);
        let views: Vec<ViewId> = self.views.keys().copied().collect();
        for view in views {
            self.after_view_change(view);
        }
        id
    }

    /// Removes an output. Views fullscreen on it return to their saved
    /// geometry, views maximized on it refit to the output they land on and
    /// its layer surfaces are closed and destroyed.
    pub fn remove_output(&mut self, id: OutputId) -> Result<()> {
        let layers = self
            .output(id)
            .ok_or(ViewCoreError::UnknownOutput(id))?
            .layers()
            .to_vec();

        let fullscreen: Vec<ViewId> = self
            .views
            .values()
            .filter(|v| v.fullscreen_output() == Some(id))
            .map(|v| v.id())
            .collect();
        for view in fullscreen {
            self.set_fullscreen(view, false, None)?;
        }
        let maximized: Vec<ViewId> = self
            .views
            .values()
            .filter(|v| v.is_maximized())
            .map(|v| v.id())
            .filter(|v| self.view_output(*v) == Some(id))
            .collect();

        for layer in layers {
            if let Some(surface) = self.layers.get(&layer) {
                surface.close();
            }
            self.remove_layer(layer);
        }

        self.outputs.retain(|o| o.id() != id);
        let views: Vec<ViewId> = self.views.keys().copied().collect();
        for view in views {
            self.after_view_change(view);
        }
        for view in maximized {
            match self.usable_area_for(view) {
                Ok(usable) => {
                    if let Some(view_ref) = self.views.get_mut(&view) {
                        view_ref.arrange_maximized(usable);
                    }
                    self.after_view_change(view);
                }
                Err(err) => debug!(%view, %err, "Maximized view left without an output"),
            }
        }
        info!(output = %id, "Output removed");
        Ok(())
    }

    /// Hands the damage accumulated on an output to the renderer.
    pub fn take_damage(&mut self, output: OutputId) -> Result<DamageTracker> {
        Ok(self.output_mut(output)?.take_damage())
    }

    /// Re-arranges the layer surfaces of an output.
    pub fn arrange_layers(&mut self, output: OutputId) -> Result<()> {
        if self.output(output).is_none() {
            return Err(ViewCoreError::UnknownOutput(output));
        }
        self.arrange_output(output);
        Ok(())
    }

    /// Places every layer surface of `output`, closes the ones that do not
    /// fit and refits maximized views when the usable area changed.
    pub(crate) fn arrange_output(&mut self, id: OutputId) {
        let Some(output) = self.output(id) else {
            return;
        };
        let full_area = output.local_box();
        let layout = output.layout_box();
        let surfaces: Vec<(LayerId, LayerState)> = output
            .layers()
            .iter()
            .filter_map(|layer| self.layers.get(layer))
            .map(|layer| (layer.id(), layer.state()))
            .collect();

        let arrangement = arrange_layers(full_area, &surfaces);

        for (layer, geometry) in &arrangement.placements {
            let Some(surface) = self.layers.get_mut(layer) else {
                continue;
            };
            let old = surface.geometry();
            if surface.place(*geometry) {
                self.damage_layout_rect(old.translated(layout.x, layout.y));
                self.damage_layout_rect(geometry.translated(layout.x, layout.y));
            }
        }
        for layer in &arrangement.rejected {
            if let Some(surface) = self.layers.get(layer) {
                surface.close();
            }
        }

        let changed = match self.output_mut(id) {
            Ok(output) => {
                let changed = output.set_usable_area(arrangement.usable_area);
                if changed {
                    output.damage_whole();
                }
                changed
            }
            Err(_) => false,
        };
        if changed {
            debug!(output = %id, usable_area = ?arrangement.usable_area, "Usable area changed");
            let usable = arrangement.usable_area.translated(layout.x, layout.y);
            let maximized: Vec<ViewId> = self
                .views
                .values()
                .filter(|v| v.is_maximized())
                .map(|v| v.id())
                .filter(|v| self.view_output(*v) == Some(id))
                .collect();
            for view in maximized {
                if let Some(view_ref) = self.views.get_mut(&view) {
                    view_ref.arrange_maximized(usable);
                }
                self.after_view_change(view);
            }
        }
    }

    /// Usable area of the view's output, in layout coordinates.
    fn usable_area_for(&self, id: ViewId) -> Result<Rect> {
        let output = self.view_output(id).ok_or(ViewCoreError::NoOutput)?;
        self.output(output)
            .map(Output::usable_area_in_layout)
            .ok_or(ViewCoreError::UnknownOutput(output))
    }

    pub fn move_view(&mut self, id: ViewId, x: f64, y: f64) -> Result<()> {
        self.view_mut(id)?.move_to(x, y);
        self.after_view_change(id);
        Ok(())
    }

    pub fn resize_view(&mut self, id: ViewId, width: u32, height: u32) -> Result<()> {
        self.view_mut(id)?.resize(width, height);
        self.after_view_change(id);
        Ok(())
    }

    pub fn move_resize_view(&mut self, id: ViewId, x: f64, y: f64, width: u32, height: u32) -> Result<()> {
        self.view_mut(id)?.move_resize(x, y, width, height);
        self.after_view_change(id);
        Ok(())
    }

    /// Maximizes a view into its output's usable area, or restores it.
    pub fn maximize(&mut self, id: ViewId, maximized: bool) -> Result<()> {
        let view = self.views.get(&id).ok_or(ViewCoreError::UnknownView(id))?;
        if view.is_maximized() == maximized {
            return Ok(());
        }
        let usable = if maximized {
            self.usable_area_for(id)?
        } else {
            Rect::default()
        };
        let fullscreen_before = view.fullscreen_output();
        self.view_mut(id)?.maximize(maximized, usable);
        self.release_fullscreen_output(id, fullscreen_before);
        self.after_view_change(id);
        Ok(())
    }

    /// Makes a view fullscreen on `output` (or its own output), or restores it.
    pub fn set_fullscreen(&mut self, id: ViewId, fullscreen: bool, output: Option<OutputId>) -> Result<()> {
        let view = self.views.get(&id).ok_or(ViewCoreError::UnknownView(id))?;
        let fullscreen_before = view.fullscreen_output();
        if !fullscreen {
            self.view_mut(id)?.set_fullscreen(false, None);
            self.release_fullscreen_output(id, fullscreen_before);
            self.after_view_change(id);
            return Ok(());
        }
        if fullscreen_before.is_some() {
            return Ok(());
        }

        let target = output
            .filter(|o| self.output(*o).is_some())
            .or_else(|| self.view_output(id))
            .ok_or(ViewCoreError::NoOutput)?;
        let (bounds, previous) = {
            let output = self.output(target).ok_or(ViewCoreError::UnknownOutput(target))?;
            (output.layout_box(), output.fullscreen_view())
        };
        if let Some(previous) = previous.filter(|p| *p != id) {
            debug!(output = %target, view = %previous, "Replacing fullscreen view");
            self.set_fullscreen(previous, false, None)?;
        }
        if self.view_mut(id)?.set_fullscreen(true, Some((target, bounds))) {
            self.output_mut(target)?.set_fullscreen_view(Some(id));
        }
        self.after_view_change(id);
        Ok(())
    }

    /// Clears the output's fullscreen slot if the view no longer holds it.
    fn release_fullscreen_output(&mut self, id: ViewId, before: Option<OutputId>) {
        let Some(before) = before else {
            return;
        };
        let still = self.views.get(&id).and_then(|v| v.fullscreen_output());
        if still == Some(before) {
            return;
        }
        if let Ok(output) = self.output_mut(before) {
            if output.fullscreen_view() == Some(id) {
                output.set_fullscreen_view(None);
            }
        }
    }

    /// Gives keyboard focus to a mapped view, deactivating the previous one.
    pub fn focus_view(&mut self, id: ViewId) -> Result<()> {
        let view = self.views.get(&id).ok_or(ViewCoreError::UnknownView(id))?;
        if !view.is_mapped() {
            return Ok(());
        }
        let workspace = view.workspace();
        let previous = self.workspace(workspace).and_then(|w| w.focused());
        if previous == Some(id) {
            return Ok(());
        }
        if let Some(previous) = previous {
            if let Some(previous) = self.views.get_mut(&previous) {
                previous.activate(false);
            }
        }
        self.view_mut(id)?.activate(true);
        self.workspace_mut(workspace)?.set_focused(Some(id));
        self.input.focus_changed(Some(id));
        debug!(view = %id, "View focused");
        Ok(())
    }

    /// Focuses the topmost mapped view of `workspace` other than `leaving`.
    pub(crate) fn focus_next(&mut self, workspace: WorkspaceId, leaving: ViewId) {
        let next = self.workspace(workspace).and_then(|w| {
            w.views()
                .iter()
                .rev()
                .copied()
                .find(|v| *v != leaving && self.views.get(v).is_some_and(|view| view.is_mapped()))
        });
        if let Some(view) = self.views.get_mut(&leaving) {
            view.activate(false);
        }
        match next {
            Some(next) => {
                if let Err(err) = self.focus_view(next) {
                    debug!(view = %next, %err, "Could not pass focus on");
                }
            }
            None => {
                if let Ok(ws) = self.workspace_mut(workspace) {
                    ws.set_focused(None);
                }
                self.input.focus_changed(None);
            }
        }
    }

    pub fn is_focused(&self, id: ViewId) -> bool {
        self.views
            .get(&id)
            .and_then(|v| self.workspace(v.workspace()))
            .is_some_and(|w| w.is_focused(id))
    }

    /// Asks the view's client to close it.
    pub fn close_view(&mut self, id: ViewId) -> Result<()> {
        self.view_mut(id)?.close();
        Ok(())
    }

    pub fn rotate_view(&mut self, id: ViewId, rotation: f32) -> Result<()> {
        self.view_mut(id)?.rotate(rotation);
        self.after_view_change(id);
        Ok(())
    }

    /// Steps the view's alpha down by the configured amount.
    pub fn cycle_alpha(&mut self, id: ViewId) -> Result<()> {
        let placement = self.config.placement;
        self.view_mut(id)?
            .cycle_alpha(placement.alpha_step, placement.min_alpha);
        self.after_view_change(id);
        Ok(())
    }

    /// Centers a view in its output's usable area. Returns `false` when
    /// there is no output to center on.
    pub fn center_view(&mut self, id: ViewId) -> Result<bool> {
        if !self.views.contains_key(&id) {
            return Err(ViewCoreError::UnknownView(id));
        }
        let usable = match self.usable_area_for(id) {
            Ok(usable) => usable,
            Err(ViewCoreError::NoOutput) => return Ok(false),
            Err(err) => return Err(err),
        };
        self.view_mut(id)?.center_in(usable);
        self.after_view_change(id);
        Ok(true)
    }

    /// Turns server-side decorations on or off.
    pub fn update_decorated(&mut self, id: ViewId, decorated: bool) -> Result<()> {
        self.view_mut(id)?.update_decorated(decorated);
        self.after_view_change(id);
        Ok(())
    }

    /// Moves a view to another workspace. Focus stays behind.
    pub fn move_view_to_workspace(&mut self, id: ViewId, workspace: WorkspaceId) -> Result<()> {
        if self.workspace(workspace).is_none() {
            return Err(ViewCoreError::UnknownWorkspace(workspace));
        }
        let current = self.views.get(&id).ok_or(ViewCoreError::UnknownView(id))?.workspace();
        if current == workspace {
            return Ok(());
        }
        let was_focused = self.is_focused(id);
        self.workspace_mut(current)?.remove_view(id);
        self.workspace_mut(workspace)?.add_view(id);
        self.view_mut(id)?.set_workspace(workspace);
        if was_focused {
            self.focus_next(current, id);
        }
        debug!(view = %id, %workspace, "View moved to workspace");
        Ok(())
    }

    /// Decoration part of a view under a layout point.
    pub fn deco_part_at(&self, id: ViewId, lx: f64, ly: f64) -> Result<DecoPart> {
        let view = self.views.get(&id).ok_or(ViewCoreError::UnknownView(id))?;
        let (sx, sy) = view.view_local(lx, ly);
        Ok(view.get_deco_part(sx, sy))
    }

    /// Topmost surface of the current workspace under a layout point.
    pub fn surface_at(&self, lx: f64, ly: f64) -> Option<SurfaceHit> {
        let workspace = self.workspace(self.current_workspace)?;
        workspace
            .views()
            .iter()
            .rev()
            .find_map(|view| self.view_surface_at(*view, lx, ly))
    }

    /// Topmost surface of one view under a layout point. Children are tested
    /// before the view itself, most recently created first.
    pub fn view_surface_at(&self, id: ViewId, lx: f64, ly: f64) -> Option<SurfaceHit> {
        let view = self.views.get(&id).filter(|v| v.is_mapped())?;
        let (sx, sy) = view.view_local(lx, ly);
        let border = view.border_width() as f64;
        let top = border + view.titlebar_height() as f64;
        let (cx, cy) = (sx - border, sy - top);

        if let Some(hit) = view.children().iter().rev().find_map(|child| self.child_at(id, *child, cx, cy)) {
            return Some(hit);
        }

        let content = view.content_box();
        if cx >= 0.0 && cy >= 0.0 && cx < content.width as f64 && cy < content.height as f64 {
            return Some(SurfaceHit {
                view: id,
                target: HitTarget::Surface(view.provider_id()),
                sx: cx,
                sy: cy,
            });
        }
        let geometry = view.geometry();
        if sx >= 0.0 && sy >= 0.0 && sx < geometry.width as f64 && sy < geometry.height as f64 {
            return Some(SurfaceHit {
                view: id,
                target: HitTarget::Decoration(view.get_deco_part(sx, sy)),
                sx,
                sy,
            });
        }
        None
    }

    /// Hit-tests a child subtree. `px`/`py` are relative to the child's parent surface.
    fn child_at(&self, view: ViewId, id: ChildId, px: f64, py: f64) -> Option<SurfaceHit> {
        let child = self.children.get(&id)?;
        let offset = child.offset();
        let (cx, cy) = (px - offset.x as f64, py - offset.y as f64);
        if let Some(hit) = child
            .children()
            .iter()
            .rev()
            .find_map(|grandchild| self.child_at(view, *grandchild, cx, cy))
        {
            return Some(hit);
        }
        if !child.is_mapped() {
            return None;
        }
        let size = child.provider().committed_size();
        if cx >= 0.0 && cy >= 0.0 && cx < size.width as f64 && cy < size.height as f64 {
            return Some(SurfaceHit {
                view,
                target: HitTarget::Surface(child.provider_id()),
                sx: cx,
                sy: cy,
            });
        }
        None
    }
}
