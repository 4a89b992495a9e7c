//! The desktop: owner of every view, child surface, layer surface, output
//! and workspace.
//!
//! All objects live in arenas keyed by typed ids. The protocol layer reports
//! new surfaces through the `new_*` constructors and feeds every lifecycle
//! event to [`Desktop::dispatch`], which routes it to the owners subscribed
//! to that provider's signal. Window-management operations address objects by
//! id and return [`ViewCoreError`](crate::error::ViewCoreError) for ids that
//! no longer resolve, since client-driven events may destroy an object at any
//! dispatch.

mod handlers;
mod operations;

use std::collections::HashMap;
use std::fmt;

use tracing::info;

use crate::config::ViewCoreConfig;
use crate::error::{Result, ViewCoreError};
use crate::input::InputCollaborator;
use crate::layer_shell::{LayerPopup, LayerSurface};
use crate::output::Output;
use crate::signal::SignalRegistry;
use crate::types::{ChildId, LayerId, LayerPopupId, OutputId, ProviderId, Rect, ViewId, WorkspaceId};
use crate::view::{View, ViewChild};
use crate::workspace::Workspace;

pub use operations::{HitTarget, SurfaceHit};

/// Subscriber identity in the signal registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    View(ViewId),
    Child(ChildId),
    Layer(LayerId),
    LayerPopup(LayerPopupId),
}

pub struct Desktop {
    config: ViewCoreConfig,
    views: HashMap<ViewId, View>,
    children: HashMap<ChildId, ViewChild>,
    layers: HashMap<LayerId, LayerSurface>,
    layer_popups: HashMap<LayerPopupId, LayerPopup>,
    /// Outputs in the order they were added.
    outputs: Vec<Output>,
    workspaces: Vec<Workspace>,
    current_workspace: WorkspaceId,
    provider_views: HashMap<ProviderId, ViewId>,
    signals: SignalRegistry<Owner>,
    input: Box<dyn InputCollaborator>,
}

impl fmt::Debug for Desktop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Desktop")
            .field("views", &self.views.len())
            .field("children", &self.children.len())
            .field("layers", &self.layers.len())
            .field("layer_popups", &self.layer_popups.len())
            .field("outputs", &self.outputs.len())
            .field("workspaces", &self.workspaces.len())
            .field("subscriptions", &self.signals.len())
            .finish()
    }
}

impl Desktop {
    /// Creates a desktop with a single workspace named "1".
    pub fn new(config: ViewCoreConfig, input: Box<dyn InputCollaborator>) -> Self {
        let workspace = Workspace::new(WorkspaceId::new_v4(), "1");
        let current_workspace = workspace.id();
        info!(workspace = %current_workspace, "Desktop created");
        Self {
            config,
            views: HashMap::new(),
            children: HashMap::new(),
            layers: HashMap::new(),
            layer_popups: HashMap::new(),
            outputs: Vec::new(),
            workspaces: vec![workspace],
            current_workspace,
            provider_views: HashMap::new(),
            signals: SignalRegistry::new(),
            input,
        }
    }

    pub fn config(&self) -> &ViewCoreConfig {
        &self.config
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    /// The view backed by `provider`, if any.
    pub fn view_for_provider(&self, provider: ProviderId) -> Option<ViewId> {
        self.provider_views.get(&provider).copied()
    }

    pub fn child(&self, id: ChildId) -> Option<&ViewChild> {
        self.children.get(&id)
    }

    pub fn layer(&self, id: LayerId) -> Option<&LayerSurface> {
        self.layers.get(&id)
    }

    pub fn layer_popup(&self, id: LayerPopupId) -> Option<&LayerPopup> {
        self.layer_popups.get(&id)
    }

    pub fn output(&self, id: OutputId) -> Option<&Output> {
        self.outputs.iter().find(|o| o.id() == id)
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn workspace(&self, id: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id() == id)
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn current_workspace(&self) -> WorkspaceId {
        self.current_workspace
    }

    /// Number of live subscriptions, across all owners.
    pub fn subscription_count(&self) -> usize {
        self.signals.len()
    }

    /// Whether `owner` still holds subscriptions.
    pub fn is_subscribed(&self, owner: Owner) -> bool {
        self.signals.has_owner(owner)
    }

    pub fn add_workspace(&mut self, name: impl Into<String>) -> WorkspaceId {
        let workspace = Workspace::new(WorkspaceId::new_v4(), name);
        let id = workspace.id();
        self.workspaces.push(workspace);
        id
    }

    /// Makes `workspace` the one new views are created on.
    pub fn switch_workspace(&mut self, workspace: WorkspaceId) -> Result<()> {
        if self.workspace(workspace).is_none() {
            return Err(ViewCoreError::UnknownWorkspace(workspace));
        }
        self.current_workspace = workspace;
        Ok(())
    }

    pub(crate) fn view_mut(&mut self, id: ViewId) -> Result<&mut View> {
        self.views.get_mut(&id).ok_or(ViewCoreError::UnknownView(id))
    }

    pub(crate) fn output_mut(&mut self, id: OutputId) -> Result<&mut Output> {
        self.outputs
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or(ViewCoreError::UnknownOutput(id))
    }

    pub(crate) fn workspace_mut(&mut self, id: WorkspaceId) -> Result<&mut Workspace> {
        self.workspaces
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or(ViewCoreError::UnknownWorkspace(id))
    }

    /// The output a view belongs to: the one under its center, else the
    /// first one it overlaps, else the first output.
    pub fn view_output(&self, id: ViewId) -> Option<OutputId> {
        let view = self.views.get(&id)?;
        let center = view.get_box().center();
        self.outputs
            .iter()
            .find(|o| o.layout_box().contains_point(center.x, center.y))
            .map(Output::id)
            .or_else(|| view.outputs().first().copied())
            .or_else(|| self.outputs.first().map(Output::id))
    }

    /// Layout boxes of all outputs, for enter/leave tracking.
    fn output_boxes(&self) -> Vec<(OutputId, Rect)> {
        self.outputs.iter().map(|o| (o.id(), o.layout_box())).collect()
    }

    /// Moves damage accumulated by a view onto the outputs and refreshes
    /// the set of outputs it overlaps.
    pub(crate) fn after_view_change(&mut self, id: ViewId) {
        let boxes = self.output_boxes();
        let Some(view) = self.views.get_mut(&id) else {
            return;
        };
        view.update_outputs(&boxes);
        let damage = view.take_damage();
        for rect in damage {
            for output in &mut self.outputs {
                output.damage_layout_rect(rect);
            }
        }
    }

    /// Damages `rect`, in layout coordinates, on every output it touches.
    pub(crate) fn damage_layout_rect(&mut self, rect: Rect) {
        for output in &mut self.outputs {
            output.damage_layout_rect(rect);
        }
    }
}
