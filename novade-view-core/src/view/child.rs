use std::rc::Rc;

use crate::provider::SurfaceProvider;
use crate::types::{ChildId, Point, ProviderId, ViewId};

/// Role of a child surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Subsurface,
    Popup,
}

/// A popup or subsurface attached to a view, or nested under another child.
///
/// A child's position is the offset reported by its provider relative to
/// its parent surface.
#[derive(Debug)]
pub struct ViewChild {
    id: ChildId,
    view: ViewId,
    parent: Option<ChildId>,
    provider: Rc<dyn SurfaceProvider>,
    kind: ChildKind,
    children: Vec<ChildId>,
    mapped: bool,
}

impl ViewChild {
    pub(crate) fn new(
        id: ChildId,
        view: ViewId,
        parent: Option<ChildId>,
        provider: Rc<dyn SurfaceProvider>,
        kind: ChildKind,
    ) -> Self {
        Self {
            id,
            view,
            parent,
            provider,
            kind,
            children: Vec::new(),
            // Subsurfaces are visible with their parent; popups wait for a map.
            mapped: kind == ChildKind::Subsurface,
        }
    }

    pub fn id(&self) -> ChildId {
        self.id
    }

    /// The view at the root of this child's tree.
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// The parent child, or `None` when attached directly to the view.
    pub fn parent(&self) -> Option<ChildId> {
        self.parent
    }

    pub fn provider(&self) -> &Rc<dyn SurfaceProvider> {
        &self.provider
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }

    pub fn kind(&self) -> ChildKind {
        self.kind
    }

    pub fn children(&self) -> &[ChildId] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: ChildId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: ChildId) {
        self.children.retain(|c| *c != child);
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub(crate) fn set_mapped(&mut self, mapped: bool) {
        self.mapped = mapped;
    }

    pub fn offset(&self) -> Point<i32> {
        self.provider.offset()
    }
}
