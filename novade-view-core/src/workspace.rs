//! Workspaces: ordered view collections with one focused view each.

use crate::types::{ViewId, WorkspaceId};

#[derive(Debug)]
pub struct Workspace {
    id: WorkspaceId,
    name: String,
    /// Views in stacking order, bottom first.
    views: Vec<ViewId>,
    focused: Option<ViewId>,
}

impl Workspace {
    pub(crate) fn new(id: WorkspaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            views: Vec::new(),
            focused: None,
        }
    }

    pub fn id(&self) -> WorkspaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn views(&self) -> &[ViewId] {
        &self.views
    }

    pub fn contains(&self, view: ViewId) -> bool {
        self.views.contains(&view)
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.focused
    }

    pub fn is_focused(&self, view: ViewId) -> bool {
        self.focused == Some(view)
    }

    pub(crate) fn add_view(&mut self, view: ViewId) {
        if !self.views.contains(&view) {
            self.views.push(view);
        }
    }

    /// Removes `view`, dropping focus if it held it.
    pub(crate) fn remove_view(&mut self, view: ViewId) {
        self.views.retain(|v| *v != view);
        if self.focused == Some(view) {
            self.focused = None;
        }
    }

    /// Focuses `view` and raises it to the top of the stack.
    pub(crate) fn set_focused(&mut self, view: Option<ViewId>) {
        if let Some(view) = view {
            if let Some(index) = self.views.iter().position(|v| *v == view) {
                let view = self.views.remove(index);
                self.views.push(view);
            }
        }
        self.focused = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focusing_raises_and_removal_clears() {
        let mut workspace = Workspace::new(WorkspaceId::new_v4(), "1");
        let a = ViewId::new_v4();
        let b = ViewId::new_v4();
        workspace.add_view(a);
        workspace.add_view(b);
        workspace.add_view(a);

        workspace.set_focused(Some(a));
        assert_eq!(workspace.views(), &[b, a]);
        assert!(workspace.is_focused(a));

        workspace.remove_view(a);
        assert_eq!(workspace.focused(), None);
        assert_eq!(workspace.views(), &[b]);
    }
}
