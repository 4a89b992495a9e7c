//! Backend for windows of the legacy remote display protocol bridge.
//!
//! These clients position themselves, so every configure carries an absolute
//! position, and geometry applies as soon as it is requested.

use crate::provider::{Configure, SurfaceProvider, ToplevelState};
use crate::types::{Point, Size};

use super::backend::{ContentRequest, GeometryOutcome, ShellBackend};

#[derive(Debug, Default)]
pub struct XwaylandSurface {
    states: ToplevelState,
    last: Option<ContentRequest>,
}

impl XwaylandSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> ToplevelState {
        self.states
    }

    fn configure(&mut self, provider: &dyn SurfaceProvider, content: ContentRequest) {
        provider.send_configure(&Configure {
            serial: None,
            position: Some(Point::new(content.x as i32, content.y as i32)),
            size: Size::new(content.width, content.height),
            states: self.states,
        });
        self.last = Some(content);
    }

    fn set_state(&mut self, provider: &dyn SurfaceProvider, state: ToplevelState, enabled: bool) {
        if self.states.contains(state) == enabled {
            return;
        }
        self.states.set(state, enabled);
        if let Some(last) = self.last {
            self.configure(provider, last);
        }
    }
}

impl ShellBackend for XwaylandSurface {
    fn do_activate(&mut self, provider: &dyn SurfaceProvider, active: bool) {
        self.set_state(provider, ToplevelState::ACTIVATED, active);
    }

    fn do_move(&mut self, provider: &dyn SurfaceProvider, content: ContentRequest) {
        self.configure(provider, content);
    }

    fn do_resize(&mut self, provider: &dyn SurfaceProvider, content: ContentRequest) -> GeometryOutcome {
        let (width, height) = provider.size_constraints().apply(content.width, content.height);
        self.configure(provider, ContentRequest { width, height, ..content });
        GeometryOutcome::Immediate { width, height }
    }

    fn do_maximize(&mut self, provider: &dyn SurfaceProvider, maximized: bool) {
        self.set_state(provider, ToplevelState::MAXIMIZED, maximized);
    }

    fn do_set_fullscreen(&mut self, provider: &dyn SurfaceProvider, fullscreen: bool) {
        self.set_state(provider, ToplevelState::FULLSCREEN, fullscreen);
    }

    fn do_close(&mut self, provider: &dyn SurfaceProvider) {
        provider.send_close();
    }
}
