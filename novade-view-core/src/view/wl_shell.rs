//! Legacy shell backend.
//!
//! Resizes are advisory configures without a serial and apply immediately;
//! the next commit reports whatever size the client actually chose. The
//! protocol has no polite close, so closing disconnects the client.
//! Maximize and fullscreen are never pushed to the client; instead the client
//! reports its state asynchronously and the view follows it.

use tracing::debug;

use crate::provider::{Configure, SurfaceProvider, ToplevelState};
use crate::types::Size;

use super::backend::{ContentRequest, GeometryOutcome, ShellBackend};

#[derive(Debug, Default)]
pub struct WlShellSurface {}

impl WlShellSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShellBackend for WlShellSurface {
    fn do_resize(&mut self, provider: &dyn SurfaceProvider, content: ContentRequest) -> GeometryOutcome {
        provider.send_configure(&Configure {
            serial: None,
            position: None,
            size: Size::new(content.width, content.height),
            states: ToplevelState::empty(),
        });
        GeometryOutcome::Immediate {
            width: content.width,
            height: content.height,
        }
    }

    fn do_close(&mut self, provider: &dyn SurfaceProvider) {
        debug!(provider = %provider.id(), "wl_shell has no close request, terminating client");
        provider.terminate_client();
    }
}
