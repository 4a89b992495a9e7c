//! Negotiated shell backend, covering both protocol generations.
//!
//! Every size or state change goes out as a configure with a fresh serial.
//! The view only applies the new geometry once the client acknowledges that
//! serial (or a later one) on a commit.

use tracing::trace;

use crate::provider::{
    Configure, DecorationMode, Serial, SerialCounter, ShellGeneration, SurfaceProvider, ToplevelState,
};
use crate::types::Size;

use super::backend::{AckOutcome, ContentRequest, GeometryOutcome, ShellBackend, ViewKind};

#[derive(Debug)]
pub struct XdgShellSurface {
    generation: ShellGeneration,
    serials: SerialCounter,
    states: ToplevelState,
    requested_size: Option<Size<u32>>,
    pending_configure_serial: Option<Serial>,
    decoration_mode: Option<DecorationMode>,
}

impl XdgShellSurface {
    pub fn new(generation: ShellGeneration) -> Self {
        Self {
            generation,
            serials: SerialCounter::new(),
            states: ToplevelState::empty(),
            requested_size: None,
            pending_configure_serial: None,
            decoration_mode: None,
        }
    }

    pub fn kind(&self) -> ViewKind {
        match self.generation {
            ShellGeneration::Unstable => ViewKind::XdgShellV6,
            ShellGeneration::Stable => ViewKind::XdgShell,
        }
    }

    pub fn generation(&self) -> ShellGeneration {
        self.generation
    }

    pub fn states(&self) -> ToplevelState {
        self.states
    }

    pub fn decoration_mode(&self) -> Option<DecorationMode> {
        self.decoration_mode
    }

    /// Records the mode negotiated with the client. Only the stable
    /// generation has a decoration protocol.
    pub fn set_decoration_mode(&mut self, mode: DecorationMode) -> bool {
        if self.generation != ShellGeneration::Stable {
            return false;
        }
        self.decoration_mode = Some(mode);
        true
    }

    fn configure(&mut self, provider: &dyn SurfaceProvider, size: Size<u32>) -> Serial {
        let serial = self.serials.next_serial();
        provider.send_configure(&Configure {
            serial: Some(serial),
            position: None,
            size,
            states: self.states,
        });
        self.requested_size = Some(size);
        serial
    }

    fn current_size(&self, provider: &dyn SurfaceProvider) -> Size<u32> {
        self.requested_size.unwrap_or_else(|| provider.committed_size())
    }

    fn set_state(&mut self, provider: &dyn SurfaceProvider, state: ToplevelState, enabled: bool) {
        if self.states.contains(state) == enabled {
            return;
        }
        self.states.set(state, enabled);
        let size = self.current_size(provider);
        let serial = self.configure(provider, size);
        self.pending_configure_serial = Some(serial);
    }
}

impl ShellBackend for XdgShellSurface {
    fn mapped(&mut self, size: Size<u32>) {
        self.requested_size = Some(size);
    }

    fn do_activate(&mut self, provider: &dyn SurfaceProvider, active: bool) {
        if self.states.contains(ToplevelState::ACTIVATED) == active {
            return;
        }
        self.states.set(ToplevelState::ACTIVATED, active);
        let size = self.current_size(provider);
        self.configure(provider, size);
    }

    fn do_resize(&mut self, provider: &dyn SurfaceProvider, content: ContentRequest) -> GeometryOutcome {
        let (width, height) = provider.size_constraints().apply(content.width, content.height);
        let size = Size::new(width, height);
        if self.requested_size == Some(size) {
            return GeometryOutcome::Unchanged;
        }
        let serial = self.configure(provider, size);
        self.pending_configure_serial = Some(serial);
        GeometryOutcome::Negotiated(serial)
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

    fn acknowledge(&mut self, acked: Option<Serial>, committed: Size<u32>) -> AckOutcome {
        let Some(pending) = self.pending_configure_serial else {
            self.requested_size = Some(committed);
            return AckOutcome::NothingOutstanding;
        };
        match acked {
            Some(serial) if serial >= pending => {
                self.pending_configure_serial = None;
                self.requested_size = Some(committed);
                AckOutcome::Satisfied
            }
            _ => {
                trace!(?acked, ?pending, "Commit predates outstanding configure");
                AckOutcome::Stale
            }
        }
    }

    fn outstanding_serial(&self) -> Option<Serial> {
        self.pending_configure_serial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderId;
    use std::cell::RefCell;

    #[derive(Debug, Default)]
    struct Recorder {
        configures: RefCell<Vec<Configure>>,
        closed: RefCell<bool>,
    }

    impl SurfaceProvider for Recorder {
        fn id(&self) -> ProviderId {
            ProviderId(1)
        }
        fn committed_size(&self) -> Size<u32> {
            Size::new(100, 100)
        }
        fn send_configure(&self, configure: &Configure) {
            self.configures.borrow_mut().push(*configure);
        }
        fn send_close(&self) {
            *self.closed.borrow_mut() = true;
        }
        fn terminate_client(&self) {}
    }

    fn request(width: u32, height: u32) -> ContentRequest {
        ContentRequest { x: 0.0, y: 0.0, width, height }
    }

    #[test]
    fn resize_sends_increasing_serials() {
        let provider = Recorder::default();
        let mut surface = XdgShellSurface::new(ShellGeneration::Stable);
        surface.mapped(Size::new(100, 100));

        let first = surface.do_resize(&provider, request(200, 100));
        let second = surface.do_resize(&provider, request(300, 100));

        match (first, second) {
            (GeometryOutcome::Negotiated(a), GeometryOutcome::Negotiated(b)) => assert!(b > a),
            other => panic!("expected negotiated outcomes, got {other:?}"),
        }
        assert_eq!(surface.do_resize(&provider, request(300, 100)), GeometryOutcome::Unchanged);
        assert_eq!(provider.configures.borrow().len(), 2);
    }

    #[test]
    fn stale_ack_keeps_request_outstanding() {
        let provider = Recorder::default();
        let mut surface = XdgShellSurface::new(ShellGeneration::Unstable);
        surface.mapped(Size::new(100, 100));
        surface.do_resize(&provider, request(200, 100));
        let GeometryOutcome::Negotiated(latest) = surface.do_resize(&provider, request(300, 100)) else {
            panic!("expected a configure");
        };

        assert_eq!(surface.acknowledge(Some(Serial(latest.0 - 1)), Size::new(200, 100)), AckOutcome::Stale);
        assert_eq!(surface.outstanding_serial(), Some(latest));
        assert_eq!(surface.acknowledge(Some(latest), Size::new(300, 100)), AckOutcome::Satisfied);
        assert_eq!(surface.outstanding_serial(), None);
    }

    #[test]
    fn activation_is_carried_in_states() {
        let provider = Recorder::default();
        let mut surface = XdgShellSurface::new(ShellGeneration::Stable);
        surface.do_activate(&provider, true);
        surface.do_activate(&provider, true);

        let configures = provider.configures.borrow();
        assert_eq!(configures.len(), 1);
        assert!(configures[0].states.contains(ToplevelState::ACTIVATED));
        assert_eq!(surface.outstanding_serial(), None);
    }

    #[test]
    fn close_is_polite_and_decoration_needs_stable() {
        let provider = Recorder::default();
        let mut unstable = XdgShellSurface::new(ShellGeneration::Unstable);
        unstable.do_close(&provider);
        assert!(*provider.closed.borrow());
        assert!(!unstable.set_decoration_mode(DecorationMode::ServerSide));
        assert!(XdgShellSurface::new(ShellGeneration::Stable).set_decoration_mode(DecorationMode::ServerSide));
    }
}
