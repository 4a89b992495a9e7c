//! The surface provider capability consumed from the protocol layer.
//!
//! The view core never decodes wire messages. Each on-screen surface is backed
//! by a [`SurfaceProvider`] supplied by the protocol layer, which reports
//! lifecycle changes as [`SurfaceEvent`]s through
//! [`Desktop::dispatch`](crate::desktop::Desktop::dispatch) and accepts
//! configure, close and termination requests.

use bitflags::bitflags;
use std::fmt;
use std::rc::Rc;

use crate::input::ResizeEdges;
use crate::layer_shell::LayerState;
use crate::signal::Signal;
use crate::types::{OutputId, Point, ProviderId, Rect, SeatHandle, Size};

/// Token pairing a configure request with its acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Serial(pub u32);

/// Monotonic source of configure serials. Zero is never handed out.
#[derive(Debug, Default)]
pub struct SerialCounter {
    last: u32,
}

impl SerialCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_serial(&mut self) -> Serial {
        self.last = self.last.wrapping_add(1);
        if self.last == 0 {
            self.last = 1;
        }
        Serial(self.last)
    }
}

bitflags! {
    /// Toplevel states carried by a configure request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ToplevelState: u32 {
        const MAXIMIZED = 1;
        const FULLSCREEN = 2;
        const ACTIVATED = 4;
        const RESIZING = 8;
    }
}

/// A configuration request sent to a surface provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configure {
    /// Present for negotiated protocols, which acknowledge it on a later commit.
    pub serial: Option<Serial>,
    /// Absolute position, only sent to clients that position themselves.
    pub position: Option<Point<i32>>,
    pub size: Size<u32>,
    pub states: ToplevelState,
}

/// Client-declared size limits. Zero means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeConstraints {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl SizeConstraints {
    /// Clamps a requested size into the declared limits.
    pub fn apply(&self, width: u32, height: u32) -> (u32, u32) {
        let clamp = |value: u32, min: u32, max: u32| {
            let value = value.max(min);
            if max > 0 {
                value.min(max)
            } else {
                value
            }
        };
        (
            clamp(width, self.min_width, self.max_width),
            clamp(height, self.min_height, self.max_height),
        )
    }
}

/// Decoration mode requested by a negotiated-shell client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationMode {
    ClientSide,
    ServerSide,
}

/// State reported asynchronously by a legacy-shell surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyState {
    Toplevel,
    Maximized,
    Fullscreen { output: Option<OutputId> },
    Transient,
    Popup,
}

/// Role a legacy-shell surface has when it is first announced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegacyRole {
    Toplevel,
    /// Placed relative to `parent` at creation time.
    Transient { parent: ProviderId, x: i32, y: i32 },
    /// Popups arrive through their parent's `NewPopup` signal instead.
    Popup,
}

/// Generation of the negotiated shell protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellGeneration {
    Unstable,
    Stable,
}

/// Lifecycle events reported by the protocol layer for one provider.
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    Destroy,
    Map,
    Unmap,
    /// New content was committed. `acked_serial` is the latest configure
    /// serial the client acknowledged, for protocols that negotiate.
    Commit { acked_serial: Option<Serial> },
    NewPopup(Rc<dyn SurfaceProvider>),
    NewSubsurface(Rc<dyn SurfaceProvider>),
    RequestMove { seat: SeatHandle },
    RequestResize { seat: SeatHandle, edges: ResizeEdges },
    RequestMaximize { maximized: bool },
    RequestFullscreen { fullscreen: bool, output: Option<OutputId> },
    RequestConfigure { x: i32, y: i32, width: u32, height: u32 },
    RequestDecorationMode(DecorationMode),
    SetState(LegacyState),
}

impl SurfaceEvent {
    /// The signal this event is delivered on.
    pub fn signal(&self) -> Signal {
        match self {
            SurfaceEvent::Destroy => Signal::Destroy,
            SurfaceEvent::Map => Signal::Map,
            SurfaceEvent::Unmap => Signal::Unmap,
            SurfaceEvent::Commit { .. } => Signal::Commit,
            SurfaceEvent::NewPopup(_) => Signal::NewPopup,
            SurfaceEvent::NewSubsurface(_) => Signal::NewSubsurface,
            SurfaceEvent::RequestMove { .. } => Signal::RequestMove,
            SurfaceEvent::RequestResize { .. } => Signal::RequestResize,
            SurfaceEvent::RequestMaximize { .. } => Signal::RequestMaximize,
            SurfaceEvent::RequestFullscreen { .. } => Signal::RequestFullscreen,
            SurfaceEvent::RequestConfigure { .. } => Signal::RequestConfigure,
            SurfaceEvent::RequestDecorationMode(_) => Signal::RequestDecorationMode,
            SurfaceEvent::SetState(_) => Signal::SetState,
        }
    }
}

/// One on-screen surface as exposed by the protocol layer.
pub trait SurfaceProvider: fmt::Debug {
    fn id(&self) -> ProviderId;

    /// Size of the most recently committed content.
    fn committed_size(&self) -> Size<u32>;

    fn send_configure(&self, configure: &Configure);

    /// Asks the client to close the surface.
    fn send_close(&self);

    /// Disconnects the owning client.
    fn terminate_client(&self);

    fn size_constraints(&self) -> SizeConstraints {
        SizeConstraints::default()
    }

    /// Position relative to the parent surface, for popups and subsurfaces.
    fn offset(&self) -> Point<i32> {
        Point::new(0, 0)
    }

    /// Subsurfaces that already exist when the surface is mapped.
    fn subsurfaces(&self) -> Vec<Rc<dyn SurfaceProvider>> {
        Vec::new()
    }

    /// Constrains a popup to `bounds`, given relative to its parent.
    fn unconstrain(&self, _bounds: Rect) {}

    fn output_enter(&self, _output: OutputId) {}

    fn output_leave(&self, _output: OutputId) {}
}

/// A layer-shell surface: a provider that also declares anchoring state.
pub trait LayerProvider: SurfaceProvider {
    /// The currently committed layer, anchors, margins and exclusive zone.
    fn layer_state(&self) -> LayerState;

    /// The output requested by the client, if any.
    fn requested_output(&self) -> Option<OutputId> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serials_increase_and_skip_zero() {
        let mut counter = SerialCounter { last: u32::MAX - 1 };
        assert_eq!(counter.next_serial(), Serial(u32::MAX));
        assert_eq!(counter.next_serial(), Serial(1));
        assert_eq!(counter.next_serial(), Serial(2));
    }

    #[test]
    fn size_constraints_clamp() {
        let constraints = SizeConstraints {
            min_width: 100,
            min_height: 50,
            max_width: 800,
            max_height: 0,
        };
        assert_eq!(constraints.apply(20, 20), (100, 50));
        assert_eq!(constraints.apply(1000, 4000), (800, 4000));
        assert_eq!(SizeConstraints::default().apply(3, 4), (3, 4));
    }

    #[test]
    fn events_map_to_signals() {
        assert_eq!(SurfaceEvent::Commit { acked_serial: None }.signal(), Signal::Commit);
        assert_eq!(
            SurfaceEvent::SetState(LegacyState::Maximized).signal(),
            Signal::SetState
        );
        assert_eq!(
            SurfaceEvent::RequestMaximize { maximized: true }.signal(),
            Signal::RequestMaximize
        );
    }
}
