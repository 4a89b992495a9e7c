//! Capability interface implemented by each protocol variant.
//!
//! The set of variants is closed: [`ViewBackend`] enumerates them and hands
//! out the variant as a `&mut dyn ShellBackend` so that [`View`](super::View)
//! drives one geometry state machine for all of them.

use std::fmt;

use crate::provider::{Serial, SurfaceProvider};
use crate::types::Size;

use super::wl_shell::WlShellSurface;
use super::xdg_shell::XdgShellSurface;
use super::xwayland::XwaylandSurface;

/// Placement of the client content area, decorations excluded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ContentRequest {
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

/// What a backend did with a size change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GeometryOutcome {
    /// Apply now, with the (possibly constrained) content size.
    Immediate { width: u32, height: u32 },
    /// A configure with this serial was sent; apply once it is acknowledged.
    Negotiated(Serial),
    /// The size was already requested; nothing new was sent.
    Unchanged,
}

/// Result of matching a commit's acknowledged serial against the outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AckOutcome {
    NothingOutstanding,
    /// The outstanding request was acknowledged and is now cleared.
    Satisfied,
    /// The acknowledgment predates the outstanding request.
    Stale,
}

pub(crate) trait ShellBackend {
    /// Records the content size the surface was mapped with.
    fn mapped(&mut self, _size: Size<u32>) {}

    fn do_activate(&mut self, _provider: &dyn SurfaceProvider, _active: bool) {}

    fn do_move(&mut self, _provider: &dyn SurfaceProvider, _content: ContentRequest) {}

    fn do_resize(&mut self, provider: &dyn SurfaceProvider, content: ContentRequest) -> GeometryOutcome;

    fn do_move_resize(&mut self, provider: &dyn SurfaceProvider, content: ContentRequest) -> GeometryOutcome {
        self.do_resize(provider, content)
    }

    fn do_maximize(&mut self, _provider: &dyn SurfaceProvider, _maximized: bool) {}

    fn do_set_fullscreen(&mut self, _provider: &dyn SurfaceProvider, _fullscreen: bool) {}

    fn do_close(&mut self, provider: &dyn SurfaceProvider);

    /// Matches a commit against the outstanding configure, if any.
    fn acknowledge(&mut self, _acked: Option<Serial>, _committed: Size<u32>) -> AckOutcome {
        AckOutcome::NothingOutstanding
    }

    fn outstanding_serial(&self) -> Option<Serial> {
        None
    }
}

/// The protocol a view is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    WlShell,
    XdgShellV6,
    XdgShell,
    Xwayland,
}

impl ViewKind {
    /// Whether geometry changes wait for a configure acknowledgment.
    pub fn is_negotiated(&self) -> bool {
        matches!(self, ViewKind::XdgShellV6 | ViewKind::XdgShell)
    }

    /// Whether the protocol can attach popups to the view.
    pub fn supports_popups(&self) -> bool {
        !matches!(self, ViewKind::Xwayland)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewKind::WlShell => "wl_shell",
            ViewKind::XdgShellV6 => "xdg_shell_v6",
            ViewKind::XdgShell => "xdg_shell",
            ViewKind::Xwayland => "xwayland",
        };
        f.write_str(name)
    }
}

/// Per-variant backend state.
#[derive(Debug)]
pub enum ViewBackend {
    WlShell(WlShellSurface),
    XdgShell(XdgShellSurface),
    Xwayland(XwaylandSurface),
}

impl ViewBackend {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewBackend::WlShell(_) => ViewKind::WlShell,
            ViewBackend::XdgShell(surface) => surface.kind(),
            ViewBackend::Xwayland(_) => ViewKind::Xwayland,
        }
    }

    pub(crate) fn shell(&mut self) -> &mut dyn ShellBackend {
        match self {
            ViewBackend::WlShell(surface) => surface,
            ViewBackend::XdgShell(surface) => surface,
            ViewBackend::Xwayland(surface) => surface,
        }
    }

    pub(crate) fn shell_ref(&self) -> &dyn ShellBackend {
        match self {
            ViewBackend::WlShell(surface) => surface,
            ViewBackend::XdgShell(surface) => surface,
            ViewBackend::Xwayland(surface) => surface,
        }
    }
}
