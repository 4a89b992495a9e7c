//! Views and their child surfaces.
//!
//! A [`View`] is one top-level window. Its protocol variant is held in a
//! [`ViewBackend`]; the view itself owns the geometry state machine shared by
//! all variants, including negotiated move/resize, maximize and fullscreen
//! snapshots, decorations and damage. Popups and subsurfaces hang off a view
//! as [`ViewChild`] nodes stored in the desktop's child arena.

mod backend;
mod child;
mod decoration;
mod toplevel;
mod wl_shell;
mod xdg_shell;
mod xwayland;

pub use backend::{ViewBackend, ViewKind};
pub use child::{ChildKind, ViewChild};
pub use decoration::DecoPart;
pub use toplevel::{PendingMoveResize, SavedGeometry, View, ViewGeometry};
pub use wl_shell::WlShellSurface;
pub use xdg_shell::XdgShellSurface;
pub use xwayland::XwaylandSurface;
