//! The input collaborator seen from the view core.
//!
//! Seats, cursors and grabs live outside this crate. The core only needs to
//! resolve a seat from a request, check that its cursor is idle and start an
//! interactive move or resize; and to tell the input side which view now has
//! focus.

use bitflags::bitflags;

use crate::types::{SeatHandle, ViewId};
use crate::view::ViewGeometry;

bitflags! {
    /// Edges being dragged in an interactive resize.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResizeEdges: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

/// What a seat's cursor is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// No grab is active; events pass through to clients.
    Passthrough,
    Move,
    Resize,
    Rotate,
}

/// Seat-side operations the view core relies on.
pub trait InputCollaborator {
    /// Cursor mode of the seat behind `seat`, or `None` if no seat owns it.
    fn cursor_mode(&self, seat: SeatHandle) -> Option<CursorMode>;

    fn begin_move(&mut self, seat: SeatHandle, view: ViewId, geometry: ViewGeometry);

    fn begin_resize(&mut self, seat: SeatHandle, view: ViewId, geometry: ViewGeometry, edges: ResizeEdges);

    /// Keyboard focus moved to `view` (or nowhere).
    fn focus_changed(&mut self, view: Option<ViewId>);
}
