//! Core data types used throughout the view core.
//!
//! - **Geometry**: [`Point`], [`Size`] and the integer layout box [`Rect`].
//! - **Identifiers**: arena ids for views, children, outputs, layers and
//!   workspaces, plus the protocol-layer handles [`ProviderId`] and [`SeatHandle`].

pub mod geometry;
pub mod ids;

pub use geometry::{Point, Rect, Size};
pub use ids::{
    ChildId, LayerId, LayerPopupId, OutputId, ProviderId, SeatHandle, ViewId, WorkspaceId,
};
