//! Layer-shell surfaces: panels, backgrounds and overlays bound to an output.
//!
//! Layer surfaces live outside the view tree. Each output arranges its layer
//! surfaces with [`arrange_layers`], which yields the box of every surface and
//! the usable area left for views once exclusive zones are reserved.

mod arrange;
mod state;

pub use arrange::{arrange_layers, Arrangement};
pub use state::{Anchor, Layer, LayerPopup, LayerState, LayerSurface, Margins};
