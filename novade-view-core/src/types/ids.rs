//! Typed identifiers for compositor-owned objects and external handles.
//!
//! Objects owned by the [`Desktop`](crate::desktop::Desktop) arenas are keyed by
//! uuid-backed ids so that back-references stay valid while collections grow and
//! shrink. Handles minted by the protocol layer ([`ProviderId`], [`SeatHandle`])
//! are plain integers chosen by that layer.

use uuid::Uuid;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new, unique id.
            pub fn new_v4() -> Self {
                $name(Uuid::new_v4())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

arena_id!(
    /// Unique identifier for a [`View`](crate::view::View).
    ViewId
);
arena_id!(
    /// Unique identifier for a [`ViewChild`](crate::view::ViewChild).
    ChildId
);
arena_id!(
    /// Unique identifier for an [`Output`](crate::output::Output).
    OutputId
);
arena_id!(
    /// Unique identifier for a [`LayerSurface`](crate::layer_shell::LayerSurface).
    LayerId
);
arena_id!(
    /// Unique identifier for a [`LayerPopup`](crate::layer_shell::LayerPopup).
    LayerPopupId
);
arena_id!(
    /// Unique identifier for a [`Workspace`](crate::workspace::Workspace).
    WorkspaceId
);

/// Identity of a surface provider, assigned by the protocol layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(pub u64);

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "provider#{}", self.0)
    }
}

/// Opaque seat reference carried by interactive move/resize requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeatHandle(pub u64);
