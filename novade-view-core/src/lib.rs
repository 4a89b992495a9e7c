//! # NovaDE View Core (`novade-view-core`)
//!
//! The view and surface lifecycle core of the NovaDE compositor. It turns the
//! events of several surface protocols into one geometry and state model used
//! for hit-testing, render placement and window management.
//!
//! ## Overview
//!
//! - **Views** ([`view::View`]): top-level windows of four protocol variants:
//!   the legacy shell, both generations of the negotiated shell, and the
//!   remote display protocol bridge. Move, resize, maximize, fullscreen,
//!   decorations, rotation and alpha are handled uniformly; negotiated
//!   variants apply geometry once the client acknowledges a configure.
//! - **View children** ([`view::ViewChild`]): popups and subsurfaces, nested
//!   to any depth and destroyed with their view.
//! - **Layer surfaces** ([`layer_shell`]): panels and backgrounds bound to an
//!   output, arranged by exclusive-zone reservation.
//! - **Subscriptions** ([`signal::SignalRegistry`]): lifetime-scoped event
//!   routing; tearing down an owner revokes its subscriptions at once.
//! - **Desktop** ([`desktop::Desktop`]): owns everything above plus outputs
//!   and workspaces, and exposes the window-management operations.
//!
//! The wire protocol, rendering and seat handling stay outside: the core
//! consumes [`provider::SurfaceProvider`] and [`input::InputCollaborator`]
//! implementations supplied by the embedding compositor.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use novade_view_core::config::ConfigLoader;
//! use novade_view_core::desktop::Desktop;
//! use novade_view_core::logging::init_logging;
//!
//! let config = ConfigLoader::load_from_path(path)?;
//! init_logging(&config.logging, false)?;
//! let mut desktop = Desktop::new(config, Box::new(seats));
//! let output = desktop.add_output("eDP-1", Rect::new(0, 0, 1920, 1080));
//! let view = desktop.new_xdg_surface(surface, ShellGeneration::Stable);
//! desktop.dispatch(surface_id, SurfaceEvent::Map);
//! ```

pub mod config;
pub mod desktop;
pub mod error;
pub mod input;
pub mod layer_shell;
pub mod logging;
pub mod output;
pub mod provider;
pub mod signal;
pub mod types;
pub mod view;
pub mod workspace;

pub use config::ViewCoreConfig;
pub use desktop::Desktop;
pub use error::{ConfigError, LoggingError, Result, ViewCoreError};
