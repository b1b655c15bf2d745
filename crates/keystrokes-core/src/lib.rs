//! # keystrokes-core
//!
//! Shared library for the keystrokes overlay containing the settings model,
//! the custom key entities, and the synchronous event bus.
//!
//! This crate has zero dependencies on the host application, the file system,
//! or any rendering backend.
//!
//! # Architecture overview (for beginners)
//!
//! The keystrokes overlay draws the keys and mouse buttons a player presses on
//! top of a host application.  The host tells the overlay what happened (a
//! tick elapsed, a key was pressed, a mouse button was clicked) and the overlay
//! decides what to draw, using settings the user tuned in a settings screen.
//!
//! This crate (`keystrokes-core`) is the foundation.  It defines:
//!
//! - **`domain`** – Pure data with no I/O.  `OverlaySettings` holds every
//!   tunable value (position, colours, scale, fade time, feature flags) and
//!   enforces the clamped ranges.  `CustomKey` and `CustomKeyWrapper` describe
//!   user-defined keys placed at a pixel offset from the overlay anchor.
//!
//! - **`events`** – The typed events posted at host lifecycle moments and the
//!   `EventBus` that delivers them synchronously to registered listeners.

pub mod domain;
pub mod events;

// Re-export the most-used types at the crate root so callers can write
// `keystrokes_core::EventBus` instead of `keystrokes_core::events::bus::EventBus`.
pub use domain::custom_key::{CustomKey, CustomKeyWrapper, KeyCategory};
pub use domain::settings::OverlaySettings;
pub use events::bus::{
    DeliveryReport, EventBus, ListenerError, ListenerFailure, ListenerId, ListenerResult,
};
pub use events::{
    Event, InitializationEvent, KeypressEvent, LeftMouseClickEvent, RightMouseClickEvent,
    SingleplayerJoinEvent, TickEvent,
};
