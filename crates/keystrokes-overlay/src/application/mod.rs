//! Application layer of the keystrokes overlay.
//!
//! Sits between the domain types in `keystrokes-core` and the infrastructure
//! (settings file, host hooks).  Nothing here touches the file system or the
//! host directly; it reacts to events posted on the bus.
//!
//! # Sub-modules
//!
//! - **`renderer`** – Live input state: custom keys, key highlight timing,
//!   and clicks-per-second.
//!
//! - **`keystrokes_mod`** – Owns the settings store and the renderer and
//!   subscribes them to the event bus.

pub mod keystrokes_mod;
pub mod renderer;
