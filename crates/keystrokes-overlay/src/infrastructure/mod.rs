//! Infrastructure layer for the keystrokes overlay.
//!
//! Contains the adapters that touch the outside world: the JSON settings file
//! on disk and the hook points exposed by the host application.
//!
//! **Dependency rule**: this layer may depend on `keystrokes_core`, but MUST
//! NOT be imported by `keystrokes_core`.

pub mod host_hooks;
pub mod storage;
