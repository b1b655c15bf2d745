//! Typed events posted at fixed host lifecycle moments.
//!
//! Each hook point in the host produces exactly one event type.  Events are
//! small immutable values: most carry no payload at all, only
//! [`KeypressEvent`] says which key was involved.
//!
//! | Host moment                       | Event                      |
//! |-----------------------------------|----------------------------|
//! | application start complete        | [`InitializationEvent`]    |
//! | tick complete (every 50 ms)       | [`TickEvent`]              |
//! | key dispatch resolved             | [`KeypressEvent`]          |
//! | left click resolved               | [`LeftMouseClickEvent`]    |
//! | right click resolved              | [`RightMouseClickEvent`]   |
//! | singleplayer world launch begins  | [`SingleplayerJoinEvent`]  |

use std::any::Any;
use std::fmt::Debug;

pub mod bus;

/// Marker trait for values that can be posted on the [`bus::EventBus`].
///
/// Listeners are keyed by the concrete event type, so every event is a
/// distinct `'static` type rather than a variant of one enum.
pub trait Event: Any + Debug {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}

/// The host finished starting up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitializationEvent;

/// One host tick completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickEvent;

/// The host resolved a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeypressEvent {
    /// Host key code of the key.
    pub key_code: i32,
    /// `true` when the event is an OS auto-repeat of a held key.
    pub is_repeat: bool,
}

/// The host handled a left mouse click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeftMouseClickEvent;

/// The host handled a right mouse click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RightMouseClickEvent;

/// The host began launching a singleplayer world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SingleplayerJoinEvent;

impl Event for InitializationEvent {
    fn name(&self) -> &'static str {
        "initialization"
    }
}

impl Event for TickEvent {
    fn name(&self) -> &'static str {
        "tick"
    }
}

impl Event for KeypressEvent {
    fn name(&self) -> &'static str {
        "keypress"
    }
}

impl Event for LeftMouseClickEvent {
    fn name(&self) -> &'static str {
        "left_mouse_click"
    }
}

impl Event for RightMouseClickEvent {
    fn name(&self) -> &'static str {
        "right_mouse_click"
    }
}

impl Event for SingleplayerJoinEvent {
    fn name(&self) -> &'static str {
        "singleplayer_join"
    }
}
