//! Host hook infrastructure for the keystrokes overlay.
//!
//! The host application exposes six named extension points.  When its
//! execution reaches one of them it invokes whatever callback was registered
//! there, passing a [`HostOccurrence`] describing what just happened.
//! [`HookAdapter`] registers one callback per point; each callback turns the
//! occurrence into the matching typed event and posts it on the
//! [`EventBus`].
//!
//! ```text
//! host ──HostOccurrence──► HookAdapter callback ──post(&Event)──► EventBus
//! ```
//!
//! The overlay never calls into the host: the host calls the adapter.
//!
//! # Testability
//!
//! The `HostExtensionPoints` trait allows tests (and the `replay` command) to
//! drive a host lifecycle with [`mock::MockHost`] instead of a real host.

use std::fmt;
use std::rc::Rc;

use keystrokes_core::{
    DeliveryReport, Event, EventBus, InitializationEvent, KeypressEvent, LeftMouseClickEvent,
    RightMouseClickEvent, SingleplayerJoinEvent, TickEvent,
};
use tracing::{debug, info, warn};

pub mod mock;

/// A fixed position in the host's execution where the overlay may run code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// The host finished its start-up sequence.
    StartComplete,
    /// A host tick (every 50 ms) finished.
    TickComplete,
    /// The host resolved which key a keyboard event belongs to.
    KeyDispatchResolved,
    /// The host finished handling a left click.
    LeftClickResolved,
    /// The host finished handling a right click.
    RightClickResolved,
    /// The host is about to launch a singleplayer world.
    SingleplayerLaunchBegin,
}

impl HookPoint {
    /// Every hook point, in the order the adapter installs them.
    pub const ALL: [HookPoint; 6] = [
        HookPoint::StartComplete,
        HookPoint::TickComplete,
        HookPoint::KeyDispatchResolved,
        HookPoint::LeftClickResolved,
        HookPoint::RightClickResolved,
        HookPoint::SingleplayerLaunchBegin,
    ];

    /// Stable external name of the hook point.
    pub fn name(self) -> &'static str {
        match self {
            HookPoint::StartComplete => "application-start-complete",
            HookPoint::TickComplete => "per-tick-complete",
            HookPoint::KeyDispatchResolved => "key-dispatch-resolved",
            HookPoint::LeftClickResolved => "left-click-resolved",
            HookPoint::RightClickResolved => "right-click-resolved",
            HookPoint::SingleplayerLaunchBegin => "singleplayer-world-launch-begin",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the host reports when it reaches a hook point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOccurrence {
    StartComplete,
    TickComplete,
    KeyDispatched {
        /// Host key code.
        key_code: i32,
        /// `true` for OS auto-repeat events.
        is_repeat: bool,
    },
    LeftClick,
    RightClick,
    /// The world names are available to the host but are not forwarded.
    SingleplayerLaunch {
        folder_name: String,
        world_name: String,
    },
}

impl HostOccurrence {
    /// The hook point this occurrence is reported at.
    pub fn hook_point(&self) -> HookPoint {
        match self {
            HostOccurrence::StartComplete => HookPoint::StartComplete,
            HostOccurrence::TickComplete => HookPoint::TickComplete,
            HostOccurrence::KeyDispatched { .. } => HookPoint::KeyDispatchResolved,
            HostOccurrence::LeftClick => HookPoint::LeftClickResolved,
            HostOccurrence::RightClick => HookPoint::RightClickResolved,
            HostOccurrence::SingleplayerLaunch { .. } => HookPoint::SingleplayerLaunchBegin,
        }
    }
}

/// Callback the host invokes at a hook point.
pub type HookCallback = Box<dyn FnMut(&HostOccurrence)>;

/// Error type for hook registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookError {
    #[error("host does not expose hook point {0}")]
    Unsupported(HookPoint),
    #[error("a callback is already registered at hook point {0}")]
    AlreadyRegistered(HookPoint),
}

/// Trait abstracting the host's named extension points.
///
/// A host accepts at most one callback per point, so every occurrence is
/// posted exactly once.
pub trait HostExtensionPoints {
    /// Registers `callback` to run whenever execution reaches `point`.
    fn register_hook(&mut self, point: HookPoint, callback: HookCallback) -> Result<(), HookError>;
}

/// Connects the host's hook points to an [`EventBus`].
pub struct HookAdapter {
    bus: Rc<EventBus>,
    installed: Vec<HookPoint>,
}

impl HookAdapter {
    /// Registers a forwarding callback at every [`HookPoint`] of `host`.
    ///
    /// # Errors
    ///
    /// Returns the first [`HookError`] reported by the host.  Points
    /// registered before the failure stay registered.
    pub fn install(
        bus: Rc<EventBus>,
        host: &mut dyn HostExtensionPoints,
    ) -> Result<Self, HookError> {
        let mut installed = Vec::with_capacity(HookPoint::ALL.len());
        for point in HookPoint::ALL {
            let bus = Rc::clone(&bus);
            host.register_hook(
                point,
                Box::new(move |occurrence: &HostOccurrence| {
                    forward(&bus, point, occurrence)
                }),
            )?;
            installed.push(point);
        }
        info!("installed {} host hooks", installed.len());
        Ok(Self { bus, installed })
    }

    /// Hook points registered with the host, in installation order.
    pub fn installed_points(&self) -> &[HookPoint] {
        &self.installed
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }
}

/// Posts the event for `occurrence`, which the host reported at `point`.
fn forward(bus: &EventBus, point: HookPoint, occurrence: &HostOccurrence) {
    if occurrence.hook_point() != point {
        warn!(
            "host reported {:?} at hook point {point}; ignoring",
            occurrence.hook_point()
        );
        return;
    }

    match occurrence {
        HostOccurrence::StartComplete => post_and_check(bus, &InitializationEvent),
        HostOccurrence::TickComplete => post_and_check(bus, &TickEvent),
        HostOccurrence::KeyDispatched {
            key_code,
            is_repeat,
        } => post_and_check(
            bus,
            &KeypressEvent {
                key_code: *key_code,
                is_repeat: *is_repeat,
            },
        ),
        HostOccurrence::LeftClick => post_and_check(bus, &LeftMouseClickEvent),
        HostOccurrence::RightClick => post_and_check(bus, &RightMouseClickEvent),
        HostOccurrence::SingleplayerLaunch { world_name, .. } => {
            debug!("singleplayer launch of world {world_name:?}");
            post_and_check(bus, &SingleplayerJoinEvent)
        }
    }
}

fn post_and_check<E: Event>(bus: &EventBus, event: &E) {
    let report: DeliveryReport = bus.post(event);
    if !report.is_clean() {
        debug!(
            "{} delivered to {}/{} listeners",
            event.name(),
            report.delivered,
            report.attempted()
        );
    }
}
