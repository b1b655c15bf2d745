//! Domain entities for the keystrokes overlay.
//!
//! This module contains pure data and rules with no infrastructure
//! dependencies: nothing here touches the disk, the host, or a renderer.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of the application is called the **domain**.  Domain
//! code holds the rules that make the overlay what it is (for example "the
//! scale is always between 0.5 and 1.5") and can be unit-tested without any
//! external setup.  The storage and hook adapters in `keystrokes-overlay`
//! depend on these types, never the other way round.

/// User-defined keys drawn at an offset from the overlay anchor.
pub mod custom_key;

/// Every tunable overlay value plus the derived layout metrics.
///
/// See [`settings::OverlaySettings`] for the main type.
pub mod settings;
