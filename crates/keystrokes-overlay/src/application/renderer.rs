//! KeyRenderer: the overlay's live input state.
//!
//! The renderer is what the overlay draws from.  It keeps:
//!
//! - The live custom key list (seeded from the settings file, edited at
//!   runtime, and written back on save).
//! - When each key was last pressed, so a key can stay highlighted for the
//!   configured fade time.
//! - Recent left/right click ticks, for clicks-per-second.
//!
//! # Time (for beginners)
//!
//! The renderer never reads a clock.  Time is counted in host ticks: the
//! host completes 20 ticks per second and every [`TickEvent`] advances the
//! renderer's tick counter by one.  "Clicks per second" is therefore the
//! number of clicks recorded in the last [`TICKS_PER_SECOND`] ticks.
//!
//! [`TickEvent`]: keystrokes_core::TickEvent

use std::collections::{HashMap, VecDeque};

use keystrokes_core::{CustomKey, CustomKeyWrapper};
use tracing::debug;

use crate::infrastructure::storage::CustomKeySource;

/// Host ticks per second.
pub const TICKS_PER_SECOND: u64 = 20;

/// Sliding window of click timestamps, in ticks.
#[derive(Debug, Default, Clone)]
struct ClickCounter {
    clicks: VecDeque<u64>,
}

impl ClickCounter {
    fn record(&mut self, tick: u64) {
        self.clicks.push_back(tick);
    }

    /// Drops clicks older than one second relative to `now`.
    fn expire(&mut self, now: u64) {
        while let Some(&oldest) = self.clicks.front() {
            if now.saturating_sub(oldest) >= TICKS_PER_SECOND {
                self.clicks.pop_front();
            } else {
                break;
            }
        }
    }

    fn per_second(&self) -> usize {
        self.clicks.len()
    }

    fn clear(&mut self) {
        self.clicks.clear();
    }
}

/// Live input state for the keystrokes overlay.
#[derive(Debug, Default)]
pub struct KeyRenderer {
    custom_keys: Vec<CustomKeyWrapper>,
    tick: u64,
    last_pressed: HashMap<i32, u64>,
    left_clicks: ClickCounter,
    right_clicks: ClickCounter,
    total_key_presses: u64,
    ready: bool,
}

impl KeyRenderer {
    /// Creates a renderer showing `custom_keys`.
    pub fn new(custom_keys: Vec<CustomKeyWrapper>) -> Self {
        Self {
            custom_keys,
            ..Self::default()
        }
    }

    pub fn custom_keys(&self) -> &[CustomKeyWrapper] {
        &self.custom_keys
    }

    /// Appends a custom key to the live set.
    pub fn add_custom_key(&mut self, wrapper: CustomKeyWrapper) {
        debug!(
            "adding custom key {} at ({}, {})",
            wrapper.key().code(),
            wrapper.x_offset(),
            wrapper.y_offset()
        );
        self.custom_keys.push(wrapper);
    }

    /// Removes every live custom key bound to `key`.  Returns how many were
    /// removed.
    pub fn remove_custom_key(&mut self, key: &CustomKey) -> usize {
        let before = self.custom_keys.len();
        self.custom_keys.retain(|w| w.key() != key);
        before - self.custom_keys.len()
    }

    /// Marks the host as started.  Input is only tracked once ready.
    pub fn on_initialized(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Advances the tick counter and expires old clicks.
    pub fn on_tick(&mut self) {
        self.tick += 1;
        self.left_clicks.expire(self.tick);
        self.right_clicks.expire(self.tick);
    }

    /// Records a key press.  Auto-repeat events are ignored.
    pub fn on_key(&mut self, key_code: i32, is_repeat: bool) {
        if is_repeat || !self.ready {
            return;
        }
        self.last_pressed.insert(key_code, self.tick);
        self.total_key_presses += 1;
    }

    pub fn on_left_click(&mut self) {
        if self.ready {
            self.left_clicks.record(self.tick);
        }
    }

    pub fn on_right_click(&mut self) {
        if self.ready {
            self.right_clicks.record(self.tick);
        }
    }

    /// Clears per-session input state.  Custom keys are kept.
    pub fn reset_session(&mut self) {
        self.last_pressed.clear();
        self.left_clicks.clear();
        self.right_clicks.clear();
        self.total_key_presses = 0;
    }

    /// Left clicks in the last second.
    pub fn left_cps(&self) -> usize {
        self.left_clicks.per_second()
    }

    /// Right clicks in the last second.
    pub fn right_cps(&self) -> usize {
        self.right_clicks.per_second()
    }

    pub fn total_key_presses(&self) -> u64 {
        self.total_key_presses
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// `true` while `key_code` should still be drawn as pressed.
    ///
    /// A key stays highlighted for `fade_time` seconds (rounded to whole
    /// ticks) after its last press.
    pub fn is_highlighted(&self, key_code: i32, fade_time: f64) -> bool {
        let fade_ticks = (fade_time * TICKS_PER_SECOND as f64).round().max(0.0) as u64;
        self.last_pressed
            .get(&key_code)
            .is_some_and(|&pressed_at| self.tick - pressed_at < fade_ticks.max(1))
    }
}

impl CustomKeySource for KeyRenderer {
    fn live_custom_keys(&self) -> Vec<CustomKeyWrapper> {
        self.custom_keys.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystrokes_core::KeyCategory;

    fn ready_renderer() -> KeyRenderer {
        let mut renderer = KeyRenderer::new(Vec::new());
        renderer.on_initialized();
        renderer
    }

    fn wrapper(code: i32, category: KeyCategory) -> CustomKeyWrapper {
        CustomKeyWrapper::new(CustomKey::new(code, category), 0, 0)
    }

    // ── Custom keys ───────────────────────────────────────────────────────────

    #[test]
    fn test_new_renderer_holds_seed_keys_in_order() {
        let keys = vec![
            wrapper(17, KeyCategory::Keyboard),
            wrapper(0, KeyCategory::Mouse),
        ];

        let renderer = KeyRenderer::new(keys.clone());

        assert_eq!(renderer.custom_keys(), keys.as_slice());
        assert_eq!(renderer.live_custom_keys(), keys);
    }

    #[test]
    fn test_add_and_remove_custom_key() {
        // Arrange
        let mut renderer = KeyRenderer::new(vec![wrapper(17, KeyCategory::Keyboard)]);

        // Act
        renderer.add_custom_key(wrapper(30, KeyCategory::Keyboard));
        renderer.add_custom_key(wrapper(17, KeyCategory::Keyboard));
        let removed = renderer.remove_custom_key(&CustomKey::new(17, KeyCategory::Keyboard));

        // Assert
        assert_eq!(removed, 2);
        assert_eq!(renderer.custom_keys(), &[wrapper(30, KeyCategory::Keyboard)]);
    }

    #[test]
    fn test_remove_distinguishes_category() {
        let mut renderer = KeyRenderer::new(vec![wrapper(0, KeyCategory::Mouse)]);

        let removed = renderer.remove_custom_key(&CustomKey::new(0, KeyCategory::Keyboard));

        assert_eq!(removed, 0);
        assert_eq!(renderer.custom_keys().len(), 1);
    }

    // ── Key presses ───────────────────────────────────────────────────────────

    #[test]
    fn test_input_before_initialization_is_ignored() {
        let mut renderer = KeyRenderer::new(Vec::new());

        renderer.on_key(17, false);
        renderer.on_left_click();

        assert_eq!(renderer.total_key_presses(), 0);
        assert_eq!(renderer.left_cps(), 0);
    }

    #[test]
    fn test_repeat_keypress_is_not_counted() {
        let mut renderer = ready_renderer();

        renderer.on_key(17, false);
        renderer.on_key(17, true);
        renderer.on_key(17, true);

        assert_eq!(renderer.total_key_presses(), 1);
    }

    #[test]
    fn test_key_highlight_fades_after_fade_time() {
        // Arrange: fade time 0.5 s = 10 ticks
        let mut renderer = ready_renderer();
        renderer.on_key(30, false);

        // Act / Assert
        for _ in 0..9 {
            renderer.on_tick();
        }
        assert!(renderer.is_highlighted(30, 0.5));
        renderer.on_tick();
        assert!(!renderer.is_highlighted(30, 0.5));
    }

    #[test]
    fn test_unpressed_key_is_not_highlighted() {
        let renderer = ready_renderer();
        assert!(!renderer.is_highlighted(30, 3.0));
    }

    // ── Clicks per second ─────────────────────────────────────────────────────

    #[test]
    fn test_cps_counts_clicks_within_one_second() {
        // Arrange
        let mut renderer = ready_renderer();

        // Act: 3 left clicks, 1 right click, over 10 ticks
        for i in 0..10 {
            if i % 4 == 0 {
                renderer.on_left_click();
            }
            renderer.on_tick();
        }
        renderer.on_right_click();

        // Assert
        assert_eq!(renderer.left_cps(), 3);
        assert_eq!(renderer.right_cps(), 1);
    }

    #[test]
    fn test_cps_expires_clicks_older_than_one_second() {
        let mut renderer = ready_renderer();
        renderer.on_left_click();

        for _ in 0..(TICKS_PER_SECOND - 1) {
            renderer.on_tick();
        }
        assert_eq!(renderer.left_cps(), 1);

        renderer.on_tick();
        assert_eq!(renderer.left_cps(), 0);
    }

    #[test]
    fn test_reset_session_keeps_custom_keys() {
        let mut renderer = ready_renderer();
        renderer.add_custom_key(wrapper(57, KeyCategory::Keyboard));
        renderer.on_key(57, false);
        renderer.on_left_click();
        renderer.on_right_click();

        renderer.reset_session();

        assert_eq!(renderer.total_key_presses(), 0);
        assert_eq!(renderer.left_cps(), 0);
        assert_eq!(renderer.right_cps(), 0);
        assert!(!renderer.is_highlighted(57, 1.0));
        assert_eq!(renderer.custom_keys().len(), 1);
    }
}
