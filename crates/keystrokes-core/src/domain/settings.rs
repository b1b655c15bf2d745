//! `OverlaySettings`: every tunable value of the keystrokes overlay.
//!
//! # Clamped values
//!
//! Two values have a valid range:
//!
//! | Value       | Range          |
//! |-------------|----------------|
//! | `scale`     | `[0.5, 1.5]`   |
//! | `fade_time` | `[0.1, 3.0]`   |
//!
//! The raw value is stored as written, and the clamp is applied in **both**
//! the setter and the getter.  A value that sneaks past the setter (for
//! example one loaded from an older settings file written with different
//! bounds) is still corrected the next time it is read.
//!
//! Colour channels are stored as plain integers and are not clamped to
//! `0..=255`; existing settings files may carry out-of-range values and they
//! are preserved as-is.

/// Lower bound for [`OverlaySettings::scale`].
pub const MIN_SCALE: f64 = 0.5;
/// Upper bound for [`OverlaySettings::scale`].
pub const MAX_SCALE: f64 = 1.5;
/// Lower bound for [`OverlaySettings::fade_time`], in seconds.
pub const MIN_FADE_TIME: f64 = 0.1;
/// Upper bound for [`OverlaySettings::fade_time`], in seconds.
pub const MAX_FADE_TIME: f64 = 3.0;

/// Height of the overlay with no optional rows enabled.
pub const BASE_HEIGHT: i32 = 50;
/// Extra height added by the clicks-per-second row.
pub const CPS_ROW_HEIGHT: i32 = 18;
/// Extra height added by the mouse button row.
pub const MOUSE_ROW_HEIGHT: i32 = 24;
/// Extra height added by the spacebar row.
pub const SPACEBAR_ROW_HEIGHT: i32 = 18;
/// The overlay is always three key columns wide.
pub const OVERLAY_WIDTH: i32 = 74;

/// Restricts `value` to `[min, max]`.
///
/// `NaN` is mapped to `min` so that the invariant "every read lies inside the
/// range" also holds for values that are not numbers at all.
pub fn cap_f64(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Every user-tunable value of the overlay.
///
/// Construct with [`OverlaySettings::default`] and adjust through the
/// setters.  Fields are private so that the clamped values cannot be read
/// without passing through their clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    x: i32,
    y: i32,
    enabled: bool,
    chroma: bool,
    mouse_buttons: bool,
    show_cps: bool,
    show_cps_on_buttons: bool,
    show_spacebar: bool,
    scale: f64,
    fade_time: f64,
    red: i32,
    green: i32,
    blue: i32,
    pressed_red: i32,
    pressed_green: i32,
    pressed_blue: i32,
    left_click: bool,
    showing_sneak: bool,
    showing_fps: bool,
    key_background: bool,
}

impl Default for OverlaySettings {
    /// | Field                              | Default |
    /// |------------------------------------|---------|
    /// | x, y                               | 0       |
    /// | red, green, blue                   | 255     |
    /// | pressed_red/green/blue             | 0       |
    /// | scale, fade_time                   | 1.0     |
    /// | enabled, left_click, key_background| `true`  |
    /// | every other flag                   | `false` |
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            enabled: true,
            chroma: false,
            mouse_buttons: false,
            show_cps: false,
            show_cps_on_buttons: false,
            show_spacebar: false,
            scale: 1.0,
            fade_time: 1.0,
            red: 255,
            green: 255,
            blue: 255,
            pressed_red: 0,
            pressed_green: 0,
            pressed_blue: 0,
            left_click: true,
            showing_sneak: false,
            showing_fps: false,
            key_background: true,
        }
    }
}

impl OverlaySettings {
    // ── Position ──────────────────────────────────────────────────────────────

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    // ── Colours ───────────────────────────────────────────────────────────────

    pub fn red(&self) -> i32 {
        self.red
    }

    pub fn set_red(&mut self, red: i32) {
        self.red = red;
    }

    pub fn green(&self) -> i32 {
        self.green
    }

    pub fn set_green(&mut self, green: i32) {
        self.green = green;
    }

    pub fn blue(&self) -> i32 {
        self.blue
    }

    pub fn set_blue(&mut self, blue: i32) {
        self.blue = blue;
    }

    pub fn pressed_red(&self) -> i32 {
        self.pressed_red
    }

    pub fn set_pressed_red(&mut self, red: i32) {
        self.pressed_red = red;
    }

    pub fn pressed_green(&self) -> i32 {
        self.pressed_green
    }

    pub fn set_pressed_green(&mut self, green: i32) {
        self.pressed_green = green;
    }

    pub fn pressed_blue(&self) -> i32 {
        self.pressed_blue
    }

    pub fn set_pressed_blue(&mut self, blue: i32) {
        self.pressed_blue = blue;
    }

    // ── Clamped values ────────────────────────────────────────────────────────

    /// Returns the overlay scale factor, always inside `[0.5, 1.5]`.
    pub fn scale(&self) -> f64 {
        cap_f64(self.scale, MIN_SCALE, MAX_SCALE)
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = cap_f64(scale, MIN_SCALE, MAX_SCALE);
    }

    /// Returns the key fade duration in seconds, always inside `[0.1, 3.0]`.
    pub fn fade_time(&self) -> f64 {
        cap_f64(self.fade_time, MIN_FADE_TIME, MAX_FADE_TIME)
    }

    pub fn set_fade_time(&mut self, fade_time: f64) {
        self.fade_time = cap_f64(fade_time, MIN_FADE_TIME, MAX_FADE_TIME);
    }

    // ── Feature flags ─────────────────────────────────────────────────────────

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_chroma(&self) -> bool {
        self.chroma
    }

    pub fn set_chroma(&mut self, chroma: bool) {
        self.chroma = chroma;
    }

    pub fn is_showing_mouse_buttons(&self) -> bool {
        self.mouse_buttons
    }

    pub fn set_showing_mouse_buttons(&mut self, mouse_buttons: bool) {
        self.mouse_buttons = mouse_buttons;
    }

    pub fn is_showing_cps(&self) -> bool {
        self.show_cps
    }

    pub fn set_showing_cps(&mut self, show_cps: bool) {
        self.show_cps = show_cps;
    }

    pub fn is_showing_cps_on_buttons(&self) -> bool {
        self.show_cps_on_buttons
    }

    pub fn set_showing_cps_on_buttons(&mut self, show_cps_on_buttons: bool) {
        self.show_cps_on_buttons = show_cps_on_buttons;
    }

    pub fn is_showing_spacebar(&self) -> bool {
        self.show_spacebar
    }

    pub fn set_showing_spacebar(&mut self, show_spacebar: bool) {
        self.show_spacebar = show_spacebar;
    }

    pub fn is_left_click(&self) -> bool {
        self.left_click
    }

    pub fn set_left_click(&mut self, left_click: bool) {
        self.left_click = left_click;
    }

    pub fn is_showing_sneak(&self) -> bool {
        self.showing_sneak
    }

    pub fn set_showing_sneak(&mut self, showing_sneak: bool) {
        self.showing_sneak = showing_sneak;
    }

    pub fn is_showing_fps(&self) -> bool {
        self.showing_fps
    }

    pub fn set_showing_fps(&mut self, showing_fps: bool) {
        self.showing_fps = showing_fps;
    }

    pub fn is_key_background_enabled(&self) -> bool {
        self.key_background
    }

    pub fn set_key_background_enabled(&mut self, key_background: bool) {
        self.key_background = key_background;
    }

    // ── Derived layout metrics ────────────────────────────────────────────────

    /// Unscaled overlay height in pixels for the rows currently enabled.
    ///
    /// Recomputed on every call; nothing is cached.
    pub fn height(&self) -> i32 {
        let mut height = BASE_HEIGHT;
        if self.show_cps {
            height += CPS_ROW_HEIGHT;
        }
        if self.mouse_buttons {
            height += MOUSE_ROW_HEIGHT;
        }
        if self.show_spacebar {
            height += SPACEBAR_ROW_HEIGHT;
        }
        height
    }

    /// Unscaled overlay width in pixels.
    pub fn width(&self) -> i32 {
        OVERLAY_WIDTH
    }
}
