//! Custom keys: user-configured inputs drawn at a pixel offset from the
//! overlay anchor.
//!
//! A [`CustomKey`] is the identity (which input, and where it comes from).
//! A [`CustomKeyWrapper`] pairs that identity with the offsets the user
//! dragged it to.  The identity never changes after construction; only the
//! offsets move.

/// Origin of the input a custom key tracks.
///
/// Persisted as an integer: `0` is a keyboard key, `1` is a mouse button.
/// Any other integer found on disk is kept in [`KeyCategory::Other`] so that
/// saving the file again writes back exactly what was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCategory {
    Keyboard,
    Mouse,
    Other(i32),
}

impl KeyCategory {
    /// Decodes the persisted integer form.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => KeyCategory::Keyboard,
            1 => KeyCategory::Mouse,
            other => KeyCategory::Other(other),
        }
    }

    /// Encodes to the persisted integer form.
    pub fn as_raw(self) -> i32 {
        match self {
            KeyCategory::Keyboard => 0,
            KeyCategory::Mouse => 1,
            KeyCategory::Other(raw) => raw,
        }
    }
}

/// Immutable identity of a custom key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomKey {
    code: i32,
    category: KeyCategory,
}

impl CustomKey {
    pub fn new(code: i32, category: KeyCategory) -> Self {
        Self { code, category }
    }

    /// Host key code (keyboard) or button index (mouse).
    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn category(&self) -> KeyCategory {
        self.category
    }
}

/// A [`CustomKey`] placed at a mutable offset relative to the overlay anchor.
///
/// Duplicates are allowed: two wrappers may share the same key identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomKeyWrapper {
    key: CustomKey,
    x_offset: i32,
    y_offset: i32,
}

impl CustomKeyWrapper {
    pub fn new(key: CustomKey, x_offset: i32, y_offset: i32) -> Self {
        Self {
            key,
            x_offset,
            y_offset,
        }
    }

    /// Builds a wrapper from the four integers stored in a settings file entry.
    pub fn from_persisted(code: i32, raw_category: i32, x_offset: i32, y_offset: i32) -> Self {
        Self::new(
            CustomKey::new(code, KeyCategory::from_raw(raw_category)),
            x_offset,
            y_offset,
        )
    }

    pub fn key(&self) -> &CustomKey {
        &self.key
    }

    pub fn x_offset(&self) -> i32 {
        self.x_offset
    }

    pub fn set_x_offset(&mut self, x_offset: i32) {
        self.x_offset = x_offset;
    }

    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    pub fn set_y_offset(&mut self, y_offset: i32) {
        self.y_offset = y_offset;
    }
}
