//! KeystrokesMod: wires the settings store and renderer to the event bus.
//!
//! Construction loads the settings file, seeds the [`KeyRenderer`] with the
//! custom keys found there, and subscribes one listener per event type:
//!
//! | Event                     | Effect                                      |
//! |---------------------------|---------------------------------------------|
//! | `InitializationEvent`     | renderer starts tracking input              |
//! | `TickEvent`               | renderer clock advances, old clicks expire  |
//! | `KeypressEvent`           | key press recorded (if enabled)             |
//! | `LeftMouseClickEvent`     | left click recorded (if enabled)            |
//! | `RightMouseClickEvent`    | right click recorded (if enabled)           |
//! | `SingleplayerJoinEvent`   | per-session input state cleared             |
//!
//! Dropping the module unregisters its listeners.

use std::cell::{Ref, RefCell, RefMut};
use std::path::PathBuf;
use std::rc::Rc;

use keystrokes_core::{
    EventBus, InitializationEvent, KeypressEvent, LeftMouseClickEvent, ListenerError, ListenerId,
    RightMouseClickEvent, SingleplayerJoinEvent, TickEvent,
};
use tracing::{debug, info};

use super::renderer::KeyRenderer;
use crate::infrastructure::storage::{KeystrokesSettings, LoadOutcome, SettingsError};

type Shared<T> = Rc<RefCell<T>>;

/// The keystrokes overlay module.
pub struct KeystrokesMod {
    bus: Rc<EventBus>,
    settings: Shared<KeystrokesSettings>,
    renderer: Shared<KeyRenderer>,
    listeners: Vec<ListenerId>,
    load_outcome: LoadOutcome,
}

impl KeystrokesMod {
    /// Loads settings from `directory` and subscribes to `bus`.
    pub fn new(bus: Rc<EventBus>, directory: impl Into<PathBuf>) -> Self {
        let mut store = KeystrokesSettings::new(directory);
        let load_outcome = store.load();
        let renderer = KeyRenderer::new(store.config_wrappers().to_vec());

        let settings = Rc::new(RefCell::new(store));
        let renderer = Rc::new(RefCell::new(renderer));
        let listeners = subscribe(&bus, &settings, &renderer);

        info!(
            "keystrokes overlay ready ({load_outcome:?}, {} custom keys)",
            renderer.borrow().custom_keys().len()
        );
        Self {
            bus,
            settings,
            renderer,
            listeners,
            load_outcome,
        }
    }

    /// What the initial load found on disk.
    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn settings(&self) -> Ref<'_, KeystrokesSettings> {
        self.settings.borrow()
    }

    pub fn settings_mut(&self) -> RefMut<'_, KeystrokesSettings> {
        self.settings.borrow_mut()
    }

    pub fn renderer(&self) -> Ref<'_, KeyRenderer> {
        self.renderer.borrow()
    }

    pub fn renderer_mut(&self) -> RefMut<'_, KeyRenderer> {
        self.renderer.borrow_mut()
    }

    /// Writes the settings and the renderer's live custom keys.  Failures
    /// are logged.
    pub fn save(&self) {
        self.settings.borrow().save(&*self.renderer.borrow());
    }

    /// Like [`save`](Self::save), but returns the failure.
    ///
    /// # Errors
    ///
    /// Propagates the [`SettingsError`] from the store.
    pub fn try_save(&self) -> Result<(), SettingsError> {
        self.settings.borrow().try_save(&*self.renderer.borrow())
    }
}

impl Drop for KeystrokesMod {
    fn drop(&mut self) {
        for id in self.listeners.drain(..) {
            self.bus.unregister(id);
        }
        debug!("keystrokes overlay listeners removed");
    }
}

fn subscribe(
    bus: &EventBus,
    settings: &Shared<KeystrokesSettings>,
    renderer: &Shared<KeyRenderer>,
) -> Vec<ListenerId> {
    let mut ids = Vec::with_capacity(6);

    let r = Rc::clone(renderer);
    ids.push(bus.register(move |_: &InitializationEvent| {
        renderer_mut(&r)?.on_initialized();
        Ok(())
    }));

    let r = Rc::clone(renderer);
    ids.push(bus.register(move |_: &TickEvent| {
        renderer_mut(&r)?.on_tick();
        Ok(())
    }));

    let (s, r) = (Rc::clone(settings), Rc::clone(renderer));
    ids.push(bus.register(move |event: &KeypressEvent| {
        if is_enabled(&s)? {
            renderer_mut(&r)?.on_key(event.key_code, event.is_repeat);
        }
        Ok(())
    }));

    let (s, r) = (Rc::clone(settings), Rc::clone(renderer));
    ids.push(bus.register(move |_: &LeftMouseClickEvent| {
        if is_enabled(&s)? {
            renderer_mut(&r)?.on_left_click();
        }
        Ok(())
    }));

    let (s, r) = (Rc::clone(settings), Rc::clone(renderer));
    ids.push(bus.register(move |_: &RightMouseClickEvent| {
        if is_enabled(&s)? {
            renderer_mut(&r)?.on_right_click();
        }
        Ok(())
    }));

    let r = Rc::clone(renderer);
    ids.push(bus.register(move |_: &SingleplayerJoinEvent| {
        renderer_mut(&r)?.reset_session();
        Ok(())
    }));

    ids
}

fn renderer_mut(renderer: &RefCell<KeyRenderer>) -> Result<RefMut<'_, KeyRenderer>, ListenerError> {
    renderer
        .try_borrow_mut()
        .map_err(|_| ListenerError::failed("renderer is already borrowed"))
}

fn is_enabled(settings: &RefCell<KeystrokesSettings>) -> Result<bool, ListenerError> {
    settings
        .try_borrow()
        .map(|store| store.settings().is_enabled())
        .map_err(|_| ListenerError::failed("settings are being modified"))
}
