//! Keystrokes overlay command-line tool.
//!
//! Inspects and edits the overlay's settings file, and can replay a short
//! scripted host session against a mock host to show how the overlay reacts.
//!
//! # Usage
//!
//! ```text
//! keystrokes [--config-dir <DIR>] <COMMAND>
//!
//! Commands:
//!   show      Print the effective settings as JSON
//!   reset     Overwrite the settings file with defaults
//!   add-key   Add a custom key and save
//!   replay    Drive a mock host through a scripted session
//! ```
//!
//! The settings directory defaults to the platform config directory and can
//! be overridden with `--config-dir` or `KEYSTROKES_CONFIG_DIR`.  Logging is
//! controlled by `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use keystrokes_core::{CustomKey, CustomKeyWrapper, EventBus, KeyCategory};
use keystrokes_overlay::application::keystrokes_mod::KeystrokesMod;
use keystrokes_overlay::infrastructure::host_hooks::mock::MockHost;
use keystrokes_overlay::infrastructure::host_hooks::{HookAdapter, HostOccurrence};
use keystrokes_overlay::infrastructure::storage::{settings_dir, KeystrokesSettings};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "keystrokes",
    about = "Settings and replay tool for the keystrokes overlay",
    version
)]
struct Cli {
    /// Directory holding `keystrokes.json`.
    #[arg(long, env = "KEYSTROKES_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the effective settings as JSON.
    Show,
    /// Overwrite the settings file with defaults.
    Reset,
    /// Add a custom key to the overlay and save.
    AddKey {
        /// Host key code (or mouse button index with `--mouse`).
        code: i32,
        /// The code is a mouse button.
        #[arg(long)]
        mouse: bool,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        x_offset: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        y_offset: i32,
    },
    /// Drive a mock host through a scripted session and print statistics.
    Replay {
        /// Number of ticks to simulate (20 per second).
        #[arg(long, default_value_t = 40)]
        ticks: u32,
    },
}

impl Cli {
    fn resolve_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.config_dir {
            Some(dir) => Ok(dir.clone()),
            None => settings_dir().context("could not determine the settings directory"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let dir = cli.resolve_dir()?;
    info!("using settings directory {}", dir.display());

    match cli.command {
        Command::Show => show(dir),
        Command::Reset => reset(dir),
        Command::AddKey {
            code,
            mouse,
            x_offset,
            y_offset,
        } => {
            let category = if mouse {
                KeyCategory::Mouse
            } else {
                KeyCategory::Keyboard
            };
            add_key(dir, CustomKeyWrapper::new(CustomKey::new(code, category), x_offset, y_offset))
        }
        Command::Replay { ticks } => replay(dir, ticks),
    }
}

fn show(dir: PathBuf) -> anyhow::Result<()> {
    let mut store = KeystrokesSettings::new(dir);
    store.load();
    let document = store.document(store.config_wrappers());
    let json = serde_json::to_string_pretty(&document).context("failed to serialize settings")?;
    println!("{json}");
    Ok(())
}

fn reset(dir: PathBuf) -> anyhow::Result<()> {
    let store = KeystrokesSettings::new(dir);
    store
        .try_save(&Vec::<CustomKeyWrapper>::new())
        .with_context(|| format!("failed to write {}", store.config_file().display()))?;
    println!("reset {}", store.config_file().display());
    Ok(())
}

fn add_key(dir: PathBuf, wrapper: CustomKeyWrapper) -> anyhow::Result<()> {
    let module = KeystrokesMod::new(Rc::new(EventBus::new()), dir);
    module.renderer_mut().add_custom_key(wrapper);
    module.try_save().context("failed to save settings")?;
    println!(
        "{} custom keys saved to {}",
        module.renderer().custom_keys().len(),
        module.settings().config_file().display()
    );
    Ok(())
}

fn replay(dir: PathBuf, ticks: u32) -> anyhow::Result<()> {
    let bus = Rc::new(EventBus::new());
    let module = KeystrokesMod::new(Rc::clone(&bus), dir);
    let mut host = MockHost::new();
    let _adapter =
        HookAdapter::install(Rc::clone(&bus), &mut host).context("failed to install host hooks")?;

    host.fire(&HostOccurrence::StartComplete);
    for tick in 0..ticks {
        if tick % 3 == 0 {
            host.fire(&HostOccurrence::LeftClick);
        }
        if tick % 10 == 0 {
            host.fire(&HostOccurrence::RightClick);
        }
        if tick % 5 == 0 {
            host.press_key(17);
            host.fire(&HostOccurrence::KeyDispatched {
                key_code: 17,
                is_repeat: true,
            });
        }
        host.run_ticks(1);
    }

    let renderer = module.renderer();
    let fade_time = module.settings().settings().fade_time();
    println!("ticks:              {}", renderer.ticks());
    println!("key presses:        {}", renderer.total_key_presses());
    println!("left cps:           {}", renderer.left_cps());
    println!("right cps:          {}", renderer.right_cps());
    println!(
        "key 17 highlighted: {}",
        renderer.is_highlighted(17, fade_time)
    );
    println!("host callbacks run: {}", host.fired_count());
    Ok(())
}
