mod alert;
mod battery;
mod blink;
mod contacts;
mod error;
mod flashlight;
mod light;
pub mod logging;
mod observer;
mod settings;
mod usage;
mod worker;

pub use alert::EmergencyAlert;
pub use battery::{Battery, BatteryStatus, FULL_BATTERY, LOW_BATTERY_THRESHOLD};
pub use blink::{BlinkPattern, BlinkStep};
pub use contacts::{Contact, ContactRegistry};
pub use error::{FlashlightError, Result};
pub use flashlight::{Flashlight, FlashlightOptions, FlashlightOptionsBuilder};
pub use light::{DisplayState, LightState, battery_label, usage_label};
pub use observer::{FlashlightEvent, FlashlightObserver};
pub use settings::{DEFAULT_SETTINGS_FILE, Settings, SettingsStore};
pub use usage::USAGE_PERIOD;
