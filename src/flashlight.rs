//! The flashlight coordinator.
//!
//! `Flashlight` owns every piece of mutable state (settings document, light,
//! contacts, battery, display) behind one lock and is the only thing that
//! starts or stops background workers. Workers carry a generation number so
//! a tick that races with a stop never lands on newer state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use derive_builder::Builder;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::alert::EmergencyAlert;
use crate::battery::{self, Battery, BatteryLoad, BatteryStatus, FULL_BATTERY, LOW_BATTERY_THRESHOLD};
use crate::blink::{self, BlinkPattern, Lamp};
use crate::contacts::{Contact, ContactRegistry};
use crate::error::{FlashlightError, Result};
use crate::light::{DisplayState, LightState, clamp_brightness, validate_color};
use crate::observer::{FlashlightEvent, FlashlightObserver};
use crate::settings::{DEFAULT_SETTINGS_FILE, MAX_BRIGHTNESS, Settings, SettingsStore};
use crate::usage::{USAGE_PERIOD, UsageSink, UsageTracker};
use crate::worker::Worker;

const BATTERY_PERIOD: Duration = Duration::from_secs(10);

#[derive(Builder, Debug, Clone)]
pub struct FlashlightOptions {
    #[builder(setter(into), default = "PathBuf::from(DEFAULT_SETTINGS_FILE)")]
    pub settings_path: PathBuf,
    #[builder(default = "BATTERY_PERIOD")]
    pub battery_period: Duration,
    /// Percent drained per battery tick while the light is on.
    #[builder(default = "1")]
    pub battery_drain: u8,
    #[builder(default = "LOW_BATTERY_THRESHOLD")]
    pub low_battery_threshold: u8,
    #[builder(default = "FULL_BATTERY")]
    pub initial_battery: u8,
    #[builder(default = "USAGE_PERIOD")]
    pub usage_period: Duration,
}

impl FlashlightOptions {
    pub fn builder() -> FlashlightOptionsBuilder {
        FlashlightOptionsBuilder::default()
    }
}

impl Default for FlashlightOptions {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from(DEFAULT_SETTINGS_FILE),
            battery_period: BATTERY_PERIOD,
            battery_drain: 1,
            low_battery_threshold: LOW_BATTERY_THRESHOLD,
            initial_battery: FULL_BATTERY,
            usage_period: USAGE_PERIOD,
        }
    }
}

impl From<FlashlightOptionsBuilderError> for FlashlightError {
    fn from(e: FlashlightOptionsBuilderError) -> Self {
        FlashlightError::Builder(e.to_string())
    }
}

struct ActivePattern {
    pattern: BlinkPattern,
    generation: u64,
    worker: Worker,
}

struct Inner {
    settings: Settings,
    light: LightState,
    contacts: ContactRegistry,
    battery: Battery,
    display: DisplayState,
    blink: Option<ActivePattern>,
    blink_generation: u64,
    usage: UsageTracker,
    usage_generation: u64,
}

impl Inner {
    fn steady_display(&self) -> DisplayState {
        DisplayState::steady(&self.light, &self.settings.theme_color)
    }

    fn stop_pattern(&mut self) -> Option<BlinkPattern> {
        self.blink.take().map(|mut active| {
            active.worker.stop();
            active.pattern
        })
    }

    fn stop_usage(&mut self) {
        self.usage.stop();
        self.usage_generation += 1;
    }
}

struct Shared {
    inner: RwLock<Inner>,
    store: SettingsStore,
    options: FlashlightOptions,
    observer: Option<Arc<dyn FlashlightObserver>>,
    save_lock: tokio::sync::Mutex<()>,
}

impl Shared {
    async fn notify(&self, event: FlashlightEvent) {
        if let Some(observer) = &self.observer {
            observer.status_update(&event).await;
        }
    }

    /// Writes the current document. The snapshot is taken under the save
    /// lock so a slower save never overwrites a newer one.
    async fn persist(&self) -> Result<()> {
        let _guard = self.save_lock.lock().await;
        let snapshot = self.inner.read().settings.clone();
        self.store.save(&snapshot).await
    }
}

#[async_trait]
impl BatteryLoad for Shared {
    async fn battery_tick(&self) {
        let update = {
            let mut inner = self.inner.write();
            if !inner.light.is_on {
                None
            } else {
                inner.battery.drain(self.options.battery_drain);
                let status = inner.battery.status();
                if status.low {
                    inner.display = inner.display.clone().with_low_battery_warning();
                }
                Some((status, inner.display.clone()))
            }
        };

        if let Some((status, display)) = update {
            debug!("Battery drained to {}%", status.level);
            self.notify(FlashlightEvent::Battery(status)).await;
            if status.low {
                warn!("Low battery: {}%", status.level);
                self.notify(FlashlightEvent::Display(display)).await;
            }
        }
    }
}

struct BlinkLamp {
    shared: Arc<Shared>,
    generation: u64,
}

#[async_trait]
impl Lamp for BlinkLamp {
    async fn set_lit(&self, lit: bool) {
        let display = {
            let mut inner = self.shared.inner.write();
            if inner.blink.as_ref().map(|a| a.generation) != Some(self.generation) {
                return;
            }
            inner.display = if lit {
                DisplayState::lit(MAX_BRIGHTNESS, inner.settings.light_color())
            } else {
                DisplayState::dark(&inner.settings.theme_color)
            };
            inner.display.clone()
        };
        self.shared.notify(FlashlightEvent::Display(display)).await;
    }
}

struct UsageCounter {
    shared: Arc<Shared>,
    generation: u64,
}

#[async_trait]
impl UsageSink for UsageCounter {
    async fn add_usage(&self) {
        let minutes = {
            let mut inner = self.shared.inner.write();
            if !inner.light.is_on || inner.usage_generation != self.generation {
                return;
            }
            inner.settings.usage_time += 1;
            inner.settings.usage_time
        };
        debug!("Usage time is now {} minutes", minutes);
        if let Err(e) = self.shared.persist().await {
            error!("Failed to save usage time: {}", e);
        }
        self.shared
            .notify(FlashlightEvent::UsageTime { minutes })
            .await;
    }
}

/// Simulated flashlight. Each command matches one control of the UI.
pub struct Flashlight {
    shared: Arc<Shared>,
    battery_worker: Mutex<Option<Worker>>,
}

impl Flashlight {
    /// Loads the settings document and builds the initial state. Background
    /// work only begins with [`Flashlight::start`].
    pub async fn open(
        options: FlashlightOptions,
        observer: Option<Arc<dyn FlashlightObserver>>,
    ) -> Result<Self> {
        let store = SettingsStore::new(&options.settings_path);
        let settings = store.load().await?;
        info!(
            "Loaded settings from {} ({} contacts, {} minutes of use)",
            store.path().display(),
            settings.emergency_contacts.len(),
            settings.usage_time
        );

        let inner = Inner {
            light: LightState::from(&settings),
            contacts: ContactRegistry::from(settings.emergency_contacts.clone()),
            battery: Battery::new(options.initial_battery, options.low_battery_threshold),
            display: DisplayState::ready(&settings.theme_color),
            settings,
            blink: None,
            blink_generation: 0,
            usage: UsageTracker::default(),
            usage_generation: 0,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                inner: RwLock::new(inner),
                store,
                options,
                observer,
                save_lock: tokio::sync::Mutex::new(()),
            }),
            battery_worker: Mutex::new(None),
        })
    }

    /// Starts the battery simulator. Calling it twice has no effect.
    pub fn start(&self) {
        let mut worker = self.battery_worker.lock();
        if worker.is_none() {
            info!(
                "Starting battery simulator (every {:?})",
                self.shared.options.battery_period
            );
            *worker = Some(battery::spawn_simulator(
                self.shared.options.battery_period,
                self.shared.clone(),
            ));
        }
    }

    /// Flips the light. Returns the new on/off state.
    pub async fn toggle_light(&self) -> bool {
        let (is_on, display) = {
            let mut inner = self.shared.inner.write();
            inner.light.is_on = !inner.light.is_on;
            if inner.light.is_on {
                inner.stop_usage();
                let counter = UsageCounter {
                    shared: self.shared.clone(),
                    generation: inner.usage_generation,
                };
                inner
                    .usage
                    .start(self.shared.options.usage_period, Arc::new(counter));
            } else {
                inner.stop_usage();
            }
            (inner.light.is_on, self.refresh_steady(&mut inner))
        };

        info!("Light turned {}", if is_on { "on" } else { "off" });
        if let Some(display) = display {
            self.shared.notify(FlashlightEvent::Display(display)).await;
        }
        is_on
    }

    /// Stores a brightness, clamped to 0..=100, and returns the stored value.
    pub async fn set_brightness(&self, value: i32) -> Result<u8> {
        let brightness = clamp_brightness(value);
        if i32::from(brightness) != value {
            debug!("Brightness {} clamped to {}", value, brightness);
        }
        let display = {
            let mut inner = self.shared.inner.write();
            inner.settings.brightness = brightness;
            inner.light.brightness = brightness;
            if inner.light.is_on {
                self.refresh_steady(&mut inner)
            } else {
                None
            }
        };
        self.shared.persist().await?;
        if let Some(display) = display {
            self.shared.notify(FlashlightEvent::Display(display)).await;
        }
        Ok(brightness)
    }

    /// Stores a light color. An empty string means the picker was cancelled
    /// and nothing changes; the return value says whether anything did.
    pub async fn set_color(&self, color: &str) -> Result<bool> {
        if color.is_empty() {
            return Ok(false);
        }
        validate_color(color)?;
        let display = {
            let mut inner = self.shared.inner.write();
            inner.settings.light_color = Some(color.to_string());
            inner.light.color = color.to_string();
            if inner.light.is_on {
                self.refresh_steady(&mut inner)
            } else {
                None
            }
        };
        info!("Light color set to {}", color);
        self.shared.persist().await?;
        if let Some(display) = display {
            self.shared.notify(FlashlightEvent::Display(display)).await;
        }
        Ok(true)
    }

    pub async fn toggle_strobe(&self) -> bool {
        self.toggle_pattern(BlinkPattern::Strobe).await
    }

    /// Starts or stops the SOS pattern. Starting it with contacts registered
    /// raises a simulated emergency alert.
    pub async fn toggle_sos(&self) -> bool {
        self.toggle_pattern(BlinkPattern::Sos).await
    }

    /// Only one pattern runs at a time: starting one stops the other.
    async fn toggle_pattern(&self, pattern: BlinkPattern) -> bool {
        let (running, alert, display) = {
            let mut inner = self.shared.inner.write();
            let previous = inner.stop_pattern();
            if previous == Some(pattern) {
                let display = inner.steady_display();
                inner.display = display.clone();
                (false, None, Some(display))
            } else {
                if let Some(previous) = previous {
                    info!("Stopping {} to start {}", previous.name(), pattern.name());
                }
                inner.blink_generation += 1;
                let generation = inner.blink_generation;
                let lamp = BlinkLamp {
                    shared: self.shared.clone(),
                    generation,
                };
                let worker = Worker::spawn(pattern.name(), move |mut stop| async move {
                    blink::run_pattern(pattern, &lamp, &mut stop).await;
                });
                inner.blink = Some(ActivePattern {
                    pattern,
                    generation,
                    worker,
                });
                let alert = (pattern == BlinkPattern::Sos && !inner.contacts.is_empty())
                    .then(|| EmergencyAlert::new(inner.contacts.len(), chrono::Local::now()));
                (true, alert, None)
            }
        };

        info!(
            "{} {}",
            pattern.name(),
            if running { "started" } else { "stopped" }
        );
        if let Some(display) = display {
            self.shared.notify(FlashlightEvent::Display(display)).await;
        }
        if let Some(alert) = alert {
            warn!("{}", alert.message);
            self.shared.notify(FlashlightEvent::Alert(alert)).await;
        }
        running
    }

    /// Registers an emergency contact. Empty fields are ignored and return
    /// `Ok(false)`.
    pub async fn add_contact(&self, name: &str, phone: &str) -> Result<bool> {
        let contacts = {
            let mut inner = self.shared.inner.write();
            if !inner.contacts.add(name, phone) {
                None
            } else {
                let contacts = inner.contacts.list().to_vec();
                inner.settings.emergency_contacts = contacts.clone();
                Some(contacts)
            }
        };
        let Some(contacts) = contacts else {
            debug!("Ignoring contact with empty name or phone");
            return Ok(false);
        };
        info!("Added emergency contact {}", name);
        self.shared.persist().await?;
        self.shared
            .notify(FlashlightEvent::ContactsChanged { contacts })
            .await;
        Ok(true)
    }

    /// Stops any pattern and the usage timer, and waits for the battery
    /// simulator to exit.
    pub async fn shutdown(&self) {
        self.stop_workers();
        let worker = self.battery_worker.lock().take();
        if let Some(worker) = worker {
            worker.shutdown().await;
        }
    }

    pub fn light_state(&self) -> LightState {
        self.shared.inner.read().light.clone()
    }

    pub fn display(&self) -> DisplayState {
        self.shared.inner.read().display.clone()
    }

    pub fn battery_level(&self) -> u8 {
        self.shared.inner.read().battery.level()
    }

    pub fn battery_status(&self) -> BatteryStatus {
        self.shared.inner.read().battery.status()
    }

    pub fn usage_time(&self) -> u32 {
        self.shared.inner.read().settings.usage_time
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.shared.inner.read().contacts.list().to_vec()
    }

    pub fn settings(&self) -> Settings {
        self.shared.inner.read().settings.clone()
    }

    pub fn is_tracking_usage(&self) -> bool {
        self.shared.inner.read().usage.is_running()
    }

    pub fn active_pattern(&self) -> Option<BlinkPattern> {
        self.shared.inner.read().blink.as_ref().map(|a| a.pattern)
    }

    pub fn is_strobe_running(&self) -> bool {
        self.active_pattern() == Some(BlinkPattern::Strobe)
    }

    pub fn is_sos_running(&self) -> bool {
        self.active_pattern() == Some(BlinkPattern::Sos)
    }

    /// Applies the steady display unless a pattern owns the lamp.
    fn refresh_steady(&self, inner: &mut Inner) -> Option<DisplayState> {
        if inner.blink.is_some() {
            return None;
        }
        inner.display = inner.steady_display();
        Some(inner.display.clone())
    }

    fn stop_workers(&self) {
        let mut inner = self.shared.inner.write();
        if let Some(pattern) = inner.stop_pattern() {
            debug!("Stopped {} pattern", pattern.name());
        }
        inner.stop_usage();
    }
}

impl Drop for Flashlight {
    fn drop(&mut self) {
        self.stop_workers();
        if let Some(mut worker) = self.battery_worker.lock().take() {
            debug!("Stopping {} worker", worker.name());
            worker.stop();
        }
    }
}
