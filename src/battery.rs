use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::light::battery_label;
use crate::worker::Worker;

pub const FULL_BATTERY: u8 = 100;
pub const LOW_BATTERY_THRESHOLD: u8 = 20;

/// Simulated battery. It only ever drains, never below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Battery {
    level: u8,
    low_threshold: u8,
}

impl Default for Battery {
    fn default() -> Self {
        Self::new(FULL_BATTERY, LOW_BATTERY_THRESHOLD)
    }
}

impl Battery {
    pub fn new(level: u8, low_threshold: u8) -> Self {
        Self {
            level: level.min(FULL_BATTERY),
            low_threshold,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_low(&self) -> bool {
        self.level < self.low_threshold
    }

    pub fn drain(&mut self, amount: u8) -> u8 {
        self.level = self.level.saturating_sub(amount);
        self.level
    }

    pub fn status(&self) -> BatteryStatus {
        BatteryStatus {
            level: self.level,
            low: self.is_low(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatteryStatus {
    pub level: u8,
    pub low: bool,
}

impl BatteryStatus {
    pub fn label(&self) -> String {
        battery_label(self.level)
    }
}

/// Whatever the simulator drains on each tick.
#[async_trait]
pub trait BatteryLoad: Send + Sync + 'static {
    async fn battery_tick(&self);
}

/// Starts the free-running drain loop. It ticks every `period` until the
/// returned worker is stopped or dropped.
pub fn spawn_simulator<L: BatteryLoad>(period: Duration, load: Arc<L>) -> Worker {
    Worker::spawn("battery", move |mut stop| async move {
        while stop.wait(period).await {
            load.battery_tick().await;
        }
        debug!("Battery simulator stopped");
    })
}
