use async_trait::async_trait;
use serde::Serialize;

use crate::alert::EmergencyAlert;
use crate::battery::BatteryStatus;
use crate::contacts::Contact;
use crate::light::DisplayState;

/// Everything the presentation layer gets told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlashlightEvent {
    Display(DisplayState),
    Battery(BatteryStatus),
    UsageTime { minutes: u32 },
    Alert(EmergencyAlert),
    ContactsChanged { contacts: Vec<Contact> },
}

#[async_trait]
pub trait FlashlightObserver: Send + Sync {
    async fn status_update(&self, event: &FlashlightEvent);
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    pub struct RecordingObserver {
        pub events: Mutex<Vec<FlashlightEvent>>,
    }

    impl RecordingObserver {
        pub fn alerts(&self) -> Vec<EmergencyAlert> {
            self.events
                .lock()
                .iter()
                .filter_map(|e| match e {
                    FlashlightEvent::Alert(alert) => Some(alert.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn displays(&self) -> Vec<DisplayState> {
            self.events
                .lock()
                .iter()
                .filter_map(|e| match e {
                    FlashlightEvent::Display(display) => Some(display.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl FlashlightObserver for RecordingObserver {
        async fn status_update(&self, event: &FlashlightEvent) {
            self.events.lock().push(event.clone());
        }
    }
}
