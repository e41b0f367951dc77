use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use flashlight_rs::{
    Contact, Flashlight, FlashlightEvent, FlashlightObserver, FlashlightOptions, SettingsStore,
};
use tempfile::TempDir;

#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<FlashlightEvent>>,
}

#[async_trait]
impl FlashlightObserver for EventLog {
    async fn status_update(&self, event: &FlashlightEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn options(dir: &TempDir) -> FlashlightOptions {
    FlashlightOptions::builder()
        .settings_path(dir.path().join("flashlight_settings.json"))
        .build()
        .unwrap()
}

#[tokio::test]
async fn settings_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    {
        let flashlight = Flashlight::open(options(&dir), None).await.unwrap();
        flashlight.set_brightness(35).await.unwrap();
        flashlight.set_color("#ffaa00").await.unwrap();
        flashlight.add_contact("Alice", "555-1234").await.unwrap();
        flashlight.add_contact("Bob", "555-9876").await.unwrap();
    }

    let flashlight = Flashlight::open(options(&dir), None).await.unwrap();
    let light = flashlight.light_state();
    assert!(!light.is_on);
    assert_eq!(light.brightness, 35);
    assert_eq!(light.color, "#ffaa00");
    assert_eq!(
        flashlight.contacts(),
        vec![
            Contact {
                name: "Alice".to_string(),
                phone: "555-1234".to_string()
            },
            Contact {
                name: "Bob".to_string(),
                phone: "555-9876".to_string()
            },
        ]
    );

    let store = SettingsStore::new(dir.path().join("flashlight_settings.json"));
    let loaded = store.load().await.unwrap();
    store.save(&loaded).await.unwrap();
    assert_eq!(store.load().await.unwrap(), loaded);
}

#[tokio::test(start_paused = true)]
async fn sos_session_with_contacts() {
    let dir = TempDir::new().unwrap();
    let log = Arc::new(EventLog::default());
    let flashlight = Flashlight::open(options(&dir), Some(log.clone()))
        .await
        .unwrap();
    flashlight.start();
    flashlight.add_contact("Alice", "555-1234").await.unwrap();

    flashlight.toggle_light().await;
    assert!(flashlight.toggle_sos().await);
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert!(!flashlight.toggle_sos().await);

    assert_eq!(flashlight.usage_time(), 1);
    assert_eq!(flashlight.battery_level(), 94);
    assert_eq!(flashlight.display().status, "Light ON - Brightness: 100%");

    let events = log.events.lock().unwrap().clone();
    let alerts = events
        .iter()
        .filter(|e| matches!(e, FlashlightEvent::Alert(alert) if alert.contact_count == 1))
        .count();
    assert_eq!(alerts, 1);
    assert!(events.contains(&FlashlightEvent::UsageTime { minutes: 1 }));

    flashlight.shutdown().await;
}
