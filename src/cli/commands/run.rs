use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;
use flashlight_rs::{Flashlight, FlashlightEvent, FlashlightObserver, usage_label};
use tracing::error;

use crate::{Params, utils::open_flashlight};

const BRIGHTNESS_STEP: i32 = 10;
const HELP: &str = "l: light  +/-: brightness  s: strobe  o: SOS  c: contacts  q: quit";

/// Prints events as they arrive. Raw mode needs explicit carriage returns.
struct ConsoleObserver;

#[async_trait]
impl FlashlightObserver for ConsoleObserver {
    async fn status_update(&self, event: &FlashlightEvent) {
        match event {
            FlashlightEvent::Display(display) => {
                print!("[{}] {}\r\n", display.background, display.status)
            }
            FlashlightEvent::Battery(status) => {
                let marker = if status.low { " (low)" } else { "" };
                print!("{}{}\r\n", status.label(), marker)
            }
            FlashlightEvent::UsageTime { minutes } => print!("{}\r\n", usage_label(*minutes)),
            FlashlightEvent::Alert(alert) => {
                print!("*** Emergency Alert ***\r\n");
                for line in alert.dialog_text().lines() {
                    print!("{}\r\n", line);
                }
            }
            FlashlightEvent::ContactsChanged { contacts } => {
                print!("{} emergency contacts\r\n", contacts.len())
            }
        }
    }
}

pub async fn run(params: &Params) -> Result<()> {
    let flashlight = open_flashlight(params, Some(Arc::new(ConsoleObserver))).await?;
    flashlight.start();

    let status = flashlight.battery_status();
    println!("{}", status.label());
    println!("{}", usage_label(flashlight.usage_time()));
    println!("{}", HELP);

    terminal::enable_raw_mode()?;
    let result = key_loop(&flashlight).await;
    terminal::disable_raw_mode()?;

    flashlight.shutdown().await;
    result
}

async fn key_loop(flashlight: &Flashlight) -> Result<()> {
    loop {
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                print!("Exiting...\r\n");
                return Ok(());
            }
            KeyCode::Char('l') => {
                flashlight.toggle_light().await;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                step_brightness(flashlight, BRIGHTNESS_STEP).await;
            }
            KeyCode::Char('-') => {
                step_brightness(flashlight, -BRIGHTNESS_STEP).await;
            }
            KeyCode::Char('s') => {
                flashlight.toggle_strobe().await;
            }
            KeyCode::Char('o') => {
                flashlight.toggle_sos().await;
            }
            KeyCode::Char('c') => {
                for contact in flashlight.contacts() {
                    print!("{}\r\n", contact);
                }
            }
            KeyCode::Char('h') => print!("{}\r\n", HELP),
            _ => {}
        }
    }
}

async fn step_brightness(flashlight: &Flashlight, delta: i32) {
    let current = i32::from(flashlight.light_state().brightness);
    match flashlight.set_brightness(current + delta).await {
        Ok(value) => print!("Brightness: {}%\r\n", value),
        Err(e) => error!("Failed to save brightness: {}", e),
    }
}
