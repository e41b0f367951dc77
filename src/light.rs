use serde::Serialize;

use crate::error::{FlashlightError, Result};
use crate::settings::{MAX_BRIGHTNESS, Settings};

pub const LOW_BATTERY_STATUS: &str = "Low Battery Warning!";
pub const READY_STATUS: &str = "Ready";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightState {
    pub is_on: bool,
    pub brightness: u8,
    pub color: String,
}

impl From<&Settings> for LightState {
    fn from(settings: &Settings) -> Self {
        Self {
            is_on: false,
            brightness: settings.brightness.min(MAX_BRIGHTNESS),
            color: settings.light_color().to_string(),
        }
    }
}

/// What the window shows: the status line and the background color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub status: String,
    pub background: String,
}

impl DisplayState {
    pub fn ready(theme_color: &str) -> Self {
        Self {
            status: READY_STATUS.to_string(),
            background: theme_color.to_string(),
        }
    }

    /// Lamp output at the given brightness.
    pub fn lit(brightness: u8, light_color: &str) -> Self {
        Self {
            status: format!("Light ON - Brightness: {brightness}%"),
            background: light_color.to_string(),
        }
    }

    pub fn dark(theme_color: &str) -> Self {
        Self {
            status: "Light OFF".to_string(),
            background: theme_color.to_string(),
        }
    }

    /// Steady display for a light that is not running a blink pattern.
    pub fn steady(light: &LightState, theme_color: &str) -> Self {
        if light.is_on {
            Self::lit(light.brightness, &light.color)
        } else {
            Self::dark(theme_color)
        }
    }

    pub fn with_low_battery_warning(mut self) -> Self {
        self.status = LOW_BATTERY_STATUS.to_string();
        self
    }
}

pub fn clamp_brightness(value: i32) -> u8 {
    value.clamp(0, MAX_BRIGHTNESS as i32) as u8
}

/// Accepts `#rgb` and `#rrggbb`.
pub fn validate_color(color: &str) -> Result<()> {
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(FlashlightError::InvalidColor(color.to_string()))
    }
}

pub fn battery_label(level: u8) -> String {
    format!("Battery: {level}%")
}

pub fn usage_label(minutes: u32) -> String {
    format!("Usage time: {minutes} minutes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_is_clamped() {
        assert_eq!(clamp_brightness(-5), 0);
        assert_eq!(clamp_brightness(0), 0);
        assert_eq!(clamp_brightness(42), 42);
        assert_eq!(clamp_brightness(100), 100);
        assert_eq!(clamp_brightness(250), 100);
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#FFFFFF").is_ok());
        assert!(validate_color("#2c3e50").is_ok());
        assert!(validate_color("#fff").is_ok());
        assert!(validate_color("white").is_err());
        assert!(validate_color("#12345").is_err());
        assert!(validate_color("#gggggg").is_err());
    }

    #[test]
    fn test_steady_display() {
        let mut light = LightState {
            is_on: true,
            brightness: 70,
            color: "#ff0000".to_string(),
        };
        let display = DisplayState::steady(&light, "#2c3e50");
        assert_eq!(display.status, "Light ON - Brightness: 70%");
        assert_eq!(display.background, "#ff0000");

        light.is_on = false;
        let display = DisplayState::steady(&light, "#2c3e50");
        assert_eq!(display.status, "Light OFF");
        assert_eq!(display.background, "#2c3e50");
    }

    #[test]
    fn test_light_state_from_settings() {
        let settings = Settings {
            brightness: 30,
            ..Default::default()
        };
        let light = LightState::from(&settings);
        assert!(!light.is_on);
        assert_eq!(light.brightness, 30);
        assert_eq!(light.color, "#FFFFFF");
    }

    #[test]
    fn test_labels() {
        assert_eq!(battery_label(19), "Battery: 19%");
        assert_eq!(usage_label(3), "Usage time: 3 minutes");
    }
}
