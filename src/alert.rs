use chrono::{DateTime, Local};
use serde::Serialize;

/// Simulated emergency alert raised when SOS starts. Nothing is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyAlert {
    pub contact_count: usize,
    pub message: String,
}

impl EmergencyAlert {
    pub fn new(contact_count: usize, at: DateTime<Local>) -> Self {
        Self {
            contact_count,
            message: format!(
                "EMERGENCY: SOS signal activated at {}",
                at.format("%Y-%m-%d %H:%M:%S")
            ),
        }
    }

    /// Text for the confirmation dialog.
    pub fn dialog_text(&self) -> String {
        format!(
            "Emergency alert would be sent to {} contacts\n\n{}",
            self.contact_count, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_alert_text() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 21, 5, 7).unwrap();
        let alert = EmergencyAlert::new(2, at);
        assert_eq!(alert.message, "EMERGENCY: SOS signal activated at 2024-03-09 21:05:07");
        assert_eq!(
            alert.dialog_text(),
            "Emergency alert would be sent to 2 contacts\n\nEMERGENCY: SOS signal activated at 2024-03-09 21:05:07"
        );
    }
}
