mod contacts;
mod run;
mod settings;

pub use contacts::{add_contact, list_contacts};
pub use run::run;
pub use settings::{set_brightness, set_color, show};
