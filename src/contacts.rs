use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.phone)
    }
}

/// Ordered, append-only list of emergency contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRegistry {
    contacts: Vec<Contact>,
}

impl From<Vec<Contact>> for ContactRegistry {
    fn from(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }
}

impl ContactRegistry {
    /// Appends a contact. Returns `false` and leaves the list untouched when
    /// either field is empty.
    pub fn add(&mut self, name: &str, phone: &str) -> bool {
        if name.is_empty() || phone.is_empty() {
            return false;
        }
        self.contacts.push(Contact {
            name: name.to_string(),
            phone: phone.to_string(),
        });
        true
    }

    pub fn list(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
