use anyhow::Result;

use crate::{Params, utils::open_flashlight};

pub async fn add_contact(params: &Params, name: &str, phone: &str) -> Result<()> {
    let flashlight = open_flashlight(params, None).await?;
    if flashlight.add_contact(name, phone).await? {
        println!("Added {} ({})", name, phone);
    } else {
        println!("Name and phone are both required, nothing added");
    }
    Ok(())
}

pub async fn list_contacts(params: &Params) -> Result<()> {
    let flashlight = open_flashlight(params, None).await?;
    let contacts = flashlight.contacts();
    if contacts.is_empty() {
        println!("No emergency contacts");
    }
    for (i, contact) in contacts.iter().enumerate() {
        println!("{:>2}. {}", i + 1, contact);
    }
    Ok(())
}
