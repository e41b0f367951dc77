use anyhow::{Result, bail};
use flashlight_rs::usage_label;

use crate::{Params, utils::open_flashlight};

pub async fn set_brightness(params: &Params, value: i32) -> Result<()> {
    let flashlight = open_flashlight(params, None).await?;
    let stored = flashlight.set_brightness(value).await?;
    println!("Brightness set to {}%", stored);
    Ok(())
}

pub async fn set_color(params: &Params, value: &str) -> Result<()> {
    let flashlight = open_flashlight(params, None).await?;
    if !flashlight.set_color(value).await? {
        bail!("No color given");
    }
    println!("Light color set to {}", value);
    Ok(())
}

pub async fn show(params: &Params) -> Result<()> {
    let flashlight = open_flashlight(params, None).await?;
    let settings = flashlight.settings();
    println!("{}", serde_json::to_string_pretty(&settings)?);
    println!("{}", usage_label(settings.usage_time));
    Ok(())
}
