use std::sync::Arc;

use anyhow::{Context, Result};
use flashlight_rs::{Flashlight, FlashlightObserver, FlashlightOptions};

use crate::Params;

pub async fn open_flashlight(
    params: &Params,
    observer: Option<Arc<dyn FlashlightObserver>>,
) -> Result<Flashlight> {
    let options = FlashlightOptions::builder()
        .settings_path(params.settings.clone())
        .build()?;
    Flashlight::open(options, observer)
        .await
        .with_context(|| format!("Cannot open settings {}", params.settings.display()))
}
