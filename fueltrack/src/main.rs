use anyhow::Result;

use fueltrack::{settings::Settings, App};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    settings.validate().map_err(anyhow::Error::msg)?;

    App::new(settings).run().await?;

    Ok(())
}
