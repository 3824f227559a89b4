use fab_config::PlatformSettings;
use fab_core::error::Result;
use fab_transport::FabCliTransport;

use super::Outcome;

pub fn handle_login() -> Result<Outcome> {
    let transport = FabCliTransport::discover()?;
    let settings = PlatformSettings::from_env()?;
    fab_provision::login(&transport, &settings)?;
    Ok(Outcome::Clean)
}
