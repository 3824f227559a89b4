use fab_config::PlatformSettings;
use fab_core::Sleeper;
use fab_transport::Transport;

/// Collaborators shared by every lifecycle component.
#[derive(Clone, Copy)]
pub struct ProvisionContext<'a> {
    pub transport: &'a dyn Transport,
    pub sleeper: &'a dyn Sleeper,
    pub settings: &'a PlatformSettings,
}

impl<'a> ProvisionContext<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        sleeper: &'a dyn Sleeper,
        settings: &'a PlatformSettings,
    ) -> Self {
        Self {
            transport,
            sleeper,
            settings,
        }
    }
}
