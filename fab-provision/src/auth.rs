use fab_config::PlatformSettings;
use fab_core::error::{FabError, Result};
use fab_core::fab_success;
use fab_transport::Transport;
use tracing::info;

/// Log the platform CLI in with the service principal from `settings`.
pub fn login(transport: &dyn Transport, settings: &PlatformSettings) -> Result<()> {
    let (Some(client_id), Some(client_secret), Some(tenant_id)) = (
        settings.client_id.as_deref(),
        settings.client_secret.as_deref(),
        settings.tenant_id.as_deref(),
    ) else {
        return Err(FabError::Config(
            "service principal login needs SPN_CLIENT_ID, SPN_CLIENT_SECRET and AZURE_TENANT_ID"
                .to_string(),
        ));
    };

    let args: Vec<String> = [
        "auth",
        "login",
        "-u",
        client_id,
        "-p",
        client_secret,
        "--tenant",
        tenant_id,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let output = transport.run(&args);
    if !output.success() {
        // stdout/stderr only; the arguments carry the secret.
        let detail = format!(
            "exit code {:?}, stdout: {}, stderr: {}",
            output.exit_code,
            output.stdout.trim(),
            output.stderr.trim()
        );
        return Err(FabError::Auth(detail.replace(client_secret, "***")));
    }

    info!(tenant = tenant_id, client = client_id, "logged in");
    fab_success!("Logged in as service principal {}", client_id);
    Ok(())
}
