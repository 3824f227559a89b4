use fab_core::error::{FabError, Result};

pub const DEFAULT_ARM_API_VERSION: &str = "2023-11-01";

/// Platform-level settings shared by the lifecycle components.
///
/// Built once from the environment by the binary and passed down explicitly,
/// so several subscriptions can coexist in one process.
#[derive(Clone, PartialEq, Eq)]
pub struct PlatformSettings {
    pub subscription_id: String,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Opaque credential handed to the platform when creating a GitHub connection.
    pub github_pat: Option<String>,
    pub arm_api_version: String,
}

impl std::fmt::Debug for PlatformSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformSettings")
            .field("subscription_id", &self.subscription_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("github_pat", &self.github_pat.as_ref().map(|_| "***"))
            .field("arm_api_version", &self.arm_api_version)
            .finish()
    }
}

impl PlatformSettings {
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            tenant_id: None,
            client_id: None,
            client_secret: None,
            github_pat: None,
            arm_api_version: DEFAULT_ARM_API_VERSION.to_string(),
        }
    }

    /// Read settings from `AZURE_SUBSCRIPTION_ID`, `AZURE_TENANT_ID`,
    /// `SPN_CLIENT_ID`, `SPN_CLIENT_SECRET` and `GITHUB_PAT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let subscription_id = non_empty("AZURE_SUBSCRIPTION_ID").ok_or_else(|| {
            FabError::Config("AZURE_SUBSCRIPTION_ID is not set".to_string())
        })?;

        Ok(Self {
            subscription_id,
            tenant_id: non_empty("AZURE_TENANT_ID"),
            client_id: non_empty("SPN_CLIENT_ID"),
            client_secret: non_empty("SPN_CLIENT_SECRET"),
            github_pat: non_empty("GITHUB_PAT"),
            arm_api_version: DEFAULT_ARM_API_VERSION.to_string(),
        })
    }

    pub fn with_service_principal(
        mut self,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_github_pat(mut self, pat: impl Into<String>) -> Self {
        self.github_pat = Some(pat.into());
        self
    }

    /// ARM path prefix for a resource group in this subscription.
    pub fn resource_group_path(&self, resource_group: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}",
            self.subscription_id, resource_group
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup_requires_subscription() {
        let result = PlatformSettings::from_lookup(|_| None);
        assert!(matches!(result, Err(FabError::Config(_))));
    }

    #[test]
    fn test_from_lookup_reads_credentials() {
        let vars: HashMap<&str, &str> = [
            ("AZURE_SUBSCRIPTION_ID", "sub-1"),
            ("AZURE_TENANT_ID", "tenant"),
            ("SPN_CLIENT_ID", "client"),
            ("SPN_CLIENT_SECRET", "secret"),
            ("GITHUB_PAT", ""),
        ]
        .into_iter()
        .collect();

        let settings =
            PlatformSettings::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(settings.subscription_id, "sub-1");
        assert_eq!(settings.client_secret.as_deref(), Some("secret"));
        assert_eq!(settings.github_pat, None);
        assert_eq!(settings.arm_api_version, "2023-11-01");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = PlatformSettings::new("sub")
            .with_service_principal("t", "c", "hunter2")
            .with_github_pat("ghp_secret");
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("ghp_secret"));
    }

    #[test]
    fn test_resource_group_path() {
        let settings = PlatformSettings::new("sub-1");
        assert_eq!(
            settings.resource_group_path("rg-data"),
            "/subscriptions/sub-1/resourceGroups/rg-data"
        );
    }
}
