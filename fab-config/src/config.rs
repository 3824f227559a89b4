use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOLUTION_VERSION: &str = "av01";

/// Root of a deployment template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default)]
    pub solution_version: Option<String>,

    #[serde(default)]
    pub capacities: Vec<CapacityConfig>,

    #[serde(default)]
    pub workspaces: Vec<WorkspaceConfig>,

    #[serde(default)]
    pub azure: AzureConfig,

    #[serde(default)]
    pub github: GitHubConfig,
}

impl DeployConfig {
    pub fn solution_version(&self) -> &str {
        self.solution_version
            .as_deref()
            .unwrap_or(DEFAULT_SOLUTION_VERSION)
    }

    pub fn resource_group(&self) -> &str {
        &self.azure.capacity_defaults.resource_group
    }

    pub fn capacity(&self, name: &str) -> Option<&CapacityConfig> {
        self.capacities.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AzureConfig {
    #[serde(default)]
    pub capacity_defaults: CapacityDefaults,

    /// Security group display name to directory object id.
    #[serde(default)]
    pub security_groups: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityDefaults {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub resource_group: String,
    #[serde(default)]
    pub capacity_admins: AdminMembers,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityConfig {
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub admin_members: Option<AdminMembers>,
}

impl CapacityConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Region, falling back to the template defaults.
    pub fn region_or<'a>(&'a self, defaults: &'a CapacityDefaults) -> Option<&'a str> {
        self.region.as_deref().or(defaults.region.as_deref())
    }

    pub fn sku_or<'a>(&'a self, defaults: &'a CapacityDefaults) -> Option<&'a str> {
        self.sku.as_deref().or(defaults.sku.as_deref())
    }

    pub fn admins_or(&self, defaults: &CapacityDefaults) -> Vec<String> {
        self.admin_members
            .as_ref()
            .unwrap_or(&defaults.capacity_admins)
            .normalized()
    }
}

/// Capacity administrators, written either as a YAML list or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdminMembers {
    List(Vec<String>),
    Csv(String),
}

impl Default for AdminMembers {
    fn default() -> Self {
        AdminMembers::Csv(String::new())
    }
}

impl AdminMembers {
    pub fn normalized(&self) -> Vec<String> {
        match self {
            AdminMembers::List(members) => members.clone(),
            AdminMembers::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|member| !member.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub name: String,
    pub capacity: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Repository directory the workspace is bound to, if any.
    #[serde(default)]
    pub connect_to_git_folder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub group: String,
    pub role: String,
}

impl Permission {
    pub fn new(group: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_provider() -> String {
    "GitHub".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            organization: String::new(),
            repository: String::new(),
            provider: default_provider(),
            branch: default_branch(),
        }
    }
}

impl GitHubConfig {
    /// Display name used to find a reusable connection for this repository.
    pub fn connection_name(&self) -> String {
        format!("GitHub-{}-{}", self.organization, self.repository)
    }

    pub fn repository_url(&self) -> String {
        format!("https://github.com/{}/{}", self.organization, self.repository)
    }

    pub fn is_configured(&self) -> bool {
        !self.organization.is_empty() && !self.repository.is_empty()
    }
}
