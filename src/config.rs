use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::transfer::TenantRegion;

/// Prefix for environment overrides, e.g. `NCE__PARTNER_CENTER__REGIONS__US__APP_SECRET`
pub const ENV_PREFIX: &str = "NCE";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub partner_center: PartnerCenterConfig,
    pub billing: BillingConfig,
    /// SendGrid notification settings; notifications are only logged when absent
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Outbound HTTP settings shared by every client
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PartnerCenterConfig {
    /// OAuth authority, e.g. `https://login.microsoftonline.com`
    pub login_url: String,
    pub scope: String,
    /// Partner Center REST root, e.g. `https://api.partnercenter.microsoft.com`
    pub base_url: String,
    #[serde(default)]
    pub regions: RegionsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RegionsConfig {
    #[serde(default)]
    pub us: RegionCredentials,
    #[serde(default)]
    pub ca: RegionCredentials,
    #[serde(default)]
    pub eu: RegionCredentials,
}

impl RegionsConfig {
    pub fn get(&self, region: TenantRegion) -> &RegionCredentials {
        match region {
            TenantRegion::US => &self.us,
            TenantRegion::CA => &self.ca,
            TenantRegion::EU => &self.eu,
        }
    }
}

/// Per-region app registration. Empty values are allowed at load time and
/// rejected when the region first needs a token.
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct RegionCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub app_secret: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl RegionCredentials {
    /// First required key that is empty, if any
    pub fn missing_key(&self) -> Option<&'static str> {
        [
            ("client_id", &self.client_id),
            ("app_secret", &self.app_secret),
            ("tenant_id", &self.tenant_id),
            ("refresh_token", &self.refresh_token),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
    }
}

impl std::fmt::Debug for RegionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionCredentials")
            .field("client_id", &self.client_id)
            .field("tenant_id", &self.tenant_id)
            .field("app_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BillingConfig {
    /// Downstream endpoint receiving the transfer JSON
    pub forward_url: String,
    /// Cumulus import RPC; import is reported as failed when unset
    #[serde(default)]
    pub import_url: Option<String>,
    #[serde(default)]
    pub import_api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    #[serde(default = "default_sendgrid_url")]
    pub api_url: String,
    pub from_email: String,
    pub from_name: String,
    pub to_email: String,
    pub to_name: String,
}

fn default_sendgrid_url() -> String {
    "https://api.sendgrid.com".to_string()
}

impl AppConfig {
    /// Load `config/{env}.yaml`, then apply `NCE__*` environment overrides
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(&format!("config/{}", env)).required(true))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Parse a YAML document without touching the filesystem or environment
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(content, config::FileFormat::Yaml))
            .build()?
            .try_deserialize()
    }
}
