use std::net::SocketAddr;
use std::time::Duration;

use leadrelay_core::error::{RelayError, Result};
use leadrelay_core::payload::{campaign_path, CampaignProfile, ComponentDescriptor, PayloadShape};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub destination: DestinationSection,

    #[serde(default)]
    pub campaign: CampaignSection,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            server: ServerSection::default(),
            destination: DestinationSection::default(),
            campaign: CampaignSection::default(),
        }
    }
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RelayError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.destination.validate()?;
        self.campaign.validate()?;

        Ok(())
    }

    /// Full URL of the campaign endpoint for the configured affiliate.
    pub fn destination_url(&self) -> String {
        format!(
            "{}/{}",
            self.destination.base_url.trim_end_matches('/'),
            campaign_path(&self.campaign.affiliate_key)
        )
    }

    pub fn profile(&self) -> CampaignProfile {
        self.campaign.profile()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_landing_page")]
    pub landing_page: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            landing_page: default_landing_page(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            RelayError::Config(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DestinationSection {
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DestinationSection {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl DestinationSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(RelayError::Config(
                "destination.base_url must start with http:// or https://".into(),
            ));
        }
        if !(100..=60000).contains(&self.timeout_ms) {
            return Err(RelayError::Config(
                "destination.timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignSection {
    #[serde(default)]
    pub affiliate_key: String,

    #[serde(default)]
    pub checksum: String,

    #[serde(default)]
    pub redirect_url: String,

    #[serde(default)]
    pub payload_shape: PayloadShape,

    #[serde(default)]
    pub component: ComponentSection,
}

impl CampaignSection {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("campaign.affiliate_key", &self.affiliate_key),
            ("campaign.checksum", &self.checksum),
            ("campaign.redirect_url", &self.redirect_url),
            ("campaign.component.id", &self.component.id),
            ("campaign.component.name", &self.component.name),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(RelayError::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn profile(&self) -> CampaignProfile {
        CampaignProfile {
            affiliate_key: self.affiliate_key.clone(),
            checksum: self.checksum.clone(),
            component: ComponentDescriptor {
                id: self.component.id.clone(),
                name: self.component.name.clone(),
                path: campaign_path(&self.affiliate_key),
                method: self.component.method.clone(),
                locale: self.component.locale.clone(),
            },
            shape: self.payload_shape,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentSection {
    #[serde(default)]
    pub id: String,

    #[serde(default = "default_component_name")]
    pub name: String,

    #[serde(default = "default_component_method")]
    pub method: String,

    #[serde(default = "default_component_locale")]
    pub locale: String,
}

impl Default for ComponentSection {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: default_component_name(),
            method: default_component_method(),
            locale: default_component_locale(),
        }
    }
}

fn default_version() -> u32 {
    1
}
fn default_listen() -> String {
    "0.0.0.0:5000".into()
}
fn default_landing_page() -> String {
    "static/index.html".into()
}
fn default_timeout_ms() -> u64 {
    10000
}
fn default_user_agent() -> String {
    concat!("leadrelay/", env!("CARGO_PKG_VERSION")).into()
}
fn default_component_name() -> String {
    "campaign.show".into()
}
fn default_component_method() -> String {
    "POST".into()
}
fn default_component_locale() -> String {
    "en".into()
}
