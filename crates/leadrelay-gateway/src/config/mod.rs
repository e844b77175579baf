//! Relay config loader (strict parsing + environment overrides).
//!
//! Values come from a YAML file and can be overridden per deployment through
//! environment variables. The resulting [`RelayConfig`] is built once at startup
//! and passed into the app state; handlers never read the environment.

pub mod schema;

use std::fs;
use std::path::Path;

use leadrelay_core::error::{Result, RelayError};

pub use schema::{
    CampaignSection, ComponentSection, DestinationSection, RelayConfig, ServerSection,
};

/// Env var naming the YAML file to load.
pub const CONFIG_PATH_ENV: &str = "LEADRELAY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "leadrelay.yaml";

pub const PORT_ENV: &str = "PORT";
pub const DESTINATION_URL_ENV: &str = "LEADRELAY_DESTINATION_URL";
pub const AFFILIATE_KEY_ENV: &str = "LEADRELAY_AFFILIATE_KEY";
pub const CHECKSUM_ENV: &str = "LEADRELAY_CHECKSUM";
pub const REDIRECT_URL_ENV: &str = "LEADRELAY_REDIRECT_URL";
pub const COMPONENT_ID_ENV: &str = "LEADRELAY_COMPONENT_ID";

/// Load from the process environment: file, then env overrides.
///
/// A file named by `LEADRELAY_CONFIG` must exist; the default `leadrelay.yaml`
/// is optional.
pub fn load() -> Result<RelayConfig> {
    load_with(|k| std::env::var(k).ok())
}

/// Same as [`load`], with a caller-supplied variable lookup.
pub fn load_with<F>(lookup: F) -> Result<RelayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Only the implicit default path may be absent.
    let mut cfg = match lookup(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        Some(path) => parse_file(&path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => parse_file(DEFAULT_CONFIG_PATH)?,
        None => {
            tracing::info!(
                path = DEFAULT_CONFIG_PATH,
                "config file not found, using defaults and environment"
            );
            RelayConfig::default()
        }
    };

    apply_env_overrides(&mut cfg, &lookup)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<RelayConfig> {
    let cfg = parse_file(path)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<RelayConfig> {
    let cfg = parse_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse_file(path: &str) -> Result<RelayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RelayError::Config(format!("read config failed ({path}): {e}")))?;
    parse_str(&s)
}

fn parse_str(s: &str) -> Result<RelayConfig> {
    serde_yaml::from_str(s).map_err(|e| RelayError::Config(format!("invalid yaml: {e}")))
}

/// Apply deployment overrides on top of file values. Empty variables are ignored.
pub fn apply_env_overrides<F>(cfg: &mut RelayConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |k: &str| lookup(k).filter(|v| !v.is_empty());

    if let Some(port) = get(PORT_ENV) {
        let port: u16 = port
            .parse()
            .map_err(|e| RelayError::Config(format!("{PORT_ENV} must be a port number: {e}")))?;
        let listen = match cfg.server.listen.rsplit_once(':') {
            Some((host, _)) => format!("{host}:{port}"),
            None => format!("0.0.0.0:{port}"),
        };
        cfg.server.listen = listen;
    }
    if let Some(v) = get(DESTINATION_URL_ENV) {
        cfg.destination.base_url = v;
    }
    if let Some(v) = get(AFFILIATE_KEY_ENV) {
        cfg.campaign.affiliate_key = v;
    }
    if let Some(v) = get(CHECKSUM_ENV) {
        cfg.campaign.checksum = v;
    }
    if let Some(v) = get(REDIRECT_URL_ENV) {
        cfg.campaign.redirect_url = v;
    }
    if let Some(v) = get(COMPONENT_ID_ENV) {
        cfg.campaign.component.id = v;
    }

    Ok(())
}
