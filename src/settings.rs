use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use serde_json;
use std::collections::HashMap;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct RegistrySettings {
    /// Base URL of the chain registry directory. An empty string disables
    /// remote lookups, leaving only configured chains resolvable.
    #[serde(default = "default_registry_base_url")]
    pub base_url: String,
    #[serde(default = "default_registry_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_registry_retry_base_ms")]
    pub retry_base_ms: u64,
    #[serde(default = "default_registry_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_registry_base_url() -> String {
    // Por defecto se consulta el directorio público
    "https://chains.cosmos.directory".to_string()
}
fn default_registry_retry_attempts() -> u32 {
    3
}
fn default_registry_retry_base_ms() -> u64 {
    200
}
fn default_registry_timeout_ms() -> u64 {
    5000
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: default_registry_base_url(),
            retry_attempts: default_registry_retry_attempts(),
            retry_base_ms: default_registry_retry_base_ms(),
            request_timeout_ms: default_registry_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    #[serde(default = "default_client_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Reject endpoints whose node reports a chain id other than the expected one
    #[serde(default = "default_true")]
    pub verify_chain_id: bool,
    #[serde(default = "default_max_endpoint_attempts")]
    pub max_endpoint_attempts: usize,
}

fn default_client_timeout_ms() -> u64 {
    10_000
}
fn default_max_endpoint_attempts() -> usize {
    4
}
fn default_true() -> bool {
    true
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_client_timeout_ms(),
            verify_chain_id: default_true(),
            max_endpoint_attempts: default_max_endpoint_attempts(),
        }
    }
}

/// Static endpoint configuration for a single chain. Takes precedence over
/// the remote registry whenever an endpoint list is non-empty; a bare
/// `chain_id` only pins the expected network for registry-resolved endpoints.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChainSettings {
    #[serde(default)]
    pub chain_id: Option<String>,
    #[serde(default)]
    pub rpc: Vec<String>,
    #[serde(default)]
    pub rest: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TxSettings {
    #[serde(default = "default_send_amount")]
    pub default_send_amount: String,
    #[serde(default = "default_fee_amount")]
    pub fee_amount: String,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
}

fn default_send_amount() -> String {
    "1000".to_string()
}
fn default_fee_amount() -> String {
    "2000".to_string()
}
fn default_gas_limit() -> u64 {
    86_364
}

impl Default for TxSettings {
    fn default() -> Self {
        Self {
            default_send_amount: default_send_amount(),
            fee_amount: default_fee_amount(),
            gas_limit: default_gas_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[default]
    #[serde(rename = "pretty")]
    Pretty,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub registry: RegistrySettings,
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub tx: TxSettings,
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub chains: HashMap<String, ChainSettings>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("Config.toml"))
            .build()?;
        Self::load(s)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;
        Self::load(s)
    }

    fn load(config: Config) -> Result<Self, ConfigError> {
        let mut settings: Self = config.try_deserialize()?;

        // Environment variable overrides for registry configuration
        if let Ok(raw_base) = env::var("ICQ_REGISTRY_BASE_URL") {
            let trimmed = raw_base.trim();
            if !trimmed.is_empty() {
                settings.registry.base_url = trimmed.to_string();
            }
        }

        // Optional: per-chain REST endpoint overrides via ENV
        // (JSON: { chain_name: [urls] }, or chain=url pairs separated by commas)
        if let Ok(raw_endpoints) = env::var("ICQ_CHAIN_ENDPOINTS") {
            if let Some(overrides) = parse_endpoint_overrides(&raw_endpoints) {
                for (chain, urls) in overrides {
                    if urls.is_empty() {
                        continue;
                    }
                    settings.chains.entry(chain).or_default().rest = urls;
                }
            }
        }

        normalize_endpoints(&mut settings);

        Ok(settings)
    }
}

fn parse_endpoint_overrides(input: &str) -> Option<HashMap<String, Vec<String>>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(HashMap::new());
    }

    // Si parece JSON (empieza con '{'), intentar parsear como JSON
    if trimmed.starts_with('{') {
        match serde_json::from_str::<HashMap<String, Vec<String>>>(trimmed) {
            Ok(map) => return Some(map),
            Err(e) => {
                eprintln!("Failed to parse ICQ_CHAIN_ENDPOINTS as JSON: {}", e);
                return None;
            }
        }
    }

    // Fallback: pares chain=url separados por comas; chains repetidos acumulan
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for pair in trimmed.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((chain, url)) if !chain.trim().is_empty() && !url.trim().is_empty() => {
                map.entry(chain.trim().to_string())
                    .or_default()
                    .push(url.trim().to_string());
            }
            _ => {
                eprintln!("Ignoring malformed chain endpoint override '{}'", pair);
            }
        }
    }
    Some(map)
}

fn normalize_endpoints(settings: &mut Settings) {
    settings.registry.base_url = settings
        .registry
        .base_url
        .trim()
        .trim_end_matches('/')
        .to_string();
    for chain in settings.chains.values_mut() {
        chain.rest = tidy_urls(&chain.rest);
        chain.rpc = tidy_urls(&chain.rpc);
    }
}

fn tidy_urls(urls: &[String]) -> Vec<String> {
    urls.iter()
        .map(|u| u.trim().trim_end_matches('/').to_string())
        .filter(|u| !u.is_empty())
        .collect()
}
