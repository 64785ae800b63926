use crate::core::affiliate::{default_partners, AffiliateTable};
use crate::core::sanitizer::LinkPolicy;
use crate::domain::model::AffiliatePartner;
use crate::utils::error::{CurateError, Result};
use crate::utils::validation::{
    validate_https_url, validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub sanitizer: SanitizerConfig,
    #[serde(default = "default_partners")]
    pub affiliates: Vec<AffiliatePartner>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Unset means the HTTP client's own default.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SanitizerConfig {
    #[serde(default)]
    pub link_policy: LinkPolicy,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_max_output_tokens() -> u32 {
    900
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            max_output_tokens: default_max_output_tokens(),
            timeout_seconds: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            generation: GenerationConfig::default(),
            sanitizer: SanitizerConfig::default(),
            affiliates: default_partners(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CurateError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CurateError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// Configuration from process environment, for deployments without a file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = lookup("BIND") {
            config.server.bind = bind;
        }
        if let Some(port) = lookup("PORT") {
            config.server.port =
                port.trim()
                    .parse()
                    .map_err(|_| CurateError::InvalidConfigValueError {
                        field: "PORT".to_string(),
                        value: port.clone(),
                        reason: "Port must be a number between 0 and 65535".to_string(),
                    })?;
        }
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            config.generation.api_key = api_key;
        }
        if let Some(endpoint) = lookup("OPENAI_BASE_URL") {
            config.generation.endpoint = endpoint;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            config.generation.model = model;
        }
        if let Some(policy) = lookup("GIFT_LANE_LINK_POLICY") {
            config.sanitizer.link_policy =
                LinkPolicy::from_name(&policy).ok_or_else(|| {
                    CurateError::InvalidConfigValueError {
                        field: "GIFT_LANE_LINK_POLICY".to_string(),
                        value: policy.clone(),
                        reason: "Expected 'strict' or 'permissive'".to_string(),
                    }
                })?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr =
            self.server
                .bind
                .parse()
                .map_err(|_| CurateError::InvalidConfigValueError {
                    field: "server.bind".to_string(),
                    value: self.server.bind.clone(),
                    reason: "Not an IP address".to_string(),
                })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn affiliate_table(&self) -> AffiliateTable {
        AffiliateTable::new(self.affiliates.clone())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.socket_addr()?;

        validate_url("generation.endpoint", &self.generation.endpoint)?;
        if self.generation.api_key.trim().is_empty() {
            return Err(CurateError::MissingConfigError {
                field: "generation.api_key".to_string(),
            });
        }
        validate_non_empty_string("generation.model", &self.generation.model)?;
        validate_positive_number(
            "generation.max_output_tokens",
            self.generation.max_output_tokens as usize,
            1,
        )?;

        let mut brand_keys = HashSet::new();
        for (i, partner) in self.affiliates.iter().enumerate() {
            let field = |name: &str| format!("affiliates[{}].{}", i, name);

            validate_non_empty_string(&field("brand_key"), &partner.brand_key)?;
            validate_non_empty_string(&field("brand"), &partner.brand)?;
            validate_https_url(&field("affiliate_url"), &partner.affiliate_url)?;

            if !brand_keys.insert(partner.brand_key.as_str()) {
                return Err(CurateError::InvalidConfigValueError {
                    field: field("brand_key"),
                    value: partner.brand_key.clone(),
                    reason: "Duplicate brand_key".to_string(),
                });
            }
            if partner.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(CurateError::InvalidConfigValueError {
                    field: field("keywords"),
                    value: format!("{:?}", partner.keywords),
                    reason: "At least one non-empty keyword is required".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
[generation]
api_key = "sk-test"
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 10000);
        assert_eq!(config.generation.model, "gpt-4.1-mini");
        assert_eq!(config.generation.max_output_tokens, 900);
        assert_eq!(config.sanitizer.link_policy, LinkPolicy::Strict);
        assert_eq!(config.affiliates.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_toml_config() {
        let config = AppConfig::from_toml_str(
            r#"
[server]
bind = "127.0.0.1"
port = 8080

[generation]
endpoint = "http://localhost:9000/v1"
api_key = "sk-test"
model = "gpt-4.1"
max_output_tokens = 1200
timeout_seconds = 30

[sanitizer]
link_policy = "permissive"

[[affiliates]]
brand_key = "acme"
brand = "Acme"
affiliate_url = "https://acme.example/aff?id=1"
keywords = ["acme"]
"#,
        )
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.generation.timeout_seconds, Some(30));
        assert_eq!(config.sanitizer.link_policy, LinkPolicy::Permissive);
        assert_eq!(config.affiliates.len(), 1);
        assert_eq!(config.affiliate_table().partners()[0].brand, "Acme");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GIFT_LANE_TEST_API_KEY", "sk-from-env");

        let config = AppConfig::from_toml_str(
            r#"
[generation]
api_key = "${GIFT_LANE_TEST_API_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.generation.api_key, "sk-from-env");

        std::env::remove_var("GIFT_LANE_TEST_API_KEY");
    }

    #[test]
    fn test_unset_placeholder_is_left_alone() {
        let config = AppConfig::from_toml_str(
            r#"
[generation]
api_key = "${GIFT_LANE_DEFINITELY_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert_eq!(config.generation.api_key, "${GIFT_LANE_DEFINITELY_UNSET_VAR}");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml_str("[server\nport = 1"),
            Err(CurateError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(CurateError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_affiliate_validation() {
        let mut config = AppConfig::default();
        config.generation.api_key = "sk-test".to_string();
        assert!(config.validate().is_ok());

        let mut insecure = config.clone();
        insecure.affiliates[0].affiliate_url = "http://www.awin1.com/cread.php".to_string();
        assert!(insecure.validate().is_err());

        let mut no_keywords = config.clone();
        no_keywords.affiliates[1].keywords = vec!["  ".to_string()];
        assert!(no_keywords.validate().is_err());

        let mut duplicate = config.clone();
        duplicate.affiliates[1].brand_key = duplicate.affiliates[0].brand_key.clone();
        assert!(duplicate.validate().is_err());
    }

    #[test]
    fn test_bad_bind_address() {
        let mut config = AppConfig::default();
        config.generation.api_key = "sk-test".to_string();
        config.server.bind = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "3000"),
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("GIFT_LANE_LINK_POLICY", "permissive"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.generation.api_key, "sk-env");
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.sanitizer.link_policy, LinkPolicy::Permissive);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup_from(&[("PORT", "ten thousand")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("GIFT_LANE_LINK_POLICY", "loose")])).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 4321\n\n[generation]\napi_key = \"sk-file\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 4321);
        assert_eq!(config.generation.api_key, "sk-file");
    }

    #[test]
    fn test_example_config_matches_builtin_partners() {
        let config = AppConfig::from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/gift-lane.example.toml"
        ))
        .unwrap();

        assert_eq!(config.affiliates, default_partners());
        assert_eq!(config.sanitizer.link_policy, LinkPolicy::Strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AppConfig::from_file("/nonexistent/gift-lane.toml"),
            Err(CurateError::IoError(_))
        ));
    }
}
