use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::paths::AppPaths;
use super::types::AppConfig;
use super::validation::validate_config;
use crate::core::errors::ApiError;

const REDACT_PLACEHOLDER: &str = "****";

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("RAG_AGENT_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let data_config = self.paths.data_dir.join("config.yml");
        if data_config.exists() {
            return data_config;
        }

        self.paths.project_root.join("config.yml")
    }

    /// Defaults, then the YAML file (if any), then environment overrides.
    pub fn load_config(&self) -> Result<AppConfig, ApiError> {
        let mut config = load_yaml_file(&self.config_path())?;
        apply_env_overrides(&mut config, |key| env::var(key).ok());
        validate_config(&config)?;
        Ok(config)
    }
}

fn load_yaml_file(path: &Path) -> Result<AppConfig, ApiError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ApiError::internal)?;
    if contents.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str::<AppConfig>(&contents).map_err(|e| {
        ApiError::BadRequest(format!("Invalid config file {}: {}", path.display(), e))
    })
}

/// Environment variables win over the config file.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty("EMBEDDING_API_URL") {
        config.embedding.base_url = url;
    }
    if let Some(model) = non_empty("EMBEDDING_MODEL") {
        config.embedding.model = model;
    }
    if let Some(key) = non_empty("EMBEDDING_API_KEY") {
        config.embedding.api_key = key;
    }
    if let Some(url) = non_empty("LLM_API_URL") {
        config.llm.base_url = url;
    }
    if let Some(model) = non_empty("LLM_MODEL") {
        config.llm.model = model;
    }
    if let Some(key) = non_empty("LLM_API_KEY") {
        config.llm.api_key = key;
    }
    if let Some(host) = non_empty("HOST") {
        config.server.host = host;
    }
    if let Some(port) = non_empty("PORT").and_then(|p| p.parse::<u16>().ok()) {
        config.server.port = port;
    }
}

/// Copy of the config safe to log.
pub fn redact_sensitive_values(config: &AppConfig) -> AppConfig {
    let mut redacted = config.clone();
    if !redacted.embedding.api_key.is_empty() {
        redacted.embedding.api_key = REDACT_PLACEHOLDER.to_string();
    }
    if !redacted.llm.api_key.is_empty() {
        redacted.llm.api_key = REDACT_PLACEHOLDER.to_string();
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn service_in(dir: &Path) -> ConfigService {
        ConfigService::new(Arc::new(AppPaths::from_dirs(
            dir.to_path_buf(),
            dir.join("data"),
        )))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_yaml_file(&tmp.path().join("absent.yml")).unwrap();
        assert_eq!(config.agent.max_steps, 25);
        assert!(config.seed.enabled);
    }

    #[test]
    fn yaml_file_is_read_from_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let service = service_in(tmp.path());
        fs::write(
            tmp.path().join("data").join("config.yml"),
            "agent:\n  retrieval_k: 5\nseed:\n  enabled: false\n",
        )
        .unwrap();

        let config = load_yaml_file(&service.config_path()).unwrap();
        assert_eq!(config.agent.retrieval_k, 5);
        assert!(!config.seed.enabled);
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yml");
        fs::write(&path, "agent: [not, a, map").unwrap();

        let err = load_yaml_file(&path).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn env_overrides_service_urls_and_port() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("EMBEDDING_API_URL", "http://embed:9000/v1"),
            ("LLM_API_URL", "http://llm:9001/v1"),
            ("PORT", "8123"),
            ("LLM_MODEL", "  "),
        ]);
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.embedding.base_url, "http://embed:9000/v1");
        assert_eq!(config.llm.base_url, "http://llm:9001/v1");
        assert_eq!(config.server.port, 8123);
        // blank values are ignored
        assert_eq!(config.llm.model, AppConfig::default().llm.model);
    }

    #[test]
    fn redaction_hides_api_keys() {
        let mut config = AppConfig::default();
        config.llm.api_key = "sk-secret".to_string();
        let redacted = redact_sensitive_values(&config);
        assert_eq!(redacted.llm.api_key, REDACT_PLACEHOLDER);
        assert_eq!(config.llm.api_key, "sk-secret");
    }
}
