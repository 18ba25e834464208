use super::types::AppConfig;
use crate::core::errors::ApiError;

pub fn validate_config(config: &AppConfig) -> Result<(), ApiError> {
    validate_required_string("server.host", &config.server.host)?;
    validate_u64_range("server.port", config.server.port as u64, 1, 65_535)?;
    for (index, origin) in config.server.cors_allowed_origins.iter().enumerate() {
        validate_required_string(&format!("server.cors_allowed_origins[{}]", index), origin)?;
    }

    validate_url("embedding.base_url", &config.embedding.base_url)?;
    validate_required_string("embedding.model", &config.embedding.model)?;
    validate_u64_range(
        "embedding.timeout_secs",
        config.embedding.timeout_secs,
        1,
        86_400,
    )?;

    validate_url("llm.base_url", &config.llm.base_url)?;
    validate_required_string("llm.model", &config.llm.model)?;
    validate_u64_range("llm.timeout_secs", config.llm.timeout_secs, 1, 86_400)?;
    validate_u64_range("llm.max_tokens", config.llm.max_tokens as u64, 1, 1_000_000)?;
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        return Err(ApiError::BadRequest(
            "Invalid config at 'llm.temperature': must be between 0 and 2".to_string(),
        ));
    }

    validate_u64_range("agent.max_steps", config.agent.max_steps as u64, 1, 10_000)?;
    validate_u64_range(
        "agent.request_timeout_secs",
        config.agent.request_timeout_secs,
        1,
        86_400,
    )?;
    validate_u64_range("agent.retrieval_k", config.agent.retrieval_k as u64, 1, 1_000)?;
    validate_required_string("agent.tool_name", &config.agent.tool_name)?;
    if !config
        .agent
        .tool_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::BadRequest(
            "Invalid config at 'agent.tool_name': only [A-Za-z0-9_-] allowed".to_string(),
        ));
    }

    if config.seed.enabled {
        validate_required_string("seed.source", &config.seed.source)?;
    }

    Ok(())
}

fn validate_u64_range(path: &str, value: u64, min: u64, max: u64) -> Result<(), ApiError> {
    if value < min || value > max {
        return Err(ApiError::BadRequest(format!(
            "Invalid config at '{}': must be between {} and {}",
            path, min, max
        )));
    }
    Ok(())
}

fn validate_required_string(path: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Invalid config at '{}': value cannot be empty",
            path
        )));
    }
    Ok(())
}

fn validate_url(path: &str, value: &str) -> Result<(), ApiError> {
    validate_required_string(path, value)?;
    let parsed = reqwest::Url::parse(value).map_err(|e| {
        ApiError::BadRequest(format!("Invalid config at '{}': {}", path, e))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ApiError::BadRequest(format!(
            "Invalid config at '{}': unsupported scheme '{}'",
            path, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn zero_max_steps_is_rejected() {
        let mut config = AppConfig::default();
        config.agent.max_steps = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("agent.max_steps"));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let mut config = AppConfig::default();
        config.llm.base_url = "ftp://example.com/v1".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn tool_name_must_be_identifier_like() {
        let mut config = AppConfig::default();
        config.agent.tool_name = "search docs".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = AppConfig::default();
        config.llm.temperature = 3.5;
        assert!(validate_config(&config).is_err());
    }
}
