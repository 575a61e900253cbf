use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Provider endpoints are set
/// - Poll interval is positive and fits inside the wait budget
/// - Storage path names a file and the write buffer is non-empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.llm.api_base.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "llm.api_base cannot be empty".to_string(),
        ));
    }

    if config.video.api_base.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "video.api_base cannot be empty".to_string(),
        ));
    }

    if config.video.poll_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "video.poll_interval_secs must be greater than 0".to_string(),
        ));
    }

    if config.video.max_wait_secs < config.video.poll_interval_secs {
        return Err(ConfigError::ValidationError(format!(
            "video.max_wait_secs ({}) must be at least video.poll_interval_secs ({})",
            config.video.max_wait_secs, config.video.poll_interval_secs
        )));
    }

    if config.video.variant_count == 0 {
        return Err(ConfigError::ValidationError(
            "video.variant_count must be at least 1".to_string(),
        ));
    }

    if config.storage.chunk_size_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "storage.chunk_size_bytes must be greater than 0".to_string(),
        ));
    }

    if config.storage.video_path.file_name().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "storage.video_path must name a file: {}",
            config.storage.video_path.display()
        )));
    }

    Ok(())
}
