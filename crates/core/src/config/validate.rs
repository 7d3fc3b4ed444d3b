use super::{types::Config, ConfigError};

/// Lowest and highest MP3 bitrates accepted for the output encoding.
const MIN_BITRATE_KBPS: u32 = 32;
const MAX_BITRATE_KBPS: u32 = 320;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Scratch dir is not empty and names a directory of its own
/// - Tool timeouts are not 0
/// - Bitrate is within the MP3 range
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.scratch.dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "scratch.dir cannot be empty".to_string(),
        ));
    }

    // The scratch root is wiped on startup and shutdown, so it must not
    // resolve to `.`, `..` or a filesystem root.
    if config.scratch.dir.file_name().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "scratch.dir must name a dedicated directory, got {:?}",
            config.scratch.dir
        )));
    }

    if config.fetcher.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fetcher.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.converter.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0".to_string(),
        ));
    }

    let bitrate = config.encoding.bitrate_kbps;
    if !(MIN_BITRATE_KBPS..=MAX_BITRATE_KBPS).contains(&bitrate) {
        return Err(ConfigError::ValidationError(format!(
            "encoding.bitrate_kbps must be between {} and {}, got {}",
            MIN_BITRATE_KBPS, MAX_BITRATE_KBPS, bitrate
        )));
    }

    Ok(())
}
