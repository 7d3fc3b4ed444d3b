use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration with layered overrides.
///
/// Defaults, then the TOML file at `path` (skipped when absent), then
/// `TUBETAPE_` prefixed environment variables (`__` separates sections, e.g.
/// `TUBETAPE_SCRATCH__DIR`), then the plain `PORT` variable.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TUBETAPE_").ignore(&["config"]).split("__"))
        .merge(Env::raw().only(&["port"]).map(|_| "server.port".into()))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[server]
port = 9000

[encoding]
bitrate_kbps = 256
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.encoding.bitrate_kbps, 256);
    }

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let toml = r#"
[server]
port = "eighty"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/tubetape.toml")).unwrap();
        assert_eq!(config.scratch.dir, PathBuf::from("temp_download"));
        assert_eq!(config.encoding.bitrate_kbps, 192);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"

[scratch]
dir = "/tmp/tubetape-test"

[fetcher]
timeout_secs = 42
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.scratch.dir, PathBuf::from("/tmp/tubetape-test"));
        assert_eq!(config.fetcher.timeout_secs, 42);
    }
}
