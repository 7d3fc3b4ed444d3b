use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::converter::ConverterConfig;
use crate::fetcher::FetcherConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scratch: ScratchConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub encoding: EncodingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed to call the API from a browser. `*` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    10000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

/// Scratch storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScratchConfig {
    /// Root directory holding one subdirectory per in-flight request.
    #[serde(default = "default_scratch_dir")]
    pub dir: PathBuf,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            dir: default_scratch_dir(),
        }
    }
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("temp_download")
}

/// Output encoding configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncodingConfig {
    /// MP3 bitrate used for both the fetch and the trim re-encode.
    #[serde(default = "default_bitrate")]
    pub bitrate_kbps: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            bitrate_kbps: default_bitrate(),
        }
    }
}

fn default_bitrate() -> u32 {
    192
}
