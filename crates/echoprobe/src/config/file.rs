use crate::config::{LogFormat, LogSpanEvents};
use anyhow::Context;
use echoprobe_core::defaults;
use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "echoprobe.toml";
const DEFAULT_HIDDEN_CONFIG_FILE: &str = ".echoprobe.toml";

/// Read the config from the current directory.
///
/// Returns the parsed `Some(ConfigFile)` if an `echoprobe.toml` or
/// `.echoprobe.toml` file exists in the current directory, `None` otherwise.
pub fn read_default_config_file() -> anyhow::Result<Option<ConfigFile>> {
    if let Some(file) = read_file("", DEFAULT_CONFIG_FILE)? {
        Ok(Some(file))
    } else if let Some(file) = read_file("", DEFAULT_HIDDEN_CONFIG_FILE)? {
        Ok(Some(file))
    } else {
        Ok(None)
    }
}

/// Read the config from the given path.
pub fn read_config_file<P: AsRef<Path>>(path: P) -> anyhow::Result<ConfigFile> {
    let contents = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("config file not found: {}", path.as_ref().display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("invalid config file: {}", path.as_ref().display()))
}

fn read_file<P: AsRef<Path>>(dir: P, file: &str) -> anyhow::Result<Option<ConfigFile>> {
    let path = dir.as_ref().join(file);
    if path.exists() {
        Ok(Some(read_config_file(path)?))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub echoprobe: Option<ConfigEchoprobe>,
    pub probe: Option<ConfigProbe>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            echoprobe: Some(ConfigEchoprobe::default()),
            probe: Some(ConfigProbe::default()),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigEchoprobe {
    pub log_format: Option<LogFormat>,
    pub log_filter: Option<String>,
    pub log_span_events: Option<LogSpanEvents>,
}

impl Default for ConfigEchoprobe {
    fn default() -> Self {
        Self {
            log_format: Some(super::constants::DEFAULT_LOG_FORMAT),
            log_filter: Some(String::from(super::constants::DEFAULT_LOG_FILTER)),
            log_span_events: Some(super::constants::DEFAULT_LOG_SPAN_EVENTS),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigProbe {
    #[serde(default)]
    #[serde(deserialize_with = "addr_deser")]
    pub target: Option<IpAddr>,
    pub identifier: Option<u16>,
    pub sequence: Option<u16>,
    pub payload: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "humantime_deser")]
    pub timeout: Option<Duration>,
}

impl Default for ConfigProbe {
    fn default() -> Self {
        Self {
            target: Some(defaults::DEFAULT_TARGET_ADDR),
            identifier: Some(defaults::DEFAULT_IDENTIFIER),
            sequence: Some(defaults::DEFAULT_SEQUENCE),
            payload: Some(String::from_utf8_lossy(defaults::DEFAULT_PAYLOAD).into_owned()),
            timeout: Some(defaults::DEFAULT_TIMEOUT),
        }
    }
}

fn humantime_deser<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    humantime::parse_duration(&String::deserialize(deserializer)?)
        .map_err(serde::de::Error::custom)
        .map(Some)
}

fn addr_deser<'de, D>(deserializer: D) -> Result<Option<IpAddr>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    IpAddr::from_str(&String::deserialize(deserializer)?)
        .map_err(serde::de::Error::custom)
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_sample() {
        let config: ConfigFile =
            toml::from_str(include_str!("../../echoprobe-config-sample.toml")).unwrap();
        pretty_assertions::assert_eq!(ConfigFile::default(), config);
    }

    #[test]
    fn test_parse_empty() {
        let config: ConfigFile = toml::from_str("").unwrap();
        pretty_assertions::assert_eq!(
            ConfigFile {
                echoprobe: None,
                probe: None
            },
            config
        );
    }

    #[test]
    fn test_parse_partial() {
        let config: ConfigFile = toml::from_str("[probe]\ntimeout = \"250ms\"\n").unwrap();
        pretty_assertions::assert_eq!(
            Some(ConfigProbe {
                target: None,
                identifier: None,
                sequence: None,
                payload: None,
                timeout: Some(Duration::from_millis(250)),
            }),
            config.probe
        );
    }

    #[test]
    fn test_parse_unknown_key() {
        let err = toml::from_str::<ConfigFile>("[probe]\nttl = 64\n").unwrap_err();
        assert!(err.to_string().contains("unknown field `ttl`"));
    }

    #[test]
    fn test_parse_invalid_target() {
        let err = toml::from_str::<ConfigFile>("[probe]\ntarget = \"foo\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid IP address syntax"));
    }

    #[test]
    fn test_read_missing_config_file() {
        let err = read_config_file("does-not-exist.toml").unwrap_err();
        assert_eq!("config file not found: does-not-exist.toml", err.to_string());
    }
}
