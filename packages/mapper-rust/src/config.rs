use serde::{Deserialize, Serialize};

/// Mapper-level configuration.
///
/// Controls which attributes are written in binary form and whether empty
/// attributes are emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Attributes always written in binary form, whatever their codec's
    /// target type. Matched case-insensitively.
    pub binary_attributes: Vec<String>,
    /// Emit attributes whose encoded value list is empty. Off by default, so
    /// null and empty properties leave no attribute behind.
    pub write_empty_attributes: bool,
}

impl MapperConfig {
    /// Whether `attribute` is configured for binary transfer.
    #[must_use]
    pub fn is_binary(&self, attribute: &str) -> bool {
        self.binary_attributes
            .iter()
            .any(|name| name.eq_ignore_ascii_case(attribute))
    }
}

/// Output format for log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"attrbind=debug"`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapper_config_defaults() {
        let config = MapperConfig::default();
        assert!(config.binary_attributes.is_empty());
        assert!(!config.write_empty_attributes);
    }

    #[test]
    fn binary_attributes_ignore_case() {
        let config = MapperConfig {
            binary_attributes: vec!["userCertificate".to_string()],
            ..MapperConfig::default()
        };
        assert!(config.is_binary("usercertificate"));
        assert!(!config.is_binary("cn"));
    }

    #[test]
    fn log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.filter, "warn");
        assert_eq!(config.format, LogFormat::Text);
    }

    #[test]
    fn configs_deserialize_with_missing_fields() {
        let mapper: MapperConfig =
            serde_json::from_str(r#"{"write_empty_attributes": true}"#).unwrap();
        assert!(mapper.write_empty_attributes);
        assert!(mapper.binary_attributes.is_empty());

        let log: LogConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(log.format, LogFormat::Json);
        assert_eq!(log.filter, "warn");
    }
}
