use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::generate::GenerateConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at JSON path {path}: {message}")]
pub struct ConfigError {
    pub path: String,
    pub message: String,
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, ConfigError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| ConfigError {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

pub fn parse_generate_config(src: &str) -> Result<GenerateConfig, ConfigError> {
    from_str_with_path(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = parse_generate_config(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config, GenerateConfig { quantity: 1, seed: Some(7), root: None });
    }

    #[test]
    fn errors_carry_the_field_path() {
        let err = parse_generate_config(r#"{ "quantity": "many" }"#).unwrap_err();
        assert_eq!(err.path, "quantity");
        let err = parse_generate_config(r#"{ "quantiy": 3 }"#).unwrap_err();
        assert!(err.message.contains("unknown field"), "{err}");
    }
}
