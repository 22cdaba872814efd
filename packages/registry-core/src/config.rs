use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GpsBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl Default for GpsBounds {
    fn default() -> Self {
        Self {
            lat_min: 12.9,
            lat_max: 13.1,
            lng_min: 77.5,
            lng_max: 77.7,
        }
    }
}

impl GpsBounds {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat)
            && (self.lng_min..=self.lng_max).contains(&lng)
    }

    /// Rejects inverted, NaN or out-of-range bounds.
    pub fn validate(&self) -> Result<()> {
        if !(self.lat_min <= self.lat_max && self.lng_min <= self.lng_max) {
            return Err(RegistryError::InvalidConfig(format!(
                "gps bounds are inverted: lat [{}, {}], lng [{}, {}]",
                self.lat_min, self.lat_max, self.lng_min, self.lng_max
            )));
        }
        if self.lat_min < -90.0 || self.lat_max > 90.0 {
            return Err(RegistryError::InvalidConfig(format!(
                "latitude bounds out of range: [{}, {}]",
                self.lat_min, self.lat_max
            )));
        }
        if self.lng_min < -180.0 || self.lng_max > 180.0 {
            return Err(RegistryError::InvalidConfig(format!(
                "longitude bounds out of range: [{}, {}]",
                self.lng_min, self.lng_max
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    pub upload_delay_ms: u64,
    pub gps: GpsBounds,
    pub location_fallback: String,
    pub start_offline: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            upload_delay_ms: 2000,
            gps: GpsBounds::default(),
            location_fallback: default_location_fallback(),
            start_offline: false,
        }
    }
}

pub fn default_location_fallback() -> String {
    "Location not specified".to_string()
}

impl RegistryConfig {
    pub fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        self.gps.validate()?;
        if self.location_fallback.trim().is_empty() {
            return Err(RegistryError::InvalidConfig(
                "location_fallback cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads the config from a JSON file. No path means defaults; so does a
/// path that does not exist yet.
pub async fn load_config(path: Option<&Path>) -> Result<RegistryConfig> {
    let Some(path) = path else {
        return Ok(RegistryConfig::default());
    };
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        return Ok(RegistryConfig::default());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|source| RegistryError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
    let config: RegistryConfig =
        serde_json::from_str(&content).map_err(|source| RegistryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.upload_delay(), Duration::from_secs(2));
        assert_eq!(config.location_fallback, "Location not specified");
        assert!(!config.start_offline);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = RegistryConfig::default();
        config.gps.lat_min = 14.0;
        assert!(config.validate().is_err());

        let mut config = RegistryConfig::default();
        config.gps.lng_max = 190.0;
        assert!(config.validate().is_err());

        let mut config = RegistryConfig::default();
        config.location_fallback = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_partial_file_fills_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("registry.json");
        fs::write(&path, r#"{ "upload_delay_ms": 500, "start_offline": true }"#)
            .await
            .unwrap();

        let config = load_config(Some(&path)).await.unwrap();
        assert_eq!(config.upload_delay_ms, 500);
        assert!(config.start_offline);
        assert_eq!(config.gps, GpsBounds::default());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_default() {
        let tmp = tempdir().unwrap();
        let config = load_config(Some(&tmp.path().join("nope.json")))
            .await
            .unwrap();
        assert_eq!(config, RegistryConfig::default());
        assert_eq!(load_config(None).await.unwrap(), RegistryConfig::default());
    }

    #[tokio::test]
    async fn test_load_rejects_garbage() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("registry.json");
        fs::write(&path, "not json").await.unwrap();
        assert!(matches!(
            load_config(Some(&path)).await,
            Err(RegistryError::ConfigParse { .. })
        ));

        let inverted = r#"{
            "gps": { "lat_min": 13.5, "lat_max": 13.0, "lng_min": 77.5, "lng_max": 77.7 }
        }"#;
        fs::write(&path, inverted).await.unwrap();
        assert!(matches!(
            load_config(Some(&path)).await,
            Err(RegistryError::InvalidConfig(_))
        ));
    }
}
