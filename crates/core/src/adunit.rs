//! Per-slot ad unit configuration consumed by the parameter builders.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{
    AdFormat, AdPosition, AdSize, ApiFramework, IntegrationKind, StartDelay, VideoLinearity,
    VideoPlacement,
};

/// Video negotiation parameters a publisher can pin per ad unit.
/// Unset fields are omitted from the outgoing impression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoParameters {
    pub linearity: Option<VideoLinearity>,
    pub placement: Option<VideoPlacement>,
    #[serde(default)]
    pub api: Vec<ApiFramework>,
    pub min_duration: Option<u32>,
    pub max_duration: Option<u32>,
    pub min_bitrate: Option<u32>,
    pub max_bitrate: Option<u32>,
    pub start_delay: Option<StartDelay>,
}

/// Configuration for a single ad slot. Each configured unit contributes one
/// impression to the outgoing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdUnitConfig {
    /// Identifier of the impression-level stored request on the auction server.
    pub config_id: String,
    /// Primary creative size.
    pub size: AdSize,
    /// Extra sizes advertised alongside the primary one.
    #[serde(default)]
    pub additional_sizes: Vec<AdSize>,
    #[serde(default = "default_ad_formats")]
    pub ad_formats: Vec<AdFormat>,
    #[serde(default)]
    pub ad_position: Option<AdPosition>,
    #[serde(default)]
    pub integration: IntegrationKind,
    #[serde(default)]
    pub video_parameters: Option<VideoParameters>,
    /// Publisher ad slot identifier, forwarded under the reserved `adslot`
    /// context key.
    #[serde(default)]
    pub pb_ad_slot: Option<String>,
    #[serde(default)]
    context_data: BTreeMap<String, Vec<String>>,
}

fn default_ad_formats() -> Vec<AdFormat> {
    vec![AdFormat::Display]
}

impl AdUnitConfig {
    pub fn new(config_id: impl Into<String>, size: AdSize) -> Self {
        Self {
            config_id: config_id.into(),
            size,
            additional_sizes: Vec::new(),
            ad_formats: default_ad_formats(),
            ad_position: None,
            integration: IntegrationKind::default(),
            video_parameters: None,
            pb_ad_slot: None,
            context_data: BTreeMap::new(),
        }
    }

    pub fn has_format(&self, format: AdFormat) -> bool {
        self.ad_formats.contains(&format)
    }

    /// Add one value to the set stored under `key`. Duplicates are ignored,
    /// first-insertion order is kept.
    pub fn add_context_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let values = self.context_data.entry(key.into()).or_default();
        let value = value.into();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// Replace the whole value set stored under `key`.
    pub fn update_context_data(
        &mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = String>,
    ) {
        let mut deduped: Vec<String> = Vec::new();
        for value in values {
            if !deduped.contains(&value) {
                deduped.push(value);
            }
        }
        self.context_data.insert(key.into(), deduped);
    }

    pub fn remove_context_data(&mut self, key: &str) {
        self.context_data.remove(key);
    }

    pub fn clear_context_data(&mut self) {
        self.context_data.clear();
    }

    pub fn context_data(&self) -> &BTreeMap<String, Vec<String>> {
        &self.context_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let unit = AdUnitConfig::new("config-1", AdSize::new(320, 50));
        assert_eq!(unit.ad_formats, vec![AdFormat::Display]);
        assert_eq!(unit.integration, IntegrationKind::Rendering);
        assert!(unit.ad_position.is_none());
        assert!(unit.context_data().is_empty());
    }

    #[test]
    fn test_add_context_data_dedupes_preserving_order() {
        let mut unit = AdUnitConfig::new("config-1", AdSize::new(320, 50));
        unit.add_context_data("buy", "mushrooms");
        unit.add_context_data("buy", "carrots");
        unit.add_context_data("buy", "mushrooms");
        assert_eq!(
            unit.context_data().get("buy").unwrap(),
            &vec!["mushrooms".to_string(), "carrots".to_string()]
        );
    }

    #[test]
    fn test_update_context_data_replaces_values() {
        let mut unit = AdUnitConfig::new("config-1", AdSize::new(320, 50));
        unit.add_context_data("buy", "mushrooms");
        unit.update_context_data("buy", vec!["carrots".to_string(), "carrots".to_string()]);
        assert_eq!(
            unit.context_data().get("buy").unwrap(),
            &vec!["carrots".to_string()]
        );
        unit.remove_context_data("buy");
        assert!(unit.context_data().is_empty());
    }
}
