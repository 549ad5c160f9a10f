use std::sync::Arc;

use shared::domain::{FeatureId, FeatureSummary, InputFieldSummary, InputKind};

use crate::{features, handler::FeatureHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputField {
    pub id: &'static str,
    pub kind: InputKind,
    pub default: Option<&'static str>,
}

impl InputField {
    pub const fn text(id: &'static str) -> Self {
        Self {
            id,
            kind: InputKind::Text,
            default: None,
        }
    }

    pub const fn number(id: &'static str) -> Self {
        Self {
            id,
            kind: InputKind::Number,
            default: None,
        }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }
}

/// Everything the dispatcher needs to run one feature.
#[derive(Clone)]
pub struct FeatureConfig {
    pub id: FeatureId,
    pub trigger: &'static str,
    pub inputs: &'static [InputField],
    pub output: &'static str,
    /// Shown when anything fails after input was accepted.
    pub failure_message: &'static str,
    pub handler: Arc<dyn FeatureHandler>,
}

impl FeatureConfig {
    pub fn summary(&self) -> FeatureSummary {
        FeatureSummary {
            feature: self.id,
            trigger: self.trigger.to_string(),
            output: self.output.to_string(),
            inputs: self
                .inputs
                .iter()
                .map(|field| InputFieldSummary {
                    id: field.id.to_string(),
                    kind: field.kind,
                    default: field.default.map(str::to_string),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Default)]
pub struct Registry {
    features: Vec<FeatureConfig>,
}

impl Registry {
    pub fn new(features: Vec<FeatureConfig>) -> Self {
        Self { features }
    }

    pub fn get(&self, id: FeatureId) -> Option<&FeatureConfig> {
        self.features.iter().find(|config| config.id == id)
    }

    pub fn by_trigger(&self, trigger: &str) -> Option<&FeatureConfig> {
        self.features.iter().find(|config| config.trigger == trigger)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureConfig> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn summaries(&self) -> Vec<FeatureSummary> {
        self.iter().map(FeatureConfig::summary).collect()
    }
}

/// Every feature of the demo page, in page order.
pub fn default_registry() -> Registry {
    Registry::new(vec![
        features::github::config(),
        features::currency::config(),
        features::dictionary::config(),
        features::dog::config(),
        features::cat_image::config(),
        features::joke::config(),
        features::weather::config(),
        features::cat_fact::config(),
        features::rick_morty::config(),
        features::ghibli::config(),
        features::bobs_burgers::config(),
        features::random_user::config(),
        features::pokemon::config(),
        features::trending::config(),
    ])
}
