use std::collections::{HashMap, HashSet};

use shared::domain::FeatureId;
use tracing::debug;

use crate::registry::{FeatureConfig, Registry};

/// The element lookup a feature needs from its host page.
pub trait Page: Send + Sync {
    fn has_element(&self, id: &str) -> bool;
    fn value(&self, id: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    elements: HashSet<String>,
    values: HashMap<String, String>,
}

impl StaticPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page carrying the trigger, inputs and output of one feature, with no
    /// input values filled in.
    pub fn for_feature(config: &FeatureConfig) -> Self {
        let mut page = Self::new()
            .with_element(config.trigger)
            .with_element(config.output);
        for field in config.inputs {
            page = page.with_element(field.id);
        }
        page
    }

    /// Page for one feature with submitted `inputs` filled in. Fields the
    /// submission leaves out carry their default value, as a freshly loaded
    /// page would; keys that are not inputs of the feature are ignored.
    pub fn with_inputs<'a>(
        config: &FeatureConfig,
        inputs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut page = Self::for_feature(config);
        for field in config.inputs {
            if let Some(default) = field.default {
                page.set_value(field.id, default);
            }
        }
        for (id, value) in inputs {
            match config.inputs.iter().find(|field| field.id == id) {
                Some(field) => page.set_value(field.id, value),
                None => debug!(feature = %config.id, input = id, "ignoring unknown input"),
            }
        }
        page
    }

    /// Page carrying every element of every registered feature.
    pub fn for_registry(registry: &Registry) -> Self {
        let mut page = Self::new();
        for config in registry.iter() {
            let feature_page = Self::for_feature(config);
            page.elements.extend(feature_page.elements);
        }
        page
    }

    pub fn with_element(mut self, id: impl Into<String>) -> Self {
        self.elements.insert(id.into());
        self
    }

    pub fn with_value(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_value(id, value);
        self
    }

    pub fn set_value(&mut self, id: impl Into<String>, value: impl Into<String>) {
        let id = id.into();
        self.elements.insert(id.clone());
        self.values.insert(id, value.into());
    }

    pub fn remove_element(&mut self, id: &str) {
        self.elements.remove(id);
        self.values.remove(id);
    }
}

impl Page for StaticPage {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    fn value(&self, id: &str) -> Option<String> {
        if !self.elements.contains(id) {
            return None;
        }
        Some(self.values.get(id).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    bound: Vec<FeatureId>,
    skipped: Vec<FeatureId>,
}

impl Bindings {
    pub fn is_bound(&self, id: FeatureId) -> bool {
        self.bound.contains(&id)
    }

    pub fn bound(&self) -> &[FeatureId] {
        &self.bound
    }

    pub fn skipped(&self) -> &[FeatureId] {
        &self.skipped
    }
}

/// Binds every registered feature whose trigger and output container both
/// exist on `page`, in registry order. Anything else is skipped without
/// error.
pub fn setup(page: &dyn Page, registry: &Registry) -> Bindings {
    let mut bindings = Bindings::default();
    for config in registry.iter() {
        if page.has_element(config.trigger) && page.has_element(config.output) {
            bindings.bound.push(config.id);
        } else {
            debug!(
                feature = %config.id,
                trigger = config.trigger,
                output = config.output,
                "trigger or output not on page; feature inert"
            );
            bindings.skipped.push(config.id);
        }
    }
    bindings
}
