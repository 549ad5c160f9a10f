use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::{domain::FeatureId, view::View};
use tracing::{debug, error, info};

use crate::{
    fetch::{Fetcher, Stage},
    form::FormValues,
    handler::Failure,
    page::Page,
    registry::Registry,
    settings::Settings,
    sink::RenderSink,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Input,
    Operation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Feature unknown, or its output container is not on the page.
    Skipped,
    Rendered(View),
    Failed { kind: FailureKind, view: View },
    /// A newer invocation of the same feature owns the container.
    Superseded,
}

impl Outcome {
    pub fn view(&self) -> Option<&View> {
        match self {
            Outcome::Rendered(view) | Outcome::Failed { view, .. } => Some(view),
            Outcome::Skipped | Outcome::Superseded => None,
        }
    }
}

/// Newest generation claimed for one output container.
///
/// The lock is held across the generation check and the sink write, so no
/// older invocation can land a render after a newer one has claimed.
#[derive(Debug, Default)]
pub struct ContainerSlot {
    newest: Mutex<u64>,
}

impl ContainerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, u64> {
        self.newest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Write access to one output container for one invocation.
///
/// Each invocation claims the next generation for its feature. Writes from
/// an older generation are dropped, so the most recent click decides what
/// the container shows regardless of which response lands last.
pub struct ContainerWriter<'a> {
    feature: FeatureId,
    container: &'static str,
    sink: &'a dyn RenderSink,
    slot: &'a ContainerSlot,
    generation: u64,
}

impl<'a> ContainerWriter<'a> {
    pub fn claim(
        feature: FeatureId,
        container: &'static str,
        sink: &'a dyn RenderSink,
        slot: &'a ContainerSlot,
    ) -> Self {
        let generation = {
            let mut newest = slot.lock();
            *newest += 1;
            *newest
        };
        Self {
            feature,
            container,
            sink,
            slot,
            generation,
        }
    }

    pub fn feature(&self) -> FeatureId {
        self.feature
    }

    pub fn is_current(&self) -> bool {
        *self.slot.lock() == self.generation
    }

    pub fn write(&self, view: &View) -> bool {
        let newest = self.slot.lock();
        if *newest != self.generation {
            debug!(
                feature = %self.feature,
                generation = self.generation,
                newest = *newest,
                "dropping render from superseded invocation"
            );
            return false;
        }
        self.sink.replace(self.container, view);
        true
    }

    pub fn loading(&self) -> bool {
        self.write(&View::loading())
    }
}

pub struct Dispatcher {
    registry: Arc<Registry>,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn RenderSink>,
    settings: Arc<Settings>,
    slots: HashMap<FeatureId, ContainerSlot>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<Registry>,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn RenderSink>,
        settings: Arc<Settings>,
    ) -> Self {
        let slots = registry
            .iter()
            .map(|config| (config.id, ContainerSlot::new()))
            .collect();
        Self {
            registry,
            fetcher,
            sink,
            settings,
            slots,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs one feature against `page`: validate, fetch, render. Never fails;
    /// every problem ends up as an error view in the feature's container.
    pub async fn invoke(&self, id: FeatureId, page: &dyn Page) -> Outcome {
        let (Some(config), Some(slot)) = (self.registry.get(id), self.slots.get(&id))
        else {
            debug!(feature = %id, "feature not registered");
            return Outcome::Skipped;
        };
        if !page.has_element(config.output) {
            debug!(feature = %id, container = config.output, "output container missing");
            return Outcome::Skipped;
        }

        let form = FormValues::read(page, config.inputs);
        let writer = ContainerWriter::claim(id, config.output, self.sink.as_ref(), slot);
        let stage = Stage::new(self.fetcher.as_ref(), &self.settings.endpoints, &writer);

        let (outcome, view) = match config.handler.run(&form, &self.settings, &stage).await {
            Ok(view) => {
                info!(feature = %id, "feature rendered");
                (None, view)
            }
            Err(Failure::Input(err)) => {
                info!(feature = %id, reason = %err, "input rejected");
                (Some(FailureKind::Input), View::error(err.message))
            }
            Err(Failure::Operation(err)) => {
                error!(feature = %id, error = %err, "feature request failed");
                (
                    Some(FailureKind::Operation),
                    View::error(config.failure_message),
                )
            }
        };

        if !writer.write(&view) {
            return Outcome::Superseded;
        }
        match outcome {
            None => Outcome::Rendered(view),
            Some(kind) => Outcome::Failed { kind, view },
        }
    }

    /// Invokes a feature by its trigger element id, as a click would.
    pub async fn click(&self, trigger: &str, page: &dyn Page) -> Outcome {
        match self.registry.by_trigger(trigger) {
            Some(config) if page.has_element(trigger) => self.invoke(config.id, page).await,
            _ => Outcome::Skipped,
        }
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
