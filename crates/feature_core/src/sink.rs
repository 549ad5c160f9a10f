use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use shared::view::View;

use crate::render;

/// Destination for rendered views. Each call replaces the whole content of
/// `container`.
pub trait RenderSink: Send + Sync {
    fn replace(&self, container: &str, view: &View);
}

/// Keeps the latest view per container and every write in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<MemorySinkState>,
}

#[derive(Debug, Default)]
struct MemorySinkState {
    latest: HashMap<String, View>,
    history: Vec<(String, View)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self, container: &str) -> Option<View> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.latest.get(container).cloned()
    }

    pub fn html(&self, container: &str) -> Option<String> {
        self.latest(container).map(|view| render::to_html(&view))
    }

    pub fn history(&self, container: &str) -> Vec<View> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .history
            .iter()
            .filter(|(name, _)| name == container)
            .map(|(_, view)| view.clone())
            .collect()
    }
}

impl RenderSink for MemorySink {
    fn replace(&self, container: &str, view: &View) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.latest.insert(container.to_string(), view.clone());
        guard.history.push((container.to_string(), view.clone()));
    }
}
