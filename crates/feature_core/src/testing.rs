//! Test doubles shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::{
    dispatch::Dispatcher,
    error::FetchError,
    fetch::Fetcher,
    page::StaticPage,
    registry::{default_registry, Registry},
    settings::Settings,
    sink::MemorySink,
};

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
}

/// Answers by `host + path`; anything unknown gets a 404. Every request is
/// recorded.
#[derive(Default)]
pub struct StubFetcher {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Url>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, route: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .expect("replies")
            .insert(route.to_string(), reply);
        self
    }

    pub fn json(self, route: &str, body: Value) -> Self {
        self.reply(route, Reply::Json(body))
    }

    pub fn calls(&self) -> Vec<Url> {
        self.calls.lock().expect("calls").clone()
    }
}

fn route_key(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or_default(), url.path())
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().expect("calls").push(url.clone());
        let reply = self
            .replies
            .lock()
            .expect("replies")
            .get(&route_key(url))
            .cloned()
            .unwrap_or(Reply::Status(404));
        match reply {
            Reply::Json(body) => Ok(serde_json::to_vec(&body).expect("encode")),
            Reply::Status(status) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
        }
    }
}

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub fetcher: Arc<StubFetcher>,
    pub sink: Arc<MemorySink>,
}

pub fn harness(fetcher: StubFetcher) -> Harness {
    harness_with(fetcher, settings_with_key())
}

pub fn harness_with(fetcher: StubFetcher, settings: Settings) -> Harness {
    let fetcher = Arc::new(fetcher);
    let sink = Arc::new(MemorySink::new());
    let dispatcher = Dispatcher::new(
        Arc::new(default_registry()),
        fetcher.clone(),
        sink.clone(),
        Arc::new(settings),
    );
    Harness {
        dispatcher,
        fetcher,
        sink,
    }
}

pub fn settings_with_key() -> Settings {
    Settings {
        tmdb_api_key: Some("test-key".into()),
        ..Settings::default()
    }
}

/// Full page with a valid value in every input.
pub fn filled_page(registry: &Registry) -> StaticPage {
    let mut page = StaticPage::for_registry(registry);
    for (id, value) in [
        ("gh-user", "octocat"),
        ("cur-amount", "100"),
        ("cur-from", "usd"),
        ("cur-to", "eur"),
        ("word-input", "hello"),
        ("wx-city", "Paris"),
        ("rm-id", "1"),
        ("bobs-id", "1"),
        ("poke-name", "pikachu"),
    ] {
        page.set_value(id, value);
    }
    page
}
