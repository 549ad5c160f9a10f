//! Feature handlers for the API showcase page.
//!
//! A [`registry::Registry`] lists one [`registry::FeatureConfig`] per button.
//! The [`dispatch::Dispatcher`] drives any of them through the same four
//! stages: bind, validate, fetch, render. Network access goes through the
//! [`fetch::Fetcher`] seam and output through a [`sink::RenderSink`], so the
//! whole flow runs without a browser.

pub mod dispatch;
pub mod error;
pub mod features;
pub mod fetch;
pub mod form;
pub mod handler;
pub mod page;
pub mod registry;
pub mod render;
pub mod settings;
pub mod sink;

pub use dispatch::{ContainerSlot, ContainerWriter, Dispatcher, FailureKind, Outcome};
pub use error::{FetchError, InputError, OperationError, SettingsError};
pub use fetch::{Fetcher, HttpFetcher};
pub use page::{setup, Bindings, Page, StaticPage};
pub use registry::{default_registry, FeatureConfig, InputField, Registry};
pub use settings::{load_settings, Endpoints, Settings};
pub use sink::{MemorySink, RenderSink};

#[cfg(test)]
mod testing;
