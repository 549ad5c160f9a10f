use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use shared::{
    domain::FeatureId,
    view::{Block, Span, View},
};

use super::or_placeholder;
use crate::{
    error::{InputError, OperationError},
    fetch::{parse_endpoint, Stage},
    form::FormValues,
    handler::Feature,
    registry::FeatureConfig,
    settings::Settings,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JokePayload {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub joke: Option<String>,
    pub setup: Option<String>,
    pub delivery: Option<String>,
}

pub struct Joke;

#[async_trait]
impl Feature for Joke {
    type Query = ();
    type Data = JokePayload;

    fn validate(&self, _form: &FormValues, _settings: &Settings) -> Result<(), InputError> {
        Ok(())
    }

    async fn fetch(&self, stage: &Stage<'_>, _query: &()) -> Result<JokePayload, OperationError> {
        let url = parse_endpoint(&stage.endpoints().joke)?;
        stage.get_json(url).await
    }

    fn render(&self, _query: &(), joke: JokePayload) -> View {
        if joke.kind.as_deref() == Some("single") {
            return View::Content(vec![Block::paragraph(vec![Span::plain(
                or_placeholder(joke.joke.as_deref(), "N/A"),
            )])]);
        }
        View::Content(vec![
            Block::heading(or_placeholder(joke.setup.as_deref(), "N/A")),
            Block::paragraph(vec![Span::plain(or_placeholder(
                joke.delivery.as_deref(),
                "N/A",
            ))]),
        ])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::Joke,
        trigger: "joke-btn",
        inputs: &[],
        output: "joke-output",
        failure_message: "Could not load a joke.",
        handler: Arc::new(Joke),
    }
}
