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
pub struct Fact {
    pub fact: Option<String>,
    pub length: Option<u64>,
}

pub struct CatFact;

#[async_trait]
impl Feature for CatFact {
    type Query = ();
    type Data = Fact;

    fn validate(&self, _form: &FormValues, _settings: &Settings) -> Result<(), InputError> {
        Ok(())
    }

    async fn fetch(&self, stage: &Stage<'_>, _query: &()) -> Result<Fact, OperationError> {
        let url = parse_endpoint(&stage.endpoints().cat_fact)?;
        stage.get_json(url).await
    }

    fn render(&self, _query: &(), fact: Fact) -> View {
        let text = or_placeholder(fact.fact.as_deref(), "N/A");
        let length = fact
            .length
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".into());
        View::Content(vec![
            Block::paragraph(vec![Span::strong("Cat Fact:"), Span::plain(format!(" {text}"))]),
            Block::small(format!("Length: {length}")),
        ])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::CatFact,
        trigger: "catfact-btn",
        inputs: &[],
        output: "catfact-output",
        failure_message: "Could not load a cat fact.",
        handler: Arc::new(CatFact),
    }
}
