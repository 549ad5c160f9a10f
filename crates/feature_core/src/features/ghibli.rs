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

const SHOWN: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Film {
    pub title: Option<String>,
    pub release_date: Option<String>,
}

pub struct GhibliFilms;

#[async_trait]
impl Feature for GhibliFilms {
    type Query = ();
    type Data = Vec<Film>;

    fn validate(&self, _form: &FormValues, _settings: &Settings) -> Result<(), InputError> {
        Ok(())
    }

    async fn fetch(&self, stage: &Stage<'_>, _query: &()) -> Result<Vec<Film>, OperationError> {
        let url = parse_endpoint(&stage.endpoints().ghibli_films)?;
        stage.get_json(url).await
    }

    fn render(&self, _query: &(), films: Vec<Film>) -> View {
        let items = films
            .iter()
            .take(SHOWN)
            .map(|film| {
                vec![
                    Span::strong(or_placeholder(film.title.as_deref(), "Untitled")),
                    Span::plain(format!(
                        " ({})",
                        or_placeholder(film.release_date.as_deref(), "N/A")
                    )),
                ]
            })
            .collect();
        View::Content(vec![
            Block::heading("Studio Ghibli (first 5 films returned):"),
            Block::List { items },
            Block::small(format!("Total films: {}", films.len())),
        ])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::GhibliFilms,
        trigger: "ghibli-btn",
        inputs: &[],
        output: "ghibli-output",
        failure_message: "Could not load Ghibli films.",
        handler: Arc::new(GhibliFilms),
    }
}
