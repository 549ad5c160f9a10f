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
    fetch::{with_query, Stage},
    form::FormValues,
    handler::Feature,
    registry::FeatureConfig,
    settings::Settings,
};

const SHOWN: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrendingPage {
    pub results: Vec<Movie>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub title: Option<String>,
    pub release_date: Option<String>,
}

impl Movie {
    fn year(&self) -> String {
        let year: String = self
            .release_date
            .as_deref()
            .unwrap_or_default()
            .trim()
            .chars()
            .take(4)
            .collect();
        or_placeholder(Some(year.as_str()), "N/A")
    }
}

/// Needs a TMDB key from settings; without one it fails before any request.
pub struct TrendingMovies;

#[async_trait]
impl Feature for TrendingMovies {
    type Query = String;
    type Data = Vec<Movie>;

    fn validate(&self, _form: &FormValues, settings: &Settings) -> Result<String, InputError> {
        settings
            .tmdb_api_key()
            .map(str::to_string)
            .ok_or_else(|| {
                InputError::new("TMDB API key missing. Add it to the showcase configuration.")
            })
    }

    async fn fetch(&self, stage: &Stage<'_>, api_key: &String) -> Result<Vec<Movie>, OperationError> {
        let url = with_query(&stage.endpoints().tmdb_trending, &[("api_key", api_key.as_str())])?;
        let page: TrendingPage = stage.get_json(url).await?;
        Ok(page.results)
    }

    fn render(&self, _api_key: &String, movies: Vec<Movie>) -> View {
        let items = movies
            .iter()
            .take(SHOWN)
            .map(|movie| {
                vec![
                    Span::strong(or_placeholder(movie.title.as_deref(), "Untitled")),
                    Span::plain(format!(" ({})", movie.year())),
                ]
            })
            .collect();
        View::Content(vec![
            Block::heading("Trending Movies (Top 5)"),
            Block::List { items },
        ])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::TrendingMovies,
        trigger: "tmdb-btn",
        inputs: &[],
        output: "tmdb-output",
        failure_message: "Could not load trending movies.",
        handler: Arc::new(TrendingMovies),
    }
}
