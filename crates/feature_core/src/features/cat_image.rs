use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use shared::{
    domain::FeatureId,
    view::{Block, Image, ImageStyle, View},
};

use super::non_blank;
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
pub struct CatPicture {
    pub url: Option<String>,
}

pub struct CatImage;

#[async_trait]
impl Feature for CatImage {
    type Query = ();
    type Data = String;

    fn validate(&self, _form: &FormValues, _settings: &Settings) -> Result<(), InputError> {
        Ok(())
    }

    async fn fetch(&self, stage: &Stage<'_>, _query: &()) -> Result<String, OperationError> {
        let url = parse_endpoint(&stage.endpoints().cat_images)?;
        let pictures: Vec<CatPicture> = stage.get_json(url).await?;
        pictures
            .first()
            .and_then(|picture| non_blank(&picture.url))
            .map(str::to_string)
            .ok_or(OperationError::Missing("cat image url"))
    }

    fn render(&self, _query: &(), src: String) -> View {
        View::Content(vec![Block::Image(Image::new(
            src,
            "Random cat",
            ImageStyle::Banner,
        ))])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::CatImage,
        trigger: "catimg-btn",
        inputs: &[],
        output: "catimg-output",
        failure_message: "Could not load a cat image.",
        handler: Arc::new(CatImage),
    }
}
