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
pub struct RandomDog {
    /// Image URL; the API calls it "message".
    pub message: Option<String>,
}

pub struct DogImage;

#[async_trait]
impl Feature for DogImage {
    type Query = ();
    type Data = String;

    fn validate(&self, _form: &FormValues, _settings: &Settings) -> Result<(), InputError> {
        Ok(())
    }

    async fn fetch(&self, stage: &Stage<'_>, _query: &()) -> Result<String, OperationError> {
        let url = parse_endpoint(&stage.endpoints().dog_image)?;
        let dog: RandomDog = stage.get_json(url).await?;
        non_blank(&dog.message)
            .map(str::to_string)
            .ok_or(OperationError::Missing("dog image url"))
    }

    fn render(&self, _query: &(), src: String) -> View {
        View::Content(vec![Block::Image(Image::new(
            src,
            "Random dog",
            ImageStyle::Banner,
        ))])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::DogImage,
        trigger: "dog-btn",
        inputs: &[],
        output: "dog-output",
        failure_message: "Could not load a dog image.",
        handler: Arc::new(DogImage),
    }
}
