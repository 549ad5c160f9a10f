use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use shared::{
    domain::FeatureId,
    view::{Block, Image, ImageStyle, View},
};

use super::{non_blank, or_placeholder};
use crate::{
    error::{InputError, OperationError},
    fetch::{with_segment, Stage},
    form::FormValues,
    handler::Feature,
    registry::{FeatureConfig, InputField},
    settings::Settings,
};

const ID_INPUT: &str = "bobs-id";
const INPUTS: &[InputField] = &[InputField::text(ID_INPUT).with_default("1")];

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Character {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub hair_color: Option<String>,
    pub occupation: Option<String>,
    pub image: Option<String>,
}

pub struct BobsBurgers;

#[async_trait]
impl Feature for BobsBurgers {
    type Query = String;
    type Data = Character;

    fn validate(&self, form: &FormValues, _settings: &Settings) -> Result<String, InputError> {
        form.required_text(ID_INPUT, "Enter a character id (example: 1).")
    }

    async fn fetch(&self, stage: &Stage<'_>, id: &String) -> Result<Character, OperationError> {
        let url = with_segment(&stage.endpoints().bobs_characters, id)?;
        stage.get_json(url).await
    }

    fn render(&self, _id: &String, character: Character) -> View {
        let name = or_placeholder(character.name.as_deref(), "Unknown");
        let mut blocks = vec![
            Block::heading(name.clone()),
            Block::small(format!(
                "Gender: {}",
                or_placeholder(character.gender.as_deref(), "Unknown")
            )),
            Block::small(format!(
                "Hair: {} • Occupation: {}",
                or_placeholder(character.hair_color.as_deref(), "Unknown"),
                or_placeholder(character.occupation.as_deref(), "Unknown")
            )),
        ];
        if let Some(src) = non_blank(&character.image) {
            blocks.push(Block::Image(Image::new(src, name, ImageStyle::Banner)));
        }
        View::Content(blocks)
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::BobsBurgers,
        trigger: "bobs-btn",
        inputs: INPUTS,
        output: "bobs-output",
        failure_message: "Could not load that Bob’s Burgers character.",
        handler: Arc::new(BobsBurgers),
    }
}
