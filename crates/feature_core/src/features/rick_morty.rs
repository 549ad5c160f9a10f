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

const ID_INPUT: &str = "rm-id";
const INPUTS: &[InputField] = &[InputField::text(ID_INPUT).with_default("1")];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: Option<String>,
    pub species: Option<String>,
    pub status: Option<String>,
    pub image: Option<String>,
    pub origin: Option<Origin>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Origin {
    pub name: Option<String>,
}

pub struct RickMorty;

#[async_trait]
impl Feature for RickMorty {
    type Query = String;
    type Data = Character;

    fn validate(&self, form: &FormValues, _settings: &Settings) -> Result<String, InputError> {
        form.required_text(ID_INPUT, "Enter a character id (example: 1).")
    }

    async fn fetch(&self, stage: &Stage<'_>, id: &String) -> Result<Character, OperationError> {
        let url = with_segment(&stage.endpoints().rick_morty_characters, id)?;
        stage.get_json(url).await
    }

    fn render(&self, _id: &String, character: Character) -> View {
        let name = or_placeholder(character.name.as_deref(), "Unknown");
        let origin = character
            .origin
            .as_ref()
            .and_then(|origin| non_blank(&origin.name))
            .unwrap_or("Unknown");

        View::Content(vec![Block::Card {
            image: non_blank(&character.image)
                .map(|src| Image::new(src, name.clone(), ImageStyle::Thumbnail)),
            body: vec![
                Block::heading(name.clone()),
                Block::small(format!(
                    "{} • {}",
                    or_placeholder(character.species.as_deref(), "Unknown"),
                    or_placeholder(character.status.as_deref(), "Unknown")
                )),
                Block::small(format!("Origin: {origin}")),
            ],
        }])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::RickMorty,
        trigger: "rm-btn",
        inputs: INPUTS,
        output: "rm-output",
        failure_message: "Could not load that character.",
        handler: Arc::new(RickMorty),
    }
}
