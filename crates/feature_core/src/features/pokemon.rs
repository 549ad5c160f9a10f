use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use shared::{
    domain::FeatureId,
    view::{Block, Image, ImageStyle, Span, View},
};

use super::{non_blank, or_placeholder};
use crate::{
    error::{InputError, OperationError},
    fetch::{with_segment, Stage},
    form::{format_number, FormValues},
    handler::Feature,
    registry::{FeatureConfig, InputField},
    settings::Settings,
};

const NAME_INPUT: &str = "poke-name";
const INPUTS: &[InputField] = &[InputField::text(NAME_INPUT)];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Species {
    pub id: Option<u64>,
    pub name: Option<String>,
    /// Decimetres.
    pub height: Option<f64>,
    /// Hectograms.
    pub weight: Option<f64>,
    pub types: Vec<TypeSlot>,
    pub sprites: Option<Sprites>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: Option<NamedResource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NamedResource {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Sprites {
    pub front_default: Option<String>,
}

pub struct Pokemon;

#[async_trait]
impl Feature for Pokemon {
    type Query = String;
    type Data = Species;

    fn validate(&self, form: &FormValues, _settings: &Settings) -> Result<String, InputError> {
        let name_or_id = form.code_lower(NAME_INPUT);
        if name_or_id.is_empty() {
            return Err(InputError::new(
                "Enter a Pokémon name or ID (example: pikachu).",
            ));
        }
        Ok(name_or_id)
    }

    async fn fetch(&self, stage: &Stage<'_>, name_or_id: &String) -> Result<Species, OperationError> {
        let url = with_segment(&stage.endpoints().pokemon, name_or_id)?;
        stage.get_json(url).await
    }

    fn render(&self, name_or_id: &String, species: Species) -> View {
        let name = or_placeholder(species.name.as_deref(), name_or_id);
        let types = species
            .types
            .iter()
            .filter_map(|slot| slot.kind.as_ref().and_then(|kind| non_blank(&kind.name)))
            .collect::<Vec<_>>()
            .join(", ");
        let measure = |value: Option<f64>, unit: &str| {
            value
                .map(|v| format!("{} {unit}", format_number(v / 10.0)))
                .unwrap_or_else(|| "N/A".into())
        };
        let number = species
            .id
            .map(|id| format!("#{id}"))
            .unwrap_or_else(|| "#N/A".into());

        View::Content(vec![Block::Card {
            image: species
                .sprites
                .as_ref()
                .and_then(|sprites| non_blank(&sprites.front_default))
                .map(|src| Image::new(src, name.clone(), ImageStyle::Thumbnail)),
            body: vec![
                Block::paragraph(vec![
                    Span::strong(name.to_uppercase()),
                    Span::plain(" "),
                    Span::Small(number),
                ]),
                Block::small(format!("Type: {}", or_placeholder(Some(types.as_str()), "Unknown"))),
                Block::small(format!(
                    "Height: {} • Weight: {}",
                    measure(species.height, "m"),
                    measure(species.weight, "kg")
                )),
            ],
        }])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::Pokemon,
        trigger: "poke-btn",
        inputs: INPUTS,
        output: "poke-output",
        failure_message: "Could not find that Pokémon. Try a different name or ID.",
        handler: Arc::new(Pokemon),
    }
}
