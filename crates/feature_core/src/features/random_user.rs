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
    fetch::{parse_endpoint, Stage},
    form::FormValues,
    handler::Feature,
    registry::FeatureConfig,
    settings::Settings,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RandomUsers {
    pub results: Vec<Person>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: Option<PersonName>,
    pub email: Option<String>,
    pub location: Option<Location>,
    pub picture: Option<Picture>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PersonName {
    pub first: Option<String>,
    pub last: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Picture {
    pub large: Option<String>,
}

pub struct RandomUser;

#[async_trait]
impl Feature for RandomUser {
    type Query = ();
    type Data = Person;

    fn validate(&self, _form: &FormValues, _settings: &Settings) -> Result<(), InputError> {
        Ok(())
    }

    async fn fetch(&self, stage: &Stage<'_>, _query: &()) -> Result<Person, OperationError> {
        let url = parse_endpoint(&stage.endpoints().random_user)?;
        let users: RandomUsers = stage.get_json(url).await?;
        users
            .results
            .into_iter()
            .next()
            .ok_or(OperationError::Missing("random user"))
    }

    fn render(&self, _query: &(), person: Person) -> View {
        let name = person
            .name
            .as_ref()
            .map(|name| {
                [non_blank(&name.first), non_blank(&name.last)]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        let place = person
            .location
            .as_ref()
            .map(|loc| {
                [non_blank(&loc.city), non_blank(&loc.state), non_blank(&loc.country)]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        let picture = person
            .picture
            .as_ref()
            .and_then(|picture| non_blank(&picture.large))
            .map(|src| Image::new(src, name.clone(), ImageStyle::Thumbnail));

        View::Content(vec![Block::Card {
            image: picture,
            body: vec![
                Block::heading(or_placeholder(Some(name.as_str()), "Random User")),
                Block::small(or_placeholder(person.email.as_deref(), "N/A")),
                Block::small(place),
            ],
        }])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::RandomUser,
        trigger: "user-btn",
        inputs: &[],
        output: "user-output",
        failure_message: "Could not load a random user.",
        handler: Arc::new(RandomUser),
    }
}
