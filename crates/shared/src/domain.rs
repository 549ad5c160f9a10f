use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! feature_ids {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum FeatureId {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl FeatureId {
            pub const ALL: &'static [FeatureId] = &[$(FeatureId::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(FeatureId::$variant => $name,)+
                }
            }
        }

        impl FromStr for FeatureId {
            type Err = UnknownFeature;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok(FeatureId::$variant),)+
                    other => Err(UnknownFeature(other.to_string())),
                }
            }
        }
    };
}

feature_ids! {
    GithubProfile => "github-profile",
    Currency => "currency",
    Dictionary => "dictionary",
    DogImage => "dog-image",
    CatImage => "cat-image",
    Joke => "joke",
    Weather => "weather",
    CatFact => "cat-fact",
    RickMorty => "rick-morty",
    GhibliFilms => "ghibli-films",
    BobsBurgers => "bobs-burgers",
    RandomUser => "random-user",
    Pokemon => "pokemon",
    TrendingMovies => "trending-movies",
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature '{0}'")]
pub struct UnknownFeature(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderState {
    Loading,
    Rendered,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFieldSummary {
    pub id: String,
    pub kind: InputKind,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub feature: FeatureId,
    pub trigger: String,
    pub output: String,
    pub inputs: Vec<InputFieldSummary>,
}
