use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use shared::{
    domain::FeatureId,
    view::{Block, Span, View},
};

use super::non_blank;
use crate::{
    error::{InputError, OperationError},
    fetch::{with_segment, Stage},
    form::FormValues,
    handler::Feature,
    registry::{FeatureConfig, InputField},
    settings::Settings,
};

const WORD_INPUT: &str = "word-input";
const INPUTS: &[InputField] = &[InputField::text(WORD_INPUT)];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Entry {
    pub word: Option<String>,
    pub phonetic: Option<String>,
    pub phonetics: Vec<Phonetic>,
    pub meanings: Vec<Meaning>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Phonetic {
    pub audio: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: Option<String>,
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Definition {
    pub definition: Option<String>,
}

pub struct Dictionary;

#[async_trait]
impl Feature for Dictionary {
    type Query = String;
    type Data = Entry;

    fn validate(&self, form: &FormValues, _settings: &Settings) -> Result<String, InputError> {
        form.required_text(WORD_INPUT, "Enter a word.")
    }

    async fn fetch(&self, stage: &Stage<'_>, word: &String) -> Result<Entry, OperationError> {
        let url = with_segment(&stage.endpoints().dictionary, word)?;
        let entries: Vec<Entry> = stage.get_json(url).await?;
        entries
            .into_iter()
            .next()
            .ok_or(OperationError::Missing("dictionary entry"))
    }

    fn render(&self, word: &String, entry: Entry) -> View {
        let meaning = entry.meanings.first();
        let definition = meaning
            .and_then(|m| m.definitions.first())
            .and_then(|d| non_blank(&d.definition))
            .unwrap_or("No definition found.");
        let part = meaning
            .and_then(|m| non_blank(&m.part_of_speech))
            .unwrap_or_default();
        let audio = entry.phonetics.iter().find_map(|p| non_blank(&p.audio));

        let mut headline = vec![Span::strong(non_blank(&entry.word).unwrap_or(word))];
        if let Some(phonetic) = non_blank(&entry.phonetic) {
            headline.push(Span::plain(" — "));
            headline.push(Span::Emphasis(phonetic.to_string()));
        }

        let mut blocks = vec![
            Block::paragraph(headline),
            Block::paragraph(vec![
                Span::strong(part),
                Span::plain(format!(": {definition}")),
            ]),
        ];
        blocks.push(match audio {
            Some(src) => Block::Audio {
                src: src.to_string(),
            },
            None => Block::small("No audio available."),
        });
        View::Content(blocks)
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::Dictionary,
        trigger: "word-btn",
        inputs: INPUTS,
        output: "word-output",
        failure_message: "Could not find a definition for that word.",
        handler: Arc::new(Dictionary),
    }
}
