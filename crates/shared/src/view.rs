//! Structured view-model produced by feature renderers.
//!
//! A [`View`] is what ends up in an output container. It carries no markup;
//! sinks decide how to turn it into HTML or terminal text.

use serde::{Deserialize, Serialize};

use crate::domain::RenderState;

pub const DEFAULT_LOADING: &str = "Loading...";
pub const DEFAULT_ERROR: &str = "Something went wrong.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "body", rename_all = "snake_case")]
pub enum View {
    Loading(String),
    Error(String),
    Content(Vec<Block>),
}

impl View {
    pub fn loading() -> Self {
        Self::Loading(DEFAULT_LOADING.to_string())
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::Error(DEFAULT_ERROR.to_string());
        }
        Self::Error(message)
    }

    pub fn state(&self) -> RenderState {
        match self {
            View::Loading(_) => RenderState::Loading,
            View::Error(_) => RenderState::Error,
            View::Content(_) => RenderState::Rendered,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStyle {
    /// Full container width.
    Banner,
    /// 70px square thumbnail.
    Thumbnail,
    /// 70px circular avatar.
    Avatar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub style: ImageStyle,
}

impl Image {
    pub fn new(src: impl Into<String>, alt: impl Into<String>, style: ImageStyle) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Span {
    Plain(String),
    Strong(String),
    Emphasis(String),
    Small(String),
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self::Strong(text.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Span::Plain(t) | Span::Strong(t) | Span::Emphasis(t) | Span::Small(t) => t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum Block {
    Paragraph { spans: Vec<Span>, small: bool },
    Image(Image),
    Audio { src: String },
    Link { href: String, label: String },
    List { items: Vec<Vec<Span>> },
    /// Image beside a column of blocks.
    Card {
        image: Option<Image>,
        body: Vec<Block>,
    },
}

impl Block {
    pub fn paragraph(spans: Vec<Span>) -> Self {
        Self::Paragraph { spans, small: false }
    }

    pub fn small(text: impl Into<String>) -> Self {
        Self::Paragraph {
            spans: vec![Span::plain(text)],
            small: true,
        }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self::paragraph(vec![Span::strong(text)])
    }
}
