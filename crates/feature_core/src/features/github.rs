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

const USER_INPUT: &str = "gh-user";
const INPUTS: &[InputField] = &[InputField::text(USER_INPUT)];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GithubUser {
    pub login: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
}

pub struct GithubProfile;

#[async_trait]
impl Feature for GithubProfile {
    type Query = String;
    type Data = GithubUser;

    fn validate(&self, form: &FormValues, _settings: &Settings) -> Result<String, InputError> {
        form.required_text(USER_INPUT, "Enter a GitHub username.")
    }

    async fn fetch(&self, stage: &Stage<'_>, username: &String) -> Result<GithubUser, OperationError> {
        let url = with_segment(&stage.endpoints().github_users, username)?;
        stage.get_json(url).await
    }

    fn render(&self, username: &String, user: GithubUser) -> View {
        let login = or_placeholder(user.login.as_deref(), username);
        let display_name = non_blank(&user.name).unwrap_or(&login).to_string();
        let count = |n: Option<u64>| n.map(|n| n.to_string()).unwrap_or_else(|| "N/A".into());

        let mut body = vec![
            Block::heading(display_name),
            Block::small(format!("@{login}")),
            Block::small(format!(
                "Repos: {} | Followers: {}",
                count(user.public_repos),
                count(user.followers)
            )),
        ];
        if let Some(href) = non_blank(&user.html_url) {
            body.push(Block::Link {
                href: href.to_string(),
                label: "Open Profile".into(),
            });
        }

        View::Content(vec![Block::Card {
            image: non_blank(&user.avatar_url)
                .map(|src| Image::new(src, "avatar", ImageStyle::Avatar)),
            body,
        }])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::GithubProfile,
        trigger: "gh-btn",
        inputs: INPUTS,
        output: "gh-output",
        failure_message: "Could not load that GitHub profile.",
        handler: Arc::new(GithubProfile),
    }
}

