use async_trait::async_trait;
use shared::view::View;

use crate::{
    error::{InputError, OperationError},
    fetch::Stage,
    form::FormValues,
    settings::Settings,
};

/// One feature's specialisation of the validate / fetch / render contract.
///
/// `validate` must not touch the network. `fetch` performs one or more
/// sequential requests through the [`Stage`] and returns the decoded data;
/// `render` is pure.
#[async_trait]
pub trait Feature: Send + Sync + 'static {
    type Query: Send + Sync;
    type Data: Send;

    fn validate(&self, form: &FormValues, settings: &Settings)
        -> Result<Self::Query, InputError>;

    async fn fetch(
        &self,
        stage: &Stage<'_>,
        query: &Self::Query,
    ) -> Result<Self::Data, OperationError>;

    fn render(&self, query: &Self::Query, data: Self::Data) -> View;
}

#[derive(Debug)]
pub enum Failure {
    Input(InputError),
    Operation(OperationError),
}

/// Object-safe view of a [`Feature`], stored in the registry.
#[async_trait]
pub trait FeatureHandler: Send + Sync {
    async fn run(
        &self,
        form: &FormValues,
        settings: &Settings,
        stage: &Stage<'_>,
    ) -> Result<View, Failure>;
}

#[async_trait]
impl<F: Feature> FeatureHandler for F {
    async fn run(
        &self,
        form: &FormValues,
        settings: &Settings,
        stage: &Stage<'_>,
    ) -> Result<View, Failure> {
        let query = self.validate(form, settings).map_err(Failure::Input)?;
        let data = self
            .fetch(stage, &query)
            .await
            .map_err(Failure::Operation)?;
        Ok(self.render(&query, data))
    }
}
