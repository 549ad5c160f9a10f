use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;
use shared::{
    domain::FeatureId,
    view::{Block, Span, View},
};

use crate::{
    error::{InputError, OperationError},
    fetch::{with_segment, Stage},
    form::{format_number, FormValues},
    handler::Feature,
    registry::{FeatureConfig, InputField},
    settings::Settings,
};

const AMOUNT_INPUT: &str = "cur-amount";
const FROM_INPUT: &str = "cur-from";
const TO_INPUT: &str = "cur-to";
const INPUTS: &[InputField] = &[
    InputField::number(AMOUNT_INPUT),
    InputField::text(FROM_INPUT),
    InputField::text(TO_INPUT),
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LatestRates {
    pub rates: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

pub struct CurrencyConverter;

#[async_trait]
impl Feature for CurrencyConverter {
    type Query = Conversion;
    type Data = f64;

    fn validate(&self, form: &FormValues, _settings: &Settings) -> Result<Conversion, InputError> {
        let amount = form.positive_amount(AMOUNT_INPUT, "Enter a valid amount.")?;
        let from = form.code_upper(FROM_INPUT);
        let to = form.code_upper(TO_INPUT);
        if from.is_empty() || to.is_empty() {
            return Err(InputError::new("Enter currency codes like USD/EUR."));
        }
        Ok(Conversion { amount, from, to })
    }

    async fn fetch(&self, stage: &Stage<'_>, query: &Conversion) -> Result<f64, OperationError> {
        let url = with_segment(&stage.endpoints().exchange_rates, &query.from)?;
        let latest: LatestRates = stage.get_json(url).await?;
        latest
            .rates
            .get(&query.to)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or(OperationError::Missing("exchange rate for target currency"))
    }

    fn render(&self, query: &Conversion, rate: f64) -> View {
        let Conversion { amount, from, to } = query;
        let converted = amount * rate;
        View::Content(vec![
            Block::paragraph(vec![
                Span::strong(format!("{} {from}", format_number(*amount))),
                Span::plain(" = "),
                Span::strong(format!("{converted:.2} {to}")),
            ]),
            Block::small(format!("Rate: 1 {from} = {} {to}", format_number(rate))),
        ])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::Currency,
        trigger: "cur-btn",
        inputs: INPUTS,
        output: "cur-output",
        failure_message: "Conversion failed. Check your currency codes.",
        handler: Arc::new(CurrencyConverter),
    }
}
