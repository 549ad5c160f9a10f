use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use shared::{
    domain::FeatureId,
    view::{Block, Span, View},
};

use super::{non_blank, or_placeholder};
use crate::{
    error::{InputError, OperationError},
    fetch::{with_query, Stage},
    form::{format_number, FormValues},
    handler::Feature,
    registry::{FeatureConfig, InputField},
    settings::Settings,
};

const CITY_INPUT: &str = "wx-city";
const INPUTS: &[InputField] = &[InputField::text(CITY_INPUT)];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeocodeResults {
    pub results: Vec<Place>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Place {
    pub name: Option<String>,
    pub admin1: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Forecast {
    pub current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CurrentWeather {
    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
    pub time: Option<String>,
}

pub struct Weather;

#[async_trait]
impl Feature for Weather {
    type Query = String;
    type Data = (Place, CurrentWeather);

    fn validate(&self, form: &FormValues, _settings: &Settings) -> Result<String, InputError> {
        form.required_text(CITY_INPUT, "Enter a city (example: San Jose).")
    }

    /// Geocodes the city, then asks for the current weather at its
    /// coordinates. The second request is never made for an unknown city.
    async fn fetch(
        &self,
        stage: &Stage<'_>,
        city: &String,
    ) -> Result<(Place, CurrentWeather), OperationError> {
        let endpoints = stage.endpoints();
        let geocode_url = with_query(
            &endpoints.geocoding,
            &[
                ("name", city.as_str()),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ],
        )?;
        let geocoded: GeocodeResults = stage.get_json(geocode_url).await?;
        let place = geocoded
            .results
            .into_iter()
            .next()
            .ok_or(OperationError::Missing("geocoding result for city"))?;
        let (Some(latitude), Some(longitude)) = (place.latitude, place.longitude) else {
            return Err(OperationError::Missing("coordinates for city"));
        };

        let (latitude, longitude) = (latitude.to_string(), longitude.to_string());
        let forecast_url = with_query(
            &endpoints.forecast,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
            ],
        )?;
        let forecast: Forecast = stage.get_json(forecast_url).await?;
        let current = forecast
            .current_weather
            .ok_or(OperationError::Missing("current weather"))?;
        Ok((place, current))
    }

    fn render(&self, city: &String, (place, current): (Place, CurrentWeather)) -> View {
        let location = [
            Some(or_placeholder(place.name.as_deref(), city)),
            non_blank(&place.admin1).map(str::to_string),
            non_blank(&place.country).map(str::to_string),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
        let reading = |value: Option<f64>| value.map(format_number).unwrap_or_else(|| "N/A".into());

        View::Content(vec![
            Block::heading(location),
            Block::paragraph(vec![
                Span::plain("Temp: "),
                Span::strong(format!("{}°C", reading(current.temperature))),
            ]),
            Block::small(format!(
                "Wind: {} km/h • Time: {}",
                reading(current.windspeed),
                or_placeholder(current.time.as_deref(), "N/A")
            )),
        ])
    }
}

pub fn config() -> FeatureConfig {
    FeatureConfig {
        id: FeatureId::Weather,
        trigger: "wx-btn",
        inputs: INPUTS,
        output: "wx-output",
        failure_message: "Could not load weather for that city.",
        handler: Arc::new(Weather),
    }
}
