use std::{fs, time::Duration};

use url::{Position, Url};

use crate::error::SettingsError;

pub const SETTINGS_FILE: &str = "showcase.toml";

macro_rules! endpoints {
    ($($field:ident => $default:literal),+ $(,)?) => {
        /// Base URLs of every upstream API. Request paths and query
        /// parameters are appended per call.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct Endpoints {
            $(pub $field: String,)+
        }

        impl Default for Endpoints {
            fn default() -> Self {
                Self {
                    $($field: $default.to_string(),)+
                }
            }
        }

        impl Endpoints {
            pub const NAMES: &'static [&'static str] = &[$(stringify!($field)),+];

            fn slot_mut(&mut self, name: &str) -> Option<&mut String> {
                match name {
                    $(stringify!($field) => Some(&mut self.$field),)+
                    _ => None,
                }
            }

            fn entries(&self) -> Vec<(&'static str, &str)> {
                vec![$((stringify!($field), self.$field.as_str())),+]
            }
        }
    };
}

endpoints! {
    github_users => "https://api.github.com/users",
    exchange_rates => "https://open.er-api.com/v6/latest",
    dictionary => "https://api.dictionaryapi.dev/api/v2/entries/en",
    dog_image => "https://dog.ceo/api/breeds/image/random",
    cat_images => "https://api.thecatapi.com/v1/images/search",
    joke => "https://v2.jokeapi.dev/joke/Any?safe-mode",
    geocoding => "https://geocoding-api.open-meteo.com/v1/search",
    forecast => "https://api.open-meteo.com/v1/forecast",
    cat_fact => "https://catfact.ninja/fact",
    rick_morty_characters => "https://rickandmortyapi.com/api/character",
    ghibli_films => "https://ghibliapi.vercel.app/films",
    bobs_characters => "https://bobsburgers-api.herokuapp.com/characters",
    random_user => "https://randomuser.me/api/",
    pokemon => "https://pokeapi.co/api/v2/pokemon",
    tmdb_trending => "https://api.themoviedb.org/3/trending/movie/day",
}

impl Endpoints {
    /// Moves every endpoint onto `base`, keeping its path and query.
    /// Used for local mirrors and mock upstreams.
    pub fn rebased(base: &str) -> Self {
        let mut endpoints = Self::default();
        endpoints.rebase(base);
        endpoints
    }

    fn rebase(&mut self, base: &str) {
        let base = base.trim().trim_end_matches('/');
        for name in Self::NAMES {
            let Some(slot) = self.slot_mut(name) else {
                continue;
            };
            if let Ok(parsed) = Url::parse(slot) {
                *slot = format!("{base}{}", &parsed[Position::BeforePath..]);
            }
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        for (name, url) in self.entries() {
            Url::parse(url).map_err(|source| SettingsError::InvalidEndpoint {
                name,
                url: url.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub log_filter: String,
    pub tmdb_api_key: Option<String>,
    pub http_timeout_seconds: Option<u64>,
    pub endpoints: Endpoints,
    /// Endpoint names in the settings file that match no upstream API.
    /// Kept so binaries can report them once logging is up.
    pub ignored_endpoints: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            log_filter: "info".into(),
            tmdb_api_key: None,
            http_timeout_seconds: None,
            endpoints: Endpoints::default(),
            ignored_endpoints: Vec::new(),
        }
    }
}

impl Settings {
    /// Defaults, then the optional settings file, then environment overrides.
    pub fn from_sources(
        file: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();

        if let Some(raw) = file {
            settings.apply_file(raw)?;
        }

        if let Some(v) = env("SHOWCASE_BIND") {
            settings.bind_addr = v;
        }
        if let Some(v) = env("APP__BIND_ADDR") {
            settings.bind_addr = v;
        }

        if let Some(v) = env("APP__LOG_FILTER") {
            settings.log_filter = v;
        }

        if let Some(v) = env("TMDB_API_KEY") {
            settings.tmdb_api_key = Some(v);
        }
        if let Some(v) = env("APP__TMDB_API_KEY") {
            settings.tmdb_api_key = Some(v);
        }

        if let Some(v) = env("APP__HTTP_TIMEOUT_SECONDS") {
            settings.http_timeout_seconds = Some(parse_seconds("APP__HTTP_TIMEOUT_SECONDS", &v)?);
        }

        if let Some(v) = env("APP__ENDPOINT_BASE") {
            settings.endpoints.rebase(&v);
        }
        for name in Endpoints::NAMES {
            let key = format!("APP__ENDPOINTS__{}", name.to_ascii_uppercase());
            if let (Some(v), Some(slot)) = (env(&key), settings.endpoints.slot_mut(name)) {
                *slot = v;
            }
        }

        settings.endpoints.validate()?;
        Ok(settings)
    }

    pub fn tmdb_api_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Warns about everything the settings file asked for but was not
    /// applied. Call after the tracing subscriber is installed.
    pub fn report_ignored(&self) {
        for name in &self.ignored_endpoints {
            tracing::warn!(endpoint = %name, "ignoring unknown endpoint in settings file");
        }
    }

    fn apply_file(&mut self, raw: &str) -> Result<(), SettingsError> {
        let table: toml::Table = toml::from_str(raw)?;

        if let Some(v) = table.get("bind_addr").and_then(toml::Value::as_str) {
            self.bind_addr = v.to_string();
        }
        if let Some(v) = table.get("log_filter").and_then(toml::Value::as_str) {
            self.log_filter = v.to_string();
        }
        if let Some(v) = table.get("tmdb_api_key").and_then(toml::Value::as_str) {
            self.tmdb_api_key = Some(v.to_string());
        }
        match table.get("http_timeout_seconds") {
            Some(toml::Value::Integer(secs)) => {
                self.http_timeout_seconds = Some(parse_seconds(
                    "http_timeout_seconds",
                    &secs.to_string(),
                )?);
            }
            Some(other) => {
                return Err(SettingsError::InvalidValue {
                    key: "http_timeout_seconds".into(),
                    value: other.to_string(),
                })
            }
            None => {}
        }

        if let Some(endpoints) = table.get("endpoints").and_then(toml::Value::as_table) {
            if let Some(base) = endpoints.get("base").and_then(toml::Value::as_str) {
                self.endpoints.rebase(base);
            }
            for (name, value) in endpoints {
                if name == "base" {
                    continue;
                }
                let Some(url) = value.as_str() else {
                    continue;
                };
                match self.endpoints.slot_mut(name) {
                    Some(slot) => *slot = url.to_string(),
                    None => self.ignored_endpoints.push(name.clone()),
                }
            }
        }

        Ok(())
    }
}

fn parse_seconds(key: &str, raw: &str) -> Result<u64, SettingsError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| SettingsError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

/// Reads `showcase.toml` from the working directory when present and
/// applies process environment overrides.
pub fn load_settings() -> Result<Settings, SettingsError> {
    let raw = fs::read_to_string(SETTINGS_FILE).ok();
    Settings::from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
