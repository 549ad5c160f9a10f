use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use feature_core::{
    default_registry, load_settings,
    render::{to_html, to_text},
    Dispatcher, FeatureConfig, HttpFetcher, Outcome, Registry, RenderSink, StaticPage,
};
use futures::future::join_all;
use shared::{domain::FeatureId, view::View};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "showcase", about = "Run the API showcase features from a terminal")]
struct Cli {
    /// Overrides the TMDB key from showcase.toml or the environment.
    #[arg(long)]
    tmdb_api_key: Option<String>,
    #[arg(long)]
    log_filter: Option<String>,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every feature with its trigger, output and inputs.
    List,
    /// Run one feature, e.g. `run github-profile -i gh-user=octocat`.
    Run {
        feature: FeatureId,
        #[arg(short = 'i', long = "input", value_parser = parse_input)]
        inputs: Vec<(String, String)>,
    },
    /// Run every feature that works without typed input, concurrently.
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Html,
}

/// Prints each container update. Loading notices go to stderr so stdout
/// only carries final output.
struct ConsoleSink {
    format: Format,
}

impl RenderSink for ConsoleSink {
    fn replace(&self, container: &str, view: &View) {
        match view {
            View::Loading(message) => eprintln!("[{container}] {message}"),
            _ => println!("[{container}]\n{}\n", format_view(self.format, view)),
        }
    }
}

fn format_view(format: Format, view: &View) -> String {
    match format {
        Format::Text => to_text(view),
        Format::Html => to_html(view),
    }
}

fn parse_input(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing input id in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Features that can run with nothing typed in: no inputs, or defaults
/// for all of them.
fn runs_unattended(config: &FeatureConfig) -> bool {
    config.inputs.iter().all(|field| field.default.is_some())
}

fn describe(config: &FeatureConfig) -> String {
    let inputs = config
        .inputs
        .iter()
        .map(|field| match field.default {
            Some(default) => format!("{}={default}", field.id),
            None => field.id.to_string(),
        })
        .collect::<Vec<_>>();
    let inputs = if inputs.is_empty() {
        "-".to_string()
    } else {
        inputs.join(",")
    };
    format!(
        "{:<16} trigger={:<11} output={:<15} inputs={inputs}",
        config.id.as_str(),
        config.trigger,
        config.output
    )
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = load_settings().context("failed to load showcase settings")?;
    if let Some(key) = cli.tmdb_api_key {
        settings.tmdb_api_key = Some(key);
    }
    let filter = cli.log_filter.as_deref().unwrap_or(&settings.log_filter);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    settings.report_ignored();

    let registry = Arc::new(default_registry());
    if let Command::List = cli.command {
        for config in registry.iter() {
            println!("{}", describe(config));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let fetcher =
        HttpFetcher::new(settings.http_timeout()).context("failed to build HTTP client")?;
    let dispatcher = Dispatcher::new(
        registry.clone(),
        Arc::new(fetcher),
        Arc::new(ConsoleSink { format: cli.format }),
        Arc::new(settings),
    );

    let outcomes = match cli.command {
        Command::List => Vec::new(),
        Command::Run { feature, inputs } => {
            let config = registry
                .get(feature)
                .with_context(|| format!("feature '{feature}' is not registered"))?;
            let page = StaticPage::with_inputs(
                config,
                inputs.iter().map(|(key, value)| (key.as_str(), value.as_str())),
            );
            vec![(feature, dispatcher.invoke(feature, &page).await)]
        }
        Command::All => run_all(&dispatcher, &registry).await,
    };

    let failed = outcomes
        .iter()
        .filter(|(_, outcome)| !matches!(outcome, Outcome::Rendered(_)))
        .count();
    if failed > 0 {
        warn!(failed, total = outcomes.len(), "some features did not render");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_all(dispatcher: &Dispatcher, registry: &Registry) -> Vec<(FeatureId, Outcome)> {
    let pages = registry
        .iter()
        .filter(|config| runs_unattended(config))
        .map(|config| (config.id, StaticPage::with_inputs(config, std::iter::empty())))
        .collect::<Vec<_>>();
    info!(count = pages.len(), "running unattended features");

    join_all(pages.iter().map(|(id, page)| async move {
        (*id, dispatcher.invoke(*id, page).await)
    }))
    .await
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
