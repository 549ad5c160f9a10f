use serde_json::json;
use shared::{domain::FeatureId, view::View};

use crate::{
    dispatch::{FailureKind, Outcome},
    page::{Page, StaticPage},
    registry::default_registry,
    render::to_html,
    settings::Settings,
    testing::{filled_page, harness, harness_with, Reply, StubFetcher},
};

fn html_of(outcome: &Outcome) -> String {
    to_html(outcome.view().expect("outcome carries a view"))
}

fn page_with(values: &[(&str, &str)]) -> StaticPage {
    let mut page = StaticPage::for_registry(&default_registry());
    for (id, value) in values {
        page.set_value(*id, *value);
    }
    page
}

#[tokio::test]
async fn empty_required_input_fails_validation_without_network() {
    let h = harness(StubFetcher::new());
    let page = StaticPage::for_registry(&default_registry());

    for config in h.dispatcher.registry().iter() {
        if config.inputs.is_empty() {
            continue;
        }
        let outcome = h.dispatcher.invoke(config.id, &page).await;
        assert!(
            matches!(
                outcome,
                Outcome::Failed {
                    kind: FailureKind::Input,
                    ..
                }
            ),
            "{}: {outcome:?}",
            config.id
        );
        let history = h.sink.history(config.output);
        assert!(
            history.iter().all(|view| !matches!(view, View::Loading(_))),
            "{} showed loading before validation passed",
            config.id
        );
    }
    assert!(h.fetcher.calls().is_empty());
}

#[tokio::test]
async fn upstream_failure_shows_feature_message_and_clears_loading() {
    let h = harness(StubFetcher::new());
    let page = filled_page(h.dispatcher.registry());

    for config in h.dispatcher.registry().iter() {
        let outcome = h.dispatcher.invoke(config.id, &page).await;
        assert_eq!(
            outcome,
            Outcome::Failed {
                kind: FailureKind::Operation,
                view: View::Error(config.failure_message.to_string()),
            },
            "{}",
            config.id
        );

        let history = h.sink.history(config.output);
        assert_eq!(history.first(), Some(&View::loading()), "{}", config.id);
        assert_eq!(
            h.sink.latest(config.output),
            Some(View::Error(config.failure_message.to_string()))
        );
    }
}

#[tokio::test]
async fn server_error_status_is_an_operation_error() {
    let h = harness(
        StubFetcher::new().reply("catfact.ninja/fact", Reply::Status(503)),
    );
    let outcome = h.dispatcher.invoke(FeatureId::CatFact, &page_with(&[])).await;
    assert_eq!(
        html_of(&outcome),
        "<p class=\"error\">Could not load a cat fact.</p>"
    );
}

#[tokio::test]
async fn currency_conversion_renders_amounts_and_rate() {
    let h = harness(StubFetcher::new().json(
        "open.er-api.com/v6/latest/USD",
        json!({ "result": "success", "rates": { "USD": 1, "EUR": 0.92 } }),
    ));
    let page = page_with(&[("cur-amount", "100"), ("cur-from", "usd"), ("cur-to", " eur ")]);

    let outcome = h.dispatcher.invoke(FeatureId::Currency, &page).await;
    let html = html_of(&outcome);
    assert!(html.contains("100 USD"), "{html}");
    assert!(html.contains("92.00 EUR"), "{html}");
    assert!(html.contains("Rate: 1 USD = 0.92 EUR"), "{html}");
    assert_eq!(h.fetcher.calls()[0].path(), "/v6/latest/USD");
}

#[tokio::test]
async fn currency_rejects_zero_amount_before_fetching() {
    let h = harness(StubFetcher::new());
    let page = page_with(&[("cur-amount", "0"), ("cur-from", "usd"), ("cur-to", "eur")]);

    let outcome = h.dispatcher.invoke(FeatureId::Currency, &page).await;
    assert_eq!(
        outcome,
        Outcome::Failed {
            kind: FailureKind::Input,
            view: View::Error("Enter a valid amount.".into()),
        }
    );
    assert!(h.fetcher.calls().is_empty());
}

#[tokio::test]
async fn currency_requires_both_codes() {
    let h = harness(StubFetcher::new());
    let page = page_with(&[("cur-amount", "5"), ("cur-from", "usd"), ("cur-to", "  ")]);

    let outcome = h.dispatcher.invoke(FeatureId::Currency, &page).await;
    assert_eq!(
        html_of(&outcome),
        "<p class=\"error\">Enter currency codes like USD/EUR.</p>"
    );
    assert!(h.fetcher.calls().is_empty());
}

#[tokio::test]
async fn currency_with_unknown_target_rate_fails() {
    let h = harness(StubFetcher::new().json(
        "open.er-api.com/v6/latest/USD",
        json!({ "rates": { "EUR": 0.92 } }),
    ));
    let page = page_with(&[("cur-amount", "1"), ("cur-from", "usd"), ("cur-to", "xyz")]);

    let outcome = h.dispatcher.invoke(FeatureId::Currency, &page).await;
    assert_eq!(
        html_of(&outcome),
        "<p class=\"error\">Conversion failed. Check your currency codes.</p>"
    );
}

#[tokio::test]
async fn weather_stops_when_city_is_not_found() {
    let h = harness(StubFetcher::new().json(
        "geocoding-api.open-meteo.com/v1/search",
        json!({ "generationtime_ms": 0.5 }),
    ));
    let page = page_with(&[("wx-city", "Nowhereville")]);

    let outcome = h.dispatcher.invoke(FeatureId::Weather, &page).await;
    assert_eq!(
        outcome,
        Outcome::Failed {
            kind: FailureKind::Operation,
            view: View::Error("Could not load weather for that city.".into()),
        }
    );
    let calls = h.fetcher.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls
        .iter()
        .all(|url| url.host_str() != Some("api.open-meteo.com")));
}

#[tokio::test]
async fn weather_chains_geocode_into_forecast() {
    let h = harness(
        StubFetcher::new()
            .json(
                "geocoding-api.open-meteo.com/v1/search",
                json!({ "results": [{
                    "name": "San Jose",
                    "admin1": "California",
                    "country": "United States",
                    "latitude": 37.33939,
                    "longitude": -121.89496
                }] }),
            )
            .json(
                "api.open-meteo.com/v1/forecast",
                json!({ "current_weather": {
                    "temperature": 18.5,
                    "windspeed": 7.2,
                    "time": "2024-05-01T12:00"
                } }),
            ),
    );
    let page = page_with(&[("wx-city", " San Jose ")]);

    let outcome = h.dispatcher.invoke(FeatureId::Weather, &page).await;
    let html = html_of(&outcome);
    assert!(html.contains("<strong>San Jose, California, United States</strong>"));
    assert!(html.contains("Temp: <strong>18.5°C</strong>"));
    assert!(html.contains("Wind: 7.2 km/h • Time: 2024-05-01T12:00"));

    let calls = h.fetcher.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].query(),
        Some("name=San+Jose&count=1&language=en&format=json")
    );
    assert_eq!(
        calls[1].query(),
        Some("latitude=37.33939&longitude=-121.89496&current_weather=true")
    );

    let history = h.sink.history("wx-output");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0], View::loading());
    assert_eq!(history[1], View::loading());
}

#[tokio::test]
async fn pokemon_converts_units_and_upper_cases_name() {
    let h = harness(StubFetcher::new().json(
        "pokeapi.co/api/v2/pokemon/pikachu",
        json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "types": [{ "slot": 1, "type": { "name": "electric" } }],
            "sprites": { "front_default": "https://img.test/25.png" }
        }),
    ));
    let page = page_with(&[("poke-name", "  PiKaChu ")]);

    let outcome = h.dispatcher.invoke(FeatureId::Pokemon, &page).await;
    let html = html_of(&outcome);
    assert!(html.contains("0.4 m"), "{html}");
    assert!(html.contains("6 kg"), "{html}");
    assert!(html.contains("<strong>PIKACHU</strong>"), "{html}");
    assert!(html.contains("Type: electric"), "{html}");
    assert!(html.contains("#25"), "{html}");
}

#[tokio::test]
async fn trending_movies_without_key_never_fetches() {
    let h = harness_with(StubFetcher::new(), Settings::default());

    let outcome = h
        .dispatcher
        .invoke(FeatureId::TrendingMovies, &page_with(&[]))
        .await;
    match outcome {
        Outcome::Failed {
            kind: FailureKind::Input,
            view: View::Error(message),
        } => assert!(message.starts_with("TMDB API key missing"), "{message}"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(h.fetcher.calls().is_empty());
}

#[tokio::test]
async fn trending_movies_lists_top_five_with_years() {
    let movies: Vec<_> = (1..=7)
        .map(|n| json!({ "title": format!("Movie {n}"), "release_date": format!("202{n}-01-01") }))
        .chain([json!({ "title": "Undated" })])
        .collect();
    let h = harness(StubFetcher::new().json(
        "api.themoviedb.org/3/trending/movie/day",
        json!({ "results": movies }),
    ));

    let outcome = h
        .dispatcher
        .invoke(FeatureId::TrendingMovies, &page_with(&[]))
        .await;
    let html = html_of(&outcome);
    assert_eq!(html.matches("<li>").count(), 5);
    assert!(html.contains("<strong>Movie 1</strong> (2021)"));
    assert!(!html.contains("Movie 6"));
    assert_eq!(h.fetcher.calls()[0].query(), Some("api_key=test-key"));
}

#[tokio::test]
async fn dictionary_not_found_uses_feature_message() {
    let h = harness(StubFetcher::new());
    let page = page_with(&[("word-input", "xyzzyplugh")]);

    let outcome = h.dispatcher.invoke(FeatureId::Dictionary, &page).await;
    assert_eq!(
        html_of(&outcome),
        "<p class=\"error\">Could not find a definition for that word.</p>"
    );
    assert_eq!(h.fetcher.calls().len(), 1);
}

#[tokio::test]
async fn dictionary_renders_phonetic_definition_and_first_audio() {
    let h = harness(StubFetcher::new().json(
        "api.dictionaryapi.dev/api/v2/entries/en/ice%20cream",
        json!([{
            "word": "ice cream",
            "phonetic": "/ˌaɪs ˈkɹiːm/",
            "phonetics": [{ "text": "x", "audio": "" }, { "audio": "https://audio.test/ice.mp3" }],
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [{ "definition": "A frozen dessert." }]
            }]
        }]),
    ));
    let page = page_with(&[("word-input", "ice cream")]);

    let outcome = h.dispatcher.invoke(FeatureId::Dictionary, &page).await;
    let html = html_of(&outcome);
    assert!(html.contains("<strong>ice cream</strong> — <em>/ˌaɪs ˈkɹiːm/</em>"));
    assert!(html.contains("<strong>noun</strong>: A frozen dessert."));
    assert!(html.contains("<audio controls src=\"https://audio.test/ice.mp3\""));
}

#[tokio::test]
async fn dictionary_without_audio_or_definition_degrades() {
    let h = harness(StubFetcher::new().json(
        "api.dictionaryapi.dev/api/v2/entries/en/hello",
        json!([{ "word": "hello" }]),
    ));
    let page = page_with(&[("word-input", "hello")]);

    let html = html_of(&h.dispatcher.invoke(FeatureId::Dictionary, &page).await);
    assert!(html.contains("No definition found."));
    assert!(html.contains("No audio available."));
}

#[tokio::test]
async fn absent_fields_render_placeholders() {
    let h = harness(
        StubFetcher::new()
            .json("api.github.com/users/octocat", json!({}))
            .json("v2.jokeapi.dev/joke/Any", json!({}))
            .json("catfact.ninja/fact", json!({}))
            .json("rickandmortyapi.com/api/character/1", json!({}))
            .json("bobsburgers-api.herokuapp.com/characters/1", json!({}))
            .json("pokeapi.co/api/v2/pokemon/pikachu", json!({}))
            .json("randomuser.me/api/", json!({ "results": [{}] })),
    );
    let page = filled_page(h.dispatcher.registry());

    for id in [
        FeatureId::GithubProfile,
        FeatureId::Joke,
        FeatureId::CatFact,
        FeatureId::RickMorty,
        FeatureId::BobsBurgers,
        FeatureId::Pokemon,
        FeatureId::RandomUser,
    ] {
        let outcome = h.dispatcher.invoke(id, &page).await;
        assert!(matches!(outcome, Outcome::Rendered(_)), "{id}: {outcome:?}");
        let html = html_of(&outcome);
        for leaked in ["undefined", "null", "None"] {
            assert!(!html.contains(leaked), "{id} leaked {leaked}: {html}");
        }
    }

    let github = h.sink.html("gh-output").expect("github");
    assert!(github.contains("<strong>octocat</strong>"));
    assert!(github.contains("Repos: N/A | Followers: N/A"));
    assert!(!github.contains("<img"));

    let pokemon = h.sink.html("poke-output").expect("pokemon");
    assert!(pokemon.contains("Type: Unknown"));
    assert!(pokemon.contains("Height: N/A • Weight: N/A"));

    let rick = h.sink.html("rm-output").expect("rick and morty");
    assert!(rick.contains("Origin: Unknown"));

    let user = h.sink.html("user-output").expect("random user");
    assert!(user.contains("<strong>Random User</strong>"));
    assert!(user.contains("<p class=\"small\">N/A</p>"));
}

#[tokio::test]
async fn repeated_invocation_renders_identical_output() {
    let stub = StubFetcher::new().json(
        "api.github.com/users/octocat",
        json!({
            "login": "octocat",
            "name": "The Octocat",
            "avatar_url": "https://avatars.test/583231",
            "html_url": "https://github.com/octocat",
            "public_repos": 8,
            "followers": 9000
        }),
    );
    let h = harness(stub);
    let page = page_with(&[("gh-user", "octocat")]);

    let first = html_of(&h.dispatcher.invoke(FeatureId::GithubProfile, &page).await);
    let second = html_of(&h.dispatcher.invoke(FeatureId::GithubProfile, &page).await);
    assert_eq!(first, second);
    assert!(first.contains("<strong>The Octocat</strong>"));
    assert!(first.contains("Repos: 8 | Followers: 9000"));
    assert!(first.contains("href=\"https://github.com/octocat\""));
}

#[tokio::test]
async fn joke_renders_single_or_two_part() {
    let h = harness(StubFetcher::new().json(
        "v2.jokeapi.dev/joke/Any",
        json!({ "type": "single", "joke": "I would tell a UDP joke, but you might not get it." }),
    ));
    let html = html_of(&h.dispatcher.invoke(FeatureId::Joke, &page_with(&[])).await);
    assert_eq!(
        html,
        "<p>I would tell a UDP joke, but you might not get it.</p>"
    );
    assert_eq!(h.fetcher.calls()[0].query(), Some("safe-mode"));

    let h = harness(StubFetcher::new().json(
        "v2.jokeapi.dev/joke/Any",
        json!({ "type": "twopart", "setup": "Why?", "delivery": "Because." }),
    ));
    let html = html_of(&h.dispatcher.invoke(FeatureId::Joke, &page_with(&[])).await);
    assert_eq!(html, "<p><strong>Why?</strong></p>\n<p>Because.</p>");
}

#[tokio::test]
async fn ghibli_lists_first_five_and_counts_all() {
    let films: Vec<_> = (0..7)
        .map(|n| json!({ "title": format!("Film {n}"), "release_date": format!("19{}", 80 + n) }))
        .collect();
    let h = harness(StubFetcher::new().json("ghibliapi.vercel.app/films", json!(films)));

    let html = html_of(&h.dispatcher.invoke(FeatureId::GhibliFilms, &page_with(&[])).await);
    assert_eq!(html.matches("<li>").count(), 5);
    assert!(html.contains("<li><strong>Film 0</strong> (1980)</li>"));
    assert!(html.contains("Total films: 7"));
}

#[tokio::test]
async fn cat_image_without_url_is_an_operation_error() {
    let h = harness(StubFetcher::new().json("api.thecatapi.com/v1/images/search", json!([])));
    let outcome = h.dispatcher.invoke(FeatureId::CatImage, &page_with(&[])).await;
    assert!(matches!(
        outcome,
        Outcome::Failed {
            kind: FailureKind::Operation,
            ..
        }
    ));
}

#[tokio::test]
async fn random_user_joins_present_location_parts() {
    let h = harness(StubFetcher::new().json(
        "randomuser.me/api/",
        json!({ "results": [{
            "name": { "title": "Ms", "first": "Ada", "last": "Lovelace" },
            "email": "ada@example.com",
            "location": { "city": "London", "state": "", "country": "United Kingdom" },
            "picture": { "large": "https://img.test/ada.jpg" }
        }] }),
    ));
    let html = html_of(&h.dispatcher.invoke(FeatureId::RandomUser, &page_with(&[])).await);
    assert!(html.contains("<strong>Ada Lovelace</strong>"));
    assert!(html.contains("<p class=\"small\">London, United Kingdom</p>"));
    assert!(html.contains("alt=\"Ada Lovelace\""));
}

#[tokio::test]
async fn character_id_defaults_to_one_when_field_is_absent() {
    let h = harness(StubFetcher::new().json(
        "bobsburgers-api.herokuapp.com/characters/1",
        json!({ "name": "Bob Belcher", "hairColor": "Black", "occupation": "Cook" }),
    ));
    let mut page = page_with(&[]);
    page.remove_element("bobs-id");
    assert!(page.value("bobs-id").is_none());

    let html = html_of(&h.dispatcher.invoke(FeatureId::BobsBurgers, &page).await);
    assert!(html.contains("Hair: Black • Occupation: Cook"));
    assert!(html.contains("Gender: Unknown"));
}

#[tokio::test]
async fn missing_output_container_is_a_no_op() {
    let h = harness(StubFetcher::new());
    let mut page = page_with(&[]);
    page.remove_element("dog-output");

    assert_eq!(
        h.dispatcher.invoke(FeatureId::DogImage, &page).await,
        Outcome::Skipped
    );
    assert!(h.fetcher.calls().is_empty());
    assert!(h.sink.latest("dog-output").is_none());
}

#[tokio::test]
async fn click_requires_trigger_on_page() {
    let h = harness(StubFetcher::new().json(
        "dog.ceo/api/breeds/image/random",
        json!({ "message": "https://images.dog.ceo/a.jpg", "status": "success" }),
    ));
    let mut page = page_with(&[]);

    let outcome = h.dispatcher.click("dog-btn", &page).await;
    assert_eq!(
        html_of(&outcome),
        "<img src=\"https://images.dog.ceo/a.jpg\" alt=\"Random dog\" style=\"width:100%; border-radius:12px;\" />"
    );

    page.remove_element("dog-btn");
    assert_eq!(h.dispatcher.click("dog-btn", &page).await, Outcome::Skipped);
    assert_eq!(h.dispatcher.click("unknown-btn", &page).await, Outcome::Skipped);
}

#[tokio::test]
async fn dot_segment_ids_fail_without_reaching_the_collection() {
    let h = harness(
        StubFetcher::new().json(
            "pokeapi.co/api/v2/pokemon",
            json!({ "count": 1302, "results": [] }),
        ),
    );

    for raw in ["..", " . "] {
        let page = page_with(&[("poke-name", raw)]);
        let outcome = h.dispatcher.invoke(FeatureId::Pokemon, &page).await;
        assert_eq!(
            outcome,
            Outcome::Failed {
                kind: FailureKind::Operation,
                view: View::Error(
                    "Could not find that Pokémon. Try a different name or ID.".into()
                ),
            },
            "{raw:?}"
        );
    }
    assert!(h.fetcher.calls().is_empty());
}
