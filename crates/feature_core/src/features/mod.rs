//! One module per button on the page. Each declares the typed response
//! shape of its upstream API, the validation rule, the fetch plan and the
//! pure render function.

pub mod bobs_burgers;
pub mod cat_fact;
pub mod cat_image;
pub mod currency;
pub mod dictionary;
pub mod dog;
pub mod ghibli;
pub mod github;
pub mod joke;
pub mod pokemon;
pub mod random_user;
pub mod rick_morty;
pub mod trending;
pub mod weather;

/// First non-blank value, or `fallback`.
pub(crate) fn or_placeholder(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "../tests/features_tests.rs"]
mod tests;
