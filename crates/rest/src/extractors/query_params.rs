//! Raw query parameter extractor.
//!
//! Collects query string pairs grouped by name. Names keep the order in which
//! they first appear and values keep their order within a name, so
//! `?a=1&b=2&a=3` becomes `[("a", ["1", "3"]), ("b", ["2"])]`.

use axum::{
    extract::{FromRequestParts, RawQuery},
    http::request::Parts,
};
use std::convert::Infallible;

/// Axum extractor for grouped query parameters.
///
/// # Example
///
/// ```rust,ignore
/// use cadence_rest::extractors::QueryParams;
///
/// async fn list_handler(params: QueryParams) {
///     for (name, values) in params.iter() {
///         println!("{} = {:?}", name, values);
///     }
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    /// Creates empty query params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw, percent-encoded query string.
    pub fn parse(query: &str) -> Self {
        let mut params: Vec<(String, Vec<String>)> = Vec::new();
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match params.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, values)) => values.push(value.into_owned()),
                None => params.push((name.into_owned(), vec![value.into_owned()])),
            }
        }
        Self { params }
    }

    /// Returns an iterator over the grouped parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns the values of a parameter.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns true if no parameters were given.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Consumes the extractor, yielding the grouped pairs.
    pub fn into_inner(self) -> Vec<(String, Vec<String>)> {
        self.params
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RawQuery(query) = RawQuery::from_request_parts(parts, state).await?;
        Ok(query.map(|q| QueryParams::parse(&q)).unwrap_or_default())
    }
}
