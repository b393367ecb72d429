//! Redirect Types
//!
//! Raw parameters delivered by an authorization redirect.

use std::collections::HashMap;
use url::Url;

/// Raw parameters from an authorization redirect.
///
/// Providers return tokens either in the query string or, for implicit-flow
/// responses, in the URL fragment; `from_url` reads both.
#[derive(Clone, Debug, Default)]
pub struct RedirectPayload {
    params: HashMap<String, String>,
}

impl RedirectPayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a payload from name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse redirect parameters from a URL.
    ///
    /// Query parameters are read first; fragment parameters override them
    /// on name collision (the fragment is where implicit-flow responses
    /// place the token).
    pub fn from_url(url: &Url) -> Self {
        let mut payload = Self::new();

        for (key, value) in url.query_pairs() {
            payload.params.insert(key.into_owned(), value.into_owned());
        }

        if let Some(fragment) = url.fragment() {
            for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
                payload.params.insert(key.into_owned(), value.into_owned());
            }
        }

        payload
    }

    /// Parse redirect parameters from a URL string.
    pub fn from_url_str(url_str: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(url_str)?;
        Ok(Self::from_url(&url))
    }

    /// Insert a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Get a parameter value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Check whether the payload holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
