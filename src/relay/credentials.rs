//! Credential extraction for the token exchange.

use std::fmt;

use url::{form_urlencoded, Url};

use crate::relay::error::RelayError;

/// The `ak` / `sk` pair posted by the debug page.
///
/// Both values are opaque: no format or length checks are made, and a missing
/// field is an empty string rather than an error.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
}

impl Credentials {
    /// Parse a URL-encoded form body. The first non-blank value of each field wins.
    pub fn from_form(body: &[u8]) -> Result<Self, RelayError> {
        let text = std::str::from_utf8(body)?;

        let mut api_key = None;
        let mut secret_key = None;
        for (key, value) in form_urlencoded::parse(text.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "ak" if api_key.is_none() => api_key = Some(value.into_owned()),
                "sk" if secret_key.is_none() => secret_key = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(Self {
            api_key: api_key.unwrap_or_default(),
            secret_key: secret_key.unwrap_or_default(),
        })
    }

    /// Build the client-credentials grant URL on top of `base`.
    pub fn token_url(&self, base: &str) -> Result<Url, RelayError> {
        let url = Url::parse_with_params(
            base,
            &[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.secret_key.as_str()),
            ],
        )?;
        Ok(url)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
