use crate::error::{ApiError, Result};
use std::fmt;
use url::Url;

/// Immutable request URL; every builder step returns a new query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    url: Url,
}

impl Query {
    pub fn parse(root: &str) -> Result<Self> {
        let url = Url::parse(root).map_err(|source| ApiError::InvalidUrl {
            url: root.to_string(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: root.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }
        Ok(Self { url })
    }

    /// Append `/segment` to the path. Slashes inside `segment` split it into
    /// several segments, so `"Articles/List"` works as a method name.
    pub fn extend(&self, segment: &str) -> Self {
        let mut url = self.url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(segment.split('/').filter(|part| !part.is_empty()));
        }
        Self { url }
    }

    /// Append percent-encoded query parameters, keeping any already present.
    pub fn modifiers<K, V>(&self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.url.clone();
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
        }
        Self { url }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
