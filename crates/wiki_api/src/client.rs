use crate::article::{Article, ArticleQuery, ArticleRef};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::limiter::RateLimiter;
use crate::query::Query;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// A response value narrowed to `T`.
#[derive(Clone, Debug, PartialEq)]
pub enum Refined<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Refined<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Refined::One(item) => vec![item],
            Refined::Many(items) => items,
        }
    }
}

/// Descend into `value` along `path`, then convert what is left: an object
/// or scalar becomes `One`, an array becomes `Many` unless it holds exactly
/// one item.
pub fn refine<T: DeserializeOwned>(mut value: Value, path: &[&str]) -> Result<Refined<T>> {
    for key in path {
        value = match value {
            Value::Object(mut map) => map
                .remove(*key)
                .ok_or_else(|| ApiError::MissingKey((*key).to_string()))?,
            _ => return Err(ApiError::MissingKey((*key).to_string())),
        };
    }
    match value {
        Value::Array(items) => {
            let mut items = items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<T>, _>>()?;
            if items.len() == 1
                && let Some(item) = items.pop()
            {
                return Ok(Refined::One(item));
            }
            Ok(Refined::Many(items))
        }
        other => Ok(Refined::One(serde_json::from_value(other)?)),
    }
}

/// Client for one wiki.
pub struct WikiClient {
    wiki: String,
    root: Query,
    http: reqwest::blocking::Client,
    limiter: Arc<RateLimiter>,
}

impl WikiClient {
    pub fn new(wiki: &str, config: &ClientConfig) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::new(config.min_interval));
        Self::with_limiter(wiki, config, limiter)
    }

    /// Build a client that shares `limiter` with other clients.
    pub fn with_limiter(
        wiki: &str,
        config: &ClientConfig,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self> {
        let root = Query::parse(&config.root_for(wiki))?;
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            wiki: wiki.to_string(),
            root,
            http,
            limiter,
        })
    }

    pub fn wiki(&self) -> &str {
        &self.wiki
    }

    pub fn root(&self) -> &Query {
        &self.root
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Raw JSON answer of `method` with the given query parameters.
    pub fn query(&self, method: &str, modifiers: &[(&str, &str)]) -> Result<Value> {
        self.request(&self.root.extend(method).modifiers(modifiers))
    }

    pub fn refined_query<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &[&str],
        modifiers: &[(&str, &str)],
    ) -> Result<Refined<T>> {
        refine(self.query(method, modifiers)?, path)
    }

    /// Article listing; useful modifiers are `category`, `namespaces`,
    /// `limit`, `offset` and `expand`.
    pub fn fetch_articles(&self, modifiers: &[(&str, &str)]) -> Result<Vec<Article>> {
        Ok(self
            .refined_query::<Article>("Articles/List", &["items"], modifiers)?
            .into_vec())
    }

    pub fn article(&self, target: ArticleRef) -> ArticleQuery<'_> {
        ArticleQuery::new(self, target)
    }

    pub(crate) fn request(&self, query: &Query) -> Result<Value> {
        let url = query.as_str();
        log::debug!(target: "wiki_api.request", "GET {url}");
        let response = self
            .limiter
            .throttle(|| self.http.get(url).send())
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            log::debug!(target: "wiki_api.request", "GET {url} -> {status}");
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }
        response.json::<Value>().map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
