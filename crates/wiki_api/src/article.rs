use crate::client::{WikiClient, refine};
use crate::error::{ApiError, Result};
use crate::query::Query;
use markup::{Entry, LazyBuilder, LazyConfig, Node, PreciseBuilder};
use serde::{Deserialize, Serialize};

/// One article record from the listing endpoints. The API omits fields
/// freely, so all of them are optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "ns")]
    pub namespace: Option<i64>,
}

impl Article {
    /// Fill fields this record lacks from `other`; present fields win.
    pub fn merge_missing(&mut self, other: Article) {
        self.id = self.id.or(other.id);
        self.title = self.title.take().or(other.title);
        self.url = self.url.take().or(other.url);
        self.namespace = self.namespace.or(other.namespace);
    }
}

/// How an article is addressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArticleRef {
    Id(u64),
    Title(String),
}

impl ArticleRef {
    /// The id wins when both are given.
    pub fn from_parts(id: Option<u64>, title: Option<&str>) -> Result<Self> {
        match (id, title) {
            (Some(id), _) => Ok(Self::Id(id)),
            (None, Some(title)) => Ok(Self::Title(title.to_string())),
            (None, None) => Err(ApiError::MissingIdentifier),
        }
    }

    fn modifier(&self) -> (&'static str, String) {
        match self {
            Self::Id(id) => ("id", id.to_string()),
            Self::Title(title) => ("title", title.clone()),
        }
    }
}

impl From<u64> for ArticleRef {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ArticleRef {
    fn from(title: &str) -> Self {
        Self::Title(title.to_string())
    }
}

/// Queries about a single article. Owns the outline builder it parses
/// article bodies with.
pub struct ArticleQuery<'a> {
    client: &'a WikiClient,
    target: ArticleRef,
    base: Query,
    builder: PreciseBuilder,
}

impl<'a> ArticleQuery<'a> {
    pub(crate) fn new(client: &'a WikiClient, target: ArticleRef) -> Self {
        Self {
            client,
            target,
            base: client.root().extend("Articles"),
            builder: PreciseBuilder::new(),
        }
    }

    pub fn target(&self) -> &ArticleRef {
        &self.target
    }

    /// Article body markup as served by `Articles/AsJson`.
    pub fn content_markup(&self) -> Result<String> {
        let (key, value) = self.target.modifier();
        let query = self.base.extend("AsJson").modifiers(&[(key, value)]);
        let value = self.client.request(&query)?;
        let markup = refine::<String>(value, &["content"])?
            .into_vec()
            .concat();
        Ok(markup)
    }

    /// Article body as an outline tree.
    pub fn content(&mut self) -> Result<Node> {
        let markup = self.content_markup()?;
        Ok(self.builder.feed(&markup))
    }

    /// Article body as table entries.
    pub fn tables(&self, config: LazyConfig) -> Result<Vec<Entry>> {
        let markup = self.content_markup()?;
        Ok(LazyBuilder::new(config).feed(&markup))
    }
}
