//! Blocking client for the wiki article API.
//!
//! Every request goes through one shared [`RateLimiter`]; article bodies are
//! handed to the `markup` builders.

mod article;
mod client;
mod config;
mod error;
mod limiter;
mod query;

pub use article::{Article, ArticleQuery, ArticleRef};
pub use client::{Refined, WikiClient, refine};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use limiter::RateLimiter;
pub use query::Query;
