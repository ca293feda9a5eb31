//! Wiki article markup to structured outlines.
//!
//! Two builders consume the same tokenizer events:
//! - [`PreciseBuilder`] produces a nested outline tree ([`Node`]);
//! - [`LazyBuilder`] produces flat table/list rows ([`Entry`]).

mod container;
mod entities;
mod lazy;
mod precise;
mod tokenizer;
mod tree;
mod types;

pub use crate::container::{NodeState, StructuralTag};
pub use crate::lazy::{Cell, Entry, LazyBuilder, LazyConfig, RowTag};
pub use crate::precise::PreciseBuilder;
pub use crate::tokenizer::{tokenize, tokenize_into};
pub use crate::tree::{Child, Node};
pub use crate::types::{Attribute, Token, TokenSink, VecTokenSink, replay};
