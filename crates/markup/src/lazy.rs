//! Lazy mode: events to flat table/list rows.
//!
//! Every `td`/`li` becomes one row whose payload is either its trimmed text
//! or, if the row carried a link, that link. Two optional passes follow: the
//! merge pass groups list rows and drops blank cells, the tidy pass pairs
//! entries with the plain-text label that precedes them.

use crate::tokenizer::tokenize_into;
use crate::types::{Attribute, TokenSink};

/// Literal substitutions applied before tokenizing: emphasis survives as
/// inline punctuation, paragraphs and rules become cells.
const NORMALIZE: &[(&str, &str)] = &[
    ("<b>", "**"),
    ("</b>", "**"),
    ("<i>", "*"),
    ("</i>", "*"),
    ("<p>", "<td>"),
    ("</p>", "</td>"),
    ("<hr>", "<td>"),
    ("</hr>", "</td>"),
];

#[derive(Clone, Debug)]
pub struct LazyConfig {
    /// Group list rows and drop blank cells.
    pub group_data: bool,
    /// Pair entries with their preceding label.
    pub tidy_tables: bool,
}

impl Default for LazyConfig {
    fn default() -> Self {
        Self {
            group_data: true,
            tidy_tables: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowTag {
    Li,
    Td,
}

impl RowTag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "li" => Some(Self::Li),
            "td" => Some(Self::Td),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Li => "li",
            Self::Td => "td",
        }
    }
}

/// Payload of one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    /// Value of the row's `href`.
    Link(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// Ungrouped row, only produced with `group_data` off.
    Raw { tag: RowTag, cell: Cell },
    Cell(Cell),
    Rows(Vec<Cell>),
    /// A cell or row group together with the label preceding it.
    Titled { title: String, body: Box<Entry> },
}

impl Entry {
    /// Text the tidy pass matches duplicate labels against: the title of a
    /// pair, the first character of a bare text cell, the first row of a
    /// text group.
    fn lead_text(&self) -> Option<&str> {
        match self {
            Entry::Titled { title, .. } => Some(title.as_str()),
            Entry::Cell(Cell::Text(text)) => text.chars().next().map(|ch| &text[..ch.len_utf8()]),
            Entry::Rows(rows) => match rows.first() {
                Some(Cell::Text(text)) => Some(text.as_str()),
                _ => None,
            },
            Entry::Cell(Cell::Link(_)) | Entry::Raw { .. } => None,
        }
    }
}

#[derive(Debug)]
enum RowToken {
    Text(String),
    Href(String),
}

#[derive(Debug)]
struct PendingRow {
    tag: RowTag,
    tokens: Vec<RowToken>,
}

impl PendingRow {
    fn new(tag: RowTag) -> Self {
        Self {
            tag,
            tokens: Vec::new(),
        }
    }

    fn into_row(self) -> (RowTag, Cell) {
        let link = self.tokens.iter().find_map(|token| match token {
            RowToken::Href(url) => Some(url.clone()),
            RowToken::Text(_) => None,
        });
        let cell = match link {
            Some(url) => Cell::Link(url),
            None => {
                let mut text = String::new();
                for token in &self.tokens {
                    if let RowToken::Text(part) = token {
                        text.push_str(part);
                    }
                }
                Cell::Text(text.trim().to_string())
            }
        };
        (self.tag, cell)
    }
}

pub struct LazyBuilder {
    config: LazyConfig,
    pending: Option<PendingRow>,
    rows: Vec<(RowTag, Cell)>,
}

impl Default for LazyBuilder {
    fn default() -> Self {
        Self::new(LazyConfig::default())
    }
}

impl LazyBuilder {
    pub fn new(config: LazyConfig) -> Self {
        Self {
            config,
            pending: None,
            rows: Vec::new(),
        }
    }

    pub fn config(&self) -> &LazyConfig {
        &self.config
    }

    /// Parse one complete document into entries; the builder is reset
    /// afterwards.
    pub fn feed(&mut self, markup: &str) -> Vec<Entry> {
        let normalized = normalize_markup(markup);
        tokenize_into(&normalized, self);
        self.finish()
    }

    /// Flush the pending row, run the configured passes and reset.
    pub fn finish(&mut self) -> Vec<Entry> {
        if let Some(row) = self.pending.take()
            && !row.tokens.is_empty()
        {
            self.rows.push(row.into_row());
        }
        let rows = std::mem::take(&mut self.rows);
        log::trace!(target: "markup.lazy", "finish: {} rows", rows.len());

        let mut entries = if self.config.group_data {
            merge_rows(rows)
        } else {
            rows.into_iter()
                .map(|(tag, cell)| Entry::Raw { tag, cell })
                .collect()
        };
        if self.config.tidy_tables {
            entries = tidy_tables(entries);
        }
        entries
    }

    /// Drop any partially collected document.
    pub fn reset(&mut self) {
        self.pending = None;
        self.rows.clear();
    }

    fn pending_or_cell(&mut self) -> &mut PendingRow {
        self.pending.get_or_insert_with(|| PendingRow::new(RowTag::Td))
    }

    fn close_pending(&mut self) {
        if let Some(row) = self.pending.take() {
            self.rows.push(row.into_row());
        }
    }
}

impl TokenSink for LazyBuilder {
    fn start_tag(&mut self, name: &str, attributes: &[Attribute], _self_closing: bool) {
        if let Some(tag) = RowTag::from_name(name) {
            match self.pending.take() {
                // Cells often omit their end tag; the next row tag ends them.
                Some(row) if row.tag == RowTag::Td => self.rows.push(row.into_row()),
                // A row tag nested in a list item splits it.
                Some(row) if !row.tokens.is_empty() => self.rows.push(row.into_row()),
                _ => {}
            }
            self.pending = Some(PendingRow::new(tag));
        }

        if let [(key, value)] = attributes
            && key == "href"
        {
            let url = value.clone().unwrap_or_default();
            self.pending_or_cell().tokens.push(RowToken::Href(url));
        }
    }

    fn end_tag(&mut self, name: &str) {
        if RowTag::from_name(name).is_some() {
            self.close_pending();
        }
    }

    fn text(&mut self, text: &str) {
        self.pending_or_cell()
            .tokens
            .push(RowToken::Text(text.to_string()));
    }
}

pub(crate) fn normalize_markup(markup: &str) -> String {
    let mut out = markup.to_string();
    for (from, to) in NORMALIZE {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    out
}

/// `td` rows become bare cells; runs of `li` rows collect into one group.
/// Blank text cells are dropped afterwards, so they still split groups.
fn merge_rows(rows: Vec<(RowTag, Cell)>) -> Vec<Entry> {
    let mut out: Vec<Entry> = Vec::with_capacity(rows.len());
    for (tag, cell) in rows {
        match (tag, out.last_mut()) {
            (RowTag::Td, _) => out.push(Entry::Cell(cell)),
            (RowTag::Li, Some(Entry::Rows(group))) => group.push(cell),
            (RowTag::Li, _) => out.push(Entry::Rows(vec![cell])),
        }
    }
    out.retain(|entry| !matches!(entry, Entry::Cell(Cell::Text(text)) if text.trim().is_empty()));
    out
}

/// Walk backwards pairing each entry with the one before it.
///
/// A bare text cell contained in the lead text of the entry emitted just
/// before it (i.e. the following entry) was already used as that entry's
/// title and is dropped. Groups and links never act as titles.
fn tidy_tables(mut entries: Vec<Entry>) -> Vec<Entry> {
    let mut out: Vec<Entry> = Vec::with_capacity(entries.len());
    while let Some(entry) = entries.pop() {
        if let Entry::Cell(Cell::Text(text)) = &entry
            && let Some(lead) = out.last().and_then(Entry::lead_text)
            && lead.contains(text.as_str())
        {
            continue;
        }
        match entries.last() {
            Some(Entry::Cell(Cell::Text(title))) => out.push(Entry::Titled {
                title: title.clone(),
                body: Box::new(entry),
            }),
            _ => out.push(entry),
        }
    }
    out.reverse();
    out
}
