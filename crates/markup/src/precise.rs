//! Precise mode: events to a nested outline tree.
//!
//! Rules applied while streaming:
//! - consecutive `li` (and `p`) siblings merge into the earlier node;
//! - closing `td` hoists the content of its trailing element into the
//!   enclosing node, so cell wrappers disappear;
//! - closing `li` trims its trailing text run;
//! - a closed element that ended up empty is pruned;
//! - whitespace-only text is dropped, adjacent text runs merge.
//!
//! The cursor is an explicit stack of open ancestors; the root sits
//! implicitly at the bottom and is never popped by an end tag.

use crate::container::{Container, NodeIndex, Slot, StructuralTag};
use crate::tokenizer::tokenize_into;
use crate::tree::{Child, Node};
use crate::types::{Attribute, TokenSink};

const ROOT: NodeIndex = 0;
const ZERO_WIDTH_SPACE: char = '\u{200B}';

pub struct PreciseBuilder {
    arena: NodeArena,
    open: Vec<NodeIndex>,
}

impl Default for PreciseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PreciseBuilder {
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            open: Vec::new(),
        }
    }

    /// Parse one complete document and return its outline.
    ///
    /// The builder is reset afterwards and can take the next document.
    pub fn feed(&mut self, markup: &str) -> Node {
        let cleaned = markup.replace(ZERO_WIDTH_SPACE, "");
        tokenize_into(&cleaned, self);
        self.finish()
    }

    /// Close everything still open, hand out the tree and reset.
    pub fn finish(&mut self) -> Node {
        while let Some(index) = self.open.pop() {
            self.arena.nodes[index].close();
        }
        self.arena.nodes[ROOT].close();
        let arena = std::mem::replace(&mut self.arena, NodeArena::new());
        log::trace!(
            target: "markup.precise",
            "finish: {} arena nodes",
            arena.nodes.len()
        );
        arena.into_tree()
    }

    /// Drop any partially built document.
    pub fn reset(&mut self) {
        self.arena = NodeArena::new();
        self.open.clear();
    }

    fn cursor(&self) -> NodeIndex {
        self.open.last().copied().unwrap_or(ROOT)
    }

    fn open_structural(&mut self, tag: StructuralTag) {
        let cursor = self.cursor();
        let previous = self.arena.nodes[cursor]
            .last_element()
            .filter(|&index| self.arena.nodes[index].label() == Some(tag));

        match (tag, previous) {
            (StructuralTag::Li, Some(index)) => {
                let node = &mut self.arena.nodes[index];
                node.open();
                node.push(Slot::Text(String::new()));
                self.open.push(index);
            }
            (StructuralTag::P, Some(index)) => {
                let node = &mut self.arena.nodes[index];
                node.open();
                // Best-effort: a paragraph ending in a link has no run to extend.
                node.merge_text("\n");
                self.open.push(index);
            }
            _ => {
                let index = self.arena.add_child(cursor, Container::new(Some(tag)));
                self.open.push(index);
            }
        }
    }

    fn close_structural(&mut self, tag: StructuralTag) {
        let Some(&cursor) = self.open.last() else {
            log::debug!(
                target: "markup.precise",
                "ignoring </{}> with no open element",
                tag.as_str()
            );
            return;
        };

        let mut hoist = false;
        match tag {
            StructuralTag::Td => {
                if let Some(inner) = self.arena.nodes[cursor].last_element() {
                    let content = self.arena.nodes[inner].take_slots();
                    self.arena.nodes[cursor].replace_slots(content);
                    hoist = true;
                }
            }
            StructuralTag::Li => {
                let node = &mut self.arena.nodes[cursor];
                node.trim_last_text();
                if matches!(node.last(), Some(Slot::Text(text)) if text.is_empty()) {
                    node.pop();
                }
            }
            _ => {}
        }

        self.arena.nodes[cursor].close();
        self.open.pop();
        let parent = self.cursor();

        if hoist && self.arena.nodes[parent].last_element() == Some(cursor) {
            self.arena.nodes[parent].pop();
            let content = self.arena.nodes[cursor].take_slots();
            for slot in content {
                self.arena.nodes[parent].push(slot);
            }
        }

        if let Some(last) = self.arena.nodes[parent].last_element()
            && self.arena.nodes[last].is_empty()
        {
            self.arena.nodes[parent].pop();
        }
    }
}

impl TokenSink for PreciseBuilder {
    fn start_tag(&mut self, name: &str, attributes: &[Attribute], _self_closing: bool) {
        if let Some(tag) = StructuralTag::from_name(name) {
            self.open_structural(tag);
        }

        let cursor = self.cursor();
        for (key, value) in attributes {
            let Some(value) = value else {
                continue;
            };
            if key == "data-src" || (key == "href" && value.starts_with("https")) {
                self.arena.nodes[cursor].push(Slot::Link(value.clone()));
            }
        }
    }

    fn end_tag(&mut self, name: &str) {
        if let Some(tag) = StructuralTag::from_name(name) {
            self.close_structural(tag);
        }
    }

    fn text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let cursor = self.cursor();
        let node = &mut self.arena.nodes[cursor];
        if !node.merge_text(text) {
            node.push(Slot::Text(text.to_string()));
        }
    }
}

#[derive(Debug)]
struct NodeArena {
    nodes: Vec<Container>,
}

impl NodeArena {
    fn new() -> Self {
        Self {
            nodes: vec![Container::new(None)],
        }
    }

    fn add_child(&mut self, parent: NodeIndex, child: Container) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(child);
        self.nodes[parent].push(Slot::Element(index));
        index
    }

    /// Materialize the owned tree reachable from the root.
    ///
    /// Iterative post-order: a node is built once all of its element children
    /// have been pushed onto `built`, in order, so they are exactly its last
    /// `element_count` entries. Pruned or hoisted containers are unreachable
    /// and simply dropped.
    fn into_tree(mut self) -> Node {
        let mut built: Vec<Node> = Vec::new();
        let mut stack: Vec<(NodeIndex, bool)> = vec![(ROOT, false)];

        while let Some((index, visited)) = stack.pop() {
            if !visited {
                stack.push((index, true));
                for slot in self.nodes[index].slots().iter().rev() {
                    if let Slot::Element(child) = slot {
                        stack.push((*child, false));
                    }
                }
                continue;
            }

            let container = &mut self.nodes[index];
            let slots = container.take_slots();
            let element_count = slots
                .iter()
                .filter(|slot| matches!(slot, Slot::Element(_)))
                .count();
            let mut elements = built
                .split_off(built.len().saturating_sub(element_count))
                .into_iter();
            let children = slots
                .into_iter()
                .filter_map(|slot| match slot {
                    Slot::Text(text) => Some(Child::Text(text)),
                    Slot::Link(url) => Some(Child::Link(url)),
                    Slot::Element(_) => elements.next().map(Child::Element),
                })
                .collect();
            built.push(Node::from_parts(
                container.label(),
                children,
                container.state(),
            ));
        }

        built.pop().unwrap_or_else(Node::empty_root)
    }
}
