//! Closable container: the mutable node the precise builder works on.
//!
//! Containers live in an arena and refer to nested containers by index.
//! In-place replacement of the last child is gated on [`NodeState`]; plain
//! push/pop are not, because the builder's cleanup passes (pruning, cell
//! unwrapping) run after a node has been closed.

/// Tags the precise builder turns into nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructuralTag {
    H2,
    Td,
    Li,
    P,
    Dl,
}

impl StructuralTag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "h2" => Some(Self::H2),
            "td" => Some(Self::Td),
            "li" => Some(Self::Li),
            "p" => Some(Self::P),
            "dl" => Some(Self::Dl),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::H2 => "h2",
            Self::Td => "td",
            Self::Li => "li",
            Self::P => "p",
            Self::Dl => "dl",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeState {
    #[default]
    Open,
    Closed,
}

pub(crate) type NodeIndex = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    Text(String),
    Link(String),
    Element(NodeIndex),
}

#[derive(Debug)]
pub(crate) struct Container {
    label: Option<StructuralTag>,
    slots: Vec<Slot>,
    state: NodeState,
}

impl Container {
    pub(crate) fn new(label: Option<StructuralTag>) -> Self {
        Self {
            label,
            slots: Vec::new(),
            state: NodeState::Open,
        }
    }

    pub(crate) fn label(&self) -> Option<StructuralTag> {
        self.label
    }

    pub(crate) fn state(&self) -> NodeState {
        self.state
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state == NodeState::Closed
    }

    pub(crate) fn open(&mut self) {
        self.state = NodeState::Open;
    }

    pub(crate) fn close(&mut self) {
        self.state = NodeState::Closed;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub(crate) fn last(&self) -> Option<&Slot> {
        self.slots.last()
    }

    pub(crate) fn last_element(&self) -> Option<NodeIndex> {
        match self.slots.last() {
            Some(Slot::Element(index)) => Some(*index),
            _ => None,
        }
    }

    pub(crate) fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub(crate) fn pop(&mut self) -> Option<Slot> {
        self.slots.pop()
    }

    pub(crate) fn take_slots(&mut self) -> Vec<Slot> {
        std::mem::take(&mut self.slots)
    }

    pub(crate) fn replace_slots(&mut self, slots: Vec<Slot>) {
        self.slots = slots;
    }

    /// Replace the last child in place. No-op (returns `false`) when the
    /// container is closed or has no children.
    pub(crate) fn replace_last(&mut self, slot: Slot) -> bool {
        if self.is_closed() {
            return false;
        }
        match self.slots.last_mut() {
            Some(last) => {
                *last = slot;
                true
            }
            None => false,
        }
    }

    /// Append to the trailing text run. A lone `:` gets a separating space
    /// first. Returns `false` when there is no open trailing text run.
    pub(crate) fn merge_text(&mut self, text: &str) -> bool {
        if self.is_closed() {
            return false;
        }
        let Some(Slot::Text(last)) = self.slots.last_mut() else {
            return false;
        };
        if last == ":" {
            last.push(' ');
        }
        last.push_str(text);
        true
    }

    /// Trim the trailing text run; best-effort, `false` if there is none or
    /// the container is closed.
    pub(crate) fn trim_last_text(&mut self) -> bool {
        let Some(Slot::Text(last)) = self.last() else {
            return false;
        };
        let trimmed = last.trim();
        if trimmed.len() == last.len() {
            return !self.is_closed();
        }
        let trimmed = trimmed.to_string();
        self.replace_last(Slot::Text(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_tag_round_trips_names() {
        for name in ["h2", "td", "li", "p", "dl"] {
            let tag = StructuralTag::from_name(name).expect("structural tag");
            assert_eq!(tag.as_str(), name);
        }
        assert_eq!(StructuralTag::from_name("div"), None);
        assert_eq!(StructuralTag::from_name("h3"), None);
    }

    #[test]
    fn closed_container_rejects_in_place_replacement() {
        let mut node = Container::new(Some(StructuralTag::Li));
        node.push(Slot::Text("  a  ".to_string()));
        node.close();
        assert!(!node.replace_last(Slot::Text("b".to_string())));
        assert!(!node.trim_last_text());
        assert!(!node.merge_text("c"));
        assert_eq!(node.last(), Some(&Slot::Text("  a  ".to_string())));

        node.open();
        assert!(node.trim_last_text());
        assert_eq!(node.last(), Some(&Slot::Text("a".to_string())));
    }

    #[test]
    fn closed_container_still_allows_push_and_pop() {
        let mut node = Container::new(None);
        node.close();
        node.push(Slot::Link("https://a.test".to_string()));
        assert_eq!(node.slots().len(), 1);
        assert_eq!(node.pop(), Some(Slot::Link("https://a.test".to_string())));
        assert!(node.is_empty());
    }

    #[test]
    fn merge_text_separates_lone_colon() {
        let mut node = Container::new(Some(StructuralTag::P));
        node.push(Slot::Text(":".to_string()));
        assert!(node.merge_text("Value"));
        assert_eq!(node.last(), Some(&Slot::Text(": Value".to_string())));
    }

    #[test]
    fn merge_text_needs_trailing_text_run() {
        let mut node = Container::new(Some(StructuralTag::P));
        assert!(!node.merge_text("x"));
        node.push(Slot::Element(3));
        assert!(!node.merge_text("x"));
        assert_eq!(node.last_element(), Some(3));
    }

    #[test]
    fn trim_last_text_ignores_non_text() {
        let mut node = Container::new(Some(StructuralTag::Li));
        node.push(Slot::Element(1));
        assert!(!node.trim_last_text());
    }
}
