use crate::container::{NodeState, StructuralTag};

/// One child slot of an outline node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Child {
    /// Merged text run.
    Text(String),
    /// Link leaf taken from an `href`/`data-src` attribute.
    Link(String),
    Element(Node),
}

/// Finished outline node handed out by [`crate::PreciseBuilder`].
///
/// The document root has no label. Every node in a finished tree is closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    label: Option<StructuralTag>,
    children: Vec<Child>,
    state: NodeState,
}

impl Node {
    pub(crate) fn from_parts(
        label: Option<StructuralTag>,
        children: Vec<Child>,
        state: NodeState,
    ) -> Self {
        Self {
            label,
            children,
            state,
        }
    }

    /// Empty, closed document root.
    pub fn empty_root() -> Self {
        Self::from_parts(None, Vec::new(), NodeState::Closed)
    }

    pub fn label(&self) -> Option<StructuralTag> {
        self.label
    }

    pub fn is_root(&self) -> bool {
        self.label.is_none()
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Child> {
        self.children
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == NodeState::Closed
    }

    /// Direct element children.
    pub fn elements(&self) -> impl Iterator<Item = &Node> + '_ {
        self.children.iter().filter_map(|child| match child {
            Child::Element(node) => Some(node),
            _ => None,
        })
    }

    /// Descendant text runs joined with `\n`, in document order.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.walk(&mut |child| {
            if let Child::Text(text) = child {
                parts.push(text.as_str());
            }
        });
        parts.join("\n")
    }

    /// Every link value in the subtree, in document order.
    pub fn links(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |child| {
            if let Child::Link(url) = child {
                out.push(url.as_str());
            }
        });
        out
    }

    /// Pre-order visit of every child slot in the subtree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Child)) {
        let mut stack: Vec<std::slice::Iter<'a, Child>> = vec![self.children.iter()];
        while let Some(iter) = stack.last_mut() {
            let Some(child) = iter.next() else {
                stack.pop();
                continue;
            };
            visit(child);
            if let Child::Element(node) = child {
                stack.push(node.children.iter());
            }
        }
    }
}
