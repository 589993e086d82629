//! Rich-content tree definitions.

use itertools::Itertools as _;

/// Single node of a rich-content tree.
///
/// CMS rich-text fields are stored as trees of these nodes. Only the kinds
/// below carry meaning for this application, everything else is preserved as
/// [`Node::Other`] and skipped by extraction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    /// Paragraph of text.
    Paragraph {
        /// Nested [`Node`]s of this paragraph.
        children: Vec<Node>,
    },

    /// Ordered or unordered list.
    List {
        /// Nested [`Node`]s of this list.
        children: Vec<Node>,
    },

    /// Single item of a [`Node::List`].
    ListItem {
        /// Nested [`Node`]s of this list item.
        children: Vec<Node>,
    },

    /// Text leaf.
    Text {
        /// Contained text.
        text: String,

        /// Indicator whether the text is bold.
        bold: bool,
    },

    /// Node of a kind this application doesn't interpret.
    Other,
}

/// Extracts plain text strings from the given rich-content `nodes`.
///
/// Every text-bearing leaf contributes its trimmed string, while
/// [`Node::ListItem`]s concatenate their direct text children with single
/// spaces. The result contains non-empty strings only, de-duplicated in
/// first-seen order.
#[must_use]
pub fn extract_texts(nodes: &[Node]) -> Vec<String> {
    let mut texts = Vec::new();
    for node in nodes {
        extract(node, &mut texts);
    }
    texts
        .into_iter()
        .filter(|t| !t.is_empty())
        .unique()
        .collect()
}

/// Collects text from a single [`Node`] into the `out` accumulator.
fn extract(node: &Node, out: &mut Vec<String>) {
    match node {
        Node::Text { text, .. } => {
            let text = text.trim();
            if !text.is_empty() {
                out.push(text.to_owned());
            }
        }
        Node::ListItem { children } => {
            let text = children
                .iter()
                .filter_map(|child| match child {
                    Node::Text { text, .. } => Some(text.trim()),
                    Node::Paragraph { .. }
                    | Node::List { .. }
                    | Node::ListItem { .. }
                    | Node::Other => None,
                })
                .filter(|t| !t.is_empty())
                .join(" ");
            if !text.is_empty() {
                out.push(text);
            }
        }
        Node::Paragraph { children } | Node::List { children } => {
            for child in children {
                extract(child, out);
            }
        }
        Node::Other => {}
    }
}

#[cfg(test)]
mod spec {
    use super::{extract_texts, Node};

    fn text(s: &str) -> Node {
        Node::Text {
            text: s.to_owned(),
            bold: false,
        }
    }

    #[test]
    fn extracts_paragraph_text() {
        let nodes = [Node::Paragraph {
            children: vec![text("Free parking")],
        }];

        assert_eq!(extract_texts(&nodes), ["Free parking"]);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        assert_eq!(extract_texts(&[]), Vec::<String>::new());
    }

    #[test]
    fn joins_list_item_text_children() {
        let nodes = [Node::List {
            children: vec![
                Node::ListItem {
                    children: vec![text("Hotel"), text("pickup")],
                },
                Node::ListItem {
                    children: vec![text("  Lunch  ")],
                },
            ],
        }];

        assert_eq!(extract_texts(&nodes), ["Hotel pickup", "Lunch"]);
    }

    #[test]
    fn deduplicates_in_first_seen_order() {
        let nodes = [
            Node::Paragraph {
                children: vec![text("Snacks"), text("Water")],
            },
            Node::Paragraph {
                children: vec![text("Snacks")],
            },
        ];

        assert_eq!(extract_texts(&nodes), ["Snacks", "Water"]);
    }

    #[test]
    fn skips_empty_and_unknown_nodes() {
        let nodes = [
            Node::Other,
            Node::Paragraph {
                children: vec![text("   "), text("Towel")],
            },
        ];

        assert_eq!(extract_texts(&nodes), ["Towel"]);
    }
}
