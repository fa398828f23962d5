use ego_tree::{NodeId, NodeRef, Tree};
use scraper::node::Node as HtmlNode;
use scraper::Html;

use crate::error::DomError;
use crate::node::{ElementData, NodeData};

/// An HTML document as a mutable tree.
///
/// Parsing goes through `scraper` (html5ever under the hood), then every node
/// is copied into an arena this struct owns. That copy is what makes markers
/// possible: scraper's own node types cannot be constructed by callers, so
/// its tree is effectively read-only.
///
/// All mutation goes through id-based methods. `NodeId`s stay valid for the
/// lifetime of the document, including across `detach` (the arena never frees
/// slots), so callers can collect ids first and splice afterwards.
///
/// # Example
///
/// ```rust
/// use dom::Document;
///
/// let doc = Document::parse("<p>Hello <b>world</b></p>");
/// let body = doc.body().unwrap();
/// assert_eq!(doc.flat_text(body).text, "Hello world");
/// ```
pub struct Document {
    tree: Tree<NodeData>,
}

impl Document {
    /// Parses an HTML string. html5ever's error recovery applies, so this
    /// never fails; malformed input produces the same tree a browser would.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut doc = Document {
            tree: Tree::new(NodeData::Document),
        };
        let root = doc.tree.root().id();
        for child in parsed.tree.root().children() {
            doc.copy_parsed(child, root);
        }
        doc
    }

    fn copy_parsed(&mut self, src: NodeRef<'_, HtmlNode>, parent: NodeId) {
        let data = match src.value() {
            HtmlNode::Text(t) => NodeData::Text(t.to_string()),
            HtmlNode::Comment(c) => NodeData::Comment(c.to_string()),
            HtmlNode::Doctype(d) => NodeData::Doctype(d.name().to_string()),
            HtmlNode::Element(el) => {
                let mut data = ElementData::new(el.name());
                for (name, value) in el.attrs() {
                    data.set_attr(name, value);
                }
                NodeData::Element(data)
            }
            // Document/fragment markers and processing instructions carry
            // nothing we anchor to.
            _ => return,
        };
        let id = match self.tree.get_mut(parent) {
            Some(mut p) => p.append(data).id(),
            None => return,
        };
        for child in src.children() {
            self.copy_parsed(child, id);
        }
    }

    /// Read-only view of the underlying arena.
    pub fn tree(&self) -> &Tree<NodeData> {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.tree.get(id).map(|n| n.value())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.parent().map(|n| n.id())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.tree.get(id) {
            Some(n) => n.children().map(|c| c.id()).collect(),
            None => Vec::new(),
        }
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.next_sibling().map(|n| n.id())
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id)?.prev_sibling().map(|n| n.id())
    }

    /// Siblings strictly after `id`, in document order.
    pub fn following_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.tree.get(id) {
            Some(n) => n.next_siblings().map(|s| s.id()).collect(),
            None => Vec::new(),
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(NodeData::is_text)
    }

    pub fn text_len(&self, id: NodeId) -> Option<usize> {
        self.node(id)?.as_text().map(str::len)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.as_element().map(|el| el.tag.as_str())
    }

    /// First element (document order) matching the predicate.
    pub fn find_element<F>(&self, pred: F) -> Option<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        self.tree
            .root()
            .descendants()
            .find(|n| n.value().as_element().is_some_and(&pred))
            .map(|n| n.id())
    }

    /// Every element (document order) matching the predicate.
    pub fn elements_where<F>(&self, pred: F) -> Vec<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        self.tree
            .root()
            .descendants()
            .filter(|n| n.value().as_element().is_some_and(&pred))
            .map(|n| n.id())
            .collect()
    }

    pub fn element_with_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        self.find_element(|el| el.attr(name) == Some(value))
    }

    pub fn count_elements_with_attr(&self, name: &str, value: &str) -> usize {
        self.elements_where(|el| el.attr(name) == Some(value)).len()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_element(|el| el.tag == "body")
    }

    /// Lowest node that is `a`, `b`, or an ancestor of both.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        if a == b {
            return Some(a);
        }
        let a_ref = self.tree.get(a)?;
        let b_ref = self.tree.get(b)?;
        let mut a_chain: Vec<NodeId> = vec![a];
        a_chain.extend(a_ref.ancestors().map(|n| n.id()));
        std::iter::once(b)
            .chain(b_ref.ancestors().map(|n| n.id()))
            .find(|id| a_chain.contains(id))
    }

    // ── Mutation ────────────────────────────────────────────────────────

    /// Creates a detached node, returning its id.
    pub fn orphan(&mut self, data: NodeData) -> NodeId {
        self.tree.orphan(data).id()
    }

    /// Moves `child` (and its subtree) to be the last child of `parent`.
    pub fn append_node(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut p = self.tree.get_mut(parent).ok_or(DomError::NodeNotFound)?;
        p.append_id(child);
        Ok(())
    }

    /// Moves `node` to be the previous sibling of `reference`.
    pub fn insert_node_before(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        let mut r = self.tree.get_mut(reference).ok_or(DomError::NodeNotFound)?;
        r.insert_id_before(node);
        Ok(())
    }

    /// Moves `node` to be the next sibling of `reference`.
    pub fn insert_node_after(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        let mut r = self.tree.get_mut(reference).ok_or(DomError::NodeNotFound)?;
        r.insert_id_after(node);
        Ok(())
    }

    /// Detaches `id` (and its subtree) from its parent. The node stays in the
    /// arena and can be re-attached later.
    pub fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        let mut n = self.tree.get_mut(id).ok_or(DomError::NodeNotFound)?;
        n.detach();
        Ok(())
    }

    /// Splits a text node at byte offset `at`, moving `[at..]` into a fresh
    /// text node inserted right after it. Returns the node that now starts at
    /// `at` (the original node when `at == 0`).
    ///
    /// The flattened text of any ancestor is unchanged by this operation.
    pub fn split_text(&mut self, id: NodeId, at: usize) -> Result<NodeId, DomError> {
        let text = match self.node(id).ok_or(DomError::NodeNotFound)? {
            NodeData::Text(t) => t.clone(),
            _ => return Err(DomError::NotText),
        };
        if at == 0 {
            return Ok(id);
        }
        if at >= text.len() || !text.is_char_boundary(at) {
            return Err(DomError::InvalidOffset {
                offset: at,
                len: text.len(),
            });
        }
        let tail = text[at..].to_string();
        if let Some(mut n) = self.tree.get_mut(id) {
            if let NodeData::Text(t) = n.value() {
                t.truncate(at);
            }
        }
        let tail_id = self.tree.orphan(NodeData::Text(tail)).id();
        self.insert_node_after(id, tail_id)?;
        Ok(tail_id)
    }

    /// Detached copy of an element's tag and attributes, with no children.
    pub fn clone_shell(&mut self, id: NodeId) -> Result<NodeId, DomError> {
        let el = self
            .node(id)
            .ok_or(DomError::NodeNotFound)?
            .as_element()
            .ok_or(DomError::NotElement)?
            .clone();
        Ok(self.tree.orphan(NodeData::Element(el)).id())
    }

    /// Joins runs of adjacent text-node children of `parent` into single
    /// nodes, detaching the absorbed ones. Empty text nodes are dropped.
    pub fn merge_adjacent_text(&mut self, parent: NodeId) -> Result<(), DomError> {
        let children = {
            let p = self.tree.get(parent).ok_or(DomError::NodeNotFound)?;
            p.children().map(|c| c.id()).collect::<Vec<_>>()
        };
        let mut head: Option<NodeId> = None;
        for id in children {
            if !self.is_text(id) {
                head = None;
                continue;
            }
            if self.text_len(id) == Some(0) {
                self.detach(id)?;
                continue;
            }
            match head {
                None => head = Some(id),
                Some(keep) => {
                    let mut absorbed = String::new();
                    if let Some(mut n) = self.tree.get_mut(id) {
                        if let NodeData::Text(t) = n.value() {
                            absorbed = std::mem::take(t);
                        }
                    }
                    if let Some(mut n) = self.tree.get_mut(keep) {
                        if let NodeData::Text(t) = n.value() {
                            t.push_str(&absorbed);
                        }
                    }
                    self.detach(id)?;
                }
            }
        }
        Ok(())
    }
}
