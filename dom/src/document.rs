//! Arena-backed element tree.
//!
//! Removing a single node detaches it (and its subtree) from the tree, mirroring
//! how a removed DOM element stays usable by whoever holds it. Clearing a node's
//! children or replacing its content frees the old subtrees instead; their slots
//! are handed out again by [`Document::create_element`], so ids of cleared nodes
//! must not be kept. Lookups by id or tag only see nodes reachable from the root.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::{DomError, DomResult, Markup, escape_html};

const VOID_ELEMENTS: &[&str] = &["area", "br", "col", "embed", "hr", "img", "input", "wbr"];

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Content {
    #[default]
    Empty,
    Text(String),
    Markup(Markup),
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    content: Content,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            content: Content::Empty,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document whose root is an empty `body` element.
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::new("body"))],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(DomError::NodeNotFound { id })
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(DomError::NodeNotFound { id })
    }

    /// Creates a detached element, reusing a freed slot when one is available.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let node = Some(Node::new(tag));
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                NodeId(slot)
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Frees `id` and everything below it.
    fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                pending.extend(node.children);
                self.free.push(next.0);
            }
        }
    }

    pub fn tag(&self, id: NodeId) -> DomResult<&str> {
        Ok(self.node(id)?.tag.as_str())
    }

    pub fn element_id(&self, id: NodeId) -> DomResult<Option<&str>> {
        Ok(self.node(id)?.id.as_deref())
    }

    /// Assigns the element id. Fails if another attached node already uses it.
    pub fn set_id(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        if self.get_element_by_id(value).is_some_and(|existing| existing != id) {
            return Err(DomError::DuplicateId {
                id: value.to_owned(),
            });
        }
        self.node_mut(id)?.id = Some(value.to_owned());
        Ok(())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> DomResult<Option<&str>> {
        Ok(self.node(id)?.attributes.get(name).map(String::as_str))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.node_mut(id)?
            .attributes
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    /// Replaces all children with a single text run, like `textContent = ...`.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        self.replace_content(id, Content::Text(text.to_owned()))
    }

    /// Appends to the current text content, like `textContent += ...`.
    pub fn append_text(&mut self, id: NodeId, suffix: &str) -> DomResult<()> {
        let mut text = self.text_content(id)?;
        text.push_str(suffix);
        self.set_text(id, &text)
    }

    /// Replaces all children with pre-escaped markup.
    pub fn set_markup(&mut self, id: NodeId, markup: Markup) -> DomResult<()> {
        self.replace_content(id, Content::Markup(markup))
    }

    fn replace_content(&mut self, id: NodeId, content: Content) -> DomResult<()> {
        self.clear_children(id)?;
        self.node_mut(id)?.content = content;
        Ok(())
    }

    /// Concatenated text of the node and its descendants.
    ///
    /// Markup content is returned as-is, entities included.
    pub fn text_content(&self, id: NodeId) -> DomResult<String> {
        let mut out = String::new();
        self.collect_text(id, &mut out)?;
        Ok(out)
    }

    fn collect_text(&self, id: NodeId, out: &mut String) -> DomResult<()> {
        let node = self.node(id)?;
        match &node.content {
            Content::Empty => {}
            Content::Text(text) => out.push_str(text),
            Content::Markup(markup) => out.push_str(markup.as_str()),
        }
        for child in &node.children {
            self.collect_text(*child, out)?;
        }
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> DomResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> DomResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> DomResult<bool> {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return Ok(true);
            }
            current = self.node(id)?.parent;
        }
        Ok(false)
    }

    fn detach(&mut self, child: NodeId) -> DomResult<()> {
        if let Some(parent) = self.node(child)?.parent {
            self.node_mut(parent)?.children.retain(|c| *c != child);
            self.node_mut(child)?.parent = None;
        }
        Ok(())
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(child)?;
        if self.is_ancestor_or_self(child, parent)? {
            return Err(DomError::Hierarchy { parent, child });
        }
        Ok(())
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check_insertable(parent, child)?;
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Inserts `node` as the next sibling of `reference`.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> DomResult<()> {
        let parent = self
            .node(reference)?
            .parent
            .ok_or_else(|| DomError::detached(reference, "insert_after"))?;
        if reference == node {
            return Ok(());
        }
        self.check_insertable(parent, node)?;
        self.detach(node)?;
        let siblings = &mut self.node_mut(parent)?.children;
        let position = siblings
            .iter()
            .position(|c| *c == reference)
            .map_or(siblings.len(), |index| index + 1);
        siblings.insert(position, node);
        self.node_mut(node)?.parent = Some(parent);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    /// Frees every child subtree and drops the node's own content.
    pub fn clear_children(&mut self, id: NodeId) -> DomResult<()> {
        let node = self.node_mut(id)?;
        let children = std::mem::take(&mut node.children);
        node.content = Content::Empty;
        for child in children {
            self.release(child);
        }
        Ok(())
    }

    fn walk(&self, from: NodeId, visit: &mut impl FnMut(NodeId, &Node) -> bool) -> DomResult<bool> {
        let node = self.node(from)?;
        if visit(from, node) {
            return Ok(true);
        }
        for child in &node.children {
            if self.walk(*child, visit)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn get_element_by_id(&self, value: &str) -> Option<NodeId> {
        let mut found = None;
        let walked = self.walk(self.root, &mut |id, node| {
            if node.id.as_deref() == Some(value) {
                found = Some(id);
                true
            } else {
                false
            }
        });
        walked.ok().and(found)
    }

    /// First descendant of `from` (excluding itself) with the given tag, in document order.
    pub fn first_descendant_by_tag(&self, from: NodeId, tag: &str) -> DomResult<Option<NodeId>> {
        let tag = tag.to_ascii_lowercase();
        let mut found = None;
        self.walk(from, &mut |id, node| {
            if id != from && node.tag == tag {
                found = Some(id);
                true
            } else {
                false
            }
        })?;
        Ok(found)
    }

    pub fn descendants_by_tag(&self, from: NodeId, tag: &str) -> DomResult<Vec<NodeId>> {
        let tag = tag.to_ascii_lowercase();
        let mut found = Vec::new();
        self.walk(from, &mut |id, node| {
            if id != from && node.tag == tag {
                found.push(id);
            }
            false
        })?;
        Ok(found)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> DomResult<bool> {
        Ok(self.node(id)?.classes.iter().any(|c| c == class))
    }

    /// Toggles `class`, or forces it on/off when `force` is given.
    ///
    /// Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, id: NodeId, class: &str, force: Option<bool>) -> DomResult<bool> {
        let node = self.node_mut(id)?;
        let present = node.classes.iter().any(|c| c == class);
        let wanted = force.unwrap_or(!present);
        if wanted && !present {
            node.classes.push(class.to_owned());
        } else if !wanted && present {
            node.classes.retain(|c| c != class);
        }
        Ok(wanted)
    }

    /// Serializes the whole document, root element included.
    pub fn to_html(&self) -> String {
        self.outer_html(self.root).unwrap_or_default()
    }

    pub fn outer_html(&self, id: NodeId) -> DomResult<String> {
        let mut out = String::new();
        self.write_html(id, &mut out)?;
        Ok(out)
    }

    fn write_html(&self, id: NodeId, out: &mut String) -> DomResult<()> {
        let node = self.node(id)?;
        out.push('<');
        out.push_str(&node.tag);
        if let Some(element_id) = &node.id {
            out.push_str(&format!(" id=\"{}\"", escape_html(element_id)));
        }
        if !node.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_html(&node.classes.join(" "))));
        }
        for (name, value) in &node.attributes {
            out.push_str(&format!(" {name}=\"{}\"", escape_html(value)));
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&node.tag.as_str()) {
            return Ok(());
        }
        match &node.content {
            Content::Empty => {}
            Content::Text(text) => out.push_str(&escape_html(text)),
            Content::Markup(markup) => out.push_str(markup.as_str()),
        }
        for child in &node.children {
            self.write_html(*child, out)?;
        }
        out.push_str(&format!("</{}>", node.tag));
        Ok(())
    }
}

/// Thread-safe handle shared by the page, the table surface and event handlers.
///
/// Critical sections are short and never span an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument(Arc<Mutex<Document>>);

impl SharedDocument {
    pub fn new(document: Document) -> Self {
        Self(Arc::new(Mutex::new(document)))
    }

    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        let guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn to_html(&self) -> String {
        self.read(Document::to_html)
    }
}
