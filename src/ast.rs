//! SVG document tree
//!
//! Nodes live in an arena owned by the [`Document`] and link to each other by
//! [`NodeId`]. Detaching a node only unlinks it; the slot stays in the arena
//! until the document is dropped.

/// Index of a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    fn index(self) -> usize {
        self.0
    }
}

/// A parsed SVG document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

/// A slot in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    pub kind: NodeKind,
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
}

/// An SVG/XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element name with optional prefix (e.g. "svg", "sodipodi:namedview")
    pub name: QName,
    /// Attributes in document order, names unique
    pub attributes: Vec<Attribute>,
}

/// A qualified name (possibly with namespace prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace prefix (e.g., "svg", "xlink")
    pub prefix: Option<String>,
    /// Local name (e.g., "rect", "href")
    pub local: String,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }

    /// Parse a qualified name from a string like "prefix:local" or just "local".
    pub fn parse(s: &str) -> Self {
        if let Some((prefix, local)) = s.split_once(':') {
            Self::with_prefix(prefix, local)
        } else {
            Self::new(s)
        }
    }

    /// Check if this is a namespace declaration (xmlns or xmlns:prefix).
    pub fn is_xmlns(&self) -> bool {
        self.prefix.as_deref() == Some("xmlns") || (self.prefix.is_none() && self.local == "xmlns")
    }

    /// Get the full name as a string.
    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local),
            None => self.local.clone(),
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl AsRef<str>, value: impl Into<String>) -> Self {
        Self {
            name: QName::parse(name.as_ref()),
            value: value.into(),
        }
    }
}

impl Element {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: QName::parse(name.as_ref()),
            attributes: Vec::new(),
        }
    }

    /// Get an attribute value by its full name (`"fill"`, `"xlink:href"`).
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.full_name() == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute value, appending it if it is not there yet.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name.full_name() == name) {
            attr.value = value.into();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }

    /// Remove an attribute by its full name.
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|a| a.name.full_name() != name);
    }

    /// Check if this element has a specific local name and no prefix.
    pub fn is(&self, name: &str) -> bool {
        self.name.prefix.is_none() && self.name.local == name
    }
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            kind,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }
}

impl Document {
    /// Create a document holding only `root`.
    pub fn new(root: Element) -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Element(root))],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The root element. `None` only if a caller replaced the root's kind.
    pub fn root_element(&self) -> Option<&Element> {
        self.element(self.root)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Append a new node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(kind);
        node.parent = Some(parent);
        node.prev_sibling = self.node(parent).last_child;
        self.nodes.push(node);

        match self.node(parent).last_child {
            Some(last) => self.node_mut(last).next_sibling = Some(id),
            None => self.node_mut(parent).first_child = Some(id),
        }
        self.node_mut(parent).last_child = Some(id);
        id
    }

    /// Unlink `id` (and its subtree) from its parent. The root cannot be detached.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        let prev = self.node(id).prev_sibling;
        let next = self.node(id).next_sibling;

        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }

        let node = self.node_mut(id);
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Whether `id` is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Direct children of `id`, in order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// `id` and all its descendants, in document (pre-)order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            start: id,
            next: Some(id),
        }
    }

    /// Ids of every attached element, in document order.
    pub fn element_ids(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .filter(|&id| self.element(id).is_some())
            .collect()
    }

    /// Whether any ancestor of `id` is an element with the given local name.
    pub fn has_ancestor(&self, id: NodeId, name: &str) -> bool {
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            if self.element(parent).is_some_and(|e| e.is(name)) {
                return true;
            }
            current = self.node(parent).parent;
        }
        false
    }

    /// Concatenated text and CDATA content beneath `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            match &self.node(node).kind {
                NodeKind::Text(t) | NodeKind::CData(t) => out.push_str(t),
                NodeKind::Element(_) | NodeKind::Comment(_) => {}
            }
        }
        out
    }
}

pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.node(id).next_sibling;
        Some(id)
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    start: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        let node = self.doc.node(id);

        self.next = if let Some(child) = node.first_child {
            Some(child)
        } else {
            // Climb until an ancestor (below `start`) has a next sibling.
            let mut current = id;
            loop {
                if current == self.start {
                    break None;
                }
                let n = self.doc.node(current);
                if let Some(sibling) = n.next_sibling {
                    break Some(sibling);
                }
                match n.parent {
                    Some(parent) => current = parent,
                    None => break None,
                }
            }
        };
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new(Element::new("svg"));
        let root = doc.root();
        let g = doc.append(root, NodeKind::Element(Element::new("g")));
        let a = doc.append(g, NodeKind::Element(Element::new("rect")));
        let b = doc.append(root, NodeKind::Element(Element::new("circle")));
        (doc, g, a, b)
    }

    #[test]
    fn test_descendants_preorder() {
        let (doc, g, a, b) = sample();
        let order: Vec<_> = doc.descendants(doc.root()).collect();
        assert_eq!(order, vec![doc.root(), g, a, b]);

        let sub: Vec<_> = doc.descendants(g).collect();
        assert_eq!(sub, vec![g, a]);
    }

    #[test]
    fn test_detach_unlinks_subtree() {
        let (mut doc, g, a, b) = sample();
        doc.detach(g);
        assert!(!doc.is_attached(g));
        assert!(!doc.is_attached(a));
        assert!(doc.is_attached(b));
        let children: Vec<_> = doc.children(doc.root()).collect();
        assert_eq!(children, vec![b]);
        assert_eq!(doc.element_ids().len(), 2);
    }

    #[test]
    fn test_detach_middle_sibling() {
        let mut doc = Document::new(Element::new("svg"));
        let root = doc.root();
        let ids: Vec<_> = (0..3)
            .map(|_| doc.append(root, NodeKind::Element(Element::new("path"))))
            .collect();
        doc.detach(ids[1]);
        let children: Vec<_> = doc.children(root).collect();
        assert_eq!(children, vec![ids[0], ids[2]]);

        // Appending after a detach keeps the sibling chain intact.
        let d = doc.append(root, NodeKind::Text("x".into()));
        let children: Vec<_> = doc.children(root).collect();
        assert_eq!(children, vec![ids[0], ids[2], d]);
    }

    #[test]
    fn test_attrs() {
        let mut e = Element::new("use");
        e.set_attr("xlink:href", "#a");
        e.set_attr("fill", "red");
        e.set_attr("fill", "blue");
        assert_eq!(e.get_attr("xlink:href"), Some("#a"));
        assert_eq!(e.get_attr("fill"), Some("blue"));
        assert_eq!(e.attributes.len(), 2);
        e.remove_attr("fill");
        assert_eq!(e.get_attr("fill"), None);
    }
}
