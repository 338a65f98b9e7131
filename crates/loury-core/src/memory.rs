#![forbid(unsafe_code)]

//! In-memory document for headless hosts and tests.
//!
//! [`MemoryDocument`] keeps a small node tree behind a shared `RefCell`.
//! Every [`MemoryElement`] handle is just an id plus a reference to that tree,
//! so handles are cheap to create and stay valid after the node is detached:
//! reads keep returning the last written state, which is what tests want to
//! assert on.
//!
//! The tree counts live handles per node. When the last handle to a detached
//! node drops, that node and every descendant nobody holds are pruned;
//! descendants that still have a handle become detached roots instead.
//!
//! Each style or content write bumps a per-node counter
//! ([`MemoryElement::write_count`]) so callers can prove that a cancelled or
//! finished transition stopped touching the element.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::element::{
    Display, Document, Element, ElementId, ElementRef, Elevation, Rect, Transform,
};

#[derive(Debug, Clone)]
struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    opacity: f32,
    transform: Transform,
    display: Display,
    elevation: Elevation,
    bounds: Rect,
    geometry: Option<Rect>,
    writes: u64,
}

impl Node {
    fn new(classes: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            classes: classes.split_whitespace().map(str::to_owned).collect(),
            attributes: BTreeMap::new(),
            text: String::new(),
            opacity: 1.0,
            transform: Transform::None,
            display: Display::Block,
            elevation: Elevation::Flat,
            bounds: Rect::default(),
            geometry: None,
            writes: 0,
        }
    }
}

#[derive(Debug)]
struct Tree {
    nodes: HashMap<ElementId, Node>,
    next_id: u64,
    body: ElementId,
    handles: HashMap<ElementId, usize>,
}

impl Tree {
    fn new() -> Self {
        let body = ElementId(0);
        let mut nodes = HashMap::new();
        nodes.insert(body, Node::new("body"));
        Self {
            nodes,
            next_id: 1,
            body,
            handles: HashMap::new(),
        }
    }

    fn insert(&mut self, classes: &str) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(classes));
        id
    }

    fn detach(&mut self, id: ElementId) {
        let parent = self.nodes.get_mut(&id).and_then(|n| n.parent.take());
        if let Some(p) = parent.and_then(|parent| self.nodes.get_mut(&parent)) {
            p.children.retain(|c| *c != id);
        }
    }

    fn release(&mut self, id: ElementId) {
        let Some(count) = self.handles.get_mut(&id) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.handles.remove(&id);
            self.prune(id);
        }
    }

    /// Remove `id` if it is an unheld detached root, then repeat for its
    /// children.
    fn prune(&mut self, id: ElementId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if id == self.body || self.handles.contains_key(&id) {
                continue;
            }
            if !self.nodes.get(&id).is_some_and(|n| n.parent.is_none()) {
                continue;
            }
            let Some(node) = self.nodes.remove(&id) else {
                continue;
            };
            for child in node.children {
                if let Some(c) = self.nodes.get_mut(&child) {
                    c.parent = None;
                }
                pending.push(child);
            }
        }
    }

    fn is_ancestor_or_self(&self, ancestor: ElementId, mut id: ElementId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.nodes.get(&id).and_then(|n| n.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }
}

/// In-memory [`Document`] implementation.
#[derive(Clone)]
pub struct MemoryDocument {
    tree: Rc<RefCell<Tree>>,
}

impl MemoryDocument {
    /// Create a document holding only an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Rc::new(RefCell::new(Tree::new())),
        }
    }

    /// Create a detached element and return its concrete handle.
    #[must_use]
    pub fn create(&self, classes: &str) -> Rc<MemoryElement> {
        let id = self.tree.borrow_mut().insert(classes);
        Rc::new(MemoryElement::bind(&self.tree, id))
    }

    /// Create an element and append it straight to the body.
    #[must_use]
    pub fn create_in_body(&self, classes: &str) -> Rc<MemoryElement> {
        let el = self.create(classes);
        let handle: ElementRef = el.clone();
        self.body().append_child(&handle);
        el
    }

    /// Concrete handle for an existing id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<Rc<MemoryElement>> {
        let exists = self.tree.borrow().nodes.contains_key(&id);
        exists.then(|| Rc::new(MemoryElement::bind(&self.tree, id)))
    }

    /// Connected elements carrying `class`, in document order.
    #[must_use]
    pub fn query_all(&self, class: &str) -> Vec<Rc<MemoryElement>> {
        let mut ids = Vec::new();
        {
            let tree = self.tree.borrow();
            let mut stack = vec![tree.body];
            while let Some(id) = stack.pop() {
                let Some(node) = tree.nodes.get(&id) else {
                    continue;
                };
                if node.classes.contains(class) {
                    ids.push(id);
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
        ids.into_iter()
            .map(|id| Rc::new(MemoryElement::bind(&self.tree, id)))
            .collect()
    }

    /// First connected element carrying `class`.
    #[must_use]
    pub fn query(&self, class: &str) -> Option<Rc<MemoryElement>> {
        self.query_all(class).into_iter().next()
    }

    /// Number of nodes the tree still stores, body included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.borrow().nodes.len()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.tree.borrow().nodes.len();
        f.debug_struct("MemoryDocument")
            .field("nodes", &count)
            .finish()
    }
}

impl Document for MemoryDocument {
    fn create_element(&self, classes: &str) -> ElementRef {
        self.create(classes)
    }

    fn body(&self) -> ElementRef {
        let body = self.tree.borrow().body;
        Rc::new(MemoryElement::bind(&self.tree, body))
    }
}

/// Handle to one node of a [`MemoryDocument`].
pub struct MemoryElement {
    id: ElementId,
    tree: Rc<RefCell<Tree>>,
}

impl MemoryElement {
    fn bind(tree: &Rc<RefCell<Tree>>, id: ElementId) -> Self {
        *tree.borrow_mut().handles.entry(id).or_insert(0) += 1;
        Self {
            id,
            tree: Rc::clone(tree),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Node) -> T) -> Option<T> {
        self.tree.borrow().nodes.get(&self.id).map(f)
    }

    fn write(&self, f: impl FnOnce(&mut Node)) {
        if let Some(node) = self.tree.borrow_mut().nodes.get_mut(&self.id) {
            f(node);
            node.writes += 1;
        }
    }

    /// Number of style/content writes performed on this node.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.read(|n| n.writes).unwrap_or(0)
    }

    /// Set the bounding box reported by [`Element::bounds`].
    pub fn set_bounds(&self, rect: Rect) {
        if let Some(node) = self.tree.borrow_mut().nodes.get_mut(&self.id) {
            node.bounds = rect;
        }
    }

    /// Last geometry written through [`Element::set_geometry`].
    #[must_use]
    pub fn geometry(&self) -> Option<Rect> {
        self.read(|n| n.geometry).flatten()
    }

    /// Current drop-shadow level.
    #[must_use]
    pub fn elevation(&self) -> Elevation {
        self.read(|n| n.elevation).unwrap_or_default()
    }

    /// Child ids in insertion order.
    #[must_use]
    pub fn child_ids(&self) -> Vec<ElementId> {
        self.read(|n| n.children.clone()).unwrap_or_default()
    }

    /// Parent id, if attached.
    #[must_use]
    pub fn parent_id(&self) -> Option<ElementId> {
        self.read(|n| n.parent).flatten()
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let classes = self
            .read(|n| n.classes.iter().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        f.debug_struct("MemoryElement")
            .field("id", &self.id)
            .field("classes", &classes)
            .finish()
    }
}

impl Drop for MemoryElement {
    fn drop(&mut self) {
        // A handle dropped mid-borrow keeps its node; nothing else is lost.
        if let Ok(mut tree) = self.tree.try_borrow_mut() {
            tree.release(self.id);
        }
    }
}

impl Element for MemoryElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn is_connected(&self) -> bool {
        let tree = self.tree.borrow();
        tree.is_ancestor_or_self(tree.body, self.id)
    }

    fn contains(&self, other: ElementId) -> bool {
        self.tree.borrow().is_ancestor_or_self(self.id, other)
    }

    fn bounds(&self) -> Rect {
        self.read(|n| n.bounds).unwrap_or_default()
    }

    fn opacity(&self) -> f32 {
        self.read(|n| n.opacity).unwrap_or(1.0)
    }

    fn set_opacity(&self, opacity: f32) {
        self.write(|n| n.opacity = opacity.clamp(0.0, 1.0));
    }

    fn transform(&self) -> Transform {
        self.read(|n| n.transform).unwrap_or_default()
    }

    fn set_transform(&self, transform: Transform) {
        self.write(|n| n.transform = transform);
    }

    fn display(&self) -> Display {
        self.read(|n| n.display).unwrap_or_default()
    }

    fn set_display(&self, display: Display) {
        self.write(|n| n.display = display);
    }

    fn set_elevation(&self, elevation: Elevation) {
        self.write(|n| n.elevation = elevation);
    }

    fn set_geometry(&self, rect: Rect) {
        self.write(|n| n.geometry = Some(rect));
    }

    fn text(&self) -> String {
        self.read(|n| n.text.clone()).unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.write(|n| {
            n.text.clear();
            n.text.push_str(text);
        });
    }

    fn push_char(&self, ch: char) {
        self.write(|n| n.text.push(ch));
    }

    fn add_class(&self, class: &str) {
        self.write(|n| {
            n.classes.insert(class.to_owned());
        });
    }

    fn remove_class(&self, class: &str) {
        self.write(|n| {
            n.classes.remove(class);
        });
    }

    fn has_class(&self, class: &str) -> bool {
        self.read(|n| n.classes.contains(class)).unwrap_or(false)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.write(|n| {
            n.attributes.insert(name.to_owned(), value.to_owned());
        });
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.read(|n| n.attributes.get(name).cloned()).flatten()
    }

    fn append_child(&self, child: &ElementRef) {
        let child_id = child.id();
        let mut tree = self.tree.borrow_mut();
        if child_id == self.id
            || !tree.nodes.contains_key(&child_id)
            || tree.is_ancestor_or_self(child_id, self.id)
        {
            return;
        }
        tree.detach(child_id);
        if let Some(node) = tree.nodes.get_mut(&child_id) {
            node.parent = Some(self.id);
        }
        if let Some(parent) = tree.nodes.get_mut(&self.id) {
            parent.children.push(child_id);
        }
    }

    fn remove(&self) {
        self.tree.borrow_mut().detach(self.id);
    }
}
