//! Element arena.
//!
//! Elements live in slots addressed by [`ElementId`] (index + generation).
//! Freed slots go to a pool and are reused; the generation bump makes stale
//! ids miss instead of aliasing a new element.

use std::fmt;

use super::Element;
use crate::error::{Error, Result};

/// Handle to an element in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    pub const fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug)]
struct Node {
    element: Element,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owns every element and the parent/child links between them.
///
/// Invariants: a node has at most one parent, links are acyclic, and a
/// removed node takes its whole subtree with it.
#[derive(Debug, Default)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Add a detached element.
    pub fn insert(&mut self, element: Element) -> ElementId {
        let node = Node {
            element,
            parent: None,
            children: Vec::new(),
        };
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return ElementId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        ElementId {
            index,
            generation: 0,
        }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children in draw order (empty for unknown ids).
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Append `child` as the last child of `parent`.
    pub fn attach(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if !self.contains(parent) {
            return Err(Error::UnknownElement(parent));
        }
        let Some(node) = self.node(child) else {
            return Err(Error::UnknownElement(child));
        };
        if parent == child || node.parent.is_some() || self.is_ancestor(child, parent) {
            return Err(Error::InvalidAttach { parent, child });
        }

        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Unlink `id` from its parent, keeping its subtree intact.
    pub fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.node_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != id);
        }
    }

    /// Detach and destroy `id` and its whole subtree.
    ///
    /// Returns the ids that were destroyed, `id` first.
    pub fn remove(&mut self, id: ElementId) -> Vec<ElementId> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.detach(id);

        let removed = self.pre_order(id);
        for &gone in &removed {
            let slot = &mut self.slots[gone.index()];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(gone.index);
            self.len -= 1;
        }
        removed
    }

    /// `root` followed by its descendants, depth first, children in order.
    pub fn pre_order(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        if !self.contains(root) {
            return out;
        }

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Whether `id` is reachable from `root` through non-hidden elements.
    pub fn is_visible_from(&self, root: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            match self.get(cur) {
                Some(element) if !element.hidden => {}
                _ => return false,
            }
            if cur == root {
                return true;
            }
            current = self.parent(cur);
        }
        false
    }
}
