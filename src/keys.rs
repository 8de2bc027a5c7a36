//! Key bindings - names to handlers.
//!
//! A binding maps one or more key names (`"enter"`, `["escape", "q", "C-c"]`)
//! to a handler. Elements and the screen each keep an ordered [`Bindings`]
//! list; the router in [`crate::screen`] decides which ones run.
//!
//! Handlers receive the screen explicitly, so they can mutate the tree,
//! move focus and render without any global state:
//!
//! ```ignore
//! screen.key(["escape", "q", "C-c"], |screen, _key| {
//!     screen.exit(0);
//!     Ok(())
//! });
//! ```

use std::fmt;

use crate::error::Result;
use crate::input::KeyEvent;
use crate::screen::Screen;

// =============================================================================
// TYPES
// =============================================================================

/// Handler invoked when a bound key arrives.
pub type KeyHandler = Box<dyn FnMut(&mut Screen, &KeyEvent) -> Result<()>>;

/// One key name or a list of aliases.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyNames(Vec<String>);

impl KeyNames {
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for KeyNames {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for KeyNames {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl<const N: usize> From<[&str; N]> for KeyNames {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<&[&str]> for KeyNames {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<&str>> for KeyNames {
    fn from(names: Vec<&str>) -> Self {
        Self::from(names.as_slice())
    }
}

impl From<Vec<String>> for KeyNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

/// Identifies a binding within one [`Bindings`] list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

struct Binding {
    id: BindingId,
    names: KeyNames,
    /// `None` while the handler is running.
    handler: Option<KeyHandler>,
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Ordered key bindings.
///
/// Handlers are taken out while they run and put back afterwards, so a
/// handler can freely borrow the screen that owns it. A handler that
/// removes its own binding is simply dropped on return.
#[derive(Default)]
pub struct Bindings {
    entries: Vec<Binding>,
    next_id: u64,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `names`. Later bindings run after earlier ones.
    pub fn add(&mut self, names: KeyNames, handler: KeyHandler) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.entries.push(Binding {
            id,
            names,
            handler: Some(handler),
        });
        id
    }

    /// Remove `names` from every binding, dropping bindings left with none.
    pub fn remove_names(&mut self, names: &KeyNames) {
        for binding in &mut self.entries {
            binding.names.0.retain(|n| !names.contains(n));
        }
        self.entries.retain(|b| !b.names.is_empty());
    }

    /// First binding (in registration order) that answers to `name`.
    pub fn first_match(&self, name: &str) -> Option<BindingId> {
        self.entries
            .iter()
            .find(|b| b.handler.is_some() && b.names.contains(name))
            .map(|b| b.id)
    }

    /// Every binding that answers to `name`, each listed once.
    pub fn matches(&self, name: &str) -> Vec<BindingId> {
        self.entries
            .iter()
            .filter(|b| b.handler.is_some() && b.names.contains(name))
            .map(|b| b.id)
            .collect()
    }

    /// Take a handler out for invocation.
    pub fn take(&mut self, id: BindingId) -> Option<KeyHandler> {
        self.entries
            .iter_mut()
            .find(|b| b.id == id)
            .and_then(|b| b.handler.take())
    }

    /// Put a handler back after invocation.
    ///
    /// If the binding was removed in the meantime the handler is dropped.
    pub fn restore(&mut self, id: BindingId, handler: KeyHandler) {
        if let Some(binding) = self.entries.iter_mut().find(|b| b.id == id) {
            if binding.handler.is_none() {
                binding.handler = Some(handler);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|b| &b.names.0))
            .finish()
    }
}
