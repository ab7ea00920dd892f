//! Live named collections.
//!
//! A `LiveCollection` behaves like the host engine's domain object
//! containers: subscribers registered with [`LiveCollection::subscribe`]
//! are called for every element already present and for every element
//! inserted later. Hooks receive a mutable reference to the owner `C`
//! (usually the `Project`) so they can wire other parts of the model.
//!
//! The collection only stores hooks; dispatching them is done by the owner
//! through [`dispatch`], because the owner has to release its borrow of the
//! collection before hooks can mutate it.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::util::errors::{ModelError, ModelResult};

/// Something stored in a live collection.
pub trait Named {
    /// Unique name within the collection.
    fn name(&self) -> &str;
}

/// A subscriber callback.
pub type Hook<C> = Rc<dyn Fn(&mut C, &str) -> ModelResult<()>>;

/// An insertion-ordered named collection with live subscribers.
pub struct LiveCollection<T, C> {
    kind: &'static str,
    items: Vec<T>,
    index: HashMap<String, usize>,
    hooks: Vec<Hook<C>>,
}

impl<T: Named, C> LiveCollection<T, C> {
    /// Create an empty collection. `kind` names the element type in errors.
    pub fn new(kind: &'static str) -> Self {
        LiveCollection {
            kind,
            items: Vec::new(),
            index: HashMap::new(),
            hooks: Vec::new(),
        }
    }

    /// Insert an element, failing if the name is already taken.
    ///
    /// The caller is responsible for running [`hooks`](Self::hooks) for the
    /// new element afterwards.
    pub fn insert(&mut self, item: T) -> ModelResult<()> {
        let name = item.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ModelError::NamingConflict {
                kind: self.kind,
                name,
            });
        }
        self.index.insert(name, self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Register a hook. Returns the names present at registration time,
    /// which the caller must dispatch the new hook for.
    pub fn subscribe(&mut self, hook: Hook<C>) -> Vec<String> {
        self.hooks.push(hook);
        self.names()
    }

    /// Snapshot of the registered hooks.
    pub fn hooks(&self) -> Vec<Hook<C>> {
        self.hooks.clone()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.items[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.items[i]),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|i| i.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The element kind used in error messages.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<T: fmt::Debug, C> fmt::Debug for LiveCollection<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveCollection")
            .field("kind", &self.kind)
            .field("items", &self.items)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Run `hooks` for every name in `names`, in order, stopping at the first error.
pub fn dispatch<C>(ctx: &mut C, hooks: &[Hook<C>], names: &[String]) -> ModelResult<()> {
    for name in names {
        for hook in hooks {
            hook(ctx, name)?;
        }
    }
    Ok(())
}
