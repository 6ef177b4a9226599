//! file: core/src/lower/scope.rs
//! description: hierarchical symbol table with hygienic name allocation.
//!
//! Every scope of one compilation shares a single registry of used target
//! names, so a name handed out anywhere in the tree is never handed out
//! again, even after the scope that allocated it is gone. Scopes only link
//! to their parent; lookups walk outward and never fail loudly.
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use log::trace;

/// One source binding as seen by the lowering core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    pub source_name: String,
    pub target_name: String,
    pub mutable: bool,
}

#[derive(Debug)]
pub struct Scope {
    parent: Option<Rc<Scope>>,
    entries: RefCell<HashMap<String, ScopeEntry>>,
    used_names: Rc<RefCell<BTreeSet<String>>>,
    namespace: Option<String>,
}

impl Scope {
    /// Creates a root scope whose registry already holds `reserved`.
    pub fn root<'n>(reserved: impl IntoIterator<Item = &'n str>) -> Rc<Scope> {
        let used = reserved.into_iter().map(str::to_string).collect();
        Rc::new(Scope {
            parent: None,
            entries: RefCell::new(HashMap::new()),
            used_names: Rc::new(RefCell::new(used)),
            namespace: None,
        })
    }

    pub fn child(self: &Rc<Self>) -> Rc<Scope> {
        Rc::new(Scope {
            parent: Some(Rc::clone(self)),
            entries: RefCell::new(HashMap::new()),
            used_names: Rc::clone(&self.used_names),
            namespace: None,
        })
    }

    /// A child scope whose definitions are published to the parent under
    /// `"<name>:<member>"` and aliased locally under the bare member name.
    pub fn namespace(self: &Rc<Self>, name: &str) -> Rc<Scope> {
        Rc::new(Scope {
            parent: Some(Rc::clone(self)),
            entries: RefCell::new(HashMap::new()),
            used_names: Rc::clone(&self.used_names),
            namespace: Some(name.to_string()),
        })
    }

    pub fn namespace_name(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Reserves and returns a fresh identifier derived from `hint`.
    ///
    /// Characters outside `[0-9A-Za-z]` become `_`. The bare form is tried
    /// first, then `hint1`, `hint2`, ... until an unused name is found.
    pub fn new_id(&self, hint: &str) -> String {
        let escaped: String = hint
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let mut used = self.used_names.borrow_mut();
        let mut count = 0usize;
        let name = loop {
            let candidate = if count == 0 {
                escaped.clone()
            } else {
                format!("{}{}", escaped, count)
            };
            if !used.contains(&candidate) {
                break candidate;
            }
            count += 1;
        };
        used.insert(name.clone());
        trace!("allocated target name '{}' for '{}'", name, hint);
        name
    }

    /// Binds `name` in this scope, shadowing any outer binding of the same name.
    pub fn define(&self, name: &str, mutable: bool) -> String {
        if let (Some(ns), Some(parent)) = (&self.namespace, &self.parent) {
            // Namespace members are always immutable.
            let target_name = parent.define(&format!("{}:{}", ns, name), false);
            self.insert(name, &target_name, false);
            return target_name;
        }
        let target_name = self.new_id(name);
        self.insert(name, &target_name, mutable);
        target_name
    }

    fn insert(&self, name: &str, target_name: &str, mutable: bool) {
        self.entries.borrow_mut().insert(
            name.to_string(),
            ScopeEntry {
                source_name: name.to_string(),
                target_name: target_name.to_string(),
                mutable,
            },
        );
    }

    /// Resolves `name` in this scope or the nearest enclosing one.
    pub fn lookup(&self, name: &str) -> Option<ScopeEntry> {
        if let Some(entry) = self.entries.borrow().get(name) {
            return Some(entry.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Every target name reserved so far in this scope tree, sorted.
    pub fn used_names(&self) -> Vec<String> {
        self.used_names.borrow().iter().cloned().collect()
    }

    /// Bindings declared directly in this scope, sorted by source name.
    pub fn local_entries(&self) -> Vec<ScopeEntry> {
        let mut entries: Vec<_> = self.entries.borrow().values().cloned().collect();
        entries.sort_by(|a, b| a.source_name.cmp(&b.source_name));
        entries
    }
}
