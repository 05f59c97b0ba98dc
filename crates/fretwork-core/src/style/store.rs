//! Hierarchical key/value style store.
//!
//! A [`StyleStore`] is a handle to one level of the style cascade. Each level
//! owns a set of local entries and points at an optional parent level; a
//! lookup checks the local entries first and otherwise delegates to the
//! parent, all the way up to the root.
//!
//! Handles are cheap to clone and share the same underlying level, which is
//! how a diagram and all of its elements reach the same parent node. Use
//! [`StyleStore::duplicate`] to obtain an independent level.
//!
//! ```
//! # use fretwork_core::style::StyleStore;
//! let defaults = StyleStore::new("defaults");
//! defaults.set("grid.linethickness", 2.0).unwrap();
//!
//! let diagram = StyleStore::with_parent("diagram", &defaults);
//! assert_eq!(diagram.get_double("grid.linethickness").unwrap(), 2.0);
//! assert!(!diagram.is_local("grid.linethickness"));
//!
//! diagram.set("grid.linethickness", 3.0).unwrap();
//! assert_eq!(diagram.get_double("grid.linethickness").unwrap(), 3.0);
//! ```

use std::{cell::RefCell, fmt, rc::Rc, str::FromStr};

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{color::Color, error::StyleError, style::StyleValue};

#[derive(Debug)]
struct StyleNode {
    level: String,
    entries: IndexMap<String, StyleValue>,
    parent: Option<StyleStore>,
    read_only: bool,
}

/// A shared handle to one level of the style cascade.
#[derive(Clone)]
pub struct StyleStore {
    node: Rc<RefCell<StyleNode>>,
}

impl StyleStore {
    /// Create a root level with no parent.
    pub fn new(level: impl Into<String>) -> Self {
        Self::from_node(level.into(), None)
    }

    /// Create a level whose lookups fall back to `parent`.
    pub fn with_parent(level: impl Into<String>, parent: &StyleStore) -> Self {
        Self::from_node(level.into(), Some(parent.clone()))
    }

    /// Create a root level holding `entries`.
    pub(crate) fn seeded(
        level: impl Into<String>,
        entries: impl IntoIterator<Item = (&'static str, StyleValue)>,
    ) -> Self {
        let store = Self::new(level);
        store.node.borrow_mut().entries.extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value)),
        );
        store
    }

    fn from_node(level: String, parent: Option<StyleStore>) -> Self {
        Self {
            node: Rc::new(RefCell::new(StyleNode {
                level,
                entries: IndexMap::new(),
                parent,
                read_only: false,
            })),
        }
    }

    /// Returns the name of this level (e.g. `"defaults"`, `"diagram"`).
    pub fn level(&self) -> String {
        self.node.borrow().level.clone()
    }

    /// Returns the parent level, if any.
    pub fn parent(&self) -> Option<StyleStore> {
        self.node.borrow().parent.clone()
    }

    /// Returns `true` if both handles refer to the same level.
    pub fn ptr_eq(&self, other: &StyleStore) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Returns `true` if this level rejects mutation.
    pub fn is_read_only(&self) -> bool {
        self.node.borrow().read_only
    }

    /// Lock this level against further mutation. There is no way back.
    pub fn mark_read_only(&self) {
        let mut node = self.node.borrow_mut();
        node.read_only = true;
        debug!(level = node.level.as_str(); "Style level marked read-only");
    }

    /// Resolve the first of `keys` present at a level, walking level by level.
    ///
    /// At each level every key is tried in order before moving on to the
    /// parent, so an earlier key only wins over a later one when both live at
    /// the same level.
    pub fn resolve_first(&self, keys: &[&str]) -> Option<StyleValue> {
        let mut current = Some(self.clone());
        while let Some(store) = current {
            let node = store.node.borrow();
            if let Some(value) = keys.iter().find_map(|key| node.entries.get(normalize_key(key))) {
                return Some(value.clone());
            }
            current = node.parent.clone();
        }
        None
    }

    /// Resolve `key` through the cascade.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::KeyNotFound`] if no level defines the key.
    pub fn get(&self, key: &str) -> Result<StyleValue, StyleError> {
        self.try_get(key)
            .ok_or_else(|| StyleError::KeyNotFound(normalize_key(key).to_string()))
    }

    /// Resolve `key` through the cascade, returning `None` if it is not defined.
    pub fn try_get(&self, key: &str) -> Option<StyleValue> {
        self.resolve_first(&[key])
    }

    /// Resolve `key`, falling back to `default` if no level defines it.
    pub fn get_or(&self, key: &str, default: impl Into<StyleValue>) -> StyleValue {
        self.try_get(key).unwrap_or_else(|| default.into())
    }

    /// Returns the value stored at this level only, ignoring ancestors.
    pub fn get_local(&self, key: &str) -> Option<StyleValue> {
        self.node.borrow().entries.get(normalize_key(key)).cloned()
    }

    /// Returns `true` if `key` is stored at this level, regardless of ancestors.
    pub fn is_local(&self, key: &str) -> bool {
        self.node.borrow().entries.contains_key(normalize_key(key))
    }

    /// Store `value` under `key` at this level.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidArgument`] for a blank key and
    /// [`StyleError::ReadOnly`] if this level is locked.
    pub fn set(&self, key: &str, value: impl Into<StyleValue>) -> Result<(), StyleError> {
        let key = normalize_key(key);
        if key.is_empty() {
            return Err(StyleError::InvalidArgument(
                "style key must not be blank".to_string(),
            ));
        }
        let mut node = self.writable()?;
        let value = value.into();
        trace!(level = node.level.as_str(), key, value:%; "Setting style value");
        node.entries.insert(key.to_string(), value);
        Ok(())
    }

    /// Remove `key` from this level, reverting to the inherited value.
    ///
    /// Returns `true` if the key was stored locally.
    pub fn clear(&self, key: &str) -> Result<bool, StyleError> {
        let mut node = self.writable()?;
        Ok(node.entries.shift_remove(normalize_key(key)).is_some())
    }

    /// Remove every local entry.
    pub fn clear_all(&self) -> Result<(), StyleError> {
        let mut node = self.writable()?;
        debug!(level = node.level.as_str(), count = node.entries.len(); "Clearing style level");
        node.entries.clear();
        Ok(())
    }

    /// Remove every local entry whose key starts with `prefix`.
    ///
    /// Returns the number of removed entries.
    pub fn clear_by_prefix(&self, prefix: &str) -> Result<usize, StyleError> {
        let prefix = normalize_key(prefix);
        let mut node = self.writable()?;
        let before = node.entries.len();
        node.entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - node.entries.len())
    }

    /// Move the local value of `key` up into the parent level.
    ///
    /// Afterwards `key` is no longer local here but still resolves to the same
    /// value through inheritance. A key that is not stored locally is left
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidArgument`] if this level has no parent and
    /// [`StyleError::ReadOnly`] if either level is locked.
    pub fn promote(&self, key: &str) -> Result<(), StyleError> {
        let parent = self.writable_parent()?;
        let Some(value) = self.get_local(key) else {
            return Ok(());
        };
        parent.set(key, value)?;
        self.clear(key)?;
        debug!(level = self.level(), key; "Promoted style value to parent level");
        Ok(())
    }

    /// Move every local entry up into the parent level.
    pub fn promote_all(&self) -> Result<(), StyleError> {
        let parent = self.writable_parent()?;
        parent.copy_from(self)?;
        self.clear_all()?;
        debug!(level = self.level(); "Promoted all style values to parent level");
        Ok(())
    }

    /// Merge all local entries of `other` into this level.
    pub fn copy_from(&self, other: &StyleStore) -> Result<(), StyleError> {
        let entries = other.local_entries();
        let mut node = self.writable()?;
        trace!(level = node.level.as_str(), count = entries.len(); "Copying style entries");
        node.entries.extend(entries);
        Ok(())
    }

    /// Create an independent level with the same name and parent and a copy
    /// of this level's local entries. The parent chain itself is shared, not
    /// copied.
    pub fn duplicate(&self) -> StyleStore {
        let node = self.node.borrow();
        let copy = Self::from_node(node.level.clone(), node.parent.clone());
        copy.node.borrow_mut().entries = node.entries.clone();
        copy
    }

    /// Create an independent copy of this level chained to `parent`.
    pub fn duplicate_with_parent(&self, parent: &StyleStore) -> StyleStore {
        let copy = Self::with_parent(self.level(), parent);
        copy.node.borrow_mut().entries = self.node.borrow().entries.clone();
        copy
    }

    /// Returns the local keys in insertion order.
    pub fn local_keys(&self) -> Vec<String> {
        self.node.borrow().entries.keys().cloned().collect()
    }

    /// Returns the local entries in insertion order.
    pub fn local_entries(&self) -> Vec<(String, StyleValue)> {
        self.node
            .borrow()
            .entries
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Returns `true` if this level has no local entries.
    pub fn is_empty(&self) -> bool {
        self.node.borrow().entries.is_empty()
    }

    /// Returns the local entries whose key starts with `prefix`.
    pub fn export_entries(&self, prefix: &str) -> Vec<(String, StyleValue)> {
        let prefix = normalize_key(prefix);
        self.node
            .borrow()
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Store a batch of entries at this level.
    ///
    /// The batch is validated up front and applied all at once.
    pub fn import_entries<I, K, V>(&self, entries: I) -> Result<(), StyleError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StyleValue>,
    {
        let entries: Vec<(String, StyleValue)> = entries
            .into_iter()
            .map(|(key, value)| {
                let key: String = key.into();
                (normalize_key(&key).to_string(), value.into())
            })
            .collect();
        if entries.iter().any(|(key, _)| key.is_empty()) {
            return Err(StyleError::InvalidArgument(
                "style key must not be blank".to_string(),
            ));
        }
        let mut node = self.writable()?;
        node.entries.extend(entries);
        Ok(())
    }

    /// Resolve `key` as text.
    pub fn get_string(&self, key: &str) -> Result<String, StyleError> {
        Ok(self.get(key)?.to_string())
    }

    /// Resolve `key` as an integer.
    pub fn get_int(&self, key: &str) -> Result<i64, StyleError> {
        self.get(key)?.to_int(key)
    }

    /// Resolve `key` as a floating point number.
    pub fn get_double(&self, key: &str) -> Result<f64, StyleError> {
        self.get(key)?.to_double(key)
    }

    /// Resolve `key` as a boolean.
    pub fn get_bool(&self, key: &str) -> Result<bool, StyleError> {
        self.get(key)?.to_bool(key)
    }

    /// Resolve `key` and parse it as an enum.
    pub fn get_enum<T>(&self, key: &str) -> Result<T, StyleError>
    where
        T: FromStr<Err = String>,
    {
        self.get(key)?.to_enum(key)
    }

    /// Resolve `key` and parse it as a normalized [`Color`].
    pub fn get_color(&self, key: &str) -> Result<Color, StyleError> {
        self.get(key)?.to_color()
    }

    fn writable(&self) -> Result<std::cell::RefMut<'_, StyleNode>, StyleError> {
        let node = self.node.borrow_mut();
        if node.read_only {
            return Err(StyleError::ReadOnly(node.level.clone()));
        }
        Ok(node)
    }

    fn writable_parent(&self) -> Result<StyleStore, StyleError> {
        if self.is_read_only() {
            return Err(StyleError::ReadOnly(self.level()));
        }
        let parent = self.parent().ok_or_else(|| {
            StyleError::InvalidArgument(format!(
                "style level `{}` has no parent to promote into",
                self.level()
            ))
        })?;
        if parent.is_read_only() {
            return Err(StyleError::ReadOnly(parent.level()));
        }
        Ok(parent)
    }
}

/// Keys are stored and looked up without surrounding whitespace.
fn normalize_key(key: &str) -> &str {
    key.trim()
}

impl fmt::Debug for StyleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("StyleStore")
            .field("level", &node.level)
            .field("entries", &node.entries)
            .field("parent", &node.parent.as_ref().map(StyleStore::level))
            .field("read_only", &node.read_only)
            .finish()
    }
}
