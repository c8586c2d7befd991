//! Documents that report their own mutation.
//!
//! A [`TrackedDocument`] reads exactly like the [`Document`] it wraps, but
//! every write goes through a [`Tracker`]. Mutable access to nested values
//! hands out [`Tracked`] wrappers that carry the same tracker, so a push onto
//! a list three documents deep still soils the owning instance.
//!
//! Every mutating operation calls [`Tracker::soil`] exactly once, after the
//! underlying change. Operations that turn out to change nothing (removing an
//! absent key, popping an empty list, an out-of-bounds index) do not soil.

use crate::state::Tracker;

use ming_core::{Document, Value};
use std::{fmt, ops::Deref};

/// A document owned by an instance state, reporting every mutation.
pub struct TrackedDocument {
    doc: Document,
    tracker: Tracker,
}

/// Mutable access to a value or container inside a tracked document.
///
/// `C` is the container kind: [`Value`], [`Document`] or `Vec<Value>`. Reads
/// go through `Deref`; writes are only available through the methods below,
/// all of which soil the tracker.
pub struct Tracked<'a, C> {
    inner: &'a mut C,
    tracker: &'a Tracker,
}

impl TrackedDocument {
    pub fn new(doc: Document, tracker: Tracker) -> TrackedDocument {
        TrackedDocument { doc, tracker }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Borrows the whole document as a tracked container.
    pub fn as_tracked(&mut self) -> Tracked<'_, Document> {
        Tracked::new(&mut self.doc, &self.tracker)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.as_tracked().insert(name, value)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.as_tracked().remove(name)
    }

    pub fn clear(&mut self) {
        self.as_tracked().clear();
    }

    pub fn get_mut(&mut self, name: &str) -> Option<Tracked<'_, Value>> {
        let inner = self.doc.get_mut(name)?;
        Some(Tracked::new(inner, &self.tracker))
    }

    pub fn document_mut(&mut self, name: &str) -> Option<Tracked<'_, Document>> {
        self.get_mut(name)?.into_document_mut()
    }

    pub fn list_mut(&mut self, name: &str) -> Option<Tracked<'_, Vec<Value>>> {
        self.get_mut(name)?.into_list_mut()
    }

    /// Returns an untracked copy of the content.
    pub fn to_document(&self) -> Document {
        self.doc.clone()
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub(crate) fn replace(&mut self, doc: Document) {
        self.doc = doc;
    }
}

impl Deref for TrackedDocument {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.doc
    }
}

impl fmt::Debug for TrackedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TrackedDocument").field(&self.doc).finish()
    }
}

impl<'a, C> Tracked<'a, C> {
    pub fn new(inner: &'a mut C, tracker: &'a Tracker) -> Tracked<'a, C> {
        Tracked { inner, tracker }
    }

    /// Shortens the borrow so the wrapper can be used again afterwards.
    pub fn reborrow(&mut self) -> Tracked<'_, C> {
        Tracked::new(&mut *self.inner, self.tracker)
    }

    fn mutate<R>(&mut self, f: impl FnOnce(&mut C) -> R) -> R {
        let ret = f(&mut *self.inner);
        self.tracker.soil();
        ret
    }
}

impl<C> Deref for Tracked<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.inner
    }
}

impl<C: fmt::Debug> fmt::Debug for Tracked<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracked").field(&self.inner).finish()
    }
}

impl<'a> Tracked<'a, Value> {
    /// Replaces the value, returning the previous one.
    pub fn set(&mut self, value: impl Into<Value>) -> Value {
        let value = value.into();
        self.mutate(|inner| std::mem::replace(inner, value))
    }

    pub fn as_document_mut(&mut self) -> Option<Tracked<'_, Document>> {
        let tracker = self.tracker;
        Some(Tracked::new(self.inner.as_document_mut()?, tracker))
    }

    pub fn as_list_mut(&mut self) -> Option<Tracked<'_, Vec<Value>>> {
        let tracker = self.tracker;
        Some(Tracked::new(self.inner.as_list_mut()?, tracker))
    }

    pub fn into_document_mut(self) -> Option<Tracked<'a, Document>> {
        let Tracked { inner, tracker } = self;
        Some(Tracked::new(inner.as_document_mut()?, tracker))
    }

    pub fn into_list_mut(self) -> Option<Tracked<'a, Vec<Value>>> {
        let Tracked { inner, tracker } = self;
        Some(Tracked::new(inner.as_list_mut()?, tracker))
    }
}

impl<'a> Tracked<'a, Document> {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let (name, value) = (name.into(), value.into());
        self.mutate(|doc| doc.insert(name, value))
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        if !self.inner.contains_key(name) {
            return None;
        }
        self.mutate(|doc| doc.remove(name))
    }

    pub fn clear(&mut self) {
        self.mutate(Document::clear);
    }

    pub fn get_mut(&mut self, name: &str) -> Option<Tracked<'_, Value>> {
        let tracker = self.tracker;
        Some(Tracked::new(self.inner.get_mut(name)?, tracker))
    }

    pub fn document_mut(&mut self, name: &str) -> Option<Tracked<'_, Document>> {
        self.get_mut(name)?.into_document_mut()
    }

    pub fn list_mut(&mut self, name: &str) -> Option<Tracked<'_, Vec<Value>>> {
        self.get_mut(name)?.into_list_mut()
    }

    /// Consumes the wrapper, keeping the full borrow for the nested value.
    pub fn into_mut(self, name: &str) -> Option<Tracked<'a, Value>> {
        let Tracked { inner, tracker } = self;
        Some(Tracked::new(inner.get_mut(name)?, tracker))
    }
}

impl<'a> Tracked<'a, Vec<Value>> {
    pub fn push(&mut self, value: impl Into<Value>) {
        let value = value.into();
        self.mutate(|items| items.push(value));
    }

    /// Inserts at `index`, shifting later items. Returns `false` and leaves
    /// the list untouched if `index > len`.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> bool {
        if index > self.inner.len() {
            return false;
        }
        let value = value.into();
        self.mutate(|items| items.insert(index, value));
        true
    }

    pub fn pop(&mut self) -> Option<Value> {
        if self.inner.is_empty() {
            return None;
        }
        self.mutate(Vec::pop)
    }

    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index >= self.inner.len() {
            return None;
        }
        Some(self.mutate(|items| items.remove(index)))
    }

    /// Replaces the item at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Option<Value> {
        if index >= self.inner.len() {
            return None;
        }
        let value = value.into();
        Some(self.mutate(|items| std::mem::replace(&mut items[index], value)))
    }

    pub fn extend<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return;
        }
        self.mutate(|items| items.extend(values));
    }

    pub fn truncate(&mut self, len: usize) {
        if len >= self.inner.len() {
            return;
        }
        self.mutate(|items| items.truncate(len));
    }

    pub fn retain(&mut self, f: impl FnMut(&Value) -> bool) {
        let before = self.inner.len();
        self.inner.retain(f);
        if self.inner.len() != before {
            self.tracker.soil();
        }
    }

    pub fn clear(&mut self) {
        self.mutate(Vec::clear);
    }

    pub fn get_mut(&mut self, index: usize) -> Option<Tracked<'_, Value>> {
        let tracker = self.tracker;
        Some(Tracked::new(self.inner.get_mut(index)?, tracker))
    }

    pub fn document_mut(&mut self, index: usize) -> Option<Tracked<'_, Document>> {
        self.get_mut(index)?.into_document_mut()
    }

    pub fn list_mut(&mut self, index: usize) -> Option<Tracked<'_, Vec<Value>>> {
        self.get_mut(index)?.into_list_mut()
    }
}

#[cfg(test)]
mod tests {
    use crate::state::{InstanceState, Status};
    use ming_core::{doc, Document, Value};

    fn clean(doc: Document) -> InstanceState {
        InstanceState::with_document(doc, Status::Clean)
    }

    #[test]
    fn reads_never_soil() {
        let mut state = clean(doc! { "name": "a", "tags": vec!["x"] });
        let doc = state.document_mut();

        assert_eq!(doc.get("name"), Some(&Value::from("a")));
        assert_eq!(doc.list_mut("tags").unwrap().len(), 1);
        assert!(doc.get_mut("missing").is_none());
        assert!(state.is_clean());
    }

    #[test]
    fn set_remove_clear_soil() {
        let mut state = clean(doc! { "name": "a" });
        state.document_mut().insert("name", "b");
        assert!(state.is_dirty());

        let mut state = clean(doc! { "name": "a" });
        assert_eq!(state.document_mut().remove("name"), Some(Value::from("a")));
        assert!(state.is_dirty());

        let mut state = clean(doc! { "name": "a" });
        state.document_mut().clear();
        assert!(state.is_dirty());
        assert!(state.document().is_empty());
    }

    #[test]
    fn removing_absent_key_does_not_soil() {
        let mut state = clean(doc! { "name": "a" });
        assert_eq!(state.document_mut().remove("colour"), None);
        assert!(state.is_clean());
    }

    #[test]
    fn list_push_soils() {
        let mut state = clean(doc! { "tags": Vec::<Value>::new() });
        state.document_mut().list_mut("tags").unwrap().push("x");
        assert!(state.is_dirty());
        assert_eq!(
            state.document().get("tags"),
            Some(&Value::from(vec!["x"]))
        );
    }

    #[test]
    fn list_noops_do_not_soil() {
        let mut state = clean(doc! { "tags": vec!["x"] });
        {
            let mut doc = state.document_mut().as_tracked();
            let mut tags = doc.list_mut("tags").unwrap();
            assert_eq!(tags.remove(5), None);
            assert_eq!(tags.set(5, "y"), None);
            tags.truncate(3);
            tags.retain(|_| true);
            tags.extend(Vec::<Value>::new());
        }
        assert!(state.is_clean());

        let mut state = clean(doc! { "tags": Vec::<Value>::new() });
        assert_eq!(state.document_mut().list_mut("tags").unwrap().pop(), None);
        assert!(state.is_clean());

        {
            let mut tags = state.document_mut().list_mut("tags").unwrap();
            assert!(!tags.insert(1, "x"));
            assert_eq!(tags.remove(0), None);
            assert_eq!(tags.set(0, "x"), None);
        }
        assert!(state.is_clean());
        assert_eq!(state.document().get("tags"), Some(&Value::from(Vec::<Value>::new())));
    }

    #[test]
    fn list_edits() {
        let mut state = clean(doc! { "tags": vec!["a", "b", "c"] });
        {
            let mut tags = state.document_mut().list_mut("tags").unwrap();
            assert_eq!(tags.set(0, "z"), Some(Value::from("a")));
            assert!(tags.insert(1, "y"));
            assert_eq!(tags.remove(3), Some(Value::from("c")));
            tags.retain(|v| *v != "b");
            tags.extend(["q", "r"]);
            tags.truncate(3);
        }
        assert!(state.is_dirty());
        assert_eq!(
            state.document().get("tags"),
            Some(&Value::from(vec!["z", "y", "q"]))
        );
    }

    #[test]
    fn deep_nesting_soils() {
        let mut state = clean(doc! {
            "meta": doc! {
                "owners": vec![Value::from(doc! { "name": "a", "roles": vec!["admin"] })],
            },
        });

        {
            let mut meta = state.document_mut().document_mut("meta").unwrap();
            let mut owners = meta.list_mut("owners").unwrap();
            let mut owner = owners.document_mut(0).unwrap();
            let roles = owner.list_mut("roles").unwrap();
            assert_eq!(roles.len(), 1);
        }
        assert!(state.is_clean());

        {
            let mut meta = state.document_mut().document_mut("meta").unwrap();
            let mut owners = meta.list_mut("owners").unwrap();
            let mut owner = owners.document_mut(0).unwrap();
            owner.list_mut("roles").unwrap().push("editor");
        }
        assert!(state.is_dirty());
        assert_eq!(
            state.document().get_path("meta.owners"),
            Some(&Value::from(vec![Value::from(
                doc! { "name": "a", "roles": vec!["admin", "editor"] }
            )]))
        );
    }

    #[test]
    fn nested_value_set_soils() {
        let mut state = clean(doc! { "size": doc! { "w": 1, "h": 2 } });
        {
            let mut size = state.document_mut().document_mut("size").unwrap();
            let mut w = size.get_mut("w").unwrap();
            assert_eq!(w.set(3), Value::from(1));
        }
        assert!(state.is_dirty());
        assert_eq!(state.document().get_path("size.w"), Some(&Value::from(3)));
    }

    #[test]
    fn wrong_container_kind_is_none() {
        let mut state = clean(doc! { "name": "a" });
        assert!(state.document_mut().list_mut("name").is_none());
        assert!(state.document_mut().document_mut("name").is_none());
        assert!(state.is_clean());
    }

    #[test]
    fn new_instance_stays_new_on_mutation() {
        let mut state = InstanceState::new();
        state.document_mut().insert("tags", vec!["x"]);
        state.document_mut().list_mut("tags").unwrap().push("y");
        assert!(state.is_new());
    }

    #[test]
    fn reborrow_keeps_wrapper_usable() {
        let mut state = clean(doc! { "tags": vec!["a"] });
        let mut doc = state.document_mut().as_tracked();
        {
            let mut again = doc.reborrow();
            again.insert("name", "n");
        }
        doc.list_mut("tags").unwrap().push("b");
        drop(doc);
        assert!(state.is_dirty());
        assert_eq!(state.document().len(), 2);
    }
}
