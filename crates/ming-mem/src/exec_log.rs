use ming_core::Document;
use std::{cell::RefCell, rc::Rc};

/// One storage operation that reached a [`MemCollection`](crate::MemCollection).
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Insert(Document),
    Save(Document),
    Delete(Document),
    Remove(Document),
    UpdatePartial { query: Document, update: Document },
    Find(Document),
}

/// A handle on a collection's operation log, for assertions in tests.
#[derive(Debug, Clone)]
pub struct ExecLog {
    ops: Rc<RefCell<Vec<Op>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Rc<RefCell<Vec<Op>>>) -> ExecLog {
        ExecLog { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.borrow().is_empty()
    }

    /// Check if any operation matches the given predicate
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Op) -> bool,
    {
        self.ops.borrow().iter().any(predicate)
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Op) -> bool,
    {
        self.ops.borrow().iter().filter(|op| predicate(op)).count()
    }

    pub fn has_insert(&self) -> bool {
        self.any(|op| matches!(op, Op::Insert(_)))
    }

    pub fn has_save(&self) -> bool {
        self.any(|op| matches!(op, Op::Save(_)))
    }

    pub fn has_delete(&self) -> bool {
        self.any(|op| matches!(op, Op::Delete(_)))
    }

    pub fn has_remove(&self) -> bool {
        self.any(|op| matches!(op, Op::Remove(_)))
    }

    pub fn has_update_partial(&self) -> bool {
        self.any(|op| matches!(op, Op::UpdatePartial { .. }))
    }

    /// Check if any operation wrote to the store
    pub fn has_write(&self) -> bool {
        self.any(|op| !matches!(op, Op::Find(_)))
    }

    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
    }

    /// Remove and return the oldest operation
    pub fn pop(&self) -> Option<Op> {
        let mut ops = self.ops.borrow_mut();
        if ops.is_empty() {
            None
        } else {
            Some(ops.remove(0))
        }
    }

    /// Escape hatch for custom assertions
    pub fn with_ops<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Op]) -> R,
    {
        f(&self.ops.borrow())
    }
}
