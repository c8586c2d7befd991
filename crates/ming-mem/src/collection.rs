use crate::exec_log::{ExecLog, Op};

use indexmap::IndexMap;
use ming_core::{schema::Field, Collection, Document, Error, Make, Options, Result, Value};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

const NULL: Value = Value::Null;

/// A collection held in memory, keyed by `_id` in insertion order.
///
/// `make` assigns sequential integer ids to documents that have none and, in
/// validating mode, checks every declared field. Every successful operation
/// is appended to the log returned by [`MemCollection::exec_log`].
#[derive(Debug)]
pub struct MemCollection {
    name: String,
    fields: Vec<Field>,
    docs: RefCell<IndexMap<String, Document>>,
    next_id: Cell<i64>,
    ops: Rc<RefCell<Vec<Op>>>,
}

enum UpdateOp<'a> {
    Set(&'a Document),
    Unset(&'a Document),
}

impl MemCollection {
    pub fn new(name: impl Into<String>) -> MemCollection {
        MemCollection {
            name: name.into(),
            fields: vec![],
            docs: RefCell::new(IndexMap::new()),
            next_id: Cell::new(1),
            ops: Rc::new(RefCell::new(vec![])),
        }
    }

    /// Declares a field.
    pub fn field(mut self, field: Field) -> MemCollection {
        self.fields.push(field);
        self
    }

    pub fn exec_log(&self) -> ExecLog {
        ExecLog::new(self.ops.clone())
    }

    pub fn len(&self) -> usize {
        self.docs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.borrow().is_empty()
    }

    /// The stored document with the given `_id`.
    pub fn get(&self, id: impl Into<Value>) -> Option<Document> {
        self.docs.borrow().get(&id.into().to_string()).cloned()
    }

    /// Every stored document, in insertion order.
    pub fn documents(&self) -> Vec<Document> {
        self.docs.borrow().values().cloned().collect()
    }

    fn declared(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn key(doc: &Document) -> Option<String> {
        doc.get("_id")
            .filter(|id| !id.is_null())
            .map(Value::to_string)
    }

    fn require_key(doc: &Document) -> Result<String> {
        Self::key(doc).ok_or_else(|| Error::validation(Some("_id"), "value is required"))
    }

    /// The next sequential id not already taken by a stored document.
    fn generate_id(&self) -> i64 {
        let docs = self.docs.borrow();
        let mut id = self.next_id.get();
        while docs.contains_key(&Value::from(id).to_string()) {
            id += 1;
        }
        self.next_id.set(id + 1);
        id
    }

    fn log(&self, op: Op) {
        self.ops.borrow_mut().push(op);
    }

    fn parse_update<'a>(&self, update: &'a Document) -> Result<Vec<UpdateOp<'a>>> {
        let mut ops = Vec::with_capacity(update.len());

        for (operator, args) in update {
            let Some(args) = args.as_document() else {
                return Err(Error::validation(
                    None,
                    format!("`{operator}` expects a document of fields"),
                ));
            };

            if args.contains_key("_id") {
                return Err(Error::validation(Some("_id"), "`_id` cannot be updated"));
            }

            match operator.as_str() {
                "$set" => {
                    for (name, value) in args {
                        if let Some(field) = self.declared(name) {
                            field.validate(value)?;
                        }
                    }
                    ops.push(UpdateOp::Set(args));
                }
                "$unset" => ops.push(UpdateOp::Unset(args)),
                _ => {
                    return Err(Error::unsupported_feature(format!(
                        "update operator `{operator}`"
                    )))
                }
            }
        }

        Ok(ops)
    }
}

impl Collection for MemCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn make(&self, mut raw: Document, mode: Make) -> Result<Document> {
        if mode == Make::Validate {
            for field in &self.fields {
                field.validate(raw.get(&field.name).unwrap_or(&NULL))?;
            }
        }

        if Self::key(&raw).is_none() {
            raw.insert("_id", self.generate_id());
        }

        Ok(raw)
    }

    fn insert(&self, doc: &Document, _options: &Options) -> Result<()> {
        let key = Self::require_key(doc)?;

        {
            let mut docs = self.docs.borrow_mut();
            if docs.contains_key(&key) {
                return Err(Error::duplicate_key(&self.name, key));
            }
            docs.insert(key, doc.clone());
        }

        self.log(Op::Insert(doc.clone()));
        Ok(())
    }

    fn save(&self, doc: &Document, _options: &Options) -> Result<()> {
        let key = Self::require_key(doc)?;
        self.docs.borrow_mut().insert(key, doc.clone());
        self.log(Op::Save(doc.clone()));
        Ok(())
    }

    fn delete(&self, doc: &Document, _options: &Options) -> Result<()> {
        if let Some(key) = Self::key(doc) {
            self.docs.borrow_mut().shift_remove(&key);
        }
        self.log(Op::Delete(doc.clone()));
        Ok(())
    }

    fn remove(&self, query: &Document, _options: &Options) -> Result<()> {
        self.docs.borrow_mut().retain(|_, doc| !doc.matches(query));
        self.log(Op::Remove(query.clone()));
        Ok(())
    }

    /// Supports `$set` and `$unset` on top-level fields. Only the first match
    /// is updated unless the `multi` option is set.
    fn update_partial(&self, query: &Document, update: &Document, options: &Options) -> Result<()> {
        let ops = self.parse_update(update)?;
        let multi = options.flag("multi");

        {
            let mut docs = self.docs.borrow_mut();
            let matching = docs.values_mut().filter(|doc| doc.matches(query));

            for doc in matching.take(if multi { usize::MAX } else { 1 }) {
                for op in &ops {
                    match op {
                        UpdateOp::Set(fields) => {
                            for (name, value) in *fields {
                                doc.insert(name.as_str(), value.clone());
                            }
                        }
                        UpdateOp::Unset(fields) => {
                            for name in fields.keys() {
                                doc.remove(name);
                            }
                        }
                    }
                }
            }
        }

        self.log(Op::UpdatePartial {
            query: query.clone(),
            update: update.clone(),
        });
        Ok(())
    }

    fn find(&self, query: &Document, _options: &Options) -> Result<Vec<Document>> {
        let found = self
            .docs
            .borrow()
            .values()
            .filter(|doc| doc.matches(query))
            .cloned()
            .collect();

        self.log(Op::Find(query.clone()));
        Ok(found)
    }
}
