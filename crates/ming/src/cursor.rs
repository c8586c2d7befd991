use crate::{Instance, Mapped};

use ming_core::Result;
use std::{marker::PhantomData, vec};

/// Typed iteration over query results.
#[derive(Debug)]
pub struct Cursor<T> {
    instances: vec::IntoIter<Instance>,
    _p: PhantomData<T>,
}

pub trait FromCursor<A>: Extend<A> + Default {}

impl<A, T: Extend<A> + Default> FromCursor<A> for T {}

impl<T: Mapped> Cursor<T> {
    pub(crate) fn new(instances: Vec<Instance>) -> Cursor<T> {
        Cursor {
            instances: instances.into_iter(),
            _p: PhantomData,
        }
    }

    /// Number of results not yet consumed.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(mut self) -> Result<Option<T>> {
        self.next().transpose()
    }

    /// Collect all values
    pub fn all<B>(self) -> Result<B>
    where
        B: FromCursor<T>,
    {
        let mut ret = B::default();

        for res in self {
            ret.extend(Some(res?));
        }

        Ok(ret)
    }
}

impl<T: Mapped> Iterator for Cursor<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.instances.next().map(Instance::downcast)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.instances.size_hint()
    }
}

impl<T: Mapped> ExactSizeIterator for Cursor<T> {}
