// SPDX-License-Identifier: MIT

//! Opaque payloads and port signatures
//!
//! The engine moves [`Data`] between queues without ever looking inside.
//! Type safety is checked once per connection by comparing [`Signature`]s.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A type-erased data item travelling along an edge
///
/// Cloning shares the payload, so a port can hand out a peeked copy while
/// the queued item is untouched.
#[derive(Clone)]
pub struct Data(Rc<dyn Any>);

impl Data {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Recover the shared payload, or get the item back on a type mismatch
    pub fn downcast<T: Any>(self) -> Result<Rc<T>, Data> {
        self.0.downcast::<T>().map_err(Data)
    }

    /// Copy the payload out when it is of type `T`
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Data(..)")
    }
}

/// Opaque type identity attached to every port
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Signature for items of Rust type `T`
    pub fn of<T: Any>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
