// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased resource values and the `Unset` sentinel.
//!
//! [`ResourceValue`] stores a resource of any comparable type behind an
//! `Rc`, and [`Resource`] tags the outcome of a lookup so that "no resource"
//! can never be confused with a resolved value.

use alloc::rc::Rc;
use core::any::{Any, TypeId};
use core::fmt;

/// A shared, immutable, type-erased resource value.
///
/// Any `T: PartialEq + Debug + 'static` can be stored. Cloning is cheap
/// (reference count). Two values are equal when they hold the same type and
/// the concrete values compare equal.
///
/// # Example
///
/// ```rust
/// use understory_resource::ResourceValue;
///
/// let value = ResourceValue::new(0x0078D4_u32);
/// assert!(value.is::<u32>());
/// assert_eq!(value.downcast_ref::<u32>(), Some(&0x0078D4));
/// assert_eq!(value, ResourceValue::new(0x0078D4_u32));
/// assert_ne!(value, ResourceValue::new(0x0078D4_u64));
/// ```
#[derive(Clone)]
pub struct ResourceValue {
    inner: Rc<dyn ErasedResource>,
    type_id: TypeId,
}

impl ResourceValue {
    /// Wraps a concrete value.
    #[must_use]
    pub fn new<T: PartialEq + fmt::Debug + 'static>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            inner: Rc::new(value),
        }
    }

    /// Returns the [`TypeId`] of the contained value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            self.inner.as_any().downcast_ref()
        } else {
            None
        }
    }

    /// Returns `true` if both handles share the same allocation.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ResourceValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.inner.dyn_eq(other.inner.as_any())
    }
}

impl fmt::Debug for ResourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.dyn_fmt(f)
    }
}

trait ErasedResource: Any {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: PartialEq + fmt::Debug + 'static> ErasedResource for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The outcome of resolving a resource key.
///
/// [`Resource::Unset`] means no node along the searched chain defines the
/// key. It is distinct from every stored value, including values that are
/// themselves "empty" such as `Option::<T>::None`.
///
/// ```rust
/// use understory_resource::{Resource, UNSET};
///
/// let found = Resource::value(14.0_f64);
/// assert_eq!(found.downcast_ref::<f64>(), Some(&14.0));
/// assert!(UNSET.is_unset());
/// assert_ne!(Resource::value(None::<f64>), UNSET);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Resource {
    /// No resource was found for the key.
    #[default]
    Unset,
    /// The resolved value.
    Value(ResourceValue),
}

/// Shared "no resource" sentinel.
pub const UNSET: Resource = Resource::Unset;

impl Resource {
    /// Wraps a concrete value as a found resource.
    #[must_use]
    pub fn value<T: PartialEq + fmt::Debug + 'static>(value: T) -> Self {
        Self::Value(ResourceValue::new(value))
    }

    /// Returns `true` for the `Unset` sentinel.
    #[must_use]
    #[inline]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns the resolved value, if any.
    #[must_use]
    #[inline]
    pub fn as_value(&self) -> Option<&ResourceValue> {
        match self {
            Self::Unset => None,
            Self::Value(value) => Some(value),
        }
    }

    /// Downcasts the resolved value, if any, to `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_value().and_then(ResourceValue::downcast_ref)
    }

    /// Converts into an `Option`, mapping `Unset` to `None`.
    #[must_use]
    #[inline]
    pub fn into_value(self) -> Option<ResourceValue> {
        match self {
            Self::Unset => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl From<Option<ResourceValue>> for Resource {
    fn from(value: Option<ResourceValue>) -> Self {
        value.map_or(Self::Unset, Self::Value)
    }
}

impl From<ResourceValue> for Resource {
    fn from(value: ResourceValue) -> Self {
        Self::Value(value)
    }
}
