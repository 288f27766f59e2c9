// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resource dictionaries.
//!
//! This module provides [`ResourceDictionary`], an immutable key/value
//! collection with nested per-theme dictionaries. Hosts own their
//! dictionaries however they like; this type is one ready-made way to answer
//! the [`ResourceNode`] queries.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::host::ResourceNode;
use crate::key::ResourceKey;
use crate::theme::ElementTheme;
use crate::value::ResourceValue;

/// An immutable collection of resources plus theme dictionaries.
///
/// Plain resources answer [`ResourceNode::resource`]. Theme dictionaries are
/// nested dictionaries keyed by [`ElementTheme`] and answer
/// [`ResourceNode::theme_resource`] for that exact theme. Fallback between
/// themes is the lookup engine's job, not the dictionary's.
///
/// Internally wraps an `Rc`, so cloning is cheap. Plain entries are kept
/// sorted by key for binary search.
///
/// # Example
///
/// ```rust
/// use understory_resource::{ElementTheme, ResourceDictionaryBuilder, ResourceKey};
///
/// const DEMO_BACKGROUND: ResourceKey = ResourceKey::new("DemoBackground");
///
/// let resources = ResourceDictionaryBuilder::new()
///     .theme_dictionary(
///         ElementTheme::DARK,
///         ResourceDictionaryBuilder::new().set(DEMO_BACKGROUND, "Black").build(),
///     )
///     .theme_dictionary(
///         ElementTheme::LIGHT,
///         ResourceDictionaryBuilder::new().set(DEMO_BACKGROUND, "White").build(),
///     )
///     .build();
///
/// assert!(resources.get(&DEMO_BACKGROUND).is_none());
/// assert_eq!(
///     resources.get_themed_as::<&str>(&ElementTheme::DARK, &DEMO_BACKGROUND),
///     Some(&"Black")
/// );
/// ```
#[derive(Clone, Default)]
pub struct ResourceDictionary {
    inner: Rc<DictionaryData>,
}

#[derive(Default)]
struct DictionaryData {
    /// Sorted by `ResourceKey` for binary search lookup.
    resources: Vec<(ResourceKey, ResourceValue)>,
    theme_dictionaries: HashMap<ElementTheme, ResourceDictionary>,
}

impl ResourceDictionary {
    /// Returns `true` if there are no plain resources and no theme dictionaries.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.resources.is_empty() && self.inner.theme_dictionaries.is_empty()
    }

    /// Returns the number of plain resources.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.resources.len()
    }

    /// Gets a plain resource.
    #[must_use]
    pub fn get(&self, key: &ResourceKey) -> Option<&ResourceValue> {
        self.inner
            .resources
            .binary_search_by(|(k, _)| k.cmp(key))
            .ok()
            .map(|idx| &self.inner.resources[idx].1)
    }

    /// Gets a plain resource of type `T`.
    ///
    /// Returns `None` if the key is missing or holds another type.
    #[must_use]
    pub fn get_as<T: 'static>(&self, key: &ResourceKey) -> Option<&T> {
        self.get(key).and_then(ResourceValue::downcast_ref)
    }

    /// Returns `true` if a plain resource exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.get(key).is_some()
    }

    /// Returns the plain resource keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &ResourceKey> + '_ {
        self.inner.resources.iter().map(|(k, _)| k)
    }

    /// Returns the nested dictionary registered for exactly `theme`.
    #[must_use]
    pub fn theme_dictionary(&self, theme: &ElementTheme) -> Option<&Self> {
        self.inner.theme_dictionaries.get(theme)
    }

    /// Returns the themes that have a nested dictionary.
    pub fn themes(&self) -> impl Iterator<Item = &ElementTheme> + '_ {
        self.inner.theme_dictionaries.keys()
    }

    /// Gets a resource from the nested dictionary of exactly `theme`.
    ///
    /// Does not follow the theme's fallback chain.
    #[must_use]
    pub fn get_themed(&self, theme: &ElementTheme, key: &ResourceKey) -> Option<&ResourceValue> {
        self.theme_dictionary(theme).and_then(|dict| dict.get(key))
    }

    /// Typed variant of [`ResourceDictionary::get_themed`].
    #[must_use]
    pub fn get_themed_as<T: 'static>(&self, theme: &ElementTheme, key: &ResourceKey) -> Option<&T> {
        self.get_themed(theme, key)
            .and_then(ResourceValue::downcast_ref)
    }
}

impl ResourceNode for ResourceDictionary {
    fn resource(&self, key: &ResourceKey) -> Option<ResourceValue> {
        self.get(key).cloned()
    }

    fn theme_resource(&self, theme: &ElementTheme, key: &ResourceKey) -> Option<ResourceValue> {
        self.get_themed(theme, key).cloned()
    }
}

impl fmt::Debug for ResourceDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDictionary")
            .field("resources", &self.inner.resources)
            .field("theme_dictionaries", &self.inner.theme_dictionaries)
            .finish()
    }
}

/// Builder for [`ResourceDictionary`].
///
/// Keys are unique: setting a key twice keeps the last value, and registering
/// a theme dictionary twice keeps the last dictionary.
#[derive(Debug, Default)]
pub struct ResourceDictionaryBuilder {
    resources: Vec<(ResourceKey, ResourceValue)>,
    theme_dictionaries: HashMap<ElementTheme, ResourceDictionary>,
}

impl ResourceDictionaryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a plain resource.
    #[must_use]
    pub fn set<T: PartialEq + fmt::Debug + 'static>(
        self,
        key: impl Into<ResourceKey>,
        value: T,
    ) -> Self {
        self.set_value(key, ResourceValue::new(value))
    }

    /// Sets a plain resource from an already erased value.
    #[must_use]
    pub fn set_value(mut self, key: impl Into<ResourceKey>, value: ResourceValue) -> Self {
        let key = key.into();
        match self.resources.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(idx) => self.resources[idx].1 = value,
            Err(idx) => self.resources.insert(idx, (key, value)),
        }
        self
    }

    /// Registers the nested dictionary used for `theme`.
    #[must_use]
    pub fn theme_dictionary(mut self, theme: ElementTheme, dictionary: ResourceDictionary) -> Self {
        self.theme_dictionaries.insert(theme, dictionary);
        self
    }

    /// Builds the dictionary.
    #[must_use]
    pub fn build(self) -> ResourceDictionary {
        ResourceDictionary {
            inner: Rc::new(DictionaryData {
                resources: self.resources,
                theme_dictionaries: self.theme_dictionaries,
            }),
        }
    }
}
