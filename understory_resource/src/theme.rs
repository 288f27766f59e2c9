// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element themes.
//!
//! This module provides [`ElementTheme`], the identity used to select theme
//! dictionaries, together with its optional fallback theme.

use alloc::borrow::Cow;
use alloc::rc::Rc;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter;

use crate::error::ResourceError;

/// A theme identity with an optional fallback ("inherit") theme.
///
/// Equality and hashing use the key only: two themes with the same key are the
/// same theme regardless of their fallbacks. Themes are immutable and cheap to
/// clone.
///
/// A custom theme can fall back to another theme. Theme-aware lookups that
/// find no entry for the custom theme at a node retry with its fallback at the
/// same node before considering that node's plain resources.
///
/// ```rust
/// use understory_resource::ElementTheme;
///
/// let pink = ElementTheme::with_inherit("Pink", ElementTheme::LIGHT);
/// assert_eq!(pink.inherit(), Some(&ElementTheme::LIGHT));
///
/// let chain: Vec<&str> = pink.fallback_chain().map(ElementTheme::key).collect();
/// assert_eq!(chain, ["Pink", "Light"]);
///
/// // Identity is the key alone.
/// assert_eq!(pink, ElementTheme::new("Pink"));
/// ```
///
/// The fallback chain is finite and acyclic by construction: a theme can only
/// fall back to a theme that already exists.
#[derive(Clone)]
pub struct ElementTheme {
    key: Cow<'static, str>,
    inherit: Option<Rc<ElementTheme>>,
}

impl ElementTheme {
    /// The built-in light theme.
    pub const LIGHT: Self = Self::named("Light");

    /// The built-in dark theme.
    pub const DARK: Self = Self::named("Dark");

    const fn named(key: &'static str) -> Self {
        Self {
            key: Cow::Borrowed(key),
            inherit: None,
        }
    }

    /// Creates a theme without a fallback.
    #[must_use]
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key: key.into(),
            inherit: None,
        }
    }

    /// Creates a theme that falls back to `inherit`.
    #[must_use]
    pub fn with_inherit(key: impl Into<Cow<'static, str>>, inherit: Self) -> Self {
        Self {
            key: key.into(),
            inherit: Some(Rc::new(inherit)),
        }
    }

    /// Returns the theme's identity.
    #[must_use]
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the fallback theme, if any.
    #[must_use]
    #[inline]
    pub fn inherit(&self) -> Option<&Self> {
        self.inherit.as_deref()
    }

    /// Iterates this theme followed by each fallback in order.
    pub fn fallback_chain(&self) -> impl Iterator<Item = &Self> + '_ {
        iter::successors(Some(self), |theme| theme.inherit())
    }

    /// Checks that this theme may be used for a lookup.
    pub(crate) fn validate(&self) -> Result<(), ResourceError> {
        if self.key.is_empty() {
            return Err(ResourceError::InvalidArgument {
                argument: "theme",
                reason: "theme key must not be empty",
            });
        }
        Ok(())
    }
}

impl PartialEq for ElementTheme {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ElementTheme {}

impl Hash for ElementTheme {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for ElementTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ElementTheme");
        s.field("key", &self.key());
        if let Some(inherit) = self.inherit() {
            s.field("inherit", &inherit.key());
        }
        s.finish()
    }
}

impl fmt::Display for ElementTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
