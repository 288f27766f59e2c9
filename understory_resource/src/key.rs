// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resource keys.

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

use crate::error::ResourceError;

/// A key for looking up resources along a styling-parent chain.
///
/// Keys are compared by their textual identity. Application keys are
/// typically declared as constants:
///
/// ```rust
/// use understory_resource::ResourceKey;
///
/// const DEMO_BACKGROUND: ResourceKey = ResourceKey::new("DemoBackground");
/// const ACCENT_COLOR: ResourceKey = ResourceKey::new("AccentColor");
///
/// assert_ne!(DEMO_BACKGROUND, ACCENT_COLOR);
/// assert_eq!(DEMO_BACKGROUND, ResourceKey::from(String::from("DemoBackground")));
/// ```
///
/// The empty key is never a valid lookup key; entry points reject it with
/// [`ResourceError::InvalidArgument`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey(Cow<'static, str>);

impl ResourceKey {
    /// Creates a key from a static name.
    #[must_use]
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Returns the textual identity of this key.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the empty key.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks that this key may be used for a lookup.
    pub(crate) fn validate(&self) -> Result<(), ResourceError> {
        if self.is_empty() {
            return Err(ResourceError::InvalidArgument {
                argument: "key",
                reason: "resource key must not be empty",
            });
        }
        Ok(())
    }
}

impl From<&'static str> for ResourceKey {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ResourceKey {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Debug for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceKey").field(&self.as_str()).finish()
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
