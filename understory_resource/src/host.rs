// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities a tree element provides to take part in resource lookup.
//!
//! - [`ResourceNode`]: answers resource queries for itself only.
//! - [`ResourceHost`]: a node in the styling tree, with a styling parent and a
//!   resource-change notification.
//! - [`ThemeStyleable`]: the optional theme facet of a host.
//! - [`ResourceProvider`]: a resource source that may or may not be attached
//!   to an owning host.

use alloc::rc::Rc;

use crate::key::ResourceKey;
use crate::notify::Notifier;
use crate::theme::ElementTheme;
use crate::value::ResourceValue;

/// Something that can answer a resource query about itself.
///
/// Implementations must not search ancestors; the lookup engine does that.
pub trait ResourceNode {
    /// Returns the plain (theme-independent) resource for `key`.
    fn resource(&self, key: &ResourceKey) -> Option<ResourceValue>;

    /// Returns the resource for `key` from the theme dictionary registered for
    /// exactly `theme`.
    ///
    /// Must not follow `theme`'s fallback chain nor fall back to plain
    /// resources. Nodes without theme dictionaries keep the default.
    fn theme_resource(&self, theme: &ElementTheme, key: &ResourceKey) -> Option<ResourceValue> {
        let _ = (theme, key);
        None
    }
}

/// A node of the styling tree.
///
/// Styling parents form a forest; the lookup engine walks from a host to its
/// root through [`ResourceHost::styling_parent`].
pub trait ResourceHost: ResourceNode {
    /// Returns the next node up the styling chain, or `None` at the root.
    fn styling_parent(&self) -> Option<Rc<dyn ResourceHost>>;

    /// Raised when this host's effective resources change.
    fn resources_changed(&self) -> &Notifier;

    /// Returns this host's theme facet, if it has one.
    ///
    /// Whether a host has a theme facet is fixed for the host's lifetime.
    fn theme_facet(&self) -> Option<&dyn ThemeStyleable> {
        None
    }
}

/// The theme facet of a host.
pub trait ThemeStyleable {
    /// Returns the host's current theme.
    ///
    /// How the theme is chosen (set locally or inherited) is up to the
    /// surrounding styling system.
    fn theme(&self) -> Option<ElementTheme>;

    /// Raised when [`ThemeStyleable::theme`] changes.
    fn theme_changed(&self) -> &Notifier;
}

/// A resource source that is not a tree node itself, such as the resources of
/// a style before and after it is applied to an element.
pub trait ResourceProvider {
    /// Returns the host currently owning this provider.
    fn owner(&self) -> Option<Rc<dyn ResourceHost>>;

    /// Raised when [`ResourceProvider::owner`] changes.
    fn owner_changed(&self) -> &Notifier;
}
