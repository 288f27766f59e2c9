// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resource lookup over the styling-parent chain.
//!
//! All lookups start at a host (inclusive) and walk up through
//! [`ResourceHost::styling_parent`]; the nearest node that defines the key
//! wins. Theme-aware lookups apply the per-node theme policy at each node
//! before moving up:
//!
//! 1. the node's theme dictionary for the requested theme,
//! 2. the node's theme dictionaries for each fallback of that theme, in order,
//! 3. the node's plain resources,
//! 4. the next node up, starting again from the requested theme.
//!
//! A node's generic value therefore shadows an ancestor's theme-specific value.

use alloc::rc::Rc;

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::error::ResourceError;
use crate::host::{ResourceHost, ResourceNode};
use crate::key::ResourceKey;
use crate::theme::ElementTheme;
use crate::value::{Resource, ResourceValue};

/// Finds `key` starting at `host`, returning [`Resource::Unset`] on a miss.
///
/// # Errors
///
/// [`ResourceError::InvalidArgument`] for an empty key and
/// [`ResourceError::CycleDetected`] for a looping styling chain.
pub fn find_resource<H>(host: &H, key: &ResourceKey) -> Result<Resource, ResourceError>
where
    H: ResourceHost + ?Sized,
{
    try_find_resource(host, key).map(Resource::from)
}

/// Finds `key` starting at `host`, returning `None` on a miss.
///
/// Only plain resources are consulted.
///
/// # Errors
///
/// Same as [`find_resource`].
pub fn try_find_resource<H>(host: &H, key: &ResourceKey) -> Result<Option<ResourceValue>, ResourceError>
where
    H: ResourceHost + ?Sized,
{
    key.validate()?;

    if let Some(value) = host.resource(key) {
        tracing::trace!(resource.key = %key, depth = 0_usize, "resource found");
        return Ok(Some(value));
    }
    let mut ancestors = Ancestors::new(host);
    while let Some(node) = ancestors.next_node()? {
        if let Some(value) = node.resource(key) {
            tracing::trace!(resource.key = %key, depth = ancestors.depth(), "resource found");
            return Ok(Some(value));
        }
    }

    tracing::trace!(resource.key = %key, "resource not found");
    Ok(None)
}

/// Finds `key` for `theme` starting at `host`, returning `None` on a miss.
///
/// See the [module documentation](self) for the per-node policy.
///
/// # Errors
///
/// [`ResourceError::InvalidArgument`] for an empty key or an empty theme key,
/// and [`ResourceError::CycleDetected`] for a looping styling chain.
pub fn try_find_theme_resource<H>(
    host: &H,
    theme: &ElementTheme,
    key: &ResourceKey,
) -> Result<Option<ResourceValue>, ResourceError>
where
    H: ResourceHost + ?Sized,
{
    key.validate()?;
    theme.validate()?;

    if let Some(value) = find_in_node(host, theme, key) {
        tracing::trace!(resource.key = %key, theme.key = %theme, depth = 0_usize, "theme resource found");
        return Ok(Some(value));
    }
    let mut ancestors = Ancestors::new(host);
    while let Some(node) = ancestors.next_node()? {
        if let Some(value) = find_in_node(&*node, theme, key) {
            tracing::trace!(
                resource.key = %key,
                theme.key = %theme,
                depth = ancestors.depth(),
                "theme resource found"
            );
            return Ok(Some(value));
        }
    }

    tracing::trace!(resource.key = %key, theme.key = %theme, "theme resource not found");
    Ok(None)
}

/// Resolves `key` the way resource streams do.
///
/// If `host` has a theme facet reporting a theme, the theme-aware lookup is
/// tried first; on a miss, or without a theme, the plain lookup decides.
///
/// # Errors
///
/// Same as [`try_find_theme_resource`].
pub fn resolve_resource<H>(host: &H, key: &ResourceKey) -> Result<Resource, ResourceError>
where
    H: ResourceHost + ?Sized,
{
    let theme = host
        .theme_facet()
        .and_then(|facet| facet.theme())
        .filter(|theme| !theme.key().is_empty());
    if let Some(theme) = theme
        && let Some(value) = try_find_theme_resource(host, &theme, key)?
    {
        return Ok(Resource::Value(value));
    }
    find_resource(host, key)
}

/// Applies the theme policy to a single node, without moving up the tree.
fn find_in_node<N>(node: &N, theme: &ElementTheme, key: &ResourceKey) -> Option<ResourceValue>
where
    N: ResourceNode + ?Sized,
{
    theme
        .fallback_chain()
        .find_map(|theme| node.theme_resource(theme, key))
        .or_else(|| node.resource(key))
}

/// Lookup methods available on every [`ResourceHost`].
pub trait ResourceHostExt: ResourceHost {
    /// See [`find_resource`].
    fn find_resource(&self, key: &ResourceKey) -> Result<Resource, ResourceError> {
        find_resource(self, key)
    }

    /// See [`try_find_resource`].
    fn try_find_resource(&self, key: &ResourceKey) -> Result<Option<ResourceValue>, ResourceError> {
        try_find_resource(self, key)
    }

    /// See [`try_find_theme_resource`].
    fn try_find_theme_resource(
        &self,
        theme: &ElementTheme,
        key: &ResourceKey,
    ) -> Result<Option<ResourceValue>, ResourceError> {
        try_find_theme_resource(self, theme, key)
    }

    /// See [`resolve_resource`].
    fn resolve_resource(&self, key: &ResourceKey) -> Result<Resource, ResourceError> {
        resolve_resource(self, key)
    }
}

impl<T: ResourceHost + ?Sized> ResourceHostExt for T {}

/// Walks the styling parents of a host, failing on a revisited node.
///
/// Every visited ancestor is retained until the walk ends, so a recorded
/// address cannot be freed and handed to a different parent built on demand.
struct Ancestors {
    origin: usize,
    current: Option<Rc<dyn ResourceHost>>,
    /// Populated lazily so roots never allocate.
    visited: HashSet<usize>,
    retained: SmallVec<[Rc<dyn ResourceHost>; 8]>,
    depth: usize,
}

impl Ancestors {
    fn new<H: ResourceHost + ?Sized>(host: &H) -> Self {
        Self {
            origin: address(host),
            current: host.styling_parent(),
            visited: HashSet::new(),
            retained: SmallVec::new(),
            depth: 0,
        }
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn next_node(&mut self) -> Result<Option<Rc<dyn ResourceHost>>, ResourceError> {
        let Some(node) = self.current.take() else {
            return Ok(None);
        };
        if self.visited.is_empty() {
            self.visited.insert(self.origin);
        }
        if !self.visited.insert(address(&*node)) {
            let visited = self.visited.len();
            tracing::warn!(visited, "styling parent cycle detected");
            return Err(ResourceError::CycleDetected { visited });
        }
        self.depth += 1;
        self.current = node.styling_parent();
        self.retained.push(Rc::clone(&node));
        Ok(Some(node))
    }
}

fn address<T: ?Sized>(node: &T) -> usize {
    core::ptr::from_ref(node).cast::<()>().addr()
}
