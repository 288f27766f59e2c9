// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Resource: scoped, theme-aware resource lookup for element trees.
//!
//! Elements of a UI tree carry named resources (brushes, sizes, templates).
//! This crate resolves a [`ResourceKey`] by walking from an element up its
//! styling parents, optionally honouring a requested [`ElementTheme`] and that
//! theme's fallback chain, and exposes the result as live streams that push a
//! new value whenever the relevant resources or themes change.
//!
//! ## Core Concepts
//!
//! ### Hosts and dictionaries
//!
//! Tree elements take part in lookup by implementing [`ResourceHost`]. A
//! [`ResourceDictionary`] is an immutable, shareable map of plain resources
//! plus per-theme dictionaries, and is the usual way a host answers
//! [`ResourceNode`] queries.
//!
//! ```rust
//! use std::rc::Rc;
//! use understory_resource::{
//!     ElementTheme, Notifier, Resource, ResourceDictionary, ResourceDictionaryBuilder,
//!     ResourceHost, ResourceHostExt, ResourceKey, ResourceNode, ResourceValue,
//! };
//!
//! const FOREGROUND: ResourceKey = ResourceKey::new("Foreground");
//!
//! struct Element {
//!     resources: ResourceDictionary,
//!     parent: Option<Rc<Element>>,
//!     changed: Notifier,
//! }
//!
//! impl ResourceNode for Element {
//!     fn resource(&self, key: &ResourceKey) -> Option<ResourceValue> {
//!         self.resources.resource(key)
//!     }
//!     fn theme_resource(&self, theme: &ElementTheme, key: &ResourceKey) -> Option<ResourceValue> {
//!         self.resources.theme_resource(theme, key)
//!     }
//! }
//!
//! impl ResourceHost for Element {
//!     fn styling_parent(&self) -> Option<Rc<dyn ResourceHost>> {
//!         self.parent.clone().map(|p| p as Rc<dyn ResourceHost>)
//!     }
//!     fn resources_changed(&self) -> &Notifier {
//!         &self.changed
//!     }
//! }
//!
//! let root = Rc::new(Element {
//!     resources: ResourceDictionaryBuilder::new()
//!         .set(FOREGROUND, "Black")
//!         .theme_dictionary(
//!             ElementTheme::DARK,
//!             ResourceDictionaryBuilder::new().set(FOREGROUND, "White").build(),
//!         )
//!         .build(),
//!     parent: None,
//!     changed: Notifier::new(),
//! });
//! let leaf = Element {
//!     resources: ResourceDictionary::default(),
//!     parent: Some(root),
//!     changed: Notifier::new(),
//! };
//!
//! assert_eq!(leaf.find_resource(&FOREGROUND), Ok(Resource::value("Black")));
//! assert_eq!(
//!     leaf.try_find_theme_resource(&ElementTheme::DARK, &FOREGROUND),
//!     Ok(Some(ResourceValue::new("White")))
//! );
//! ```
//!
//! ### Themes
//!
//! An [`ElementTheme`] is identified by its key and may inherit from another
//! theme. Theme-aware lookup tries the theme and its fallbacks at one node
//! before trying that node's plain resources, and only then moves up.
//!
//! ```rust
//! use understory_resource::ElementTheme;
//!
//! let high_contrast = ElementTheme::with_inherit("HighContrast", ElementTheme::DARK);
//! let keys: Vec<&str> = high_contrast.fallback_chain().map(ElementTheme::key).collect();
//! assert_eq!(keys, ["HighContrast", "Dark"]);
//! ```
//!
//! ### Streams
//!
//! [`BoundResourceStream`] follows a key at a fixed host;
//! [`FloatingResourceStream`] follows a key at whichever host currently owns a
//! [`ResourceProvider`]. Streams attach to notifications only while they have
//! subscribers, and every new subscriber immediately receives the current
//! value.
//!
//! ## Logging
//!
//! Lookups emit `trace` events, stream activation and owner changes emit
//! `debug` events, and styling cycles or converter failures emit `warn` events
//! through [`tracing`].
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. The default `std` feature only
//! forwards to dependencies.

#![no_std]

extern crate alloc;

mod dictionary;
mod error;
mod floating;
mod host;
mod key;
mod lookup;
mod notify;
mod observable;
mod stream;
mod theme;
mod value;

pub use dictionary::{ResourceDictionary, ResourceDictionaryBuilder};
pub use error::{ConvertError, ResourceError};
pub use floating::{FloatingResourceStream, open_floating_resource_stream};
pub use host::{ResourceHost, ResourceNode, ResourceProvider, ThemeStyleable};
pub use key::ResourceKey;
pub use lookup::{
    ResourceHostExt, find_resource, resolve_resource, try_find_resource, try_find_theme_resource,
};
pub use notify::{ListenerId, Notifier};
pub use observable::{Converter, StreamItem, Subscription};
pub use stream::{BoundResourceStream, open_resource_stream};
pub use theme::ElementTheme;
pub use value::{Resource, ResourceValue, UNSET};
