// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared element-tree fixture for integration tests.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the fixture."
)]

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use understory_resource::{
    ElementTheme, Notifier, Resource, ResourceDictionary, ResourceHost, ResourceKey, ResourceNode,
    ResourceProvider, ResourceValue, StreamItem, ThemeStyleable,
};

/// Guards theme inheritance against parent loops built by cycle tests.
const MAX_THEME_DEPTH: usize = 64;

/// A tree element with replaceable resources and an optional local theme.
///
/// Elements created with a theme facet inherit the nearest ancestor's theme
/// when no local theme is set, the way a themed control does.
pub(crate) struct Element {
    name: &'static str,
    resources: RefCell<ResourceDictionary>,
    theme: RefCell<Option<ElementTheme>>,
    parent: RefCell<Option<Weak<Self>>>,
    children: RefCell<Vec<Weak<Self>>>,
    themed: bool,
    resources_changed: Notifier,
    theme_changed: Notifier,
}

impl Element {
    fn build(name: &'static str, resources: ResourceDictionary, themed: bool) -> Rc<Self> {
        Rc::new(Self {
            name,
            resources: RefCell::new(resources),
            theme: RefCell::new(None),
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            themed,
            resources_changed: Notifier::new(),
            theme_changed: Notifier::new(),
        })
    }

    /// A root element with a theme facet.
    pub(crate) fn root(name: &'static str, resources: ResourceDictionary) -> Rc<Self> {
        Self::build(name, resources, true)
    }

    /// A root element with a theme facet and a local theme.
    pub(crate) fn themed_root(
        name: &'static str,
        theme: ElementTheme,
        resources: ResourceDictionary,
    ) -> Rc<Self> {
        let root = Self::root(name, resources);
        *root.theme.borrow_mut() = Some(theme);
        root
    }

    /// A child element with a theme facet.
    pub(crate) fn child(
        parent: &Rc<Self>,
        name: &'static str,
        resources: ResourceDictionary,
    ) -> Rc<Self> {
        let child = Self::build(name, resources, true);
        child.set_parent(Some(parent));
        child
    }

    /// A child element without a theme facet.
    pub(crate) fn plain_child(
        parent: &Rc<Self>,
        name: &'static str,
        resources: ResourceDictionary,
    ) -> Rc<Self> {
        let child = Self::build(name, resources, false);
        child.set_parent(Some(parent));
        child
    }

    /// Re-parents this element. Used directly by tests that build cycles.
    pub(crate) fn set_parent(self: &Rc<Self>, parent: Option<&Rc<Self>>) {
        *self.parent.borrow_mut() = parent.map(Rc::downgrade);
        if let Some(parent) = parent {
            parent.children.borrow_mut().push(Rc::downgrade(self));
        }
    }

    /// Replaces the resources and notifies this element and its descendants.
    pub(crate) fn set_resources(&self, resources: ResourceDictionary) {
        *self.resources.borrow_mut() = resources;
        self.notify_resources();
    }

    /// Sets the local theme and notifies every element whose effective theme
    /// follows this one.
    pub(crate) fn set_theme(&self, theme: Option<ElementTheme>) {
        *self.theme.borrow_mut() = theme;
        if self.themed {
            self.theme_changed.notify();
        }
        self.for_each_child(Self::notify_inherited_theme);
    }

    pub(crate) fn resources_notifier(&self) -> &Notifier {
        &self.resources_changed
    }

    pub(crate) fn theme_notifier(&self) -> &Notifier {
        &self.theme_changed
    }

    fn notify_resources(&self) {
        self.resources_changed.notify();
        self.for_each_child(Self::notify_resources);
    }

    fn notify_inherited_theme(&self) {
        if self.theme.borrow().is_some() {
            return;
        }
        if self.themed {
            self.theme_changed.notify();
        }
        self.for_each_child(Self::notify_inherited_theme);
    }

    fn for_each_child(&self, f: impl Fn(&Self)) {
        let children: Vec<Rc<Self>> = self
            .children
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        for child in &children {
            f(child);
        }
    }

    fn parent(&self) -> Option<Rc<Self>> {
        self.parent.borrow().as_ref()?.upgrade()
    }

    fn effective_theme(&self) -> Option<ElementTheme> {
        let mut theme = self.theme.borrow().clone();
        let mut parent = self.parent();
        let mut depth = 0;
        while theme.is_none() && depth < MAX_THEME_DEPTH {
            let node = parent?;
            theme = node.theme.borrow().clone();
            parent = node.parent();
            depth += 1;
        }
        theme
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name)
            .field("theme", &self.theme.borrow())
            .field("themed", &self.themed)
            .finish_non_exhaustive()
    }
}

impl ResourceNode for Element {
    fn resource(&self, key: &ResourceKey) -> Option<ResourceValue> {
        self.resources.borrow().resource(key)
    }

    fn theme_resource(&self, theme: &ElementTheme, key: &ResourceKey) -> Option<ResourceValue> {
        self.resources.borrow().theme_resource(theme, key)
    }
}

impl ResourceHost for Element {
    fn styling_parent(&self) -> Option<Rc<dyn ResourceHost>> {
        let parent = self.parent()?;
        Some(parent)
    }

    fn resources_changed(&self) -> &Notifier {
        &self.resources_changed
    }

    fn theme_facet(&self) -> Option<&dyn ThemeStyleable> {
        self.themed.then_some(self as &dyn ThemeStyleable)
    }
}

impl ThemeStyleable for Element {
    fn theme(&self) -> Option<ElementTheme> {
        self.effective_theme()
    }

    fn theme_changed(&self) -> &Notifier {
        &self.theme_changed
    }
}

/// A resource source that can be moved between elements.
#[derive(Default)]
pub(crate) struct Provider {
    owner: RefCell<Option<Rc<Element>>>,
    owner_changed: Notifier,
}

impl Provider {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn set_owner(&self, owner: Option<&Rc<Element>>) {
        *self.owner.borrow_mut() = owner.cloned();
        self.owner_changed.notify();
    }

    pub(crate) fn owner_notifier(&self) -> &Notifier {
        &self.owner_changed
    }
}

impl ResourceProvider for Provider {
    fn owner(&self) -> Option<Rc<dyn ResourceHost>> {
        let owner = self.owner.borrow().clone()?;
        Some(owner)
    }

    fn owner_changed(&self) -> &Notifier {
        &self.owner_changed
    }
}

pub(crate) type Log = Rc<RefCell<Vec<StreamItem>>>;

/// Returns a shared log and an observer that appends every item to it.
pub(crate) fn recorder() -> (Log, impl FnMut(StreamItem) + 'static) {
    let log: Log = Rc::default();
    let sink = {
        let log = log.clone();
        move |item: StreamItem| log.borrow_mut().push(item)
    };
    (log, sink)
}

/// The successfully delivered values in `log`, in order.
pub(crate) fn values(log: &Log) -> Vec<Resource> {
    log.borrow()
        .iter()
        .map(|item| item.clone().expect("stream delivered an error"))
        .collect()
}
