// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resource streams anchored to a detachable provider.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::error::{ConvertError, ResourceError};
use crate::host::{ResourceHost, ResourceProvider};
use crate::key::ResourceKey;
use crate::notify::ListenerId;
use crate::observable::{
    Converter, HostAttachment, StreamItem, SubscriberId, SubscriberSet, Subscription, Unsubscribe,
    resolve_item,
};
use crate::value::Resource;

/// The live value of a resource key as seen from a provider's owner.
///
/// Uses the same value rule as [`BoundResourceStream`], evaluated at the
/// provider's current owner. While the provider has no owner the stream is
/// silent: nothing is delivered, not even to new subscribers.
///
/// While at least one subscriber exists, the stream watches the provider's
/// owner notification and the current owner's resource and theme
/// notifications. When the owner changes, the stream moves its registrations
/// from the old owner to the new one and, if there is a new owner, pushes the
/// value resolved there.
///
/// [`BoundResourceStream`]: crate::BoundResourceStream
#[derive(Clone)]
pub struct FloatingResourceStream {
    inner: Rc<FloatingInner>,
}

struct FloatingInner {
    provider: Rc<dyn ResourceProvider>,
    key: ResourceKey,
    converter: Option<Converter>,
    subscribers: SubscriberSet,
    owner_listener: Cell<Option<ListenerId>>,
    owner: RefCell<Option<OwnerAttachment>>,
}

struct OwnerAttachment {
    host: Rc<dyn ResourceHost>,
    attachment: HostAttachment,
}

impl FloatingResourceStream {
    /// Creates a stream for `key` at whatever host owns `provider`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidArgument`] if `key` is empty.
    pub fn new(
        provider: Rc<dyn ResourceProvider>,
        key: impl Into<ResourceKey>,
    ) -> Result<Self, ResourceError> {
        Self::build(provider, key.into(), None)
    }

    /// Creates a stream whose values pass through `converter`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidArgument`] if `key` is empty.
    pub fn with_converter(
        provider: Rc<dyn ResourceProvider>,
        key: impl Into<ResourceKey>,
        converter: impl Fn(Resource) -> Result<Resource, ConvertError> + 'static,
    ) -> Result<Self, ResourceError> {
        let converter: Converter = Rc::new(converter);
        Self::build(provider, key.into(), Some(converter))
    }

    fn build(
        provider: Rc<dyn ResourceProvider>,
        key: ResourceKey,
        converter: Option<Converter>,
    ) -> Result<Self, ResourceError> {
        key.validate()?;
        Ok(Self {
            inner: Rc::new(FloatingInner {
                provider,
                key,
                converter,
                subscribers: SubscriberSet::default(),
                owner_listener: Cell::new(None),
                owner: RefCell::new(None),
            }),
        })
    }

    /// Returns the key this stream resolves.
    #[must_use]
    pub fn key(&self) -> &ResourceKey {
        &self.inner.key
    }

    /// Returns the number of current subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Returns `true` while the stream watches its provider.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.owner_listener.get().is_some()
    }

    /// Computes the current value without pushing it.
    ///
    /// Returns `None` while the provider has no owner.
    pub fn current(&self) -> Option<StreamItem> {
        self.inner.compute()
    }

    /// Subscribes `observer`. If the provider has an owner, the current value
    /// is delivered before returning.
    pub fn subscribe(&self, observer: impl FnMut(StreamItem) + 'static) -> Subscription {
        let (id, first) = self.inner.subscribers.insert(observer);
        if first {
            self.inner.activate();
        }
        self.inner.subscribers.replay(id, || self.inner.compute());
        let source: Rc<dyn Unsubscribe> = self.inner.clone();
        Subscription::new(source, id)
    }
}

impl FloatingInner {
    fn compute(&self) -> Option<StreamItem> {
        let owner = self.provider.owner()?;
        Some(resolve_item(&*owner, &self.key, self.converter.as_ref()))
    }

    fn activate(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let id = self.provider.owner_changed().add_listener(move || {
            if let Some(inner) = weak.upgrade() {
                inner.owner_changed();
            }
        });
        self.owner_listener.set(Some(id));
        self.attach_owner(self.provider.owner());
        tracing::debug!(resource.key = %self.key, "floating resource stream activated");
    }

    fn deactivate(&self) {
        if let Some(id) = self.owner_listener.take() {
            self.provider.owner_changed().remove_listener(id);
            self.detach_owner();
            tracing::debug!(resource.key = %self.key, "floating resource stream deactivated");
        }
    }

    fn owner_changed(self: &Rc<Self>) {
        self.detach_owner();
        let owner = self.provider.owner();
        let attached = owner.is_some();
        self.attach_owner(owner);
        tracing::debug!(resource.key = %self.key, attached, "resource provider owner changed");
        if attached {
            self.publish();
        }
    }

    fn attach_owner(self: &Rc<Self>, owner: Option<Rc<dyn ResourceHost>>) {
        let attached = owner.map(|host| {
            let weak = Rc::downgrade(self);
            let attachment = HostAttachment::attach(&*host, move || {
                if let Some(inner) = weak.upgrade() {
                    inner.publish();
                }
            });
            OwnerAttachment { host, attachment }
        });
        *self.owner.borrow_mut() = attached;
    }

    fn detach_owner(&self) {
        let previous = self.owner.borrow_mut().take();
        if let Some(OwnerAttachment { host, attachment }) = previous {
            attachment.detach(&*host);
        }
    }

    fn publish(&self) {
        self.subscribers.publish(|| self.compute());
    }
}

impl Unsubscribe for FloatingInner {
    fn unsubscribe(&self, id: SubscriberId) {
        if self.subscribers.remove(id) {
            self.deactivate();
        }
    }
}

impl fmt::Debug for FloatingResourceStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloatingResourceStream")
            .field("key", &self.inner.key)
            .field("converter", &self.inner.converter.is_some())
            .field("subscribers", &self.subscriber_count())
            .field("active", &self.is_active())
            .field("owner_attached", &self.inner.owner.borrow().is_some())
            .finish_non_exhaustive()
    }
}

/// Opens a [`FloatingResourceStream`] for `key` at the owner of `provider`.
///
/// # Errors
///
/// [`ResourceError::InvalidArgument`] if `key` is empty.
pub fn open_floating_resource_stream(
    provider: Rc<dyn ResourceProvider>,
    key: impl Into<ResourceKey>,
    converter: Option<Converter>,
) -> Result<FloatingResourceStream, ResourceError> {
    FloatingResourceStream::build(provider, key.into(), converter)
}
