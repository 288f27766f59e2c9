// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resource streams anchored to a tree node.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use crate::error::{ConvertError, ResourceError};
use crate::host::ResourceHost;
use crate::key::ResourceKey;
use crate::observable::{
    Converter, HostAttachment, StreamItem, SubscriberId, SubscriberSet, Subscription, Unsubscribe,
    resolve_item,
};
use crate::value::Resource;

/// The live value of a resource key as seen from a host.
///
/// Every new subscriber immediately receives the current value, which may be
/// [`Resource::Unset`]. While at least one subscriber exists, the stream is
/// attached to the host's resource notification and, if the host has a theme
/// facet, to its theme notification; each notification recomputes the value
/// and pushes it to all subscribers in subscription order. Removing the last
/// subscriber detaches the stream.
///
/// The value rule is [`resolve_resource`](crate::resolve_resource) followed by
/// the optional converter.
///
/// Cloning the handle shares the stream.
#[derive(Clone)]
pub struct BoundResourceStream {
    inner: Rc<BoundInner>,
}

struct BoundInner {
    host: Rc<dyn ResourceHost>,
    key: ResourceKey,
    converter: Option<Converter>,
    subscribers: SubscriberSet,
    attachment: RefCell<Option<HostAttachment>>,
}

impl BoundResourceStream {
    /// Creates a stream for `key` at `host`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidArgument`] if `key` is empty.
    pub fn new(host: Rc<dyn ResourceHost>, key: impl Into<ResourceKey>) -> Result<Self, ResourceError> {
        Self::build(host, key.into(), None)
    }

    /// Creates a stream whose values pass through `converter`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InvalidArgument`] if `key` is empty.
    pub fn with_converter(
        host: Rc<dyn ResourceHost>,
        key: impl Into<ResourceKey>,
        converter: impl Fn(Resource) -> Result<Resource, ConvertError> + 'static,
    ) -> Result<Self, ResourceError> {
        let converter: Converter = Rc::new(converter);
        Self::build(host, key.into(), Some(converter))
    }

    fn build(
        host: Rc<dyn ResourceHost>,
        key: ResourceKey,
        converter: Option<Converter>,
    ) -> Result<Self, ResourceError> {
        key.validate()?;
        Ok(Self {
            inner: Rc::new(BoundInner {
                host,
                key,
                converter,
                subscribers: SubscriberSet::default(),
                attachment: RefCell::new(None),
            }),
        })
    }

    /// Returns the key this stream resolves.
    #[must_use]
    pub fn key(&self) -> &ResourceKey {
        &self.inner.key
    }

    /// Returns the host this stream is anchored to.
    #[must_use]
    pub fn host(&self) -> &Rc<dyn ResourceHost> {
        &self.inner.host
    }

    /// Returns the number of current subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Returns `true` while the stream is attached to its host.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.attachment.borrow().is_some()
    }

    /// Computes the current value without pushing it.
    pub fn current(&self) -> StreamItem {
        self.inner.compute()
    }

    /// Subscribes `observer`, delivering the current value to it before
    /// returning.
    pub fn subscribe(&self, observer: impl FnMut(StreamItem) + 'static) -> Subscription {
        let (id, first) = self.inner.subscribers.insert(observer);
        if first {
            self.inner.activate();
        }
        self.inner
            .subscribers
            .replay(id, || Some(self.inner.compute()));
        let source: Rc<dyn Unsubscribe> = self.inner.clone();
        Subscription::new(source, id)
    }
}

impl BoundInner {
    fn compute(&self) -> StreamItem {
        resolve_item(&*self.host, &self.key, self.converter.as_ref())
    }

    fn activate(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let attachment = HostAttachment::attach(&*self.host, move || {
            if let Some(inner) = weak.upgrade() {
                inner.publish();
            }
        });
        *self.attachment.borrow_mut() = Some(attachment);
        tracing::debug!(resource.key = %self.key, "resource stream activated");
    }

    fn deactivate(&self) {
        let attachment = self.attachment.borrow_mut().take();
        if let Some(attachment) = attachment {
            attachment.detach(&*self.host);
            tracing::debug!(resource.key = %self.key, "resource stream deactivated");
        }
    }

    fn publish(&self) {
        self.subscribers.publish(|| Some(self.compute()));
    }
}

impl Unsubscribe for BoundInner {
    fn unsubscribe(&self, id: SubscriberId) {
        if self.subscribers.remove(id) {
            self.deactivate();
        }
    }
}

impl fmt::Debug for BoundResourceStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundResourceStream")
            .field("key", &self.inner.key)
            .field("converter", &self.inner.converter.is_some())
            .field("subscribers", &self.subscriber_count())
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

/// Opens a [`BoundResourceStream`] for `key` at `host`.
///
/// # Errors
///
/// [`ResourceError::InvalidArgument`] if `key` is empty.
pub fn open_resource_stream(
    host: Rc<dyn ResourceHost>,
    key: impl Into<ResourceKey>,
    converter: Option<Converter>,
) -> Result<BoundResourceStream, ResourceError> {
    BoundResourceStream::build(host, key.into(), converter)
}
