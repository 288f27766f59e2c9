// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Theme dictionary scenarios.
//!
//! Each test builds a themed container with a child "border" and follows a
//! bound stream on the border's background while the container's theme
//! changes.

use std::rc::Rc;

use understory_resource::{
    BoundResourceStream, ElementTheme, Resource, ResourceDictionary, ResourceDictionaryBuilder,
    ResourceKey, Subscription, resolve_resource,
};

mod common;

use common::{Element, Log, recorder, values};

const DEMO_BACKGROUND: ResourceKey = ResourceKey::new("DemoBackground");
const TEST_COLOR: ResourceKey = ResourceKey::new("TestColor");

#[derive(Copy, Clone, Debug, PartialEq)]
enum Color {
    White,
    Black,
    Pink,
    Red,
}

fn dict(key: ResourceKey, color: Color) -> ResourceDictionary {
    ResourceDictionaryBuilder::new().set(key, color).build()
}

fn light_dark(key: ResourceKey) -> ResourceDictionaryBuilder {
    ResourceDictionaryBuilder::new()
        .theme_dictionary(ElementTheme::DARK, dict(key.clone(), Color::Black))
        .theme_dictionary(ElementTheme::LIGHT, dict(key, Color::White))
}

fn watch(host: &Rc<Element>, key: ResourceKey) -> (Log, Subscription) {
    let stream = BoundResourceStream::new(host.clone(), key).unwrap();
    let (log, sink) = recorder();
    let sub = stream.subscribe(sink);
    (log, sub)
}

/// Watches `key` at `host`, where the stored value is itself a key that is
/// resolved from `scope`, the element whose dictionary holds the reference.
fn watch_reference(
    host: &Rc<Element>,
    scope: &Rc<Element>,
    key: ResourceKey,
) -> (Log, Subscription) {
    let scope = Rc::downgrade(scope);
    let stream = BoundResourceStream::with_converter(host.clone(), key, move |value| {
        let Some(reference) = value.downcast_ref::<ResourceKey>() else {
            return Ok(value);
        };
        let Some(scope) = scope.upgrade() else {
            return Ok(Resource::Unset);
        };
        Ok(resolve_resource(&*scope, reference).unwrap_or_default())
    })
    .unwrap();
    let (log, sink) = recorder();
    let sub = stream.subscribe(sink);
    (log, sub)
}

fn last(log: &Log) -> Resource {
    values(log).pop().unwrap_or_default()
}

#[test]
fn value_updates_when_container_theme_changes() {
    let container = Element::themed_root(
        "container",
        ElementTheme::LIGHT,
        light_dark(DEMO_BACKGROUND).build(),
    );
    let border = Element::child(&container, "border", ResourceDictionary::default());
    let (log, _sub) = watch(&border, DEMO_BACKGROUND);
    assert_eq!(last(&log), Resource::value(Color::White));

    container.set_theme(Some(ElementTheme::DARK));
    assert_eq!(last(&log), Resource::value(Color::Black));
}

#[test]
fn inner_theme_dictionaries_follow_inherited_theme() {
    let container = Element::themed_root(
        "container",
        ElementTheme::LIGHT,
        ResourceDictionary::default(),
    );
    let border = Element::child(&container, "border", light_dark(DEMO_BACKGROUND).build());
    let (log, _sub) = watch(&border, DEMO_BACKGROUND);
    assert_eq!(last(&log), Resource::value(Color::White));

    container.set_theme(Some(ElementTheme::DARK));
    assert_eq!(last(&log), Resource::value(Color::Black));
}

#[test]
fn inner_resource_reaches_parent_theme_dictionaries() {
    let container = Element::themed_root(
        "container",
        ElementTheme::LIGHT,
        light_dark(TEST_COLOR).build(),
    );
    let border = Element::child(
        &container,
        "border",
        ResourceDictionaryBuilder::new()
            .set(DEMO_BACKGROUND, TEST_COLOR)
            .build(),
    );
    let (log, _sub) = watch_reference(&border, &border, DEMO_BACKGROUND);
    assert_eq!(last(&log), Resource::value(Color::White));

    container.set_theme(Some(ElementTheme::DARK));
    assert_eq!(last(&log), Resource::value(Color::Black));
}

#[test]
fn themed_entry_can_use_plain_entries_of_same_dictionary() {
    const COLOR_1: ResourceKey = ResourceKey::new("TestColor1");
    const COLOR_2: ResourceKey = ResourceKey::new("TestColor2");

    let container = Element::themed_root(
        "container",
        ElementTheme::LIGHT,
        ResourceDictionaryBuilder::new()
            .set(COLOR_1, Color::Black)
            .set(COLOR_2, Color::White)
            .theme_dictionary(
                ElementTheme::DARK,
                ResourceDictionaryBuilder::new()
                    .set(DEMO_BACKGROUND, COLOR_1)
                    .build(),
            )
            .theme_dictionary(
                ElementTheme::LIGHT,
                ResourceDictionaryBuilder::new()
                    .set(DEMO_BACKGROUND, COLOR_2)
                    .build(),
            )
            .build(),
    );
    let border = Element::child(&container, "border", ResourceDictionary::default());
    let (log, _sub) = watch_reference(&border, &container, DEMO_BACKGROUND);
    assert_eq!(last(&log), Resource::value(Color::White));

    container.set_theme(Some(ElementTheme::DARK));
    assert_eq!(last(&log), Resource::value(Color::Black));
}

#[test]
fn inner_dictionary_does_not_affect_parent_resources() {
    // The brush lives in the container, so its color reference is resolved
    // there; the border's themed colors are out of that scope.
    let container = Element::themed_root(
        "container",
        ElementTheme::LIGHT,
        ResourceDictionaryBuilder::new()
            .set(TEST_COLOR, Color::Red)
            .set(DEMO_BACKGROUND, TEST_COLOR)
            .build(),
    );
    let border = Element::child(&container, "border", light_dark(TEST_COLOR).build());
    let (log, _sub) = watch_reference(&border, &container, DEMO_BACKGROUND);
    assert_eq!(last(&log), Resource::value(Color::Red));

    container.set_theme(Some(ElementTheme::DARK));
    assert_eq!(last(&log), Resource::value(Color::Red));
}

#[test]
fn custom_theme_can_be_defined_in_theme_dictionaries() {
    let custom = ElementTheme::new("Custom");
    let container = Element::themed_root(
        "container",
        ElementTheme::LIGHT,
        light_dark(DEMO_BACKGROUND)
            .theme_dictionary(custom.clone(), dict(DEMO_BACKGROUND, Color::Pink))
            .build(),
    );
    let border = Element::child(&container, "border", ResourceDictionary::default());
    let (log, _sub) = watch(&border, DEMO_BACKGROUND);

    container.set_theme(Some(custom));
    assert_eq!(last(&log), Resource::value(Color::Pink));
}

#[test]
fn custom_theme_falls_back_to_inherited_theme() {
    let container = Element::themed_root(
        "container",
        ElementTheme::LIGHT,
        light_dark(DEMO_BACKGROUND).build(),
    );
    let border = Element::child(&container, "border", ResourceDictionary::default());
    let (log, _sub) = watch(&border, DEMO_BACKGROUND);

    container.set_theme(Some(ElementTheme::with_inherit("Custom", ElementTheme::DARK)));
    assert_eq!(last(&log), Resource::value(Color::Black));
    assert_eq!(
        values(&log),
        [Resource::value(Color::White), Resource::value(Color::Black)]
    );
}
