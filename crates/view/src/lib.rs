#![forbid(unsafe_code)]
#![deny(
    missing_copy_implementations,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

/*!
# A mergeable, default-on-miss container for view data

[`View`] accumulates the key-value data a handler wants to hand to a
template. It behaves like a json object with two conveniences that come up
constantly in server-rendered apps:

* looking up a missing key is not an error. [`View::get`] returns an empty
  view instead, so optional chains are always safe to write:

```
use trellis_view::view;

let view = view! { "foo": "bar", "bar": { "bat": "baz" } };
assert_eq!(view.get("foo"), "bar");
assert_eq!(view.get("bar").get("bat"), "baz");
assert!(view.get("baz").is_empty()); // no panic
assert!(view.get("baz").get("bat").is_empty()); // chains keep going
```

* views merge without mutating either operand. [`View::merge`] (also
  available as `+`) returns a new view seeded from the left operand and
  overlaid with the right operand's entries:

```
use trellis_view::view;

let a = view! { "foo": "bar", "bar": { "bat": "baz" } };
let b = view! { "bar": "baz" };
let merged = &a + &b;
assert_eq!(merged, view! { "foo": "bar", "bar": "baz" });
assert_eq!(a.get("bar").get("bat"), "baz"); // a is intact
assert_eq!(b.get("bar"), "baz"); // so is b
```

A merge can only be initiated from a [`View`]. There is deliberately no
`Add` impl with a plain [`serde_json::Map`] on the left, so the type system
rules out the reversed merge instead of failing at runtime.
*/

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Index, IndexMut},
};

/// A mergeable mapping from string keys to json values.
///
/// A `View` is usually an object, and all of the container operations
/// treat it as one. Because [`View::get`] wraps whatever it finds, a view
/// can also carry a scalar leaf value. Scalar views compare against the
/// value they carry and contribute nothing to merges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct View(Value);

static EMPTY: Lazy<Value> = Lazy::new(|| Value::Object(Map::new()));

impl View {
    /// Constructs a new, empty view.
    pub fn new() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Returns the value stored under `key`, wrapped in a new `View`.
    ///
    /// Nested objects read back as views, so lookups chain. A missing key
    /// (or a lookup on a scalar view) returns an empty view rather than
    /// failing. The stored value is cloned; the receiver is never mutated
    /// by a read.
    pub fn get(&self, key: &str) -> View {
        match self.0.as_object().and_then(|map| map.get(key)) {
            Some(value) => Self(value.clone()),
            None => Self::new(),
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Anything serde-serializable can be stored. If the receiver was a
    /// scalar view, it becomes a fresh object containing only this entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) {
        let value = serde_json::to_value(value).expect("could not serialize view value");
        match &mut self.0 {
            Value::Object(map) => {
                map.insert(key.into(), value);
            }
            other => {
                let mut map = Map::new();
                map.insert(key.into(), value);
                *other = Value::Object(map);
            }
        }
    }

    /// Chainable [`View::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.set(key, value);
        self
    }

    /// Returns a new view containing this view's entries overlaid with
    /// `other`'s entries. Neither operand is mutated.
    pub fn merge(&self, other: &View) -> View {
        self.merge_all([other])
    }

    /// Returns a new view seeded from this view's entries and overlaid
    /// with each of `others`' entries, in order. Later entries win.
    /// No operand is mutated; scalar operands contribute nothing.
    pub fn merge_all<'a>(&self, others: impl IntoIterator<Item = &'a View>) -> View {
        let mut map = self.0.as_object().cloned().unwrap_or_default();
        for other in others {
            if let Some(entries) = other.0.as_object() {
                for (key, value) in entries {
                    map.insert(key.clone(), value.clone());
                }
            }
        }
        Self(Value::Object(map))
    }

    /// Predicate for the presence of `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.as_object().is_some_and(|map| map.contains_key(key))
    }

    /// The number of entries. Scalar views have no entries.
    pub fn len(&self) -> usize {
        self.0.as_object().map_or(0, Map::len)
    }

    /// True if this view has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over this view's entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.as_object().into_iter().flatten()
    }

    /// Borrows the underlying [`Value`].
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Unwraps this view into its underlying [`Value`].
    pub fn into_value(self) -> Value {
        self.0
    }

    /// If this is a scalar view carrying a string, borrows it.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Borrows the underlying object entries, if this view is an object.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<Value> for View {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Map<String, Value>> for View {
    fn from(map: Map<String, Value>) -> Self {
        Self(Value::Object(map))
    }
}

impl FromIterator<(String, Value)> for View {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(Value::Object(iter.into_iter().collect()))
    }
}

impl From<View> for Value {
    fn from(view: View) -> Self {
        view.0
    }
}

/// Indexed read access, the second accessor form over the same entries as
/// [`View::get`]. A missing key borrows a shared empty object. Unlike
/// [`View::get`], continuing to index into the returned [`Value`] follows
/// `serde_json` semantics.
impl Index<&str> for View {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.0
            .as_object()
            .and_then(|map| map.get(key))
            .unwrap_or(&EMPTY)
    }
}

/// Indexed write access. Indexing a missing key inserts a null entry, so
/// `view["key"] = value` always succeeds, mirroring [`View::set`].
impl IndexMut<&str> for View {
    fn index_mut(&mut self, key: &str) -> &mut Value {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        self.0
            .as_object_mut()
            .expect("view was just made an object")
            .entry(key)
            .or_insert(Value::Null)
    }
}

impl Add<&View> for &View {
    type Output = View;

    fn add(self, other: &View) -> View {
        self.merge(other)
    }
}

impl Add<&View> for View {
    type Output = View;

    fn add(self, other: &View) -> View {
        self.merge(other)
    }
}

impl Add for View {
    type Output = View;

    fn add(self, other: View) -> View {
        self.merge(&other)
    }
}

impl Add<Map<String, Value>> for View {
    type Output = View;

    fn add(self, other: Map<String, Value>) -> View {
        self.merge(&other.into())
    }
}

impl PartialEq<Value> for View {
    fn eq(&self, other: &Value) -> bool {
        self.0 == *other
    }
}

impl PartialEq<&str> for View {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_str() == Some(*other)
    }
}

impl PartialEq<str> for View {
    fn eq(&self, other: &str) -> bool {
        self.0.as_str() == Some(other)
    }
}

impl PartialEq<String> for View {
    fn eq(&self, other: &String) -> bool {
        self.0.as_str() == Some(other.as_str())
    }
}

#[doc(hidden)]
pub use serde_json::json;

/**
Builds a [`View`] with `serde_json::json!` object syntax.

```
use trellis_view::view;

let view = view! { "title": "home", "counts": [1, 2, 3] };
assert_eq!(view.get("title"), "home");
```

`view! {}` is an empty view.
*/
#[macro_export]
macro_rules! view {
    () => { $crate::View::new() };
    ($($entries:tt)+) => { $crate::View::from($crate::json!({ $($entries)+ })) };
}
