//! Field-presence checks over anything that can answer "is this key here?".
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::car::Car;
use crate::profile::{Profile, ProfileUpdate};
use crate::shape::{Shape, TAG_FIELD};

pub trait HasKeys {
    fn has_key(&self, key: &str) -> bool;
}

/// True iff every key is present. Stops at the first miss; an empty key list
/// is trivially valid.
pub fn validate_keys<T, I>(obj: &T, keys: I) -> bool
where
    T: HasKeys + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    first_missing_key(obj, keys).is_none()
}

/// The first key, in input order, that `obj` does not have.
pub fn first_missing_key<T, I>(obj: &T, keys: I) -> Option<I::Item>
where
    T: HasKeys + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    keys.into_iter().find(|key| !obj.has_key(key.as_ref()))
}

// ————————————————————————————————————————————————————————————————————————————
// MAPS
// ————————————————————————————————————————————————————————————————————————————

impl HasKeys for Map<String, Value> {
    fn has_key(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

/// Non-objects have no keys.
impl HasKeys for Value {
    fn has_key(&self, key: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(key))
    }
}

impl<V> HasKeys for IndexMap<String, V> {
    fn has_key(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl<V> HasKeys for BTreeMap<String, V> {
    fn has_key(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl<V, S: BuildHasher> HasKeys for HashMap<String, V, S> {
    fn has_key(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl<T: HasKeys + ?Sized> HasKeys for &T {
    fn has_key(&self, key: &str) -> bool {
        (**self).has_key(key)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RECORDS
// ————————————————————————————————————————————————————————————————————————————

impl HasKeys for Profile {
    fn has_key(&self, key: &str) -> bool {
        Profile::FIELDS.contains(&key)
    }
}

impl HasKeys for ProfileUpdate {
    fn has_key(&self, key: &str) -> bool {
        match key {
            "name" => self.name.is_some(),
            "age" => self.age.is_some(),
            "email" => self.email.is_some(),
            _ => false,
        }
    }
}

impl HasKeys for Car {
    fn has_key(&self, key: &str) -> bool {
        Car::FIELDS.contains(&key)
    }
}

impl HasKeys for Shape {
    fn has_key(&self, key: &str) -> bool {
        if key == TAG_FIELD {
            return true;
        }
        match self {
            Shape::Circle { .. } => key == "radius",
            Shape::Rectangle { .. } => matches!(key, "height" | "width"),
        }
    }
}
