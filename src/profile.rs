//! Shallow profile updates.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub email: String,
}

/// Partial overlay for a [`Profile`]. `None` (absent or `null` on the wire)
/// keeps the original field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Profile {
    pub const FIELDS: [&'static str; 3] = ["name", "age", "email"];
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.email.is_none()
    }

    /// An update that replaces every field.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: Some(profile.name.clone()),
            age: Some(profile.age),
            email: Some(profile.email.clone()),
        }
    }
}

/// New profile with `updates` overlaid on `profile`. Neither input changes.
pub fn update_profile(profile: &Profile, updates: &ProfileUpdate) -> Profile {
    Profile {
        name: updates.name.clone().unwrap_or_else(|| profile.name.clone()),
        age: updates.age.unwrap_or(profile.age),
        email: updates.email.clone().unwrap_or_else(|| profile.email.clone()),
    }
}

/// Object-spread over untyped records: base keys keep their position, keys
/// only in `overlay` are appended in overlay order. Values are replaced whole.
pub fn shallow_merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut out = base.clone();
    for (k, v) in overlay {
        // `insert` on an existing key keeps its slot under preserve_order
        out.insert(k.clone(), v.clone());
    }
    out
}
