//! Area of a closed two-variant shape union.
//!
//! The enum is exhaustive at compile time; [`Shape::from_value`] is the
//! runtime guard for documents that arrive from outside the type system.
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::DecodeError;

/// Name of the discriminating field on the wire.
pub const TAG_FIELD: &str = "shape";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Circle { radius: f64 },
    Rectangle { height: f64, width: f64 },
}

#[derive(Deserialize)]
struct CirclePayload {
    radius: f64,
}

#[derive(Deserialize)]
struct RectanglePayload {
    height: f64,
    width: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("missing string tag field `shape`")]
    MissingTag,
    #[error("unknown shape `{tag}` (expected `circle` or `rectangle`)")]
    UnknownShape { tag: String },
    #[error("malformed `{tag}`: {source}")]
    Malformed {
        tag: &'static str,
        #[source]
        source: DecodeError,
    },
}

impl Shape {
    pub const TAGS: [&'static str; 2] = ["circle", "rectangle"];

    pub fn tag(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "circle",
            Shape::Rectangle { .. } => "rectangle",
        }
    }

    pub fn area(&self) -> f64 {
        match *self {
            Shape::Circle { radius } => PI * radius * radius,
            Shape::Rectangle { height, width } => height * width,
        }
    }

    /// Decode an external document, checking the tag before the payload so an
    /// unrecognized variant is reported as such rather than as a serde error.
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        let Value::Object(map) = value else {
            return Err(ShapeError::NotAnObject { found: kind_name(value) });
        };
        let tag = map
            .get(TAG_FIELD)
            .and_then(Value::as_str)
            .ok_or(ShapeError::MissingTag)?;
        let Some(tag) = Self::TAGS.into_iter().find(|known| *known == tag) else {
            return Err(ShapeError::UnknownShape { tag: tag.to_owned() });
        };
        // Payloads are decoded untagged so serde errors keep their field path.
        let decoded = match tag {
            "circle" => crate::path_de::from_value_with_path::<CirclePayload>(value)
                .map(|p| Shape::Circle { radius: p.radius }),
            _ => crate::path_de::from_value_with_path::<RectanglePayload>(value)
                .map(|p| Shape::Rectangle { height: p.height, width: p.width }),
        };
        decoded.map_err(|source| ShapeError::Malformed { tag, source })
    }

    pub fn from_json_str(src: &str) -> crate::error::Result<Self> {
        let value = crate::path_de::from_str_with_path::<Value>(src)?;
        Ok(Self::from_value(&value)?)
    }
}

/// Area of `shape`, unrounded.
pub fn calculate_shape_area(shape: &Shape) -> f64 {
    shape.area()
}

/// Most decimal places the CLI accepts; an `f64` carries about 17
/// significant digits.
pub const MAX_ROUND_PLACES: u32 = 17;

// 10^308 is the largest finite power of ten
const MAX_SCALE_EXPONENT: u32 = 308;

// at or above 2^52 every f64 is already an integer
const EXACT_INTEGER_LIMIT: f64 = 4_503_599_627_370_496.0;

/// Round half away from zero to `places` decimals. Display only.
///
/// Returns `area` unchanged when the requested precision exceeds what the
/// value can represent, so the result is never less precise than the input
/// and never non-finite for a finite input.
pub fn round_area(area: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places.min(MAX_SCALE_EXPONENT) as i32);
    let scaled = area * scale;
    if !scaled.is_finite() || scaled.abs() >= EXACT_INTEGER_LIMIT {
        return area;
    }
    scaled.round() / scale
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
