//! Small record utilities: shape areas, profile updates, car ages and key
//! presence checks, plus the input pipeline the `record-kit` CLI runs them
//! through.
pub mod car;
pub mod cli;
pub mod error;
pub mod jq_exec;
pub mod keys;
pub mod path_de;
pub mod profile;
pub mod shape;

pub use car::{Car, Clock, FixedYear, SystemClock};
pub use error::{DecodeError, Error, Result};
pub use keys::{first_missing_key, validate_keys, HasKeys};
pub use profile::{shallow_merge, update_profile, Profile, ProfileUpdate};
pub use shape::{calculate_shape_area, round_area, Shape, ShapeError};
