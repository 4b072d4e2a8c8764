//! JWT claims model
//!
//! A claims type implements [`ClaimsModel`] to tell the facade which
//! [`ClaimsShape`] its tokens must satisfy. The same shape is applied when
//! encoding and, after signature verification, when decoding.

mod datetime;
mod registered;
mod shape;

pub use datetime::JwtDatetime;
pub use registered::{Audience, JwtClaims};
pub use shape::{check_times, ClaimsShape, FieldKind};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// A claims type usable with the JWT facade
///
/// The default shape is the registered claims, all optional. Application
/// types override [`ClaimsModel::shape`] to require claims or describe
/// custom fields:
///
/// ```
/// use cryypt_jws::claims::{ClaimsModel, ClaimsShape, FieldKind, JwtClaims};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct SessionClaims {
///     #[serde(flatten)]
///     registered: JwtClaims,
///     user_id: String,
/// }
///
/// impl ClaimsModel for SessionClaims {
///     fn shape() -> ClaimsShape {
///         ClaimsShape::registered()
///             .require("sub")
///             .field("user_id", FieldKind::String)
///     }
/// }
/// ```
pub trait ClaimsModel: Serialize + DeserializeOwned {
    /// Structural schema for this claims type
    fn shape() -> ClaimsShape {
        ClaimsShape::registered()
    }
}

impl ClaimsModel for Map<String, Value> {}
