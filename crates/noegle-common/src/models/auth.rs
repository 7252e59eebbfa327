use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// JWT claims. Wire casing is camelCase (`isAdmin`, `isValid`) so tokens
/// stay interoperable with other verifiers sharing the signing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub email: String,
    pub is_admin: bool,
    pub is_valid: bool,
    pub exp: i64,
    pub iat: i64,
}
