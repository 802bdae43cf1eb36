use std::collections::HashMap;

use subtle::ConstantTimeEq;

pub const AUTH_QUERY_PARAM: &str = "lamda-auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureReason {
    MissingCredentials,
    InvalidCredentials,
    SecretNotConfigured,
}

/// Checks the `lamda-auth` query parameter against the configured secret.
///
/// Comparison is exact and case-sensitive. An empty configured secret rejects
/// every request.
pub fn authorize(query: &HashMap<String, String>, expected: &str) -> Result<(), AuthFailureReason> {
    if expected.is_empty() {
        return Err(AuthFailureReason::SecretNotConfigured);
    }

    let Some(provided) = query.get(AUTH_QUERY_PARAM) else {
        return Err(AuthFailureReason::MissingCredentials);
    };

    if provided.as_bytes().ct_eq(expected.as_bytes()).into() {
        Ok(())
    } else {
        Err(AuthFailureReason::InvalidCredentials)
    }
}
