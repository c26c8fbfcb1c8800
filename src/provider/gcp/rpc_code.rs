//! Canonical `google.rpc.Code` values.
//!
//! The REST API reports errors with both an HTTP status and a `status`
//! enum name. Callers branch on the canonical numeric code (the same value
//! the gRPC client library reports), so both forms are folded into it here.
//!
//! Reference: https://github.com/googleapis/googleapis/blob/master/google/rpc/code.proto

/// Numeric code for a `google.rpc.Code` enum name
pub fn from_status_name(name: &str) -> Option<i32> {
    let code = match name {
        "OK" => 0,
        "CANCELLED" => 1,
        "UNKNOWN" => 2,
        "INVALID_ARGUMENT" => 3,
        "DEADLINE_EXCEEDED" => 4,
        "NOT_FOUND" => 5,
        "ALREADY_EXISTS" => 6,
        "PERMISSION_DENIED" => 7,
        "RESOURCE_EXHAUSTED" => 8,
        "FAILED_PRECONDITION" => 9,
        "ABORTED" => 10,
        "OUT_OF_RANGE" => 11,
        "UNIMPLEMENTED" => 12,
        "INTERNAL" => 13,
        "UNAVAILABLE" => 14,
        "DATA_LOSS" => 15,
        "UNAUTHENTICATED" => 16,
        _ => return None,
    };
    Some(code)
}

/// Canonical code implied by an HTTP status alone
pub fn from_http_status(status: u16) -> i32 {
    match status {
        200..=299 => 0,
        400 => 3,
        401 => 16,
        403 => 7,
        404 => 5,
        409 => 10,
        416 => 11,
        429 => 8,
        499 => 1,
        501 => 12,
        503 => 14,
        504 => 4,
        500..=599 => 13,
        _ => 2,
    }
}

/// Resolve the code for an error response, preferring the explicit status name
pub fn resolve(status_name: Option<&str>, http_status: u16) -> i32 {
    status_name
        .and_then(from_status_name)
        .unwrap_or_else(|| from_http_status(http_status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_name_wins_over_http_status() {
        // 409 alone maps to ABORTED, but the body can say ALREADY_EXISTS
        assert_eq!(resolve(Some("ALREADY_EXISTS"), 409), 6);
        assert_eq!(resolve(Some("NOT_FOUND"), 404), 5);
    }

    #[test]
    fn test_http_fallback() {
        assert_eq!(resolve(None, 403), 7);
        assert_eq!(resolve(Some("NOT_A_CODE"), 401), 16);
        assert_eq!(resolve(None, 502), 13);
        assert_eq!(resolve(None, 418), 2);
    }
}
