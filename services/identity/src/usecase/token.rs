use chrono::Utc;

/// Issue the opaque session token handed out on login and unlock.
///
/// Not a signed credential: nothing in the service validates it later.
pub fn issue_session_token() -> String {
    format!("token_{}", Utc::now().timestamp_millis())
}
