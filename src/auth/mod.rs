/// Authentication module
///
/// Two independent schemes, matching the two API surfaces:
/// - `api_key`: header token checked against the `api_tokens` table,
///   guarding the public player endpoints
/// - `session`: session cookie backed by the `sessions` table, guarding
///   the admin endpoints
pub mod api_key;
pub mod secrets;
pub mod session;

pub use api_key::{require_api_key, ApiKeyState, API_KEY_HEADER};
pub use session::{require_admin_session, AdminContext, SessionState, SESSION_COOKIE};
