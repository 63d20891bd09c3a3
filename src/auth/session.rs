use actix_session::Session;

use crate::errors::AppError;
use crate::workflow::StaffRole;

/// The authenticated staff member, as recorded in the session cookie at
/// login time.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: StaffRole,
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

/// Resolve the current user from the session, or `Unauthorized`.
/// A session carrying an unparseable role is treated as unauthenticated
/// rather than trusted.
pub fn current_user(session: &Session) -> Result<CurrentUser, AppError> {
    let id = get_user_id(session).ok_or(AppError::Unauthorized)?;
    let username = session
        .get::<String>("username")
        .unwrap_or(None)
        .ok_or(AppError::Unauthorized)?;
    let role = session
        .get::<String>("staff_role")
        .unwrap_or(None)
        .ok_or(AppError::Unauthorized)?
        .parse::<StaffRole>()
        .map_err(|_| AppError::Unauthorized)?;

    Ok(CurrentUser { id, username, role })
}

/// Store the login in the session. Errors here mean the cookie backend
/// rejected the value, which should not happen for these types.
pub fn store_login(session: &Session, id: i64, username: &str, role: StaffRole) {
    let _ = session.insert("user_id", id);
    let _ = session.insert("username", username);
    let _ = session.insert("staff_role", role.as_str());
}
