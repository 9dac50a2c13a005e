// Authentication: login, account registration and the in-memory session
// that every authenticated action receives.

use crate::api::{ApiRequest, Reply, Transport};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

/// Which menu the operator asked for. The server decides what the token
/// is actually allowed to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Professor,
    Student,
}

impl Role {
    fn register_path(self) -> &'static str {
        match self {
            Role::Professor => "/auth/register/professor",
            Role::Student => "/auth/register/student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Professor => f.write_str("Professor"),
            Role::Student => f.write_str("Student"),
        }
    }
}

/// Token and user record handed out by a successful login. Lives only as
/// long as the role menu loop that owns it.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub user: Value,
    /// Role name reported by the server, e.g. `PROFESSOR_FREE`.
    pub server_role: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of both registration endpoints.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize, Debug)]
struct LoginBody {
    token: Option<String>,
    #[serde(default)]
    user: Value,
    role: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum LoginOutcome {
    Authenticated(Session),
    /// The server refused; `text` is its response body.
    Denied { status: u16, text: String },
}

impl LoginOutcome {
    pub fn into_session(self) -> Option<Session> {
        match self {
            LoginOutcome::Authenticated(session) => Some(session),
            LoginOutcome::Denied { .. } => None,
        }
    }
}

/// POST the credentials to `/auth/login`.
pub fn login(
    transport: &dyn Transport,
    role: Role,
    credentials: &Credentials,
) -> Result<LoginOutcome, ApiError> {
    let request = ApiRequest::post("/auth/login").json(credentials)?;
    let response = transport.send(&request)?;
    if !response.is_success() {
        warn!(%role, status = response.status, "login rejected");
        return Ok(LoginOutcome::Denied {
            status: response.status,
            text: response.text,
        });
    }

    // A 2xx body without a token gives us nothing to authenticate with.
    let body = response.decode::<LoginBody>().ok();
    match body {
        Some(LoginBody {
            token: Some(token),
            user,
            role: server_role,
        }) => {
            info!(%role, server_role = server_role.as_deref().unwrap_or("-"), "logged in");
            Ok(LoginOutcome::Authenticated(Session {
                token,
                role,
                user,
                server_role,
            }))
        }
        _ => Ok(LoginOutcome::Denied {
            status: response.status,
            text: response.text,
        }),
    }
}

/// Create a professor or student account.
pub fn register(
    transport: &dyn Transport,
    role: Role,
    account: &Account,
) -> Result<Reply<Value>, ApiError> {
    let request = ApiRequest::post(role.register_path()).json(account)?;
    transport
        .send(&request)?
        .into_reply(|resp| Ok(resp.payload()))
}

/// Fetch the user record behind the session token.
pub fn current_user(
    transport: &dyn Transport,
    session: &Session,
) -> Result<Reply<Value>, ApiError> {
    let request = ApiRequest::get("/auth/me").bearer(&session.token);
    transport
        .send(&request)?
        .into_reply(|resp| Ok(resp.payload()))
}
