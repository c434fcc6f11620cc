use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::{jwt, middleware, password};
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

/// Registration body for both the JSON API and the HTML form.
/// Fields are optional so missing input maps to a 400/redirect instead of
/// an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub token: String,
}

/// POST /api/register
/// JSON variant: 201 with the session token (also set as the cookie),
/// 400 on missing fields, 409 on a duplicate username.
pub async fn register_api(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, pw) = validate(req)?;
    let (user_id, token) = create_user(&state, username, pw).await?;

    let jar = jar.add(middleware::session_cookie(token.clone()));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(RegisterResponse { user_id, token }),
    ))
}

/// POST /register
/// HTML form variant: errors redirect back to the index with an error
/// indicator instead of returning JSON; success sets the cookie and
/// redirects home.
pub async fn register_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(req): Form<RegisterRequest>,
) -> (CookieJar, Redirect) {
    let (username, pw) = match validate(req) {
        Ok(fields) => fields,
        Err(_) => return (jar, Redirect::to("/?error=Missing+fields")),
    };

    match create_user(&state, username, pw).await {
        Ok((_user_id, token)) => (
            jar.add(middleware::session_cookie(token)),
            Redirect::to("/"),
        ),
        Err(ApiError::Conflict(_)) => (jar, Redirect::to("/?error=User+exists")),
        Err(e) => {
            tracing::error!(error = %e, "Registration failed");
            (jar, Redirect::to("/?error=Registration+failed"))
        }
    }
}

/// Boundary validation shared by both variants.
fn validate(req: RegisterRequest) -> Result<(String, String), ApiError> {
    let username = req.username.unwrap_or_default().trim().to_string();
    let pw = req.password.unwrap_or_default();
    if username.is_empty() || pw.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".to_string(),
        ));
    }
    Ok((username, pw))
}

/// Create a user and issue its session token.
/// Duplicate check runs first; the insert is never attempted once the
/// username is found. The unique index backstops concurrent registrations.
async fn create_user(
    state: &AppState,
    username: String,
    pw: String,
) -> Result<(String, String), ApiError> {
    let db = state.db.clone();
    let jwt_secret = state.jwt_secret.clone();
    let password_hash = password::hash_password(&pw);
    let uname = username.clone();

    let result = tokio::task::spawn_blocking(move || {
        let conn = db
            .lock()
            .map_err(|e| ApiError::Internal(format!("DB lock: {e}")))?;

        if db::users::find_by_username(&conn, &uname)?.is_some() {
            return Err(ApiError::Conflict("User exists".to_string()));
        }

        let user_id = db::users::insert(&conn, &uname, &password_hash).map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                ApiError::Conflict("User exists".to_string())
            }
            other => ApiError::from(other),
        })?;

        let token = jwt::issue_session_token(&jwt_secret, &user_id, &uname)
            .map_err(|e| ApiError::Internal(format!("JWT: {e}")))?;

        Ok((user_id, token))
    })
    .await??;

    tracing::info!(username = %username, "User registered");
    Ok(result)
}
