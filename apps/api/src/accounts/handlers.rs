use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::accounts::models::{Account, ProfileForm, ProfileUpdate};
use crate::errors::AppError;
use crate::resumes::UploadForm;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub mobile: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Resolves the signed-in account or fails with 401.
pub async fn require_account(state: &AppState) -> Result<Account, AppError> {
    state
        .blocking(|s| s.accounts.current_account())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Sign in to continue".to_string()))
}

fn require_filled(fields: &[(&str, &str)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Please fill in all required fields: {}",
            missing.join(", ")
        )))
    }
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    require_filled(&[
        ("email", req.email.as_str()),
        ("password", req.password.as_str()),
        ("mobile", req.mobile.as_str()),
    ])?;

    let account = state
        .blocking(move |s| s.accounts.register(&req.email, &req.password, &req.mobile))
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Account>, AppError> {
    require_filled(&[
        ("email", req.email.as_str()),
        ("password", req.password.as_str()),
    ])?;

    state
        .blocking(move |s| s.accounts.authenticate(&req.email, &req.password))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.blocking(|s| s.accounts.logout()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(State(state): State<AppState>) -> Result<Json<Account>, AppError> {
    require_account(&state).await.map(Json)
}

/// PATCH /api/v1/profile
///
/// Partial update; only the fields present in the body change.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Account>, AppError> {
    let account = require_account(&state).await?;
    let updated = state
        .blocking(move |s| s.accounts.update(&account.id, &update))
        .await?;
    Ok(Json(updated))
}

/// POST /api/v1/profile/complete
///
/// Basic-info form: all required fields must be filled, then the profile is
/// marked complete.
pub async fn handle_complete_profile(
    State(state): State<AppState>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<Account>, AppError> {
    let account = require_account(&state).await?;

    let missing = form.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Please fill in all required fields: {}",
            missing.join(", ")
        )));
    }

    let update = form.into_update();
    let updated = state
        .blocking(move |s| s.accounts.update(&account.id, &update))
        .await?;
    Ok(Json(updated))
}

/// POST /api/v1/profile/resume
///
/// Multipart upload of the account's default resume.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Account>, AppError> {
    let account = require_account(&state).await?;
    let form = UploadForm::read(multipart).await?;

    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("Please upload a resume file".to_string()))?;
    if !resume.is_supported_type() {
        return Err(AppError::Validation(
            "Please upload a PDF or DOC file".to_string(),
        ));
    }

    let updated = state
        .blocking(move |s| {
            let reference = s.resumes.store(&resume)?;
            s.accounts.update(
                &account.id,
                &ProfileUpdate {
                    resume_url: Some(reference),
                    ..ProfileUpdate::default()
                },
            )
        })
        .await?;
    Ok(Json(updated))
}
