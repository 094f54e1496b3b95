use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::accounts::handlers::require_account;
use crate::accounts::Account;
use crate::analysis::handlers::{resolve_resume, AnalysisResponse};
use crate::analysis::AnalysisRequest;
use crate::errors::AppError;
use crate::resumes::UploadForm;
use crate::rooms::models::{Room, RoomFields, RoomUpdate};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub room: Room,
    pub analysis: AnalysisResponse,
}

/// Loads a room owned by `account`. Rooms of other accounts look absent.
pub async fn load_owned_room(
    state: &AppState,
    account: &Account,
    room_id: &str,
) -> Result<Room, AppError> {
    let id = room_id.to_string();
    state
        .blocking(move |s| s.rooms.get(&id))
        .await?
        .filter(|room| room.user_id == account.id)
        .ok_or_else(|| AppError::NotFound(format!("Room {room_id} not found")))
}

fn validate_fields(fields: &RoomFields) -> Result<(), AppError> {
    let missing = fields.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Please fill in all required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Blank means zero, as in the room form's initial state.
pub fn parse_years(raw: &str) -> Result<u32, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u32>().map_err(|_| {
        AppError::Validation(format!("yearsOfExperience must be a whole number, got '{raw}'"))
    })
}

/// GET /api/v1/rooms
pub async fn handle_list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, AppError> {
    let account = require_account(&state).await?;
    let rooms = state
        .blocking(move |s| s.rooms.list_for_owner(&account.id))
        .await?;
    Ok(Json(rooms))
}

/// POST /api/v1/rooms
///
/// Without an explicit `resumeUrl` the room inherits the profile's resume.
pub async fn handle_create_room(
    State(state): State<AppState>,
    Json(mut fields): Json<RoomFields>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let account = require_account(&state).await?;
    validate_fields(&fields)?;

    if fields.resume_url.is_none() {
        fields.resume_url = account.resume_url.clone();
    }

    let owner_id = account.id.clone();
    let room_id = state
        .blocking(move |s| s.rooms.create(&owner_id, fields))
        .await?;
    let room = load_owned_room(&state, &account, &room_id).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /api/v1/rooms/:id
pub async fn handle_get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, AppError> {
    let account = require_account(&state).await?;
    load_owned_room(&state, &account, &room_id).await.map(Json)
}

/// PATCH /api/v1/rooms/:id
pub async fn handle_update_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(update): Json<RoomUpdate>,
) -> Result<Json<Room>, AppError> {
    let account = require_account(&state).await?;
    load_owned_room(&state, &account, &room_id).await?;

    let id = room_id.clone();
    state
        .blocking(move |s| s.rooms.update(&id, &update))
        .await?;
    load_owned_room(&state, &account, &room_id).await.map(Json)
}

/// DELETE /api/v1/rooms/:id
///
/// Idempotent: an unknown id still answers 204. Another account's room is
/// left alone.
pub async fn handle_delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let account = require_account(&state).await?;

    let id = room_id.clone();
    state
        .blocking(move |s| match s.rooms.get(&id)? {
            Some(room) if room.user_id != account.id => {
                Err(AppError::NotFound(format!("Room {id} not found")))
            }
            _ => {
                s.rooms.delete(&id)?;
                Ok(StatusCode::NO_CONTENT)
            }
        })
        .await
}

/// POST /api/v1/rooms/start
///
/// Multipart room form plus resume: the resume is analyzed first and the room
/// is only created when the analysis succeeds.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<StartInterviewResponse>), AppError> {
    let account = require_account(&state).await?;
    let form = UploadForm::read(multipart).await?;

    let mut fields = RoomFields {
        current_role: form.text("currentRole").to_string(),
        target_role: form.text("targetRole").to_string(),
        target_company: form.text("targetCompany").to_string(),
        years_of_experience: parse_years(form.text("yearsOfExperience"))?,
        interview_type: form.text("interviewType").to_string(),
        resume_url: None,
    };
    validate_fields(&fields)?;

    let resume = resolve_resume(&state, form.resume, None).await?;
    let request = AnalysisRequest {
        resume,
        target_role: fields.target_role.clone(),
        target_company: fields.target_company.clone(),
        years_of_experience: fields.years_of_experience.to_string(),
    };
    let result = state.analyzer.analyze(&request).await?;

    let (owner_id, resume) = (account.id.clone(), request.resume);
    let room_id = state
        .blocking(move |s| {
            fields.resume_url = Some(s.resumes.store(&resume)?);
            s.rooms.create(&owner_id, fields)
        })
        .await?;
    let room = load_owned_room(&state, &account, &room_id).await?;
    info!("Interview room {room_id} started with analyzed resume");

    Ok((
        StatusCode::CREATED,
        Json(StartInterviewResponse {
            room,
            analysis: AnalysisResponse::from(result),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_years() {
        assert_eq!(parse_years("").unwrap(), 0);
        assert_eq!(parse_years(" 4 ").unwrap(), 4);
        assert!(matches!(parse_years("four"), Err(AppError::Validation(_))));
        assert!(matches!(parse_years("-1"), Err(AppError::Validation(_))));
    }
}
