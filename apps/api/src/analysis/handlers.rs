use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;

use crate::accounts::handlers::require_account;
use crate::analysis::models::{AnalysisRequest, AnalysisResult, AnalysisSummary};
use crate::errors::AppError;
use crate::resumes::{ResumeFile, UploadForm};
use crate::rooms::handlers::{load_owned_room, parse_years};
use crate::rooms::RoomUpdate;
use crate::state::AppState;

/// Raw service answer plus the interpreted conventional keys.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub result: AnalysisResult,
    pub summary: AnalysisSummary,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        let summary = result.summary();
        Self { result, summary }
    }
}

/// Picks the resume for an analysis: the uploaded file when there is one,
/// otherwise the stored reference.
pub async fn resolve_resume(
    state: &AppState,
    uploaded: Option<ResumeFile>,
    stored: Option<&str>,
) -> Result<ResumeFile, AppError> {
    if let Some(file) = uploaded {
        if !file.is_supported_type() {
            return Err(AppError::Validation(
                "Please upload a PDF or DOC file".to_string(),
            ));
        }
        return Ok(file);
    }

    let stored = match stored {
        Some(reference) => {
            let reference = reference.to_string();
            state
                .blocking(move |s| s.resumes.load(&reference))
                .await?
        }
        None => None,
    };
    stored.ok_or_else(|| {
        AppError::Validation("Please upload a resume file to start the interview".to_string())
    })
}

/// POST /api/v1/analysis
///
/// Multipart: `resume` (optional when the profile has one), `targetRole`,
/// `targetCompany`, `yearsOfExperience`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let account = require_account(&state).await?;
    let form = UploadForm::read(multipart).await?;

    let target_role = form.text("targetRole").trim().to_string();
    let target_company = form.text("targetCompany").trim().to_string();
    if target_role.is_empty() || target_company.is_empty() {
        return Err(AppError::Validation(
            "Please fill in all required fields: targetRole, targetCompany".to_string(),
        ));
    }
    let years = parse_years(form.text("yearsOfExperience"))?;

    let request = AnalysisRequest {
        resume: resolve_resume(&state, form.resume, account.resume_url.as_deref()).await?,
        target_role,
        target_company,
        years_of_experience: years.to_string(),
    };

    let result = state.analyzer.analyze(&request).await?;
    Ok(Json(AnalysisResponse::from(result)))
}

/// POST /api/v1/rooms/:id/analysis
///
/// Analyzes the room's resume against its target. A `resume` part replaces
/// the room's stored resume first. Re-posting is the manual retry.
pub async fn handle_room_analysis(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let account = require_account(&state).await?;
    let room = load_owned_room(&state, &account, &room_id).await?;
    let form = UploadForm::read(multipart).await?;

    let uploaded = form.resume.is_some();
    let resume = resolve_resume(&state, form.resume, room.resume_url.as_deref()).await?;
    if uploaded {
        let (room_id, resume) = (room.id.clone(), resume.clone());
        state
            .blocking(move |s| {
                let reference = s.resumes.store(&resume)?;
                s.rooms.update(
                    &room_id,
                    &RoomUpdate {
                        resume_url: Some(reference),
                        ..RoomUpdate::default()
                    },
                )
            })
            .await?;
    }

    let request = AnalysisRequest {
        resume,
        target_role: room.target_role.clone(),
        target_company: room.target_company.clone(),
        years_of_experience: room.years_of_experience.to_string(),
    };
    let result = state.analyzer.analyze(&request).await?;
    Ok(Json(AnalysisResponse::from(result)))
}
