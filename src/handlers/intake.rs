use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    app::AppState,
    error::{AppError, Result},
    intake::{self, PlanUpload, SubmissionFields},
};

/// Response for a stored submission
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "quotationId")]
    pub quotation_id: i64,
}

/// Handler for public quotation submissions
pub async fn submit_quotation(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (fields, upload) = read_submission(&mut multipart).await?;

    // Validate everything before touching disk or database
    let valid =
        intake::validate_submission(&fields, upload.as_ref()).map_err(AppError::Validation)?;

    let mut quotation = valid.quotation;
    if let Some(upload) = valid.plan_upload {
        let name = state.plan_files.save(&upload.extension, &upload.bytes).await?;
        quotation.plan_file = Some(name);
    }

    let quotation_id = match state.quotations.insert(&quotation).await {
        Ok(id) => id,
        Err(e) => {
            // Do not leave an orphaned upload behind
            if let Some(name) = &quotation.plan_file {
                state.plan_files.delete(name).await;
            }
            return Err(e);
        }
    };

    tracing::info!(
        "Stored quotation {} from {} ({})",
        quotation_id,
        quotation.full_name,
        quotation.city
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            message: "Quotation submitted successfully! We will contact you within 24 hours."
                .to_string(),
            quotation_id,
        }),
    ))
}

/// Pull the known form fields and the optional plan file out of the
/// multipart body. Unknown parts are skipped; field order does not matter.
async fn read_submission(
    multipart: &mut Multipart,
) -> Result<(SubmissionFields, Option<PlanUpload>)> {
    let mut fields = SubmissionFields::default();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_form_data)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "planFile" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(bad_form_data)?;
            // Browsers send an empty part when no file was chosen
            if !file_name.is_empty() || !bytes.is_empty() {
                upload = Some(PlanUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await.map_err(bad_form_data)?;
        match name.as_str() {
            "projectType" => fields.project_type = value,
            "budget" => fields.budget = value,
            "hasPlans" => fields.has_plans = value,
            "startDate" => fields.start_date = value,
            "fullName" => fields.full_name = value,
            "email" => fields.email = value,
            "phone" => fields.phone = value,
            "city" => fields.city = value,
            "consultation" => fields.consultation = value,
            _ => {}
        }
    }

    Ok((fields, upload))
}

fn bad_form_data(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed form data: {e}"))
}
