//! Validation gateway for public quotation submissions.
//!
//! Every text field is sanitized before any rule runs; the rules mirror the
//! ones the intake form applies per step, so the server never relies on
//! client-side validation.

use chrono::{NaiveDate, Utc};
use validator::ValidateEmail;

use crate::models::quotation::NewQuotation;

pub const MAX_PLAN_FILE_BYTES: usize = 10 * 1024 * 1024;
pub const ALLOWED_PLAN_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

const MIN_FULL_NAME_CHARS: usize = 3;
const MIN_PHONE_DIGITS: usize = 10;

/// Raw text fields lifted from the multipart form, before sanitation.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFields {
    pub project_type: String,
    pub budget: String,
    pub has_plans: String,
    pub start_date: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub consultation: String,
}

/// An uploaded plan file exactly as received.
#[derive(Debug, Clone)]
pub struct PlanUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A plan upload that passed the size and type checks. Only the extension
/// survives from the client-supplied name.
#[derive(Debug)]
pub struct CheckedPlanUpload {
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// A submission that passed every gateway rule. `quotation.plan_file` is
/// still `None`; it is filled in once the upload has actually been stored.
#[derive(Debug)]
pub struct ValidSubmission {
    pub quotation: NewQuotation,
    pub plan_upload: Option<CheckedPlanUpload>,
}

/// Trim, drop `<...>` markup spans and strip control characters (newlines
/// survive so multi-line text keeps its shape). An unterminated `<` drops
/// the remainder of the input.
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '<' {
            for tag_char in chars.by_ref() {
                if tag_char == '>' {
                    break;
                }
            }
            continue;
        }
        if c.is_control() && c != '\n' {
            continue;
        }
        out.push(c);
    }
    out.trim().to_string()
}

/// Run the full gateway check. Returns the insert-ready submission, or the
/// complete list of problems found (the caller persists nothing on error).
pub fn validate_submission(
    fields: &SubmissionFields,
    upload: Option<&PlanUpload>,
) -> Result<ValidSubmission, Vec<String>> {
    let mut errors = Vec::new();

    let project_type = sanitize_text(&fields.project_type);
    let full_name = sanitize_text(&fields.full_name);
    let email = sanitize_text(&fields.email);
    let phone = sanitize_text(&fields.phone);
    let city = sanitize_text(&fields.city);
    let start_date_raw = sanitize_text(&fields.start_date);
    let has_plans = sanitize_text(&fields.has_plans) == "yes";
    let consultation = sanitize_text(&fields.consultation) == "true";

    if project_type.is_empty() {
        errors.push("Project type is required".to_string());
    }

    let budget = match sanitize_text(&fields.budget).parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            errors.push("Valid budget is required".to_string());
            None
        }
    };

    if full_name.is_empty() {
        errors.push("Full name is required".to_string());
    } else if full_name.chars().count() < MIN_FULL_NAME_CHARS {
        errors.push("Full name must be at least 3 characters".to_string());
    }

    if email.is_empty() || !email.validate_email() {
        errors.push("Valid email is required".to_string());
    }

    if phone.is_empty() {
        errors.push("Phone number is required".to_string());
    } else if !is_valid_phone(&phone) {
        errors.push("Valid phone number is required".to_string());
    }

    if city.is_empty() {
        errors.push("City is required".to_string());
    }

    let start_date = if start_date_raw.is_empty() {
        None
    } else {
        match NaiveDate::parse_from_str(&start_date_raw, "%Y-%m-%d") {
            Ok(date) if date >= Utc::now().date_naive() => Some(date),
            Ok(_) => {
                errors.push("Start date cannot be in the past".to_string());
                None
            }
            Err(_) => {
                errors.push("Start date must be a valid date".to_string());
                None
            }
        }
    };

    // Attachments only count when the customer said they have plans.
    let plan_upload = if has_plans {
        upload.and_then(|file| check_plan_upload(file, &mut errors))
    } else {
        None
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidSubmission {
        quotation: NewQuotation {
            project_type,
            budget: budget.unwrap_or(0.0),
            has_plans,
            plan_file: None,
            start_date,
            full_name,
            email,
            phone,
            city,
            consultation,
        },
        plan_upload,
    })
}

fn check_plan_upload(upload: &PlanUpload, errors: &mut Vec<String>) -> Option<CheckedPlanUpload> {
    if upload.bytes.len() > MAX_PLAN_FILE_BYTES {
        errors.push("File size exceeds 10MB limit".to_string());
        return None;
    }

    let extension = upload
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_PLAN_EXTENSIONS.contains(&ext.as_str()) => Some(CheckedPlanUpload {
            extension: ext,
            bytes: upload.bytes.clone(),
        }),
        _ => {
            errors.push("Invalid file type. Only PDF, JPG, PNG allowed".to_string());
            None
        }
    }
}

fn is_valid_phone(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || " -+()".contains(c));
    allowed && phone.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}
