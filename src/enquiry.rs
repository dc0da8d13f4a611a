//! # enquiry: the enquiry submission pipeline
//!
//! Takes user-entered contact and message fields, validates locally against
//! fixed bounds, submits once through an [`EnquiryWriter`], and reports the
//! normalised outcome.
//!
//! Validation fails closed: the writer is never called when any field
//! violates its bound, and errors are field-scoped so callers can display
//! them inline. Submission is single-shot per user action — the caller
//! disables resubmission while a request is outstanding and may retry
//! manually after a terminal failure.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::contract::EnquiryWriter;
use crate::model::{EnquiryRequest, EnquiryResult};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

// Phone charset: optional leading +, then digits, spaces, dashes, parens.
static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]*$").expect("mobile pattern compiles"));

const ENQUIRY_MIN_CHARS: usize = 10;
const ENQUIRY_MAX_CHARS: usize = 500;

/// The form field an error is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnquiryField {
    Name,
    Email,
    Mobile,
    Enquiry,
}

impl EnquiryField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryField::Name => "name",
            EnquiryField::Email => "email",
            EnquiryField::Mobile => "mobile",
            EnquiryField::Enquiry => "enquiry",
        }
    }
}

/// A single field-scoped validation error, for inline display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: EnquiryField,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

impl std::error::Error for FieldError {}

fn field_error(field: EnquiryField, message: &str) -> FieldError {
    FieldError {
        field,
        message: message.to_string(),
    }
}

/// Validate an enquiry against its fixed bounds. Returns every violated
/// field, not just the first.
pub fn validate(request: &EnquiryRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if request.name.trim().chars().count() < 2 {
        errors.push(field_error(
            EnquiryField::Name,
            "Name must be at least 2 characters.",
        ));
    }
    if !EMAIL_PATTERN.is_match(request.email.trim()) {
        errors.push(field_error(EnquiryField::Email, "Invalid email address."));
    }
    let mobile = request.mobile.trim();
    if !MOBILE_PATTERN.is_match(mobile) {
        errors.push(field_error(
            EnquiryField::Mobile,
            "Invalid mobile number format.",
        ));
    } else if mobile.chars().count() < 10 {
        errors.push(field_error(
            EnquiryField::Mobile,
            "Mobile number must be at least 10 digits.",
        ));
    }
    let enquiry_len = request.enquiry.trim().chars().count();
    if enquiry_len < ENQUIRY_MIN_CHARS {
        errors.push(field_error(
            EnquiryField::Enquiry,
            "Enquiry must be at least 10 characters.",
        ));
    } else if enquiry_len > ENQUIRY_MAX_CHARS {
        errors.push(field_error(
            EnquiryField::Enquiry,
            "Enquiry must be less than 500 characters.",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        debug!(violations = errors.len(), "Enquiry validation failed");
        Err(errors)
    }
}

/// Validate and submit an enquiry.
///
/// Validation errors never reach the network. The writer itself never
/// errors — real persistence, simulated acceptance and failed persistence
/// all arrive as the same [`EnquiryResult`] shape.
pub async fn submit_enquiry<W>(
    writer: &W,
    request: &EnquiryRequest,
) -> Result<EnquiryResult, Vec<FieldError>>
where
    W: EnquiryWriter + ?Sized,
{
    validate(request)?;

    info!(product = %request.product_name, "Submitting enquiry");
    let result = writer.create_enquiry(request).await;
    if result.success {
        info!(
            simulated = result.is_simulated(),
            "Enquiry accepted: {}", result.message
        );
    } else {
        warn!("Enquiry rejected: {}", result.message);
    }
    Ok(result)
}
