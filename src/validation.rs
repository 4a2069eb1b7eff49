//! Validation of `POST /create-ad` payloads against Google Ads limits for
//! responsive search ads.
//!
//! Checks run in a fixed order and stop at the first violation, so every
//! payload maps to exactly one error body.

use serde_json::{json, Value};
use thiserror::Error;

use crate::ad_models::{AdCreationRequest, CreateAdPayload};

pub const MIN_HEADLINES: usize = 3;
pub const MAX_HEADLINES: usize = 15;
pub const MAX_HEADLINE_LENGTH: usize = 30;
pub const MIN_DESCRIPTIONS: usize = 2;
pub const MAX_DESCRIPTIONS: usize = 4;
pub const MAX_DESCRIPTION_LENGTH: usize = 90;

/// Field names in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "customerId",
    "adGroupId",
    "headlines",
    "descriptions",
    "finalUrl",
];

/// A client-caused problem with the payload. Always answered with 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .missing.join(", "))]
    MissingFields { missing: Vec<&'static str> },

    #[error("Headlines must be an array of 3-15 elements")]
    InvalidHeadlineCount { received: usize },

    #[error("Descriptions must be an array of 2-4 elements")]
    InvalidDescriptionCount { received: usize },

    #[error("Headline {index} must be a string")]
    HeadlineNotText { index: usize },

    #[error("Headline {index} exceeds 30 characters")]
    HeadlineTooLong {
        index: usize,
        title: String,
        length: usize,
    },

    #[error("Description {index} must be a string")]
    DescriptionNotText { index: usize },

    #[error("Description {index} exceeds 90 characters")]
    DescriptionTooLong {
        index: usize,
        description: String,
        length: usize,
    },
}

impl ValidationError {
    /// Stable identifier clients can match on.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields { .. } => "MissingFields",
            ValidationError::InvalidHeadlineCount { .. } => "InvalidHeadlineCount",
            ValidationError::InvalidDescriptionCount { .. } => "InvalidDescriptionCount",
            ValidationError::HeadlineNotText { .. } => "HeadlineNotText",
            ValidationError::HeadlineTooLong { .. } => "HeadlineTooLong",
            ValidationError::DescriptionNotText { .. } => "DescriptionNotText",
            ValidationError::DescriptionTooLong { .. } => "DescriptionTooLong",
        }
    }

    /// JSON body of the 400 response.
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.to_string(),
            "code": self.code(),
        });

        let extra = match self {
            ValidationError::MissingFields { missing } => json!({
                "required": REQUIRED_FIELDS,
                "missing": missing,
            }),
            ValidationError::InvalidHeadlineCount { received }
            | ValidationError::InvalidDescriptionCount { received } => {
                json!({ "received": received })
            }
            ValidationError::HeadlineNotText { index }
            | ValidationError::DescriptionNotText { index } => json!({ "index": index }),
            ValidationError::HeadlineTooLong {
                index,
                title,
                length,
            } => json!({ "index": index, "title": title, "length": length }),
            ValidationError::DescriptionTooLong {
                index,
                description,
                length,
            } => json!({ "index": index, "description": description, "length": length }),
        };

        if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
            body.extend(extra);
        }
        body
    }
}

/// Validates a raw payload and returns the typed request.
///
/// Strings are taken as received: no trimming, no normalization. Lengths are
/// counted in UTF-16 code units, the unit Google Ads limits are expressed in.
pub fn validate_payload(payload: &CreateAdPayload) -> Result<AdCreationRequest, ValidationError> {
    let customer_id = id_text(payload.customer_id.as_ref());
    let ad_group_id = id_text(payload.ad_group_id.as_ref());
    let final_url = match payload.final_url.as_ref() {
        Some(Value::String(url)) if !url.is_empty() => Some(url.clone()),
        _ => None,
    };

    let missing: Vec<&'static str> = [
        customer_id.is_some(),
        ad_group_id.is_some(),
        is_present(payload.headlines.as_ref()),
        is_present(payload.descriptions.as_ref()),
        final_url.is_some(),
    ]
    .into_iter()
    .zip(REQUIRED_FIELDS)
    .filter(|(present, _)| !present)
    .map(|(_, name)| name)
    .collect();

    let (Some(customer_id), Some(ad_group_id), Some(final_url)) =
        (customer_id, ad_group_id, final_url)
    else {
        return Err(ValidationError::MissingFields { missing });
    };
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields { missing });
    }

    let headlines = payload
        .headlines
        .as_ref()
        .and_then(Value::as_array)
        .filter(|items| (MIN_HEADLINES..=MAX_HEADLINES).contains(&items.len()))
        .ok_or_else(|| ValidationError::InvalidHeadlineCount {
            received: array_len(payload.headlines.as_ref()),
        })?;

    let descriptions = payload
        .descriptions
        .as_ref()
        .and_then(Value::as_array)
        .filter(|items| (MIN_DESCRIPTIONS..=MAX_DESCRIPTIONS).contains(&items.len()))
        .ok_or_else(|| ValidationError::InvalidDescriptionCount {
            received: array_len(payload.descriptions.as_ref()),
        })?;

    let headlines = collect_texts(headlines, MAX_HEADLINE_LENGTH, TextKind::Headline)?;
    let descriptions = collect_texts(descriptions, MAX_DESCRIPTION_LENGTH, TextKind::Description)?;

    Ok(AdCreationRequest {
        customer_id,
        ad_group_id,
        headlines,
        descriptions,
        final_url,
    })
}

/// Length as Google Ads counts it.
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

#[derive(Clone, Copy)]
enum TextKind {
    Headline,
    Description,
}

fn collect_texts(
    items: &[Value],
    max_length: usize,
    kind: TextKind,
) -> Result<Vec<String>, ValidationError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let index = i + 1;
            let text = item.as_str().ok_or(match kind {
                TextKind::Headline => ValidationError::HeadlineNotText { index },
                TextKind::Description => ValidationError::DescriptionNotText { index },
            })?;

            let length = text_length(text);
            if length > max_length {
                return Err(match kind {
                    TextKind::Headline => ValidationError::HeadlineTooLong {
                        index,
                        title: text.to_string(),
                        length,
                    },
                    TextKind::Description => ValidationError::DescriptionTooLong {
                        index,
                        description: text.to_string(),
                        length,
                    },
                });
            }
            Ok(text.to_string())
        })
        .collect()
}

/// Account and ad group ids may arrive as strings or bare numbers.
fn id_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

fn array_len(value: Option<&Value>) -> usize {
    value.and_then(Value::as_array).map_or(0, Vec::len)
}
