use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;
use validator::{Validate, ValidationError};

use crate::datatypes::post::PostFields;
use crate::error::FieldErrors;

pub const TITLE_MAX_CHARS: u64 = 255;

/// Query string of the list endpoint. Parsed leniently: a bad `page` is page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: u64,
}

impl ListQuery {
    /// Repeated keys keep the last value.
    pub fn from_query_str(query: &str) -> Self {
        let mut search = None;
        let mut page = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "search" => search = Some(value.into_owned()),
                "page" => page = Some(value.into_owned()),
                _ => {}
            }
        }

        ListQuery {
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            page: page.as_deref().map_or(1, parse_page),
        }
    }
}

fn parse_page(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(page) if page >= 1 => page,
        _ => 1,
    }
}

/// Body of create and update requests.
///
/// Only `title` and `body` are read; every other key in the JSON object is dropped
/// here, so nothing else can reach the store. Values stay untyped until
/// [`PostPayload::validate`] so a wrong type is reported per field instead of
/// rejecting the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPayload {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub body: Option<Value>,
}

#[derive(Debug, Validate)]
struct PostForm {
    #[validate(required, length(min = 1, max = 255))]
    title: Option<String>,
    #[validate(required, length(min = 1))]
    body: Option<String>,
}

impl PostPayload {
    pub fn validate(self) -> Result<PostFields, FieldErrors> {
        let mut errors = FieldErrors::default();
        let form = PostForm {
            title: string_field("title", self.title, &mut errors),
            body: string_field("body", self.body, &mut errors),
        };

        if let Err(report) = form.validate() {
            let fields = report.field_errors();
            for (name, value) in [("title", &form.title), ("body", &form.body)] {
                if errors.contains(name) {
                    continue;
                }
                for failure in fields.get(name).into_iter().flat_map(|list| list.iter()) {
                    errors.push(name, describe(name, value.as_deref(), failure));
                }
            }
        }

        match (form.title, form.body) {
            (Some(title), Some(body)) if errors.is_empty() => Ok(PostFields { title, body }),
            _ => Err(errors),
        }
    }
}

/// Strings are trimmed; `null` counts as absent.
fn string_field(name: &'static str, raw: Option<Value>, errors: &mut FieldErrors) -> Option<String> {
    match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            errors.push(name, format!("The {name} field must be a string."));
            None
        }
    }
}

fn describe(name: &str, value: Option<&str>, failure: &ValidationError) -> String {
    match &*failure.code {
        "length" if value.is_some_and(|v| !v.is_empty()) => format!(
            "The {name} field must not be greater than {TITLE_MAX_CHARS} characters."
        ),
        "required" | "length" => format!("The {name} field is required."),
        other => format!("The {name} field is invalid ({other})."),
    }
}
