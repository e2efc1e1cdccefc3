pub mod commits;
pub mod files;
pub mod git;
pub mod issues;
pub mod pulls;
pub mod repos;
pub mod search;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ToolError;

/// Deserialize raw tool arguments into a typed input. Unknown extra fields
/// are ignored; missing required fields and out-of-enum values fail here,
/// before any remote call.
pub(crate) fn parse_input<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args)
        .map_err(|e| ToolError::validation(format!("Invalid arguments: {}", e)))
}

pub(crate) fn non_empty(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Apply defaults and range-check pagination: per_page in 1..=100, page >= 1.
pub(crate) fn page_params(
    per_page: Option<u32>,
    page: Option<u32>,
) -> Result<(u32, u32), ToolError> {
    let per_page = per_page.unwrap_or(30);
    if !(1..=100).contains(&per_page) {
        return Err(ToolError::validation(format!(
            "per_page must be between 1 and 100, got {}",
            per_page
        )));
    }
    let page = page.unwrap_or(1);
    if page < 1 {
        return Err(ToolError::validation(format!(
            "page must be at least 1, got {}",
            page
        )));
    }
    Ok((per_page, page))
}

pub(crate) fn positive(field: &str, value: i64) -> Result<(), ToolError> {
    if value < 1 {
        return Err(ToolError::validation(format!(
            "{} must be at least 1, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Sort direction shared by every listing operation.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        owner: String,
        direction: Option<Direction>,
    }

    #[test]
    fn missing_required_field_is_validation_error() {
        let err = parse_input::<Probe>(json!({"direction": "asc"})).unwrap_err();
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn unknown_extra_fields_are_ignored() {
        let probe: Probe = parse_input(json!({"owner": "acme", "bogus": 1})).unwrap();
        assert_eq!(probe.owner, "acme");
        assert!(probe.direction.is_none());
    }

    #[test]
    fn out_of_enum_value_is_rejected() {
        let err =
            parse_input::<Probe>(json!({"owner": "acme", "direction": "sideways"})).unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }

    #[test]
    fn pagination_defaults_and_ranges() {
        assert_eq!(page_params(None, None).unwrap(), (30, 1));
        assert_eq!(page_params(Some(100), Some(7)).unwrap(), (100, 7));
        assert!(page_params(Some(0), None).is_err());
        assert!(page_params(Some(101), None).is_err());
        assert!(page_params(None, Some(0)).is_err());
    }

    #[test]
    fn empty_strings_are_rejected() {
        assert!(non_empty("owner", " ").is_err());
        assert!(non_empty("owner", "acme").is_ok());
    }
}
