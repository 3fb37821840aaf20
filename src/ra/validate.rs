//! Generic required-fields validation, the hook the record kinds in
//! [crate::hub] are built from.

use crate::ra::error::RaError;
use crate::ra::stanza::RaStanza;

/// Checks that every required field is present with a non-empty value,
/// aggregating all missing keys into one error prefixed with
/// `description`.
pub fn require_fields(
    stanza: &RaStanza,
    required: &[&str],
    description: &str,
) -> Result<(), RaError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|field| stanza.get(field).map_or(true, str::is_empty))
        .map(|field| field.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RaError::MissingRequiredFields {
            description: description.to_string(),
            fields: missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_present() {
        let stanza = RaStanza::parse("hub myHub\nshortLabel My Hub\n").unwrap();
        assert!(require_fields(&stanza, &["hub", "shortLabel"], "Hub file").is_ok());
    }

    #[test]
    fn test_missing_fields_are_aggregated() {
        let stanza = RaStanza::parse("hub myHub\n").unwrap();
        let err = require_fields(&stanza, &["hub", "shortLabel", "email"], "Hub file")
            .unwrap_err();
        assert_eq!(
            err,
            RaError::MissingRequiredFields {
                description: "Hub file".to_string(),
                fields: vec!["shortLabel".to_string(), "email".to_string()],
            }
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut stanza = RaStanza::parse("hub myHub\n").unwrap();
        stanza.set("email", "");
        let err = require_fields(&stanza, &["email"], "Hub file").unwrap_err();
        assert_eq!(
            err,
            RaError::MissingRequiredFields {
                description: "Hub file".to_string(),
                fields: vec!["email".to_string()],
            }
        );
    }
}
