//! Column table for the addTrainer payload.
//!
//! Source header names on the left, API field names on the right. Any column
//! not listed here is passed through under its own name.

pub const COLUMN_MAPPING: [(&str, &str); 5] = [
    ("Id", "trainer_id"),
    ("Full name", "name"),
    ("Domain", "domain"),
    ("Specialization", "specialisation"),
    ("email", "email"),
];

pub const TRAINER_ID_FIELD: &str = "trainer_id";
pub const PASSWORD_FIELD: &str = "password";
pub const TOPICS_FIELD: &str = "topics";

/// Source columns every export must carry, in table order.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    COLUMN_MAPPING.iter().map(|(source, _)| *source)
}

pub fn rename(column: &str) -> &str {
    match COLUMN_MAPPING.iter().find(|(source, _)| *source == column) {
        Some((_, target)) => target,
        None => column,
    }
}

pub fn is_passthrough(column: &str) -> bool {
    !COLUMN_MAPPING.iter().any(|(source, _)| *source == column)
}

pub fn missing_required<S: AsRef<str>>(headers: &[S]) -> Vec<&'static str> {
    required_columns()
        .filter(|required| !headers.iter().any(|h| h.as_ref() == *required))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_mapped_columns() {
        assert_eq!(rename("Id"), "trainer_id");
        assert_eq!(rename("Full name"), "name");
        assert_eq!(rename("Domain"), "domain");
        assert_eq!(rename("Specialization"), "specialisation");
        assert_eq!(rename("email"), "email");
    }

    #[test]
    fn test_rename_is_case_sensitive_and_passes_others_through() {
        assert_eq!(rename("Phone"), "Phone");
        assert_eq!(rename("id"), "id");
        assert_eq!(rename("Email"), "Email");
        assert!(is_passthrough("Phone"));
        assert!(!is_passthrough("email"));
    }

    #[test]
    fn test_missing_required_reports_in_table_order() {
        let headers = vec!["email", "Id", "Full name", "Phone"];
        assert_eq!(missing_required(&headers), vec!["Domain", "Specialization"]);

        let complete = vec!["Id", "Full name", "Domain", "Specialization", "email"];
        assert!(missing_required(&complete).is_empty());

        let empty: Vec<String> = Vec::new();
        assert_eq!(missing_required(&empty).len(), 5);
    }
}
