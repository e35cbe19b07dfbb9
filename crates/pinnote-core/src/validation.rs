//! Note validation shared by the create and full-replacement update paths.

use crate::defaults::TITLE_MAX_CHARS;
use crate::error::{Error, Result};
use crate::models::{Category, NoteDraft};

/// Validated, normalized note fields ready to hand to a repository.
///
/// Title and content are trimmed; every optional field has been defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFields {
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub category: Option<Category>,
    pub tags: Vec<String>,
}

/// Returns the trimmed value when present and non-blank.
fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation(message))
}

/// Validate a draft and apply defaults.
///
/// Checks run in a fixed order, so a draft with several problems always
/// reports the same one: title required, content required, title too long,
/// invalid category, NUL character.
pub fn validate(draft: &NoteDraft) -> Result<NoteFields> {
    let title = required(draft.title.as_deref(), "title required")?;
    let content = required(draft.content.as_deref(), "content required")?;

    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(Error::validation("title too long"));
    }

    let category = match draft.category.as_deref() {
        None | Some("") => None,
        Some(name) => Some(name.parse::<Category>()?),
    };

    let tags = draft.tags.clone().unwrap_or_default();
    // PostgreSQL text cannot hold U+0000
    let has_nul = |s: &str| s.contains('\0');
    if has_nul(title) || has_nul(content) || tags.iter().any(|t| has_nul(t)) {
        return Err(Error::validation("text contains a NUL character"));
    }

    Ok(NoteFields {
        title: title.to_string(),
        content: content.to_string(),
        is_pinned: draft.is_pinned.unwrap_or(false),
        category,
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, content: &str) -> NoteDraft {
        NoteDraft {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    fn message(result: Result<NoteFields>) -> String {
        match result {
            Err(Error::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_draft_gets_defaults() {
        let fields = validate(&draft("A", "B")).unwrap();
        assert_eq!(fields.title, "A");
        assert_eq!(fields.content, "B");
        assert!(!fields.is_pinned);
        assert_eq!(fields.category, None);
        assert!(fields.tags.is_empty());
    }

    #[test]
    fn test_title_and_content_are_trimmed() {
        let fields = validate(&draft("  Plan  ", "\n body \t")).unwrap();
        assert_eq!(fields.title, "Plan");
        assert_eq!(fields.content, "body");
    }

    #[test]
    fn test_empty_title_rejected() {
        assert_eq!(message(validate(&draft("", "B"))), "title required");
        assert_eq!(message(validate(&draft("   ", "B"))), "title required");
        let missing = NoteDraft {
            content: Some("B".into()),
            ..Default::default()
        };
        assert_eq!(message(validate(&missing)), "title required");
    }

    #[test]
    fn test_empty_content_rejected() {
        assert_eq!(message(validate(&draft("A", ""))), "content required");
        assert_eq!(message(validate(&draft("A", " \n\t "))), "content required");
        let missing = NoteDraft {
            title: Some("A".into()),
            ..Default::default()
        };
        assert_eq!(message(validate(&missing)), "content required");
    }

    #[test]
    fn test_title_length_limit() {
        let at_limit = "t".repeat(100);
        assert!(validate(&draft(&at_limit, "B")).is_ok());

        let over = "t".repeat(101);
        assert_eq!(message(validate(&draft(&over, "B"))), "title too long");
    }

    #[test]
    fn test_title_length_counts_chars_after_trim() {
        // 100 multi-byte chars is within the limit even though it is > 100 bytes.
        let wide = "é".repeat(100);
        assert!(validate(&draft(&wide, "B")).is_ok());

        let padded = format!("   {}   ", "t".repeat(100));
        assert!(validate(&draft(&padded, "B")).is_ok());
    }

    #[test]
    fn test_invalid_category_rejected() {
        let mut d = draft("A", "B");
        d.category = Some("Bogus".into());
        assert_eq!(message(validate(&d)), "invalid category");

        d.category = Some("work".into());
        assert_eq!(message(validate(&d)), "invalid category");
    }

    #[test]
    fn test_valid_and_empty_category() {
        let mut d = draft("A", "B");
        d.category = Some("Ideas".into());
        assert_eq!(validate(&d).unwrap().category, Some(Category::Ideas));

        d.category = Some(String::new());
        assert_eq!(validate(&d).unwrap().category, None);
    }

    #[test]
    fn test_check_order_is_fixed() {
        let d = NoteDraft {
            title: Some("t".repeat(101)),
            content: Some(" ".into()),
            category: Some("Bogus".into()),
            ..Default::default()
        };
        assert_eq!(message(validate(&d)), "content required");

        let d = NoteDraft {
            title: Some("t".repeat(101)),
            content: Some("B".into()),
            category: Some("Bogus".into()),
            ..Default::default()
        };
        assert_eq!(message(validate(&d)), "title too long");
    }

    #[test]
    fn test_nul_character_rejected() {
        assert_eq!(
            message(validate(&draft("a\0b", "B"))),
            "text contains a NUL character"
        );
        assert_eq!(
            message(validate(&draft("A", "body\0"))),
            "text contains a NUL character"
        );

        let mut d = draft("A", "B");
        d.tags = Some(vec!["ok".into(), "bad\0".into()]);
        assert_eq!(message(validate(&d)), "text contains a NUL character");

        // Earlier checks still win.
        assert_eq!(message(validate(&draft("\0", ""))), "content required");
    }

    #[test]
    fn test_tags_and_pin_pass_through() {
        let mut d = draft("A", "B");
        d.is_pinned = Some(true);
        d.tags = Some(vec!["x".into(), "x".into(), " y ".into()]);
        let fields = validate(&d).unwrap();
        assert!(fields.is_pinned);
        assert_eq!(fields.tags, vec!["x", "x", " y "]);
    }
}
