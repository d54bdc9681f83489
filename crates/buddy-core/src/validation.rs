//! Companion draft validation.
//!
//! The schema is a flat table of `(field, predicate, message)` rules. Every
//! rule runs independently so a single pass reports every violation at once.

use buddy_types::companion::{CompanionDraft, CompanionField};
use buddy_types::error::ValidationErrors;

/// Minimum length (in characters) for `instructions` and `seed`.
pub const MIN_PROMPT_CHARS: usize = 200;

/// A single declarative validation rule.
pub struct Rule {
    pub field: CompanionField,
    pub check: fn(&str) -> bool,
    pub message: &'static str,
}

fn non_empty(value: &str) -> bool {
    !value.is_empty()
}

fn min_prompt_length(value: &str) -> bool {
    value.chars().count() >= MIN_PROMPT_CHARS
}

/// The companion schema.
///
/// Values are not trimmed: whitespace counts toward both emptiness and length.
pub const RULES: [Rule; 6] = [
    Rule {
        field: CompanionField::Name,
        check: non_empty,
        message: "Name is required.",
    },
    Rule {
        field: CompanionField::Description,
        check: non_empty,
        message: "Description is required.",
    },
    Rule {
        field: CompanionField::Instructions,
        check: min_prompt_length,
        message: "Instructions require at least 200 characters.",
    },
    Rule {
        field: CompanionField::Seed,
        check: min_prompt_length,
        message: "Seed requires at least 200 characters.",
    },
    Rule {
        field: CompanionField::Src,
        check: non_empty,
        message: "Image is required.",
    },
    Rule {
        field: CompanionField::CategoryId,
        check: non_empty,
        message: "Category is required.",
    },
];

/// Validate a whole draft.
///
/// Returns `Ok(())` when every rule passes, otherwise every violation keyed
/// by field.
pub fn validate(draft: &CompanionDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for rule in &RULES {
        if !(rule.check)(draft.get(rule.field)) {
            errors.insert(rule.field, rule.message);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate one field of a draft, returning its violation message if any.
pub fn validate_field(draft: &CompanionDraft, field: CompanionField) -> Option<&'static str> {
    RULES
        .iter()
        .filter(|rule| rule.field == field)
        .find(|rule| !(rule.check)(draft.get(field)))
        .map(|rule| rule.message)
}
