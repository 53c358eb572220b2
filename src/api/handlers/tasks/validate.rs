//! Field constraint set evaluated uniformly on create and update.
//!
//! Constraints reject violating values outright; nothing is truncated.

pub(super) const TITLE_MAX: usize = 100;
pub(super) const DESCRIPTION_MAX: usize = 500;

struct LengthRule {
    required_message: Option<&'static str>,
    max: usize,
    too_long_message: &'static str,
}

const TITLE_RULE: LengthRule = LengthRule {
    required_message: Some("Please add a task title"),
    max: TITLE_MAX,
    too_long_message: "Title cannot be more than 100 characters",
};

const DESCRIPTION_RULE: LengthRule = LengthRule {
    required_message: None,
    max: DESCRIPTION_MAX,
    too_long_message: "Description cannot be more than 500 characters",
};

impl LengthRule {
    fn check(&self, value: Option<&str>) -> Result<(), &'static str> {
        match value {
            None | Some("") => self.required_message.map_or(Ok(()), Err),
            Some(value) if value.chars().count() > self.max => Err(self.too_long_message),
            Some(_) => Ok(()),
        }
    }
}

/// Cleaned write fields produced by a successful validation.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct TaskFields {
    pub(super) title: String,
    pub(super) description: Option<String>,
}

/// Trim and validate title/description against the constraint set.
///
/// An empty (or whitespace-only) description counts as "no description".
pub(super) fn validate_task_fields(
    title: Option<&str>,
    description: Option<&str>,
) -> Result<TaskFields, &'static str> {
    let title = title.map(str::trim);
    let description = description
        .map(str::trim)
        .filter(|value| !value.is_empty());

    TITLE_RULE.check(title)?;
    DESCRIPTION_RULE.check(description)?;

    Ok(TaskFields {
        // Checked non-empty by TITLE_RULE above.
        title: title.unwrap_or_default().to_string(),
        description: description.map(str::to_string),
    })
}
