//! Client-side form validation.
//!
//! DESIGN
//! ======
//! Each form holds raw text exactly as typed. `validate()` checks every
//! field, collects all failures into [`FieldErrors`], and on success yields
//! the typed payload the resource module sends. Blank optional fields become
//! `None`; the backend stays the authority on anything beyond required-field
//! and shape checks.

use std::str::FromStr;

use crate::models::{
    GoalCategory, LocationType, LogVisibility, NewEvent, NewGoal, NewLog, NewProject, NewStep, ProjectCategory,
    ProjectVisibility, RegisterRequest,
};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 50;
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_LOCATION_DETAIL_LEN: usize = 500;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every failing field of one form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", joined(.0))]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError { field, message: message.into() });
    }

    /// First message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

fn joined(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// FIELD HELPERS
// =============================================================================

/// Address shape check: one `@`, non-empty local part, dotted domain, no whitespace.
#[must_use]
pub fn is_valid_email(raw: &str) -> bool {
    let email = raw.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Split comma-separated input into trimmed, non-empty entries.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn required_title(errors: &mut FieldErrors, raw: &str) -> String {
    let title = raw.trim();
    if title.is_empty() {
        errors.push("title", "Title is required");
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.push("title", format!("Title must be at most {MAX_TITLE_LEN} characters"));
    }
    title.to_owned()
}

fn required_date(errors: &mut FieldErrors, field: &'static str, raw: &str) -> String {
    let date = raw.trim();
    if date.is_empty() {
        errors.push(field, "Start date is required");
    }
    date.to_owned()
}

fn choice<T: FromStr>(errors: &mut FieldErrors, field: &'static str, raw: &str, label: &str) -> Option<T> {
    if raw.trim().is_empty() {
        errors.push(field, format!("Choose a {label}"));
        return None;
    }
    let parsed = raw.parse::<T>().ok();
    if parsed.is_none() {
        errors.push(field, format!("Unknown {label} `{}`", raw.trim()));
    }
    parsed
}

fn optional_choice<T: FromStr>(errors: &mut FieldErrors, field: &'static str, raw: &str, label: &str) -> Option<T> {
    if raw.trim().is_empty() {
        None
    } else {
        choice(errors, field, raw, label)
    }
}

/// Blank means absent; otherwise an integer strictly greater than zero.
fn optional_positive(errors: &mut FieldErrors, field: &'static str, raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i32>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            errors.push(field, "Must be a positive whole number");
            None
        }
    }
}

fn optional_non_negative(errors: &mut FieldErrors, field: &'static str, raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i32>() {
        Ok(n) if n >= 0 => Some(n),
        _ => {
            errors.push(field, "Must be zero or a positive whole number");
            None
        }
    }
}

fn location_detail(errors: &mut FieldErrors, raw: &str) -> Option<String> {
    let detail = optional(raw);
    if detail
        .as_deref()
        .is_some_and(|d| d.chars().count() > MAX_LOCATION_DETAIL_LEN)
    {
        errors.push("location_detail", format!("Location must be at most {MAX_LOCATION_DETAIL_LEN} characters"));
    }
    detail
}

fn password(errors: &mut FieldErrors, raw: &str) {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        errors.push("password", format!("Password must be at least {MIN_PASSWORD_LEN} characters"));
    }
}

fn email(errors: &mut FieldErrors, raw: &str) -> String {
    if !is_valid_email(raw) {
        errors.push("email", "Enter a valid email address");
    }
    raw.trim().to_owned()
}

// =============================================================================
// AUTH FORMS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = email(&mut errors, &self.email);
        password(&mut errors, &self.password);
        errors.finish(|| Credentials { email, password: self.password.clone() })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        let full_name = self.full_name.trim().to_owned();
        if full_name.is_empty() {
            errors.push("full_name", "Name is required");
        } else if full_name.chars().count() > MAX_NAME_LEN {
            errors.push("full_name", format!("Name must be at most {MAX_NAME_LEN} characters"));
        }
        let email = email(&mut errors, &self.email);
        password(&mut errors, &self.password);
        if self.password != self.confirm_password {
            errors.push("confirm_password", "Passwords do not match");
        }
        errors.finish(|| RegisterRequest { full_name, email, password: self.password.clone() })
    }
}

// =============================================================================
// RESOURCE FORMS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub due_date: String,
}

impl GoalForm {
    pub fn validate(&self) -> Result<NewGoal, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = required_title(&mut errors, &self.title);
        let category = choice::<GoalCategory>(&mut errors, "category", &self.category, "category");
        errors.finish(|| NewGoal {
            title,
            description: optional(&self.description),
            category: category.unwrap_or(GoalCategory::Unknown),
            due_date: optional(&self.due_date),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogForm {
    pub title: String,
    pub content: String,
    /// Comma-separated.
    pub tags: String,
    pub visibility: String,
}

impl Default for LogForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tags: String::new(),
            visibility: LogVisibility::Private.as_str().to_owned(),
        }
    }
}

impl LogForm {
    pub fn validate(&self) -> Result<NewLog, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = required_title(&mut errors, &self.title);
        if self.content.trim().is_empty() {
            errors.push("content", "Content is required");
        }
        let visibility = choice::<LogVisibility>(&mut errors, "visibility", &self.visibility, "visibility");
        if matches!(visibility, Some(LogVisibility::FriendsOnly)) {
            errors.push("visibility", "Visibility must be private or public");
        }
        errors.finish(|| NewLog {
            title,
            content: self.content.trim().to_owned(),
            tags: parse_tags(&self.tags),
            visibility,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub location_type: String,
    pub location_detail: String,
    pub max_attendees: String,
    pub tags: String,
}

impl EventForm {
    pub fn validate(&self) -> Result<NewEvent, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = required_title(&mut errors, &self.title);
        let start_date = required_date(&mut errors, "start_date", &self.start_date);
        let location_type = choice::<LocationType>(&mut errors, "location_type", &self.location_type, "location type");
        let location_detail = location_detail(&mut errors, &self.location_detail);
        let max_attendees = optional_positive(&mut errors, "max_attendees", &self.max_attendees);
        errors.finish(|| NewEvent {
            title,
            description: optional(&self.description),
            start_date,
            end_date: optional(&self.end_date),
            location_type: location_type.unwrap_or(LocationType::Unknown),
            location_detail,
            max_attendees,
            tags: parse_tags(&self.tags),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub start_date: String,
    pub end_date: String,
    pub frequency: String,
    pub location_type: String,
    pub location_detail: String,
    pub is_recruiting: bool,
    pub max_members: String,
    /// Comma-separated.
    pub required_skills: String,
    /// Comma-separated.
    pub tags: String,
    /// Blank leaves the backend default (`public`).
    pub visibility: String,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            frequency: String::new(),
            location_type: String::new(),
            location_detail: String::new(),
            is_recruiting: true,
            max_members: String::new(),
            required_skills: String::new(),
            tags: String::new(),
            visibility: String::new(),
        }
    }
}

impl ProjectForm {
    pub fn validate(&self) -> Result<NewProject, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = required_title(&mut errors, &self.title);
        let category = choice::<ProjectCategory>(&mut errors, "category", &self.category, "category");
        let start_date = required_date(&mut errors, "start_date", &self.start_date);
        let location_type = choice::<LocationType>(&mut errors, "location_type", &self.location_type, "location type");
        let location_detail = location_detail(&mut errors, &self.location_detail);
        let max_members = optional_positive(&mut errors, "max_members", &self.max_members);
        let visibility = optional_choice::<ProjectVisibility>(&mut errors, "visibility", &self.visibility, "visibility");
        errors.finish(|| NewProject {
            title,
            description: optional(&self.description),
            category: category.unwrap_or(ProjectCategory::Unknown),
            start_date,
            end_date: optional(&self.end_date),
            frequency: optional(&self.frequency),
            location_type: location_type.unwrap_or(LocationType::Unknown),
            location_detail,
            is_recruiting: self.is_recruiting,
            max_members,
            required_skills: parse_tags(&self.required_skills),
            tags: parse_tags(&self.tags),
            visibility,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepForm {
    pub title: String,
    pub description: String,
    /// Blank means `0`.
    pub order: String,
    pub estimated_minutes: String,
    pub due_date: String,
}

impl StepForm {
    pub fn validate(&self) -> Result<NewStep, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = required_title(&mut errors, &self.title);
        let order = optional_non_negative(&mut errors, "order", &self.order).unwrap_or(0);
        let estimated_minutes = optional_non_negative(&mut errors, "estimated_minutes", &self.estimated_minutes);
        errors.finish(|| NewStep {
            title,
            description: optional(&self.description),
            order,
            estimated_minutes,
            due_date: optional(&self.due_date),
        })
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
