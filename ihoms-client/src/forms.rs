//! Client-side form validation
//!
//! Forms validate before anything is sent. Field keys match the backend's
//! 422 `errors` keys so client and server messages can be shown in the
//! same place.

use shared::client::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use shared::models::{TicketCreate, TicketPriority};
use std::collections::BTreeMap;
use thiserror::Error;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

/// Field -> messages, client-side
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// First message for `field`
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|m| m.first()).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// Keep only the listed fields
    fn retain(mut self, fields: &[&str]) -> Self {
        self.0.retain(|field, _| fields.contains(&field.as_str()));
        self
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form = Self::new();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                form.add(&field.to_string(), message);
            }
        }
        form
    }
}

fn derived<T: Validate>(form: &T) -> FormErrors {
    form.validate().err().map(FormErrors::from).unwrap_or_default()
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

// =============================================================================
// Rules
// =============================================================================

fn email_rule(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(rule_error("required", "Email is required"));
    }
    if !value.validate_email() {
        return Err(rule_error("email", "Please enter a valid email address"));
    }
    Ok(())
}

fn password_present(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(rule_error("required", "Password is required"));
    }
    Ok(())
}

/// Required, at least 8 characters, with lower case, upper case and a digit.
/// Reports the first rule broken.
pub fn password_rules(value: &str) -> Result<(), ValidationError> {
    password_present(value)?;
    if value.chars().count() < 8 {
        return Err(rule_error("length", "Password must be at least 8 characters"));
    }
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(rule_error(
            "complexity",
            "Password must contain uppercase, lowercase, and number",
        ));
    }
    Ok(())
}

fn confirmation_rule(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if confirmation.is_empty() {
        return Err(rule_error("required", "Please confirm your password"));
    }
    if password != confirmation {
        return Err(rule_error("must_match", "Passwords do not match"));
    }
    Ok(())
}

fn accepted(value: &bool) -> Result<(), ValidationError> {
    if !*value {
        return Err(rule_error("accepted", "You must agree to the terms and conditions"));
    }
    Ok(())
}

/// Password strength meter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    /// 0..=5, one point per rule met
    pub score: u8,
    /// `""` for an empty password
    pub label: &'static str,
}

const STRENGTH_LABELS: [&str; 5] = ["Very Weak", "Weak", "Fair", "Good", "Strong"];

pub fn password_strength(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength { score: 0, label: "" };
    }
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = checks.iter().filter(|&&ok| ok).count() as u8;
    PasswordStrength {
        score,
        label: STRENGTH_LABELS
            .get(usize::from(score).saturating_sub(1))
            .copied()
            .unwrap_or_default(),
    }
}

// =============================================================================
// Login
// =============================================================================

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "email_rule"))]
    pub email: String,
    #[validate(custom(function = "password_present"))]
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        derived(self).into_result()
    }

    pub fn into_request(self) -> Result<LoginRequest, FormErrors> {
        self.check()?;
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password,
            remember_me: self.remember_me,
        })
    }
}

// =============================================================================
// Registration
// =============================================================================

#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom(function = "email_rule"))]
    pub email: String,
    #[validate(custom(function = "password_rules"))]
    pub password: String,
    pub password_confirmation: String,
    #[validate(required(message = "Department is required"))]
    pub department_id: Option<i64>,
    #[validate(required(message = "Location is required"))]
    pub location_id: Option<i64>,
    #[validate(required(message = "Role is required"))]
    pub role_id: Option<i64>,
    #[validate(custom(function = "accepted"))]
    pub agree_to_terms: bool,
}

impl RegisterForm {
    fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            ..self.clone()
        }
    }

    pub fn check(&self) -> Result<(), FormErrors> {
        let mut errors = derived(&self.trimmed());
        if let Err(e) = confirmation_rule(&self.password, &self.password_confirmation) {
            errors.add("password_confirmation", e.message.unwrap_or_default());
        }
        errors.into_result()
    }

    pub fn into_request(self) -> Result<RegisterRequest, FormErrors> {
        self.check()?;
        let form = self.trimmed();
        Ok(RegisterRequest {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email.trim().to_string(),
            password: form.password,
            password_confirmation: form.password_confirmation,
            role_id: form.role_id.unwrap_or_default(),
            department_id: form.department_id.unwrap_or_default(),
            location_id: form.location_id,
        })
    }
}

// =============================================================================
// Add user (admin)
// =============================================================================

#[derive(Debug, Clone, Default, Validate)]
pub struct AddUserForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom(function = "email_rule"))]
    pub email: String,
    #[validate(custom(function = "password_rules"))]
    pub password: String,
    #[validate(required(message = "Role is required"))]
    pub role_id: Option<i64>,
    #[validate(required(message = "Department is required"))]
    pub department_id: Option<i64>,
}

impl AddUserForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        let trimmed = Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            ..self.clone()
        };
        derived(&trimmed).into_result()
    }

    /// Register payload; the confirmation mirrors the password
    pub fn into_request(self) -> Result<RegisterRequest, FormErrors> {
        self.check()?;
        Ok(RegisterRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password_confirmation: self.password.clone(),
            password: self.password,
            role_id: self.role_id.unwrap_or_default(),
            department_id: self.department_id.unwrap_or_default(),
            location_id: None,
        })
    }
}

// =============================================================================
// Profile
// =============================================================================

#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileUpdateForm {
    #[validate(custom(function = "email_rule"))]
    pub email: String,
    /// Blank keeps the current password
    pub password: String,
    pub password_confirmation: String,
}

impl ProfileUpdateForm {
    fn changes_password(&self) -> bool {
        !self.password.trim().is_empty()
    }

    pub fn check(&self) -> Result<(), FormErrors> {
        let mut errors = derived(self);
        if self.changes_password() {
            if let Err(e) = password_rules(&self.password) {
                errors.add("password", e.message.unwrap_or_default());
            }
            if let Err(e) = confirmation_rule(&self.password, &self.password_confirmation) {
                errors.add("password_confirmation", e.message.unwrap_or_default());
            }
        }
        errors.into_result()
    }

    pub fn into_request(self) -> Result<UpdateProfileRequest, FormErrors> {
        self.check()?;
        let changes_password = self.changes_password();
        Ok(UpdateProfileRequest {
            email: self.email.trim().to_string(),
            password: changes_password.then_some(self.password),
            password_confirmation: changes_password.then_some(self.password_confirmation),
        })
    }
}

// =============================================================================
// New ticket (two steps)
// =============================================================================

/// Steps of the new-ticket form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TicketFormStep {
    /// Category, title, description
    Details,
    /// Location, contact, priority and urgency
    Contact,
}

impl TicketFormStep {
    fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Details => &["category_id", "title", "description"],
            Self::Contact => &["location_id", "department_id", "contact_number", "urgency_reason"],
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct NewTicketForm {
    #[validate(required(message = "Please select a category"))]
    pub category_id: Option<i64>,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(required(message = "Location is required"))]
    pub location_id: Option<i64>,
    #[validate(required(message = "Department is required"))]
    pub department_id: Option<i64>,
    #[validate(length(min = 1, message = "Contact phone is required"))]
    pub contact_number: String,
    pub priority: TicketPriority,
    pub urgency_reason: String,
    pub patient_name: String,
    pub equipment_details: String,
}

impl NewTicketForm {
    fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            contact_number: self.contact_number.trim().to_string(),
            urgency_reason: self.urgency_reason.trim().to_string(),
            patient_name: self.patient_name.trim().to_string(),
            equipment_details: self.equipment_details.trim().to_string(),
            ..self.clone()
        }
    }

    fn all_errors(&self) -> FormErrors {
        let form = self.trimmed();
        let mut errors = derived(&form);
        if form.priority.requires_urgency_reason() && form.urgency_reason.is_empty() {
            errors.add("urgency_reason", "Please explain why this is urgent");
        }
        errors
    }

    /// Validate only the fields shown on `step`
    pub fn check_step(&self, step: TicketFormStep) -> Result<(), FormErrors> {
        self.all_errors().retain(step.fields()).into_result()
    }

    pub fn check(&self) -> Result<(), FormErrors> {
        self.all_errors().into_result()
    }

    pub fn into_payload(self) -> Result<TicketCreate, FormErrors> {
        self.check()?;
        let form = self.trimmed();
        let optional = |value: String| (!value.is_empty()).then_some(value);
        Ok(TicketCreate {
            title: form.title,
            description: form.description,
            category_id: form.category_id.unwrap_or_default(),
            location_id: form.location_id.unwrap_or_default(),
            department_id: form.department_id.unwrap_or_default(),
            priority: form.priority,
            contact_number: optional(form.contact_number),
            patient_name: optional(form.patient_name),
            equipment_details: optional(form.equipment_details),
            urgency_reason: optional(form.urgency_reason),
        })
    }
}
