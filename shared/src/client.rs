//! Client-related types
//!
//! Auth and account request/response bodies exchanged with the helpdesk
//! backend.

use crate::models::User;
use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request (`POST /auth/login`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "rememberMe", default)]
    pub remember_me: bool,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Current user response (`GET /auth/me`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub user: Option<User>,
}

/// Self-registration / admin "add user" request (`POST /auth/register`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub role_id: i64,
    pub department_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
}

/// Register response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

// =============================================================================
// Profile API DTOs
// =============================================================================

/// Profile update request (`POST /auth/update-profile`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

/// Profile update response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Plain acknowledgement (`POST /auth/logout`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_camel_case_flag() {
        let req = LoginRequest {
            email: "agent@ihoms.test".into(),
            password: "secret".into(),
            remember_me: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["rememberMe"], true);
        assert!(json.get("remember_me").is_none());
    }

    #[test]
    fn test_profile_request_omits_empty_password() {
        let req = UpdateProfileRequest {
            email: "a@b.c".into(),
            password: None,
            password_confirmation: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("password").is_none());
    }
}
