//! Route table

use crate::session::Viewer;
use std::fmt;

/// Role id of self-service end users
pub const END_USER_ROLE_ID: &str = "3";

/// Client routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/` (login form)
    Login,
    Register,
    Dashboard,
    UserManagement,
    EndUserDashboard,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Self::Login,
        Self::Register,
        Self::Dashboard,
        Self::UserManagement,
        Self::EndUserDashboard,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::UserManagement => "/dashboard/user-management",
            Self::EndUserDashboard => "/end-user-dashboard",
        }
    }

    /// Resolve a path; a trailing slash is ignored
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim();
        let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    /// Where a freshly logged-in viewer goes
    pub fn landing_for(viewer: &Viewer) -> Self {
        match viewer.role_id.as_deref() {
            Some(id) if shared::models::same_id(id, END_USER_ROLE_ID) => Self::EndUserDashboard,
            _ => Self::Dashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
