//! Route loaders
//!
//! Each loader fetches what one route needs and settles into a
//! [`LoaderOutcome`]. Loaders never return errors: a rejected session
//! redirects to the login route, anything else becomes a message.

use crate::api::IhomsApi;
use crate::client::HttpClient;
use crate::error::{ClientError, ClientResult};
use crate::forms::LoginForm;
use crate::routes::Route;
use crate::session::{Session, Viewer};
use crate::view::normalize::{TicketView, UserView, normalize_tickets, normalize_users};
use shared::models::{Category, Department, Permission, Role};
use std::collections::HashSet;

pub const DASHBOARD_FAILED: &str = "Failed to fetch tickets";
pub const END_USER_DASHBOARD_FAILED: &str = "Failed to load dashboard";
pub const USER_MANAGEMENT_FAILED: &str = "Failed to load data";
pub const LOGIN_FAILED: &str = "Login failed";

/// What a route renders with
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderOutcome<T> {
    Ready(T),
    /// Render the route's error state with this message
    Failed(String),
    /// Navigate elsewhere instead of rendering
    Redirect(Route),
}

impl<T> LoaderOutcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }

    fn settle(result: ClientResult<T>, fallback: &str) -> Self {
        match result {
            Ok(data) => Self::Ready(data),
            Err(ClientError::Unauthorized) => {
                tracing::info!("Session rejected while loading, redirecting to login");
                Self::Redirect(Route::Login)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Loader failed");
                Self::Failed(e.user_message(fallback))
            }
        }
    }
}

/// Gate for authenticated routes: the current viewer, or a redirect to login
pub async fn root_guard<C: HttpClient>(session: &mut Session<C>) -> LoaderOutcome<Viewer> {
    match session.check().await {
        Ok(Some(viewer)) => LoaderOutcome::Ready(viewer),
        Ok(None) => LoaderOutcome::Redirect(Route::Login),
        Err(e) => {
            tracing::warn!(error = %e, "Auth check failed, treating as signed out");
            LoaderOutcome::Redirect(Route::Login)
        }
    }
}

/// `/dashboard`: every ticket visible to the viewer
pub async fn dashboard_loader<C: HttpClient>(api: &IhomsApi<C>) -> LoaderOutcome<Vec<TicketView>> {
    let result = api.tickets().await.map(normalize_tickets);
    if let Ok(tickets) = &result {
        tracing::debug!(count = tickets.len(), "Dashboard tickets loaded");
    }
    LoaderOutcome::settle(result, DASHBOARD_FAILED)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndUserDashboardData {
    pub categories: Vec<Category>,
    /// The viewer's own tickets
    pub tickets: Vec<TicketView>,
}

/// `/end-user-dashboard`: categories and tickets, fetched together
pub async fn end_user_dashboard_loader<C: HttpClient>(
    api: &IhomsApi<C>,
) -> LoaderOutcome<EndUserDashboardData> {
    let (categories, tickets) = tokio::join!(api.categories(), api.tickets());
    let result = categories.and_then(|categories| {
        Ok(EndUserDashboardData {
            categories,
            tickets: normalize_tickets(tickets?),
        })
    });
    LoaderOutcome::settle(result, END_USER_DASHBOARD_FAILED)
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserManagementData {
    pub roles: Vec<Role>,
    /// De-duplicated, first occurrence kept
    pub departments: Vec<Department>,
    pub users: Vec<UserView>,
    pub permissions: Vec<Permission>,
}

/// Drop departments whose id (or name, when id-less) was already seen
pub fn dedup_departments(departments: Vec<Department>) -> Vec<Department> {
    let mut seen = HashSet::new();
    departments
        .into_iter()
        .filter(|d| seen.insert(d.identity()))
        .collect()
}

/// `/dashboard/user-management`: roles, departments, users and permissions
pub async fn user_management_loader<C: HttpClient>(
    api: &IhomsApi<C>,
) -> LoaderOutcome<UserManagementData> {
    let (roles, departments, users, permissions) =
        tokio::join!(api.roles(), api.departments(), api.users(), api.permissions());

    let result = roles.and_then(|roles| {
        Ok(UserManagementData {
            roles,
            departments: dedup_departments(departments?),
            users: normalize_users(users?),
            permissions: permissions?,
        })
    });
    LoaderOutcome::settle(result, USER_MANAGEMENT_FAILED)
}

/// Login form submission: redirect to the viewer's landing route, or the
/// message to show under the form
pub async fn login_action<C: HttpClient>(
    session: &mut Session<C>,
    form: LoginForm,
) -> LoaderOutcome<()> {
    let request = match form.into_request() {
        Ok(request) => request,
        Err(errors) => {
            let message = errors
                .as_map()
                .values()
                .flatten()
                .next()
                .cloned()
                .unwrap_or_else(|| LOGIN_FAILED.to_string());
            return LoaderOutcome::Failed(message);
        }
    };

    match session.login(&request).await {
        Ok(route) => LoaderOutcome::Redirect(route),
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            LoaderOutcome::Failed(
                e.server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| LOGIN_FAILED.to_string()),
            )
        }
    }
}
