//! Typed helpdesk API
//!
//! One method per backend endpoint. List endpoints tolerate every envelope
//! shape the backend uses (see [`ListPayload`]); single-record responses
//! may come bare or wrapped in `{ "data": ... }`.

use crate::client::HttpClient;
use crate::error::ClientResult;
use serde::de::DeserializeOwned;
use shared::client::{
    LoginRequest, LoginResponse, MeResponse, MessageResponse, ProfileResponse, RegisterRequest,
    RegisterResponse, UpdateProfileRequest,
};
use shared::models::{
    Category, Department, Location, Permission, Role, Ticket, TicketCreate, TicketUpdate,
    TicketUpdateCreate, UnassignRequest, User,
};
use shared::{ListPayload, RecordPayload};

/// Helpdesk API over any [`HttpClient`]
#[derive(Debug, Clone)]
pub struct IhomsApi<C> {
    client: C,
}

impl<C: HttpClient> IhomsApi<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn token(&self) -> Option<&str> {
        self.client.token()
    }

    /// Attach (or drop) the bearer token for all later requests
    pub fn set_token(&mut self, token: Option<String>) {
        self.client.set_token(token);
    }

    async fn list<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<Vec<T>> {
        let payload: ListPayload<T> = self.client.get(path).await?;
        Ok(payload.into_items())
    }

    // ========== Auth ==========

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let payload: RecordPayload<LoginResponse> = self.client.post("auth/login", request).await?;
        Ok(payload.into_record())
    }

    pub async fn me(&self) -> ClientResult<MeResponse> {
        self.client.get("auth/me").await
    }

    pub async fn logout(&self) -> ClientResult<MessageResponse> {
        let response: Option<MessageResponse> = self.client.post_empty("auth/logout").await?;
        Ok(response.unwrap_or_default())
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> ClientResult<ProfileResponse> {
        self.client.post("auth/update-profile", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.client.post("auth/register", request).await
    }

    // ========== Reference data ==========

    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.list("categories").await
    }

    pub async fn departments(&self) -> ClientResult<Vec<Department>> {
        self.list("departments").await
    }

    pub async fn locations(&self) -> ClientResult<Vec<Location>> {
        self.list("locations").await
    }

    pub async fn roles(&self) -> ClientResult<Vec<Role>> {
        self.list("roles").await
    }

    pub async fn permissions(&self) -> ClientResult<Vec<Permission>> {
        self.list("permissions").await
    }

    pub async fn users(&self) -> ClientResult<Vec<User>> {
        self.list("users").await
    }

    // ========== Tickets ==========

    pub async fn tickets(&self) -> ClientResult<Vec<Ticket>> {
        self.list("tickets").await
    }

    pub async fn create_ticket(&self, payload: &TicketCreate) -> ClientResult<Ticket> {
        let created: RecordPayload<Ticket> = self.client.post("tickets", payload).await?;
        Ok(created.into_record())
    }

    pub async fn assign_ticket(&self, ticket_id: &str) -> ClientResult<Ticket> {
        let path = format!("tickets/{}/assign", ticket_id.trim());
        let updated: RecordPayload<Ticket> = self.client.post_empty(&path).await?;
        Ok(updated.into_record())
    }

    pub async fn unassign_ticket(&self, ticket_id: &str, request: &UnassignRequest) -> ClientResult<Ticket> {
        let path = format!("tickets/{}/unassign", ticket_id.trim());
        let updated: RecordPayload<Ticket> = self.client.post(&path, request).await?;
        Ok(updated.into_record())
    }

    pub async fn resolve_ticket(&self, ticket_id: &str) -> ClientResult<Ticket> {
        let path = format!("tickets/{}/resolve", ticket_id.trim());
        let updated: RecordPayload<Ticket> = self.client.post_empty(&path).await?;
        Ok(updated.into_record())
    }

    pub async fn ticket_updates(&self, ticket_id: &str) -> ClientResult<Vec<TicketUpdate>> {
        self.list(&format!("tickets/{}/updates", ticket_id.trim())).await
    }

    pub async fn post_ticket_update(
        &self,
        ticket_id: &str,
        update: &TicketUpdateCreate,
    ) -> ClientResult<TicketUpdate> {
        let path = format!("tickets/{}/updates", ticket_id.trim());
        let created: RecordPayload<TicketUpdate> = self.client.post(&path, update).await?;
        Ok(created.into_record())
    }
}
