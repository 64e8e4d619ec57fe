//! In-memory stand-in for the helpdesk backend

#![allow(dead_code)]

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ihoms_client::{IhomsApi, OneshotHttpClient};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const AGENT_TOKEN: &str = "agent-token";

/// Request counter shared with route handlers
#[derive(Debug, Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn ticket(id: i64, status: &str, assignee_id: Option<i64>) -> Value {
    json!({
        "id": id,
        "title": format!("Ticket {}", id),
        "description": "Something broke",
        "status": status,
        "priority": "medium",
        "assignee_id": assignee_id,
        "user": {"id": 3, "first_name": "Regis", "last_name": "Saamit"},
        "category": {"id": 1, "name": "Printer Repair"},
        "department": {"id": 2, "name": "NURSING - OPD"},
        "created_at": "2025-05-27T12:20:00Z"
    })
}

pub fn user(id: i64, role_id: i64, role: &str) -> Value {
    json!({
        "id": id,
        "first_name": "Ana",
        "last_name": "Cruz",
        "email": "ana@ihoms.test",
        "role": {"id": role_id, "name": role},
        "department": {"id": 2, "name": "NURSING - OPD"}
    })
}

pub fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

pub fn api(router: axum::Router) -> IhomsApi<OneshotHttpClient> {
    let mut api = IhomsApi::new(OneshotHttpClient::new(router));
    api.set_token(Some(AGENT_TOKEN.to_string()));
    api
}
