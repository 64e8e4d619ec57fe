mod common;

use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use common::{Hits, api, error, ticket, user};
use ihoms_client::dispatcher::ActionKind;
use ihoms_client::error::{MSG_NETWORK, MSG_SERVER};
use ihoms_client::forms::NewTicketForm;
use ihoms_client::loader::dashboard_loader;
use ihoms_client::view::compute_actions;
use ihoms_client::{
    ActionDispatcher, ErrorKind, IhomsApi, NetworkHttpClient, Notice, RolePolicy, TicketAction,
    TicketBoard, TicketPriority, TicketStatus, Viewer,
};
use shared::models::User;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn tickets_route() -> Router {
    Router::new().route(
        "/tickets",
        get(|| async {
            Json(json!({
                "success": true,
                "data": [ticket(5, "open", None), ticket(7, "open", None), ticket(9, "in_progress", Some(3))]
            }))
        }),
    )
}

async fn loaded_board(router: Router) -> TicketBoard {
    let tickets = dashboard_loader(&api(router))
        .await
        .ready()
        .expect("tickets should load");
    TicketBoard::new(tickets)
}

#[tokio::test]
async fn test_assign_replaces_only_the_confirmed_record() {
    let router = tickets_route().route(
        "/tickets/{id}/assign",
        post(|Path(id): Path<i64>| async move {
            Json(json!({ "data": ticket(id, "in_progress", Some(42)) }))
        }),
    );
    let mut board = loaded_board(router.clone()).await;
    assert!(board.select("7"));
    let untouched = board.get("5").cloned();

    let api = api(router);
    let dispatcher = ActionDispatcher::new(&api);
    let result = dispatcher.assign_to_me("7").await;

    assert!(result.success);
    assert!(board.apply(&result));
    let seven = board.get("7").unwrap();
    assert_eq!(seven.assignee_id.as_deref(), Some("42"));
    assert_eq!(seven.status, TicketStatus::InProgress);
    assert_eq!(board.selected().unwrap().assignee_id.as_deref(), Some("42"));
    assert_eq!(board.get("5").cloned(), untouched);
    assert_eq!(board.tickets().len(), 3);
}

#[tokio::test]
async fn test_assign_conflict_leaves_board_unchanged() {
    let router = tickets_route().route(
        "/tickets/{id}/assign",
        post(|| async { error(StatusCode::CONFLICT, "Ticket already assigned") }),
    );
    let mut board = loaded_board(router.clone()).await;
    let before = board.clone();

    let api = api(router);
    let result = ActionDispatcher::new(&api).assign_to_me("7").await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Conflict));
    assert!(!board.apply(&result));
    assert_eq!(board, before);
    assert_eq!(
        result.notice(),
        Some(Notice::Warning("Someone already took this ticket. Please refresh.".into()))
    );
}

#[tokio::test]
async fn test_resolve_forbidden_has_its_own_message() {
    let router = Router::new().route(
        "/tickets/{id}/resolve",
        post(|| async { error(StatusCode::FORBIDDEN, "This action is unauthorized.") }),
    );
    let api = api(router);
    let result = ActionDispatcher::new(&api).resolve("9").await;

    assert_eq!(result.error_kind, Some(ErrorKind::Forbidden));
    assert_eq!(
        result.notice(),
        Some(Notice::Error("Only the current assignee can resolve this ticket.".into()))
    );
}

#[tokio::test]
async fn test_server_error_uses_generic_text() {
    let router = Router::new().route(
        "/tickets/{id}/unassign",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
    );
    let api = api(router);
    let result = ActionDispatcher::new(&api).unassign("9", Some("3")).await;

    assert_eq!(result.error_kind, Some(ErrorKind::Server));
    assert_eq!(result.error.as_deref(), Some(MSG_SERVER));
}

#[tokio::test]
async fn test_unassign_sends_expected_assignee() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let router = Router::new().route(
        "/tickets/{id}/unassign",
        post({
            let seen = seen.clone();
            move |Path(id): Path<i64>, Json(body): Json<Value>| async move {
                *seen.lock().unwrap() = Some(body);
                Json(ticket(id, "open", None))
            }
        }),
    );
    let api = api(router);
    let result = ActionDispatcher::new(&api).unassign("9", Some("3")).await;

    assert!(result.success);
    assert!(result.data.unwrap().assignee_id.is_none());
    assert_eq!(seen.lock().unwrap().clone(), Some(json!({ "expected_assignee_id": 3 })));
}

#[tokio::test]
async fn test_second_call_while_in_flight_is_refused() {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/tickets/{id}/assign",
            post({
                let hits = hits.clone();
                move |Path(id): Path<i64>| async move {
                    hits.bump();
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Json(ticket(id, "in_progress", Some(42)))
                }
            }),
        )
        .route(
            "/tickets/{id}/resolve",
            post(|Path(id): Path<i64>| async move { Json(ticket(id, "resolved", Some(42))) }),
        );
    let api = api(router);
    let dispatcher = ActionDispatcher::new(&api);

    let (first, second, other) = tokio::join!(
        dispatcher.assign_to_me("7"),
        dispatcher.assign_to_me("7"),
        dispatcher.resolve("9"),
    );

    assert!(first.success);
    assert!(second.busy);
    assert!(second.notice().is_none());
    assert!(other.success);
    assert_eq!(hits.get(), 1);
    assert!(!dispatcher.is_busy(ActionKind::Assign));

    let again = dispatcher.assign_to_me("7").await;
    assert!(again.success);
    assert_eq!(hits.get(), 2);
}

#[tokio::test]
async fn test_create_ticket_validates_before_sending() {
    let hits = Hits::default();
    let router = Router::new().route(
        "/tickets",
        post({
            let hits = hits.clone();
            move || async move {
                hits.bump();
                Json(ticket(100, "open", None))
            }
        }),
    );
    let api = api(router);
    let dispatcher = ActionDispatcher::new(&api);

    let result = dispatcher.create_ticket(&NewTicketForm::default()).await;
    assert_eq!(result.error_kind, Some(ErrorKind::Validation));
    assert_eq!(result.field_error("title"), Some("Title is required"));
    assert_eq!(hits.get(), 0);

    let form = NewTicketForm {
        category_id: Some(1),
        title: "Printer jam".into(),
        description: "Tray 2".into(),
        location_id: Some(4),
        department_id: Some(2),
        contact_number: "555-1234".into(),
        priority: TicketPriority::Low,
        ..NewTicketForm::default()
    };
    let result = dispatcher.create_ticket(&form).await;
    assert!(result.success);
    assert_eq!(result.data.as_ref().unwrap().id, "100");
    assert_eq!(result.notice(), Some(Notice::Success("Ticket created successfully".into())));
    assert_eq!(hits.get(), 1);
}

#[tokio::test]
async fn test_create_ticket_surfaces_backend_field_errors() {
    let router = Router::new().route(
        "/tickets",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": "The given data was invalid.",
                    "errors": { "category_id": ["The selected category id is invalid."] }
                })),
            )
        }),
    );
    let api = api(router);
    let form = NewTicketForm {
        category_id: Some(99),
        title: "t".into(),
        description: "d".into(),
        location_id: Some(1),
        department_id: Some(1),
        contact_number: "1".into(),
        ..NewTicketForm::default()
    };
    let result = ActionDispatcher::new(&api).create_ticket(&form).await;

    assert_eq!(result.field_error("category_id"), Some("The selected category id is invalid."));
    assert!(result.notice().is_none());
}

#[tokio::test]
async fn test_comment_thread() {
    let router = Router::new().route(
        "/tickets/{id}/updates",
        get(|| async {
            Json(json!({ "data": [{ "id": 1, "message": "On it", "user": { "first_name": "Jo" } }] }))
        })
        .post(|Json(body): Json<Value>| async move {
            Json(json!({ "id": 2, "body": body["message"], "created_at": "2025-05-28T08:00:00Z" }))
        }),
    );
    let api = api(router);
    let dispatcher = ActionDispatcher::new(&api);

    let thread = dispatcher.load_updates("7").await;
    assert_eq!(thread.data.unwrap()[0].message.as_deref(), Some("On it"));

    let posted = dispatcher.post_update("7", "  Replaced the toner  ").await;
    assert_eq!(posted.data.unwrap().message.as_deref(), Some("Replaced the toner"));

    let blank = dispatcher.post_update("7", "   ").await;
    assert_eq!(blank.error_kind, Some(ErrorKind::Validation));
}

#[tokio::test]
async fn test_reassign_is_one_assign_call() {
    let assigns = Hits::default();
    let unassigns = Hits::default();
    let router = tickets_route()
        .route(
            "/tickets/{id}/assign",
            post({
                let assigns = assigns.clone();
                move |Path(id): Path<i64>| async move {
                    assigns.bump();
                    Json(ticket(id, "in_progress", Some(1)))
                }
            }),
        )
        .route(
            "/tickets/{id}/unassign",
            post({
                let unassigns = unassigns.clone();
                move |Path(id): Path<i64>| async move {
                    unassigns.bump();
                    Json(ticket(id, "open", None))
                }
            }),
        );
    let mut board = loaded_board(router.clone()).await;
    assert!(board.select("9"));
    let owned_by_other = board.selected().cloned().unwrap();

    let admin: User = serde_json::from_value(user(1, 1, "admin")).unwrap();
    let viewer = Viewer::from_user(&admin);
    let actions = compute_actions(Some(&owned_by_other), Some(&viewer), &RolePolicy::default());
    assert!(actions.contains(TicketAction::Reassign));

    let api = api(router);
    let result = ActionDispatcher::new(&api)
        .perform(TicketAction::Reassign, &owned_by_other)
        .await;

    assert!(result.success);
    assert_eq!(assigns.get(), 1);
    assert_eq!(unassigns.get(), 0);
    assert!(board.apply(&result));
    assert_eq!(board.selected().unwrap().assignee_id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_perform_unassign_sends_current_owner() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let router = tickets_route().route(
        "/tickets/{id}/unassign",
        post({
            let seen = seen.clone();
            move |Path(id): Path<i64>, Json(body): Json<Value>| async move {
                *seen.lock().unwrap() = Some(body);
                Json(ticket(id, "open", None))
            }
        }),
    );
    let board = loaded_board(router.clone()).await;
    let nine = board.get("9").cloned().unwrap();

    let api = api(router);
    let result = ActionDispatcher::new(&api).perform(TicketAction::Unassign, &nine).await;

    assert!(result.success);
    assert_eq!(seen.lock().unwrap().clone(), Some(json!({ "expected_assignee_id": 3 })));
}

#[tokio::test]
async fn test_abandoned_request_releases_its_flag() {
    let hits = Hits::default();
    let router = Router::new().route(
        "/tickets/{id}/resolve",
        post({
            let hits = hits.clone();
            move |Path(id): Path<i64>| async move {
                hits.bump();
                if hits.get() == 1 {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                Json(ticket(id, "resolved", Some(42)))
            }
        }),
    );
    let api = api(router);
    let dispatcher = ActionDispatcher::new(&api);

    let abandoned = tokio::time::timeout(Duration::from_millis(50), dispatcher.resolve("9")).await;
    assert!(abandoned.is_err());
    assert!(!dispatcher.is_busy(ActionKind::Resolve));

    let retry = dispatcher.resolve("9").await;
    assert!(!retry.busy);
    assert!(retry.success);
    assert_eq!(hits.get(), 2);
}

#[tokio::test]
async fn test_transport_timeout_is_a_network_failure() {
    let router = Router::new().route(
        "/tickets/{id}/resolve",
        post(|Path(id): Path<i64>| async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(ticket(id, "resolved", Some(42)))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = NetworkHttpClient::new(&format!("http://{}", addr), Duration::from_millis(200)).unwrap();
    let api = IhomsApi::new(client);
    let dispatcher = ActionDispatcher::new(&api);
    let result = dispatcher.resolve("9").await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Network));
    assert_eq!(result.notice(), Some(Notice::Error(MSG_NETWORK.into())));
    assert!(!dispatcher.is_busy(ActionKind::Resolve));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_failure() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = NetworkHttpClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let api = IhomsApi::new(client);
    let result = ActionDispatcher::new(&api).assign_to_me("7").await;

    assert_eq!(result.error_kind, Some(ErrorKind::Network));
    assert_eq!(result.error.as_deref(), Some(MSG_NETWORK));
}

#[tokio::test]
async fn test_dashboard_keeps_rows_with_odd_shapes() {
    let router = Router::new().route(
        "/tickets",
        get(|| async {
            Json(json!({
                "success": true,
                "data": [
                    ticket(1, "open", None),
                    { "id": 2, "title": "Flat category", "category": "Printer", "user": "someone" },
                    { "id": 3.0, "assignee_id": "42", "department": 9, "location": [] },
                    null
                ]
            }))
        }),
    );
    let board = loaded_board(router).await;

    assert_eq!(board.tickets().len(), 3);
    assert_eq!(board.get("2").unwrap().category, "Printer");
    assert_eq!(board.get("2").unwrap().requester, "");
    assert_eq!(board.get("3").unwrap().assignee_id.as_deref(), Some("42"));
    assert_eq!(board.get("3").unwrap().title, "");
}
