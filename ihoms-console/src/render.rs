//! Terminal output

use ihoms_client::forms::FormErrors;
use ihoms_client::time::format_relative_now;
use ihoms_client::view::{compute_actions, normalize::person_name};
use ihoms_client::{
    ActionResult, Notice, Page, RolePolicy, TicketStats, TicketView, UserStats, UserView, Viewer,
};
use shared::models::TicketUpdate;
use std::collections::BTreeMap;

pub fn ticket_row(ticket: &TicketView, viewer: &Viewer, policy: &RolePolicy) -> String {
    let actions = compute_actions(Some(ticket), Some(viewer), policy);
    format!(
        "#{:<5} {:<12} {:<9} {:<40} {:<20} {:<20} [{}]",
        ticket.id,
        ticket.status.label(),
        ticket.priority.label(),
        truncate(&ticket.title, 40),
        truncate(&ticket.requester, 20),
        ticket.assigned_to.as_deref().unwrap_or("-"),
        actions.summary()
    )
}

pub fn ticket_detail(ticket: &TicketView, viewer: &Viewer, policy: &RolePolicy) {
    let actions = compute_actions(Some(ticket), Some(viewer), policy);
    println!("Ticket #{}: {}", ticket.id, ticket.title);
    println!("  Status:     {}", ticket.status);
    println!("  Priority:   {}", ticket.priority);
    println!("  Category:   {}", ticket.category);
    println!("  Requester:  {}", ticket.requester);
    println!("  Location:   {}", ticket.location);
    println!("  Assigned:   {}", ticket.assigned_to.as_deref().unwrap_or("-"));
    if let Some(created) = &ticket.created_at {
        println!("  Created:    {}", format_relative_now(created));
    }
    if let Some(updated) = &ticket.updated_at {
        println!("  Updated:    {}", format_relative_now(updated));
    }
    for (label, value) in [
        ("Contact", &ticket.contact_number),
        ("Patient", &ticket.patient_name),
        ("Equipment", &ticket.equipment_details),
        ("Urgency", &ticket.urgency_reason),
    ] {
        if !value.is_empty() {
            println!("  {:<11} {}", format!("{}:", label), value);
        }
    }
    println!();
    println!("{}", ticket.description);
    println!();
    println!("Actions: {}", actions.summary());
}

pub fn updates(updates: &[TicketUpdate]) {
    if updates.is_empty() {
        println!("No updates yet.");
        return;
    }
    for update in updates {
        let author = update
            .user
            .as_ref()
            .map(|u| person_name(u.first_name.as_deref(), u.last_name.as_deref(), u.email.as_deref()))
            .unwrap_or_default();
        let when = update
            .created_at
            .as_deref()
            .map(format_relative_now)
            .unwrap_or_default();
        println!("- {} ({}): {}", author, when, update.message.as_deref().unwrap_or_default());
    }
}

pub fn ticket_stats(stats: &TicketStats) {
    println!(
        "Total {} | Open {} | In progress {} | Resolved {}",
        stats.total, stats.open, stats.in_progress, stats.resolved
    );
}

pub fn user_row(user: &UserView) -> String {
    format!(
        "#{:<5} {:<24} {:<30} {:<16} {:<20} {}",
        user.id,
        truncate(&user.full_name, 24),
        truncate(&user.email, 30),
        truncate(&user.role, 16),
        truncate(&user.department, 20),
        user.status
    )
}

pub fn user_stats(stats: &UserStats) {
    println!(
        "Total {} | Active {} | Inactive {} | Admins {}",
        stats.total, stats.active, stats.inactive, stats.admins
    );
}

pub fn page_footer<T>(page: &Page<T>) {
    println!(
        "Showing {}-{} of {} (page {} of {})",
        page.start_item(),
        page.end_item(),
        page.total,
        page.page,
        page.total_pages
    );
}

/// Print the notice and field errors of a finished action
pub fn outcome<T>(result: &ActionResult<T>) {
    match result.notice() {
        Some(Notice::Success(message)) => println!("{}", message),
        Some(Notice::Warning(message)) => eprintln!("warning: {}", message),
        Some(Notice::Error(message)) => eprintln!("error: {}", message),
        None => {}
    }
    field_errors(&result.validation_errors);
}

pub fn form_errors(errors: &FormErrors) {
    field_errors(errors.as_map());
}

fn field_errors(errors: &BTreeMap<String, Vec<String>>) {
    for (field, messages) in errors {
        for message in messages {
            eprintln!("  {}: {}", field, message);
        }
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
