//! Subcommand handlers

use crate::cli::{Command, CreateArgs, LoginArgs, TicketListArgs, UserListArgs};
use crate::render;
use anyhow::{Context, Result, bail};
use ihoms_client::forms::{LoginForm, NewTicketForm, TicketFormStep};
use ihoms_client::loader::{dashboard_loader, login_action, root_guard, user_management_loader};
use ihoms_client::view::compute_actions;
use ihoms_client::{
    ActionDispatcher, ClientConfig, Facet, ListState, LoaderOutcome, NetworkHttpClient, RolePolicy,
    Session, TicketAction, TicketBoard, TicketFilter, TicketPriority, UserFilter, UserStats,
    UserStatus, Viewer,
};

type ConsoleSession = Session<NetworkHttpClient>;

pub async fn run(command: Command, config: &ClientConfig) -> Result<()> {
    let client = config
        .build_http_client()
        .context("Failed to build HTTP client")?;
    let mut session = Session::with_store(client, config.session_store());
    session.restore();

    match command {
        Command::Login(args) => login(&mut session, args).await,
        Command::Logout => {
            session.logout().await;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            let viewer = require_viewer(&mut session).await?;
            println!("{} <{}> ({})", viewer.full_name, viewer.email, viewer.role_name);
            Ok(())
        }
        Command::Tickets(args) => list_tickets(&mut session, args, config.page_size).await,
        Command::Show { id } => show_ticket(&mut session, &id).await,
        Command::Assign { id } => {
            let wanted = [TicketAction::AssignToMe, TicketAction::Reassign];
            ticket_action(&mut session, &id, &wanted).await
        }
        Command::Unassign { id } => ticket_action(&mut session, &id, &[TicketAction::Unassign]).await,
        Command::Resolve { id } => ticket_action(&mut session, &id, &[TicketAction::Resolve]).await,
        Command::Create(args) => create_ticket(&mut session, args).await,
        Command::Comment { id, text } => comment(&mut session, &id, &text).await,
        Command::Users(args) => list_users(&mut session, args, config.page_size).await,
    }
}

fn settle<T>(outcome: LoaderOutcome<T>) -> Result<T> {
    match outcome {
        LoaderOutcome::Ready(data) => Ok(data),
        LoaderOutcome::Failed(message) => bail!(message),
        LoaderOutcome::Redirect(_) => bail!("Your session has expired. Run `ihoms-console login`."),
    }
}

async fn require_viewer(session: &mut ConsoleSession) -> Result<Viewer> {
    match root_guard(session).await {
        LoaderOutcome::Ready(viewer) => Ok(viewer),
        _ => bail!("Not logged in. Run `ihoms-console login` first."),
    }
}

async fn load_board(session: &ConsoleSession) -> Result<TicketBoard> {
    settle(dashboard_loader(session.api()).await).map(TicketBoard::new)
}

async fn login(session: &mut ConsoleSession, args: LoginArgs) -> Result<()> {
    let form = LoginForm {
        email: args.email,
        password: args.password,
        remember_me: args.remember,
    };
    match login_action(session, form).await {
        LoaderOutcome::Redirect(route) => {
            let name = session.viewer().map(|v| v.full_name.clone()).unwrap_or_default();
            println!("Logged in as {} (home: {})", name, route);
            Ok(())
        }
        LoaderOutcome::Failed(message) => bail!(message),
        LoaderOutcome::Ready(()) => Ok(()),
    }
}

async fn list_tickets(session: &mut ConsoleSession, args: TicketListArgs, default_page_size: usize) -> Result<()> {
    let viewer = require_viewer(session).await?;
    let board = load_board(session).await?;
    let policy = RolePolicy::default();

    let filter = TicketFilter::default()
        .with_query(args.query)
        .with_tab(args.tab)
        .with_priority(Facet::from_param(&args.priority, TicketPriority::from_wire))
        .with_category(&args.category);
    let mut state = ListState::with_filter(filter, args.page_size.unwrap_or(default_page_size));
    state.view(board.tickets());
    state.go_to(args.page);
    let page = state.view(board.tickets());

    render::ticket_stats(&board.stats());
    if page.items.is_empty() {
        println!("No tickets match.");
    }
    for ticket in &page.items {
        println!("{}", render::ticket_row(ticket, &viewer, &policy));
    }
    render::page_footer(&page);
    Ok(())
}

async fn show_ticket(session: &mut ConsoleSession, id: &str) -> Result<()> {
    let viewer = require_viewer(session).await?;
    let board = load_board(session).await?;
    let Some(ticket) = board.get(id) else {
        bail!("Ticket #{} not found", id);
    };
    render::ticket_detail(ticket, &viewer, &RolePolicy::default());

    println!();
    let thread = ActionDispatcher::new(session.api()).load_updates(&ticket.id).await;
    match &thread.data {
        Some(updates) => render::updates(updates),
        None => render::outcome(&thread),
    }
    Ok(())
}

/// Run the first of `wanted` the viewer may take on the ticket.
/// Fails when the backend refuses it.
async fn ticket_action(session: &mut ConsoleSession, id: &str, wanted: &[TicketAction]) -> Result<()> {
    let viewer = require_viewer(session).await?;
    let mut board = load_board(session).await?;
    let policy = RolePolicy::default();
    if !board.select(id) {
        bail!("Ticket #{} not found", id);
    }
    let Some(ticket) = board.selected().cloned() else {
        bail!("Ticket #{} not found", id);
    };
    let actions = compute_actions(Some(&ticket), Some(&viewer), &policy);
    let Some(action) = wanted.iter().copied().find(|a| actions.contains(*a)) else {
        let label = wanted.first().map(TicketAction::label).unwrap_or("Action");
        bail!("{} is not available on ticket #{} ({})", label, ticket.id, actions.summary());
    };

    let result = ActionDispatcher::new(session.api()).perform(action, &ticket).await;
    render::outcome(&result);
    if !result.success {
        bail!("{} failed on ticket #{}", action, ticket.id);
    }
    if board.apply(&result)
        && let Some(updated) = board.selected()
    {
        println!("{}", render::ticket_row(updated, &viewer, &policy));
    }
    Ok(())
}

async fn create_ticket(session: &mut ConsoleSession, args: CreateArgs) -> Result<()> {
    require_viewer(session).await?;
    let form = NewTicketForm {
        category_id: args.category,
        title: args.title,
        description: args.description,
        location_id: args.location,
        department_id: args.department,
        contact_number: args.contact,
        priority: TicketPriority::from_wire(&args.priority),
        urgency_reason: args.urgency_reason,
        patient_name: args.patient,
        equipment_details: args.equipment,
    };
    for step in [TicketFormStep::Details, TicketFormStep::Contact] {
        if let Err(errors) = form.check_step(step) {
            render::form_errors(&errors);
            bail!("Ticket details are incomplete");
        }
    }

    let result = ActionDispatcher::new(session.api()).create_ticket(&form).await;
    render::outcome(&result);
    match result.data {
        Some(ticket) => {
            println!("Ticket number: #{}", ticket.id);
            Ok(())
        }
        None => bail!("Ticket was not created"),
    }
}

async fn comment(session: &mut ConsoleSession, id: &str, text: &str) -> Result<()> {
    require_viewer(session).await?;
    let result = ActionDispatcher::new(session.api()).post_update(id, text).await;
    render::outcome(&result);
    if !result.success {
        bail!("Comment was not added to ticket #{}", id);
    }
    println!("Comment added to ticket #{}", id);
    Ok(())
}

async fn list_users(session: &mut ConsoleSession, args: UserListArgs, default_page_size: usize) -> Result<()> {
    require_viewer(session).await?;
    let data = settle(user_management_loader(session.api()).await)?;

    let filter = UserFilter::default()
        .with_search(args.search)
        .with_role(&args.role)
        .with_status(Facet::from_param(&args.status, UserStatus::from_wire));
    let mut state = ListState::with_filter(filter, args.page_size.unwrap_or(default_page_size));
    state.view(data.users.as_slice());
    state.go_to(args.page);
    let page = state.view(data.users.as_slice());

    render::user_stats(&UserStats::from_users(&data.users));
    for user in &page.items {
        println!("{}", render::user_row(user));
    }
    render::page_footer(&page);
    Ok(())
}
