//! Permission gate
//!
//! Decides which ticket actions a viewer sees. The result depends only on
//! the ticket's status and assignee, the viewer and the role policy, so it
//! can be recomputed freely.

use super::normalize::TicketView;
use crate::session::Viewer;
use shared::models::same_id;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Shown in place of action buttons when nothing is available
pub const NO_ACTIONS: &str = "No actions available";

/// What a role may do to tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Take an unowned ticket, release one's own
    Assign,
    /// Act on a ticket owned by someone else
    Reassign,
}

/// Role -> capability table. Role names are compared lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    roles: BTreeMap<String, BTreeSet<Capability>>,
}

impl RolePolicy {
    /// Policy granting nothing to anyone
    pub fn empty() -> Self {
        Self {
            roles: BTreeMap::new(),
        }
    }

    pub fn grant(mut self, role: &str, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.roles
            .entry(role.trim().to_lowercase())
            .or_default()
            .extend(capabilities);
        self
    }

    pub fn allows(&self, role: &str, capability: Capability) -> bool {
        self.roles
            .get(&role.trim().to_lowercase())
            .is_some_and(|caps| caps.contains(&capability))
    }
}

impl Default for RolePolicy {
    /// Admins assign and reassign; agents assign
    fn default() -> Self {
        Self::empty()
            .grant("admin", [Capability::Assign, Capability::Reassign])
            .grant("agent", [Capability::Assign])
    }
}

/// Action affordance on a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TicketAction {
    AssignToMe,
    Unassign,
    Reassign,
    Resolve,
}

impl TicketAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AssignToMe => "Assign to me",
            Self::Unassign => "Unassign",
            Self::Reassign => "Reassign",
            Self::Resolve => "Resolve",
        }
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Visible actions, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSet(BTreeSet<TicketAction>);

impl ActionSet {
    pub fn contains(&self, action: TicketAction) -> bool {
        self.0.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = TicketAction> + '_ {
        self.0.iter().copied()
    }

    /// Labels joined for display, or [`NO_ACTIONS`]
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return NO_ACTIONS.to_string();
        }
        self.iter().map(|a| a.label()).collect::<Vec<_>>().join(" | ")
    }
}

impl FromIterator<TicketAction> for ActionSet {
    fn from_iter<I: IntoIterator<Item = TicketAction>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

enum Ownership {
    Unowned,
    Viewer,
    Other,
}

fn ownership(ticket: &TicketView, viewer: &Viewer) -> Ownership {
    match &ticket.assignee_id {
        Some(assignee) if same_id(assignee, &viewer.id) => Ownership::Viewer,
        Some(_) => Ownership::Other,
        // An embedded assignee without an id still means someone owns it
        None if ticket.assigned_to.is_some() => Ownership::Other,
        None => Ownership::Unowned,
    }
}

/// Actions `viewer` may take on `ticket`. Either missing yields no actions.
pub fn compute_actions(
    ticket: Option<&TicketView>,
    viewer: Option<&Viewer>,
    policy: &RolePolicy,
) -> ActionSet {
    let (Some(ticket), Some(viewer)) = (ticket, viewer) else {
        return ActionSet::default();
    };
    if !ticket.status.is_actionable() {
        return ActionSet::default();
    }

    let can_assign = policy.allows(&viewer.role_name, Capability::Assign);
    let can_reassign = policy.allows(&viewer.role_name, Capability::Reassign);

    let mut actions = BTreeSet::new();
    match ownership(ticket, viewer) {
        Ownership::Unowned => {
            if can_assign {
                actions.insert(TicketAction::AssignToMe);
            }
        }
        Ownership::Viewer => {
            if can_assign {
                actions.insert(TicketAction::Unassign);
            }
            actions.insert(TicketAction::Resolve);
        }
        Ownership::Other => {
            if can_reassign {
                actions.insert(TicketAction::Reassign);
            }
        }
    }
    ActionSet(actions)
}
