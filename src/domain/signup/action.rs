//! Page flow of the public membership form.
//!
//! Each request carries an `action` naming the page to show or the
//! submission to process. Submissions either complete (`add` → `added`) or
//! fall back to the page they came from (`add` → `create`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormAction {
    /// Table of open membership types.
    Table,
    /// Blank subscription form.
    Create,
    /// Email-only form for finding an existing membership.
    Identify,
    /// Identification submitted; an email has been sent.
    Identified,
    /// Renewal form for a member reached through a renewal link.
    Renew,
    /// Edit form for a member reached through a renewal link.
    Update,
    /// New subscription submitted.
    Add,
    /// Renewal submitted.
    RenewAdd,
    /// Member information update submitted.
    UpdateConfirm,
    Added,
    RenewAdded,
    Updated,
    SearchConfirm,
}

impl FormAction {
    pub const ALL: [FormAction; 13] = [
        FormAction::Table,
        FormAction::Create,
        FormAction::Identify,
        FormAction::Identified,
        FormAction::Renew,
        FormAction::Update,
        FormAction::Add,
        FormAction::RenewAdd,
        FormAction::UpdateConfirm,
        FormAction::Added,
        FormAction::RenewAdded,
        FormAction::Updated,
        FormAction::SearchConfirm,
    ];

    /// Parses a request parameter. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let action = match value.trim() {
            "table" => FormAction::Table,
            "create" => FormAction::Create,
            "identify" => FormAction::Identify,
            "identified" => FormAction::Identified,
            "renew" => FormAction::Renew,
            "update" => FormAction::Update,
            "add" => FormAction::Add,
            "renew_add" => FormAction::RenewAdd,
            "update_confirm" => FormAction::UpdateConfirm,
            "added" => FormAction::Added,
            "renew_added" => FormAction::RenewAdded,
            "updated" => FormAction::Updated,
            "search_confirm" => FormAction::SearchConfirm,
            _ => return None,
        };
        Some(action)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormAction::Table => "table",
            FormAction::Create => "create",
            FormAction::Identify => "identify",
            FormAction::Identified => "identified",
            FormAction::Renew => "renew",
            FormAction::Update => "update",
            FormAction::Add => "add",
            FormAction::RenewAdd => "renew_add",
            FormAction::UpdateConfirm => "update_confirm",
            FormAction::Added => "added",
            FormAction::RenewAdded => "renew_added",
            FormAction::Updated => "updated",
            FormAction::SearchConfirm => "search_confirm",
        }
    }

    /// Submissions that write a membership record.
    pub fn is_submission(&self) -> bool {
        matches!(
            self,
            FormAction::Add | FormAction::RenewAdd | FormAction::UpdateConfirm
        )
    }

    /// Pages rendered as the interactive form.
    pub fn is_form_page(&self) -> bool {
        matches!(
            self,
            FormAction::Create | FormAction::Renew | FormAction::Update | FormAction::Identify
        )
    }

    /// Pages rendered as a completion message.
    pub fn is_completion_page(&self) -> bool {
        matches!(
            self,
            FormAction::Added
                | FormAction::RenewAdded
                | FormAction::Updated
                | FormAction::Identified
                | FormAction::SearchConfirm
        )
    }

    /// Actions that operate on an existing member reached by a renewal link.
    pub fn requires_member(&self) -> bool {
        matches!(
            self,
            FormAction::Renew | FormAction::Update | FormAction::UpdateConfirm | FormAction::RenewAdd
        )
    }

    /// Form page to fall back to when a submission is rejected.
    pub fn pre_submit(&self) -> Option<FormAction> {
        match self {
            FormAction::Add => Some(FormAction::Create),
            FormAction::RenewAdd => Some(FormAction::Renew),
            FormAction::UpdateConfirm => Some(FormAction::Update),
            _ => None,
        }
    }

    /// Completion page reached by a successful submission.
    pub fn completed(&self) -> Option<FormAction> {
        match self {
            FormAction::Add => Some(FormAction::Added),
            FormAction::RenewAdd => Some(FormAction::RenewAdded),
            FormAction::UpdateConfirm => Some(FormAction::Updated),
            _ => None,
        }
    }

    /// Action posted by the form rendered for this page.
    pub fn next_action(&self, has_email: bool) -> FormAction {
        match self {
            FormAction::Renew => FormAction::RenewAdd,
            FormAction::Update => FormAction::UpdateConfirm,
            FormAction::Create if has_email => FormAction::Add,
            FormAction::Identify => FormAction::Identified,
            _ => FormAction::Identify,
        }
    }
}

impl fmt::Display for FormAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for FormAction {
    fn can_transition_to(&self, target: &Self) -> bool {
        use FormAction::*;
        matches!(
            (self, target),
            (Table, Identify)
                | (Table, Create)
                | (Create, Add)
                | (Create, Identify)
                | (Identify, Identified)
                | (Identify, Create)
                | (Renew, RenewAdd)
                | (Update, UpdateConfirm)
                | (Add, Added)
                | (Add, Create)
                | (RenewAdd, RenewAdded)
                | (RenewAdd, Renew)
                | (RenewAdd, UpdateConfirm)
                | (UpdateConfirm, Updated)
                | (UpdateConfirm, Update)
                | (Identified, SearchConfirm)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use FormAction::*;
        match self {
            Table => vec![Identify, Create],
            Create => vec![Add, Identify],
            Identify => vec![Identified, Create],
            Renew => vec![RenewAdd],
            Update => vec![UpdateConfirm],
            Add => vec![Added, Create],
            RenewAdd => vec![RenewAdded, Renew, UpdateConfirm],
            UpdateConfirm => vec![Updated, Update],
            Identified => vec![SearchConfirm],
            Added | RenewAdded | Updated | SearchConfirm => vec![],
        }
    }
}
