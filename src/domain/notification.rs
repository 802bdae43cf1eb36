use serde::Serialize;

use super::{event::EventKind, payload::IssueFacts};

pub const DEFAULT_CARD_THEME: &str = "prompt";
pub const DEFAULT_CARD_THUMBNAIL: &str =
    "https://www.zoho.com/cliq/help/restapi/images/announce_icon.png";
const VIEW_BUTTON_LABEL: &str = "View Issue";
const VIEW_BUTTON_TYPE: &str = "+";
const OPEN_URL_ACTION: &str = "open.url";

/// Card appearance shared by every notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardStyle {
    pub theme: String,
    pub thumbnail: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            theme: DEFAULT_CARD_THEME.to_owned(),
            thumbnail: DEFAULT_CARD_THUMBNAIL.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub text: String,
    pub card: Card,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub theme: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub action: ButtonAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ActionData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionData {
    pub web: String,
}

#[must_use]
pub fn issue_link(jira_url: &str, issue_key: &str) -> String {
    format!("{}/browse/{issue_key}", jira_url.trim_end_matches('/'))
}

/// Builds the chat message for one event. Pure; never fails.
#[must_use]
pub fn build_notification(
    kind: EventKind,
    facts: &IssueFacts,
    jira_url: &str,
    style: &CardStyle,
) -> Notification {
    Notification {
        text: message_text(kind, facts),
        card: Card {
            theme: style.theme.clone(),
            thumbnail: style.thumbnail.clone(),
        },
        buttons: vec![Button {
            label: VIEW_BUTTON_LABEL.to_owned(),
            kind: VIEW_BUTTON_TYPE.to_owned(),
            action: ButtonAction {
                kind: OPEN_URL_ACTION.to_owned(),
                data: ActionData {
                    web: issue_link(jira_url, &facts.issue_key),
                },
            },
        }],
    }
}

/// Plain-text body returned to the webhook sender.
///
/// Jira integrations already parse this three-line shape, including the
/// third label, which carries the project name for comment and delete events.
#[must_use]
pub fn response_summary(kind: EventKind, facts: &IssueFacts) -> String {
    let third = match kind {
        EventKind::Commented | EventKind::Deleted => facts.project_name.as_str(),
        EventKind::Created | EventKind::Updated => {
            facts.assignee_name.as_deref().unwrap_or_default()
        }
    };

    format!(
        "Issue Key: {}\nSummary: {}\nAssignee Display Name: {third}",
        facts.issue_key, facts.issue_summary
    )
}

fn message_text(kind: EventKind, facts: &IssueFacts) -> String {
    let key = &facts.issue_key;
    let headline = match kind {
        EventKind::Commented => format!("A new comment added in the Issue {key}"),
        EventKind::Created => "A new Issue has been created in Jira".to_owned(),
        EventKind::Updated => format!("The Issue {key} has been Updated in Jira"),
        EventKind::Deleted => format!("The Issue {key} has been Deleted in Jira"),
    };

    let mut lines = vec![
        "Jira Updates".to_owned(),
        headline,
        format!("Project Name: {}", facts.project_name),
        format!("Issue ID: {key}"),
        format!("Issue Summary: {}", facts.issue_summary),
    ];

    match kind {
        EventKind::Commented => {
            lines.push(format!("Comment By: {}", optional(&facts.comment_author)));
            lines.push(format!("Comment: {}", optional(&facts.comment_body)));
        }
        EventKind::Created => {
            lines.push(format!("Assignee: {}", optional(&facts.assignee_name)));
            lines.push(format!("Reporter: {}", optional(&facts.reporter_name)));
        }
        EventKind::Updated => {
            lines.push(format!("Assignee: {}", optional(&facts.assignee_name)));
            lines.push(format!("Reporter: {}", optional(&facts.reporter_name)));
            if let Some(actor) = &facts.actor_name {
                lines.push(format!("Updated By: {actor}"));
            }
            if facts.changes.is_empty() {
                lines.push("Issue Status changed".to_owned());
            } else {
                lines.extend(facts.changes.iter().map(|change| {
                    format!("{}: {} -> {}", change.field, change.from, change.to)
                }));
            }
        }
        EventKind::Deleted => {}
    }

    lines.join("\n")
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}
