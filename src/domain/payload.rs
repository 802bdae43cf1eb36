//! Decode boundary for Jira webhook payloads.
//!
//! Jira sends large documents whose shape drifts between event types (an
//! unassigned issue carries `"assignee": null`, deleted issues omit the
//! changelog, and so on). Only the handful of fields the relay reads are
//! modelled, and every one of them is decoded leniently: a missing value or a
//! value of the wrong shape becomes `None` instead of failing the request.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use super::{error::RelayError, event::EventKind};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    #[serde(default, deserialize_with = "lenient")]
    pub webhook_event: Option<String>,
    #[serde(
        default,
        rename = "issue_event_type_name",
        deserialize_with = "lenient"
    )]
    pub issue_event_type_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub issue: Option<Issue>,
    #[serde(default, deserialize_with = "lenient")]
    pub comment: Option<Comment>,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<IssueUser>,
    #[serde(default, deserialize_with = "lenient")]
    pub changelog: Option<Changelog>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub fields: Option<IssueFields>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueFields {
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub project: Option<Project>,
    #[serde(default, deserialize_with = "lenient")]
    pub assignee: Option<IssueUser>,
    #[serde(default, deserialize_with = "lenient")]
    pub reporter: Option<IssueUser>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueUser {
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<IssueUser>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Changelog {
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<ChangelogItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangelogItem {
    #[serde(default, deserialize_with = "lenient")]
    pub field: Option<String>,
    #[serde(default, rename = "fromString", deserialize_with = "lenient")]
    pub from_text: Option<String>,
    #[serde(default, rename = "toString", deserialize_with = "lenient")]
    pub to_text: Option<String>,
}

/// Normalized facts a notification is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFacts {
    pub issue_key: String,
    pub issue_summary: String,
    pub project_name: String,
    pub assignee_name: Option<String>,
    pub reporter_name: Option<String>,
    pub comment_body: Option<String>,
    pub comment_author: Option<String>,
    pub actor_name: Option<String>,
    pub changes: Vec<FieldChange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: String,
    pub from: String,
    pub to: String,
}

/// Parses a raw request body into the tolerant envelope.
///
/// An empty body short-circuits with [`RelayError::EmptyPayload`] before any
/// parsing. Text that is not JSON, or JSON whose top level is not an object,
/// is [`RelayError::InvalidPayload`].
pub fn decode_payload(body: &[u8]) -> Result<WebhookEnvelope, RelayError> {
    if body.is_empty() {
        return Err(RelayError::EmptyPayload);
    }

    let document = serde_json::from_slice::<Value>(body)
        .map_err(|error| RelayError::InvalidPayload(error.to_string()))?;
    if !document.is_object() {
        return Err(RelayError::InvalidPayload(
            "expected a JSON object at the top level".to_owned(),
        ));
    }

    serde_json::from_value(document).map_err(|error| RelayError::InvalidPayload(error.to_string()))
}

impl WebhookEnvelope {
    /// Resolves the event kind from `webhookEvent`, then `issue_event_type_name`.
    #[must_use]
    pub fn resolve_kind(&self) -> Option<EventKind> {
        self.webhook_event
            .as_deref()
            .and_then(EventKind::from_event_name)
            .or_else(|| {
                self.issue_event_type_name
                    .as_deref()
                    .and_then(EventKind::from_event_name)
            })
    }

    #[must_use]
    pub fn event_name(&self) -> &str {
        self.webhook_event
            .as_deref()
            .or(self.issue_event_type_name.as_deref())
            .unwrap_or_default()
    }

    /// Projects the fields relevant to `kind`; everything else is left empty.
    #[must_use]
    pub fn extract(&self, kind: EventKind) -> IssueFacts {
        let issue = self.issue.as_ref();
        let fields = issue.and_then(|issue| issue.fields.as_ref());

        let mut facts = IssueFacts {
            issue_key: issue
                .and_then(|issue| issue.key.clone())
                .unwrap_or_default(),
            issue_summary: fields
                .and_then(|fields| fields.summary.clone())
                .unwrap_or_default(),
            project_name: fields
                .and_then(|fields| fields.project.as_ref())
                .and_then(|project| project.name.clone())
                .unwrap_or_default(),
            ..IssueFacts::default()
        };

        match kind {
            EventKind::Commented => {
                let comment = self.comment.as_ref();
                facts.comment_body = comment
                    .and_then(|comment| comment.body.clone())
                    .filter(|body| !body.trim().is_empty());
                facts.comment_author = display_name(comment.and_then(|c| c.author.as_ref()));
            }
            EventKind::Created => {
                facts.assignee_name = display_name(fields.and_then(|f| f.assignee.as_ref()));
                facts.reporter_name = display_name(fields.and_then(|f| f.reporter.as_ref()));
            }
            EventKind::Updated => {
                facts.assignee_name = display_name(fields.and_then(|f| f.assignee.as_ref()));
                facts.reporter_name = display_name(fields.and_then(|f| f.reporter.as_ref()));
                facts.actor_name = display_name(self.user.as_ref());
                facts.changes = self
                    .changelog
                    .as_ref()
                    .map(|changelog| changelog.items.iter().filter_map(field_change).collect())
                    .unwrap_or_default();
            }
            EventKind::Deleted => {}
        }

        facts
    }
}

fn display_name(user: Option<&IssueUser>) -> Option<String> {
    user.and_then(|user| user.display_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

fn field_change(item: &ChangelogItem) -> Option<FieldChange> {
    let field = item.field.as_deref()?.trim();
    if field.is_empty() {
        return None;
    }

    Some(FieldChange {
        field: field.to_owned(),
        from: item.from_text.clone().unwrap_or_default(),
        to: item.to_text.clone().unwrap_or_default(),
    })
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
