use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Commented,
    Created,
    Updated,
    Deleted,
}

impl EventKind {
    /// Route segment under `/webhooks/` that serves this kind.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Commented => "comment-created",
            Self::Created => "issue-created",
            Self::Updated => "issue-updated",
            Self::Deleted => "issue-deleted",
        }
    }

    /// Maps a Jira `webhookEvent` or `issue_event_type_name` value to a kind.
    #[must_use]
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name.trim() {
            "comment_created" => Some(Self::Commented),
            "jira:issue_created" | "issue_created" => Some(Self::Created),
            "jira:issue_updated" | "issue_updated" | "issue_generic" | "issue_assigned" => {
                Some(Self::Updated)
            }
            "jira:issue_deleted" | "issue_deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
