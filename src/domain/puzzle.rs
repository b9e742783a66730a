//! The puzzle record and spoiler-aware accessors.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::status::{ActorRoles, Status};
use crate::domain::user::User;

/// Scheduling priority for a puzzle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Needed urgently.
    VeryHigh,
    /// Above the usual queue.
    High,
    /// Default.
    #[default]
    Medium,
    /// Can wait.
    Low,
    /// Nice to have.
    VeryLow,
}

/// A puzzle under production.
///
/// The `name` is spoilery; the `codename` is the safe handle unspoiled
/// users see. The first entry in `authors` is the lead author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    /// Puzzle id.
    pub id: Uuid,
    /// Real title (spoilery).
    pub name: String,
    /// Spoiler-free codename.
    pub codename: String,
    /// Current workflow status.
    pub status: Status,
    /// When the status last changed.
    pub status_mtime: OffsetDateTime,
    /// When anything about the puzzle last changed.
    pub last_updated: OffsetDateTime,
    /// Spoiler-free summary, safe to show to anyone.
    pub summary: String,
    /// Full description (spoilery).
    pub description: String,
    /// Editor notes (spoilery).
    pub notes: String,
    /// Authors; the first one is the lead.
    pub authors: Vec<Uuid>,
    /// Assigned editors.
    pub editors: Vec<Uuid>,
    /// Assigned postprodders.
    pub postprodders: Vec<Uuid>,
    /// Assigned factcheckers.
    pub factcheckers: Vec<Uuid>,
    /// Users explicitly spoiled on the puzzle.
    pub spoiled: Vec<Uuid>,
    /// Chat channel id, opaque to this service.
    pub chat_channel_id: Option<String>,
    /// Content document id, opaque to this service.
    pub content_document_id: Option<String>,
    /// Solution document id, opaque to this service.
    pub solution_document_id: Option<String>,
    /// Scheduling priority.
    pub priority: Priority,
}

impl Puzzle {
    /// Create a puzzle at the start of the workflow. The author is spoiled
    /// on their own puzzle from the beginning.
    pub fn new(name: String, codename: String, author: Uuid) -> Puzzle {
        let now = OffsetDateTime::now_utc();
        Puzzle {
            id: Uuid::new_v4(),
            name,
            codename,
            status: Status::InitialIdea,
            status_mtime: now,
            last_updated: now,
            summary: String::new(),
            description: String::new(),
            notes: String::new(),
            authors: vec![author],
            editors: Vec::new(),
            postprodders: Vec::new(),
            factcheckers: Vec::new(),
            spoiled: vec![author],
            chat_channel_id: None,
            content_document_id: None,
            solution_document_id: None,
            priority: Priority::default(),
        }
    }

    /// The handle shown to unspoiled users. The id prefix disambiguates
    /// colliding codenames.
    pub fn spoiler_free_title(&self) -> String {
        format!("({}: {})", &self.id.simple().to_string()[..8], self.codename)
    }

    /// The real title, for spoiled viewers.
    pub fn spoilery_title(&self) -> &str {
        &self.name
    }

    /// The lead author, if any authors remain.
    pub fn lead_author(&self) -> Option<Uuid> {
        self.authors.first().copied()
    }

    /// Whether the user holds any production role on the puzzle.
    pub fn has_role(&self, user_id: Uuid) -> bool {
        self.authors.contains(&user_id)
            || self.editors.contains(&user_id)
            || self.postprodders.contains(&user_id)
            || self.factcheckers.contains(&user_id)
    }

    /// Whether the user may see spoilery fields. Any production role
    /// implies spoiled, as does EIC.
    pub fn is_spoiled(&self, user: &User) -> bool {
        user.eic || self.spoiled.contains(&user.id) || self.has_role(user.id)
    }

    /// Add a user to the spoiled set. Idempotent; returns whether anything
    /// changed.
    pub fn spoil(&mut self, user_id: Uuid) -> bool {
        if self.spoiled.contains(&user_id) {
            return false;
        }
        self.spoiled.push(user_id);
        self.last_updated = OffsetDateTime::now_utc();
        true
    }

    /// Remove a user from the spoiled set. Raw mutation; the capability
    /// check lives in the service layer.
    pub fn unspoil(&mut self, user_id: Uuid) -> bool {
        let before = self.spoiled.len();
        self.spoiled.retain(|id| *id != user_id);
        if self.spoiled.len() != before {
            self.last_updated = OffsetDateTime::now_utc();
            true
        } else {
            false
        }
    }

    /// Set the status, stamping both modification times.
    pub fn set_status(&mut self, status: Status) {
        let now = OffsetDateTime::now_utc();
        self.status = status;
        self.status_mtime = now;
        self.last_updated = now;
    }

    /// The actor's roles relative to this puzzle, for advisory transition
    /// filtering.
    pub fn roles_for(&self, user: &User) -> ActorRoles {
        ActorRoles {
            eic: user.eic,
            testsolve_coordinator: user.testsolve_coordinator,
            author: self.authors.contains(&user.id),
            editor: self.editors.contains(&user.id),
            postprodder: self.postprodders.contains(&user.id),
            factchecker: self.factcheckers.contains(&user.id),
        }
    }
}

/// Pick a random adjective+noun codename from the configured word lists.
pub fn generate_codename(adjectives: &[String], nouns: &[String]) -> String {
    use rand::seq::IndexedRandom;

    let mut rng = rand::rng();
    match (adjectives.choose(&mut rng), nouns.choose(&mut rng)) {
        (Some(adjective), Some(noun)) => format!("{adjective} {noun}"),
        _ => "make up your own name".to_owned(),
    }
}
