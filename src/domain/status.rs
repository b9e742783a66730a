//! Static registry of puzzle workflow statuses.
//!
//! The registry is a process-wide constant: every status has a short code
//! (stable, embedded in exports and chat category names), a display label,
//! an emoji, the role responsible for moving the puzzle forward, and an
//! ordered list of recommended next steps. The recommended list is purely
//! advisory; nothing in the service layer enforces it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One status in the puzzle production workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Status {
    /// Initial idea, not yet submitted for approval.
    #[serde(rename = "II")]
    InitialIdea,
    /// Authors submitted the idea to the EICs.
    #[serde(rename = "AE")]
    AwaitingApproval,
    /// EICs have seen the idea but want to discuss as a group.
    #[serde(rename = "ND")]
    NeedsDiscussion,
    /// Sent back to the authors for another iteration.
    #[serde(rename = "ID")]
    IdeaInDevelopment,
    /// Approved, waiting for an answer assignment.
    #[serde(rename = "AA")]
    AwaitingAnswer,
    /// Answer assigned, authors are writing.
    #[serde(rename = "W")]
    Writing,
    /// Draft done, waiting for editor approval to testsolve.
    #[serde(rename = "AT")]
    AwaitingApprovalForTestsolving,
    /// Needs a factcheck pass before testsolving.
    #[serde(rename = "PF")]
    NeedsTestsolveFactcheck,
    /// Factcheckers requested revisions before testsolving.
    #[serde(rename = "FR")]
    TestsolveFactcheckRevision,
    /// Ready to be testsolved.
    #[serde(rename = "T")]
    Testsolving,
    /// A testsolve session is underway.
    #[serde(rename = "TT")]
    ActivelyTestsolving,
    /// Testsolve done; authors reviewing the feedback.
    #[serde(rename = "TR")]
    AwaitingTestsolveReview,
    /// Being revised; will need more testsolving.
    #[serde(rename = "R")]
    Revising,
    /// Waiting for EIC sign-off to leave testsolving.
    #[serde(rename = "AO")]
    AwaitingApprovalPostTestsolving,
    /// Needs hints written.
    #[serde(rename = "NH")]
    NeedsHints,
    /// Hints written, awaiting approval.
    #[serde(rename = "AH")]
    AwaitingHintsApproval,
    /// Ready for postprodding.
    #[serde(rename = "NP")]
    NeedsPostprod,
    /// Postprodding is underway.
    #[serde(rename = "PP")]
    ActivelyPostprodding,
    /// Postprod blocked on the authors or art.
    #[serde(rename = "PB")]
    PostprodBlocked,
    /// Postprod blocked on a tech request.
    #[serde(rename = "BT")]
    PostprodBlockedOnTech,
    /// Postprod done, awaiting approval.
    #[serde(rename = "AP")]
    AwaitingPostprodApproval,
    /// Needs a post-postprod factcheck.
    #[serde(rename = "NF")]
    NeedsFactcheck,
    /// Factcheckers requested final revisions.
    #[serde(rename = "NR")]
    NeedsFinalRevisions,
    /// Needs copy edits.
    #[serde(rename = "NC")]
    NeedsCopyEdits,
    /// Done!
    #[serde(rename = "D")]
    Done,
    /// Shelved for now, can come back later.
    #[serde(rename = "DF")]
    Deferred,
    /// Dead.
    #[serde(rename = "X")]
    Dead,
}

/// The role responsible for advancing a puzzle out of a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Blocker {
    /// The puzzle's authors.
    Authors,
    /// The puzzle's editors.
    Editors,
    /// The editors-in-chief.
    Eic,
    /// The testsolve coordinators.
    TestsolveAdmins,
    /// The puzzle's postprodders.
    Postprodders,
    /// The puzzle's factcheckers.
    Factcheckers,
    /// Nobody; the status is terminal or self-serve.
    Nobody,
}

impl Blocker {
    /// Human-readable description used in list views and notifications.
    pub fn display(self) -> &'static str {
        match self {
            Blocker::Authors => "the author(s)",
            Blocker::Editors => "editor(s)",
            Blocker::Eic => "editor(s)-in-chief",
            Blocker::TestsolveAdmins => "testsolve admins",
            Blocker::Postprodders => "postprodders",
            Blocker::Factcheckers => "factcheckers",
            Blocker::Nobody => "nobody",
        }
    }
}

/// Roles the acting user holds relative to one puzzle, used to pick which
/// advisory transitions to surface. This is display logic, not
/// authorization: any user with the status-change capability may set any
/// status.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorRoles {
    /// Actor is an editor-in-chief (sees every transition).
    pub eic: bool,
    /// Actor coordinates testsolving.
    pub testsolve_coordinator: bool,
    /// Actor authored this puzzle.
    pub author: bool,
    /// Actor edits this puzzle.
    pub editor: bool,
    /// Actor postprods this puzzle.
    pub postprodder: bool,
    /// Actor factchecks this puzzle.
    pub factchecker: bool,
}

impl ActorRoles {
    fn matches(&self, blocker: Blocker) -> bool {
        match blocker {
            Blocker::Nobody => self.eic,
            Blocker::Eic => self.eic,
            Blocker::TestsolveAdmins => self.testsolve_coordinator,
            Blocker::Authors => self.author,
            Blocker::Editors => self.editor,
            Blocker::Postprodders => self.postprodder,
            Blocker::Factcheckers => self.factchecker,
        }
    }
}

/// A recommended next step out of a status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Status the recommendation points at.
    pub target: Status,
    /// Button-length description of what taking this step means.
    pub description: &'static str,
}

/// Every status in canonical workflow order. The order doubles as the rank
/// used by the `past_*` helpers, so inserting a status is a code change,
/// not a data migration.
pub const ALL: [Status; 27] = [
    Status::InitialIdea,
    Status::AwaitingApproval,
    Status::NeedsDiscussion,
    Status::IdeaInDevelopment,
    Status::AwaitingAnswer,
    Status::Writing,
    Status::AwaitingApprovalForTestsolving,
    Status::NeedsTestsolveFactcheck,
    Status::TestsolveFactcheckRevision,
    Status::Testsolving,
    Status::ActivelyTestsolving,
    Status::AwaitingTestsolveReview,
    Status::Revising,
    Status::AwaitingApprovalPostTestsolving,
    Status::NeedsHints,
    Status::AwaitingHintsApproval,
    Status::NeedsPostprod,
    Status::ActivelyPostprodding,
    Status::PostprodBlocked,
    Status::PostprodBlockedOnTech,
    Status::AwaitingPostprodApproval,
    Status::NeedsFactcheck,
    Status::NeedsFinalRevisions,
    Status::NeedsCopyEdits,
    Status::Done,
    Status::Deferred,
    Status::Dead,
];

impl Status {
    /// Look a status up by its short code. Unknown codes yield `None` so
    /// callers can render an "all other statuses" fallback instead of
    /// failing.
    pub fn from_code(code: &str) -> Option<Status> {
        ALL.iter().copied().find(|status| status.code() == code)
    }

    /// Stable short code. Embedded in chat category names and exports, so
    /// these strings must not change.
    pub fn code(self) -> &'static str {
        match self {
            Status::InitialIdea => "II",
            Status::AwaitingApproval => "AE",
            Status::NeedsDiscussion => "ND",
            Status::IdeaInDevelopment => "ID",
            Status::AwaitingAnswer => "AA",
            Status::Writing => "W",
            Status::AwaitingApprovalForTestsolving => "AT",
            Status::NeedsTestsolveFactcheck => "PF",
            Status::TestsolveFactcheckRevision => "FR",
            Status::Testsolving => "T",
            Status::ActivelyTestsolving => "TT",
            Status::AwaitingTestsolveReview => "TR",
            Status::Revising => "R",
            Status::AwaitingApprovalPostTestsolving => "AO",
            Status::NeedsHints => "NH",
            Status::AwaitingHintsApproval => "AH",
            Status::NeedsPostprod => "NP",
            Status::ActivelyPostprodding => "PP",
            Status::PostprodBlocked => "PB",
            Status::PostprodBlockedOnTech => "BT",
            Status::AwaitingPostprodApproval => "AP",
            Status::NeedsFactcheck => "NF",
            Status::NeedsFinalRevisions => "NR",
            Status::NeedsCopyEdits => "NC",
            Status::Done => "D",
            Status::Deferred => "DF",
            Status::Dead => "X",
        }
    }

    /// Human-readable label.
    pub fn display(self) -> &'static str {
        match self {
            Status::InitialIdea => "Initial Idea",
            Status::AwaitingApproval => "Awaiting Approval By EIC",
            Status::NeedsDiscussion => "EICs are Discussing",
            Status::IdeaInDevelopment => "Idea in Development",
            Status::AwaitingAnswer => "Awaiting Answer",
            Status::Writing => "Writing (Answer Assigned)",
            Status::AwaitingApprovalForTestsolving => "Awaiting Approval for Testsolving",
            Status::NeedsTestsolveFactcheck => "Needs Pre-Testsolve Factcheck",
            Status::TestsolveFactcheckRevision => "Factcheck Revisions",
            Status::Testsolving => "Ready to be Testsolved",
            Status::ActivelyTestsolving => "Actively Testsolving",
            Status::AwaitingTestsolveReview => "Awaiting Testsolve Review",
            Status::Revising => "Revising (Needs Testsolving)",
            Status::AwaitingApprovalPostTestsolving => "Awaiting Approval (Done with Testsolving)",
            Status::NeedsHints => "Needs Hints",
            Status::AwaitingHintsApproval => "Awaiting Hints Approval",
            Status::NeedsPostprod => "Ready for Postprodding",
            Status::ActivelyPostprodding => "Actively Postprodding",
            Status::PostprodBlocked => "Postproduction Blocked",
            Status::PostprodBlockedOnTech => "Postproduction Blocked On Tech Request",
            Status::AwaitingPostprodApproval => "Awaiting Approval After Postprod",
            Status::NeedsFactcheck => "Needs Postprod Factcheck",
            Status::NeedsFinalRevisions => "Needs Final Revisions",
            Status::NeedsCopyEdits => "Needs Copy Edits",
            Status::Done => "Done",
            Status::Deferred => "Deferred",
            Status::Dead => "Dead",
        }
    }

    /// Emoji shown next to the status in listings and notifications.
    pub fn emoji(self) -> &'static str {
        match self {
            Status::InitialIdea => "🥚",
            Status::AwaitingApproval => "⏳🎩",
            Status::NeedsDiscussion => "🗣",
            Status::IdeaInDevelopment => "🐣",
            Status::AwaitingAnswer => "⏳🤷",
            Status::Writing => "✏️",
            Status::AwaitingApprovalForTestsolving => "⏳➡️💡",
            Status::NeedsTestsolveFactcheck => "🔎",
            Status::TestsolveFactcheckRevision => "✏️🔄",
            Status::Testsolving => "💡",
            Status::ActivelyTestsolving => "🎢",
            Status::AwaitingTestsolveReview => "⏳💡",
            Status::Revising => "✏️🔄",
            Status::AwaitingApprovalPostTestsolving => "⏳💡➡️",
            Status::NeedsHints => "⁉",
            Status::AwaitingHintsApproval => "⏳⁉✅",
            Status::NeedsPostprod => "🪵",
            Status::ActivelyPostprodding => "🏠",
            Status::PostprodBlocked => "⚠️✏️",
            Status::PostprodBlockedOnTech => "⚠️💻",
            Status::AwaitingPostprodApproval => "⏳🏠✅",
            Status::NeedsFactcheck => "📋",
            Status::NeedsFinalRevisions => "🔬",
            Status::NeedsCopyEdits => "📃",
            Status::Done => "🏁",
            Status::Deferred => "💤",
            Status::Dead => "💀",
        }
    }

    /// Position in the canonical order.
    pub fn rank(self) -> usize {
        ALL.iter()
            .position(|status| *status == self)
            .unwrap_or_default()
    }

    /// Whether the status sits after testsolving in the canonical order.
    /// Sessions started on such puzzles are flagged as late testsolves.
    pub fn past_testsolving(self) -> bool {
        self.rank() > Status::Revising.rank() && self.rank() <= Status::Done.rank()
    }

    /// Whether the status is terminal for the normal workflow.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Done | Status::Deferred | Status::Dead)
    }

    /// Roles responsible for advancing a puzzle out of this status.
    pub fn blockers(self) -> Vec<Blocker> {
        let playbook = self.playbook();
        if playbook.is_empty() {
            vec![Blocker::Nobody]
        } else {
            playbook.iter().map(|(blocker, _)| *blocker).collect()
        }
    }

    /// Recommended next steps, grouped by the blocker role they belong to.
    pub fn playbook(self) -> &'static [(Blocker, &'static [(Status, &'static str)])] {
        use Blocker::*;
        use Status::*;
        match self {
            InitialIdea => &[(
                Authors,
                &[
                    (AwaitingApproval, "💬 Request approval by EICs"),
                    (Deferred, "⏸️ Mark deferred"),
                    (Dead, "⏹️ Mark as dead"),
                ],
            )],
            AwaitingApproval => &[(
                Eic,
                &[
                    (IdeaInDevelopment, "❌ Request revision"),
                    (NeedsDiscussion, "👥 EICs need to discuss as a group"),
                    (AwaitingAnswer, "✅ Idea approved, 🤷 No answer yet"),
                    (Deferred, "⏸️ Mark deferred"),
                ],
            )],
            NeedsDiscussion => &[(
                Eic,
                &[
                    (IdeaInDevelopment, "❌ Request revision"),
                    (AwaitingAnswer, "✅ Idea approved, 🤷 No answer yet"),
                    (Deferred, "⏸️ Mark deferred"),
                ],
            )],
            IdeaInDevelopment => &[(
                Authors,
                &[(AwaitingApproval, "💬 Changes made, request approval by EICs")],
            )],
            AwaitingAnswer => &[(Eic, &[(Writing, "✅ Mark as answer assigned")])],
            Writing => &[(
                Authors,
                &[
                    (AwaitingAnswer, "❌ Reject answer"),
                    (
                        AwaitingApprovalForTestsolving,
                        "📝 Request approval for testsolving",
                    ),
                ],
            )],
            AwaitingApprovalForTestsolving => &[(
                Editors,
                &[(NeedsTestsolveFactcheck, "🔎 Request pre-testsolve factcheck")],
            )],
            NeedsTestsolveFactcheck => &[(
                Factcheckers,
                &[
                    (Testsolving, "✅ Puzzle is ready to be testsolved"),
                    (TestsolveFactcheckRevision, "❌ Request puzzle revision"),
                ],
            )],
            TestsolveFactcheckRevision => &[(
                Authors,
                &[(NeedsTestsolveFactcheck, "🔎 Request pre-testsolve factcheck")],
            )],
            Testsolving => &[(
                TestsolveAdmins,
                &[(ActivelyTestsolving, "🎢 Testsolve started")],
            )],
            ActivelyTestsolving => &[(
                TestsolveAdmins,
                &[(
                    AwaitingTestsolveReview,
                    "🧐 Testsolve done; author to review feedback",
                )],
            )],
            AwaitingTestsolveReview => &[
                (Authors, &[(Revising, "❌ Needs revision")]),
                (
                    TestsolveAdmins,
                    &[
                        (Testsolving, "🔄 Ready for more testsolving"),
                        (Revising, "❌ Needs revision"),
                        (
                            AwaitingApprovalPostTestsolving,
                            "📝 Send to EICs for approval to leave testsolving",
                        ),
                    ],
                ),
            ],
            Revising => &[(
                Authors,
                &[
                    (
                        AwaitingApprovalForTestsolving,
                        "📝 Request approval for testsolving (significant changes)",
                    ),
                    (
                        NeedsTestsolveFactcheck,
                        "🔎 Request pre-testsolve factcheck (minor changes)",
                    ),
                    (
                        AwaitingApprovalPostTestsolving,
                        "⏭️ Request EIC approval to skip testsolving",
                    ),
                ],
            )],
            AwaitingApprovalPostTestsolving => &[(
                Eic,
                &[
                    (Revising, "❌ Request puzzle revision"),
                    (Testsolving, "🔙 Return to testsolving"),
                    (NeedsHints, "⏩ Accept puzzle and solution; send to hints"),
                ],
            )],
            NeedsHints => &[(
                Authors,
                &[(AwaitingHintsApproval, "📝 Request approval for hints")],
            )],
            AwaitingHintsApproval => &[(
                Eic,
                &[
                    (NeedsHints, "❌ Request revisions to hints"),
                    (
                        PostprodBlocked,
                        "✏️ Finalize hints, request postprod preparation",
                    ),
                ],
            )],
            NeedsPostprod => &[(
                Postprodders,
                &[
                    (ActivelyPostprodding, "🏠 Postprodding has started"),
                    (
                        AwaitingPostprodApproval,
                        "📝 Request approval after postprod",
                    ),
                    (PostprodBlocked, "❌✏️ Request revisions from author/art"),
                    (PostprodBlockedOnTech, "❌💻 Blocked on tech request"),
                ],
            )],
            ActivelyPostprodding => &[(
                Postprodders,
                &[
                    (
                        AwaitingPostprodApproval,
                        "📝 Request approval after postprod",
                    ),
                    (PostprodBlocked, "❌✏️ Request revisions from author/art"),
                    (PostprodBlockedOnTech, "❌💻 Blocked on tech request"),
                ],
            )],
            PostprodBlocked => &[(
                Authors,
                &[
                    (NeedsPostprod, "📝 Mark as Ready for Postprod"),
                    (ActivelyPostprodding, "🏠 Postprodding can resume"),
                    (PostprodBlockedOnTech, "❌💻 Blocked on tech request"),
                ],
            )],
            PostprodBlockedOnTech => &[(
                Postprodders,
                &[
                    (ActivelyPostprodding, "🏠 Postprodding can resume"),
                    (NeedsPostprod, "📝 Mark as Ready for Postprod"),
                    (PostprodBlocked, "❌✏️ Request revisions from author/art"),
                    (
                        AwaitingPostprodApproval,
                        "📝 Request approval after postprod",
                    ),
                ],
            )],
            AwaitingPostprodApproval => &[(
                Eic,
                &[
                    (ActivelyPostprodding, "❌ Request revisions to postprod"),
                    (
                        NeedsFactcheck,
                        "⏩ Mark postprod as finished; request factcheck",
                    ),
                ],
            )],
            NeedsFactcheck => &[(
                Factcheckers,
                &[
                    (
                        Revising,
                        "❌ Request large revisions (needs more testsolving)",
                    ),
                    (
                        NeedsFinalRevisions,
                        "🟡 Needs revisions (doesn't need testsolving)",
                    ),
                    (Done, "✅🎆 Mark as done! 🎆✅"),
                ],
            )],
            NeedsFinalRevisions => &[(
                Authors,
                &[
                    (NeedsFactcheck, "📝 Request factcheck (for large revisions)"),
                    (NeedsCopyEdits, "✅ Request copy edits (for small revisions)"),
                ],
            )],
            NeedsCopyEdits => &[(
                Factcheckers,
                &[
                    (NeedsFinalRevisions, "🟡 Needs revisions"),
                    (Done, "✅🎆 Mark as done! 🎆✅"),
                ],
            )],
            Deferred => &[(Nobody, &[(InitialIdea, "✅ Back in development")])],
            Dead => &[(Nobody, &[(InitialIdea, "✅ Back in development")])],
            Done => &[],
        }
    }

    /// Advisory transitions out of this status for an actor holding the
    /// given roles. EICs see everything; authors can always defer or kill
    /// their own puzzle once it has left the initial-idea stage. The result
    /// orders UI buttons and nothing else.
    pub fn transitions_for(self, roles: &ActorRoles) -> Vec<Transition> {
        let mut out: Vec<Transition> = Vec::new();
        for (blocker, steps) in self.playbook() {
            if roles.eic || roles.matches(*blocker) {
                for (target, description) in *steps {
                    if out.iter().all(|t| t.target != *target) {
                        out.push(Transition {
                            target: *target,
                            description,
                        });
                    }
                }
            }
        }

        if roles.author && self != Status::InitialIdea {
            for (target, description) in [
                (Status::Deferred, "⏸️ Mark deferred"),
                (Status::Dead, "⏹️ Mark as dead"),
            ] {
                if out.iter().all(|t| t.target != target) {
                    out.push(Transition {
                        target,
                        description,
                    });
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_and_resolvable() {
        for status in ALL {
            assert_eq!(Status::from_code(status.code()), Some(status));
        }
        let mut codes: Vec<&str> = ALL.iter().map(|s| s.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(Status::from_code("ZZ"), None);
        assert_eq!(Status::from_code(""), None);
    }

    #[test]
    fn every_recommended_target_is_registered() {
        for status in ALL {
            for (_, steps) in status.playbook() {
                for (target, description) in *steps {
                    assert!(ALL.contains(target));
                    assert!(!description.is_empty());
                }
            }
        }
    }

    #[test]
    fn ranks_follow_canonical_order() {
        assert_eq!(Status::InitialIdea.rank(), 0);
        assert!(Status::Testsolving.rank() < Status::AwaitingTestsolveReview.rank());
        assert!(Status::Done.rank() < Status::Deferred.rank());
    }

    #[test]
    fn past_testsolving_matches_workflow_segments() {
        assert!(!Status::Testsolving.past_testsolving());
        assert!(!Status::Revising.past_testsolving());
        assert!(Status::AwaitingApprovalPostTestsolving.past_testsolving());
        assert!(Status::NeedsPostprod.past_testsolving());
        assert!(Status::Done.past_testsolving());
        assert!(!Status::Deferred.past_testsolving());
        assert!(!Status::Dead.past_testsolving());
    }

    #[test]
    fn eic_sees_every_transition_group() {
        let roles = ActorRoles {
            eic: true,
            ..Default::default()
        };
        let transitions = Status::AwaitingTestsolveReview.transitions_for(&roles);
        let targets: Vec<Status> = transitions.iter().map(|t| t.target).collect();
        assert!(targets.contains(&Status::Revising));
        assert!(targets.contains(&Status::Testsolving));
        assert!(targets.contains(&Status::AwaitingApprovalPostTestsolving));
    }

    #[test]
    fn author_gets_defer_and_dead_shortcuts() {
        let roles = ActorRoles {
            author: true,
            ..Default::default()
        };

        // Not duplicated from the initial idea stage; those are already in
        // the playbook.
        let initial = Status::InitialIdea.transitions_for(&roles);
        assert_eq!(
            initial
                .iter()
                .filter(|t| t.target == Status::Deferred)
                .count(),
            1
        );

        let writing = Status::Writing.transitions_for(&roles);
        let targets: Vec<Status> = writing.iter().map(|t| t.target).collect();
        assert!(targets.contains(&Status::Deferred));
        assert!(targets.contains(&Status::Dead));
    }

    #[test]
    fn unrelated_user_sees_no_transitions() {
        let roles = ActorRoles::default();
        assert!(Status::AwaitingApproval.transitions_for(&roles).is_empty());
        assert!(Status::Testsolving.transitions_for(&roles).is_empty());
    }

    #[test]
    fn terminal_statuses_point_back_to_development() {
        for status in [Status::Deferred, Status::Dead] {
            let roles = ActorRoles {
                eic: true,
                ..Default::default()
            };
            let transitions = status.transitions_for(&roles);
            assert_eq!(transitions.len(), 1);
            assert_eq!(transitions[0].target, Status::InitialIdea);
        }
    }
}
