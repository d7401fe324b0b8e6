//! Wire DTOs for every backend resource.
//!
//! DESIGN
//! ======
//! Identifiers and timestamps are server-assigned and treated as opaque
//! strings. Enums accept every value either side of the wire is known to
//! emit and decode anything else as `Unknown`, so one unexpected status never
//! fails a whole list fetch. Create payloads omit absent optionals; patch
//! payloads serialize only the fields that are set.

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;

mod dashboard;
mod event;
mod goal;
mod log;
mod point;
mod project;
mod user;

pub use dashboard::{CommunityArea, Dashboard, PersonalArea};
pub use event::{Event, EventParticipant, EventPatch, EventStatus, NewEvent, ParticipantStatus};
pub use goal::{Goal, GoalCategory, GoalPatch, GoalStatus, NewGoal, NewStep, Step, StepPatch, StepStatus};
pub use log::{Log, LogPatch, LogVisibility, NewLog};
pub use point::{Point, PointsSummary};
pub use project::{NewProject, Project, ProjectCategory, ProjectPatch, ProjectStatus, ProjectVisibility};
pub use user::{ProfilePatch, RegisterRequest, TokenResponse, User, UserProfile};

use serde::{Deserialize, Serialize};

/// A string that does not name any variant of a wire enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Declares a snake_case wire enum with an `Unknown` fallback, `as_str`,
/// `Display` and `FromStr`.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
            /// A value this client does not recognize.
            #[serde(rename = "unknown")]
            #[serde(other)]
            Unknown,
        }

        impl $name {
            /// Every known variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unknown => "unknown",
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw.trim() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err($crate::models::UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_owned(),
                        expected: Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", "),
                    }),
                }
            }
        }
    };
}

pub(crate) use wire_enum;

wire_enum! {
    /// Where an event or project takes place.
    LocationType {
        Online => "online",
        Offline => "offline",
        Hybrid => "hybrid",
    }
}

/// Acknowledgement returned by the event and project join actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinReceipt {
    /// `joined` for events, `pending` for project membership requests.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}
