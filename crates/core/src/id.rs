//! Unique identifiers for Pacer records.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Ulid);

        impl $name {
            /// Generate a new identifier.
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ulid::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(
    /// Unique identifier for a Project
    ProjectId
);

define_id!(
    /// Unique identifier for a Task
    TaskId
);

define_id!(
    /// Unique identifier for an Objective (OKR)
    ObjectiveId
);

define_id!(
    /// Unique identifier for a KeyResult
    KeyResultId
);

define_id!(
    /// Unique identifier for a Kpi
    KpiId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_parse_roundtrip() {
        let id = TaskId::new();
        let parsed: TaskId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_rejects_garbage() {
        assert!("not-a-ulid".parse::<ProjectId>().is_err());
    }
}
