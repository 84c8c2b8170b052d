//! Closed lifecycle-status sets for shots and tasks.
//!
//! Models keep status as the raw string that is stored in the database; the
//! enums here define which strings are allowed and are what every write path
//! validates against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every allowed value, in display order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Stored string form.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    _ => Err(CoreError::Validation(format!(
                        "invalid {} status: '{s}'",
                        <$name>::KIND
                    ))),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

define_status_enum! {
    /// Shot lifecycle status.
    ShotStatus {
        Waiting = "waiting",
        InProgress = "in-progress",
        Done = "done",
        Hold = "hold",
        Omit = "omit",
    }
}

define_status_enum! {
    /// Task lifecycle status. New tasks start as `not-set`.
    TaskStatus {
        NotSet = "not-set",
        Assigned = "assigned",
        InProgress = "in-progress",
        Pending = "pending",
        Retake = "retake",
        Done = "done",
        Hold = "hold",
        Omit = "omit",
    }
}

impl ShotStatus {
    const KIND: StatusKind = StatusKind::Shot;

    /// Short label for listings.
    pub fn label(self) -> &'static str {
        match self {
            ShotStatus::Waiting => "Waiting",
            ShotStatus::InProgress => "In progress",
            ShotStatus::Done => "Done",
            ShotStatus::Hold => "Hold",
            ShotStatus::Omit => "Omit",
        }
    }

    /// Colour name used to badge the status.
    pub fn color(self) -> &'static str {
        match self {
            ShotStatus::Waiting => "yellow",
            ShotStatus::InProgress => "green",
            ShotStatus::Done => "blue",
            ShotStatus::Hold => "grey",
            ShotStatus::Omit => "black",
        }
    }
}

impl TaskStatus {
    const KIND: StatusKind = StatusKind::Task;
}

/// Entity kinds that carry a status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Shot,
    Task,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Shot => f.write_str("shot"),
            StatusKind::Task => f.write_str("task"),
        }
    }
}

/// Linear membership test of `value` against the status set of `kind`.
pub fn is_valid_status(kind: StatusKind, value: &str) -> bool {
    match kind {
        StatusKind::Shot => ShotStatus::ALL.iter().any(|s| s.as_str() == value),
        StatusKind::Task => TaskStatus::ALL.iter().any(|s| s.as_str() == value),
    }
}

/// Validate a status string before it is written.
pub fn validate_status(kind: StatusKind, value: &str) -> Result<(), CoreError> {
    if is_valid_status(kind, value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "invalid {kind} status: '{value}'"
        )))
    }
}
