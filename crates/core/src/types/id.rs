//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. List items that have
//! not reached the backend yet carry a [`PendingId`] instead.

use core::fmt;
use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize` as a plain number; `Deserialize` from a number or a numeric
///   string (the backend is not consistent about which it sends)
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
/// - `FromStr` so IDs can be taken straight from path segments
///
/// # Example
///
/// ```rust
/// # use reshow_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget = WidgetId::new(1);
/// let gadget = GadgetId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: WidgetId = gadget;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                #[derive(::serde::Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Number(i64),
                    Text(String),
                }

                match Raw::deserialize(deserializer)? {
                    Raw::Number(n) => Ok(Self(n)),
                    Raw::Text(s) => s
                        .trim()
                        .parse::<i64>()
                        .map(Self)
                        .map_err(::serde::de::Error::custom),
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Backend entity IDs
define_id!(AdminUserId);
define_id!(ProductId);
define_id!(ServiceId);
define_id!(CategoryId);
define_id!(QuoteId);

/// Identifier of an item inside an editable content list.
///
/// Items loaded from the backend are `Persisted`; items added in the editor
/// are `Pending` until the section is saved, at which point
/// [`PendingId::resolve`] assigns them a numeric id that cannot collide with
/// any persisted sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingId {
    /// Created locally, not yet saved.
    Pending(u32),
    /// Known to the backend.
    Persisted(i64),
}

/// Error parsing a [`PendingId`] from its form representation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid list item id: {0}")]
pub struct PendingIdError(String);

impl PendingId {
    const PENDING_PREFIX: &'static str = "pending-";

    /// Whether the item still has to be saved.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Read an id from a JSON value as stored in section content.
    ///
    /// Numbers and numeric strings are persisted ids. Anything else (missing,
    /// null, or a non-numeric string) yields `None`.
    #[must_use]
    pub fn from_json(value: Option<&serde_json::Value>) -> Option<Self> {
        match value? {
            serde_json::Value::Number(n) => n.as_i64().map(Self::Persisted),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Assign final ids to every pending entry.
    ///
    /// Pending ids become `max(persisted) + 1`, `max(persisted) + 2`, ... in
    /// list order. Past `i64::MAX` the count restarts at 1, skipping
    /// persisted ids. Persisted ids are returned unchanged.
    #[must_use]
    pub fn resolve(ids: &[Self]) -> Vec<i64> {
        let persisted: HashSet<i64> = ids
            .iter()
            .filter_map(|id| match id {
                Self::Persisted(n) => Some(*n),
                Self::Pending(_) => None,
            })
            .collect();
        let successor = |n: i64| n.checked_add(1).unwrap_or(1);
        let mut next = successor(persisted.iter().copied().max().unwrap_or(0));

        ids.iter()
            .map(|id| match id {
                Self::Persisted(n) => *n,
                Self::Pending(_) => {
                    while persisted.contains(&next) {
                        next = successor(next);
                    }
                    let assigned = next;
                    next = successor(next);
                    assigned
                }
            })
            .collect()
    }
}

impl fmt::Display for PendingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending(n) => write!(f, "{}{n}", Self::PENDING_PREFIX),
            Self::Persisted(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for PendingId {
    type Err = PendingIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(local) = s.strip_prefix(Self::PENDING_PREFIX) {
            return local
                .parse()
                .map(Self::Pending)
                .map_err(|_| PendingIdError(s.to_string()));
        }
        s.parse()
            .map(Self::Persisted)
            .map_err(|_| PendingIdError(s.to_string()))
    }
}

impl Serialize for PendingId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PendingId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hands out local ids for items added in the editor.
///
/// Ids increase monotonically and start above any pending id already present
/// in the draft, so a re-rendered form never reuses one.
#[derive(Debug, Clone, Default)]
pub struct PendingIdAllocator {
    next: u32,
}

impl PendingIdAllocator {
    /// Create an allocator that continues after the given ids.
    #[must_use]
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a PendingId>) -> Self {
        let next = existing
            .into_iter()
            .filter_map(|id| match id {
                PendingId::Pending(n) => Some(n.saturating_add(1)),
                PendingId::Persisted(_) => None,
            })
            .max()
            .unwrap_or(1);
        Self { next }
    }

    /// Allocate the next pending id.
    pub const fn allocate(&mut self) -> PendingId {
        let id = PendingId::Pending(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}
