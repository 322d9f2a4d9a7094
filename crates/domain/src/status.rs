//! Closed status enumerations and their boundary parsing.
//!
//! Statuses are persisted as integer codes and rendered by name. Inbound
//! values may be either; anything outside the declared set is rejected with
//! [`InvalidStateError::UnknownStatus`] before an entity is built.

use serde::{Deserialize, Serialize};

use crate::error::InvalidStateError;

/// A status exactly as a client sent it, before domain checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStatus {
    Code(i64),
    Name(String),
}

pub(crate) fn unknown(kind: &'static str, value: impl Into<String>) -> InvalidStateError {
    InvalidStateError::UnknownStatus {
        kind,
        value: value.into(),
    }
}

macro_rules! define_status {
    (
        $(#[doc = $doc:expr])*
        $name:ident, $kind:literal {
            $($(#[doc = $vdoc:expr])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[doc = $vdoc])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Integer code used in storage.
            #[must_use]
            pub const fn code(self) -> i64 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            /// Variant name used in JSON and HTML.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }

        impl TryFrom<i64> for $name {
            type Error = $crate::error::InvalidStateError;

            fn try_from(code: i64) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    other => Err($crate::status::unknown($kind, other.to_string())),
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::InvalidStateError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if let Ok(code) = trimmed.parse::<i64>() {
                    return Self::try_from(code).map_err(|_| $crate::status::unknown($kind, s));
                }
                Self::ALL
                    .iter()
                    .copied()
                    .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| $crate::status::unknown($kind, s))
            }
        }

        impl TryFrom<$crate::status::RawStatus> for $name {
            type Error = $crate::error::InvalidStateError;

            fn try_from(raw: $crate::status::RawStatus) -> Result<Self, Self::Error> {
                match raw {
                    $crate::status::RawStatus::Code(code) => Self::try_from(code),
                    $crate::status::RawStatus::Name(name) => name.parse(),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = $crate::status::RawStatus::deserialize(deserializer)?;
                Self::try_from(raw).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use define_status;
