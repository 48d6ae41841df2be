use core::fmt;
use core::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid id {0:?}, expected 16 lowercase hex digits")]
pub struct InvalidId(pub String);

fn parse_hex_id(s: &str) -> Result<u64, InvalidId> {
    let well_formed = s.len() == 16
        && s.bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if !well_formed {
        return Err(InvalidId(s.into()));
    }
    u64::from_str_radix(s, 16).map_err(|_| InvalidId(s.into()))
}

macro_rules! hex_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:016x}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hex_id(s).map(Self)
            }
        }
    };
}

hex_id! {
    /// Identifies a client, carried in the session cookie.
    SessionId
}

hex_id! {
    /// Identifies one game within a session.
    GameId
}
