//! Response modes
//!
//! A closed enum so adding a mode is a compile-time-checked change.
//! Unknown inbound strings fall back to Seeker at the parse boundary
//! rather than erroring, matching the wire contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of four fixed response styles selecting the prompt template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ChatMode {
    #[default]
    Seeker,
    Scholar,
    Practitioner,
    Comparative,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Seeker => "Seeker",
            ChatMode::Scholar => "Scholar",
            ChatMode::Practitioner => "Practitioner",
            ChatMode::Comparative => "Comparative",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = std::convert::Infallible;

    /// Unrecognized strings parse to Seeker; never fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Scholar" => ChatMode::Scholar,
            "Practitioner" => ChatMode::Practitioner,
            "Comparative" => ChatMode::Comparative,
            _ => ChatMode::Seeker,
        })
    }
}

impl From<String> for ChatMode {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_modes_parse() {
        assert_eq!("Seeker".parse::<ChatMode>().unwrap(), ChatMode::Seeker);
        assert_eq!("Scholar".parse::<ChatMode>().unwrap(), ChatMode::Scholar);
        assert_eq!("Practitioner".parse::<ChatMode>().unwrap(), ChatMode::Practitioner);
        assert_eq!("Comparative".parse::<ChatMode>().unwrap(), ChatMode::Comparative);
    }

    #[test]
    fn test_unknown_mode_falls_back_to_seeker() {
        assert_eq!("Guru".parse::<ChatMode>().unwrap(), ChatMode::Seeker);
        assert_eq!("scholar".parse::<ChatMode>().unwrap(), ChatMode::Seeker);
        assert_eq!("".parse::<ChatMode>().unwrap(), ChatMode::Seeker);
    }

    #[test]
    fn test_serde_round_trip() {
        let mode: ChatMode = serde_json::from_str("\"Comparative\"").unwrap();
        assert_eq!(mode, ChatMode::Comparative);
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"Comparative\"");

        let unknown: ChatMode = serde_json::from_str("\"Mystic\"").unwrap();
        assert_eq!(unknown, ChatMode::Seeker);
    }
}
