use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Role carried by the bearer token. Anything outside `user`/`mechanic`
/// never passes the booking transition table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    User,
    Mechanic,
    Admin,
}

impl Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            ActorRole::User => "user",
            ActorRole::Mechanic => "mechanic",
            ActorRole::Admin => "admin",
        };
        write!(f, "{}", role)
    }
}

impl ActorRole {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "user" => Some(ActorRole::User),
            "mechanic" => Some(ActorRole::Mechanic),
            "admin" => Some(ActorRole::Admin),
            _ => None,
        }
    }
}
