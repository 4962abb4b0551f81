// Session domain model
use super::role::Role;
use serde::{Deserialize, Serialize};

/// Identity returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl UserInfo {
    /// `/auth/me` can answer 200 with an empty body; only an email counts as a user.
    pub fn is_identified(&self) -> bool {
        !self.email.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    #[serde(skip_serializing)]
    pub token: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn new(token: String, user: UserInfo) -> Self {
        Self {
            token,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoAccount {
    pub role: Role,
    pub email: &'static str,
    pub password: &'static str,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 4] = [
    DemoAccount {
        role: Role::Cxo,
        email: "demo@starcement.com",
        password: "Demo1234!",
    },
    DemoAccount {
        role: Role::PlantHead,
        email: "plant@starcement.com",
        password: "Plant1234!",
    },
    DemoAccount {
        role: Role::EnergyManager,
        email: "energy@starcement.com",
        password: "Energy1234!",
    },
    DemoAccount {
        role: Role::Sales,
        email: "sales@starcement.com",
        password: "Sales1234!",
    },
];

pub fn demo_account(role: Role) -> DemoAccount {
    DEMO_ACCOUNTS
        .iter()
        .copied()
        .find(|a| a.role == role)
        .unwrap_or(DEMO_ACCOUNTS[0])
}
