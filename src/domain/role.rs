// Role domain model - who is looking at the dashboard
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Cxo,
    PlantHead,
    EnergyManager,
    Sales,
}

impl Role {
    #[cfg(test)]
    pub const ALL: [Role; 4] = [Role::Cxo, Role::PlantHead, Role::EnergyManager, Role::Sales];

    /// Wire name, as the backend expects it in `?role=`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Cxo => "CXO",
            Role::PlantHead => "Plant Head",
            Role::EnergyManager => "Energy Manager",
            Role::Sales => "Sales",
        }
    }

    /// Lenient parse used for values coming back from the backend.
    /// Anything unrecognised is treated as CXO.
    pub fn from_wire(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown role '{0}' (expected CXO, Plant Head, Energy Manager or Sales)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the wire names plus the dash/underscore spellings a shell user types.
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "cxo" => Ok(Role::Cxo),
            "plant head" | "plant" => Ok(Role::PlantHead),
            "energy manager" | "energy" => Ok(Role::EnergyManager),
            "sales" => Ok(Role::Sales),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_wire(&raw))
    }
}
