use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which end of a task bar a dependency drag started or finished on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    #[default]
    Precedes,
    Blocks,
    Relates,
    Duplicates,
}

impl RelationType {
    pub const ALL: [RelationType; 4] = [
        RelationType::Precedes,
        RelationType::Blocks,
        RelationType::Relates,
        RelationType::Duplicates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Precedes => "precedes",
            RelationType::Blocks => "blocks",
            RelationType::Relates => "relates",
            RelationType::Duplicates => "duplicates",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown endpoint '{0}' (expected 'start' or 'end')")]
pub struct EndpointParseError(pub String);

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Endpoint::Start),
            "end" => Ok(Endpoint::End),
            _ => Err(EndpointParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown relation type '{0}'")]
pub struct RelationParseError(pub String);

impl FromStr for RelationType {
    type Err = RelationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        RelationType::ALL
            .into_iter()
            .find(|relation| relation.as_str() == wanted)
            .ok_or_else(|| RelationParseError(s.to_string()))
    }
}

/// Relation implied by dragging from `source` on one task to `target` on another.
pub fn resolve(source: Endpoint, target: Endpoint) -> RelationType {
    match (source, target) {
        (Endpoint::End, Endpoint::Start) => RelationType::Precedes,
        (Endpoint::End, Endpoint::End) => RelationType::Blocks,
        (Endpoint::Start, Endpoint::Start) => RelationType::Relates,
        (Endpoint::Start, Endpoint::End) => RelationType::Duplicates,
    }
}
