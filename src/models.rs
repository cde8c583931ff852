use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Icons a goal can be tagged with. Closed set, picked at creation,
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalIcon {
    Target,
    Calendar,
    Book,
    Exercise,
    Work,
    Heart,
    Travel,
}

impl GoalIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalIcon::Target => "target",
            GoalIcon::Calendar => "calendar",
            GoalIcon::Book => "book",
            GoalIcon::Exercise => "exercise",
            GoalIcon::Work => "work",
            GoalIcon::Heart => "heart",
            GoalIcon::Travel => "travel",
        }
    }
}

impl FromStr for GoalIcon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "target" => Ok(GoalIcon::Target),
            "calendar" => Ok(GoalIcon::Calendar),
            "book" => Ok(GoalIcon::Book),
            "exercise" => Ok(GoalIcon::Exercise),
            "work" => Ok(GoalIcon::Work),
            "heart" => Ok(GoalIcon::Heart),
            "travel" => Ok(GoalIcon::Travel),
            _ => Err(format!("Unknown icon: {}", s)),
        }
    }
}

impl fmt::Display for GoalIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accent colors a goal can be tagged with. Closed set, picked at
/// creation, immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalColor {
    Blue,
    Green,
    Orange,
    Purple,
    Red,
}

impl GoalColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalColor::Blue => "blue",
            GoalColor::Green => "green",
            GoalColor::Orange => "orange",
            GoalColor::Purple => "purple",
            GoalColor::Red => "red",
        }
    }
}

impl FromStr for GoalColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(GoalColor::Blue),
            "green" => Ok(GoalColor::Green),
            "orange" => Ok(GoalColor::Orange),
            "purple" => Ok(GoalColor::Purple),
            "red" => Ok(GoalColor::Red),
            _ => Err(format!("Unknown color: {}", s)),
        }
    }
}

impl fmt::Display for GoalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked goal. `completed_at` absent means the goal is still open;
/// once set it is never cleared again (there is no un-complete).
/// `proof` is only ever written together with `completed_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub due_date: NaiveDate, // YYYY-MM-DD
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub icon: GoalIcon,
    pub color: GoalColor,
    #[serde(default)]
    pub proof: Option<String>,
}

impl Goal {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Input for creating a goal. The id and creation timestamp are assigned
/// by the store, not the caller.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub color: GoalColor,
    pub icon: GoalIcon,
    pub due_date: NaiveDate,
}

/// Outcome of the last simulated payment attempt. Ephemeral: consumed
/// once by the UI layer and cleared, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    Success,
    Error,
}
