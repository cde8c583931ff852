use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Goal, NewGoal};

/// Minimum trimmed title length accepted by `add`.
const MIN_TITLE_LEN: usize = 3;

/// The goal collection. Insertion-ordered; serializes transparently as
/// a plain array of goals, which is the on-disk blob format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalState {
    goals: Vec<Goal>,
}

impl GoalState {
    /// Validate and append a new goal. Returns the fresh id, or `None`
    /// when validation fails — invalid input never mutates state.
    pub fn add(&mut self, input: NewGoal) -> Option<String> {
        let title = input.title.trim();
        if title.chars().count() < MIN_TITLE_LEN {
            return None;
        }

        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            created_at: Utc::now(),
            due_date: input.due_date,
            completed_at: None,
            icon: input.icon,
            color: input.color,
            proof: None,
        };
        let id = goal.id.clone();
        self.goals.push(goal);
        Some(id)
    }

    /// Mark a goal completed, stamping the completion time and
    /// overwriting any prior proof. Unknown id is a no-op; repeated
    /// calls refresh the timestamp and proof rather than failing.
    pub fn complete(&mut self, id: &str, proof: Option<String>) -> bool {
        match self.goals.iter_mut().find(|g| g.id == id) {
            Some(goal) => {
                goal.completed_at = Some(Utc::now());
                goal.proof = proof;
                true
            }
            None => false,
        }
    }

    /// Hard-delete a goal. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        self.goals.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn all(&self) -> &[Goal] {
        &self.goals
    }

    pub fn count(&self) -> usize {
        self.goals.len()
    }

    /// Goals still open, in storage order.
    pub fn uncompleted(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|g| !g.is_completed()).collect()
    }

    /// Goals already completed, in storage order.
    pub fn completed(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|g| g.is_completed()).collect()
    }
}
