use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::dates::{self, DayId};
use crate::goals::GoalState;
use crate::models::{Goal, NewGoal, PaymentOutcome};
use crate::storage::Storage;
use crate::subscription::SubscriptionState;

/// Storage key for the serialized goal collection.
const GOALS_KEY: &str = "goals";
/// Storage key for the serialized subscription record.
const SUBSCRIPTION_KEY: &str = "subscription";

/// The process-wide state container. Owns the goal collection, the
/// subscription record and the storage handle; constructed once at
/// startup and passed by reference to whatever drives it.
///
/// Every successful mutation is mirrored to storage under the slice's
/// key. Persistence is fire-and-forget: a failed write is logged and
/// the in-memory state stays authoritative for the rest of the process.
pub struct AppStore {
    goals: GoalState,
    subscription: SubscriptionState,
    storage: Storage,
}

impl AppStore {
    /// Build the store, rehydrating both persisted slices before any
    /// mutation is accepted. A missing or corrupt blob falls back to
    /// that slice's default state only — a broken goal blob never
    /// blocks recovery of a valid subscription blob.
    pub fn open(storage: Storage) -> Self {
        let goals = rehydrate(&storage, GOALS_KEY);
        let subscription = rehydrate(&storage, SUBSCRIPTION_KEY);
        Self {
            goals,
            subscription,
            storage,
        }
    }

    // --- goal mutations ---

    /// Validate and add a goal. Returns the new id, or `None` when the
    /// input was rejected (in which case nothing was written anywhere).
    pub fn add_goal(&mut self, input: NewGoal) -> Option<String> {
        let id = self.goals.add(input);
        if id.is_some() {
            self.persist(GOALS_KEY, &self.goals);
        }
        id
    }

    /// Mark a goal completed, attaching optional photo proof.
    pub fn complete_goal(&mut self, id: &str, proof: Option<String>) -> bool {
        let changed = self.goals.complete(id, proof);
        if changed {
            self.persist(GOALS_KEY, &self.goals);
        }
        changed
    }

    /// Permanently delete a goal.
    pub fn remove_goal(&mut self, id: &str) -> bool {
        let changed = self.goals.remove(id);
        if changed {
            self.persist(GOALS_KEY, &self.goals);
        }
        changed
    }

    // --- subscription mutations ---

    pub fn subscribe(&mut self) {
        self.subscription.activate();
        self.persist(SUBSCRIPTION_KEY, &self.subscription);
    }

    pub fn unsubscribe(&mut self) {
        self.subscription.deactivate();
        self.persist(SUBSCRIPTION_KEY, &self.subscription);
    }

    // The payment marker is ephemeral; changing it touches nothing
    // durable, so these two skip the storage write.

    pub fn set_payment_result(&mut self, outcome: PaymentOutcome) {
        self.subscription.set_payment_result(outcome);
    }

    pub fn clear_payment_result(&mut self) {
        self.subscription.clear_payment_result();
    }

    // --- selectors ---

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.get(id)
    }

    pub fn goal_count(&self) -> usize {
        self.goals.count()
    }

    pub fn uncompleted_goals(&self) -> Vec<&Goal> {
        self.goals.uncompleted()
    }

    pub fn completed_goals(&self) -> Vec<&Goal> {
        self.goals.completed()
    }

    /// All goals bucketed by due day, buckets ascending.
    pub fn goals_by_day(&self) -> Vec<(DayId, Vec<&Goal>)> {
        dates::group_by_day(self.goals.all())
    }

    pub fn is_entitled(&self) -> bool {
        self.subscription.is_entitled()
    }

    pub fn subscription_expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.subscription.expires_at
    }

    pub fn payment_result(&self) -> Option<PaymentOutcome> {
        self.subscription.payment_result()
    }

    fn persist<T: Serialize>(&self, key: &str, state: &T) {
        let blob = match serde_json::to_string(state) {
            Ok(blob) => blob,
            Err(e) => {
                error!(key, error = %e, "failed to serialize state for persistence");
                return;
            }
        };
        if let Err(e) = self.storage.set(key, &blob) {
            error!(key, error = %e, "failed to persist state; keeping in-memory state");
        }
    }
}

fn rehydrate<T: DeserializeOwned + Default>(storage: &Storage, key: &str) -> T {
    match storage.get(key) {
        Ok(Some(blob)) => match serde_json::from_str(&blob) {
            Ok(state) => state,
            Err(e) => {
                warn!(key, error = %e, "discarding corrupt persisted state");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "failed to read persisted state, starting fresh");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::{GoalColor, GoalIcon};

    fn in_memory_store() -> AppStore {
        AppStore::open(Storage::open_in_memory().unwrap())
    }

    fn input(title: &str, due: &str) -> NewGoal {
        NewGoal {
            title: title.to_string(),
            color: GoalColor::Blue,
            icon: GoalIcon::Exercise,
            due_date: NaiveDate::parse_from_str(due, "%Y-%m-%d").unwrap(),
        }
    }

    #[test]
    fn add_complete_scenario() {
        let mut store = in_memory_store();

        let id = store.add_goal(input("Run 5k", "2025-09-01")).unwrap();
        assert_eq!(store.goal_count(), 1);
        assert_eq!(store.uncompleted_goals().len(), 1);
        assert!(store.completed_goals().is_empty());

        assert!(store.complete_goal(&id, Some("img://x".to_string())));
        assert!(store.uncompleted_goals().is_empty());
        let completed = store.completed_goals();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].proof.as_deref(), Some("img://x"));
    }

    #[test]
    fn invalid_add_leaves_everything_untouched() {
        let mut store = in_memory_store();
        assert!(store.add_goal(input("", "2025-09-01")).is_none());
        assert_eq!(store.goal_count(), 0);
    }

    #[test]
    fn goals_by_day_combines_selector_and_bucketing() {
        let mut store = in_memory_store();
        store.add_goal(input("Later goal", "2025-09-15")).unwrap();
        store.add_goal(input("Sooner goal", "2025-09-01")).unwrap();

        let grouped = store.goals_by_day();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "2025-09-01");
        assert_eq!(grouped[1].0, "2025-09-15");
    }

    #[test]
    fn subscription_lifecycle() {
        let mut store = in_memory_store();
        assert!(!store.is_entitled());

        store.subscribe();
        assert!(store.is_entitled());

        store.unsubscribe();
        assert!(!store.is_entitled());
    }

    #[test]
    fn payment_result_round_trip_is_in_memory_only() {
        let mut store = in_memory_store();
        store.set_payment_result(PaymentOutcome::Success);
        assert_eq!(store.payment_result(), Some(PaymentOutcome::Success));
        store.clear_payment_result();
        assert!(store.payment_result().is_none());
    }

    #[test]
    fn state_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        let path = path.to_str().unwrap();

        let id = {
            let mut store = AppStore::open(Storage::open(path).unwrap());
            let id = store.add_goal(input("Run 5k", "2025-09-01")).unwrap();
            store.complete_goal(&id, Some("img://x".to_string()));
            store.subscribe();
            id
        };

        let store = AppStore::open(Storage::open(path).unwrap());
        assert_eq!(store.goal_count(), 1);
        assert_eq!(
            store.goal(&id).unwrap().proof.as_deref(),
            Some("img://x")
        );
        assert!(store.is_entitled());
        // The ephemeral marker does not survive.
        assert!(store.payment_result().is_none());
    }

    #[test]
    fn corrupt_goal_blob_does_not_block_subscription_recovery() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set("goals", "this is not json").unwrap();
        storage
            .set("subscription", "{\"expires_at\":\"2099-01-01T00:00:00Z\"}")
            .unwrap();

        let store = AppStore::open(storage);
        assert_eq!(store.goal_count(), 0);
        assert!(store.is_entitled());
    }

    #[test]
    fn removed_goal_cannot_be_completed() {
        let mut store = in_memory_store();
        let id = store.add_goal(input("Run 5k", "2025-09-01")).unwrap();

        assert!(store.remove_goal(&id));
        assert!(!store.complete_goal(&id, Some("img://x".to_string())));
        assert_eq!(store.goal_count(), 0);
    }
}
