//! In-memory backend: the fallback when no remote store is configured.

use async_trait::async_trait;
use chrono::NaiveDate;
use concierge_core::backend::{BackendKind, StoreBackend};
use concierge_core::error::StoreError;
use concierge_core::health::{
    FoodLogEntry, GoalUpdate, HealthGoal, HealthStore, NewFoodLog, NewHealthGoal,
};
use concierge_core::note::{NewNote, Note, NoteStore, NoteUpdate};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Goals, food logs and notes held in process memory.
///
/// Cloning shares the underlying collections. Records live as long as the
/// process.
#[derive(Clone)]
pub struct LocalStore {
    goals: Arc<RwLock<Vec<HealthGoal>>>,
    food_logs: Arc<RwLock<Vec<FoodLogEntry>>>,
    notes: Arc<RwLock<Vec<Note>>>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self {
            goals: Arc::new(RwLock::new(Vec::new())),
            food_logs: Arc::new(RwLock::new(Vec::new())),
            notes: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn goal_count(&self) -> usize {
        self.goals.read().await.len()
    }

    pub async fn food_log_count(&self) -> usize {
        self.food_logs.read().await.len()
    }

    pub async fn note_count(&self) -> usize {
        self.notes.read().await.len()
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreBackend for LocalStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn is_available(&self) -> bool {
        true
    }
}

#[async_trait]
impl HealthStore for LocalStore {
    async fn add_goal(&self, goal: NewHealthGoal) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.goals.write().await.push(goal.into_goal(id.clone()));
        Ok(id)
    }

    async fn update_goal(
        &self,
        id: &str,
        update: GoalUpdate,
    ) -> Result<Option<HealthGoal>, StoreError> {
        let mut goals = self.goals.write().await;
        Ok(goals.iter_mut().find(|g| g.id == id).map(|goal| {
            update.apply_to(goal);
            goal.clone()
        }))
    }

    async fn active_goals(&self) -> Result<Vec<HealthGoal>, StoreError> {
        let goals = self.goals.read().await;
        Ok(goals.iter().filter(|g| g.is_active).cloned().collect())
    }

    async fn add_food_log(&self, entry: NewFoodLog) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.food_logs.write().await.push(entry.into_entry(id.clone()));
        Ok(id)
    }

    async fn food_logs_on(&self, date: NaiveDate) -> Result<Vec<FoodLogEntry>, StoreError> {
        let logs = self.food_logs.read().await;
        Ok(logs.iter().filter(|e| e.date == date).cloned().collect())
    }
}

#[async_trait]
impl NoteStore for LocalStore {
    async fn add_note(&self, note: NewNote) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.notes.write().await.push(note.into_note(id.clone()));
        Ok(id)
    }

    async fn update_note(&self, id: &str, update: NoteUpdate) -> Result<Option<Note>, StoreError> {
        let mut notes = self.notes.write().await;
        Ok(notes.iter_mut().find(|n| n.id == id).map(|note| {
            update.apply_to(note);
            note.clone()
        }))
    }

    async fn notes(&self) -> Result<Vec<Note>, StoreError> {
        Ok(self.notes.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn add_and_list_goal() {
        let store = LocalStore::new();
        let id = store
            .add_goal(NewHealthGoal::new("Weight", 70.0, Some("lose 5kg".into())))
            .await
            .unwrap();

        let goals = store.active_goals().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id, id);
        assert_eq!(goals[0].goal_type, "weight");
        assert_eq!(goals[0].current_value, 0.0);
    }

    #[tokio::test]
    async fn update_unknown_goal_creates_nothing() {
        let store = LocalStore::new();
        let update = GoalUpdate {
            current_value: Some(3.0),
            ..GoalUpdate::default()
        };
        assert!(store.update_goal("missing", update).await.unwrap().is_none());
        assert_eq!(store.goal_count().await, 0);
    }

    #[tokio::test]
    async fn update_applies_partial_fields() {
        let store = LocalStore::new();
        let id = store
            .add_goal(NewHealthGoal::new("steps", 10000.0, None))
            .await
            .unwrap();

        let updated = store
            .update_goal(
                &id,
                GoalUpdate {
                    current_value: Some(2500.0),
                    ..GoalUpdate::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.target_value, 10000.0);
        assert_eq!(updated.current_value, 2500.0);
    }

    #[tokio::test]
    async fn inactive_goals_are_hidden() {
        let store = LocalStore::new();
        let mut goal = NewHealthGoal::new("sleep", 8.0, None);
        goal.is_active = false;
        store.add_goal(goal).await.unwrap();
        assert!(store.active_goals().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn food_logs_filter_by_exact_date() {
        let store = LocalStore::new();
        store
            .add_food_log(NewFoodLog::new("Breakfast", "Oatmeal", Some(300), day(15)))
            .await
            .unwrap();
        store
            .add_food_log(NewFoodLog::new("lunch", "Salad", None, day(16)))
            .await
            .unwrap();
        store
            .add_food_log(NewFoodLog::new("dinner", "Pasta", Some(700), day(16)))
            .await
            .unwrap();

        let today = store.food_logs_on(day(16)).await.unwrap();
        assert_eq!(today.len(), 2);
        assert_eq!(today[0].food_item, "Salad");
        assert_eq!(today[1].food_item, "Pasta");

        let yesterday = store.food_logs_on(day(15)).await.unwrap();
        assert_eq!(yesterday[0].meal_type, "breakfast");
    }

    #[tokio::test]
    async fn concurrent_appends_are_not_lost() {
        let store = LocalStore::new();
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .add_food_log(NewFoodLog::new("snack", &format!("item {i}"), Some(10), day(16)))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.food_log_count().await, 32);
    }

    #[tokio::test]
    async fn notes_keep_insertion_order_and_update_in_place() {
        let store = LocalStore::new();
        let first = store.add_note(NewNote::new("buy milk", false)).await.unwrap();
        store.add_note(NewNote::new("call the bank", false)).await.unwrap();

        let updated = store
            .update_note(
                &first,
                NoteUpdate {
                    is_completed: Some(true),
                    ..NoteUpdate::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(updated.is_completed);
        assert_eq!(updated.content, "buy milk");

        let notes = store.notes().await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, first);
        assert_eq!(notes[1].content, "call the bank");
        assert!(!notes[1].is_completed);
    }

    #[tokio::test]
    async fn update_unknown_note_is_none() {
        let store = LocalStore::new();
        let update = NoteUpdate {
            content: Some("x".into()),
            ..NoteUpdate::default()
        };
        assert!(store.update_note("ghost", update).await.unwrap().is_none());
        assert_eq!(store.note_count().await, 0);
    }
}
