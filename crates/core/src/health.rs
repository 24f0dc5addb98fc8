//! Health records and the storage strategy trait.
//!
//! Two entity kinds are tracked: [`HealthGoal`]s (numeric targets with a
//! current value) and [`FoodLogEntry`]s (one eaten item, dated to the day).
//! Both live in whichever [`HealthStore`] serviced the call that created
//! them. Stores never share or reconcile records.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StoreError;

pub use crate::backend::{BackendKind, StoreBackend};

/// Reserved goal type for the daily calorie budget.
pub const DAILY_CALORIES_GOAL: &str = "daily_calories";

/// A tracked numeric target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthGoal {
    /// Opaque identifier, generated at creation
    #[serde(rename = "goal_id")]
    pub id: String,

    /// Lower-cased category ("weight", "daily_calories", ...)
    pub goal_type: String,

    pub target_value: f64,

    /// Missing or null in a remote row reads as zero
    #[serde(default, deserialize_with = "zero_if_null")]
    pub current_value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

impl HealthGoal {
    /// Progress towards the target as a percentage.
    ///
    /// Returns 0 when the target is not positive.
    pub fn progress_percent(&self) -> f64 {
        if self.target_value > 0.0 {
            self.current_value / self.target_value * 100.0
        } else {
            0.0
        }
    }

    pub fn is_daily_calories(&self) -> bool {
        self.goal_type == DAILY_CALORIES_GOAL
    }
}

/// The fields needed to create a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHealthGoal {
    pub goal_type: String,
    pub target_value: f64,
    pub current_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

impl NewHealthGoal {
    /// A fresh, active goal with no progress. The type is lower-cased.
    pub fn new(goal_type: &str, target_value: f64, description: Option<String>) -> Self {
        Self {
            goal_type: goal_type.trim().to_lowercase(),
            target_value,
            current_value: 0.0,
            description,
            is_active: true,
        }
    }

    /// The companion goal created when a daily calorie budget is supplied.
    pub fn daily_calories(target: i64) -> Self {
        Self::new(
            DAILY_CALORIES_GOAL,
            target as f64,
            Some("Daily calorie intake target".into()),
        )
    }

    /// Materialize the goal under the given id.
    pub fn into_goal(self, id: String) -> HealthGoal {
        HealthGoal {
            id,
            goal_type: self.goal_type,
            target_value: self.target_value,
            current_value: self.current_value,
            description: self.description,
            is_active: self.is_active,
            created_at: Utc::now(),
        }
    }
}

/// A partial goal update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GoalUpdate {
    pub fn is_empty(&self) -> bool {
        self.target_value.is_none() && self.current_value.is_none() && self.description.is_none()
    }

    /// Apply the supplied fields to `goal` in place.
    pub fn apply_to(&self, goal: &mut HealthGoal) {
        if let Some(target) = self.target_value {
            goal.target_value = target;
        }
        if let Some(current) = self.current_value {
            goal.current_value = current;
        }
        if let Some(description) = &self.description {
            goal.description = Some(description.clone());
        }
    }
}

/// One recorded food item. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLogEntry {
    #[serde(rename = "food_id")]
    pub id: String,

    /// Lower-cased meal name ("breakfast", "snack", ...)
    pub meal_type: String,

    pub food_item: String,

    #[serde(default)]
    pub calories: Option<i64>,

    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl FoodLogEntry {
    /// Calories counted towards totals; missing values count as zero.
    pub fn counted_calories(&self) -> i64 {
        self.calories.unwrap_or(0)
    }
}

/// The fields needed to log a food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFoodLog {
    pub meal_type: String,
    pub food_item: String,
    pub calories: Option<i64>,
    pub date: NaiveDate,
}

impl NewFoodLog {
    pub fn new(meal_type: &str, food_item: &str, calories: Option<i64>, date: NaiveDate) -> Self {
        Self {
            meal_type: meal_type.trim().to_lowercase(),
            food_item: food_item.trim().to_string(),
            calories,
            date,
        }
    }

    pub fn into_entry(self, id: String) -> FoodLogEntry {
        FoodLogEntry {
            id,
            meal_type: self.meal_type,
            food_item: self.food_item,
            calories: self.calories,
            date: self.date,
            created_at: Utc::now(),
        }
    }
}

/// The storage strategy for goals and food logs.
///
/// Implementations: a remote table store (Supabase/PostgREST) and an
/// in-process store used as fallback.
#[async_trait]
pub trait HealthStore: StoreBackend {
    /// Store a new goal and return its generated id.
    async fn add_goal(&self, goal: NewHealthGoal) -> Result<String, StoreError>;

    /// Apply a partial update. `Ok(None)` when the id is unknown.
    async fn update_goal(
        &self,
        id: &str,
        update: GoalUpdate,
    ) -> Result<Option<HealthGoal>, StoreError>;

    /// All goals flagged active, in creation order.
    async fn active_goals(&self) -> Result<Vec<HealthGoal>, StoreError>;

    /// Append a food entry and return its generated id.
    async fn add_food_log(&self, entry: NewFoodLog) -> Result<String, StoreError>;

    /// Entries dated exactly `date`, in insertion order.
    async fn food_logs_on(&self, date: NaiveDate) -> Result<Vec<FoodLogEntry>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target: f64, current: f64) -> HealthGoal {
        NewHealthGoal::new("Weight", target, None)
            .into_goal("g1".into())
            .with_current(current)
    }

    impl HealthGoal {
        fn with_current(mut self, current: f64) -> Self {
            self.current_value = current;
            self
        }
    }

    #[test]
    fn new_goal_is_normalized_and_active() {
        let g = NewHealthGoal::new("  Weight ", 70.0, None);
        assert_eq!(g.goal_type, "weight");
        assert_eq!(g.current_value, 0.0);
        assert!(g.is_active);
    }

    #[test]
    fn progress_is_ratio_of_current_to_target() {
        assert!((goal(200.0, 50.0).progress_percent() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_target_yields_zero_progress() {
        assert_eq!(goal(0.0, 12.0).progress_percent(), 0.0);
    }

    #[test]
    fn update_applies_only_supplied_fields() {
        let mut g = goal(80.0, 10.0);
        let update = GoalUpdate {
            current_value: Some(20.0),
            ..GoalUpdate::default()
        };
        update.apply_to(&mut g);
        assert_eq!(g.target_value, 80.0);
        assert_eq!(g.current_value, 20.0);
        assert!(g.description.is_none());
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        let json = serde_json::to_value(GoalUpdate::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
        assert!(GoalUpdate::default().is_empty());
    }

    #[test]
    fn goal_uses_remote_field_names() {
        let json = serde_json::to_value(goal(1.0, 0.0)).unwrap();
        assert_eq!(json["goal_id"], "g1");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn food_entry_parses_remote_row() {
        let row = serde_json::json!({
            "food_id": "f1",
            "meal_type": "lunch",
            "food_item": "Soup",
            "calories": null,
            "date": "2026-10-16",
            "created_at": "2026-10-16T12:00:00Z"
        });
        let entry: FoodLogEntry = serde_json::from_value(row).unwrap();
        assert_eq!(entry.counted_calories(), 0);
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    }

    #[test]
    fn null_current_value_reads_as_zero() {
        let row = serde_json::json!({
            "goal_id": "g9",
            "goal_type": "weight",
            "target_value": 70.0,
            "current_value": null,
            "is_active": true,
            "created_at": "2026-10-16T08:00:00Z"
        });
        let goal: HealthGoal = serde_json::from_value(row).unwrap();
        assert_eq!(goal.current_value, 0.0);
        assert_eq!(goal.progress_percent(), 0.0);

        let row = serde_json::json!({
            "goal_id": "g10",
            "goal_type": "steps",
            "target_value": 8000.0,
            "created_at": "2026-10-16T08:00:00Z"
        });
        let goal: HealthGoal = serde_json::from_value(row).unwrap();
        assert_eq!(goal.current_value, 0.0);
        assert!(goal.is_active);
    }

    #[test]
    fn daily_calorie_goal_uses_reserved_type() {
        let g = NewHealthGoal::daily_calories(2000).into_goal("c1".into());
        assert!(g.is_daily_calories());
        assert_eq!(g.target_value, 2000.0);
    }
}
