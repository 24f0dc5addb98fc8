//! Goal and food-log operations over the selected backend.
//!
//! [`HealthService`] holds the domain rules (companion calorie goal,
//! daily totals, meal grouping, calorie commentary) and returns typed
//! results. Rendering to text lives in [`crate::report`].

use chrono::{NaiveDate, Utc};
use concierge_core::error::StoreError;
use concierge_core::event::{DomainEvent, EventBus};
use concierge_core::health::{
    BackendKind, FoodLogEntry, GoalUpdate, HealthGoal, HealthStore, NewFoodLog, NewHealthGoal,
    StoreBackend,
};
use concierge_store::BackendSelector;
use std::sync::Arc;
use tracing::{debug, warn};

/// Source of "today" for food logging.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// The local calendar date.
pub fn system_clock() -> Clock {
    Arc::new(|| chrono::Local::now().date_naive())
}

/// The companion daily calorie goal created alongside another goal.
#[derive(Debug, Clone, PartialEq)]
pub struct CalorieGoalAdded {
    pub target: i64,
    pub goal_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalsAdded {
    pub backend: BackendKind,
    pub goal_type: String,
    pub target_value: f64,
    pub goal_id: String,
    pub calorie_goal: Option<CalorieGoalAdded>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalUpdated {
    pub backend: BackendKind,
    pub goal: HealthGoal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalsOverview {
    pub backend: BackendKind,
    pub goals: Vec<HealthGoal>,
}

/// Where the day's intake stands against the daily calorie goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieStatus {
    pub target: f64,
    pub total: i64,
}

impl CalorieStatus {
    pub fn progress_percent(&self) -> f64 {
        self.total as f64 / self.target * 100.0
    }

    /// Positive when under budget, zero or negative when at or over it.
    pub fn remaining(&self) -> f64 {
        self.target - self.total as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoodLogged {
    pub backend: BackendKind,
    pub food_id: String,
    pub meal_type: String,
    pub food_item: String,
    pub calories: Option<i64>,
    pub total_calories: i64,
    pub calorie_status: Option<CalorieStatus>,
}

/// One meal section of the daily log.
#[derive(Debug, Clone, PartialEq)]
pub struct MealGroup {
    pub meal_type: String,
    pub entries: Vec<FoodLogEntry>,
}

impl MealGroup {
    pub fn subtotal(&self) -> i64 {
        self.entries.iter().map(FoodLogEntry::counted_calories).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyLog {
    pub backend: BackendKind,
    pub date: NaiveDate,
    /// Meals in first-seen order, entries in insertion order
    pub meals: Vec<MealGroup>,
    pub calorie_status: Option<CalorieStatus>,
}

impl DailyLog {
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    pub fn total_calories(&self) -> i64 {
        self.meals.iter().map(MealGroup::subtotal).sum()
    }
}

/// Group entries by meal type, preserving first-seen meal order.
pub fn group_by_meal(entries: Vec<FoodLogEntry>) -> Vec<MealGroup> {
    let mut meals: Vec<MealGroup> = Vec::new();
    for entry in entries {
        match meals.iter_mut().find(|m| m.meal_type == entry.meal_type) {
            Some(group) => group.entries.push(entry),
            None => meals.push(MealGroup {
                meal_type: entry.meal_type.clone(),
                entries: vec![entry],
            }),
        }
    }
    meals
}

pub struct HealthService {
    selector: BackendSelector,
    clock: Clock,
    events: Option<Arc<EventBus>>,
}

impl HealthService {
    pub fn new(selector: BackendSelector) -> Self {
        Self {
            selector,
            clock: system_clock(),
            events: None,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Whether a remote store is configured.
    pub fn has_remote(&self) -> bool {
        self.selector.has_remote()
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Create a goal, plus a `daily_calories` goal when a positive
    /// calorie target is supplied.
    pub async fn add_goal(
        &self,
        goal_type: &str,
        target_value: f64,
        description: Option<String>,
        daily_calorie_goal: Option<i64>,
    ) -> Result<GoalsAdded, StoreError> {
        if goal_type.trim().is_empty() {
            return Err(StoreError::InvalidInput("goal_type must not be empty".into()));
        }
        if !target_value.is_finite() {
            return Err(StoreError::InvalidInput("target_value must be a number".into()));
        }

        let store = self.selector.select().await;
        let goal = NewHealthGoal::new(goal_type, target_value, description);
        let goal_type = goal.goal_type.clone();
        let goal_id = store.add_goal(goal).await?;
        self.goal_recorded(&goal_id, &goal_type, store.kind());

        let calorie_goal = match daily_calorie_goal.filter(|c| *c > 0) {
            Some(target) => {
                let id = store.add_goal(NewHealthGoal::daily_calories(target)).await?;
                self.goal_recorded(&id, concierge_core::DAILY_CALORIES_GOAL, store.kind());
                Some(CalorieGoalAdded {
                    target,
                    goal_id: id,
                })
            }
            None => None,
        };

        Ok(GoalsAdded {
            backend: store.kind(),
            goal_type,
            target_value,
            goal_id,
            calorie_goal,
        })
    }

    /// Apply the supplied fields. `NotFound` when the id is unknown.
    pub async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<GoalUpdated, StoreError> {
        let store = self.selector.select().await;
        match store.update_goal(goal_id, update).await? {
            Some(goal) => Ok(GoalUpdated {
                backend: store.kind(),
                goal,
            }),
            None => Err(StoreError::NotFound(goal_id.to_string())),
        }
    }

    pub async fn list_active_goals(&self) -> Result<GoalsOverview, StoreError> {
        let store = self.selector.select().await;
        let goals = store.active_goals().await?;
        Ok(GoalsOverview {
            backend: store.kind(),
            goals,
        })
    }

    /// Append an entry dated today and recompute the day's total.
    pub async fn log_food(
        &self,
        meal_type: &str,
        food_item: &str,
        calories: Option<i64>,
    ) -> Result<FoodLogged, StoreError> {
        if food_item.trim().is_empty() {
            return Err(StoreError::InvalidInput("food_item must not be empty".into()));
        }

        let today = self.today();
        let store = self.selector.select().await;
        let entry = NewFoodLog::new(meal_type, food_item, calories, today);
        let (meal_type, food_item) = (entry.meal_type.clone(), entry.food_item.clone());
        let food_id = store.add_food_log(entry).await?;

        if let Some(events) = &self.events {
            events.publish(DomainEvent::FoodLogged {
                food_id: food_id.clone(),
                calories,
                backend: store.kind(),
                timestamp: Utc::now(),
            });
        }

        let total_calories: i64 = store
            .food_logs_on(today)
            .await?
            .iter()
            .map(FoodLogEntry::counted_calories)
            .sum();
        let calorie_status = self.calorie_status(store.as_ref(), total_calories).await;

        Ok(FoodLogged {
            backend: store.kind(),
            food_id,
            meal_type,
            food_item,
            calories,
            total_calories,
            calorie_status,
        })
    }

    /// Today's entries grouped by meal.
    pub async fn today_log(&self) -> Result<DailyLog, StoreError> {
        let today = self.today();
        let store = self.selector.select().await;
        let meals = group_by_meal(store.food_logs_on(today).await?);

        let mut log = DailyLog {
            backend: store.kind(),
            date: today,
            meals,
            calorie_status: None,
        };
        if !log.is_empty() {
            log.calorie_status = self.calorie_status(store.as_ref(), log.total_calories()).await;
        }
        Ok(log)
    }

    /// Commentary against the first active `daily_calories` goal.
    ///
    /// A failed lookup only drops the commentary.
    async fn calorie_status(&self, store: &dyn HealthStore, total: i64) -> Option<CalorieStatus> {
        let goals = match store.active_goals().await {
            Ok(goals) => goals,
            Err(e) => {
                warn!(error = %e, "Calorie goal lookup failed, omitting progress");
                return None;
            }
        };
        let target = goals
            .iter()
            .find(|g| g.is_daily_calories())
            .map(|g| g.target_value)
            .filter(|t| *t > 0.0)?;
        debug!(calorie_target = target, total, "Daily calorie goal found");
        Some(CalorieStatus { target, total })
    }

    fn goal_recorded(&self, goal_id: &str, goal_type: &str, backend: BackendKind) {
        if let Some(events) = &self.events {
            events.publish(DomainEvent::GoalRecorded {
                goal_id: goal_id.to_string(),
                goal_type: goal_type.to_string(),
                backend,
                timestamp: Utc::now(),
            });
        }
    }
}
