//! The five health tools exposed to the health agent and the CLI.
//!
//! Each tool decodes its JSON arguments, calls [`HealthService`], and
//! renders the outcome with [`crate::report`]. Store failures become a
//! failed [`ToolResult`] with an `Error <doing X>: …` text rather than a
//! [`ToolError`], so the LLM can read and relay them.

use async_trait::async_trait;
use concierge_core::error::{StoreError, ToolError};
use concierge_core::health::GoalUpdate;
use concierge_core::tool::{Tool, ToolResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::health::HealthService;
use crate::report;

pub(crate) fn parse_args<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T, ToolError> {
    // Tools without parameters may be called with `null`
    let arguments = if arguments.is_null() {
        serde_json::json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Whole calories from a JSON number that may arrive as a float.
fn whole_calories(value: Option<f64>) -> Option<i64> {
    value.filter(|v| v.is_finite()).map(|v| v.round() as i64)
}

pub(crate) fn store_failure(doing: &str, err: &StoreError) -> ToolResult {
    ToolResult::failure(report::failure(doing, err))
}

// --- add_health_goal ---

#[derive(Debug, Deserialize)]
struct AddGoalArgs {
    goal_type: String,
    target_value: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    daily_calorie_goal: Option<f64>,
}

pub struct AddHealthGoalTool {
    service: Arc<HealthService>,
}

impl AddHealthGoalTool {
    pub fn new(service: Arc<HealthService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for AddHealthGoalTool {
    fn name(&self) -> &str {
        "add_health_goal"
    }

    fn description(&self) -> &str {
        "Add a new health goal (weight, calories, etc.) with optional daily calorie goal"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "goal_type": {
                    "type": "string",
                    "description": "Goal category, e.g. weight, steps, water"
                },
                "target_value": {
                    "type": "number",
                    "description": "The numeric target to reach"
                },
                "description": {
                    "type": "string",
                    "description": "Optional free-text description"
                },
                "daily_calorie_goal": {
                    "type": "integer",
                    "description": "Optional daily calorie budget, stored as a separate goal"
                }
            },
            "required": ["goal_type", "target_value"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: AddGoalArgs = parse_args(arguments)?;
        let result = self
            .service
            .add_goal(
                &args.goal_type,
                args.target_value,
                args.description,
                whole_calories(args.daily_calorie_goal),
            )
            .await;

        Ok(match result {
            Ok(added) => ToolResult::text(report::goals_added(&added)).with_data(serde_json::json!({
                "backend": added.backend,
                "goal_id": added.goal_id,
                "calorie_goal_id": added.calorie_goal.as_ref().map(|c| c.goal_id.clone()),
            })),
            Err(e) => store_failure("adding health goal", &e),
        })
    }
}

// --- update_health_goal ---

#[derive(Debug, Deserialize)]
struct UpdateGoalArgs {
    goal_id: String,
    #[serde(default)]
    target_value: Option<f64>,
    #[serde(default)]
    current_value: Option<f64>,
    #[serde(default)]
    description: Option<String>,
}

pub struct UpdateHealthGoalTool {
    service: Arc<HealthService>,
}

impl UpdateHealthGoalTool {
    pub fn new(service: Arc<HealthService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for UpdateHealthGoalTool {
    fn name(&self) -> &str {
        "update_health_goal"
    }

    fn description(&self) -> &str {
        "Update an existing health goal"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "goal_id": {
                    "type": "string",
                    "description": "The Goal ID returned when the goal was added"
                },
                "target_value": { "type": "number", "description": "New target" },
                "current_value": { "type": "number", "description": "Progress so far" },
                "description": { "type": "string", "description": "New description" }
            },
            "required": ["goal_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: UpdateGoalArgs = parse_args(arguments)?;
        let update = GoalUpdate {
            target_value: args.target_value,
            current_value: args.current_value,
            description: args.description,
        };

        Ok(match self.service.update_goal(&args.goal_id, update).await {
            Ok(updated) => ToolResult::text(report::goal_updated(&updated)),
            Err(StoreError::NotFound(id)) => ToolResult::failure(report::goal_not_found(&id)),
            Err(e) => store_failure("updating health goal", &e),
        })
    }
}

// --- get_health_goals ---

pub struct GetHealthGoalsTool {
    service: Arc<HealthService>,
}

impl GetHealthGoalsTool {
    pub fn new(service: Arc<HealthService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetHealthGoalsTool {
    fn name(&self) -> &str {
        "get_health_goals"
    }

    fn description(&self) -> &str {
        "Get all active health goals"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(match self.service.list_active_goals().await {
            Ok(overview) => ToolResult::text(report::goals_overview(&overview))
                .with_data(serde_json::json!({ "count": overview.goals.len() })),
            Err(e) => store_failure("getting health goals", &e),
        })
    }
}

// --- add_food_log ---

#[derive(Debug, Deserialize)]
struct AddFoodArgs {
    meal_type: String,
    food_item: String,
    #[serde(default)]
    calories: Option<f64>,
}

pub struct AddFoodLogTool {
    service: Arc<HealthService>,
}

impl AddFoodLogTool {
    pub fn new(service: Arc<HealthService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for AddFoodLogTool {
    fn name(&self) -> &str {
        "add_food_log"
    }

    fn description(&self) -> &str {
        "Add a food item to your daily log"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "meal_type": {
                    "type": "string",
                    "description": "breakfast, lunch, dinner or snack"
                },
                "food_item": {
                    "type": "string",
                    "description": "What was eaten"
                },
                "calories": {
                    "type": "integer",
                    "description": "Optional calorie count"
                }
            },
            "required": ["meal_type", "food_item"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: AddFoodArgs = parse_args(arguments)?;
        let result = self
            .service
            .log_food(&args.meal_type, &args.food_item, whole_calories(args.calories))
            .await;

        Ok(match result {
            Ok(logged) => ToolResult::text(report::food_logged(&logged)).with_data(serde_json::json!({
                "backend": logged.backend,
                "food_id": logged.food_id,
                "total_calories": logged.total_calories,
            })),
            Err(e) => store_failure("adding food log", &e),
        })
    }
}

// --- get_food_log ---

pub struct GetFoodLogTool {
    service: Arc<HealthService>,
}

impl GetFoodLogTool {
    pub fn new(service: Arc<HealthService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetFoodLogTool {
    fn name(&self) -> &str {
        "get_food_log"
    }

    fn description(&self) -> &str {
        "Get today's food log with calorie goal progress"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(match self.service.today_log().await {
            Ok(log) => ToolResult::text(report::daily_log(&log)).with_data(serde_json::json!({
                "date": log.date,
                "empty": log.is_empty(),
                "total_calories": log.total_calories(),
            })),
            Err(e) => store_failure("getting food log", &e),
        })
    }
}
