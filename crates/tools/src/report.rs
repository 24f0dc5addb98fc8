//! Text rendering for health tool results.
//!
//! Every heading carries a ` (Local Storage)` suffix when the in-memory
//! backend serviced the call.

use concierge_core::error::StoreError;
use concierge_core::health::BackendKind;

use crate::health::{CalorieStatus, DailyLog, FoodLogged, GoalUpdated, GoalsAdded, GoalsOverview};

pub const NO_GOALS: &str = "No active health goals found. Add a goal to get started!";
pub const NO_FOOD_TODAY: &str = "No food logged today";

fn heading(text: &str, backend: BackendKind) -> String {
    match backend {
        BackendKind::Local => format!("{text} (Local Storage)"),
        BackendKind::Remote => text.to_string(),
    }
}

/// Capitalize the first letter of every word; words break on non-letters.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Goal values always show a fractional part ("70.0", "72.5").
fn goal_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Calorie amounts drop the fraction when whole ("2000", "512.5").
fn calorie_amount(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

pub fn goals_added(added: &GoalsAdded) -> String {
    let mut out = format!(
        "{}\n\nGoal: {}\nTarget: {}\nGoal ID: {}",
        heading("Health goal added successfully!", added.backend),
        title_case(&added.goal_type),
        goal_value(added.target_value),
        added.goal_id,
    );
    if let Some(calorie) = &added.calorie_goal {
        out.push_str(&format!(
            "\n\nDaily Calorie Goal: {} calories\nCalorie Goal ID: {}",
            calorie.target, calorie.goal_id
        ));
    }
    out
}

pub fn goal_updated(updated: &GoalUpdated) -> String {
    let goal = &updated.goal;
    format!(
        "{}\n\nGoal: {}\nTarget: {}\nCurrent: {}\nGoal ID: {}",
        heading("Health goal updated successfully!", updated.backend),
        title_case(&goal.goal_type),
        goal_value(goal.target_value),
        goal_value(goal.current_value),
        goal.id,
    )
}

pub fn goals_overview(overview: &GoalsOverview) -> String {
    if overview.goals.is_empty() {
        return heading(NO_GOALS, overview.backend);
    }

    let mut out = format!("{}\n", heading("Active Health Goals", overview.backend));
    for goal in &overview.goals {
        let description = goal
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description");
        out.push_str(&format!(
            "\n{}\n  Target: {}\n  Current: {}\n  Progress: {:.1}%\n  Description: {}\n  Goal ID: {}\n",
            title_case(&goal.goal_type),
            goal_value(goal.target_value),
            goal_value(goal.current_value),
            goal.progress_percent(),
            description,
            goal.id,
        ));
    }
    out
}

fn calorie_commentary(status: &CalorieStatus) -> String {
    let remaining = status.remaining();
    let balance = if remaining > 0.0 {
        format!("Remaining: {} calories", calorie_amount(remaining))
    } else {
        format!("Over goal by: {} calories", calorie_amount(remaining.abs()))
    };
    format!(
        "\n\nDaily Calorie Goal: {} calories\nProgress: {:.1}%\n{}",
        calorie_amount(status.target),
        status.progress_percent(),
        balance,
    )
}

pub fn food_logged(logged: &FoodLogged) -> String {
    let mut out = format!(
        "{}\n\nMeal: {}\nFood: {}\n",
        heading("Food logged successfully!", logged.backend),
        title_case(&logged.meal_type),
        logged.food_item,
    );
    if let Some(calories) = logged.calories.filter(|c| *c > 0) {
        out.push_str(&format!("Calories: {calories}\n"));
    }
    out.push_str(&format!("\nToday's Total Calories: {}", logged.total_calories));
    if let Some(status) = &logged.calorie_status {
        out.push_str(&calorie_commentary(status));
    }
    out
}

pub fn daily_log(log: &DailyLog) -> String {
    if log.is_empty() {
        return heading(NO_FOOD_TODAY, log.backend);
    }

    let mut out = format!("{}\n\n", heading("Today's Food Log", log.backend));
    for meal in &log.meals {
        out.push_str(&title_case(&meal.meal_type));
        out.push('\n');
        for entry in &meal.entries {
            match entry.calories.filter(|c| *c != 0) {
                Some(cal) => out.push_str(&format!("  {} ({cal} cal)\n", entry.food_item)),
                None => out.push_str(&format!("  {}\n", entry.food_item)),
            }
        }
        let subtotal = meal.subtotal();
        if subtotal > 0 {
            out.push_str(&format!("  Meal Total: {subtotal} calories\n"));
        }
        out.push('\n');
    }
    out.push_str(&format!("Daily Total: {} calories", log.total_calories()));
    if let Some(status) = &log.calorie_status {
        out.push_str(&calorie_commentary(status));
    }
    out
}

pub fn goal_not_found(goal_id: &str) -> String {
    format!("Health goal {goal_id} not found")
}

/// `Error <doing X>: <message>` for a failed operation.
pub fn failure(doing: &str, err: &StoreError) -> String {
    format!("Error {doing}: {err}")
}
