//! # NutriPlan
//!
//! Turns free-form meal-plan narratives produced by a generative model into
//! structured meal records and health-insight highlights, and persists both
//! derived views in a key/value store for later rendering.

pub mod config;
pub mod errors;
pub mod generation;
pub mod insights;
pub mod meal_plan;
pub mod store;

// Re-export types for easier access
pub use insights::{extract_health_insights, DEFAULT_INSIGHTS, MAX_INSIGHTS};
pub use meal_plan::{
    parse_meal_plan, FallbackDocument, Macronutrients, Meal, MealPlan, MealPlanExtraction,
    MealPlanParser, ParserConfig,
};
