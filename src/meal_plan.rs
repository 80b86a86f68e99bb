//! # Meal Plan Section Extraction
//!
//! This module converts a free-form meal-plan narrative into structured meal
//! records. The upstream generator is expected (but not guaranteed) to emit
//! headed sections of the form `### Breakfast (350 kcal)` followed by a macro
//! line and a bulleted ingredient list.
//!
//! ## Features
//!
//! - Regex-based section segmentation with a single left-to-right scan
//! - Calorie and macronutrient extraction with zero defaults
//! - Two-tier ingredient detection (`- ` lines, then `* ` bullets)
//! - Lossy-input tolerance: anything unparseable falls back to the raw text

use lazy_static::lazy_static;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult};

/// Inputs shorter than this are assumed too degenerate to contain structured
/// content and are returned unparsed.
pub const MIN_STRUCTURED_LEN: usize = 50;

lazy_static! {
    /// Heading marker introducing a meal section, e.g. `### Breakfast (350 kcal)`.
    /// The parenthesized calorie count is optional.
    static ref SECTION_HEADING: Regex =
        Regex::new(r"###?\s*([A-Za-z ]+)(?: \((\d+) kcal\))?")
            .expect("section heading pattern should be valid");
    /// Line-flattened macro breakdown, e.g. `Carbs: 40g, Protein: 20g, Fat: 10g`.
    static ref MACRO_LINE: Regex =
        Regex::new(r"(?i)Carbs: (\d+)g[^\n]*Protein: (\d+)g[^\n]*Fat: (\d+)g")
            .expect("macro line pattern should be valid");
    /// Asterisk bullet used as the secondary ingredient marker.
    static ref STAR_BULLET: Regex =
        Regex::new(r"\* ([^\n]+)").expect("star bullet pattern should be valid");
}

/// Macronutrient breakdown in grams. Fields default to 0 when the narrative
/// carries no recognizable macro line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macronutrients {
    pub carbs: u32,
    pub protein: u32,
    pub fat: u32,
}

/// A single parsed meal section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    /// Heading name with original casing, always non-empty
    pub name: String,
    /// Kilocalories from the heading, 0 when absent
    pub calories: u32,
    /// Macro breakdown from the section body, zeros when absent
    pub macronutrients: Macronutrients,
    /// Ingredient lines in document order, may be empty
    pub ingredients: Vec<String>,
    /// Verbatim trimmed section body
    pub notes: String,
}

/// Ordered mapping from lowercase meal key to parsed meal.
///
/// Iteration and serialization follow insertion order, which matches document
/// order for a parsed narrative. Inserting an existing key replaces the value
/// in place without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealPlan {
    entries: Vec<(String, Meal)>,
}

impl MealPlan {
    /// Create an empty meal plan
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a meal under its lowercase key, replacing any existing entry in place
    pub fn insert(&mut self, key: String, meal: Meal) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = meal;
        } else {
            self.entries.push((key, meal));
        }
    }

    /// Look up a meal by its lowercase key
    pub fn get(&self, key: &str) -> Option<&Meal> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, m)| m)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Key/meal pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Meal)> {
        self.entries.iter().map(|(k, m)| (k.as_str(), m))
    }

    /// Number of meals in the plan
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan holds no meals
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Serialized as a JSON object so the rendering layer can index by meal key.
// A derived map type would lose insertion order, so the entries are written
// out manually.
impl Serialize for MealPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, meal) in &self.entries {
            map.serialize_entry(key, meal)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MealPlan {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MealPlanVisitor;

        impl<'de> serde::de::Visitor<'de> for MealPlanVisitor {
            type Value = MealPlan;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map of meal keys to meals")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Self::Value, A::Error> {
                let mut plan = MealPlan::new();
                while let Some((key, meal)) = access.next_entry::<String, Meal>()? {
                    plan.insert(key, meal);
                }
                Ok(plan)
            }
        }

        deserializer.deserialize_map(MealPlanVisitor)
    }
}

/// Degraded result preserving the original text when no structure was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackDocument {
    /// The unmodified input narrative
    #[serde(rename = "rawText")]
    pub raw_text: String,
}

/// Result of a parse: either a structured plan or the raw fallback, never a
/// hybrid of the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MealPlanExtraction {
    /// At least one meal section was recognized
    Plan(MealPlan),
    /// No structured content could be extracted
    Fallback(FallbackDocument),
}

impl MealPlanExtraction {
    /// The structured plan, if extraction succeeded
    pub fn as_plan(&self) -> Option<&MealPlan> {
        match self {
            MealPlanExtraction::Plan(plan) => Some(plan),
            MealPlanExtraction::Fallback(_) => None,
        }
    }

    /// Whether the result is the raw fallback shape
    pub fn is_fallback(&self) -> bool {
        matches!(self, MealPlanExtraction::Fallback(_))
    }
}

/// Configuration options for section extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Inputs shorter than this are returned unparsed as a fallback document
    pub min_structured_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_structured_len: MIN_STRUCTURED_LEN,
        }
    }
}

impl ParserConfig {
    /// Validate parser configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if self.min_structured_len == 0 {
            return Err(AppError::Config(
                "min_structured_len must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Section extractor turning narratives into [`MealPlanExtraction`] values
pub struct MealPlanParser {
    config: ParserConfig,
}

impl Default for MealPlanParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MealPlanParser {
    /// Create a parser with the default configuration
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration
    pub fn with_config(config: ParserConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parse a meal-plan narrative into structured meals, falling back to the
    /// raw text when no section heading is recognized.
    ///
    /// The scan is a single left-to-right pass: each heading match opens a
    /// section whose body runs to the next heading, truncated at the first
    /// horizontal rule. First plausible match wins, no backtracking. The
    /// function is pure and deterministic; identical input yields an
    /// identical result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nutri_plan::meal_plan::MealPlanParser;
    ///
    /// let parser = MealPlanParser::new();
    /// let text = "### Breakfast (350 kcal)\nCarbs: 40g, Protein: 20g, Fat: 10g\n- Oats\n- Banana\n";
    /// let plan = parser.parse(text);
    /// assert!(plan.as_plan().is_some());
    /// ```
    pub fn parse(&self, text: &str) -> MealPlanExtraction {
        if text.len() < self.config.min_structured_len {
            debug!(
                input_len = text.len(),
                "Input below structured threshold, returning raw fallback"
            );
            return MealPlanExtraction::Fallback(FallbackDocument {
                raw_text: text.to_string(),
            });
        }

        let mut plan = MealPlan::new();
        let headings: Vec<regex::Captures> = SECTION_HEADING.captures_iter(text).collect();

        for (i, caps) in headings.iter().enumerate() {
            let heading = caps
                .get(0)
                .expect("capture group 0 is always the whole match");
            let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if name.is_empty() {
                warn!("Skipping section heading with empty name");
                continue;
            }

            let calories = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);

            let body_start = heading.end();
            let body_end = headings
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(text.len());
            let mut body = &text[body_start..body_end];
            // A horizontal rule closes the section early.
            if let Some(rule) = body.find("\n---") {
                body = &body[..rule];
            }

            let macronutrients = extract_macronutrients(body);
            let ingredients = extract_ingredients(body);
            debug!(
                meal = %name,
                calories,
                ingredient_count = ingredients.len(),
                "Parsed meal section"
            );

            plan.insert(
                name.to_lowercase(),
                Meal {
                    name: name.to_string(),
                    calories,
                    macronutrients,
                    ingredients,
                    notes: body.trim().to_string(),
                },
            );
        }

        if plan.is_empty() {
            info!("No meal sections recognized, returning raw fallback");
            return MealPlanExtraction::Fallback(FallbackDocument {
                raw_text: text.to_string(),
            });
        }

        info!(meal_count = plan.len(), "Parsed meal plan narrative");
        MealPlanExtraction::Plan(plan)
    }
}

/// Parse a meal-plan narrative with the default configuration
pub fn parse_meal_plan(text: &str) -> MealPlanExtraction {
    MealPlanParser::new().parse(text)
}

/// First macro line wins; a section without one yields all zeros.
fn extract_macronutrients(body: &str) -> Macronutrients {
    match MACRO_LINE.captures(body) {
        Some(caps) => Macronutrients {
            carbs: parse_grams(caps.get(1)),
            protein: parse_grams(caps.get(2)),
            fat: parse_grams(caps.get(3)),
        },
        None => Macronutrients::default(),
    }
}

// The pattern only captures digit runs, so a failed parse can only mean
// overflow; policy is 0 rather than an error.
fn parse_grams(group: Option<regex::Match>) -> u32 {
    group.and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

/// Two-tier ingredient detection: dash-space lines first, asterisk bullets
/// only when no dash line was found. Both tiers empty is a valid outcome.
fn extract_ingredients(body: &str) -> Vec<String> {
    let mut ingredients: Vec<String> = body
        .lines()
        .filter_map(|line| {
            line.trim()
                .strip_prefix("- ")
                .map(|rest| rest.trim().to_string())
        })
        .collect();

    if ingredients.is_empty() {
        ingredients = STAR_BULLET
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect();
    }

    ingredients
}
