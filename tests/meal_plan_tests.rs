#[cfg(test)]
mod tests {
    use nutri_plan::meal_plan::{
        parse_meal_plan, FallbackDocument, Macronutrients, MealPlanExtraction,
    };

    const FULL_PLAN: &str = "### Breakfast (350 kcal)\nCarbs: 40g, Protein: 20g, Fat: 10g\n- Oats\n- Banana\n---\n### Lunch (500 kcal)\nCarbs: 60g, Protein: 30g, Fat: 15g\n- Grilled chicken\n- Rice\n";

    #[test]
    fn test_full_plan_sections_and_fields() {
        let result = parse_meal_plan(FULL_PLAN);
        let plan = result.as_plan().expect("expected a structured plan");

        let keys: Vec<&str> = plan.keys().collect();
        assert_eq!(keys, vec!["breakfast", "lunch"]);

        let breakfast = plan.get("breakfast").unwrap();
        assert_eq!(breakfast.name, "Breakfast");
        assert_eq!(breakfast.calories, 350);
        assert_eq!(
            breakfast.macronutrients,
            Macronutrients {
                carbs: 40,
                protein: 20,
                fat: 10
            }
        );
        assert_eq!(breakfast.ingredients, vec!["Oats", "Banana"]);

        let lunch = plan.get("lunch").unwrap();
        assert_eq!(lunch.name, "Lunch");
        assert_eq!(lunch.calories, 500);
        assert_eq!(
            lunch.macronutrients,
            Macronutrients {
                carbs: 60,
                protein: 30,
                fat: 15
            }
        );
        assert_eq!(lunch.ingredients, vec!["Grilled chicken", "Rice"]);
    }

    #[test]
    fn test_notes_keep_verbatim_section_body() {
        let result = parse_meal_plan(FULL_PLAN);
        let plan = result.as_plan().unwrap();

        let breakfast = plan.get("breakfast").unwrap();
        assert_eq!(
            breakfast.notes,
            "Carbs: 40g, Protein: 20g, Fat: 10g\n- Oats\n- Banana"
        );
    }

    #[test]
    fn test_short_input_returns_raw_fallback() {
        let result = parse_meal_plan("short");
        assert_eq!(
            result,
            MealPlanExtraction::Fallback(FallbackDocument {
                raw_text: "short".to_string()
            })
        );
    }

    #[test]
    fn test_empty_input_returns_raw_fallback() {
        let result = parse_meal_plan("");
        assert_eq!(
            result,
            MealPlanExtraction::Fallback(FallbackDocument {
                raw_text: String::new()
            })
        );
    }

    #[test]
    fn test_no_headings_returns_raw_fallback() {
        let text =
            "Eat a variety of vegetables and whole grains every day, and drink plenty of water.";
        assert!(text.len() >= 50);

        let result = parse_meal_plan(text);
        assert_eq!(
            result,
            MealPlanExtraction::Fallback(FallbackDocument {
                raw_text: text.to_string()
            })
        );
    }

    #[test]
    fn test_asterisk_bullets_as_ingredient_fallback() {
        let text =
            "Here is a light afternoon option to keep you going.\n### Snack\n* Apple\n* Almonds\n";
        assert!(text.len() >= 50);

        let result = parse_meal_plan(text);
        let plan = result.as_plan().unwrap();
        let snack = plan.get("snack").unwrap();
        assert_eq!(snack.ingredients, vec!["Apple", "Almonds"]);
    }

    #[test]
    fn test_dash_lines_take_precedence_over_asterisks() {
        let text = "A filling midday option with plenty of protein here.\n### Lunch\n- Rice\n* Beans\n";
        assert!(text.len() >= 50);

        let result = parse_meal_plan(text);
        let plan = result.as_plan().unwrap();
        assert_eq!(plan.get("lunch").unwrap().ingredients, vec!["Rice"]);
    }

    #[test]
    fn test_missing_calories_and_macros_default_to_zero() {
        let text = "A simple evening option rounds out the day nicely.\n### Dinner\n- Salmon\n- Greens\n";
        assert!(text.len() >= 50);

        let result = parse_meal_plan(text);
        let plan = result.as_plan().unwrap();
        let dinner = plan.get("dinner").unwrap();
        assert_eq!(dinner.calories, 0);
        assert_eq!(dinner.macronutrients, Macronutrients::default());
        assert_eq!(dinner.ingredients, vec!["Salmon", "Greens"]);
    }

    #[test]
    fn test_macro_line_allows_arbitrary_text_between_fields() {
        let text = "A hearty start to the morning with balanced numbers.\n### Breakfast\nCarbs: 40g with Protein: 20g and Fat: 10g\n";
        assert!(text.len() >= 50);

        let result = parse_meal_plan(text);
        let plan = result.as_plan().unwrap();
        assert_eq!(
            plan.get("breakfast").unwrap().macronutrients,
            Macronutrients {
                carbs: 40,
                protein: 20,
                fat: 10
            }
        );
    }

    #[test]
    fn test_section_body_stops_at_horizontal_rule() {
        let text = "### Breakfast (350 kcal)\n- Oats\n---\nSome closing remarks about hydration and rest.\n";
        assert!(text.len() >= 50);

        let result = parse_meal_plan(text);
        let plan = result.as_plan().unwrap();
        let breakfast = plan.get("breakfast").unwrap();
        assert_eq!(breakfast.notes, "- Oats");
        assert_eq!(breakfast.ingredients, vec!["Oats"]);
    }

    #[test]
    fn test_heading_with_empty_name_is_skipped() {
        // "### 123" captures only the space before the digits as the name;
        // the trimmed name is empty, so no entry is produced and parsing
        // carries on with the next heading.
        let text = "### 123\nUnnamed section body that is simply passed over.\n### Lunch (500 kcal)\n- Rice\n";
        assert!(text.len() >= 50);

        let result = parse_meal_plan(text);
        let plan = result.as_plan().unwrap();
        assert_eq!(plan.len(), 1);

        let lunch = plan.get("lunch").unwrap();
        assert_eq!(lunch.name, "Lunch");
        assert_eq!(lunch.calories, 500);
        assert_eq!(lunch.ingredients, vec!["Rice"]);
    }

    #[test]
    fn test_only_empty_name_headings_fall_back_to_raw_document() {
        let text = "### 123\nJust filler prose to clear the fifty character length gate.\n";
        assert!(text.len() >= 50);

        let result = parse_meal_plan(text);
        assert_eq!(
            result,
            MealPlanExtraction::Fallback(FallbackDocument {
                raw_text: text.to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_headings_replace_in_place() {
        let text = "### Snack (100 kcal)\n- Apple\n---\n### Snack (200 kcal)\n- Almonds\n";
        assert!(text.len() >= 50);

        let result = parse_meal_plan(text);
        let plan = result.as_plan().unwrap();
        assert_eq!(plan.len(), 1);

        let snack = plan.get("snack").unwrap();
        assert_eq!(snack.calories, 200);
        assert_eq!(snack.ingredients, vec!["Almonds"]);
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_meal_plan(FULL_PLAN), parse_meal_plan(FULL_PLAN));

        let degenerate = "nothing structured here, just a plain sentence about food and cooking.";
        assert_eq!(parse_meal_plan(degenerate), parse_meal_plan(degenerate));
    }

    #[test]
    fn test_plan_serializes_as_ordered_object() {
        let result = parse_meal_plan(FULL_PLAN);
        let json = serde_json::to_string(&result).unwrap();

        let breakfast_pos = json.find("\"breakfast\"").unwrap();
        let lunch_pos = json.find("\"lunch\"").unwrap();
        assert!(breakfast_pos < lunch_pos);
        assert!(json.contains("\"macronutrients\":{\"carbs\":40,\"protein\":20,\"fat\":10}"));
    }

    #[test]
    fn test_fallback_serializes_with_raw_text_field() {
        let result = parse_meal_plan("short");
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, "{\"rawText\":\"short\"}");
    }
}
