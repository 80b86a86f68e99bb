//! # Health Insight Extraction
//!
//! Scans a meal-plan narrative for lines carrying health-relevant keywords
//! and surfaces a bounded set of highlight strings for the rendering layer.
//! A document with no usable line yields a fixed default set, so callers
//! always receive a non-empty list.

use tracing::debug;

/// Domain keywords that mark a line as a health-relevance cue
const HEALTH_KEYWORDS: [&str; 13] = [
    "liver",
    "diabetes",
    "calcium",
    "fiber",
    "antioxidant",
    "omega",
    "protein",
    "vitamin",
    "mineral",
    "anti-inflammatory",
    "heart",
    "blood",
    "sugar",
];

/// Maximum number of insight lines surfaced to the caller
pub const MAX_INSIGHTS: usize = 4;

/// Lines at or below this length are too short to make a useful highlight
const MIN_INSIGHT_LINE_LEN: usize = 20;

/// Canonical insights returned when the document yields no keyword matches
pub const DEFAULT_INSIGHTS: [&str; 4] = [
    "Personalized nutrition based on your health profile",
    "Optimized for liver health and function",
    "Balanced macronutrients for your dietary needs",
    "Cultural preferences integrated into meal planning",
];

/// Extract up to [`MAX_INSIGHTS`] health highlight lines from a narrative.
///
/// The document is case-folded and scanned line by line in order; a line is
/// recorded (trimmed) at most once, at its first keyword match, when it is
/// longer than 20 characters. An empty scan degrades to [`DEFAULT_INSIGHTS`];
/// this function never fails.
///
/// # Examples
///
/// ```rust
/// use nutri_plan::insights::extract_health_insights;
///
/// let insights = extract_health_insights("This plan is rich in fiber and supports liver function.");
/// assert_eq!(insights.len(), 1);
/// ```
pub fn extract_health_insights(text: &str) -> Vec<String> {
    let insights = scan_keyword_lines(text);
    if insights.is_empty() {
        debug!("No keyword-bearing lines found, returning default insights");
        return default_insights();
    }
    insights
}

/// The fixed default list as owned strings
pub fn default_insights() -> Vec<String> {
    DEFAULT_INSIGHTS.iter().map(|s| s.to_string()).collect()
}

fn scan_keyword_lines(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut insights = Vec::new();

    for line in lowered.lines() {
        if line.len() <= MIN_INSIGHT_LINE_LEN {
            continue;
        }
        // `any` stops at the first matching keyword, so a line is recorded once.
        if HEALTH_KEYWORDS.iter().any(|keyword| line.contains(keyword)) {
            insights.push(line.trim().to_string());
            if insights.len() == MAX_INSIGHTS {
                break;
            }
        }
    }

    insights
}
