//! Key/value persistence for parsed meal-plan results
//!
//! The extraction core hands its derived views to a caller-owned store under
//! fixed keys; a rendering layer reads them back later. The store treats
//! values as opaque serialized strings and knows nothing about their shape.
//!
//! ## Usage Examples
//!
//! ```rust
//! use nutri_plan::store::{keys, MemoryStore, Store};
//!
//! let store = MemoryStore::new();
//! store.insert(keys::RAW_RESPONSE, "### Breakfast\n- Oats".to_string());
//! assert!(store.get(keys::RAW_RESPONSE).is_some());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::debug;

use crate::errors::AppResult;
use crate::meal_plan::MealPlanExtraction;

/// Fixed keys the extraction pipeline writes under
pub mod keys {
    /// Structured meal plan or raw fallback, serialized as JSON
    pub const MEAL_PLAN: &str = "generatedMealPlan";
    /// Health insight list, serialized as JSON
    pub const HEALTH_INSIGHTS: &str = "healthInsights";
    /// Unmodified narrative as returned by the generation service
    pub const RAW_RESPONSE: &str = "aiResponse";
    /// Profile the plan was generated for, serialized as JSON
    pub const USER_PREFERENCES: &str = "userPreferences";
}

/// Store statistics
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// Total number of entries
    pub entries: usize,
    /// Number of hits
    pub hits: u64,
    /// Number of misses
    pub misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

/// Opaque key/value store the extraction pipeline writes to
pub trait Store {
    /// Get a value from the store
    fn get(&self, key: &str) -> Option<String>;

    /// Insert a value, replacing any previous value under the key
    fn insert(&self, key: &str, value: String);

    /// Remove a value from the store
    fn remove(&self, key: &str) -> Option<String>;

    /// Get store statistics
    fn stats(&self) -> StoreStats;

    /// Clear all entries
    fn clear(&self);
}

/// Thread-safe in-memory store implementation
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, String>>>,
    stats: Arc<RwLock<StoreStats>>,
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(StoreStats::default())),
        }
    }

    /// Get store size
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.data.read().unwrap().is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut stats = self.stats.write().unwrap();
        let data = self.data.read().unwrap();

        match data.get(key) {
            Some(value) => {
                stats.hits += 1;
                Some(value.clone())
            }
            None => {
                stats.misses += 1;
                None
            }
        }
    }

    fn insert(&self, key: &str, value: String) {
        self.data.write().unwrap().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<String> {
        self.data.write().unwrap().remove(key)
    }

    fn stats(&self) -> StoreStats {
        let mut stats = self.stats.read().unwrap().clone();
        stats.entries = self.data.read().unwrap().len();

        let total_requests = stats.hits + stats.misses;
        if total_requests > 0 {
            stats.hit_rate = stats.hits as f64 / total_requests as f64;
        }

        stats
    }

    fn clear(&self) {
        self.data.write().unwrap().clear();
        *self.stats.write().unwrap() = StoreStats::default();
    }
}

/// Persist both derived views plus the raw narrative under the fixed keys.
///
/// Values are serialized to JSON before insertion; the raw narrative is
/// stored verbatim.
pub fn persist_extraction(
    store: &dyn Store,
    extraction: &MealPlanExtraction,
    insights: &[String],
    raw_response: &str,
) -> AppResult<()> {
    let plan_json = serde_json::to_string(extraction)?;
    let insights_json = serde_json::to_string(insights)?;

    store.insert(keys::MEAL_PLAN, plan_json);
    store.insert(keys::HEALTH_INSIGHTS, insights_json);
    store.insert(keys::RAW_RESPONSE, raw_response.to_string());

    debug!(
        insight_count = insights.len(),
        fallback = extraction.is_fallback(),
        "Persisted extraction results"
    );
    Ok(())
}

/// Persist the user profile the plan was generated for
pub fn persist_preferences<P: Serialize>(store: &dyn Store, preferences: &P) -> AppResult<()> {
    let json = serde_json::to_string(preferences)?;
    store.insert(keys::USER_PREFERENCES, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal_plan::parse_meal_plan;

    #[test]
    fn test_memory_store_basic_operations() {
        let store = MemoryStore::new();

        store.insert("key1", "value1".to_string());
        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.get("key2"), None);

        let stats = store.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_memory_store_insert_replaces() {
        let store = MemoryStore::new();

        store.insert("key1", "first".to_string());
        store.insert("key1", "second".to_string());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key1"), Some("second".to_string()));
    }

    #[test]
    fn test_memory_store_remove_and_clear() {
        let store = MemoryStore::new();

        store.insert("key1", "value1".to_string());
        store.insert("key2", "value2".to_string());

        assert_eq!(store.remove("key1"), Some("value1".to_string()));
        assert_eq!(store.remove("key1"), None);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_persist_extraction_writes_fixed_keys() {
        let store = MemoryStore::new();
        let raw = "short";
        let extraction = parse_meal_plan(raw);
        let insights = vec!["balanced macronutrients for your dietary needs".to_string()];

        persist_extraction(&store, &extraction, &insights, raw).unwrap();

        assert_eq!(
            store.get(keys::MEAL_PLAN),
            Some("{\"rawText\":\"short\"}".to_string())
        );
        assert_eq!(store.get(keys::RAW_RESPONSE), Some("short".to_string()));
        let stored_insights = store.get(keys::HEALTH_INSIGHTS).unwrap();
        assert!(stored_insights.contains("balanced macronutrients"));
    }
}
