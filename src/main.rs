use anyhow::Result;
use nutri_plan::config::AppConfig;
use nutri_plan::generation::{GenerationClient, MealPlanRequest};
use nutri_plan::insights::extract_health_insights;
use nutri_plan::meal_plan::MealPlanParser;
use nutri_plan::store::{self, MemoryStore};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Read the narrative from the file given on the command line, if any
fn narrative_from_args() -> Result<Option<String>> {
    match env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("failed to read narrative file '{}': {}", path, e))?;
            Ok(Some(text))
        }
        None => Ok(None),
    }
}

/// Build the profile form from environment variables
fn profile_from_env() -> MealPlanRequest {
    MealPlanRequest {
        diabetes: env::var("PROFILE_DIABETES").unwrap_or_default(),
        lactose: env::var("PROFILE_LACTOSE").unwrap_or_default(),
        calcium: env::var("PROFILE_CALCIUM").unwrap_or_default(),
        ethnicity: env::var("PROFILE_ETHNICITY").unwrap_or_default(),
        special_requests: env::var("PROFILE_SPECIAL_REQUESTS").unwrap_or_default(),
        genomic_file: env::var("GENOMIC_FILE_PATH").unwrap_or_default().into(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    config.validate()?;
    info!("{}", config.summary());

    // Either parse a local file or fetch a fresh narrative from the
    // generation service using the profile form.
    let profile = profile_from_env();
    let narrative = match narrative_from_args()? {
        Some(text) => {
            info!(narrative_len = text.len(), "Using narrative from file");
            text
        }
        None => {
            let client = GenerationClient::new(config.generation.clone())?;
            client.generate(&profile).await?
        }
    };

    let parser = MealPlanParser::with_config(config.parser.clone())?;
    let extraction = parser.parse(&narrative);
    let insights = extract_health_insights(&narrative);

    let plan_store = MemoryStore::new();
    store::persist_extraction(&plan_store, &extraction, &insights, &narrative)?;
    store::persist_preferences(&plan_store, &profile)?;

    println!("{}", serde_json::to_string_pretty(&extraction)?);
    println!("{}", serde_json::to_string_pretty(&insights)?);

    Ok(())
}
