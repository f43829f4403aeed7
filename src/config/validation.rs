use super::schema::Config;

fn check_score(errors: &mut Vec<String>, field: &str, value: f64) {
    if !(0.0..=100.0).contains(&value) {
        errors.push(format!("{}: must be between 0 and 100, got {}", field, value));
    }
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(min) = config.min_score {
        check_score(&mut errors, "min_score", min);
    }

    for (i, input) in config.inputs.iter().enumerate() {
        if input.trim().is_empty() {
            errors.push(format!("inputs[{}]: must not be empty", i));
        } else if let Err(e) = glob::Pattern::new(input) {
            errors.push(format!("inputs[{}]: invalid pattern '{}' - {}", i, input, e));
        }
    }

    check_score(&mut errors, "deals.min_score", config.deals.min_score);
    if config.deals.max_price.is_nan() || config.deals.max_price <= 0.0 {
        errors.push("deals.max_price: must be positive".to_string());
    }
    if config.deals.limit == 0 {
        errors.push("deals.limit: must be at least 1".to_string());
    }

    if let Err(e) = humantime::parse_duration(&config.recent.window) {
        errors.push(format!(
            "recent.window: invalid duration '{}' - {}",
            config.recent.window, e
        ));
    }
    check_score(&mut errors, "recent.min_score", config.recent.min_score);
    if config.recent.limit == 0 {
        errors.push("recent.limit: must be at least 1".to_string());
    }

    if let Some(ref level) = config.log_level {
        if let Err(e) = tracing_subscriber::EnvFilter::try_new(level) {
            errors.push(format!("log_level: invalid filter '{}' - {}", level, e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
