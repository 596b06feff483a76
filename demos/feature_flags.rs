// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature flag example backed by an in-memory configuration store.
//!
//! This example demonstrates:
//! - Locating property sources for configured stores
//! - Loading features from `feature-management.` properties
//! - Custom and built-in feature filters
//! - Refreshing after a request once the store changes
//!
//! To run this example:
//! ```bash
//! cargo run --example feature_flags
//! ```

use azconfig::prelude::*;
use std::sync::{Arc, RwLock};
use std::time::Duration;

const BOOTSTRAP: &str = r#"
enabled: true
fail-fast: true
label: prod
stores:
  - endpoint: https://demo.azconfig.io
    connection-string: Endpoint=https://demo.azconfig.io;Id=demo;Secret=demo
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Feature Flags ===\n");

    let store = InMemoryConfigStore::from_items(vec![
        KeyValueItem::new("/application/greeting", "hello", "prod"),
        KeyValueItem::new("/application/feature-management.search", "true", "prod"),
        KeyValueItem::new("/application/feature-management.beta.ui", "false", "prod"),
        KeyValueItem::new(
            "/application/feature-management.checkout.enabled-for.0.name",
            "Microsoft.Percentage",
            "prod",
        ),
        KeyValueItem::new(
            "/application/feature-management.checkout.enabled-for.0.parameters.Value",
            "100",
            "prod",
        ),
        KeyValueItem::new(
            "/application/feature-management.admin.enabled-for.0.name",
            "Header",
            "prod",
        ),
        KeyValueItem::new("/application/greeting", "hi from dev", "dev"),
    ]);

    // Bootstrap the remote property sources
    let properties = AppConfigProperties::from_yaml_str(BOOTSTRAP)?;
    let locator = AppConfigPropertySourceLocator::from_properties(properties, store.factory())?;
    let service = DefaultConfigService::builder()
        .with_app_config(&locator)?
        .build()?;

    let greeting = service.get(&ConfigKey::from("greeting"))?;
    println!("greeting = {}", greeting.as_str());

    // Register filters and load features
    let filters = Arc::new(FilterRegistry::with_builtin_filters());
    filters.register("Header", |ctx: &FeatureFilterEvaluationContext| {
        ctx.parameter("Allow").and_then(|v| v.as_bool()).unwrap_or(false)
    });

    let features = Arc::new(FeatureManager::new(
        FeatureManagementProperties::default(),
        filters,
    ));
    features.load_from_service(&service)?;

    for name in ["search", "beta.ui", "checkout", "admin", "unknown"] {
        println!("{:>10}: {}", name, features.is_enabled(name)?);
    }

    // Flip a flag in the store and refresh after a "request"
    let service = Arc::new(RwLock::new(service));
    let refresh = Arc::new(
        FeatureRefresh::new(service, features.clone()).with_interval(Duration::from_secs(30)),
    );
    let listener = RefreshListener::new(refresh);

    store.insert(KeyValueItem::new(
        "/application/feature-management.beta.ui",
        "true",
        "prod",
    ));
    listener.on_request_handled();

    println!("\nAfter refresh:");
    println!("{:>10}: {}", "beta.ui", features.is_enabled("beta.ui")?);

    Ok(())
}
