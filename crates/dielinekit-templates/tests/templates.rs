#[path = "templates/builders.rs"]
mod builders;
#[path = "templates/preflight.rs"]
mod preflight;
#[path = "templates/properties.rs"]
mod properties;
#[path = "templates/scenarios.rs"]
mod scenarios;
