pub mod concentration;
pub mod constraint;
pub mod engine;
pub mod flow;
pub mod kinetics;
pub mod station;
pub mod weather;
#[cfg(feature = "api")]
pub mod weather_api;
