pub mod config;
pub mod initial;
pub mod scenario;

pub use config::{Configuration, ConfigurationBuilder};
pub use initial::InitialState;
pub use scenario::{presets, Scenario};
