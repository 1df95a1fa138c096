pub mod error;
pub mod physics;
pub mod system;
pub mod sim;
pub mod io;

pub use error::{Error, Result};
pub use physics::{GasProperties, NozzleProfile};
pub use sim::{cumulative_trapezoid, run, trapezoid, BlowdownModel, BlowdownRun, TimeGrid};
pub use system::{Configuration, ConfigurationBuilder, Scenario};
