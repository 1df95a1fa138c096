pub mod blowdown;
pub mod grid;
pub mod integrator;
pub mod runner;

pub use blowdown::{BlowdownModel, BlowdownSample, BlowdownSeries, SampleStatus};
pub use grid::TimeGrid;
pub use integrator::{cumulative_trapezoid, trapezoid};
pub use runner::{run, BlowdownRun};
