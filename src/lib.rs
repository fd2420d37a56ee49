//! Monte Carlo estimate of the mean annual hurricane loss across Florida and
//! the Gulf states.
//!
//! Each simulated year draws a Poisson landfall count per region and a
//! LogNormal severity per landfall; the result is the mean of the yearly
//! totals. Several interchangeable strategies compute the same quantity with
//! different loop shapes (see [`strategy::Strategy`]).

pub mod config;
pub mod error;
pub mod region;
pub mod registry;
pub mod simulator;
pub mod strategy;
pub mod timing;
pub mod types;
pub mod validation;
pub mod variates;

pub use config::{LossInputs, TimingConfig};
pub use error::{Result, SimulationError};
pub use simulator::{RunOutcome, Simulator, run, run_timed, run_with};
