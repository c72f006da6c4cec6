//! Material property providers.

mod simple_gas;

pub use simple_gas::{GasProperties, GasSpecies, SimpleGasConfig, SimpleGasProperties};
