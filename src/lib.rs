mod cli;
pub use cli::cli;

mod configurations;
pub use configurations::SimulatorConfig;

pub mod gemini;

pub mod server;

pub mod simulation;
