// jobscout Core - Domain, Ports, Site Adapters & Pipeline Stages
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{Result, ScoutError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
