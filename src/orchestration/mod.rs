pub mod service;

pub use service::{LeagueService, OrchestrationError};
