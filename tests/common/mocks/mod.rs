pub mod gated_gateway;

pub use gated_gateway::*;
