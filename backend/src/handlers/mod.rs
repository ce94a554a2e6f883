//! HTTP handlers for the UNA Stock Management Platform

pub mod agents;
pub mod health;
pub mod realizations;
pub mod reports;
pub mod stock;
pub mod transfers;

pub use agents::*;
pub use health::*;
pub use realizations::*;
pub use reports::*;
pub use stock::*;
pub use transfers::*;
