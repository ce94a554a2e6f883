//! Business logic services for the UNA Stock Management Platform

pub mod agent;
pub mod realization;
pub mod reporting;
pub mod stock;
pub mod transfer;

pub use agent::AgentService;
pub use realization::RealizationService;
pub use reporting::ReportingService;
pub use stock::StockService;
pub use transfer::TransferService;
