// Domain layer - View models and business rules, free of I/O
pub mod charts;
pub mod comparison;
pub mod dashboard;
pub mod filters;
pub mod insight;
pub mod kpi;
pub mod palette;
pub mod profile;
pub mod report;
pub mod role;
pub mod session;
pub mod upload;
