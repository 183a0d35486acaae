pub mod context;
pub mod register;
pub mod temporal;

pub use context::{build_worker_context, build_worker_services};
pub use register::register_activities;
pub use temporal::build_temporal_worker;
