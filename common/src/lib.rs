pub mod reporting;
pub mod settings;

pub use reporting::client::ReportingClient;
pub use settings::Settings;
