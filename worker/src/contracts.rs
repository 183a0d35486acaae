use serde::Serialize;

pub mod activities {
    pub const GET_REPORT_RUN_TOKEN: &str = "get_report_run_token";
    pub const GET_REPORT_METADATA: &str = "get_report_metadata";
    pub const RUN_REPORT: &str = "run_report";
}

pub const CATEGORY: &str = "Reporting Client";
pub const HELP_URL: &str = "https://developers.vertigisstudio.com/docs/reporting/sdk-js-overview";
pub const SUPPORTED_APPS: &[&str] = &["EXB", "GWV", "GVH", "WAB"];

/// Host-facing metadata for an activity. Descriptive only.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub help_url: &'static str,
    pub client_only: bool,
    pub supported_apps: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_name: Option<&'static str>,
}

pub fn descriptors() -> Vec<ActivityDescriptor> {
    vec![
        crate::activities::run_token::DESCRIPTOR,
        crate::activities::metadata::DESCRIPTOR,
        crate::activities::run_report::DESCRIPTOR,
    ]
}
