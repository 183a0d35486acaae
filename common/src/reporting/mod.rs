pub mod client;
pub mod types;

pub use types::{
    MapExtentItem, MapExtentValue, ParameterValue, ReportControl, ReportMetadata,
    ReportParameter, RunOptions, ScalarValue,
};

/// ArcGIS Online, used when a caller does not name a portal.
pub const DEFAULT_PORTAL_URL: &str = "https://www.arcgis.com";
