//! Render context handed to templates

use serde::Serialize;
use serde_json::Value;

use crate::config::CalendarDay;

/// Per-request template data
///
/// Serializes to a flat JSON object. `path` names the template to render
/// and `layout` the layout it is wrapped in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderContext {
    pub year: i32,
    pub prod: bool,
    /// Mount prefix, prepended to site-relative links
    pub base: String,
    pub layout: String,
    pub path: String,
    pub ga_id: String,
    pub ua_id: String,
    pub source_prefix: String,
    pub days: Vec<CalendarDay>,
    #[serde(flatten)]
    pub amp: Option<AmpSessionContext>,
}

/// Extra fields for the AMP session page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmpSessionContext {
    pub origin: String,
    pub title: String,
    pub time_label: String,
    pub description: String,
    pub session: Value,
    /// Inlined into `<style amp-custom>`
    pub styles: String,
}
