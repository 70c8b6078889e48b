//! Conference site pages
//!
//! Section pages and the AMP session page: deciding what to render
//! (`dispatcher`), with what data (`context`, `schedule`) and how
//! (`templates`).

mod context;
mod dispatcher;
mod schedule;
mod templates;

pub use context::{AmpSessionContext, RenderContext};
pub use dispatcher::{Dispatch, SiteDispatcher, SiteRequest, SCHEDULE_SECTION};
pub use schedule::{Schedule, SessionRecord};
pub use templates::SiteTemplates;
