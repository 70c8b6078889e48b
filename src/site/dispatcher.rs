//! Site request dispatcher
//!
//! Decides whether a request is a page this site renders and, if so,
//! assembles its render context. Anything else is deferred to the
//! collaborator routes (passthrough files, static assets).

use chrono::Datelike;
use std::sync::Arc;

use super::context::{AmpSessionContext, RenderContext};
use super::schedule::Schedule;
use crate::amp::AmpCss;
use crate::config::{AmpConfig, SiteConfig};
use crate::error::StylesheetError;
use crate::routing::{self, SectionRegistry};

/// The only section that accepts a sub-path
pub const SCHEDULE_SECTION: &str = "schedule";

/// Request data the dispatcher needs
#[derive(Debug, Clone, Copy)]
pub struct SiteRequest<'a> {
    /// Path as received, after any prefix stripping upstream
    pub path: &'a str,
    /// Path the client originally requested, if known
    pub original_path: Option<&'a str>,
    /// `scheme://host` derived from the request
    pub origin: Option<&'a str>,
}

impl<'a> SiteRequest<'a> {
    /// Request served directly, with no fronting rewrite
    #[cfg(test)]
    pub const fn direct(path: &'a str) -> Self {
        Self {
            path,
            original_path: Some(path),
            origin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Rendered(Box<RenderContext>),
    /// Not a site page; let the next handler answer
    Deferred,
}

pub struct SiteDispatcher {
    sections: SectionRegistry,
    schedule: Arc<Schedule>,
    amp_css: AmpCss,
    site: SiteConfig,
    amp: AmpConfig,
}

impl SiteDispatcher {
    pub fn new(
        sections: SectionRegistry,
        schedule: Arc<Schedule>,
        amp_css: AmpCss,
        site: SiteConfig,
        amp: AmpConfig,
    ) -> Self {
        Self {
            sections,
            schedule,
            amp_css,
            site,
            amp,
        }
    }

    pub const fn sections(&self) -> &SectionRegistry {
        &self.sections
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Resolve a request to a render context or defer it
    ///
    /// Only stylesheet compilation can fail; unknown pages are `Deferred`.
    pub async fn dispatch(&self, req: &SiteRequest<'_>) -> Result<Dispatch, StylesheetError> {
        let Some(matched) = routing::match_section(req.path, &self.sections) else {
            return Ok(Dispatch::Deferred);
        };

        let mut ctx = self.base_context(req, matched.section);

        if let Some(rest) = matched.rest {
            if matched.section != SCHEDULE_SECTION {
                return Ok(Dispatch::Deferred);
            }
            // Undecodable ids cannot name a session
            let Ok(session_id) = urlencoding::decode(rest) else {
                return Ok(Dispatch::Deferred);
            };
            let Some(record) = self.schedule.session(&session_id) else {
                return Ok(Dispatch::Deferred);
            };

            let styles = self.amp_css.get().await?;
            ctx.amp = Some(AmpSessionContext {
                origin: self.origin(req),
                title: record.name.clone().unwrap_or_default(),
                time_label: record.time.clone().unwrap_or_default(),
                description: record.description.clone().unwrap_or_default(),
                session: record.payload(),
                styles: styles.to_string(),
            });
            ctx.layout.clone_from(&self.amp.layout);
            ctx.path.clone_from(&self.amp.template);
        }

        Ok(Dispatch::Rendered(Box::new(ctx)))
    }

    fn base_context(&self, req: &SiteRequest<'_>, section: &str) -> RenderContext {
        RenderContext {
            year: chrono::Local::now().year(),
            prod: self.site.environment.is_production(),
            base: routing::resolve_mount_path(req.original_path, req.path),
            layout: self.site.default_layout.clone(),
            path: section.to_string(),
            ga_id: self.site.ga_id.clone(),
            ua_id: self.site.ua_id.clone(),
            source_prefix: self.site.source_prefix.clone(),
            days: self.site.days.clone(),
            amp: None,
        }
    }

    fn origin(&self, req: &SiteRequest<'_>) -> String {
        self.site
            .origin
            .as_deref()
            .or(req.origin)
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string()
    }
}
