// Application state module
// Everything a request handler needs, built once at startup

use std::path::Path;
use std::sync::Arc;

use super::types::Config;
use crate::amp::{AmpCss, MemoryCssStore, ScssPreprocessor};
use crate::error::SiteError;
use crate::routing::SectionRegistry;
use crate::site::{Schedule, SiteDispatcher, SiteTemplates};

/// Application state
pub struct AppState {
    pub config: Config,
    pub dispatcher: SiteDispatcher,
    pub templates: Arc<SiteTemplates>,
}

impl AppState {
    /// Scan sections, load the schedule and templates, prepare the AMP cache
    ///
    /// Any failure here is fatal for the process.
    pub fn load(config: &Config) -> Result<Self, SiteError> {
        let site = &config.site;
        let production = site.environment.is_production();

        let sections =
            SectionRegistry::scan(Path::new(&site.sections_dir), &site.template_extension)?;
        let schedule = Schedule::load(Path::new(&site.schedule_file))?;
        let templates = SiteTemplates::load(
            Path::new(&site.sections_dir),
            Path::new(&site.layouts_dir),
            &site.template_extension,
            !production,
        )?;

        let amp_css = AmpCss::load(
            Path::new(&config.amp.compiled_stylesheet),
            config.amp.stylesheet_entry.clone().into(),
            production,
            Arc::new(MemoryCssStore::new()),
            Arc::new(ScssPreprocessor),
        );

        let dispatcher = SiteDispatcher::new(
            sections,
            Arc::new(schedule),
            amp_css,
            config.site.clone(),
            config.amp.clone(),
        );

        Ok(Self::new(config, dispatcher, templates))
    }

    pub fn new(config: &Config, dispatcher: SiteDispatcher, templates: SiteTemplates) -> Self {
        Self {
            config: config.clone(),
            dispatcher,
            templates: Arc::new(templates),
        }
    }
}
