//! Handlebars page rendering
//!
//! Section templates (including `_`-prefixed sub-templates) are registered
//! under their file stem, layouts as `layouts/<stem>`. A page is its
//! template rendered into the `body` of its layout.

use handlebars::Handlebars;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use super::context::RenderContext;
use crate::error::{PageError, SiteError};

pub struct SiteTemplates {
    registry: Handlebars<'static>,
    dev_mode: bool,
}

impl SiteTemplates {
    /// Register every `*.{extension}` file in both directories
    ///
    /// With `dev_mode` set, templates are re-read from disk on each render.
    pub fn load(
        sections_dir: &Path,
        layouts_dir: &Path,
        extension: &str,
        dev_mode: bool,
    ) -> Result<Self, SiteError> {
        let mut registry = Handlebars::new();
        registry.set_dev_mode(dev_mode);

        let extension = extension.trim_start_matches('.');
        register_dir(&mut registry, sections_dir, extension, "")?;
        register_dir(&mut registry, layouts_dir, extension, "layouts/")?;

        Ok(Self { registry, dev_mode })
    }

    #[cfg(test)]
    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    /// Render without blocking the connection task
    ///
    /// Dev mode re-reads template files on each render, so that render
    /// runs on the blocking pool. Registered templates render in place.
    pub async fn render_page(self: Arc<Self>, ctx: RenderContext) -> Result<String, PageError> {
        if !self.dev_mode {
            return self.render(&ctx);
        }
        tokio::task::spawn_blocking(move || self.render(&ctx))
            .await
            .map_err(|e| PageError::Aborted(e.to_string()))?
    }

    /// Render `ctx.path` wrapped in `layouts/<ctx.layout>`
    pub fn render(&self, ctx: &RenderContext) -> Result<String, PageError> {
        let body = self.registry.render(&ctx.path, ctx)?;

        let mut data = serde_json::to_value(ctx)?;
        if let Value::Object(map) = &mut data {
            map.insert("body".to_string(), Value::String(body));
        }

        Ok(self
            .registry
            .render(&format!("layouts/{}", ctx.layout), &data)?)
    }
}

fn register_dir(
    registry: &mut Handlebars<'static>,
    dir: &Path,
    extension: &str,
    prefix: &str,
) -> Result<(), SiteError> {
    let read_err = |source| SiteError::TemplateDir {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        registry.register_template_file(&format!("{prefix}{stem}"), &path)?;
    }
    Ok(())
}
