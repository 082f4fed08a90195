//! Loading and rendering of the grid page template.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use gridserve_core::{Error, PageData, Result};

use crate::view::PageView;

const TEMPLATE_NAME: &str = "grid.html";

/// A parsed page template, ready to render.
#[derive(Debug)]
pub struct GridTemplate {
    path: PathBuf,
    env: Environment<'static>,
}

impl GridTemplate {
    /// Reads and parses the template at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateLoad`] if the file cannot be read and
    /// [`Error::TemplateParse`] if it is not a valid template.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::TemplateLoad {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_source(path, source)
    }

    /// Parses template source already in memory. `path` is only used in
    /// diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateParse`] if the source is not a valid template.
    pub fn from_source(path: impl Into<PathBuf>, source: impl Into<String>) -> Result<Self> {
        let path = path.into();

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template_owned(TEMPLATE_NAME, source.into())
            .map_err(|e| Error::TemplateParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { path, env })
    }

    /// Path the template was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the page into a complete HTML document.
    ///
    /// The whole document is produced before anything is returned, so a
    /// failure never leaves a partial page behind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if template execution fails.
    pub fn render(&self, page: &PageData) -> Result<String> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| Error::render(e.to_string()))?;
        template
            .render(PageView::from(page))
            .map_err(|e| Error::render(e.to_string()))
    }
}

/// Where the handler obtains its template.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// Read and parse the file on every request.
    File(PathBuf),
    /// Parsed once at startup and shared.
    Preloaded(Arc<GridTemplate>),
}

impl TemplateSource {
    /// Returns a template ready to render.
    ///
    /// # Errors
    ///
    /// Propagates load and parse failures for [`TemplateSource::File`].
    pub async fn resolve(&self) -> Result<Arc<GridTemplate>> {
        match self {
            Self::File(path) => GridTemplate::load(path).await.map(Arc::new),
            Self::Preloaded(template) => Ok(Arc::clone(template)),
        }
    }

    /// Path of the underlying template file.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) => path.as_path(),
            Self::Preloaded(template) => template.path(),
        }
    }
}
