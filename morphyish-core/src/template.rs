use std::path::Path;

use tera::{Context, Tera};
use walkdir::WalkDir;

pub const LAYOUT_TEMPLATE: &str = "layout.html";
pub const STYLESHEET_NAME: &str = "site.css";

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (LAYOUT_TEMPLATE, include_str!("../theme/layout.html")),
    ("macros.html", include_str!("../theme/macros.html")),
];
const DEFAULT_STYLESHEET: &str = include_str!("../theme/site.css");

#[derive(Debug)]
pub enum TemplateError {
    TeraError(tera::Error),
    IoError(std::io::Error),
}

impl From<tera::Error> for TemplateError {
    fn from(err: tera::Error) -> Self {
        TemplateError::TeraError(err)
    }
}

impl From<std::io::Error> for TemplateError {
    fn from(err: std::io::Error) -> Self {
        TemplateError::IoError(err)
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::TeraError(e) => write!(f, "Template error: {}", e),
            TemplateError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Tera templates plus the stylesheet that goes with them.
pub struct TemplateRenderer {
    tera: Tera,
    stylesheet: String,
}

impl TemplateRenderer {
    /// The built-in theme.
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(DEFAULT_TEMPLATES.to_vec())?;

        Ok(Self {
            tera,
            stylesheet: DEFAULT_STYLESHEET.to_string(),
        })
    }

    /// The built-in theme with files from `theme_dir` replacing or adding
    /// templates of the same relative name. A missing directory is not an error.
    pub fn with_theme_dir(theme_dir: &Path) -> Result<Self, TemplateError> {
        let mut renderer = Self::new()?;
        if !theme_dir.is_dir() {
            return Ok(renderer);
        }

        let mut overrides = Vec::new();
        for entry in WalkDir::new(theme_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
        {
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(theme_dir) else {
                continue;
            };
            let name = relative.to_string_lossy().replace('\\', "/");

            if name == STYLESHEET_NAME {
                renderer.stylesheet = std::fs::read_to_string(path)?;
            } else if path.extension().map(|ext| ext == "html").unwrap_or(false) {
                tracing::debug!("Theme override: {}", name);
                overrides.push((name, std::fs::read_to_string(path)?));
            }
        }

        if !overrides.is_empty() {
            renderer.tera.add_raw_templates(overrides)?;
        }

        Ok(renderer)
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    pub fn render(&self, template: &str, context: &Context) -> Result<String, TemplateError> {
        Ok(self.tera.render(template, context)?)
    }

    /// Render a template and write it directly to a file
    pub fn render_to_file(
        &self,
        template: &str,
        context: &Context,
        output_path: &Path,
    ) -> Result<(), TemplateError> {
        let rendered = self.render(template, context)?;

        // Ensure parent directory exists
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(output_path, rendered)?;
        Ok(())
    }
}
