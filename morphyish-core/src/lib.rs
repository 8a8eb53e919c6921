pub mod assets;
pub mod builder;
pub mod config;
pub mod gallery;
pub mod graphic;
pub mod shell;
pub mod template;
pub mod view;

// Re-export main types
pub use builder::{BuildPaths, NavItem, Site, SiteBuilder, SiteError, build_site};
pub use gallery::{Exhibit, GallerySection};
pub use graphic::{Graphic, GraphicRef, SvgGraphic};
pub use shell::{PageMeta, PageShell};
pub use template::{TemplateError, TemplateRenderer};
