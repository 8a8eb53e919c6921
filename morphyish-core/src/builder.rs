use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::Context;

use crate::assets::{AssetLoader, copy_static_files};
use crate::config::{Config, FooterStyle, GalleryConfig, Link, NavPosition, SiteConfig};
use crate::gallery::GallerySection;
use crate::graphic::AssetError;
use crate::shell::PageShell;
use crate::template::{LAYOUT_TEMPLATE, STYLESHEET_NAME, TemplateError, TemplateRenderer};
use crate::view::render_fragment;

#[derive(Debug)]
pub enum BuildError {
    TemplateError(TemplateError),
    AssetError(AssetError),
}

impl From<TemplateError> for BuildError {
    fn from(err: TemplateError) -> Self {
        BuildError::TemplateError(err)
    }
}

impl From<AssetError> for BuildError {
    fn from(err: AssetError) -> Self {
        BuildError::AssetError(err)
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::TemplateError(e) => write!(f, "Template error: {}", e),
            BuildError::AssetError(e) => write!(f, "Asset error: {}", e),
        }
    }
}

impl std::error::Error for BuildError {}

#[derive(Debug)]
pub enum RenderError {
    TemplateError(TemplateError),
    IoError(std::io::Error),
}

impl From<TemplateError> for RenderError {
    fn from(err: TemplateError) -> Self {
        RenderError::TemplateError(err)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::IoError(err)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::TemplateError(e) => write!(f, "Template error: {}", e),
            RenderError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {}

/// A link as the layout sees it: resolved URL, no `to`/`href` split.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub url: String,
    pub external: bool,
}

impl NavItem {
    fn resolve(link: &Link, site: &SiteConfig) -> Self {
        let url = match (&link.href, &link.to) {
            (Some(href), _) => href.clone(),
            (None, Some(to)) => site.resolve_url(to),
            (None, None) => site.resolve_url(""),
        };

        Self {
            label: link.label.clone(),
            url,
            external: link.is_external(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FooterColumnView {
    title: String,
    items: Vec<NavItem>,
}

#[derive(Debug, Serialize)]
struct PageView<'a> {
    title: &'a str,
    description: &'a str,
    canonical_url: String,
}

pub struct SiteBuilder {
    output_dir: PathBuf,
    asset_dir: PathBuf,
    static_dir: PathBuf,
    theme_dir: Option<PathBuf>,
    site: SiteConfig,
    gallery: GalleryConfig,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from("./build"),
            asset_dir: PathBuf::from("./src/svg"),
            static_dir: PathBuf::from("./static"),
            theme_dir: None,
            site: SiteConfig::default(),
            gallery: GalleryConfig::default(),
        }
    }

    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Where exhibit graphics are looked up.
    pub fn asset_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.asset_dir = path.as_ref().to_path_buf();
        self
    }

    /// Files copied as-is to the output root.
    pub fn static_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.static_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn theme_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.theme_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn site_config(mut self, config: SiteConfig) -> Self {
        self.site = config;
        self
    }

    pub fn gallery_config(mut self, config: GalleryConfig) -> Self {
        self.gallery = config;
        self
    }

    pub fn build(self) -> Result<Site, BuildError> {
        let renderer = match &self.theme_dir {
            Some(dir) => TemplateRenderer::with_theme_dir(dir)?,
            None => TemplateRenderer::new()?,
        };

        let mut loader = AssetLoader::new(&self.asset_dir);
        let exhibits = loader.exhibits(&self.gallery.exhibits)?;
        let shell = PageShell::new(self.gallery.page, GallerySection::new(exhibits));

        Ok(Site {
            site: self.site,
            gallery_path: self.gallery.path.trim_matches('/').to_string(),
            shell,
            renderer,
            output_dir: self.output_dir,
            static_dir: self.static_dir,
        })
    }
}

pub struct Site {
    site: SiteConfig,
    gallery_path: String,
    shell: PageShell,
    renderer: TemplateRenderer,
    output_dir: PathBuf,
    static_dir: PathBuf,
}

impl Site {
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output file of the gallery page, relative to the output directory.
    pub fn gallery_out_path(&self) -> PathBuf {
        PathBuf::from(&self.gallery_path).join("index.html")
    }

    fn layout_context(&self) -> Context {
        let mut context = Context::new();
        let site = &self.site;

        let (left, right): (Vec<_>, Vec<_>) = site
            .navbar
            .items
            .iter()
            .partition(|item| item.position == NavPosition::Left);
        let resolve_all = |items: Vec<&crate::config::NavbarItem>| -> Vec<NavItem> {
            items
                .into_iter()
                .map(|item| NavItem::resolve(&item.link, site))
                .collect()
        };

        let footer_columns: Vec<FooterColumnView> = site
            .footer
            .links
            .iter()
            .map(|column| FooterColumnView {
                title: column.title.clone(),
                items: column
                    .items
                    .iter()
                    .map(|link| NavItem::resolve(link, site))
                    .collect(),
            })
            .collect();

        let footer_style = match site.footer.style {
            FooterStyle::Dark => "dark",
            FooterStyle::Light => "light",
        };

        let logo = site.navbar.logo.as_ref().map(|logo| crate::config::Logo {
            alt: logo.alt.clone(),
            src: site.resolve_url(&logo.src),
        });

        context.insert("site", site);
        context.insert("lang", &site.i18n.default_locale);
        context.insert("home", &site.resolve_url(""));
        context.insert("stylesheet", &site.resolve_url(&format!("css/{}", STYLESHEET_NAME)));
        context.insert("favicon", &site.favicon.as_ref().map(|f| site.resolve_url(f)));
        context.insert("social_card", &site.image.as_ref().map(|i| site.absolute_url(i)));
        context.insert("logo", &logo);
        context.insert("navbar_left", &resolve_all(left));
        context.insert("navbar_right", &resolve_all(right));
        context.insert("footer_columns", &footer_columns);
        context.insert("footer_style", footer_style);

        context
    }

    fn gallery_context(&self) -> Context {
        let mut context = self.layout_context();

        let page = PageView {
            title: self.shell.title(),
            description: self.shell.description(),
            canonical_url: self.site.absolute_url(&self.gallery_path),
        };
        context.insert("page", &page);
        context.insert("content", &render_fragment(&self.shell.render()));

        context
    }

    /// The complete gallery document.
    pub fn render_gallery_page(&self) -> Result<String, RenderError> {
        Ok(self.renderer.render(LAYOUT_TEMPLATE, &self.gallery_context())?)
    }

    pub fn render_all(&self) -> Result<(), RenderError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let page_path = self.output_dir.join(self.gallery_out_path());
        self.renderer
            .render_to_file(LAYOUT_TEMPLATE, &self.gallery_context(), &page_path)?;
        tracing::info!(
            "Rendered {} with {} exhibits",
            page_path.display(),
            self.shell.gallery().exhibits().len()
        );

        let css_path = self.output_dir.join("css").join(STYLESHEET_NAME);
        if let Some(parent) = css_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&css_path, self.renderer.stylesheet())?;

        let copied = copy_static_files(&self.static_dir, &self.output_dir)?;
        tracing::info!("Copied {} static files", copied);

        Ok(())
    }
}

/// Paths a build reads from and writes to.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub asset_dir: PathBuf,
    pub static_dir: PathBuf,
    pub theme_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug)]
pub enum SiteError {
    Build(BuildError),
    Render(RenderError),
}

impl From<BuildError> for SiteError {
    fn from(err: BuildError) -> Self {
        SiteError::Build(err)
    }
}

impl From<RenderError> for SiteError {
    fn from(err: RenderError) -> Self {
        SiteError::Render(err)
    }
}

impl std::fmt::Display for SiteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteError::Build(e) => write!(f, "Build error: {}", e),
            SiteError::Render(e) => write!(f, "Render error: {}", e),
        }
    }
}

impl std::error::Error for SiteError {}

/// Shared by the `build` and `serve` commands.
pub fn build_site(config: &Config, paths: &BuildPaths) -> Result<Site, SiteError> {
    let site = SiteBuilder::new()
        .site_config(config.site.clone())
        .gallery_config(config.gallery.clone())
        .asset_dir(&paths.asset_dir)
        .static_dir(&paths.static_dir)
        .theme_dir(&paths.theme_dir)
        .output_dir(&paths.output_dir)
        .build()?;

    site.render_all()?;

    Ok(site)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExhibitConfig, NavbarItem};
    use tempfile::{TempDir, tempdir};

    fn workspace() -> (TempDir, BuildPaths) {
        let temp = tempdir().unwrap();
        let paths = BuildPaths {
            asset_dir: temp.path().join("src/svg"),
            static_dir: temp.path().join("static"),
            theme_dir: temp.path().join("theme"),
            output_dir: temp.path().join("build"),
        };

        std::fs::create_dir_all(&paths.asset_dir).unwrap();
        for name in ["solar-system", "boil-and-bubbles", "loading-squares"] {
            std::fs::write(
                paths.asset_dir.join(format!("{name}.svg")),
                format!("<svg id=\"{name}\"></svg>"),
            )
            .unwrap();
        }

        (temp, paths)
    }

    #[test]
    fn builds_default_gallery_page() {
        let (_temp, paths) = workspace();
        build_site(&Config::default(), &paths).unwrap();

        let html = std::fs::read_to_string(paths.output_dir.join("svg/index.html")).unwrap();
        assert!(html.contains("<title>SVG | Morphyish</title>"));
        assert!(html.contains("content=\"Svg are meaningless\""));
        assert!(html.contains("<h1 class=\"hero__title\">SVG</h1>"));

        let solar = html.find("id=\"solar-system\"").unwrap();
        let bubbles = html.find("id=\"boil-and-bubbles\"").unwrap();
        let squares = html.find("id=\"loading-squares\"").unwrap();
        assert!(solar < bubbles && bubbles < squares);
        assert!(html.contains("<svg role=\"img\" class=\"gallery__svg\" id=\"solar-system\">"));

        assert!(paths.output_dir.join("css/site.css").exists());
    }

    #[test]
    fn renders_navbar_and_footer_links() {
        let (_temp, paths) = workspace();
        let site = SiteBuilder::new()
            .asset_dir(&paths.asset_dir)
            .output_dir(&paths.output_dir)
            .build()
            .unwrap();

        let html = site.render_gallery_page().unwrap();
        // Tera escapes slashes inside attribute values
        assert!(html.contains(
            "<a class=\"navbar__item navbar__link\" href=\"&#x2F;blog\">Blog</a>"
        ));
        assert!(html.contains("href=\"&#x2F;docs&#x2F;intro\">Code</a>"));
        assert!(html.contains(concat!(
            "href=\"https:&#x2F;&#x2F;github.com&#x2F;Morphyish\" ",
            "target=\"_blank\" rel=\"noopener noreferrer\">GitHub</a>"
        )));
        assert!(html.contains("footer--dark"));
        assert!(html.contains("Don&#x27;t steal my stuff."));
        assert!(html.contains("<img class=\"navbar__logo\" src=\"&#x2F;img&#x2F;logo.svg\""));
    }

    #[test]
    fn base_url_prefixes_internal_links() {
        let (_temp, paths) = workspace();
        let mut site_config = SiteConfig {
            base_url: "/morphyish/".into(),
            ..SiteConfig::default()
        };
        site_config.navbar.items.push(NavbarItem {
            link: Link::internal("About", "/about"),
            position: NavPosition::Right,
        });

        let site = SiteBuilder::new()
            .site_config(site_config)
            .asset_dir(&paths.asset_dir)
            .build()
            .unwrap();
        let context = site.layout_context().into_json();

        assert_eq!(context["navbar_left"][0]["url"], "/morphyish/blog");
        assert_eq!(context["navbar_right"][0]["url"], "/morphyish/about");
        assert_eq!(context["stylesheet"], "/morphyish/css/site.css");
    }

    #[test]
    fn empty_gallery_still_renders_page() {
        let (_temp, paths) = workspace();
        let gallery = GalleryConfig {
            exhibits: Vec::new(),
            ..GalleryConfig::default()
        };

        let site = SiteBuilder::new()
            .gallery_config(gallery)
            .asset_dir(&paths.asset_dir)
            .output_dir(&paths.output_dir)
            .build()
            .unwrap();
        site.render_all().unwrap();

        let html = std::fs::read_to_string(paths.output_dir.join("svg/index.html")).unwrap();
        assert!(html.contains("<section class=\"gallery\">"));
        assert!(!html.contains("col--4"));
    }

    #[test]
    fn custom_gallery_path() {
        let (_temp, paths) = workspace();
        let gallery = GalleryConfig {
            path: "/doodles/".into(),
            exhibits: vec![ExhibitConfig::new("Sun", "solar-system.svg")],
            ..GalleryConfig::default()
        };

        let site = SiteBuilder::new()
            .gallery_config(gallery)
            .asset_dir(&paths.asset_dir)
            .output_dir(&paths.output_dir)
            .build()
            .unwrap();
        site.render_all().unwrap();

        assert!(paths.output_dir.join("doodles/index.html").exists());
    }

    #[test]
    fn missing_graphic_fails_the_build() {
        let (_temp, paths) = workspace();
        let gallery = GalleryConfig {
            exhibits: vec![ExhibitConfig::new("Ghost", "ghost.svg")],
            ..GalleryConfig::default()
        };

        let result = SiteBuilder::new()
            .gallery_config(gallery)
            .asset_dir(&paths.asset_dir)
            .build();
        assert!(matches!(result, Err(BuildError::AssetError(_))));
    }

    #[test]
    fn copies_static_files_and_theme_stylesheet() {
        let (_temp, paths) = workspace();
        std::fs::create_dir_all(paths.static_dir.join("img")).unwrap();
        std::fs::write(paths.static_dir.join("img/logo.svg"), "<svg/>").unwrap();
        std::fs::create_dir_all(&paths.theme_dir).unwrap();
        std::fs::write(paths.theme_dir.join("site.css"), "/* custom */").unwrap();

        build_site(&Config::default(), &paths).unwrap();

        assert!(paths.output_dir.join("img/logo.svg").exists());
        assert_eq!(
            std::fs::read_to_string(paths.output_dir.join("css/site.css")).unwrap(),
            "/* custom */"
        );
    }

    /// Values of `src` attributes and of `href` on `<link>` tags.
    fn asset_urls(html: &str) -> Vec<String> {
        let mut urls = Vec::new();
        for (pos, _) in html.match_indices("src=\"").chain(html.match_indices("href=\"")) {
            let tag_start = html[..pos].rfind('<').unwrap();
            let is_link = html[tag_start..].starts_with("<link");
            if html[pos..].starts_with("href") && !is_link {
                continue;
            }
            let value = html[pos..].split('"').nth(1).unwrap();
            urls.push(html_escape::decode_html_entities(value).into_owned());
        }
        urls
    }

    #[test]
    fn every_local_asset_link_resolves() {
        let (_temp, mut paths) = workspace();
        paths.static_dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../static"));
        let site = build_site(&Config::default(), &paths).unwrap();

        let html = std::fs::read_to_string(paths.output_dir.join("svg/index.html")).unwrap();
        let urls = asset_urls(&html);
        assert!(urls.contains(&"/img/favicon.svg".to_string()));
        assert!(urls.contains(&"/css/site.css".to_string()));
        assert!(!html.contains("og:image"));

        for url in urls.iter().filter(|url| url.starts_with('/')) {
            let file = site.output_dir().join(url.trim_start_matches('/'));
            assert!(file.is_file(), "{} is not in the build output", url);
        }
    }

    #[test]
    fn rebuilding_produces_identical_output() {
        let (_temp, paths) = workspace();
        let first = build_site(&Config::default(), &paths)
            .unwrap()
            .render_gallery_page()
            .unwrap();
        let second = build_site(&Config::default(), &paths)
            .unwrap()
            .render_gallery_page()
            .unwrap();
        assert_eq!(first, second);
    }
}
