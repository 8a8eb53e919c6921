use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::shell::PageMeta;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parsing(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parsing(e) => write!(f, "TOML parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Parsing(value)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub gallery: GalleryConfig,
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(data)?;
        config.validate()?;

        Ok(config)
    }

    /// Every link must point somewhere, either inside the site or outside of it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let navbar = self.site.navbar.items.iter().map(|item| &item.link);
        let footer = self
            .site
            .footer
            .links
            .iter()
            .flat_map(|column| column.items.iter());

        for link in navbar.chain(footer) {
            match (&link.to, &link.href) {
                (Some(_), Some(_)) => {
                    return Err(ConfigError::Invalid(format!(
                        "link '{}' sets both `to` and `href`",
                        link.label
                    )));
                }
                (None, None) => {
                    return Err(ConfigError::Invalid(format!(
                        "link '{}' needs either `to` or `href`",
                        link.label
                    )));
                }
                _ => {}
            }
        }

        if self.gallery.path.trim_matches('/').is_empty() {
            return Err(ConfigError::Invalid("gallery path cannot be empty".into()));
        }

        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
    pub favicon: Option<String>,
    pub url: String,
    pub base_url: String,
    pub organization_name: Option<String>,
    pub project_name: Option<String>,
    /// Social card shown when the site is shared.
    pub image: Option<String>,
    pub i18n: I18nConfig,
    pub navbar: NavbarConfig,
    pub footer: FooterConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Morphyish".into(),
            tagline: "Code is meaningless".into(),
            favicon: Some("img/favicon.svg".into()),
            url: "https://morphyish.com".into(),
            base_url: "/".into(),
            organization_name: Some("Morphyish".into()),
            project_name: Some("morphyish".into()),
            image: None,
            i18n: I18nConfig::default(),
            navbar: NavbarConfig::default(),
            footer: FooterConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Prefix a site-relative path with the base URL.
    pub fn resolve_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Absolute URL of a site-relative path, used for canonical and social links.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.resolve_url(path))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct I18nConfig {
    pub default_locale: String,
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".into(),
            locales: vec!["en".into()],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct NavbarConfig {
    pub title: Option<String>,
    pub logo: Option<Logo>,
    pub items: Vec<NavbarItem>,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            title: Some("Morphyish".into()),
            logo: Some(Logo {
                alt: "My Site Logo".into(),
                src: "img/logo.svg".into(),
            }),
            items: vec![
                NavbarItem::internal("Blog", "/blog"),
                NavbarItem::internal("Code", "/docs/intro"),
                NavbarItem::internal("SVG", "/svg"),
            ],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Logo {
    pub alt: String,
    pub src: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NavPosition {
    #[default]
    Left,
    Right,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NavbarItem {
    #[serde(flatten)]
    pub link: Link,
    #[serde(default)]
    pub position: NavPosition,
}

impl NavbarItem {
    pub fn internal(label: &str, to: &str) -> Self {
        Self {
            link: Link::internal(label, to),
            position: NavPosition::Left,
        }
    }
}

/// A link either stays inside the site (`to`) or leaves it (`href`).
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Link {
    pub label: String,
    pub to: Option<String>,
    pub href: Option<String>,
}

impl Link {
    pub fn internal(label: &str, to: &str) -> Self {
        Self {
            label: label.into(),
            to: Some(to.into()),
            href: None,
        }
    }

    pub fn external(label: &str, href: &str) -> Self {
        Self {
            label: label.into(),
            to: None,
            href: Some(href.into()),
        }
    }

    pub fn is_external(&self) -> bool {
        self.href.is_some()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FooterStyle {
    #[default]
    Dark,
    Light,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct FooterConfig {
    pub style: FooterStyle,
    pub links: Vec<FooterColumn>,
    pub copyright: Option<String>,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            style: FooterStyle::Dark,
            links: vec![
                FooterColumn {
                    title: "Content".into(),
                    items: vec![
                        Link::internal("Blog", "/blog"),
                        Link::internal("Code", "/docs/intro"),
                        Link::internal("SVG", "/svg"),
                    ],
                },
                FooterColumn {
                    title: "Find me on".into(),
                    items: vec![
                        Link::external("GitHub", "https://github.com/Morphyish"),
                        Link::external(
                            "Stack Overflow",
                            "https://stackoverflow.com/users/11852431/morphyish",
                        ),
                        Link::external(
                            "Linked In",
                            "https://www.linkedin.com/in/sauques-thomas/",
                        ),
                    ],
                },
            ],
            copyright: Some(
                "Don't steal my stuff. Or do. It's all open source anyway.".into(),
            ),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct FooterColumn {
    pub title: String,
    #[serde(default)]
    pub items: Vec<Link>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct GalleryConfig {
    /// Output path of the gallery page, relative to the site root.
    pub path: String,
    pub page: PageMeta,
    pub exhibits: Vec<ExhibitConfig>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            path: "svg".into(),
            page: PageMeta::default(),
            exhibits: vec![
                ExhibitConfig::new("Solar System", "solar-system.svg"),
                ExhibitConfig::new("Boil and Bubbles", "boil-and-bubbles.svg"),
                ExhibitConfig::new("Loading Squares", "loading-squares.svg"),
            ],
        }
    }
}

/// An exhibit as written in the config file. `graphic` is relative to the asset directory.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ExhibitConfig {
    pub title: String,
    pub graphic: String,
}

impl ExhibitConfig {
    pub fn new(title: &str, graphic: &str) -> Self {
        Self {
            title: title.into(),
            graphic: graphic.into(),
        }
    }
}
