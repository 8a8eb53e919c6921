use serde::{Deserialize, Serialize};

use crate::gallery::GallerySection;
use crate::view::{Element, Node};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    /// Banner heading
    pub heading: String,
    pub subtitle: String,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            title: "SVG".into(),
            description: "Svg are meaningless".into(),
            heading: "SVG".into(),
            subtitle: "A gallery of animated doodles".into(),
        }
    }
}

/// The gallery page: a hero banner followed by the gallery in `<main>`.
#[derive(Debug, Clone)]
pub struct PageShell {
    meta: PageMeta,
    gallery: GallerySection,
}

impl PageShell {
    pub fn new(meta: PageMeta, gallery: GallerySection) -> Self {
        Self { meta, gallery }
    }

    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn description(&self) -> &str {
        &self.meta.description
    }

    pub fn gallery(&self) -> &GallerySection {
        &self.gallery
    }

    pub fn render(&self) -> Vec<Element> {
        vec![self.render_header(), self.render_main()]
    }

    fn render_header(&self) -> Element {
        Element::new("header")
            .class("hero hero--primary hero-banner")
            .child(
                Element::new("div")
                    .class("container")
                    .child(
                        Element::new("h1")
                            .class("hero__title")
                            .child(Node::text(self.meta.heading.clone())),
                    )
                    .child(
                        Element::new("p")
                            .class("hero__subtitle")
                            .child(Node::text(self.meta.subtitle.clone())),
                    ),
            )
    }

    fn render_main(&self) -> Element {
        Element::new("main").child(self.gallery.render())
    }
}
