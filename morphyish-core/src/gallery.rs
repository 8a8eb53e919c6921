use std::sync::Arc;

use crate::graphic::GraphicRef;
use crate::view::{Element, Node};

pub const GRAPHIC_CLASS: &str = "gallery__svg";
pub const LABEL_CLASS: &str = "gallery__label";
pub const CELL_CLASS: &str = "col--4";

/// One illustration on display.
#[derive(Debug, Clone)]
pub struct Exhibit {
    pub title: String,
    pub graphic: GraphicRef,
}

impl Exhibit {
    pub fn new<S: Into<String>>(title: S, graphic: GraphicRef) -> Self {
        Self {
            title: title.into(),
            graphic,
        }
    }
}

/// A grid of exhibits, three to a row. Breakpoints come from the stylesheet.
#[derive(Debug, Clone)]
pub struct GallerySection {
    exhibits: Arc<[Exhibit]>,
}

impl GallerySection {
    pub fn new(exhibits: Vec<Exhibit>) -> Self {
        Self {
            exhibits: exhibits.into(),
        }
    }

    pub fn exhibits(&self) -> &[Exhibit] {
        &self.exhibits
    }

    pub fn render(&self) -> Element {
        let row = Element::new("div")
            .class("row")
            .children(self.exhibits.iter().map(render_exhibit));

        Element::new("section")
            .class("gallery")
            .child(Element::new("div").class("container").child(row))
    }
}

fn render_exhibit(exhibit: &Exhibit) -> Element {
    let graphic = Element::new("div")
        .class("text--center")
        .child(exhibit.graphic.draw(GRAPHIC_CLASS, "img"));

    let caption = Element::new("div")
        .class("text--center padding-horiz--md")
        .child(
            Element::new("p")
                .class(LABEL_CLASS)
                .child(Node::text(exhibit.title.clone())),
        );

    Element::new("div")
        .class("col")
        .class(CELL_CLASS)
        .child(graphic)
        .child(caption)
}
