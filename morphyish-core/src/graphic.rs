use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::view::Node;

/// Something the gallery can draw. The gallery only hands over presentation
/// attributes, the content belongs to whoever materialized the graphic.
pub trait Graphic: Send + Sync + fmt::Debug {
    fn draw(&self, class: &str, role: &str) -> Node;
}

pub type GraphicRef = Arc<dyn Graphic>;

#[derive(Debug)]
pub enum AssetError {
    Io(PathBuf, std::io::Error),
    Xml(PathBuf, quick_xml::Error),
    MissingRoot(PathBuf),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(path, e) => write!(f, "Failed to read {}: {}", path.display(), e),
            AssetError::Xml(path, e) => write!(f, "Invalid SVG in {}: {}", path.display(), e),
            AssetError::MissingRoot(path) => {
                write!(f, "No <svg> root element in {}", path.display())
            }
        }
    }
}

impl std::error::Error for AssetError {}

/// The opening tag of the document's `<svg>` element.
#[derive(Debug, Clone)]
struct RootTag {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
}

/// An SVG document inlined into the page.
#[derive(Debug, Clone)]
pub struct SvgGraphic {
    /// Everything from the root tag on
    markup: String,
    root: Option<RootTag>,
    /// Markup following the root's opening tag
    body: String,
}

impl SvgGraphic {
    /// Markup without an `<svg>` root is kept and drawn verbatim.
    pub fn from_markup(markup: &str) -> Result<Self, quick_xml::Error> {
        Ok(match parse_root(markup)? {
            Some((start, end, root)) => Self {
                markup: markup[start..].trim_end().to_string(),
                root: Some(root),
                body: markup[end..].trim_end().to_string(),
            },
            None => Self {
                markup: markup.to_string(),
                root: None,
                body: String::new(),
            },
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| AssetError::Io(path.to_path_buf(), e))?;

        let graphic =
            Self::from_markup(&data).map_err(|e| AssetError::Xml(path.to_path_buf(), e))?;
        if graphic.root.is_none() {
            return Err(AssetError::MissingRoot(path.to_path_buf()));
        }

        Ok(graphic)
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl Graphic for SvgGraphic {
    fn draw(&self, class: &str, role: &str) -> Node {
        let Some(root) = &self.root else {
            return Node::raw(self.markup.clone());
        };

        let mut attributes = root.attributes.clone();
        match attributes.iter_mut().find(|(key, _)| key == "class") {
            Some((_, existing)) => *existing = format!("{} {}", class, existing),
            None => attributes.insert(0, ("class".into(), class.into())),
        }
        if !attributes.iter().any(|(key, _)| key == "role") {
            attributes.insert(0, ("role".into(), role.into()));
        }

        let mut tag = BytesStart::new(root.name.as_str());
        for (key, value) in &attributes {
            tag.push_attribute((key.as_str(), value.as_str()));
        }

        let mut markup = String::with_capacity(self.markup.len() + class.len() + role.len());
        markup.push('<');
        markup.push_str(&String::from_utf8_lossy(&tag));
        markup.push_str(if root.self_closing { "/>" } else { ">" });
        markup.push_str(&self.body);
        Node::raw(markup)
    }
}

/// Find the document's root element, skipping the prolog, doctype and comments.
/// Returns the byte range of the root's opening tag if that root is an `<svg>`.
fn parse_root(markup: &str) -> Result<Option<(usize, usize, RootTag)>, quick_xml::Error> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    loop {
        let start = reader.buffer_position() as usize;
        let (element, self_closing) = match reader.read_event()? {
            Event::Start(e) => (e, false),
            Event::Empty(e) => (e, true),
            Event::Eof => return Ok(None),
            _ => continue,
        };

        if element.local_name().as_ref() != b"svg" {
            return Ok(None);
        }

        let end = reader.buffer_position() as usize;
        let root = RootTag {
            name: String::from_utf8_lossy(element.name().as_ref()).into_owned(),
            attributes: decode_attributes(&element)?,
            self_closing,
        };
        return Ok(Some((start, end, root)));
    }
}

fn decode_attributes(element: &BytesStart) -> Result<Vec<(String, String)>, quick_xml::Error> {
    let mut attributes = Vec::new();
    for attr in element.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            Cow::into_owned,
        );
        attributes.push((key, value));
    }
    Ok(attributes)
}
