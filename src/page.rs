//! Mount point discovery in HTML pages
//!
//! Pages are parsed with `scraper`, so entities in attribute values are
//! decoded and markup inside comments or scripts never yields a mount
//! point. Rendering serializes the parsed document again: subtrees without
//! mount points go through the parser's own serializer, while each mount
//! element keeps its tag and attributes, gets its observability markers
//! rewritten and has its children replaced by the loaded content.
//!
//! Mount points nested inside another mount point's children are not
//! discovered; the outer mount owns them.

use crate::error::{PartialsError, PartialsResult};
use crate::loader::{MountPoint, RenderSource};
use scraper::{ElementRef, Html, Node, Selector};
use std::slice;

/// Attributes written back onto each mount element
pub mod markers {
    pub const LOADING: &str = "data-loading";
    pub const CACHE_APPLIED: &str = "data-cache-applied";
    pub const RENDER_SOURCE: &str = "data-render-source";
    pub const LOAD_ERROR: &str = "data-load-error";

    pub const ALL: [&str; 4] = [LOADING, CACHE_APPLIED, RENDER_SOURCE, LOAD_ERROR];
}

/// Elements whose text children are written without escaping
const RAW_TEXT_ELEMENTS: [&str; 8] = [
    "style",
    "script",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
    "noscript",
];

#[derive(Debug, Clone)]
struct Slot {
    fragment_id: String,
    children: String,
}

/// An HTML document with its mount points located
#[derive(Debug)]
pub struct Page {
    document: Html,
    marker: String,
    slots: Vec<Slot>,
}

impl Page {
    /// Parse `source` and locate the elements carrying `marker`
    pub fn parse(source: impl AsRef<str>, marker: &str) -> PartialsResult<Self> {
        // The parser lowercases attribute names
        let marker = marker.trim().to_ascii_lowercase();
        let selector = Selector::parse(&format!("[{}]", marker))
            .map_err(|_| PartialsError::InvalidMarker(marker.clone()))?;

        let document = Html::parse_document(source.as_ref());
        let slots = document
            .select(&selector)
            .filter(|element| !inside_mount(*element, &marker))
            .map(|element| Slot {
                fragment_id: element.value().attr(&marker).unwrap_or_default().to_string(),
                children: element.inner_html(),
            })
            .collect();

        Ok(Self {
            document,
            marker,
            slots,
        })
    }

    /// Fresh mount points, in document order, seeded with current children
    pub fn mount_points(&self) -> Vec<MountPoint> {
        self.slots
            .iter()
            .map(|slot| MountPoint::with_content(slot.fragment_id.clone(), slot.children.clone()))
            .collect()
    }

    pub fn fragment_ids(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.fragment_id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Write mount state back into the document
    ///
    /// `mounts` must be the mount points returned by [`Page::mount_points`],
    /// in the same order.
    pub fn render(&self, mounts: &[MountPoint]) -> PartialsResult<String> {
        if mounts.len() != self.slots.len() {
            return Err(PartialsError::MountMismatch {
                expected: self.slots.len(),
                actual: mounts.len(),
            });
        }

        let mut writer = Writer {
            out: String::new(),
            marker: &self.marker,
            mounts: mounts.iter(),
        };
        for node in self.document.tree.root().children() {
            writer.node(node.value(), ElementRef::wrap(node), false);
        }
        Ok(writer.out)
    }
}

fn is_mount(element: ElementRef<'_>, marker: &str) -> bool {
    element.value().attr(marker).is_some()
}

fn inside_mount(element: ElementRef<'_>, marker: &str) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_mount(ancestor, marker))
}

fn contains_mount(element: ElementRef<'_>, marker: &str) -> bool {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|descendant| is_mount(descendant, marker))
}

/// Serializer that walks down to the mount elements only
struct Writer<'a> {
    out: String,
    marker: &'a str,
    mounts: slice::Iter<'a, MountPoint>,
}

impl Writer<'_> {
    fn node(&mut self, value: &Node, element: Option<ElementRef<'_>>, raw_text: bool) {
        if let Some(element) = element {
            self.element(element);
            return;
        }

        match value {
            Node::Text(text) if raw_text => self.out.push_str(text),
            Node::Text(text) => escape_text(&mut self.out, text),
            Node::Comment(comment) => {
                self.out.push_str("<!--");
                self.out.push_str(comment);
                self.out.push_str("-->");
            }
            Node::Doctype(doctype) => {
                self.out.push_str("<!DOCTYPE ");
                self.out.push_str(doctype.name());
                self.out.push('>');
            }
            _ => {}
        }
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();

        if is_mount(element, self.marker) {
            match self.mounts.next() {
                Some(mount) => {
                    self.open_tag(element, Some(mount));
                    self.out.push_str(&mount.content);
                    self.close_tag(name);
                }
                None => self.out.push_str(&element.html()),
            }
            return;
        }

        if !contains_mount(element, self.marker) {
            self.out.push_str(&element.html());
            return;
        }

        self.open_tag(element, None);
        let raw_text = RAW_TEXT_ELEMENTS.contains(&name);
        for child in element.children() {
            self.node(child.value(), ElementRef::wrap(child), raw_text);
        }
        self.close_tag(name);
    }

    fn open_tag(&mut self, element: ElementRef<'_>, mount: Option<&MountPoint>) {
        self.out.push('<');
        self.out.push_str(element.value().name());

        for (name, value) in element.value().attrs() {
            if mount.is_some() && markers::ALL.contains(&name) {
                continue;
            }
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            escape_attribute(&mut self.out, value);
            self.out.push('"');
        }

        if let Some(mount) = mount {
            write_markers(&mut self.out, mount);
        }
        self.out.push('>');
    }

    fn close_tag(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }
}

fn write_markers(out: &mut String, mount: &MountPoint) {
    if mount.loading {
        out.push_str(&format!(" {}=\"true\"", markers::LOADING));
    }
    if mount.cache_applied {
        out.push_str(&format!(" {}=\"true\"", markers::CACHE_APPLIED));
    }
    if mount.render_source != RenderSource::None {
        out.push_str(&format!(
            " {}=\"{}\"",
            markers::RENDER_SOURCE,
            mount.render_source
        ));
    }
    if mount.load_error {
        out.push_str(&format!(" {}=\"true\"", markers::LOAD_ERROR));
    }
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
