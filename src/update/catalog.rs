use std::fs;
use std::path::Path;

use log::info;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OntokitError, Result};

/// Id of the `group` container whose entries the generator owns outright.
pub const MANAGED_GROUP_ID: &str = "ontokit-managed-catalog";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>";

/// A bare element tree; the catalog schema carries no meaningful text
/// nodes, so only names, attributes and children are retained.
#[derive(Debug, Clone, PartialEq, Eq)]
struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn is_managed_group(&self) -> bool {
        self.name == "group" && self.attr("id") == Some(MANAGED_GROUP_ID)
    }

    /// Drop `xml:base=""` attributes, a stale placeholder some older
    /// generated catalogs carry, from this element and its descendants.
    fn strip_empty_base(&mut self) {
        self.attrs
            .retain(|(k, v)| !(k == "xml:base" && v.is_empty()));
        for child in &mut self.children {
            child.strip_empty_base();
        }
    }
}

fn parse_catalog(text: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(OntokitError::CatalogFormat {
                    message: format!("{e} at byte {}", reader.buffer_position()),
                });
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| OntokitError::CatalogFormat {
                    message: "unbalanced closing tag".to_string(),
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            // Declarations, comments, processing instructions and
            // whitespace between elements are not part of the schema.
            Ok(_) => {}
        }
    }

    let root = root.ok_or_else(|| OntokitError::CatalogFormat {
        message: "no root element".to_string(),
    })?;
    if root.name != "catalog" {
        return Err(OntokitError::CatalogFormat {
            message: format!("expected <catalog> root, found <{}>", root.name),
        });
    }
    Ok(root)
}

fn element_from_start(start: &quick_xml::events::BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| OntokitError::CatalogFormat {
            message: format!("bad attribute on <{name}>: {e}"),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| OntokitError::CatalogFormat {
                message: format!("bad attribute value on <{name}>: {e}"),
            })?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(XmlElement {
        name,
        attrs,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(OntokitError::CatalogFormat {
            message: "multiple root elements".to_string(),
        }),
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

fn write_element(out: &mut String, element: &XmlElement, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for child in &element.children {
        write_element(out, child, depth + 1);
    }
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}

fn serialize_catalog(root: &XmlElement) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push('\n');
    write_element(&mut out, root, 0);
    out
}

/// All (name, uri) pairs reachable from the fresh render, used to drop
/// now-redundant standalone entries from the old file.
fn uri_pairs(element: &XmlElement, pairs: &mut Vec<(String, String)>) {
    if element.name == "uri" {
        if let (Some(name), Some(uri)) = (element.attr("name"), element.attr("uri")) {
            pairs.push((name.to_string(), uri.to_string()));
        }
    }
    for child in &element.children {
        uri_pairs(child, pairs);
    }
}

/// Merge a freshly rendered catalog with a previously generated one.
///
/// The old managed group is discarded in favor of the fresh render; old
/// standalone `uri` entries duplicating a freshly rendered (name, uri)
/// pair are dropped as redundant; everything else is retained after the
/// managed group. Output indentation is fixed at two spaces.
pub fn merge_catalog(rendered: &str, existing: &str) -> Result<String> {
    let mut fresh = parse_catalog(rendered)?;
    let old = parse_catalog(existing)?;

    if !fresh.children.iter().any(|c| c.is_managed_group()) {
        return Err(OntokitError::CatalogFormat {
            message: format!("rendered catalog has no group id={MANAGED_GROUP_ID:?}"),
        });
    }

    let mut fresh_pairs = Vec::new();
    uri_pairs(&fresh, &mut fresh_pairs);

    for child in old.children {
        if child.is_managed_group() {
            continue;
        }
        if child.name == "uri" {
            if let (Some(name), Some(uri)) = (child.attr("name"), child.attr("uri")) {
                if fresh_pairs.contains(&(name.to_string(), uri.to_string())) {
                    continue;
                }
            }
        }
        fresh.children.push(child);
    }

    fresh.strip_empty_base();
    Ok(serialize_catalog(&fresh))
}

/// Write the merged catalog (or the fresh render for a new repository).
pub fn update_catalog(rendered: &str, target: &Path) -> Result<()> {
    let merged = match fs::read_to_string(target) {
        Ok(existing) => merge_catalog(rendered, &existing)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let mut fresh = parse_catalog(rendered)?;
            fresh.strip_empty_base();
            serialize_catalog(&fresh)
        }
        Err(e) => {
            return Err(OntokitError::io(format!("reading {}", target.display()), e));
        }
    };
    fs::write(target, merged)
        .map_err(|e| OntokitError::io(format!("writing {}", target.display()), e))?;
    info!("merged {}", target.display());
    Ok(())
}
