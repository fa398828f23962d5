/// Payload of one tree node.
///
/// `Document` is the synthetic root; everything else mirrors what the HTML
/// parser produced. Only `Text` contributes to flattened text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Synthetic root above `<html>`.
    Document,
    /// `<!DOCTYPE name>` declaration.
    Doctype(String),
    /// `<!-- comment -->` contents.
    Comment(String),
    /// Raw text content, already entity-decoded by the parser.
    Text(String),
    /// An element with its tag and attributes.
    Element(ElementData),
}

impl NodeData {
    pub fn is_text(&self) -> bool {
        matches!(self, NodeData::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, NodeData::Element(_))
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Tag name plus attributes, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets or replaces an attribute, keeping first-seen order for existing names.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attr_replaces_in_place() {
        let mut el = ElementData::new("div").with_attr("id", "a").with_attr("class", "x");
        el.set_attr("id", "b");
        assert_eq!(el.attr("id"), Some("b"));
        let names: Vec<&str> = el.attrs().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["id", "class"]);
    }

    #[test]
    fn as_text_only_for_text_nodes() {
        assert_eq!(NodeData::Text("hi".into()).as_text(), Some("hi"));
        assert_eq!(NodeData::Comment("hi".into()).as_text(), None);
    }
}
