use crate::{Attribute, CapabilityData, Value};

/// Borrowed view over encoded capability data in either of the supported
/// encodings.
#[derive(Debug, Clone, Copy)]
pub enum Tree<'a> {
    /// A JSON node, as found in request bodies.
    Json(&'a serde_json::Value),
    /// An attribute node, as found in persisted records.
    Attribute(&'a Attribute),
}

impl Tree<'_> {
    /// Whether the root node is object shaped.
    pub fn is_object(&self) -> bool {
        match self {
            Tree::Json(node) => node.is_object(),
            Tree::Attribute(attribute) => attribute.as_map().is_some(),
        }
    }

    /// Collect the scalar fields of an object-shaped tree. Fields holding any
    /// other shape are skipped. Returns `None` if the root is not an object.
    pub fn scalars(&self) -> Option<CapabilityData> {
        match self {
            Tree::Json(node) => {
                let fields = node.as_object()?;
                Some(
                    fields
                        .iter()
                        .filter_map(|(key, node)| Some((key.clone(), Value::from_json(node)?)))
                        .collect(),
                )
            }
            Tree::Attribute(attribute) => {
                let fields = attribute.as_map()?;
                Some(
                    fields
                        .iter()
                        .filter_map(|(key, attribute)| {
                            Some((key.clone(), Value::from_attribute(attribute)?))
                        })
                        .collect(),
                )
            }
        }
    }
}

impl<'a> From<&'a serde_json::Value> for Tree<'a> {
    fn from(node: &'a serde_json::Value) -> Self {
        Tree::Json(node)
    }
}

impl<'a> From<&'a Attribute> for Tree<'a> {
    fn from(attribute: &'a Attribute) -> Self {
        Tree::Attribute(attribute)
    }
}
