use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use std::collections::BTreeMap;

use super::error::SubscriptionError;
use super::types::SoapAction;

/// Minimal element tree. Names are local names: the service answers with
/// prefixed elements (`S:Envelope`, `ns2:getStatusResponse`) and the prefixes
/// carry no meaning for us.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn named(name: String) -> Self {
        Self { name, ..Default::default() }
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// One `return` element of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnValue {
    /// `<return>APPROVED</return>`
    Scalar(String),
    /// `<return><creatorID>7</creatorID>...</return>`, flattened to name -> text.
    Fields(BTreeMap<String, String>),
}

impl From<&XmlNode> for ReturnValue {
    fn from(node: &XmlNode) -> Self {
        if node.children.is_empty() {
            return ReturnValue::Scalar(node.text.clone());
        }
        let mut fields = BTreeMap::new();
        for child in &node.children {
            // repeated fields keep their first value
            fields.entry(child.name.clone()).or_insert_with(|| child.text.clone());
        }
        ReturnValue::Fields(fields)
    }
}

/// Decoded body of a successful response: the `return` elements under
/// `Envelope/Body/<action>Response`, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFields {
    pub action: SoapAction,
    pub returns: Vec<ReturnValue>,
}

impl ParsedFields {
    /// The single scalar `return` of status and command actions.
    pub fn single_scalar(&self) -> Result<&str, SubscriptionError> {
        match self.returns.as_slice() {
            [ReturnValue::Scalar(text)] => Ok(text),
            [] => Err(SubscriptionError::MissingElement(format!("{}/return", self.action.response_element()))),
            [_] => Err(SubscriptionError::UnexpectedValue(format!(
                "{} returned a structured value",
                self.action
            ))),
            _ => Err(SubscriptionError::UnexpectedValue(format!(
                "{} returned {} values",
                self.action,
                self.returns.len()
            ))),
        }
    }

    /// Field maps of list actions. A scalar `return` in a list is an error.
    pub fn records(&self) -> Result<Vec<&BTreeMap<String, String>>, SubscriptionError> {
        self.returns
            .iter()
            .map(|value| match value {
                ReturnValue::Fields(fields) => Ok(fields),
                ReturnValue::Scalar(text) => Err(SubscriptionError::UnexpectedValue(format!(
                    "expected record in {} response, got '{}'",
                    self.action, text
                ))),
            })
            .collect()
    }
}

/// Parse a whole XML document into a synthetic root whose children are the
/// top-level elements.
pub fn parse_document(xml: &str) -> Result<XmlNode, SubscriptionError> {
    let mut reader = XmlReader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut stack = vec![XmlNode::default()];

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                stack.push(XmlNode::named(local_name(start.local_name().as_ref())));
            }
            Ok(Event::Empty(empty)) => {
                let node = XmlNode::named(local_name(empty.local_name().as_ref()));
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| SubscriptionError::MalformedXml(e.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(data)) => {
                let data = data.into_inner();
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| SubscriptionError::MalformedXml("unbalanced end tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Err(SubscriptionError::MalformedXml("unbalanced end tag".to_string())),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SubscriptionError::MalformedXml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err(SubscriptionError::MalformedXml("unclosed element".to_string()));
    }
    let root = stack.pop().unwrap_or_default();
    if root.children.is_empty() {
        return Err(SubscriptionError::MalformedXml("empty document".to_string()));
    }
    Ok(root)
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Locate `Envelope/Body/<action>Response/return` in a response document.
pub fn parse_response(action: SoapAction, xml: &str) -> Result<ParsedFields, SubscriptionError> {
    let root = parse_document(xml)?;
    let envelope = root
        .child("Envelope")
        .ok_or_else(|| SubscriptionError::MissingElement("Envelope".to_string()))?;
    let body = envelope
        .child("Body")
        .ok_or_else(|| SubscriptionError::MissingElement("Envelope/Body".to_string()))?;

    if let Some(fault) = body.child("Fault") {
        let reason = fault
            .child("faultstring")
            .map(|n| n.text.clone())
            .unwrap_or_else(|| "unspecified fault".to_string());
        return Err(SubscriptionError::Fault(reason));
    }

    let response_name = action.response_element();
    let response = body
        .child(&response_name)
        .ok_or_else(|| SubscriptionError::MissingElement(format!("Envelope/Body/{}", response_name)))?;

    Ok(ParsedFields {
        action,
        returns: response.children_named("return").map(ReturnValue::from).collect(),
    })
}
