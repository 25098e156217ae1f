//! Typed `callTracer` call trees.
//!
//! The node returns a nested JSON object per transaction:
//!
//! ```text
//! { "from": "0x..", "to": "0x..", "calls": [ { "to": "0x..", "calls": [..] }, .. ] }
//! ```
//!
//! [`TraceNode::parse`] turns that into a [`TraceNode`] tree. The root must carry
//! a valid `to`; a malformed internal call is dropped together with its subtree.
//! A frame whose `calls` list was non-empty still counts as having internal
//! calls even when every entry was dropped.

use alloy::primitives::Address;
use serde_json::{Map, Value};

use crate::census::error::TraceShapeError;

/// One call frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceNode {
    /// Call target.
    pub target: Address,
    /// Caller. Only read at the root.
    pub sender: Option<Address>,
    /// Internal calls, in execution order.
    pub children: Vec<TraceNode>,
    /// The node reported a non-empty `calls` list, whether or not any entry
    /// survived decoding.
    pub has_calls: bool,
}

impl TraceNode {
    /// Decode a `callTracer` frame.
    pub fn parse(value: &Value) -> Result<Self, TraceShapeError> {
        let frame = value.as_object().ok_or(TraceShapeError::NotAnObject)?;

        let target = address_field(frame, "to")?.ok_or(TraceShapeError::MissingField("to"))?;
        let sender = address_field(frame, "from").ok().flatten();

        let (children, has_calls) = match frame.get("calls") {
            Some(Value::Array(calls)) => (parse_calls(calls), !calls.is_empty()),
            _ => (Vec::new(), false),
        };

        Ok(Self {
            target,
            sender,
            children,
            has_calls,
        })
    }

    /// Every frame below this one, depth first, in execution order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Targets that count as interactions for this transaction.
    ///
    /// A trace without internal calls yields its own target. Otherwise the
    /// root is skipped and every internal call at every depth yields its
    /// target once.
    pub fn call_targets(&self) -> Vec<Address> {
        if !self.has_calls {
            vec![self.target]
        } else {
            self.descendants().map(|node| node.target).collect()
        }
    }
}

/// Pre-order iterator over the frames below a [`TraceNode`].
pub struct Descendants<'a> {
    stack: Vec<&'a TraceNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TraceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

fn parse_calls(calls: &[Value]) -> Vec<TraceNode> {
    calls
        .iter()
        .filter_map(|call| match TraceNode::parse(call) {
            Ok(child) => Some(child),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed internal call");
                None
            }
        })
        .collect()
}

fn address_field(
    frame: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Address>, TraceShapeError> {
    match frame.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => raw
            .parse::<Address>()
            .map(Some)
            .map_err(|_| TraceShapeError::InvalidAddress {
                field,
                value: raw.clone(),
            }),
        Some(other) => Err(TraceShapeError::InvalidAddress {
            field,
            value: other.to_string(),
        }),
    }
}
