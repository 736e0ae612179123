//! MIME-style header block framing.
//!
//! Every protocol exchange, the auth challenge included, is introduced by a
//! block of `Field: value` lines terminated by a single blank line. Reply
//! bodies, when present, follow the block and span exactly the number of
//! bytes named by the `Content-Length` field.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::EslError;

/// An ordered set of `Field: value` pairs from one header block.
///
/// Blocks are transient: one is read per exchange and discarded once the
/// interesting fields have been picked out.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    fields: Vec<(String, String)>,
}

impl HeaderBlock {
    /// Read one header block, consuming the terminating blank line.
    pub async fn read_from<R>(input: &mut R) -> Result<Self, EslError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut fields = Vec::new();
        loop {
            let mut line = String::new();
            if input.read_line(&mut line).await? == 0 {
                return Err(EslError::UnexpectedEof);
            }
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            if line.is_empty() {
                break;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| EslError::MalformedHeader(line.to_string()))?;
            fields.push((name.trim().to_string(), value.trim().to_string()));
        }
        Ok(Self { fields })
    }

    /// Look up a field by name, case-insensitively. First occurrence wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `Content-Type` field, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.get("Content-Type")
    }

    /// The `Content-Length` field as a byte count.
    ///
    /// A missing or unparseable field is an error, not an empty body: a reply
    /// that carries a body always names its exact length.
    pub fn content_length(&self) -> Result<usize, EslError> {
        let value = self
            .get("Content-Length")
            .ok_or(EslError::MissingContentLength)?;
        value
            .parse()
            .map_err(|cause| EslError::InvalidContentLength {
                value: value.to_string(),
                cause,
            })
    }

    /// Number of fields in the block.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the block carried no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
