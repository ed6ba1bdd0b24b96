// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! OpenC2 stream framing.
//!
//! Each message is a header block followed by an opaque body:
//!
//! ```text
//! Content-Length: 123\r\n
//! Content-Type: application/openc2+json;version=1.0\r\n
//! \r\n
//! {...}
//! ```
//!
//! The codec does not interpret the body; turning it into a Message is the
//! job of an [`Encoder`](crate::encoder::Encoder).

use crate::engine_core::constants::limits;
use anyhow::{anyhow, Context, Result};
use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

/// One framed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Frame {
    pub fn new(content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Head,
    Body(usize),
}

#[derive(Debug)]
pub struct Openc2Codec {
    state: DecodeState,
    content_type: Option<String>,
    max_message_size: u64,
}

impl Openc2Codec {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_size(limits::MAX_MESSAGE_SIZE_BYTES)
    }

    #[must_use]
    pub fn with_max_size(max_message_size: u64) -> Self {
        Self {
            state: DecodeState::Head,
            content_type: None,
            max_message_size,
        }
    }
}

impl Default for Openc2Codec {
    fn default() -> Self {
        Self::new()
    }
}

/// Index just past the blank line ending the header block, if complete.
fn header_end(src: &[u8]) -> Option<usize> {
    for i in 0..src.len() {
        if src[i] != b'\n' {
            continue;
        }
        if i >= 1 && src[i - 1] == b'\n' {
            return Some(i + 1);
        }
        if i >= 3 && &src[i - 3..i] == b"\r\n\r" {
            return Some(i + 1);
        }
    }
    None
}

impl Decoder for Openc2Codec {
    type Item = Frame;
    type Error = anyhow::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        trace!("Decoder attempting to read from {} bytes buffer", src.len());
        loop {
            match self.state {
                DecodeState::Head => {
                    let Some(end) = header_end(src) else {
                        if src.len() > limits::MAX_HEADER_BYTES {
                            return Err(anyhow!("Header too large"));
                        }
                        return Ok(None);
                    };

                    let header_bytes = src.split_to(end);
                    let header_str =
                        std::str::from_utf8(&header_bytes).context("Invalid UTF-8 in headers")?;

                    let mut len = None;
                    self.content_type = None;
                    for line in header_str.lines() {
                        let Some((name, value)) = line.split_once(':') else {
                            continue;
                        };
                        let value = value.trim();
                        if name.trim().eq_ignore_ascii_case("content-length") {
                            len = Some(
                                value
                                    .parse::<usize>()
                                    .context("Invalid content-length value")?,
                            );
                            debug!("Found Content-Length: {}", value);
                        } else if name.trim().eq_ignore_ascii_case("content-type") {
                            self.content_type = Some(value.to_string());
                        }
                    }

                    let len = match len {
                        Some(len) if len > 0 => len,
                        _ => return Err(anyhow!("Missing or invalid Content-Length header")),
                    };
                    if len as u64 > self.max_message_size {
                        return Err(anyhow!(
                            "Message length {} exceeds max limit of {} bytes",
                            len,
                            self.max_message_size
                        ));
                    }
                    self.state = DecodeState::Body(len);
                }
                DecodeState::Body(len) => {
                    if src.len() < len {
                        src.reserve(len - src.len());
                        return Ok(None);
                    }
                    let body = src.split_to(len).freeze();
                    self.state = DecodeState::Head;
                    trace!("Decoded frame of {} bytes", len);
                    return Ok(Some(Frame {
                        content_type: self.content_type.take(),
                        body,
                    }));
                }
            }
        }
    }
}

impl<'a> Encoder<&'a Frame> for Openc2Codec {
    type Error = anyhow::Error;

    fn encode(&mut self, item: &'a Frame, dst: &mut BytesMut) -> Result<()> {
        if item.body.len() as u64 > self.max_message_size {
            return Err(anyhow!(
                "Message length {} exceeds max limit of {} bytes",
                item.body.len(),
                self.max_message_size
            ));
        }
        let mut header = format!("Content-Length: {}\r\n", item.body.len());
        if let Some(content_type) = &item.content_type {
            header.push_str(&format!("Content-Type: {}\r\n", content_type));
        }
        header.push_str("\r\n");
        dst.reserve(header.len() + item.body.len());
        dst.extend_from_slice(header.as_bytes());
        dst.extend_from_slice(&item.body);
        Ok(())
    }
}
