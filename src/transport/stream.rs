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

//! Framed transport over any async byte stream pair (stdio, pipes, sockets).

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, Stdin, Stdout};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, warn};

use crate::encoder::Encoder;
use crate::engine_core::constants::message;
use crate::engine_core::errors::{Openc2Error, Result};
use crate::language::Message;
use crate::registry::Registry;

use super::codec::{Frame, Openc2Codec};
use super::{Dispatch, Transport};

fn transport_error(err: anyhow::Error) -> Openc2Error {
    Openc2Error::Transport(format!("{:#}", err))
}

pub struct StreamTransport<R, W> {
    reader: FramedRead<R, Openc2Codec>,
    writer: FramedWrite<W, Openc2Codec>,
}

impl StreamTransport<Stdin, Stdout> {
    pub fn stdio(max_message_size: u64) -> Self {
        Self::with_max_size(tokio::io::stdin(), tokio::io::stdout(), max_message_size)
    }
}

impl<R, W> StreamTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: FramedRead::new(reader, Openc2Codec::new()),
            writer: FramedWrite::new(writer, Openc2Codec::new()),
        }
    }

    pub fn with_max_size(reader: R, writer: W, max_message_size: u64) -> Self {
        Self {
            reader: FramedRead::new(reader, Openc2Codec::with_max_size(max_message_size)),
            writer: FramedWrite::new(writer, Openc2Codec::with_max_size(max_message_size)),
        }
    }

    /// Next frame, or `None` once the peer has closed the stream.
    pub async fn read_frame(&mut self) -> Result<Option<Frame>> {
        match self.reader.next().await {
            Some(frame) => frame.map(Some).map_err(transport_error),
            None => Ok(None),
        }
    }

    pub async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.writer.send(frame).await.map_err(transport_error)
    }

    async fn write_message(&mut self, msg: &Message, encoder: &dyn Encoder) -> Result<()> {
        let body = encoder.encode_message(msg)?;
        debug!(request_id = %msg.request_id, msg_type = %msg.msg_type, "Sending message");
        self.write_frame(&Frame::new(encoder.content_type(), body))
            .await
    }
}

fn check_content_type(frame: &Frame) -> Result<()> {
    match &frame.content_type {
        Some(ct) if !ct.starts_with(message::CONTENT_TYPE) => Err(Openc2Error::Validation(
            format!("unsupported content type '{}'", ct),
        )),
        _ => Ok(()),
    }
}

#[async_trait]
impl<R, W> Transport for StreamTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(
        &mut self,
        message: &Message,
        encoder: &dyn Encoder,
        registry: &Registry,
    ) -> Result<Message> {
        self.write_message(message, encoder).await?;
        let frame = self.read_frame().await?.ok_or_else(|| {
            Openc2Error::Transport("stream closed before a reply arrived".to_string())
        })?;
        check_content_type(&frame)?;
        encoder.decode_message(&frame.body, registry)
    }

    async fn receive(&mut self, dispatch: &dyn Dispatch, encoder: &dyn Encoder) -> Result<()> {
        while let Some(frame) = self.read_frame().await? {
            let decoded = check_content_type(&frame).and_then(|_| encoder.decode(&frame.body));
            let reply = match decoded {
                Ok(value) => dispatch.dispatch_value(&value).await,
                Err(err) => {
                    warn!(error = %err, "Rejected undecodable frame");
                    dispatch.reject(&err)
                }
            };
            self.write_message(&reply, encoder).await?;
        }
        debug!("Peer closed the stream");
        Ok(())
    }
}
