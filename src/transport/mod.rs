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

//! Transports carry encoded Messages between Producer and Consumer.

pub mod codec;
pub mod stream;

pub use codec::{Frame, Openc2Codec};
pub use stream::StreamTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::encoder::Encoder;
use crate::engine_core::errors::{Openc2Error, Result};
use crate::language::{Message, Response};
use crate::registry::Registry;

/// Server-side handler of inbound requests.
#[async_trait]
pub trait Dispatch: Send + Sync {
    /// Handle one decoded-but-untyped request; always produces a reply.
    async fn dispatch_value(&self, value: &Value) -> Message;

    /// Reply to input that never reached the intermediate form.
    fn reject(&self, err: &Openc2Error) -> Message {
        Message::new(Response::from_error(err))
    }
}

#[async_trait]
pub trait Transport: Send {
    /// Producer role: deliver `message` and wait for its reply.
    async fn send(
        &mut self,
        message: &Message,
        encoder: &dyn Encoder,
        registry: &Registry,
    ) -> Result<Message>;

    /// Consumer role: feed every inbound request to `dispatch` until the peer closes.
    async fn receive(&mut self, dispatch: &dyn Dispatch, encoder: &dyn Encoder) -> Result<()>;
}
