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

//! The dispatch boundary.
//!
//! A [`Consumer`] decodes inbound requests, hands each Command to the actuator
//! it addresses and always answers with a Response. Core errors never cross
//! this boundary: they become error Responses carrying the request id of the
//! message that caused them.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::engine_core::constants::message as wire;
use crate::engine_core::errors::{Openc2Error, Result};
use crate::language::{
    Action, ActionTargets, Command, Feature, Features, Message, Response, Results, TargetEnum,
};
use crate::registry::Registry;
use crate::transport::Dispatch;
use crate::types::{ArrayOf, Decode, MapOf, Nsid, Version};

/// Runtime executor bound to one profile.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Namespace id of the implemented profile.
    fn profile(&self) -> &str;

    /// Supported action/target pairs, by name.
    fn pairs(&self) -> &[(&'static str, &'static [&'static str])];

    async fn run(&self, command: &Command, registry: &Registry) -> Result<Response>;

    fn supports(&self, action: &str, target: &str) -> bool {
        self.pairs()
            .iter()
            .any(|(a, targets)| *a == action && targets.contains(&target))
    }
}

pub struct Consumer {
    registry: Arc<Registry>,
    actuators: Vec<Arc<dyn Actuator>>,
    consumer_id: String,
}

impl Consumer {
    pub fn new(registry: Arc<Registry>, consumer_id: impl Into<String>) -> Self {
        Self {
            registry,
            actuators: Vec::new(),
            consumer_id: consumer_id.into(),
        }
    }

    /// Attach an actuator. Its profile must be registered and not yet served.
    pub fn with_actuator(mut self, actuator: Arc<dyn Actuator>) -> Result<Self> {
        let profile = actuator.profile().to_string();
        if self.registry.profiles().get(&profile).is_none() {
            return Err(Openc2Error::registration(format!(
                "profile '{}' is not registered",
                profile
            )));
        }
        if self.actuators.iter().any(|a| a.profile() == profile) {
            return Err(Openc2Error::registration(format!(
                "profile '{}' already has an actuator",
                profile
            )));
        }
        info!(profile = %profile, "Actuator attached");
        self.actuators.push(actuator);
        Ok(self)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn consumer_id(&self) -> &str {
        &self.consumer_id
    }

    /// Answer one request Message.
    pub async fn dispatch(&self, request: Message) -> Message {
        debug!(request_id = %request.request_id, "Dispatching request");
        let response = match self.handle(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(request_id = %request.request_id, error = %err, "Command failed");
                Response::from_error(&err)
            }
        };
        request
            .response_to(response)
            .with_from(self.consumer_id.clone())
    }

    async fn handle(&self, request: &Message) -> Result<Response> {
        let command = request.command().ok_or_else(|| {
            Openc2Error::Validation(format!("expected a request, got a {}", request.msg_type))
        })?;

        if command.action == Action::QUERY && command.target.is::<Features>() {
            return self.query_features(command);
        }

        let actuator = self.select(command)?;
        actuator.run(command, &self.registry).await
    }

    fn select(&self, command: &Command) -> Result<&Arc<dyn Actuator>> {
        if let Some(profile) = command.profile() {
            return self
                .actuators
                .iter()
                .find(|a| a.profile() == profile)
                .ok_or_else(|| {
                    Openc2Error::NotImplemented(format!("no actuator for profile '{}'", profile))
                });
        }
        let action = command.action.name();
        let target = command.target.get_name();
        self.actuators
            .iter()
            .find(|a| a.supports(action, target))
            .or(match self.actuators.as_slice() {
                [only] => Some(only),
                _ => None,
            })
            .ok_or_else(|| {
                Openc2Error::NotImplemented(format!("{} {} is not supported", action, target))
            })
    }

    /// `query features` is answered by the consumer for all of its actuators.
    fn query_features(&self, command: &Command) -> Result<Response> {
        let features = command
            .target
            .downcast_ref::<Features>()
            .ok_or_else(|| Openc2Error::type_error("features target expected"))?;
        if features.is_empty() {
            return Ok(Response::ok());
        }

        let mut results = Results::default();
        for feature in features {
            if *feature == Feature::VERSIONS {
                results.versions = Some(ArrayOf::new(vec![Version::new(
                    wire::VERSION_MAJOR,
                    wire::VERSION_MINOR,
                )])?);
            } else if *feature == Feature::PROFILES {
                let profiles = self
                    .actuators
                    .iter()
                    .map(|a| Nsid::new(a.profile()))
                    .collect::<Result<Vec<_>>>()?;
                results.profiles = Some(ArrayOf::new(profiles)?);
            } else if *feature == Feature::PAIRS {
                results.pairs = Some(self.pairs()?);
            } else {
                debug!(feature = %feature, "Feature not reported");
            }
        }
        Response::ok().with_results(results, &self.registry)
    }

    fn pairs(&self) -> Result<MapOf<Action, ActionTargets>> {
        let mut merged: Vec<(Action, Vec<TargetEnum>)> = Vec::new();
        for actuator in &self.actuators {
            for (action, targets) in actuator.pairs() {
                let action = Action::from_name(action, &self.registry)?;
                let idx = match merged.iter().position(|(a, _)| *a == action) {
                    Some(idx) => idx,
                    None => {
                        merged.push((action, Vec::new()));
                        merged.len() - 1
                    }
                };
                for target in targets.iter() {
                    let target = TargetEnum::from_name(target, &self.registry)?;
                    if !merged[idx].1.contains(&target) {
                        merged[idx].1.push(target);
                    }
                }
            }
        }
        merged
            .into_iter()
            .map(|(action, targets)| Ok((action, ArrayOf::new(targets)?)))
            .collect()
    }
}

/// Best-effort header lookup on a message that failed to decode.
fn header_of<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(wire::KEY_HEADERS)?.get(key)?.as_str()
}

#[async_trait]
impl Dispatch for Consumer {
    async fn dispatch_value(&self, value: &Value) -> Message {
        match Message::decode(value, &self.registry) {
            Ok(request) => self.dispatch(request).await,
            Err(err) => {
                warn!(error = %err, "Rejected malformed message");
                let mut reply = self.reject(&err);
                if let Some(id) = header_of(value, "request_id") {
                    reply.request_id = id.to_string();
                }
                reply.to = header_of(value, "from").map(str::to_string).into_iter().collect();
                reply
            }
        }
    }

    fn reject(&self, err: &Openc2Error) -> Message {
        Message::new(Response::from_error(err)).with_from(self.consumer_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::StatusCode;
    use crate::profiles::slpf::{self, DryRunActuator};
    use serde_json::json;

    fn consumer() -> Consumer {
        let mut registry = Registry::new();
        slpf::register(&mut registry).unwrap();
        Consumer::new(registry.into_shared(), "fw1")
            .with_actuator(Arc::new(DryRunActuator::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let consumer = consumer();
        let wire = json!({
            "headers": {"request_id": "r-1", "from": "producer"},
            "body": {"openc2": {"request": {"action": "query", "target": {"features": []}}}}
        });
        let reply = consumer.dispatch_value(&wire).await;
        assert_eq!(reply.request_id, "r-1");
        assert_eq!(reply.from.as_deref(), Some("fw1"));
        assert_eq!(reply.to, vec!["producer".to_string()]);
        assert_eq!(reply.status, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_malformed_message_keeps_request_id() {
        let consumer = consumer();
        let wire = json!({
            "headers": {"request_id": "r-2"},
            "body": {"openc2": {"request": {"action": "query", "target": {}}}}
        });
        let reply = consumer.dispatch_value(&wire).await;
        assert_eq!(reply.request_id, "r-2");
        assert_eq!(reply.status, Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_duplicate_actuator() {
        let consumer = consumer();
        assert!(consumer
            .with_actuator(Arc::new(DryRunActuator::new()))
            .is_err());
    }

    #[test]
    fn test_unregistered_profile() {
        let consumer = Consumer::new(Registry::new().into_shared(), "fw1");
        assert!(matches!(
            consumer.with_actuator(Arc::new(DryRunActuator::new())),
            Err(Openc2Error::Registration(_))
        ));
    }
}
