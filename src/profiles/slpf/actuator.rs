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

//! A packet filter that validates and records commands without touching the host.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use crate::consumer::Actuator;
use crate::engine_core::errors::Result;
use crate::language::{Action, Command, Response};
use crate::registry::Registry;

use super::types::{RuleId, SlpfArgs, SlpfResults};
use super::validate::{validate_command, PAIRS};
use super::NSID;

pub struct DryRunActuator {
    next_rule: AtomicU64,
}

impl DryRunActuator {
    pub fn new() -> Self {
        Self {
            next_rule: AtomicU64::new(1),
        }
    }

    fn rule_for(&self, command: &Command) -> RuleId {
        let requested = command
            .args
            .as_ref()
            .and_then(|args| args.downcast_ref::<SlpfArgs>())
            .and_then(|args| args.insert_rule);
        requested.unwrap_or_else(|| RuleId(self.next_rule.fetch_add(1, Ordering::Relaxed)))
    }
}

impl Default for DryRunActuator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Actuator for DryRunActuator {
    fn profile(&self) -> &str {
        NSID
    }

    fn pairs(&self) -> &[(&'static str, &'static [&'static str])] {
        PAIRS
    }

    async fn run(&self, command: &Command, registry: &Registry) -> Result<Response> {
        validate_command(command)?;
        let action = &command.action;
        let target = command.target.get_name();

        if *action == Action::ALLOW || *action == Action::DENY {
            let rule = self.rule_for(command);
            info!(%action, target_name = target, rule = rule.0, "Dry-run rule installed");
            let results = SlpfResults {
                rule_number: Some(rule),
                ..Default::default()
            };
            return Response::ok().with_results(results, registry);
        }

        info!(%action, target_name = target, "Dry-run command accepted");
        Ok(Response::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_core::errors::Openc2Error;
    use crate::language::{Args, File};
    use crate::types::Ipv4Net;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        super::super::register(&mut registry).unwrap();
        registry
    }

    #[tokio::test]
    async fn test_rule_numbers() {
        let registry = registry();
        let actuator = DryRunActuator::new();
        let net = Ipv4Net::new("10.0.0.0", 8).unwrap();

        let cmd = Command::new(Action::DENY, net, &registry).unwrap();
        let resp = actuator.run(&cmd, &registry).await.unwrap();
        let results = resp.results.unwrap();
        assert_eq!(
            results.downcast_ref::<SlpfResults>().unwrap().rule_number,
            Some(RuleId(1))
        );

        let args = SlpfArgs {
            insert_rule: Some(RuleId(42)),
            base: Args::default(),
            ..Default::default()
        };
        let cmd = Command::new(Action::ALLOW, net, &registry)
            .unwrap()
            .with_args(args, &registry)
            .unwrap();
        let resp = actuator.run(&cmd, &registry).await.unwrap();
        let results = resp.results.unwrap();
        assert_eq!(
            results.downcast_ref::<SlpfResults>().unwrap().rule_number,
            Some(RuleId(42))
        );
    }

    #[tokio::test]
    async fn test_unsupported_pair() {
        let registry = registry();
        let file = File {
            name: Some("a.bin".into()),
            ..Default::default()
        };
        let cmd = Command::new(Action::DENY, file, &registry).unwrap();
        assert!(matches!(
            DryRunActuator::new().run(&cmd, &registry).await,
            Err(Openc2Error::NotImplemented(_))
        ));
    }
}
