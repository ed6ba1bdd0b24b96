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

//! Which commands an SLPF actuator accepts.
//!
//! These checks are consulted by actuators, not by the decoder: a command can
//! be well-formed OpenC2 and still be meaningless to a packet filter.

use tracing::debug;

use crate::engine_core::errors::{Openc2Error, Result};
use crate::language::{Action, Args, Command};

use super::types::SlpfArgs;
use super::{NSID, RULE_NUMBER_TARGET};

/// Action/target pairs of the profile, as reported by `query features`.
pub const PAIRS: &[(&str, &[&str])] = &[
    (
        "allow",
        &["ipv4_connection", "ipv6_connection", "ipv4_net", "ipv6_net"],
    ),
    (
        "deny",
        &["ipv4_connection", "ipv6_connection", "ipv4_net", "ipv6_net"],
    ),
    ("query", &["features"]),
    ("delete", &[RULE_NUMBER_TARGET]),
    ("update", &["file"]),
];

/// Check the action/target pair, then the arguments.
pub fn validate_command(command: &Command) -> Result<()> {
    let action = command.action.name();
    let target = command.target.get_name();
    let supported = PAIRS
        .iter()
        .any(|(a, targets)| *a == action && targets.contains(&target));
    if !supported {
        debug!(action, target_name = target, "Rejected action/target pair");
        return Err(Openc2Error::NotImplemented(format!(
            "{} {} is not supported by {}",
            action, target, NSID
        )));
    }
    validate_args(command)
}

/// Check that every argument present makes sense for the command's action.
pub fn validate_args(command: &Command) -> Result<()> {
    let Some(args) = &command.args else {
        return Ok(());
    };
    match args.nsid() {
        None => args
            .downcast_ref::<Args>()
            .map_or(Ok(()), Args::validate_window),
        Some(ns) if ns == NSID => match args.downcast_ref::<SlpfArgs>() {
            Some(slpf) => validate_slpf_args(&command.action, slpf),
            None => Err(Openc2Error::type_error("slpf arguments of an unexpected type")),
        },
        Some(other) => Err(Openc2Error::Validation(format!(
            "arguments of profile '{}' cannot be used with {}",
            other, NSID
        ))),
    }
}

fn validate_slpf_args(action: &Action, args: &SlpfArgs) -> Result<()> {
    args.base.validate_window()?;
    let allow_or_deny = *action == Action::ALLOW || *action == Action::DENY;
    let only_for = |field: &str, actions: &str| {
        Err(Openc2Error::Validation(format!(
            "'{}' is only valid for {}, not {}",
            field, actions, action
        )))
    };
    if args.insert_rule.is_some() && !allow_or_deny {
        return only_for("insert_rule", "allow/deny");
    }
    if args.drop_process.is_some() && *action != Action::DENY {
        return only_for("drop_process", "deny");
    }
    if args.persistent.is_some() && !allow_or_deny {
        return only_for("persistent", "allow/deny");
    }
    if args.direction.is_some() && !allow_or_deny {
        return only_for("direction", "allow/deny");
    }
    Ok(())
}
