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

//! Stateless Packet Filtering (SLPF) profile.

pub mod actuator;
pub mod types;
pub mod validate;

pub use actuator::DryRunActuator;
pub use types::{
    Direction, DirectionKind, DropProcess, DropProcessKind, RuleId, SlpfArgs, SlpfResults,
    Specifiers,
};
pub use validate::{validate_args, validate_command, PAIRS};

use tracing::info;

use crate::engine_core::errors::Result;
use crate::registry::Registry;

/// Namespace identifier of the profile.
pub const NSID: &str = "slpf";
/// Profile identifier in the actuator register.
pub const PROFILE_ID: i64 = 1024;
/// Effective name of the rule number target.
pub const RULE_NUMBER_TARGET: &str = "slpf:rule_number";

/// Add the SLPF target, actuator and argument/result extensions to `registry`.
pub fn register(registry: &mut Registry) -> Result<()> {
    registry.add_target::<RuleId>("rule_number", 1024, Some(NSID))?;
    registry.add_profile::<Specifiers>(NSID, PROFILE_ID)?;
    registry.add_args_extension::<SlpfArgs>(NSID)?;
    registry.add_results_extension::<SlpfResults>(NSID)?;
    info!(nsid = NSID, "SLPF profile loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_core::errors::Openc2Error;

    #[test]
    fn test_register_twice_fails() {
        let mut registry = Registry::new();
        register(&mut registry).unwrap();
        assert!(matches!(
            register(&mut registry),
            Err(Openc2Error::Registration(_))
        ));
        assert_eq!(registry.extended_arguments().len(), 1);
    }

    #[test]
    fn test_registers_every_axis() {
        let mut registry = Registry::new();
        register(&mut registry).unwrap();
        assert!(registry.targets().get(RULE_NUMBER_TARGET).is_some());
        assert!(registry.profiles().get(NSID).is_some());
        assert!(registry.extended_arguments().get(NSID).is_some());
        assert!(registry.extended_results().get(NSID).is_some());
    }
}
