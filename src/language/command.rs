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

//! The Command: action, target, optional arguments and actuator.

use crate::engine_core::errors::Result;
use crate::impl_record;
use crate::language::actions::Action;
use crate::language::args::ArgsMap;
use crate::language::targets::Target;
use crate::registry::{Register, Registry};
use crate::types::{Choice, ChoiceKind, FieldReader, FieldWriter, Openc2Type, Record};

#[derive(Debug)]
pub struct ActuatorKind;

impl ChoiceKind for ActuatorKind {
    const NAME: &'static str = "Actuator";

    fn register(registry: &Registry) -> &Register {
        registry.profiles()
    }

    fn register_mut(registry: &mut Registry) -> &mut Register {
        registry.profiles_mut()
    }
}

/// The profile (and its specifiers) a Command is addressed to.
pub type Actuator = Choice<ActuatorKind>;

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub action: Action,
    pub target: Target,
    pub args: Option<ArgsMap>,
    pub actuator: Option<Actuator>,
    pub command_id: Option<String>,
}

impl Command {
    /// Build a Command, wrapping a bare target value in its [`Target`] Choice.
    ///
    /// An already wrapped `Target` is accepted as is.
    pub fn new<T: Openc2Type>(action: Action, target: T, registry: &Registry) -> Result<Self> {
        Ok(Self {
            action,
            target: Target::new(target, registry)?,
            args: None,
            actuator: None,
            command_id: None,
        })
    }

    /// Attach arguments: core `Args` or a registered extension of it.
    pub fn with_args<A: Openc2Type>(mut self, args: A, registry: &Registry) -> Result<Self> {
        self.args = Some(ArgsMap::new(args, registry)?);
        Ok(self)
    }

    /// Address a profile by its actuator specifiers.
    pub fn with_actuator<S: Openc2Type>(mut self, specifiers: S, registry: &Registry) -> Result<Self> {
        self.actuator = Some(Actuator::new(specifiers, registry)?);
        Ok(self)
    }

    pub fn with_command_id(mut self, id: impl Into<String>) -> Self {
        self.command_id = Some(id.into());
        self
    }

    /// Namespace of the addressed actuator profile, if any.
    pub fn profile(&self) -> Option<&str> {
        self.actuator.as_ref().map(Actuator::get_name)
    }
}

impl Record for Command {
    const TYPE_NAME: &'static str = "Command";
    const FIELDS: &'static [&'static str] = &["action", "target", "args", "actuator", "command_id"];

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        out.required("action", &self.action)?;
        out.required("target", &self.target)?;
        out.field("args", &self.args)?;
        out.field("actuator", &self.actuator)?;
        out.field("command_id", &self.command_id)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            action: fields.required("action")?,
            target: fields.required("target")?,
            args: fields.optional("args")?,
            actuator: fields.optional("actuator")?,
            command_id: fields.optional("command_id")?,
        })
    }
}

impl_record!(Command);
