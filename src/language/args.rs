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

//! Command arguments and their profile extension point.

use crate::engine_core::errors::{Openc2Error, Result};
use crate::impl_map;
use crate::registry::{Register, Registry};
use crate::types::{
    DateTime, Duration, EnumKind, Enumerated, Extensible, ExtensionPoint, FieldReader,
    FieldWriter, MapSchema,
};

#[derive(Debug)]
pub struct ResponseTypeKind;

impl EnumKind for ResponseTypeKind {
    const NAME: &'static str = "ResponseType";
    const CORE: &'static [(&'static str, i64)] =
        &[("none", 0), ("ack", 1), ("status", 2), ("complete", 3)];
}

/// How much of a Response the Producer wants back.
pub type ResponseType = Enumerated<ResponseTypeKind>;

impl Enumerated<ResponseTypeKind> {
    pub const NONE: Self = Self::from_static("none", 0);
    pub const ACK: Self = Self::from_static("ack", 1);
    pub const STATUS: Self = Self::from_static("status", 2);
    pub const COMPLETE: Self = Self::from_static("complete", 3);
}

/// Base command arguments shared by every profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    pub start_time: Option<DateTime>,
    pub stop_time: Option<DateTime>,
    pub duration: Option<Duration>,
    pub response_requested: Option<ResponseType>,
}

impl Args {
    pub const FIELDS: &'static [&'static str] =
        &["start_time", "stop_time", "duration", "response_requested"];

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// At most two of start/stop/duration, and stop never before start.
    ///
    /// Not part of decoding: actuators call this when they accept a command.
    pub fn validate_window(&self) -> Result<()> {
        if let (Some(start), Some(stop)) = (self.start_time, self.stop_time) {
            if self.duration.is_some() {
                return Err(Openc2Error::Validation(
                    "start_time, stop_time and duration cannot all be set".to_string(),
                ));
            }
            if stop < start {
                return Err(Openc2Error::Validation(format!(
                    "stop_time {} precedes start_time {}",
                    stop.as_millis(),
                    start.as_millis()
                )));
            }
        }
        Ok(())
    }
}

impl MapSchema for Args {
    const TYPE_NAME: &'static str = "Args";
    const BASE_FIELDS: &'static [&'static str] = Args::FIELDS;

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        out.field("start_time", &self.start_time)?;
        out.field("stop_time", &self.stop_time)?;
        out.field("duration", &self.duration)?;
        out.field("response_requested", &self.response_requested)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            start_time: fields.optional("start_time")?,
            stop_time: fields.optional("stop_time")?,
            duration: fields.optional("duration")?,
            response_requested: fields.optional("response_requested")?,
        })
    }
}

impl_map!(Args);

/// Profile extensions of [`Args`].
#[derive(Debug)]
pub struct ArgsExtension;

impl ExtensionPoint for ArgsExtension {
    type Base = Args;
    const NAME: &'static str = "Args";

    fn register(registry: &Registry) -> &Register {
        registry.extended_arguments()
    }

    fn register_mut(registry: &mut Registry) -> &mut Register {
        registry.extended_arguments_mut()
    }
}

/// Arguments of a Command: the core [`Args`] or one profile's extension.
pub type ArgsMap = Extensible<ArgsExtension>;
