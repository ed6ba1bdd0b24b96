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

//! The core OpenC2 language: vocabulary, Command, Response and Message.

pub mod actions;
pub mod args;
pub mod command;
pub mod features;
pub mod message;
pub mod response;
pub mod results;
pub mod targets;

pub use actions::{Action, ActionKind};
pub use args::{Args, ArgsExtension, ArgsMap, ResponseType, ResponseTypeKind};
pub use command::{Actuator, ActuatorKind, Command};
pub use features::{Feature, FeatureKind, Features};
pub use message::{Content, Message, MessageType};
pub use response::{Response, StatusCode, StatusCodeKind};
pub use results::{ActionTargets, Results, ResultsExtension, ResultsMap};
pub use targets::{
    Device, DomainName, EmailAddr, File, Hashes, Ipv4Connection, Ipv6Connection, L4Protocol,
    L4ProtocolKind, Process, Target, TargetEnum, TargetEnumKind, TargetKind, Uri,
};
