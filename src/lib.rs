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

//! openc2: the OpenC2 command and control language.
//!
//! Typed Commands, Responses and Messages built from a small set of generic
//! data types, an explicit [`Registry`](registry::Registry) through which
//! profiles add targets, actuators and extension fields, and a framed
//! transport with a consumer dispatch loop.

pub mod config;
pub mod consumer;
pub mod encoder;
pub mod engine_core;
pub mod language;
pub mod profiles;
pub mod registry;
pub mod transport;
pub mod types;
pub mod utils;

pub use engine_core::errors::{Openc2Error, Result};
pub use registry::Registry;
