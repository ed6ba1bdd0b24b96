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

//! The OpenC2 base type system.
//!
//! Primitive wrappers, Enumerated, Record, Choice, ArrayOf, MapOf and
//! extensible Maps, each with its encode/decode rules.

pub mod array;
pub mod binary;
pub mod choice;
pub mod enumerated;
pub mod map;
pub mod net;
pub mod primitives;
pub mod record;
pub mod traits;

pub use serde_json::Value;

pub use array::{Array, ArrayOf};
pub use binary::{Binary, Binaryx};
pub use choice::{Choice, ChoiceKind};
pub use enumerated::{EnumEncoding, EnumKind, EnumTable, Enumerated};
pub use map::{Extensible, ExtensionPoint, MapOf, MapSchema};
pub use net::{Ipv4Net, Ipv6Net};
pub use primitives::{DateTime, Duration, Nsid, Version};
pub use record::{FieldReader, FieldWriter, Record};
pub use traits::{Decode, DynValue, Openc2Type};
