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

use crate::types::{EnumKind, Enumerated};

#[derive(Debug)]
pub struct ActionKind;

impl EnumKind for ActionKind {
    const NAME: &'static str = "Action";
    const CORE: &'static [(&'static str, i64)] = &[
        ("scan", 1),
        ("locate", 2),
        ("query", 3),
        ("deny", 6),
        ("contain", 7),
        ("allow", 8),
        ("start", 9),
        ("stop", 10),
        ("restart", 11),
        ("cancel", 14),
        ("set", 15),
        ("update", 16),
        ("redirect", 18),
        ("create", 19),
        ("delete", 20),
        ("detonate", 22),
        ("restore", 23),
        ("copy", 28),
        ("investigate", 30),
        ("remediate", 32),
    ];
}

/// The verb of a Command.
pub type Action = Enumerated<ActionKind>;

impl Enumerated<ActionKind> {
    pub const SCAN: Self = Self::from_static("scan", 1);
    pub const LOCATE: Self = Self::from_static("locate", 2);
    pub const QUERY: Self = Self::from_static("query", 3);
    pub const DENY: Self = Self::from_static("deny", 6);
    pub const CONTAIN: Self = Self::from_static("contain", 7);
    pub const ALLOW: Self = Self::from_static("allow", 8);
    pub const START: Self = Self::from_static("start", 9);
    pub const STOP: Self = Self::from_static("stop", 10);
    pub const RESTART: Self = Self::from_static("restart", 11);
    pub const CANCEL: Self = Self::from_static("cancel", 14);
    pub const SET: Self = Self::from_static("set", 15);
    pub const UPDATE: Self = Self::from_static("update", 16);
    pub const REDIRECT: Self = Self::from_static("redirect", 18);
    pub const CREATE: Self = Self::from_static("create", 19);
    pub const DELETE: Self = Self::from_static("delete", 20);
    pub const DETONATE: Self = Self::from_static("detonate", 22);
    pub const RESTORE: Self = Self::from_static("restore", 23);
    pub const COPY: Self = Self::from_static("copy", 28);
    pub const INVESTIGATE: Self = Self::from_static("investigate", 30);
    pub const REMEDIATE: Self = Self::from_static("remediate", 32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::types::{Decode, Openc2Type};
    use serde_json::json;

    #[test]
    fn test_constants_match_core_table() {
        for action in [Action::QUERY, Action::DENY, Action::ALLOW, Action::COPY] {
            assert_eq!(ActionKind::core_by_name(action.name()), Some(action.value()));
        }
    }

    #[test]
    fn test_profile_action_extension() {
        let mut registry = Registry::empty();
        registry.extend_enum::<ActionKind>("x-quarantine", 1024).unwrap();
        let action = Action::decode(&json!("x-quarantine"), &registry).unwrap();
        assert_eq!(action.value(), 1024);
        assert_eq!(action.encode().unwrap(), json!("x-quarantine"));
    }
}
