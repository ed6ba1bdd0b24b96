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

//! Core targets.
//!
//! [`Target`] is a Choice over the `Target` register of the [`Registry`]. The
//! core types below are registered by [`Registry::new`]; profiles add their
//! own (namespaced) targets through [`Registry::add_target`].

use serde_json::Value;

use crate::engine_core::errors::{Openc2Error, Result};
use crate::impl_record;
use crate::language::features::Features;
use crate::registry::{Register, RegisterEntry, Registry};
use crate::types::traits::expect_str;
use crate::types::{
    Binaryx, ChoiceKind, Choice, Decode, EnumKind, Enumerated, FieldReader, FieldWriter, Ipv4Net,
    Ipv6Net, Openc2Type, Record,
};

// --- Target enumeration ---

/// Names of every nameable target; profiles append theirs on registration.
#[derive(Debug)]
pub struct TargetEnumKind;

impl EnumKind for TargetEnumKind {
    const NAME: &'static str = "TargetEnum";
    const CORE: &'static [(&'static str, i64)] = &[
        ("device", 3),
        ("domain_name", 7),
        ("email_addr", 8),
        ("features", 9),
        ("file", 10),
        ("ipv4_net", 13),
        ("ipv6_net", 14),
        ("ipv4_connection", 15),
        ("ipv6_connection", 16),
        ("process", 18),
        ("uri", 19),
    ];
}

pub type TargetEnum = Enumerated<TargetEnumKind>;

#[derive(Debug)]
pub struct TargetKind;

impl ChoiceKind for TargetKind {
    const NAME: &'static str = "Target";

    fn register(registry: &Registry) -> &Register {
        registry.targets()
    }

    fn register_mut(registry: &mut Registry) -> &mut Register {
        registry.targets_mut()
    }
}

/// The object a Command acts upon.
pub type Target = Choice<TargetKind>;

pub(crate) fn core_target_entries() -> Vec<RegisterEntry> {
    vec![
        RegisterEntry::of::<Device>("device", 3),
        RegisterEntry::of::<DomainName>("domain_name", 7),
        RegisterEntry::of::<EmailAddr>("email_addr", 8),
        RegisterEntry::of::<Features>("features", 9),
        RegisterEntry::of::<File>("file", 10),
        RegisterEntry::of::<Ipv4Net>("ipv4_net", 13),
        RegisterEntry::of::<Ipv6Net>("ipv6_net", 14),
        RegisterEntry::of::<Ipv4Connection>("ipv4_connection", 15),
        RegisterEntry::of::<Ipv6Connection>("ipv6_connection", 16),
        RegisterEntry::of::<Process>("process", 18),
        RegisterEntry::of::<Uri>("uri", 19),
    ]
}

fn require_any(type_name: &str, present: &[bool]) -> Result<()> {
    if present.iter().any(|p| *p) {
        Ok(())
    } else {
        Err(Openc2Error::value(format!(
            "{} must contain at least one property",
            type_name
        )))
    }
}

// --- String targets ---

macro_rules! text_target {
    ($(#[$meta:meta])* $name:ident, $label:expr, $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                let check: fn(&str) -> bool = $check;
                if !check(&value) {
                    return Err(Openc2Error::value(format!(
                        "invalid {} '{}'",
                        $label, value
                    )));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Openc2Type for $name {
            fn encode(&self) -> Result<Value> {
                Ok(Value::String(self.0.clone()))
            }
        }

        impl Decode for $name {
            fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
                Self::new(expect_str(value, $label)?)
            }
        }
    };
}

text_target!(
    /// A fully qualified domain name.
    DomainName,
    "domain_name",
    |s| !s.is_empty()
);
text_target!(EmailAddr, "email_addr", |s| s
    .split_once('@')
    .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty()));
text_target!(Uri, "uri", |s| !s.is_empty());

// --- Record targets ---

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Device {
    pub hostname: Option<String>,
    pub idn_hostname: Option<String>,
    pub device_id: Option<String>,
}

impl Record for Device {
    const TYPE_NAME: &'static str = "Device";
    const FIELDS: &'static [&'static str] = &["hostname", "idn_hostname", "device_id"];

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        out.field("hostname", &self.hostname)?;
        out.field("idn_hostname", &self.idn_hostname)?;
        out.field("device_id", &self.device_id)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            hostname: fields.optional("hostname")?,
            idn_hostname: fields.optional("idn_hostname")?,
            device_id: fields.optional("device_id")?,
        })
    }

    fn validate(&self) -> Result<()> {
        require_any(
            Self::TYPE_NAME,
            &[
                self.hostname.is_some(),
                self.idn_hostname.is_some(),
                self.device_id.is_some(),
            ],
        )
    }
}

/// Cryptographic digests keyed by algorithm.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hashes {
    pub md5: Option<Binaryx>,
    pub sha1: Option<Binaryx>,
    pub sha256: Option<Binaryx>,
}

impl Record for Hashes {
    const TYPE_NAME: &'static str = "Hashes";
    const FIELDS: &'static [&'static str] = &["md5", "sha1", "sha256"];

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        out.field("md5", &self.md5)?;
        out.field("sha1", &self.sha1)?;
        out.field("sha256", &self.sha256)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            md5: fields.optional("md5")?,
            sha1: fields.optional("sha1")?,
            sha256: fields.optional("sha256")?,
        })
    }

    fn validate(&self) -> Result<()> {
        let lengths = [(&self.md5, 16), (&self.sha1, 20), (&self.sha256, 32)];
        for (digest, expected) in lengths {
            if let Some(d) = digest {
                if d.as_bytes().len() != expected {
                    return Err(Openc2Error::value(format!(
                        "digest of {} bytes where {} expected",
                        d.as_bytes().len(),
                        expected
                    )));
                }
            }
        }
        require_any(
            Self::TYPE_NAME,
            &[self.md5.is_some(), self.sha1.is_some(), self.sha256.is_some()],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct File {
    pub name: Option<String>,
    pub path: Option<String>,
    pub hashes: Option<Hashes>,
}

impl Record for File {
    const TYPE_NAME: &'static str = "File";
    const FIELDS: &'static [&'static str] = &["name", "path", "hashes"];

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        out.field("name", &self.name)?;
        out.field("path", &self.path)?;
        out.field("hashes", &self.hashes)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            name: fields.optional("name")?,
            path: fields.optional("path")?,
            hashes: fields.optional("hashes")?,
        })
    }

    fn validate(&self) -> Result<()> {
        require_any(
            Self::TYPE_NAME,
            &[self.name.is_some(), self.path.is_some(), self.hashes.is_some()],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Process {
    pub pid: Option<u64>,
    pub name: Option<String>,
    pub cwd: Option<String>,
    pub executable: Option<File>,
    pub parent: Option<Box<Process>>,
    pub command_line: Option<String>,
}

impl Record for Process {
    const TYPE_NAME: &'static str = "Process";
    const FIELDS: &'static [&'static str] =
        &["pid", "name", "cwd", "executable", "parent", "command_line"];

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        out.field("pid", &self.pid)?;
        out.field("name", &self.name)?;
        out.field("cwd", &self.cwd)?;
        out.field("executable", &self.executable)?;
        out.field("parent", &self.parent)?;
        out.field("command_line", &self.command_line)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            pid: fields.optional("pid")?,
            name: fields.optional("name")?,
            cwd: fields.optional("cwd")?,
            executable: fields.optional("executable")?,
            parent: fields.optional("parent")?,
            command_line: fields.optional("command_line")?,
        })
    }

    fn validate(&self) -> Result<()> {
        require_any(
            Self::TYPE_NAME,
            &[
                self.pid.is_some(),
                self.name.is_some(),
                self.cwd.is_some(),
                self.executable.is_some(),
                self.parent.is_some(),
                self.command_line.is_some(),
            ],
        )
    }
}

// --- Connections ---

#[derive(Debug)]
pub struct L4ProtocolKind;

impl EnumKind for L4ProtocolKind {
    const NAME: &'static str = "L4Protocol";
    const CORE: &'static [(&'static str, i64)] =
        &[("icmp", 1), ("tcp", 6), ("udp", 17), ("sctp", 132)];
}

/// Transport-layer protocol of a connection.
pub type L4Protocol = Enumerated<L4ProtocolKind>;

impl Enumerated<L4ProtocolKind> {
    pub const ICMP: Self = Self::from_static("icmp", 1);
    pub const TCP: Self = Self::from_static("tcp", 6);
    pub const UDP: Self = Self::from_static("udp", 17);
    pub const SCTP: Self = Self::from_static("sctp", 132);
}

const MAX_PORT: u64 = 65535;

macro_rules! connection_target {
    ($name:ident, $net:ty, $label:expr) => {
        /// 5-tuple of a layer 4 connection; every member is optional.
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            pub src_addr: Option<$net>,
            pub src_port: Option<u64>,
            pub dst_addr: Option<$net>,
            pub dst_port: Option<u64>,
            pub protocol: Option<L4Protocol>,
        }

        impl Record for $name {
            const TYPE_NAME: &'static str = $label;
            const FIELDS: &'static [&'static str] =
                &["src_addr", "src_port", "dst_addr", "dst_port", "protocol"];

            fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
                out.field("src_addr", &self.src_addr)?;
                out.field("src_port", &self.src_port)?;
                out.field("dst_addr", &self.dst_addr)?;
                out.field("dst_port", &self.dst_port)?;
                out.field("protocol", &self.protocol)
            }

            fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
                Ok(Self {
                    src_addr: fields.optional("src_addr")?,
                    src_port: fields.optional("src_port")?,
                    dst_addr: fields.optional("dst_addr")?,
                    dst_port: fields.optional("dst_port")?,
                    protocol: fields.optional("protocol")?,
                })
            }

            fn validate(&self) -> Result<()> {
                for port in [self.src_port, self.dst_port].into_iter().flatten() {
                    if port > MAX_PORT {
                        return Err(Openc2Error::value(format!(
                            "port {} out of range 0-{}",
                            port, MAX_PORT
                        )));
                    }
                }
                Ok(())
            }
        }
    };
}

connection_target!(Ipv4Connection, Ipv4Net, "IPv4Connection");
connection_target!(Ipv6Connection, Ipv6Net, "IPv6Connection");

impl_record!(Device, Hashes, File, Process, Ipv4Connection, Ipv6Connection);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::features::Feature;
    use serde_json::json;

    #[test]
    fn test_features_target_wire_form() {
        let registry = Registry::new();
        let features = Features::new(vec![Feature::VERSIONS, Feature::PROFILES]).unwrap();
        let target = Target::new(features, &registry).unwrap();
        assert_eq!(target.get_name(), "features");
        assert_eq!(
            target.encode().unwrap(),
            json!({"features": ["versions", "profiles"]})
        );
    }

    #[test]
    fn test_connection_roundtrip() {
        let registry = Registry::new();
        let wire = json!({"ipv4_connection": {
            "src_addr": "10.0.0.0/8",
            "dst_port": 443,
            "protocol": "tcp"
        }});
        let target = Target::decode(&wire, &registry).unwrap();
        let conn = target.downcast_ref::<Ipv4Connection>().unwrap();
        assert_eq!(conn.protocol, Some(L4Protocol::TCP));
        assert_eq!(conn.src_addr.unwrap().prefix(), Some(8));
        assert_eq!(target.encode().unwrap(), wire);
    }

    #[test]
    fn test_port_range() {
        let registry = Registry::new();
        assert!(matches!(
            Ipv4Connection::decode(&json!({"dst_port": 70000}), &registry),
            Err(Openc2Error::Value(_))
        ));
    }

    #[test]
    fn test_file_needs_a_property() {
        let registry = Registry::new();
        assert!(matches!(
            File::decode(&json!({}), &registry),
            Err(Openc2Error::Value(_))
        ));
        let file = File {
            hashes: Some(Hashes {
                sha1: Some(Binaryx::new(vec![0xAB; 20])),
                ..Default::default()
            }),
            ..Default::default()
        };
        let back = File::decode(&file.encode().unwrap(), &registry).unwrap();
        assert_eq!(back, file);
        assert!(File::default().encode().is_err());
    }

    #[test]
    fn test_process_parent_nests() {
        let registry = Registry::new();
        let child = Process {
            pid: Some(42),
            parent: Some(Box::new(Process {
                name: Some("init".into()),
                ..Default::default()
            })),
            ..Default::default()
        };
        let encoded = child.encode().unwrap();
        assert_eq!(encoded, json!({"pid": 42, "parent": {"name": "init"}}));
        assert_eq!(Process::decode(&encoded, &registry).unwrap(), child);
    }

    #[test]
    fn test_text_targets() {
        assert!(EmailAddr::new("soc@example.com").is_ok());
        assert!(EmailAddr::new("nobody").is_err());
        assert!(DomainName::new("").is_err());
    }

    #[test]
    fn test_unregistered_target_name() {
        let registry = Registry::new();
        assert!(matches!(
            Target::decode(&json!({"slpf:rule_number": 1}), &registry),
            Err(Openc2Error::Schema(_))
        ));
    }
}
