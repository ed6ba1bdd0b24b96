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

//! IP network types: `addr[/prefix]` strings on the wire.

use serde_json::Value;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::engine_core::errors::{Openc2Error, Result};
use crate::registry::Registry;
use crate::types::traits::{expect_str, Decode, Openc2Type};

macro_rules! ip_net {
    ($name:ident, $addr:ty, $max:expr, $label:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            addr: $addr,
            prefix: Option<u8>,
        }

        impl $name {
            pub fn new(addr: &str, prefix: u8) -> Result<Self> {
                Self::from_parts(Self::parse_addr(addr)?, Some(prefix))
            }

            /// A single address without prefix length.
            pub fn host(addr: &str) -> Result<Self> {
                Self::from_parts(Self::parse_addr(addr)?, None)
            }

            fn parse_addr(addr: &str) -> Result<$addr> {
                addr.parse::<$addr>().map_err(|e| {
                    Openc2Error::value(format!("invalid {} address '{}': {}", $label, addr, e))
                })
            }

            pub fn from_parts(addr: $addr, prefix: Option<u8>) -> Result<Self> {
                if let Some(p) = prefix {
                    if p > $max {
                        return Err(Openc2Error::value(format!(
                            "{} prefix must be <= {}, got {}",
                            $label, $max, p
                        )));
                    }
                }
                Ok(Self { addr, prefix })
            }

            /// Address part in its textual form.
            pub fn addr(&self) -> String {
                self.addr.to_string()
            }

            pub fn ip(&self) -> $addr {
                self.addr
            }

            pub fn prefix(&self) -> Option<u8> {
                self.prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.prefix {
                    Some(p) => write!(f, "{}/{}", self.addr, p),
                    None => write!(f, "{}", self.addr),
                }
            }
        }

        impl FromStr for $name {
            type Err = Openc2Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.split_once('/') {
                    Some((addr, prefix)) => {
                        let prefix = prefix.parse::<u8>().map_err(|_| {
                            Openc2Error::value(format!("invalid {} prefix in '{}'", $label, s))
                        })?;
                        Self::new(addr, prefix)
                    }
                    None => Self::host(s),
                }
            }
        }

        impl Openc2Type for $name {
            fn encode(&self) -> Result<Value> {
                Ok(Value::String(self.to_string()))
            }
        }

        impl Decode for $name {
            fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
                expect_str(value, $label)?.parse()
            }
        }
    };
}

ip_net!(Ipv4Net, Ipv4Addr, 32, "IPv4Net");
ip_net!(Ipv6Net, Ipv6Addr, 128, "IPv6Net");
