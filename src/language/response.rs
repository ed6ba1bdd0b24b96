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

use crate::engine_core::constants::status;
use crate::engine_core::errors::{Openc2Error, Result};
use crate::impl_record;
use crate::language::results::ResultsMap;
use crate::registry::Registry;
use crate::types::{
    EnumEncoding, EnumKind, Enumerated, FieldReader, FieldWriter, Openc2Type, Record,
};

#[derive(Debug)]
pub struct StatusCodeKind;

impl EnumKind for StatusCodeKind {
    const NAME: &'static str = "StatusCode";
    const ENCODING: EnumEncoding = EnumEncoding::Id;
    const CORE: &'static [(&'static str, i64)] = &[
        ("processing", status::PROCESSING as i64),
        ("ok", status::OK as i64),
        ("bad_request", status::BAD_REQUEST as i64),
        ("unauthorized", status::UNAUTHORIZED as i64),
        ("forbidden", status::FORBIDDEN as i64),
        ("not_found", status::NOT_FOUND as i64),
        ("internal_error", status::INTERNAL_ERROR as i64),
        ("not_implemented", status::NOT_IMPLEMENTED as i64),
        ("service_unavailable", status::SERVICE_UNAVAILABLE as i64),
    ];
}

/// Response status; the numeric code travels on the wire.
pub type StatusCode = Enumerated<StatusCodeKind>;

impl Enumerated<StatusCodeKind> {
    pub const PROCESSING: Self = Self::from_static("processing", status::PROCESSING as i64);
    pub const OK: Self = Self::from_static("ok", status::OK as i64);
    pub const BAD_REQUEST: Self = Self::from_static("bad_request", status::BAD_REQUEST as i64);
    pub const UNAUTHORIZED: Self = Self::from_static("unauthorized", status::UNAUTHORIZED as i64);
    pub const FORBIDDEN: Self = Self::from_static("forbidden", status::FORBIDDEN as i64);
    pub const NOT_FOUND: Self = Self::from_static("not_found", status::NOT_FOUND as i64);
    pub const INTERNAL_ERROR: Self =
        Self::from_static("internal_error", status::INTERNAL_ERROR as i64);
    pub const NOT_IMPLEMENTED: Self =
        Self::from_static("not_implemented", status::NOT_IMPLEMENTED as i64);
    pub const SERVICE_UNAVAILABLE: Self =
        Self::from_static("service_unavailable", status::SERVICE_UNAVAILABLE as i64);

    /// Core status for `code`, falling back to internal error.
    pub fn from_code(code: u16) -> Self {
        let code = i64::from(code);
        match StatusCodeKind::core_by_value(code) {
            Some(name) => Self::from_static(name, code),
            None => Self::INTERNAL_ERROR,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.value())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub status_text: Option<String>,
    pub results: Option<ResultsMap>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            status_text: None,
            results: None,
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }

    /// Attach results: core `Results` or a registered extension of it.
    pub fn with_results<R: Openc2Type>(mut self, results: R, registry: &Registry) -> Result<Self> {
        self.results = Some(ResultsMap::new(results, registry)?);
        Ok(self)
    }

    /// Error Response for a failure caught at the dispatch boundary.
    pub fn from_error(err: &Openc2Error) -> Self {
        Self::new(StatusCode::from_code(err.status_code())).with_text(err.user_message())
    }
}

impl Record for Response {
    const TYPE_NAME: &'static str = "Response";
    const FIELDS: &'static [&'static str] = &["status", "status_text", "results"];

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        out.required("status", &self.status)?;
        out.field("status_text", &self.status_text)?;
        out.field("results", &self.results)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            status: fields.required("status")?,
            status_text: fields.optional("status_text")?,
            results: fields.optional("results")?,
        })
    }
}

impl_record!(Response);
