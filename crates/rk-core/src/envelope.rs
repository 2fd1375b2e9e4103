// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The response envelope and pagination payloads.
//!
//! Every backend response is wrapped as
//! `{ "code": 1000, "message": "success", "result": ..., "request_id": ... }`.
//! Some endpoints use `data` instead of `result`; both are accepted.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// ResponseCode
// =============================================================================

/// Well-known application codes.
pub struct ResponseCode;

impl ResponseCode {
    /// Success.
    pub const SUCCESS: i64 = 1000;
    /// Generic business failure.
    pub const BUSINESS: i64 = 1001;
    /// Request validation failed.
    pub const VALIDATION: i64 = 10031;
    /// Not authenticated.
    pub const UNAUTHORIZED: i64 = 10032;
    /// Not permitted.
    pub const FORBIDDEN: i64 = 10033;
    /// Resource not found.
    pub const NOT_FOUND: i64 = 10034;
    /// Unhandled server failure.
    pub const SERVER_CRASH: i64 = 50000;

    /// Returns `true` for codes that mean the session is no longer valid.
    pub fn is_auth_failure(code: i64) -> bool {
        code == Self::UNAUTHORIZED
    }
}

// =============================================================================
// ApiEnvelope
// =============================================================================

/// A decoded response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T = Value> {
    /// Application code.
    pub code: i64,
    /// Server message.
    #[serde(default)]
    pub message: String,
    /// Payload.
    #[serde(default, alias = "data")]
    pub result: Option<T>,
    /// Request id echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Creates a success envelope.
    pub fn success(result: T) -> Self {
        Self {
            code: ResponseCode::SUCCESS,
            message: "success".to_string(),
            result: Some(result),
            request_id: None,
        }
    }

    /// Creates a failure envelope.
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            result: None,
            request_id: None,
        }
    }

    /// Returns `true` if the code is [`ResponseCode::SUCCESS`].
    pub fn is_success(&self) -> bool {
        self.code == ResponseCode::SUCCESS
    }
}

impl ApiEnvelope<Value> {
    /// Unwraps the payload into `T`.
    ///
    /// A missing payload is decoded from `null`, so `()` and `Option<_>`
    /// targets accept empty results.
    pub fn into_result<T: DeserializeOwned>(self) -> CoreResult<T> {
        if !self.is_success() {
            return Err(CoreError::business(self.code, self.message));
        }
        Ok(serde_json::from_value(self.result.unwrap_or(Value::Null))?)
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// A page query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Free-text keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_word: Option<String>,
    /// Module-specific filters.
    #[serde(flatten)]
    pub filters: serde_json::Map<String, Value>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 20,
            key_word: None,
            filters: serde_json::Map::new(),
        }
    }
}

impl PageQuery {
    /// Creates a page query.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
            ..Self::default()
        }
    }

    /// Sets the keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        self.key_word = (!keyword.trim().is_empty()).then_some(keyword);
        self
    }

    /// Adds a filter field.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of records.
    pub total: u64,
    /// Current page.
    pub page: u32,
    /// Page size.
    pub size: u32,
}

impl Pagination {
    /// Number of pages.
    pub fn pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(u64::from(self.size))
        }
    }
}

/// A page of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Records on this page.
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    /// Pagination metadata.
    #[serde(default)]
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_result_success() {
        let env: ApiEnvelope =
            serde_json::from_value(json!({"code": 1000, "message": "success", "result": [1, 2]}))
                .unwrap();
        let values: Vec<i32> = env.into_result().unwrap();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_data_alias_and_empty_result() {
        let env: ApiEnvelope =
            serde_json::from_value(json!({"code": 1000, "data": {"x": 1}})).unwrap();
        assert_eq!(env.result, Some(json!({"x": 1})));

        let empty: ApiEnvelope = serde_json::from_value(json!({"code": 1000})).unwrap();
        empty.into_result::<()>().unwrap();
    }

    #[test]
    fn test_business_failure() {
        let env: ApiEnvelope =
            serde_json::from_value(json!({"code": 1001, "message": "验证码不正确"})).unwrap();
        let err = env.into_result::<Value>().unwrap_err();
        assert_eq!(err, CoreError::business(1001, "验证码不正确"));
    }

    #[test]
    fn test_page_query_wire_format() {
        let query = PageQuery::new(0, 10)
            .with_keyword("java")
            .with_filter("status", 1);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, json!({"page": 1, "size": 10, "keyWord": "java", "status": 1}));

        let blank = PageQuery::default().with_keyword("  ");
        assert!(blank.key_word.is_none());
    }

    #[test]
    fn test_page_result_parse() {
        let page: PageResult<Value> = serde_json::from_value(json!({
            "list": [{"id": 1}],
            "pagination": {"total": 41, "page": 1, "size": 20}
        }))
        .unwrap();
        assert_eq!(page.list.len(), 1);
        assert_eq!(page.pagination.pages(), 3);
    }
}
