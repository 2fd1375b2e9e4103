// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Business module CRUD wrappers.
//!
//! Every module exposes the same `POST <prefix>/{page,list,info,add,update,delete}`
//! surface. Payload shapes are module-specific, so records are passed through
//! as caller-chosen types (or `serde_json::Value`).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rk_core::department::build_department_tree;
use rk_core::{Department, DeptNode, PageQuery, PageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

// =============================================================================
// ResourceKind
// =============================================================================

/// A business module with a CRUD surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Vendors.
    Vendor,
    /// Vendor contacts.
    VendorContact,
    /// Customers.
    Customer,
    /// Customer contacts.
    CustomerContact,
    /// Recruiting activities.
    Active,
    /// Candidate supply.
    Supply,
    /// Notices.
    Notice,
    /// Dictionary types.
    DictType,
    /// Dictionary entries.
    DictInfo,
    /// Users.
    User,
    /// Roles.
    Role,
    /// Departments.
    Department,
    /// Shared links.
    SharedLink,
}

impl ResourceKind {
    /// All modules.
    pub const ALL: [ResourceKind; 13] = [
        Self::Vendor,
        Self::VendorContact,
        Self::Customer,
        Self::CustomerContact,
        Self::Active,
        Self::Supply,
        Self::Notice,
        Self::DictType,
        Self::DictInfo,
        Self::User,
        Self::Role,
        Self::Department,
        Self::SharedLink,
    ];

    /// Short name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::VendorContact => "vendor-contact",
            Self::Customer => "customer",
            Self::CustomerContact => "customer-contact",
            Self::Active => "active",
            Self::Supply => "supply",
            Self::Notice => "notice",
            Self::DictType => "dict-type",
            Self::DictInfo => "dict-info",
            Self::User => "user",
            Self::Role => "role",
            Self::Department => "dept",
            Self::SharedLink => "shared-link",
        }
    }

    /// Endpoint prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Vendor => "/rk/vendor",
            Self::VendorContact => "/rk/vendor_contact",
            Self::Customer => "/rk/customer",
            Self::CustomerContact => "/rk/customer_contact",
            Self::Active => "/rk/active",
            Self::Supply => "/supply",
            Self::Notice => "/notice",
            Self::DictType => "/dict/type",
            Self::DictInfo => "/dict/info",
            Self::User => "/rbac/users",
            Self::Role => "/rbac/roles",
            Self::Department => "/rbac/depts",
            Self::SharedLink => "/shared_links",
        }
    }

    /// Full path of an operation on this module.
    pub fn path(&self, operation: &str) -> String {
        format!("{}/{}", self.prefix(), operation)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ClientError::config(format!("Unknown module: {}", s)))
    }
}

// =============================================================================
// ResourceClient
// =============================================================================

/// CRUD calls against business modules.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    http: Arc<HttpClient>,
}

impl ResourceClient {
    /// Creates the wrapper.
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// One page of records.
    pub async fn page<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        query: &PageQuery,
    ) -> ClientResult<PageResult<T>> {
        self.http.post(&kind.path("page"), query).await
    }

    /// All records matching `filters`.
    pub async fn list<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        filters: &Value,
    ) -> ClientResult<Vec<T>> {
        self.http.post(&kind.path("list"), filters).await
    }

    /// A single record.
    pub async fn info<T: DeserializeOwned>(&self, kind: ResourceKind, id: i64) -> ClientResult<T> {
        self.http.post(&kind.path("info"), &json!({ "id": id })).await
    }

    /// Creates a record.
    pub async fn add<B, T>(&self, kind: ResourceKind, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.http.post(&kind.path("add"), body).await
    }

    /// Updates a record.
    pub async fn update<B, T>(&self, kind: ResourceKind, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.http.post(&kind.path("update"), body).await
    }

    /// Deletes records by id.
    pub async fn delete(&self, kind: ResourceKind, ids: &[i64]) -> ClientResult<()> {
        self.http
            .post::<_, Value>(&kind.path("delete"), &json!({ "ids": ids }))
            .await
            .map(|_| ())
    }

    /// The department tree, assembled client-side from the flat list.
    pub async fn department_tree(&self) -> ClientResult<Vec<DeptNode>> {
        let departments: Vec<Department> = self
            .list(ResourceKind::Department, &Value::Object(Default::default()))
            .await?;
        Ok(build_department_tree(departments))
    }
}
