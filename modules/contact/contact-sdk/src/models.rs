//! Contact directory wire models.
//!
//! Field names follow the open API JSON. Every field is optional on the
//! wire and decodes to its zero value when absent or `null`; unknown
//! fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

use crate::envelope::{Envelope, OapiResponse};

/// Directory member (`user/get`, `user/getuserinfo`, entries of `user/list`).
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)] // mirrors the platform's flag fields
pub struct User {
    #[serde(flatten)]
    pub envelope: OapiResponse,
    #[serde(rename = "userid")]
    #[serde_as(as = "DefaultOnNull")]
    pub user_id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub mobile: String,
    #[serde_as(as = "DefaultOnNull")]
    pub tel: String,
    #[serde_as(as = "DefaultOnNull")]
    pub remark: String,
    #[serde_as(as = "DefaultOnNull")]
    pub order: i64,
    #[serde(rename = "isAdmin")]
    #[serde_as(as = "DefaultOnNull")]
    pub is_admin: bool,
    #[serde(rename = "isBoss")]
    #[serde_as(as = "DefaultOnNull")]
    pub is_boss: bool,
    #[serde(rename = "isLeader")]
    #[serde_as(as = "DefaultOnNull")]
    pub is_leader: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub is_sys: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub sys_level: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub active: bool,
    /// Ids of the departments the member belongs to.
    #[serde_as(as = "DefaultOnNull")]
    pub department: Vec<i64>,
    #[serde_as(as = "DefaultOnNull")]
    pub position: String,
    #[serde_as(as = "DefaultOnNull")]
    pub email: String,
    #[serde_as(as = "DefaultOnNull")]
    pub avatar: String,
    /// Tenant-defined extended attributes; the schema is not fixed.
    pub extattr: Value,
}

/// One page of department members (`user/list`).
///
/// `has_more` reports whether the platform holds further members; the
/// endpoint as bound here offers no way to request them.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserList {
    #[serde(flatten)]
    pub envelope: OapiResponse,
    #[serde(rename = "hasMore")]
    #[serde_as(as = "DefaultOnNull")]
    pub has_more: bool,
    #[serde(rename = "userlist")]
    #[serde_as(as = "DefaultOnNull")]
    pub users: Vec<User>,
}

/// Organizational unit (`department/get`, entries of `department/list`).
///
/// Permission fields are opaque strings as sent by the platform.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Department {
    #[serde(flatten)]
    pub envelope: OapiResponse,
    #[serde_as(as = "DefaultOnNull")]
    pub id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde(rename = "parentid", alias = "parentId")]
    #[serde_as(as = "DefaultOnNull")]
    pub parent_id: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub order: i64,
    #[serde(rename = "deptPerimits")]
    #[serde_as(as = "DefaultOnNull")]
    pub dept_permits: String,
    #[serde(rename = "userPerimits")]
    #[serde_as(as = "DefaultOnNull")]
    pub user_permits: String,
    #[serde(rename = "outerDept")]
    #[serde_as(as = "DefaultOnNull")]
    pub outer_dept: bool,
    #[serde(rename = "outerPermitDepts")]
    #[serde_as(as = "DefaultOnNull")]
    pub outer_permit_depts: String,
    #[serde(rename = "outerPermitUsers")]
    #[serde_as(as = "DefaultOnNull")]
    pub outer_permit_users: String,
    #[serde(rename = "orgDeptOwner")]
    #[serde_as(as = "DefaultOnNull")]
    pub org_dept_owner: String,
    /// `|`-separated manager user ids.
    #[serde(rename = "deptManagerUseridList")]
    #[serde_as(as = "DefaultOnNull")]
    pub dept_manager_userid_list: String,
}

/// All departments visible to the caller (`department/list`).
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentList {
    #[serde(flatten)]
    pub envelope: OapiResponse,
    #[serde(rename = "department")]
    #[serde_as(as = "DefaultOnNull")]
    pub departments: Vec<Department>,
}

/// Directory access granted to the calling application (`auth/scopes`).
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthScopes {
    #[serde(flatten)]
    pub envelope: OapiResponse,
    /// User fields the application may read.
    #[serde_as(as = "DefaultOnNull")]
    pub auth_user_field: Vec<String>,
    /// Organization features the application may use directly.
    #[serde_as(as = "DefaultOnNull")]
    pub condition_field: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub auth_org_scopes: AuthOrgScopes,
}

/// Departments and users the organization authorized.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthOrgScopes {
    #[serde_as(as = "DefaultOnNull")]
    pub authed_dept: Vec<i64>,
    #[serde_as(as = "DefaultOnNull")]
    pub authed_user: Vec<String>,
}

impl Envelope for User {
    fn envelope(&self) -> &OapiResponse {
        &self.envelope
    }
}

impl Envelope for UserList {
    fn envelope(&self) -> &OapiResponse {
        &self.envelope
    }
}

impl Envelope for Department {
    fn envelope(&self) -> &OapiResponse {
        &self.envelope
    }
}

impl Envelope for DepartmentList {
    fn envelope(&self) -> &OapiResponse {
        &self.envelope
    }
}

impl Envelope for AuthScopes {
    fn envelope(&self) -> &OapiResponse {
        &self.envelope
    }
}
