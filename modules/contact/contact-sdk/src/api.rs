use async_trait::async_trait;

use crate::error::ContactError;
use crate::models::{AuthScopes, Department, DepartmentList, User, UserList};

/// Contact directory operations.
///
/// Each method maps to exactly one open API endpoint and performs exactly
/// one transport call.
#[async_trait]
pub trait ContactApi: Send + Sync {
    /// Directory scopes granted to the calling application (`auth/scopes`).
    ///
    /// # Errors
    /// Returns `ContactError` if the call or decoding fails.
    async fn auth_scopes(&self) -> Result<AuthScopes, ContactError>;

    /// All departments visible to the caller (`department/list`).
    ///
    /// # Errors
    /// Returns `ContactError` if the call or decoding fails.
    async fn department_list(&self) -> Result<DepartmentList, ContactError>;

    /// One department by id (`department/get`).
    ///
    /// # Errors
    /// Returns `ContactError` if the call or decoding fails.
    async fn department_detail(&self, id: i64) -> Result<Department, ContactError>;

    /// One member by user id (`user/get`).
    ///
    /// # Errors
    /// Returns `ContactError` if the call or decoding fails.
    async fn user_info(&self, user_id: &str) -> Result<User, ContactError>;

    /// Members of a department (`user/list`).
    ///
    /// # Errors
    /// Returns `ContactError` if the call or decoding fails.
    async fn user_list(&self, department_id: i64) -> Result<UserList, ContactError>;

    /// Create a group conversation and return its chat id (`chat/create`).
    ///
    /// # Errors
    /// Returns `ContactError` if the call or decoding fails.
    async fn create_chat(
        &self,
        name: &str,
        owner: &str,
        user_ids: &[String],
    ) -> Result<String, ContactError>;

    /// Resolve the member behind a login authorization code (`user/getuserinfo`).
    ///
    /// # Errors
    /// Returns `ContactError` if the call or decoding fails.
    async fn user_info_by_code(&self, code: &str) -> Result<User, ContactError>;

    /// Translate a cross-application union id into a user id
    /// (`user/getUseridByUnionid`).
    ///
    /// # Errors
    /// Returns `ContactError` if the call or decoding fails.
    async fn user_id_by_union_id(&self, union_id: &str) -> Result<String, ContactError>;
}
