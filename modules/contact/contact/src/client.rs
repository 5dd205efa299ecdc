use std::sync::Arc;

use async_trait::async_trait;
use contact_sdk::{
    AuthScopes, ContactApi, ContactError, Department, DepartmentList, OapiTransport, User,
    UserList,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::{ConfigError, ContactClientConfig};
use crate::transport::HttpOapiTransport;

const AUTH_SCOPES: &str = "auth/scopes";
const DEPARTMENT_LIST: &str = "department/list";
const DEPARTMENT_GET: &str = "department/get";
const USER_GET: &str = "user/get";
const USER_LIST: &str = "user/list";
const CHAT_CREATE: &str = "chat/create";
const USER_GET_USER_INFO: &str = "user/getuserinfo";
const USER_GET_USERID_BY_UNIONID: &str = "user/getUseridByUnionid";

/// Locale requested for `user/get`.
const USER_LANG: &str = "zh_CN";

#[derive(Serialize)]
struct CreateChatRequest<'a> {
    name: &'a str,
    owner: &'a str,
    #[serde(rename = "useridlist")]
    user_ids: &'a [String],
}

#[derive(Deserialize)]
struct ChatCreated {
    #[serde(default, rename = "chatid")]
    chat_id: String,
}

#[derive(Deserialize)]
struct UnionIdResolved {
    #[serde(default, rename = "userid")]
    user_id: String,
}

/// Contact directory client.
///
/// Stateless apart from its transport; cloning is cheap and clones share the
/// underlying connection pool.
#[derive(Clone)]
pub struct ContactClient {
    transport: Arc<dyn OapiTransport>,
}

impl ContactClient {
    #[must_use]
    pub fn new(transport: Arc<dyn OapiTransport>) -> Self {
        Self { transport }
    }

    /// Client over [`HttpOapiTransport`] built from `config`.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn from_config(config: &ContactClientConfig) -> Result<Self, ConfigError> {
        let transport = HttpOapiTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<T, ContactError> {
        let document = self.transport.invoke(path, query, body).await?;
        Ok(serde_json::from_value(document)?)
    }
}

impl std::fmt::Debug for ContactClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl ContactApi for ContactClient {
    #[instrument(name = "contact.auth_scopes", skip(self))]
    async fn auth_scopes(&self) -> Result<AuthScopes, ContactError> {
        self.call(AUTH_SCOPES, &[], None).await
    }

    #[instrument(name = "contact.department_list", skip(self))]
    async fn department_list(&self) -> Result<DepartmentList, ContactError> {
        let list: DepartmentList = self.call(DEPARTMENT_LIST, &[], None).await?;
        debug!(count = list.departments.len(), "departments listed");
        Ok(list)
    }

    #[instrument(name = "contact.department_detail", skip(self))]
    async fn department_detail(&self, id: i64) -> Result<Department, ContactError> {
        let id = id.to_string();
        self.call(DEPARTMENT_GET, &[("id", id.as_str())], None).await
    }

    #[instrument(name = "contact.user_info", skip(self))]
    async fn user_info(&self, user_id: &str) -> Result<User, ContactError> {
        self.call(USER_GET, &[("userid", user_id), ("lang", USER_LANG)], None)
            .await
    }

    #[instrument(name = "contact.user_list", skip(self))]
    async fn user_list(&self, department_id: i64) -> Result<UserList, ContactError> {
        let department_id = department_id.to_string();
        let list: UserList = self
            .call(USER_LIST, &[("department_id", department_id.as_str())], None)
            .await?;
        debug!(
            count = list.users.len(),
            has_more = list.has_more,
            "department members listed"
        );
        Ok(list)
    }

    #[instrument(
        name = "contact.create_chat",
        skip(self, user_ids),
        fields(members = user_ids.len())
    )]
    async fn create_chat(
        &self,
        name: &str,
        owner: &str,
        user_ids: &[String],
    ) -> Result<String, ContactError> {
        let body = serde_json::to_value(CreateChatRequest {
            name,
            owner,
            user_ids,
        })?;
        let created: ChatCreated = self.call(CHAT_CREATE, &[], Some(&body)).await?;
        debug!(chat_id = %created.chat_id, "group conversation created");
        Ok(created.chat_id)
    }

    // The login code is single-use; keep it out of spans.
    #[instrument(name = "contact.user_info_by_code", skip_all)]
    async fn user_info_by_code(&self, code: &str) -> Result<User, ContactError> {
        self.call(USER_GET_USER_INFO, &[("code", code)], None).await
    }

    #[instrument(name = "contact.user_id_by_union_id", skip(self))]
    async fn user_id_by_union_id(&self, union_id: &str) -> Result<String, ContactError> {
        let resolved: UnionIdResolved = self
            .call(USER_GET_USERID_BY_UNIONID, &[("unionid", union_id)], None)
            .await?;
        Ok(resolved.user_id)
    }
}
