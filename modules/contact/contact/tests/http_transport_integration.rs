//! End-to-end tests for `ContactClient` over `HttpOapiTransport`.
//!
//! Wires up: mock open API server → `ContactClientConfig` →
//! `ContactClient::from_config` → verifies wire shape and error mapping.

use contact::{ConfigError, ContactClient, ContactClientConfig, TlsRoots};
use contact_sdk::{ContactApi, ContactError, Department, OapiResponse};
use httpmock::prelude::*;
use serde_json::json;

const TOKEN: &str = "integration-token";

fn client_for(server: &MockServer) -> ContactClient {
    let config = ContactClientConfig {
        base_url: server.base_url(),
        allow_insecure_http: true,
        ..ContactClientConfig::new(TOKEN)
    };
    ContactClient::from_config(&config).unwrap()
}

fn assert_no_secrets(err: &ContactError, server: &MockServer) {
    let text = err.to_string();
    assert!(!text.contains(TOKEN), "token leaked into error: {text}");
    assert!(
        !text.contains(&server.base_url()),
        "URL leaked into error: {text}"
    );
}

#[tokio::test]
async fn department_detail_round_trip() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/department/get")
            .query_param("access_token", TOKEN)
            .query_param("id", "5");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "errcode": 0,
                "errmsg": "ok",
                "id": 5,
                "name": "Engineering",
                "parentId": 1
            }));
    });

    let department = client_for(&server).department_detail(5).await.unwrap();

    let expected = Department {
        envelope: OapiResponse {
            err_code: 0,
            err_msg: "ok".to_owned(),
        },
        id: 5,
        name: "Engineering".to_owned(),
        parent_id: 1,
        ..Department::default()
    };
    assert_eq!(department, expected);
    mock.assert_calls(1);
}

#[tokio::test]
async fn user_info_sends_token_user_id_and_locale() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/user/get")
            .query_param("access_token", TOKEN)
            .query_param("userid", "zhangsan")
            .query_param("lang", "zh_CN");
        then.status(200).json_body(json!({
            "errcode": 0,
            "userid": "zhangsan",
            "name": "Zhang San",
            "isLeader": true,
            "department": [1, 5]
        }));
    });

    let user = client_for(&server).user_info("zhangsan").await.unwrap();

    assert_eq!(user.user_id, "zhangsan");
    assert!(user.is_leader);
    assert_eq!(user.department, vec![1, 5]);
    mock.assert_calls(1);
}

#[tokio::test]
async fn user_list_sends_department_id() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/user/list")
            .query_param("access_token", TOKEN)
            .query_param("department_id", "42");
        then.status(200).json_body(json!({
            "errcode": 0,
            "hasMore": true,
            "userlist": [{"userid": "u1"}, {"userid": "u2"}]
        }));
    });

    let list = client_for(&server).user_list(42).await.unwrap();

    assert!(list.has_more);
    assert_eq!(list.users.len(), 2);
    mock.assert_calls(1);
}

#[tokio::test]
async fn create_chat_posts_json_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/create")
            .query_param("access_token", TOKEN)
            .header("content-type", "application/json")
            .json_body(json!({
                "name": "Release",
                "owner": "u1",
                "useridlist": ["u1", "u2"]
            }));
        then.status(200).json_body(json!({
            "errcode": 0,
            "errmsg": "ok",
            "chatid": "chat-abc"
        }));
    });

    let chat_id = client_for(&server)
        .create_chat("Release", "u1", &["u1".to_owned(), "u2".to_owned()])
        .await
        .unwrap();

    assert_eq!(chat_id, "chat-abc");
    mock.assert_calls(1);
}

#[tokio::test]
async fn identity_lookups_use_their_endpoints() {
    let server = MockServer::start();
    let by_code = server.mock(|when, then| {
        when.method(GET)
            .path("/user/getuserinfo")
            .query_param("code", "login-code");
        then.status(200)
            .json_body(json!({"errcode": 0, "userid": "u5", "sys_level": 1}));
    });
    let by_union = server.mock(|when, then| {
        when.method(GET)
            .path("/user/getUseridByUnionid")
            .query_param("unionid", "union-5");
        then.status(200)
            .json_body(json!({"errcode": 0, "contactType": 0, "userid": "u5"}));
    });

    let client = client_for(&server);
    let user = client.user_info_by_code("login-code").await.unwrap();
    let user_id = client.user_id_by_union_id("union-5").await.unwrap();

    assert_eq!(user.user_id, "u5");
    assert_eq!(user.sys_level, 1);
    assert_eq!(user_id, "u5");
    by_code.assert_calls(1);
    by_union.assert_calls(1);
}

#[tokio::test]
async fn scopes_and_department_list() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/auth/scopes");
        then.status(200).json_body(json!({
            "errcode": 0,
            "auth_user_field": ["name", "email"],
            "condition_field": [],
            "auth_org_scopes": {"authed_dept": [1], "authed_user": []}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/department/list");
        then.status(200).json_body(json!({
            "errcode": 0,
            "department": [
                {"id": 1, "name": "Root", "deptManagerUseridList": "boss"},
                {"id": 5, "name": "Engineering", "parentid": 1}
            ]
        }));
    });

    let client = client_for(&server);
    let scopes = client.auth_scopes().await.unwrap();
    let list = client.department_list().await.unwrap();

    assert_eq!(scopes.auth_org_scopes.authed_dept, vec![1]);
    assert_eq!(scopes.auth_user_field, vec!["name", "email"]);
    assert_eq!(list.departments.len(), 2);
    assert_eq!(list.departments[0].dept_manager_userid_list, "boss");
    assert_eq!(list.departments[1].parent_id, 1);
}

#[tokio::test]
async fn envelope_error_becomes_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/user/get");
        then.status(200)
            .json_body(json!({"errcode": 60121, "errmsg": "user not found"}));
    });

    let err = client_for(&server).user_info("ghost").await.unwrap_err();

    match &err {
        ContactError::Api { code, message } => {
            assert_eq!(*code, 60121);
            assert_eq!(message, "user not found");
        }
        other => panic!("expected Api, got {other:?}"),
    }
    assert_no_secrets(&err, &server);
}

#[tokio::test]
async fn http_error_status_becomes_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/department/get");
        then.status(500)
            .body(format!("internal error for access_token={TOKEN}"));
    });

    let err = client_for(&server).department_detail(5).await.unwrap_err();

    match &err {
        ContactError::Transport { message } => assert!(message.contains("500")),
        other => panic!("expected Transport, got {other:?}"),
    }
    assert_no_secrets(&err, &server);
}

#[tokio::test]
async fn malformed_json_becomes_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/department/list");
        then.status(200)
            .header("content-type", "application/json")
            .body("{\"errcode\": 0, \"department\": [");
    });

    let err = client_for(&server).department_list().await.unwrap_err();

    assert!(matches!(err, ContactError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn non_object_document_becomes_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/auth/scopes");
        then.status(200).json_body(json!(["not", "an", "object"]));
    });

    let err = client_for(&server).auth_scopes().await.unwrap_err();

    assert!(matches!(err, ContactError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_becomes_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ContactClientConfig {
        base_url: format!("http://127.0.0.1:{port}/"),
        allow_insecure_http: true,
        ..ContactClientConfig::new(TOKEN)
    };
    let client = ContactClient::from_config(&config).unwrap();

    let err = client.department_detail(1).await.unwrap_err();

    assert!(matches!(err, ContactError::Transport { .. }), "got {err:?}");
    assert!(!err.to_string().contains(TOKEN));
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/gateway/dingtalk/department/get");
        then.status(200).json_body(json!({"errcode": 0, "id": 7}));
    });
    let config = ContactClientConfig {
        base_url: format!("{}/gateway/dingtalk", server.base_url()),
        allow_insecure_http: true,
        ..ContactClientConfig::new(TOKEN)
    };

    let department = ContactClient::from_config(&config)
        .unwrap()
        .department_detail(7)
        .await
        .unwrap();

    assert_eq!(department.id, 7);
    mock.assert_calls(1);
}

#[tokio::test]
async fn plain_http_requires_opt_in() {
    let server = MockServer::start();
    let config = ContactClientConfig {
        base_url: server.base_url(),
        ..ContactClientConfig::new(TOKEN)
    };

    let err = ContactClient::from_config(&config).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
}

#[tokio::test]
async fn native_roots_build_or_report_tls_error() {
    let config = ContactClientConfig {
        tls_roots: TlsRoots::Native,
        ..ContactClientConfig::new(TOKEN)
    };

    match ContactClient::from_config(&config) {
        Ok(_) | Err(ConfigError::Http(dingtalk_http::HttpError::Tls(_))) => {}
        Err(other) => panic!("expected a client or a TLS error, got {other:?}"),
    }
}

#[derive(Clone, Default)]
struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn token_and_login_code_stay_out_of_logs() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/user/getuserinfo");
        then.status(200)
            .json_body(json!({"errcode": 40078, "errmsg": "code expired"}));
    });

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let err = client_for(&server)
        .user_info_by_code("one-time-login-code")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(40078));

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("open API rejected the call"), "logs: {output}");
    assert!(output.contains("user/getuserinfo"), "logs: {output}");
    assert!(!output.contains(TOKEN), "token leaked into logs: {output}");
    assert!(
        !output.contains("one-time-login-code"),
        "login code leaked into logs: {output}"
    );
}
