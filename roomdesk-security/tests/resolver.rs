use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use roomdesk_security::{
    decide_navigation, DirectoryConfig, DirectoryError, InMemoryUserDirectory, Navigation,
    RestUserDirectory, Role, SessionResolver, UserDirectory, UserRecord,
};
use serde_json::{json, Value};

fn user(external_id: &str, role: Role) -> UserRecord {
    UserRecord {
        id: "1".into(),
        name: "Ana".into(),
        surname: "Rojas".into(),
        email: "ana.rojas@uni.cl".into(),
        role,
        external_id: external_id.into(),
    }
}

struct FailingDirectory;

impl UserDirectory for FailingDirectory {
    fn find_active(
        &self,
        _key: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, DirectoryError>> + Send {
        std::future::ready(Err(DirectoryError::Request("connection refused".into())))
    }

    fn probe(&self) -> impl Future<Output = Result<(), DirectoryError>> + Send {
        std::future::ready(Err(DirectoryError::Status(503)))
    }
}

// ── Outcomes ──

#[tokio::test]
async fn absent_empty_and_blank_tokens_resolve_to_login() {
    let directory = Arc::new(InMemoryUserDirectory::new().with_user(user("19224666K", Role::Teacher)));
    let resolver = SessionResolver::new(Arc::clone(&directory));

    for token in [None, Some(""), Some("   "), Some("\t\n")] {
        let resolved = resolver.resolve(token).await;
        assert_eq!(resolved, None);
        assert_eq!(decide_navigation(resolved.as_ref()), Navigation::Redirect("/login"));
    }
    assert_eq!(directory.lookups(), 0, "blank tokens must not reach the directory");
}

#[tokio::test]
async fn unknown_token_resolves_to_login() {
    let resolver = SessionResolver::new(InMemoryUserDirectory::new());
    let resolved = resolver.resolve(Some("11.111.111-1")).await;
    assert_eq!(resolved, None);
    assert_eq!(decide_navigation(resolved.as_ref()), Navigation::Redirect("/login"));
}

#[tokio::test]
async fn inactive_user_is_not_found() {
    let resolver = SessionResolver::new(
        InMemoryUserDirectory::new().with_inactive_user(user("19224666K", Role::Staff)),
    );
    assert_eq!(resolver.resolve(Some("19224666K")).await, None);
}

#[tokio::test]
async fn lookup_failure_is_indistinguishable_from_not_found() {
    let failing = SessionResolver::new(FailingDirectory);
    let empty = SessionResolver::new(InMemoryUserDirectory::new());

    let a = failing.resolve(Some("19224666K")).await;
    let b = empty.resolve(Some("19224666K")).await;
    assert_eq!(a, b);
    assert_eq!(decide_navigation(a.as_ref()), Navigation::Redirect("/login"));
}

#[tokio::test]
async fn matching_active_user_resolves_without_redirect() {
    let expected = user("19224666K", Role::Student);
    let resolver = SessionResolver::new(InMemoryUserDirectory::new().with_user(expected.clone()));

    let resolved = resolver.resolve(Some("19224666K")).await;
    assert_eq!(resolved.as_ref(), Some(&expected));
    assert_eq!(decide_navigation(resolved.as_ref()), Navigation::Stay);
}

#[tokio::test]
async fn hyphenated_token_is_normalized_before_lookup() {
    let expected = user("19224666K", Role::Teacher);
    let resolver = SessionResolver::new(InMemoryUserDirectory::new().with_user(expected.clone()));
    assert_eq!(resolver.resolve(Some("19-224-666-K")).await, Some(expected));
}

#[tokio::test]
async fn resolving_twice_yields_the_same_record() {
    let directory = Arc::new(InMemoryUserDirectory::new().with_user(user("19224666K", Role::Admin)));
    let resolver = SessionResolver::new(Arc::clone(&directory));

    let first = resolver.resolve(Some("19.224.666-K")).await;
    let second = resolver.resolve(Some("19.224.666-K")).await;
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(directory.lookups(), 2, "no caching between resolutions");
}

#[tokio::test]
async fn failing_probe_does_not_change_the_outcome() {
    struct ProbeFails(InMemoryUserDirectory);

    impl UserDirectory for ProbeFails {
        fn find_active(
            &self,
            key: &str,
        ) -> impl Future<Output = Result<Option<UserRecord>, DirectoryError>> + Send {
            self.0.find_active(key)
        }

        fn probe(&self) -> impl Future<Output = Result<(), DirectoryError>> + Send {
            std::future::ready(Err(DirectoryError::Request("unreachable".into())))
        }
    }

    let expected = user("19224666K", Role::Teacher);
    let resolver = SessionResolver::new(ProbeFails(
        InMemoryUserDirectory::new().with_user(expected.clone()),
    ))
    .with_probe(true);
    assert_eq!(resolver.resolve(Some("19224666K")).await, Some(expected));
}

// ── REST directory against a fake PostgREST endpoint ──

const APIKEY: &str = "anon-key";

async fn usuarios(
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    rows: Value,
) -> impl IntoResponse {
    let authorized = headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(APIKEY)
        && headers.get("authorization").and_then(|v| v.to_str().ok())
            == Some(&format!("Bearer {APIKEY}")[..]);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "bad key" }))).into_response();
    }

    let matches = query.get("select").map(String::as_str) == Some("id,nombre,apellido,email,rol,rut")
        && query.get("rut").map(String::as_str) == Some("eq.19224666K")
        && query.get("activo").map(String::as_str) == Some("eq.true")
        && query.get("limit").map(String::as_str) == Some("1");

    if matches {
        Json(rows).into_response()
    } else {
        Json(json!([])).into_response()
    }
}

async fn spawn_directory(rows: Value) -> String {
    let app = Router::new()
        .route(
            "/rest/v1/usuarios",
            get(move |query: Query<HashMap<String, String>>, headers: HeaderMap| {
                usuarios(query, headers, rows.clone())
            }),
        )
        .route("/rest/v1/", get(|| async { Json(json!({})) }))
        .route(
            "/broken/rest/v1/usuarios",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn row(rol: &str) -> Value {
    json!([{
        "id": 12,
        "nombre": "Ana",
        "apellido": "Rojas",
        "email": "ana.rojas@uni.cl",
        "rol": rol,
        "rut": "19224666K"
    }])
}

#[tokio::test]
async fn rest_directory_sends_the_active_user_query() {
    let base = spawn_directory(row("teacher")).await;
    let directory = RestUserDirectory::new(DirectoryConfig::new(&base, APIKEY)).unwrap();

    let found = directory.find_active("19224666K").await.unwrap().unwrap();
    assert_eq!(found.id, "12");
    assert_eq!(found.role, Role::Teacher);
    assert_eq!(found.external_id, "19224666K");

    assert_eq!(directory.find_active("11111111").await.unwrap(), None);
    assert!(directory.probe().await.is_ok());
}

#[tokio::test]
async fn rest_directory_reports_status_and_bad_rows() {
    let base = spawn_directory(row("janitor")).await;

    let directory = RestUserDirectory::new(DirectoryConfig::new(&base, APIKEY)).unwrap();
    assert!(matches!(
        directory.find_active("19224666K").await,
        Err(DirectoryError::InvalidRow(_))
    ));

    let wrong_key = RestUserDirectory::new(DirectoryConfig::new(&base, "other")).unwrap();
    assert!(matches!(
        wrong_key.find_active("19224666K").await,
        Err(DirectoryError::Status(401))
    ));

    let broken = RestUserDirectory::new(DirectoryConfig::new(format!("{base}/broken"), APIKEY)).unwrap();
    assert!(matches!(
        broken.find_active("19224666K").await,
        Err(DirectoryError::Status(500))
    ));
}

#[tokio::test]
async fn resolver_over_rest_fails_closed() {
    let base = spawn_directory(row("superadmin")).await;
    let resolver = SessionResolver::new(RestUserDirectory::new(DirectoryConfig::new(&base, APIKEY)).unwrap())
        .with_probe(true);
    let resolved = resolver.resolve(Some("19-224-666-K")).await.unwrap();
    assert_eq!(resolved.role, Role::Superadmin);

    let bad_role = spawn_directory(row("janitor")).await;
    let resolver = SessionResolver::new(RestUserDirectory::new(DirectoryConfig::new(&bad_role, APIKEY)).unwrap());
    assert_eq!(resolver.resolve(Some("19224666K")).await, None);

    // Nothing listens on port 9 of the loopback interface.
    let unreachable = SessionResolver::new(
        RestUserDirectory::new(DirectoryConfig::new("http://127.0.0.1:9", APIKEY).with_connect_timeout(1)).unwrap(),
    );
    assert_eq!(unreachable.resolve(Some("19224666K")).await, None);
}
