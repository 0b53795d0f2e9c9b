// market-client/tests/portal_integration.rs
// Portal against a scripted in-memory backend

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use market_client::{
    AppForm, ClientError, ClientResult, EditOptions, ErrorCode, HttpClient, IconField, LoadState,
    Portal, Role, Session, TagForm,
};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

const ADMIN: &str = "admin@example.com";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone)]
enum Reply {
    Ok(Value),
    Err(u16, &'static str),
}

#[derive(Debug, Clone)]
struct Call {
    route: String,
    body: Option<Value>,
}

/// Routes are keyed by `"METHOD path"`; each holds a queue of replies whose
/// last entry keeps answering once the others are used up
#[derive(Default)]
struct MockClient {
    routes: Mutex<HashMap<String, VecDeque<(Duration, Reply)>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    fn route(self, route: &str, reply: Reply) -> Self {
        self.route_delayed(route, Duration::ZERO, reply)
    }

    fn route_delayed(self, route: &str, delay: Duration, reply: Reply) -> Self {
        self.routes
            .lock()
            .entry(route.to_string())
            .or_default()
            .push_back((delay, reply));
        self
    }

    async fn respond<T: DeserializeOwned>(
        &self,
        route: String,
        body: Option<Value>,
    ) -> ClientResult<T> {
        self.calls.lock().push(Call {
            route: route.clone(),
            body,
        });
        let (delay, reply) = {
            let mut routes = self.routes.lock();
            let queue = routes
                .get_mut(&route)
                .ok_or_else(|| ClientError::NotFound(route.clone()))?;
            if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue.front().cloned().unwrap()
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Ok(value) => Ok(serde_json::from_value(value)?),
            Reply::Err(status, message) => Err(ClientError::Api {
                status,
                message: message.to_string(),
            }),
        }
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.respond(format!("GET {path}"), None).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.respond(format!("POST {path}"), Some(body)).await
    }

    async fn patch<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.respond(format!("PATCH {path}"), Some(body)).await
    }

    async fn patch_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let params: serde_json::Map<String, Value> = query
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(v.as_str())))
            .collect();
        self.respond(format!("PATCH {path}"), Some(Value::Object(params)))
            .await
    }

    fn token(&self) -> Option<&str> {
        None
    }
}

fn catalog() -> Value {
    json!([
        {
            "id": 1,
            "name": "Jira",
            "description": "issue tracker",
            "icon": "https://icons.example.com/jira.svg",
            "url": "https://jira.example.com",
            "tags": [{"id": 1, "name": "Dev", "color": "#112233"}],
            "isFavourite": 0,
            "addedBy": ADMIN,
            "isActive": true,
            "versionName": "9.4",
            "userGroups": ["engineering"]
        },
        {
            "id": 2,
            "name": "Figma",
            "description": "design tool",
            "icon": "https://icons.example.com/figma.svg",
            "url": "https://figma.com",
            "tags": [{"id": 2, "name": "Design", "color": "#ff00ff"}],
            "isFavourite": 1,
            "addedBy": ADMIN,
            "versionName": "116",
            "userGroups": null
        }
    ])
}

fn tags() -> Value {
    json!([
        {"id": 1, "name": "Dev", "color": "#112233"},
        {"id": 2, "name": "Design", "color": "#ff00ff"}
    ])
}

fn admin() -> Session {
    Session::new(ADMIN, vec![Role::Admin, Role::Employee])
}

fn employee() -> Session {
    Session::new("dev@example.com", vec![Role::Employee])
}

fn calls(portal: &Portal<MockClient>) -> Vec<Call> {
    portal.api().client().calls.lock().clone()
}

fn routes(portal: &Portal<MockClient>) -> Vec<String> {
    calls(portal).into_iter().map(|c| c.route).collect()
}

#[tokio::test]
async fn test_search_over_user_catalog() {
    let client = MockClient::default().route("GET user-apps", Reply::Ok(catalog()));
    let portal = Portal::new(client, employee());

    portal.refresh_user_apps().await.unwrap();
    assert_eq!(portal.store().user_apps.state, LoadState::Success);

    let ids: Vec<_> = portal.search("design", &[]).iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2]);

    let ids: Vec<_> = portal.search("", &[1]).iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1]);

    let tag_names: Vec<_> = portal.available_tags().into_iter().map(|t| t.name).collect();
    assert_eq!(tag_names, vec!["Design", "Dev"]);

    let favs: Vec<_> = portal.favourites().into_iter().map(|e| e.id).collect();
    assert_eq!(favs, vec![2]);
}

#[tokio::test]
async fn test_superseded_fetch_is_cancelled() {
    init_tracing();
    let client = MockClient::default()
        .route_delayed(
            "GET apps",
            Duration::from_millis(200),
            Reply::Ok(json!([])),
        )
        .route("GET apps", Reply::Ok(catalog()));
    let portal = Portal::new(client, admin());

    let first = portal.refresh_apps();
    let second = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        portal.refresh_apps().await
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap_err().code, ErrorCode::RequestCancelled);
    second.unwrap();

    let store = portal.store();
    assert_eq!(store.apps.state, LoadState::Success);
    assert_eq!(store.apps.data.as_ref().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_fetches_of_different_kinds_do_not_cancel_each_other() {
    let client = MockClient::default()
        .route_delayed(
            "GET apps",
            Duration::from_millis(50),
            Reply::Ok(catalog()),
        )
        .route("GET tags", Reply::Ok(tags()));
    let portal = Portal::new(client, admin());

    let (apps, tags) = tokio::join!(portal.refresh_apps(), portal.refresh_tags());
    apps.unwrap();
    tags.unwrap();
}

#[tokio::test]
async fn test_failed_fetch_marks_slice() {
    let client = MockClient::default().route(
        "GET tags",
        Reply::Err(500, "Server error while fetching"),
    );
    let portal = Portal::new(client, employee());

    let err = portal.refresh_tags().await.unwrap_err();
    assert_eq!(err.message, "Server error while fetching");

    let store = portal.store();
    assert_eq!(store.tags.state, LoadState::Failed);
    assert_eq!(
        store.tags.error_message.as_deref(),
        Some("Server error while fetching")
    );
}

#[tokio::test]
async fn test_toggle_favourite_touches_only_flag() {
    let client = MockClient::default()
        .route("GET user-apps", Reply::Ok(catalog()))
        .route("PATCH user-apps", Reply::Ok(Value::Null));
    let portal = Portal::new(client, employee());
    portal.refresh_user_apps().await.unwrap();
    let before = portal.store().find_app(1).cloned().unwrap();

    assert!(portal.toggle_favourite(1).await.unwrap());

    let after = portal.store().find_app(1).cloned().unwrap();
    assert!(after.is_favourite);
    assert_eq!(after.name, before.name);
    assert_eq!(after.tags, before.tags);
    assert_eq!(after.is_active, before.is_active);

    let last = calls(&portal).pop().unwrap();
    assert_eq!(last.route, "PATCH user-apps");
    assert_eq!(last.body, Some(json!({"id": "1", "active": "1"})));

    assert_eq!(
        portal.toggle_favourite(42).await.unwrap_err().code,
        ErrorCode::AppNotFound
    );
}

#[tokio::test]
async fn test_failed_favourite_keeps_flag() {
    let client = MockClient::default()
        .route("GET user-apps", Reply::Ok(catalog()))
        .route("PATCH user-apps", Reply::Err(500, "Server error while updating"));
    let portal = Portal::new(client, employee());
    portal.refresh_user_apps().await.unwrap();

    let err = portal.toggle_favourite(2).await.unwrap_err();
    assert_eq!(err.message, "Server error while updating");
    assert!(portal.store().find_app(2).unwrap().is_favourite);
}

#[tokio::test]
async fn test_update_without_changes_sends_nothing() {
    let client = MockClient::default().route("GET apps", Reply::Ok(catalog()));
    let portal = Portal::new(client, admin());
    portal.refresh_apps().await.unwrap();

    let entry = portal.store().find_app(1).cloned().unwrap();
    let form = AppForm::from_entry(&entry, &EditOptions::default());

    let err = portal.update_app(1, &form).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NoChanges);
    assert_eq!(err.field_message("name"), Some("No changes detected"));
    assert_eq!(routes(&portal), vec!["GET apps"]);
}

#[tokio::test]
async fn test_update_sends_minimal_patch_and_refreshes() {
    init_tracing();
    let client = MockClient::default()
        .route("GET apps", Reply::Ok(catalog()))
        .route("GET user-apps", Reply::Ok(catalog()))
        .route("PATCH apps/1", Reply::Ok(Value::Null));
    let portal = Portal::new(client, admin());
    portal.refresh_apps().await.unwrap();

    let entry = portal.store().find_app(1).cloned().unwrap();
    let mut form = AppForm::from_entry(&entry, &EditOptions::default());
    form.url = " https://jira.example.org ".into();
    form.tags = vec![1];

    portal.update_app(1, &form).await.unwrap();

    let calls = calls(&portal);
    let routes: Vec<_> = calls.iter().map(|c| c.route.as_str()).collect();
    assert_eq!(routes[..2], ["GET apps", "PATCH apps/1"]);
    // Both catalogs are reloaded after the write
    assert_eq!(routes.len(), 4);
    assert!(routes[2..].contains(&"GET apps"));
    assert!(routes[2..].contains(&"GET user-apps"));
    assert_eq!(
        calls[1].body,
        Some(json!({"url": "https://jira.example.org", "updatedBy": ADMIN}))
    );
    assert_eq!(portal.store().submit_state.state, LoadState::Success);
    assert_eq!(portal.store().user_apps.state, LoadState::Success);
}

#[tokio::test]
async fn test_update_unknown_app() {
    let portal = Portal::new(MockClient::default(), admin());
    let form = AppForm {
        name: "Jira".into(),
        description: "issue tracker".into(),
        url: "https://jira.example.com".into(),
        version_name: "1".into(),
        ..AppForm::new()
    };
    let err = portal.update_app(7, &form).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AppNotFound);
    assert!(routes(&portal).is_empty());
}

#[tokio::test]
async fn test_missing_is_active_option() {
    let client = MockClient::default()
        .route("GET apps", Reply::Ok(catalog()))
        .route("GET user-apps", Reply::Ok(catalog()))
        .route("PATCH apps/2", Reply::Ok(Value::Null));
    let portal = Portal::new(client, admin())
        .with_options(EditOptions { missing_is_active: false });
    portal.refresh_apps().await.unwrap();

    // Figma carries no isActive; an active form now counts as a change
    let entry = portal.store().find_app(2).cloned().unwrap();
    let mut form = AppForm::from_entry(&entry, &EditOptions::default());
    form.is_active = true;
    portal.update_app(2, &form).await.unwrap();

    let patch = calls(&portal)[1].body.clone().unwrap();
    assert_eq!(patch, json!({"isActive": true, "updatedBy": ADMIN}));
}

#[tokio::test]
async fn test_create_app_validation_sends_nothing() {
    let portal = Portal::new(MockClient::default(), admin());
    let err = portal.create_app(&AppForm::new()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert_eq!(err.field_message("name"), Some("App name is required"));
    assert!(routes(&portal).is_empty());
}

fn grafana_form() -> AppForm {
    AppForm {
        name: "Grafana".into(),
        description: "Dashboards for everything".into(),
        url: "https://grafana.example.com".into(),
        version_name: "10.2".into(),
        tags: vec![1],
        user_groups: vec!["engineering".into()],
        is_active: true,
        icon: IconField::Upload(market_client::IconUpload::from_bytes(
            "grafana.svg",
            "image/svg+xml",
            b"<svg/>".to_vec(),
        )),
    }
}

#[tokio::test]
async fn test_create_app_posts_and_refreshes() {
    let client = MockClient::default()
        .route("POST apps", Reply::Ok(json!({"id": 3})))
        .route("GET apps", Reply::Ok(catalog()))
        .route("GET user-apps", Reply::Ok(json!([])))
        .route("GET user-apps", Reply::Ok(catalog()));
    let portal = Portal::new(client, admin());
    portal.refresh_user_apps().await.unwrap();
    assert!(portal.search("", &[]).is_empty());

    portal.create_app(&grafana_form()).await.unwrap();

    let calls = calls(&portal);
    assert_eq!(calls[1].route, "POST apps");
    let body = calls[1].body.as_ref().unwrap();
    assert_eq!(body["addedBy"], ADMIN);
    assert_eq!(body["userGroups"], json!(["engineering"]));
    assert!(body["icon"].as_str().unwrap().starts_with("data:image/svg+xml;base64,"));

    let refreshed: Vec<_> = calls[2..].iter().map(|c| c.route.as_str()).collect();
    assert_eq!(refreshed.len(), 2);
    assert!(refreshed.contains(&"GET apps"));
    assert!(refreshed.contains(&"GET user-apps"));

    // Views over the user's catalog see the reloaded listings
    assert_eq!(portal.search("", &[]).len(), 2);
    assert_eq!(portal.available_tags().len(), 2);
}

#[tokio::test]
async fn test_concurrent_submissions_do_not_cancel_each_other() {
    init_tracing();
    let client = MockClient::default()
        .route_delayed(
            "POST apps",
            Duration::from_millis(200),
            Reply::Ok(json!({"id": 3})),
        )
        .route("GET apps", Reply::Ok(catalog()))
        .route("GET user-apps", Reply::Ok(catalog()))
        .route("POST tags", Reply::Ok(Value::Null))
        .route("GET tags", Reply::Ok(tags()));
    let portal = Portal::new(client, admin());

    let form = grafana_form();
    let (app, tag) = tokio::join!(portal.create_app(&form), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        portal.create_tag(&TagForm::new("Ops", "#0af")).await
    });

    app.unwrap();
    tag.unwrap();
    let routes = routes(&portal);
    assert!(routes.contains(&"GET apps".to_string()));
    assert!(routes.contains(&"GET tags".to_string()));
    assert_eq!(portal.store().submit_state.state, LoadState::Success);
}

#[tokio::test]
async fn test_admin_operations_require_admin() {
    let portal = Portal::new(MockClient::default(), employee());

    let err = portal
        .create_tag(&TagForm::new("Ops", "#123"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AdminRequired);

    let err = portal.create_app(&AppForm::new()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AdminRequired);
    assert!(routes(&portal).is_empty());
}

#[tokio::test]
async fn test_create_tag_refreshes_tags() {
    let client = MockClient::default()
        .route("GET tags", Reply::Ok(tags()))
        .route("POST tags", Reply::Ok(Value::Null));
    let portal = Portal::new(client, admin());
    portal.refresh_tags().await.unwrap();

    portal
        .create_tag(&TagForm::new(" Ops ", "#0af"))
        .await
        .unwrap();

    let calls = calls(&portal);
    assert_eq!(calls[1].route, "POST tags");
    assert_eq!(
        calls[1].body,
        Some(json!({"name": "Ops", "color": "#0af", "addedBy": ADMIN}))
    );
    assert_eq!(calls[2].route, "GET tags");
}

#[tokio::test]
async fn test_duplicate_tag_rejected_locally() {
    let client = MockClient::default().route("GET tags", Reply::Ok(tags()));
    let portal = Portal::new(client, admin());
    portal.refresh_tags().await.unwrap();

    let err = portal
        .create_tag(&TagForm::new("design", "#000"))
        .await
        .unwrap_err();
    assert_eq!(err.field_message("name"), Some("Tag already exists"));
    assert_eq!(routes(&portal), vec!["GET tags"]);
}

#[tokio::test]
async fn test_load_user() {
    let client = MockClient::default().route(
        "GET user-info",
        Reply::Ok(json!({
            "employeeId": "E100",
            "firstName": "Sam",
            "lastName": "Lee",
            "workEmail": "sam@example.com",
            "jobRole": "Engineer"
        })),
    );
    let portal = Portal::new(client, employee());

    let user = portal.load_user().await.unwrap();
    assert_eq!(user.display_name(), "Sam Lee");
    assert_eq!(portal.store().user.state, LoadState::Success);
}
