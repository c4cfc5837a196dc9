#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use tower::ServiceExt;

use cooklyst_api_rust::api::MediaUrls;
use cooklyst_api_rust::app::{app, AppState, RouterOptions};
use cooklyst_api_rust::auth::{generate_jwt, Claims};
use cooklyst_api_rust::database::models::{Collection, CollectionDetail, Creator, Recipe};
use cooklyst_api_rust::database::{ContentRepository, DatabaseError};
use cooklyst_api_rust::soap::{SoapTransport, SubscriptionClient, SubscriptionError};
use cooklyst_api_rust::storage::MediaStore;
use cooklyst_api_rust::types::UserId;

pub const APP_KEY: &str = "test-app-key";
pub const JWT_SECRET: &str = "test-jwt-secret";
pub const SOAP_SECRET: &str = "soap-secret";
pub const PUBLIC_URL: &str = "http://media.test";

pub const ADMIN: i32 = 1;
pub const ANA: i32 = 7;
pub const BEN: i32 = 8;
pub const SAM: i32 = 42;

// ---------------------------------------------------------------------------
// In-memory repository

#[derive(Default)]
struct Store {
    users: Vec<(Creator, bool)>,
    recipes: Vec<Recipe>,
    collections: Vec<Collection>,
    links: Vec<(i32, i32)>,
    next_collection_id: i32,
}

impl Store {
    fn detail(&self, collection: &Collection) -> CollectionDetail {
        let creator_name = self
            .users
            .iter()
            .find(|(u, _)| u.id == collection.user_id)
            .map(|(u, _)| u.name.clone())
            .unwrap_or_default();

        let first_recipe_image = self
            .links
            .iter()
            .filter(|(c, _)| *c == collection.id)
            .map(|(_, r)| *r)
            .min()
            .and_then(|id| self.recipes.iter().find(|r| r.id == id))
            .map(|r| r.image_path.clone());

        CollectionDetail {
            collection: collection.clone(),
            creator_name,
            first_recipe_image,
        }
    }
}

#[derive(Default)]
pub struct InMemoryRepository {
    store: Mutex<Store>,
    pub failing: AtomicBool,
}

pub fn created_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 30, 0).unwrap()
}

impl InMemoryRepository {
    /// Admin 1, creators Ana (7) and Ben (8), and Sam (42) who mostly reads.
    ///
    /// Ana owns recipes 100 (pasta) and 101 (soup); collection 10 links both,
    /// collection 11 is empty. Ben owns recipe 200 and collection 20.
    pub fn seeded() -> Self {
        let repo = Self::default();
        {
            let mut s = repo.store.lock().unwrap();
            s.users = vec![
                (Creator { id: ADMIN, username: "root".into(), name: "Root".into() }, true),
                (Creator { id: ANA, username: "ana".into(), name: "Ana".into() }, false),
                (Creator { id: BEN, username: "ben".into(), name: "Ben".into() }, false),
                (Creator { id: SAM, username: "sam".into(), name: "Sam".into() }, false),
            ];
            s.recipes = vec![
                recipe(100, ANA, "Pasta", "pasta.jpg", "pasta.mp4"),
                recipe(101, ANA, "Soup", "soup.jpg", "soup.mp4"),
                recipe(200, BEN, "Bread", "bread.jpg", "bread.mp4"),
            ];
            s.collections = vec![
                collection(10, ANA, "Weeknight", 2),
                collection(11, ANA, "Empty", 0),
                collection(20, BEN, "Bakery", 1),
            ];
            // linked newest first; the cover still comes from the lowest id
            s.links = vec![(10, 101), (10, 100), (20, 200)];
            s.next_collection_id = 30;
        }
        repo
    }

    pub fn collection(&self, id: i32) -> Option<Collection> {
        let s = self.store.lock().unwrap();
        s.collections.iter().find(|c| c.id == id).cloned()
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DatabaseError::Connection("repository offline".into()))
        } else {
            Ok(())
        }
    }
}

fn recipe(id: i32, user_id: i32, title: &str, image: &str, video: &str) -> Recipe {
    Recipe {
        id,
        title: title.into(),
        desc: format!("{} description", title),
        tag: "dinner".into(),
        difficulty: "easy".into(),
        video_path: video.into(),
        duration: 30,
        image_path: image.into(),
        created_at: created_at(),
        user_id,
    }
}

fn collection(id: i32, user_id: i32, title: &str, total_recipe: i32) -> Collection {
    Collection {
        id,
        title: title.into(),
        created_at: created_at(),
        total_recipe,
        user_id,
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.check()
    }

    async fn list_creators(&self) -> Result<Vec<Creator>, DatabaseError> {
        self.check()?;
        let s = self.store.lock().unwrap();
        Ok(s.users.iter().filter(|(_, admin)| !admin).map(|(u, _)| u.clone()).collect())
    }

    async fn find_creator(&self, id: UserId) -> Result<Option<Creator>, DatabaseError> {
        self.check()?;
        let s = self.store.lock().unwrap();
        Ok(s.users
            .iter()
            .find(|(u, admin)| u.id == id.get() && !admin)
            .map(|(u, _)| u.clone()))
    }

    async fn find_collection(&self, id: i32) -> Result<Option<CollectionDetail>, DatabaseError> {
        self.check()?;
        let s = self.store.lock().unwrap();
        Ok(s.collections.iter().find(|c| c.id == id).map(|c| s.detail(c)))
    }

    async fn collections_by_owner(&self, owner: UserId) -> Result<Vec<CollectionDetail>, DatabaseError> {
        self.check()?;
        let s = self.store.lock().unwrap();
        Ok(s.collections
            .iter()
            .filter(|c| c.user_id == owner.get())
            .map(|c| s.detail(c))
            .collect())
    }

    async fn collection_recipes(&self, collection_id: i32) -> Result<Vec<Recipe>, DatabaseError> {
        self.check()?;
        let s = self.store.lock().unwrap();
        let mut ids: Vec<i32> = s.links.iter().filter(|(c, _)| *c == collection_id).map(|(_, r)| *r).collect();
        ids.sort_unstable();
        Ok(ids
            .into_iter()
            .filter_map(|id| s.recipes.iter().find(|r| r.id == id).cloned())
            .collect())
    }

    async fn find_recipe(&self, id: i32) -> Result<Option<Recipe>, DatabaseError> {
        self.check()?;
        let s = self.store.lock().unwrap();
        Ok(s.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn recipes_by_owner(&self, owner: UserId) -> Result<Vec<Recipe>, DatabaseError> {
        self.check()?;
        let s = self.store.lock().unwrap();
        Ok(s.recipes.iter().filter(|r| r.user_id == owner.get()).cloned().collect())
    }

    async fn create_collection(&self, owner: UserId, title: &str) -> Result<Collection, DatabaseError> {
        self.check()?;
        let mut s = self.store.lock().unwrap();
        let id = s.next_collection_id;
        s.next_collection_id += 1;
        let created = collection(id, owner.get(), title, 0);
        s.collections.push(created.clone());
        Ok(created)
    }

    async fn rename_collection(&self, id: i32, title: &str) -> Result<(), DatabaseError> {
        self.check()?;
        let mut s = self.store.lock().unwrap();
        let c = s
            .collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DatabaseError::NotFound("Collection not found.".into()))?;
        c.title = title.to_string();
        Ok(())
    }

    async fn delete_collection(&self, id: i32) -> Result<(), DatabaseError> {
        self.check()?;
        let mut s = self.store.lock().unwrap();
        let before = s.collections.len();
        s.collections.retain(|c| c.id != id);
        if s.collections.len() == before {
            return Err(DatabaseError::NotFound("Collection not found.".into()));
        }
        s.links.retain(|(c, _)| *c != id);
        Ok(())
    }

    async fn add_recipe_to_collection(&self, collection_id: i32, recipe_id: i32) -> Result<bool, DatabaseError> {
        self.check()?;
        let mut s = self.store.lock().unwrap();
        if s.links.contains(&(collection_id, recipe_id)) {
            return Ok(false);
        }
        s.links.push((collection_id, recipe_id));
        if let Some(c) = s.collections.iter_mut().find(|c| c.id == collection_id) {
            c.total_recipe += 1;
        }
        Ok(true)
    }

    async fn remove_recipe_from_collection(&self, collection_id: i32, recipe_id: i32) -> Result<bool, DatabaseError> {
        self.check()?;
        let mut s = self.store.lock().unwrap();
        let before = s.links.len();
        s.links.retain(|link| *link != (collection_id, recipe_id));
        if s.links.len() == before {
            return Ok(false);
        }
        if let Some(c) = s.collections.iter_mut().find(|c| c.id == collection_id) {
            c.total_recipe = (c.total_recipe - 1).max(0);
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Stub subscription service

pub type Reply = Result<String, SubscriptionError>;

/// Answers envelopes the way the legacy service would, and records them.
///
/// Status lookups are keyed by (creator, subscriber) exactly as they appear
/// in the envelope; a pair with no entry fails with a transport error.
#[derive(Default)]
pub struct StubSubscriptionService {
    statuses: Mutex<HashMap<(String, String), Reply>>,
    delays: Mutex<HashMap<String, Duration>>,
    pending: Mutex<Option<Reply>>,
    command: Mutex<Option<Reply>>,
    pub sent: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl StubSubscriptionService {
    pub fn set_status(&self, creator: i32, subscriber: i32, label: &str) {
        self.statuses
            .lock()
            .unwrap()
            .insert((creator.to_string(), subscriber.to_string()), Ok(status_xml(label)));
    }

    pub fn set_status_reply(&self, creator: i32, subscriber: i32, reply: Reply) {
        self.statuses
            .lock()
            .unwrap()
            .insert((creator.to_string(), subscriber.to_string()), reply);
    }

    /// Delay every reply concerning `creator`.
    pub fn delay_creator(&self, creator: i32, delay: Duration) {
        self.delays.lock().unwrap().insert(creator.to_string(), delay);
    }

    pub fn set_pending(&self, reply: Reply) {
        *self.pending.lock().unwrap() = Some(reply);
    }

    pub fn set_command_phrase(&self, action: &str, phrase: &str) {
        *self.command.lock().unwrap() = Some(Ok(scalar_xml(action, phrase)));
    }

    pub fn set_command_reply(&self, reply: Reply) {
        *self.command.lock().unwrap() = Some(reply);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_envelope(&self) -> Option<String> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SoapTransport for StubSubscriptionService {
    async fn send(&self, envelope: String) -> Result<String, SubscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(envelope.clone());

        let creator = envelope_arg(&envelope, 1);
        if let Some(creator) = &creator {
            let delay = self.delays.lock().unwrap().get(creator).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
        }

        if envelope.contains("<getStatus ") {
            let key = (creator.unwrap_or_default(), envelope_arg(&envelope, 2).unwrap_or_default());
            return self
                .statuses
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .unwrap_or_else(|| Err(SubscriptionError::Transport("connection refused".into())));
        }
        if envelope.contains("<getPendingSubs ") {
            return self.pending.lock().unwrap().clone().unwrap_or_else(|| Ok(list_xml(&[])));
        }
        self.command
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(SubscriptionError::Transport("connection refused".into())))
    }
}

/// Text of `<argN xmlns="">...</argN>` in a request envelope.
pub fn envelope_arg(envelope: &str, index: usize) -> Option<String> {
    let open = format!("<arg{} xmlns=\"\">", index);
    let close = format!("</arg{}>", index);
    let start = envelope.find(&open)? + open.len();
    let end = envelope[start..].find(&close)? + start;
    Some(envelope[start..end].to_string())
}

pub fn scalar_xml(action: &str, value: &str) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" ?>",
            "<S:Envelope xmlns:S=\"http://schemas.xmlsoap.org/soap/envelope/\"><S:Body>",
            "<ns2:{action}Response xmlns:ns2=\"http://service.cooklyst/\"><return>{value}</return></ns2:{action}Response>",
            "</S:Body></S:Envelope>"
        ),
        action = action,
        value = value
    )
}

pub fn status_xml(label: &str) -> String {
    scalar_xml("getStatus", label)
}

/// `(creatorID, status, subscriberEmail, subscriberID)` per entry.
pub fn list_xml(entries: &[(i32, &str, &str, i32)]) -> String {
    let returns: String = entries
        .iter()
        .map(|(creator, status, email, subscriber)| {
            format!(
                "<return><creatorID>{}</creatorID><status>{}</status><subscriberEmail>{}</subscriberEmail><subscriberID>{}</subscriberID></return>",
                creator, status, email, subscriber
            )
        })
        .collect();
    format!(
        concat!(
            "<S:Envelope xmlns:S=\"http://schemas.xmlsoap.org/soap/envelope/\"><S:Body>",
            "<ns2:getPendingSubsResponse xmlns:ns2=\"http://service.cooklyst/\">{}</ns2:getPendingSubsResponse>",
            "</S:Body></S:Envelope>"
        ),
        returns
    )
}

pub fn fault_xml(reason: &str) -> String {
    format!(
        concat!(
            "<S:Envelope xmlns:S=\"http://schemas.xmlsoap.org/soap/envelope/\"><S:Body>",
            "<S:Fault><faultcode>S:Server</faultcode><faultstring>{}</faultstring></S:Fault>",
            "</S:Body></S:Envelope>"
        ),
        reason
    )
}

// ---------------------------------------------------------------------------
// Application under test

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryRepository>,
    pub soap: Arc<StubSubscriptionService>,
    pub storage: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        let storage = scratch_dir();
        Self::with_storage(storage)
    }

    pub fn with_storage(storage: PathBuf) -> Self {
        let repo = Arc::new(InMemoryRepository::seeded());
        let soap = Arc::new(StubSubscriptionService::default());

        let state = AppState::new(
            repo.clone(),
            SubscriptionClient::new(soap.clone(), SOAP_SECRET),
            MediaUrls::new(PUBLIC_URL),
            MediaStore::new(storage.clone()),
            JWT_SECRET,
            APP_KEY,
        );
        let router = app(state, &RouterOptions::default());

        Self { router, repo, soap, storage }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// GET on the pro surface with the app key set.
    pub async fn pro_get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).header("X-API-KEY", APP_KEY).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn authed(&self, method: &str, uri: &str, user: i32, admin: bool, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token(user, admin)));
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }
}

pub fn token(user: i32, admin: bool) -> String {
    let claims = Claims::new(UserId::new(user).unwrap(), admin, 1);
    generate_jwt(&claims, JWT_SECRET).unwrap()
}

/// Fresh directory under the system temp dir with `images/` and `videos/`.
pub fn scratch_dir() -> PathBuf {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let dir = std::env::temp_dir().join(format!(
        "cooklyst-test-{}-{}",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::SeqCst)
    ));
    std::fs::create_dir_all(dir.join("images")).unwrap();
    std::fs::create_dir_all(dir.join("videos")).unwrap();
    dir
}
