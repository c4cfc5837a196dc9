use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::api::MediaUrls;
use crate::config::AppConfig;
use crate::database::ContentRepository;
use crate::handlers::{admin, collection, pro, public};
use crate::middleware::{app_key_middleware, jwt_auth_middleware};
use crate::services::SubscriptionGate;
use crate::soap::{SubscriptionClient, SubscriptionError};
use crate::storage::MediaStore;

/// Everything a handler needs. Built once at startup; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ContentRepository>,
    pub subscriptions: SubscriptionClient,
    pub gate: SubscriptionGate,
    pub media: MediaUrls,
    pub store: MediaStore,
    pub jwt_secret: Arc<str>,
    pub app_key: Arc<str>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        subscriptions: SubscriptionClient,
        media: MediaUrls,
        store: MediaStore,
        jwt_secret: &str,
        app_key: &str,
    ) -> Self {
        Self {
            repository,
            gate: SubscriptionGate::new(subscriptions.clone()),
            subscriptions,
            media,
            store,
            jwt_secret: Arc::from(jwt_secret),
            app_key: Arc::from(app_key),
        }
    }

    pub fn from_config(config: &AppConfig, repository: Arc<dyn ContentRepository>) -> Result<Self, SubscriptionError> {
        Ok(Self::new(
            repository,
            SubscriptionClient::from_config(&config.subscription)?,
            MediaUrls::new(&config.server.public_url),
            MediaStore::new(config.storage.root.clone()),
            &config.security.jwt_secret,
            &config.security.app_key,
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub request_logging: bool,
}

impl RouterOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cors_origins: config.security.cors_origins.clone(),
            request_logging: config.api.enable_request_logging,
        }
    }
}

pub fn app(state: AppState, options: &RouterOptions) -> Router {
    let images = ServeDir::new(state.store.images_dir());

    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(pro_routes(&state))
        .merge(collection_routes(&state))
        .merge(admin_routes(&state))
        .nest_service("/public", images)
        .with_state(state)
        .layer(cors_layer(&options.cors_origins));

    if options.request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn pro_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/pro/creator", get(pro::creator_list))
        .route("/pro/creator/:creator_id/collection", get(pro::creator_collections))
        .route("/pro/creator/:creator_id/recipes", get(pro::creator_recipes))
        .route("/pro/collection/:collection_id", get(pro::collection_get))
        .route("/pro/collection/:collection_id/recipes", get(pro::collection_recipes))
        .route("/pro/recipe/:recipe_id", get(pro::recipe_get))
        .route("/pro/recipe/:recipe_id/video", get(pro::recipe_video))
        .route_layer(middleware::from_fn_with_state(state.clone(), app_key_middleware))
}

fn collection_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::delete;

    Router::new()
        .route(
            "/collection",
            get(collection::collection_list).post(collection::collection_create),
        )
        .route(
            "/collection/:id",
            get(collection::collection_get)
                .put(collection::collection_update)
                .delete(collection::collection_delete),
        )
        .route(
            "/collection/:id/recipes",
            get(collection::collection_recipe_list).post(collection::collection_recipe_add),
        )
        .route("/collection/:id/recipes/:recipe_id", delete(collection::collection_recipe_remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/subscription", get(admin::subscription_list))
        .route("/subscription/approve", post(admin::subscription_approve))
        .route("/subscription/reject", post(admin::subscription_reject))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
