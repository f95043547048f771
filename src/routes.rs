use std::sync::Arc;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    middleware::from_fn,
    routing::get,
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    handlers::{health_check, user::user_handler},
    middleware::logging_middleware,
    AppState,
};

// -- 配置所有路由
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    Router::new()
        .route("/health", get(health_check))
        .merge(user_handler())
        .layer(from_fn(logging_middleware))
        .layer(cors)
        .layer(Extension(app_state))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{body::Body, http::Request, http::StatusCode};
    use mongodb::bson::{oid::ObjectId, Document};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::Config,
        db::{StoreError, UserExt},
        models::User,
    };

    // -- 所有调用都失败的数据库
    struct DownStore;

    #[async_trait]
    impl UserExt for DownStore {
        async fn get_user(&self, _: ObjectId) -> Result<Option<User>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn save_user(&self, _: &User) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn update_user(&self, _: ObjectId, _: Document) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn delete_user(&self, _: ObjectId) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Timeout(std::time::Duration::from_secs(5)))
        }
    }

    fn router() -> Router {
        let env = Config::from_lookup(|name| {
            (name == "MONGODB_URL").then(|| "mongodb://localhost:27017".to_string())
        })
        .unwrap();
        create_router(Arc::new(AppState {
            env,
            db_client: Arc::new(DownStore),
        }))
    }

    #[tokio::test]
    async fn health_reports_unreachable_store() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unknown_routes_and_methods_are_rejected() {
        let response = router()
            .oneshot(Request::get("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router()
            .oneshot(Request::patch("/user").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
