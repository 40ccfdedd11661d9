// src/router.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn app_router(app_state: AppState) -> Router {
    // Rotas públicas da portaria
    let public_routes = Router::new()
        .route("/visitors/search", get(handlers::public::search_visitor))
        .route("/visitors/{id}/entry", post(handlers::public::register_entry));

    // Define as rotas de autenticação
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let session_routes = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Painel administrativo: o papel é conferido por RequireRole em cada handler
    let admin_routes = Router::new()
        .route("/dashboard/stats", get(handlers::dashboard::get_stats))
        .route("/dashboard/entries", get(handlers::dashboard::get_entries))
        .route("/dashboard/events", get(handlers::dashboard::get_events))
        .route(
            "/visitors",
            get(handlers::visitors::list_visitors).post(handlers::visitors::create_visitor),
        )
        .route(
            "/visitors/{id}",
            get(handlers::visitors::get_visitor)
                .put(handlers::visitors::update_visitor)
                .delete(handlers::visitors::delete_visitor),
        )
        .route(
            "/visitors/{id}/photo",
            put(handlers::photos::upload_photo)
                .layer(DefaultBodyLimit::max(app_state.config.max_photo_bytes)),
        )
        .route(
            "/custom-fields",
            get(handlers::custom_fields::list_fields).post(handlers::custom_fields::create_field),
        )
        .route(
            "/custom-fields/{id}",
            put(handlers::custom_fields::update_field).delete(handlers::custom_fields::delete_field),
        )
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/users/{id}", delete(handlers::users::delete_user))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(handlers::public::health))
        .route("/photos/{file}", get(handlers::photos::get_photo))
        .nest("/api/public", public_routes)
        .nest("/api/auth", auth_routes.merge(session_routes))
        .nest("/api/admin", admin_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        db::{
            memory::{
                visitor, MemoryCustomFieldStore, MemoryUserStore, MemoryVisitorStore,
                UnavailableVisitorStore,
            },
            VisitorStore,
        },
        models::{
            auth::{CreateUserPayload, Role},
            visitor::Visitor,
        },
        services::photo_storage::LocalPhotoStorage,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use futures::StreamExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct TestApp {
        state: AppState,
        users: Arc<MemoryUserStore>,
        _photos: tempfile::TempDir,
    }

    impl TestApp {
        fn new(visitors: Vec<Visitor>) -> Self {
            Self::with_store(Arc::new(MemoryVisitorStore::with(visitors)))
        }

        fn with_store(visitors: Arc<dyn VisitorStore>) -> Self {
            let photos = tempfile::tempdir().unwrap();
            let config = Config::from_lookup(|key| match key {
                "DATABASE_URL" => Some("postgres://unused".into()),
                "JWT_SECRET" => Some("segredo-de-teste".into()),
                "BCRYPT_COST" => Some("4".into()),
                "MAX_PHOTO_BYTES" => Some("1024".into()),
                _ => None,
            })
            .unwrap();

            let users = Arc::new(MemoryUserStore::default());
            let state = AppState::with_stores(
                config,
                visitors,
                Arc::new(MemoryCustomFieldStore::default()),
                users.clone(),
                Arc::new(LocalPhotoStorage::new(photos.path(), "http://localhost:3000")),
            );
            Self {
                state,
                users,
                _photos: photos,
            }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = app_router(self.state.clone())
                .oneshot(request)
                .await
                .unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, body)
        }

        async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
            let mut builder = Request::builder().uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            self.send(builder.body(Body::empty()).unwrap()).await
        }

        async fn post(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(Method::POST).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            self.send(builder.body(Body::empty()).unwrap()).await
        }

        async fn super_admin_token(&self) -> String {
            let auth = &self.state.auth_service;
            auth.ensure_bootstrap_admin("root@example.com", "senha-forte")
                .await
                .unwrap();
            auth.login("root@example.com", "senha-forte").await.unwrap().token
        }

        async fn admin_token(&self) -> String {
            let root_token = self.super_admin_token().await;
            let auth = &self.state.auth_service;
            let root = auth.validate_token(&root_token).await.unwrap();
            auth.create_user(
                &root,
                CreateUserPayload {
                    email: "guardia@example.com".into(),
                    password: "123456".into(),
                    full_name: "Guardia".into(),
                    role: Role::Admin,
                },
            )
            .await
            .unwrap();
            auth.login("guardia@example.com", "123456").await.unwrap().token
        }
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = TestApp::new(vec![]);
        let response = app_router(app.state.clone())
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_id_number_shows_not_found() {
        let app = TestApp::new(vec![]);
        let (status, body) = app
            .get("/api/public/visitors/search?idNumber=12345", None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decision"], "not_found");
        assert_eq!(body["headline"], "🚫 Visitante No Encontrado");
        assert_eq!(body["canRegisterEntry"], false);
    }

    #[tokio::test]
    async fn expired_visitor_shows_denied_state() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let app = TestApp::new(vec![visitor("12345", true, yesterday)]);
        let (status, body) = app
            .get("/api/public/visitors/search?idNumber=12345", None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decision"], "expired_authorization");
        assert_eq!(body["headline"], "🚫 Acceso No Autorizado");
        assert_eq!(body["expiredNotice"], "Autorización vencida");
    }

    #[tokio::test]
    async fn authorized_visitor_can_register_entry() {
        let next_week = Utc::now().date_naive() + Duration::days(7);
        let v = visitor("12345", true, next_week);
        let id = v.id;
        let app = TestApp::new(vec![v]);

        let (_, body) = app
            .get("/api/public/visitors/search?idNumber=12345", None)
            .await;
        assert_eq!(body["decision"], "authorized");
        assert_eq!(body["headline"], "✅ Visitante Autorizado");
        assert_eq!(body["canRegisterEntry"], true);

        let (status, body) = app
            .post(&format!("/api/public/visitors/{id}/entry"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["lastEntryAt"].is_string());
    }

    #[tokio::test]
    async fn denied_entry_is_unprocessable() {
        let v = visitor("999", false, Utc::now().date_naive() + Duration::days(7));
        let id = v.id;
        let app = TestApp::new(vec![v]);

        let (status, _) = app
            .post(&format!("/api/public/visitors/{id}/entry"), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn blank_search_is_a_bad_request() {
        let app = TestApp::new(vec![]);
        let (status, body) = app
            .get("/api/public/visitors/search?idNumber=%20%20", None)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Por favor ingrese un número de cédula");
    }

    #[tokio::test]
    async fn english_is_served_when_requested() {
        let app = TestApp::new(vec![]);
        let request = Request::builder()
            .uri("/api/public/visitors/search?idNumber=1")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .body(Body::empty())
            .unwrap();
        let (_, body) = app.send(request).await;
        assert_eq!(body["headline"], "🚫 Visitor Not Found");
    }

    #[tokio::test]
    async fn admin_routes_require_a_token() {
        let app = TestApp::new(vec![]);
        let (status, _) = app.get("/api/admin/visitors", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app.get("/api/admin/visitors", Some("lixo")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn user_management_is_super_admin_only() {
        let app = TestApp::new(vec![]);
        let admin = app.admin_token().await;

        let (status, _) = app.get("/api/admin/users", Some(&admin)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.get("/api/admin/dashboard/stats", Some(&admin)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn super_admin_lists_users() {
        let app = TestApp::new(vec![]);
        let root = app.super_admin_token().await;

        let (status, body) = app.get("/api/admin/users", Some(&root)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert!(body[0].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let app = TestApp::new(vec![]);
        let token = app.super_admin_token().await;

        let (status, body) = app.get("/api/auth/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "root@example.com");

        let (status, _) = app.post("/api/auth/logout", Some(&token)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.get("/api/auth/me", Some(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn histogram_days_are_bounded() {
        let app = TestApp::new(vec![]);
        let token = app.admin_token().await;

        let (status, body) = app.get("/api/admin/dashboard/entries", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(7));

        let (status, _) = app
            .get("/api/admin/dashboard/entries?days=91", Some(&token))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn photo_upload_checks_the_content_type() {
        let v = visitor("555", true, Utc::now().date_naive());
        let id = v.id;
        let app = TestApp::new(vec![v]);
        let token = app.admin_token().await;

        let upload = |content_type: &'static str| {
            Request::builder()
                .method(Method::PUT)
                .uri(format!("/api/admin/visitors/{id}/photo"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from("fake-image"))
                .unwrap()
        };

        let (status, _) = app.send(upload("text/plain")).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (status, body) = app.send(upload("image/webp")).await;
        assert_eq!(status, StatusCode::OK);
        let url = body["photoUrl"].as_str().unwrap().to_string();
        assert!(url.ends_with(".webp"));

        let file = url.rsplit('/').next().unwrap();
        let response = app_router(app.state.clone())
            .oneshot(
                Request::builder()
                    .uri(format!("/photos/{file}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/webp");
    }

    #[tokio::test]
    async fn visitor_crud_round_trip() {
        let app = TestApp::new(vec![]);
        let token = app.admin_token().await;
        let expiry = (Utc::now().date_naive() + Duration::days(30)).to_string();

        let create = Request::builder()
            .method(Method::POST)
            .uri("/api/admin/visitors")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({
                    "idNumber": " 1020304050 ",
                    "fullName": "María Gómez",
                    "company": "Andina",
                    "authorizationExpiry": expiry,
                })
                .to_string(),
            ))
            .unwrap();
        let (status, created) = app.send(create).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["idNumber"], "1020304050");
        assert_eq!(created["authorized"], true);

        let (status, listed) = app.get("/api/admin/visitors?q=andina", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().map(Vec::len), Some(1));

        let id = created["id"].as_str().unwrap();
        let delete = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/admin/visitors/{id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = app.send(delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.get(&format!("/api/admin/visitors/{id}"), Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn user_without_role_is_forbidden_from_the_panel() {
        let app = TestApp::new(vec![]);
        let hash = bcrypt::hash("123456", 4).unwrap();
        app.users.insert_without_role("visita@example.com", &hash);
        let token = app
            .state
            .auth_service
            .login("visita@example.com", "123456")
            .await
            .unwrap()
            .token;

        let (status, _) = app.get("/api/admin/visitors", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.get("/api/auth/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["role"].is_null());
    }

    #[tokio::test]
    async fn search_reports_an_unavailable_store() {
        let app = TestApp::with_store(Arc::new(UnavailableVisitorStore));
        let (status, _) = app
            .get("/api/public/visitors/search?idNumber=12345", None)
            .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn dashboard_stream_announces_entries() {
        let v = visitor("12345", true, Utc::now().date_naive() + Duration::days(7));
        let id = v.id;
        let app = TestApp::new(vec![v]);
        let token = app.admin_token().await;

        let response = app_router(app.state.clone())
            .oneshot(
                Request::builder()
                    .uri("/api/admin/dashboard/events")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));

        let (status, _) = app
            .post(&format!("/api/public/visitors/{id}/entry"), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let mut frames = response.into_body().into_data_stream();
        let frame = tokio::time::timeout(std::time::Duration::from_secs(5), frames.next())
            .await
            .expect("evento dentro do prazo")
            .expect("stream aberto")
            .unwrap();
        let text = String::from_utf8_lossy(&frame);
        assert!(text.contains("event: visitor_changed"));
        assert!(text.contains("entry_registered"));
        assert!(text.contains(&id.to_string()));
    }

    #[tokio::test]
    async fn dashboard_stream_requires_an_admin() {
        let app = TestApp::new(vec![]);
        let (status, _) = app.get("/api/admin/dashboard/events", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
