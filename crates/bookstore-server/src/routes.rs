use crate::{handlers, middleware::auth::require_access, state::AppState};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the API router. Every request, including unknown routes, passes
/// through the access table first.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/books", get(handlers::listing::list_books))
        .route("/api/authors", get(handlers::listing::list_authors))
        .route("/api/customers", get(handlers::listing::list_customers))
        .route("/api/users", get(handlers::listing::list_users))
        .layer(middleware::from_fn_with_state(state.clone(), require_access))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::{InMemoryCredentials, hash_password};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use bookstore_core::{Book, BookstoreConfig, Catalog, Customer};
    use bookstore_token::{Identity, KeyMaterial};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn book(id: i64, title: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            isbn: format!("978-{:010}", id),
            is_available_online: id % 2 == 1,
            author_ids: vec![1],
        }
    }

    fn test_app() -> Router {
        let mut creds = InMemoryCredentials::new();
        creds
            .insert(
                Identity::new("carroyom").with_role("App/Admin"),
                hash_password("admin-pw").unwrap(),
            )
            .unwrap();
        creds
            .insert(
                Identity::new("reader")
                    .with_role("App/Customer")
                    .with_claim("customer_id", "7"),
                hash_password("reader-pw").unwrap(),
            )
            .unwrap();

        let catalog = Catalog {
            books: vec![
                book(1, "Sapiens: A Brief History of Humankind"),
                book(2, "Homo Deus"),
                book(3, "21 Lessons for the 21st Century"),
            ],
            customers: vec![Customer {
                id: 7,
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            }],
            ..Catalog::default()
        };

        let state = AppState::new(
            &BookstoreConfig::default(),
            Arc::new(KeyMaterial::generate().unwrap()),
            Arc::new(creds),
            catalog,
        )
        .unwrap();
        router(Arc::new(state))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "username": username, "password": password }).to_string(),
            ))
            .unwrap();
        send(app, request).await
    }

    async fn token_for(app: &Router, username: &str, password: &str) -> String {
        let (status, body) = login(app, username, password).await;
        assert_eq!(status, StatusCode::OK);
        body["accessToken"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_healthz_is_public() {
        let app = test_app();
        let (status, body) = send(&app, get("/healthz", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let app = test_app();
        let (status, body) = login(&app, "carroyom", "admin-pw").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokenType"], "Bearer");
        assert_eq!(body["roles"], json!(["App/Admin"]));

        let token = body["accessToken"].as_str().unwrap();
        assert_eq!(token.split('.').count(), 3);

        let (status, me) = send(&app, get("/api/auth/me", Some(token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["subject"], "carroyom");
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let app = test_app();
        let (status, body) = login(&app, "carroyom", "nope").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_credentials");

        let (status, _) = login(&app, "nobody", "admin-pw").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_book_listing() {
        let app = test_app();
        let (status, body) = send(&app, get("/api/books?title=sapiens", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalItems"], 1);
        assert_eq!(body["items"][0]["id"], 1);

        let (status, body) = send(&app, get("/api/books?title=&size=2", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalItems"], 3);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["totalPages"], 2);
    }

    #[tokio::test]
    async fn test_book_listing_combines_title_and_availability() {
        let app = test_app();
        let (status, body) = send(
            &app,
            get("/api/books?title=Sapiens&isAvailableOnline=true", None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalItems"], 1);
        assert_eq!(body["items"][0]["id"], 1);

        let (_, body) = send(&app, get("/api/books?title=Homo+Deus&isAvailableOnline=true", None)).await;
        assert_eq!(body["totalItems"], 0);
    }

    #[tokio::test]
    async fn test_invalid_filter_is_bad_request() {
        let app = test_app();
        let (status, body) = send(&app, get("/api/books?isAvailableOnline=maybe", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_filter");
    }

    #[tokio::test]
    async fn test_customers_require_admin() {
        let app = test_app();

        let (status, body) = send(&app, get("/api/customers", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "token_missing");

        let (status, body) = send(&app, get("/api/customers", Some("a.b.c"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "token_malformed");

        let reader = token_for(&app, "reader", "reader-pw").await;
        let (status, body) = send(&app, get("/api/customers", Some(&reader))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");

        let admin = token_for(&app, "carroyom", "admin-pw").await;
        let (status, body) = send(&app, get("/api/customers", Some(&admin))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"][0]["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn test_unlisted_route_is_forbidden() {
        let app = test_app();
        let (status, body) = send(&app, get("/api/carts", None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");
    }
}
