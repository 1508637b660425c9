//! Integration tests for the catalog GraphQL API
//!
//! These tests run real operations against the built schema and an in-memory store:
//! - Catalog queries and counts
//! - Authenticated catalog mutations
//! - User creation and login
//! - Bearer token handling at the HTTP boundary

use async_graphql::Request;
use axum::body::Body;
use axum::http::{Method, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use library_catalog::db::{CreateAuthor, Database};
use library_catalog::graphql::{CatalogSchema, CurrentUser, build_schema};
use library_catalog::services::{AuthConfig, AuthService};
use library_catalog::{AppState, build_app};

// ============================================================================
// Harness
// ============================================================================

struct TestApi {
    db: Database,
    auth: AuthService,
    schema: CatalogSchema,
}

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-test-secret".to_string(),
        token_lifetime: None,
        bcrypt_cost: 4,
        default_password: "secret".to_string(),
    }
}

impl TestApi {
    async fn new() -> Self {
        let db = Database::connect_in_memory().await.unwrap();
        let auth = AuthService::new(db.clone(), auth_config());
        let schema = build_schema(db.clone(), auth.clone());
        Self { db, auth, schema }
    }

    /// Run an operation anonymously and return the serialized response
    async fn run(&self, query: &str) -> Value {
        self.run_request(Request::new(query)).await
    }

    /// Run an operation as `username`, creating the user on first use
    async fn run_as(&self, username: &str, query: &str) -> Value {
        let user = match self.db.users().get_by_username(username).await.unwrap() {
            Some(user) => user,
            None => self.auth.create_user(username, "fantasy", None).await.unwrap(),
        };
        self.run_request(Request::new(query).data(CurrentUser(user))).await
    }

    async fn run_request(&self, request: Request) -> Value {
        let response = self.schema.execute(request).await;
        serde_json::to_value(&response).unwrap()
    }

    async fn add_author(&self, name: &str, born: Option<i32>) {
        self.db
            .authors()
            .create(CreateAuthor { name: name.to_string(), born })
            .await
            .unwrap();
    }

    fn app(&self) -> axum::Router {
        build_app(AppState {
            db: self.db.clone(),
            auth: self.auth.clone(),
            schema: self.schema.clone(),
        })
    }
}

fn error_code(response: &Value) -> &str {
    response["errors"][0]["extensions"]["code"].as_str().unwrap_or_default()
}

// ============================================================================
// Queries
// ============================================================================

mod queries {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_counts_are_independent() {
        let api = TestApi::new().await;
        api.add_author("Robert Martin", Some(1952)).await;
        api.add_author("Martin Fowler", Some(1963)).await;
        api.run_as(
            "mluukkai",
            r#"mutation { addBook(title: "Clean Code", author: "Robert Martin", published: 2008) { id } }"#,
        )
        .await;

        let response = api.run("{ bookCount authorCount }").await;
        assert_eq!(response["data"], json!({ "bookCount": 1, "authorCount": 2 }));
    }

    #[tokio::test]
    async fn test_author_without_books_has_zero_book_count() {
        let api = TestApi::new().await;
        api.add_author("Sandi Metz", None).await;

        let response = api.run("{ allAuthors { name born bookCount } }").await;
        assert_eq!(
            response["data"]["allAuthors"],
            json!([{ "name": "Sandi Metz", "born": null, "bookCount": 0 }])
        );
    }

    #[tokio::test]
    async fn test_book_count_per_author() {
        let api = TestApi::new().await;
        api.add_author("Fyodor Dostoevsky", Some(1821)).await;
        api.add_author("Joshua Kerievsky", None).await;
        for title in ["Crime and punishment", "The Demon"] {
            api.run_as(
                "mluukkai",
                &format!(r#"mutation {{ addBook(title: "{title}", author: "Fyodor Dostoevsky") {{ id }} }}"#),
            )
            .await;
        }

        let response = api.run("{ allAuthors { name bookCount } }").await;
        assert_eq!(
            response["data"]["allAuthors"],
            json!([
                { "name": "Fyodor Dostoevsky", "bookCount": 2 },
                { "name": "Joshua Kerievsky", "bookCount": 0 },
            ])
        );
    }

    #[tokio::test]
    async fn test_all_books_genre_filter() {
        let api = TestApi::new().await;
        api.add_author("Robert Martin", Some(1952)).await;
        api.run_as(
            "mluukkai",
            r#"mutation { addBook(title: "Clean Code", author: "Robert Martin", genres: ["refactoring"]) { id } }"#,
        )
        .await;
        api.run_as(
            "mluukkai",
            r#"mutation { addBook(title: "Agile software development", author: "Robert Martin", genres: ["agile", "patterns"]) { id } }"#,
        )
        .await;

        let all = api.run("{ allBooks { title } }").await;
        assert_eq!(all["data"]["allBooks"].as_array().unwrap().len(), 2);

        let agile = api.run(r#"{ allBooks(genre: "agile") { title author genres } }"#).await;
        assert_eq!(
            agile["data"]["allBooks"],
            json!([{
                "title": "Agile software development",
                "author": "Robert Martin",
                "genres": ["agile", "patterns"],
            }])
        );

        let wrong_case = api.run(r#"{ allBooks(genre: "Agile") { title } }"#).await;
        assert_eq!(wrong_case["data"]["allBooks"], json!([]));
    }

    #[tokio::test]
    async fn test_me_is_null_when_anonymous() {
        let api = TestApi::new().await;
        let response = api.run("{ me { username } }").await;
        assert_eq!(response["data"], json!({ "me": null }));
    }

    #[tokio::test]
    async fn test_me_returns_current_user() {
        let api = TestApi::new().await;
        let response = api.run_as("mluukkai", "{ me { username favoriteGenre } }").await;
        assert_eq!(
            response["data"]["me"],
            json!({ "username": "mluukkai", "favoriteGenre": "fantasy" })
        );
    }
}

// ============================================================================
// Catalog Mutations
// ============================================================================

mod catalog_mutations {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_tolkien_scenario() {
        let api = TestApi::new().await;

        let author = api.run(r#"mutation { addAuthor(name: "Tolkien") { name born } }"#).await;
        assert_eq!(author["data"]["addAuthor"], json!({ "name": "Tolkien", "born": null }));

        let book = api
            .run_as(
                "mluukkai",
                r#"mutation { addBook(title: "The Hobbit", author: "Tolkien", genres: ["fantasy"]) { title author } }"#,
            )
            .await;
        assert_eq!(book["data"]["addBook"], json!({ "title": "The Hobbit", "author": "Tolkien" }));

        let fantasy = api.run(r#"{ allBooks(genre: "fantasy") { title author } }"#).await;
        assert_eq!(
            fantasy["data"]["allBooks"],
            json!([{ "title": "The Hobbit", "author": "Tolkien" }])
        );
    }

    #[tokio::test]
    async fn test_add_book_requires_authentication() {
        let api = TestApi::new().await;
        api.add_author("Tolkien", None).await;

        let response = api
            .run(r#"mutation { addBook(title: "The Hobbit", author: "Tolkien") { id } }"#)
            .await;

        assert!(response["data"]["addBook"].is_null());
        assert_eq!(error_code(&response), "UNAUTHENTICATED");
        assert_eq!(api.db.books().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_book_unknown_author_fails() {
        let api = TestApi::new().await;

        let response = api
            .run_as(
                "mluukkai",
                r#"mutation { addBook(title: "Orphaned", author: "Nobody") { id } }"#,
            )
            .await;

        assert_eq!(error_code(&response), "BAD_USER_INPUT");
        assert_eq!(
            response["errors"][0]["extensions"]["invalidArgs"]["author"],
            json!("Nobody")
        );
        assert_eq!(api.db.books().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_book_duplicate_title_is_user_input_error() {
        let api = TestApi::new().await;
        api.add_author("Robert Martin", None).await;
        let add = r#"mutation { addBook(title: "Clean Code", author: "Robert Martin") { id } }"#;

        api.run_as("mluukkai", add).await;
        let response = api.run_as("mluukkai", add).await;

        assert_eq!(error_code(&response), "BAD_USER_INPUT");
        assert_eq!(
            response["errors"][0]["extensions"]["invalidArgs"]["title"],
            json!("Clean Code")
        );
        assert_eq!(api.db.books().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_edit_author_sets_born() {
        let api = TestApi::new().await;
        api.add_author("Sandi Metz", None).await;

        let response = api
            .run_as(
                "mluukkai",
                r#"mutation { editAuthor(name: "Sandi Metz", setBornTo: 1953) { name born } }"#,
            )
            .await;

        assert_eq!(response["data"]["editAuthor"], json!({ "name": "Sandi Metz", "born": 1953 }));
        let stored = api.db.authors().get_by_name("Sandi Metz").await.unwrap().unwrap();
        assert_eq!(stored.born, Some(1953));
    }

    #[tokio::test]
    async fn test_edit_unknown_author_returns_null() {
        let api = TestApi::new().await;
        api.add_author("Sandi Metz", None).await;
        let before = api.db.authors().list().await.unwrap();

        let response = api
            .run_as(
                "mluukkai",
                r#"mutation { editAuthor(name: "Nobody", setBornTo: 1900) { name } }"#,
            )
            .await;

        assert_eq!(response["data"], json!({ "editAuthor": null }));
        assert!(response.get("errors").is_none());
        assert_eq!(api.db.authors().list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_edit_author_requires_authentication() {
        let api = TestApi::new().await;
        api.add_author("Sandi Metz", None).await;

        let response = api
            .run(r#"mutation { editAuthor(name: "Sandi Metz", setBornTo: 1953) { born } }"#)
            .await;

        assert_eq!(error_code(&response), "UNAUTHENTICATED");
        let stored = api.db.authors().get_by_name("Sandi Metz").await.unwrap().unwrap();
        assert_eq!(stored.born, None);
    }

    #[tokio::test]
    async fn test_add_author_validation_error() {
        let api = TestApi::new().await;

        let response = api.run(r#"mutation { addAuthor(name: "Al", born: 1900) { id } }"#).await;

        assert_eq!(error_code(&response), "BAD_USER_INPUT");
        assert_eq!(
            response["errors"][0]["extensions"]["invalidArgs"],
            json!({ "name": "Al", "born": 1900 })
        );
        assert_eq!(api.db.authors().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_padded_author_name_usable_in_later_mutations() {
        let api = TestApi::new().await;

        let added = api.run(r#"mutation { addAuthor(name: "Tolkien ") { name } }"#).await;
        assert_eq!(added["data"]["addAuthor"], json!({ "name": "Tolkien" }));

        let book = api
            .run_as(
                "mluukkai",
                r#"mutation { addBook(title: "The Hobbit", author: "Tolkien ") { author } }"#,
            )
            .await;
        assert_eq!(book["data"]["addBook"], json!({ "author": "Tolkien" }));

        let edited = api
            .run_as(
                "mluukkai",
                r#"mutation { editAuthor(name: "Tolkien ", setBornTo: 1892) { name born } }"#,
            )
            .await;
        assert_eq!(edited["data"]["editAuthor"], json!({ "name": "Tolkien", "born": 1892 }));
    }

    #[tokio::test]
    async fn test_add_author_duplicate_name() {
        let api = TestApi::new().await;
        api.run(r#"mutation { addAuthor(name: "Tolkien") { id } }"#).await;

        let response = api.run(r#"mutation { addAuthor(name: "Tolkien") { id } }"#).await;

        assert_eq!(error_code(&response), "BAD_USER_INPUT");
        assert_eq!(api.db.authors().count().await.unwrap(), 1);
    }
}

// ============================================================================
// Users and Login
// ============================================================================

mod users {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_login_with_default_password_returns_decodable_token() {
        let api = TestApi::new().await;
        let created = api
            .run(r#"mutation { createUser(username: "mluukkai", favoriteGenre: "refactoring") { id username } }"#)
            .await;
        let user_id = created["data"]["createUser"]["id"].as_str().unwrap().to_string();

        let response = api
            .run(r#"mutation { login(username: "mluukkai", password: "secret") { value } }"#)
            .await;
        let token = response["data"]["login"]["value"].as_str().unwrap();

        let claims = api.auth.decode_token(token).unwrap();
        assert_eq!(claims.username, "mluukkai");
        assert_eq!(claims.sub, user_id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let api = TestApi::new().await;
        api.run(r#"mutation { createUser(username: "mluukkai", favoriteGenre: "refactoring") { id } }"#)
            .await;

        let response = api
            .run(r#"mutation { login(username: "mluukkai", password: "wrong") { value } }"#)
            .await;

        assert!(response["data"]["login"].is_null());
        assert_eq!(response["errors"][0]["message"], json!("wrong credentials"));
        assert_eq!(error_code(&response), "BAD_USER_INPUT");
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let api = TestApi::new().await;
        let response = api
            .run(r#"mutation { login(username: "ghost", password: "secret") { value } }"#)
            .await;
        assert_eq!(response["errors"][0]["message"], json!("wrong credentials"));
    }

    #[tokio::test]
    async fn test_create_user_with_password() {
        let api = TestApi::new().await;
        api.run(r#"mutation { createUser(username: "hellas", favoriteGenre: "crime", password: "hunter22") { id } }"#)
            .await;

        let ok = api
            .run(r#"mutation { login(username: "hellas", password: "hunter22") { value } }"#)
            .await;
        assert!(ok["data"]["login"]["value"].is_string());

        let default = api
            .run(r#"mutation { login(username: "hellas", password: "secret") { value } }"#)
            .await;
        assert_eq!(error_code(&default), "BAD_USER_INPUT");
    }

    #[tokio::test]
    async fn test_padded_username_can_log_in() {
        let api = TestApi::new().await;
        let created = api
            .run(r#"mutation { createUser(username: " hellas", favoriteGenre: "crime") { username } }"#)
            .await;
        assert_eq!(created["data"]["createUser"], json!({ "username": "hellas" }));

        for username in [" hellas", "hellas"] {
            let response = api
                .run(&format!(
                    r#"mutation {{ login(username: "{username}", password: "secret") {{ value }} }}"#
                ))
                .await;
            assert!(response["data"]["login"]["value"].is_string(), "login as {username:?}");
        }
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let api = TestApi::new().await;
        let create = r#"mutation { createUser(username: "mluukkai", favoriteGenre: "refactoring") { id } }"#;

        api.run(create).await;
        let response = api.run(create).await;

        assert_eq!(error_code(&response), "BAD_USER_INPUT");
        assert_eq!(
            response["errors"][0]["extensions"]["invalidArgs"]["username"],
            json!("mluukkai")
        );
    }
}

// ============================================================================
// HTTP Boundary
// ============================================================================

mod http_boundary {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn post_graphql(app: axum::Router, authorization: Option<&str>, query: &str) -> (StatusCode, Value) {
        let mut builder = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = builder
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bearer_token_authenticates_request() {
        let api = TestApi::new().await;
        let user = api.auth.create_user("mluukkai", "refactoring", None).await.unwrap();
        let token = api.auth.issue_token(&user).unwrap();

        for header in [format!("Bearer {token}"), format!("bearer {token}")] {
            let (status, body) = post_graphql(api.app(), Some(&header), "{ me { username } }").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["data"]["me"], json!({ "username": "mluukkai" }));
        }
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        let api = TestApi::new().await;
        let (_, body) = post_graphql(api.app(), None, "{ me { username } }").await;
        assert_eq!(body["data"], json!({ "me": null }));
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let api = TestApi::new().await;
        let (status, body) =
            post_graphql(api.app(), Some("Bearer not-a-token"), "{ bookCount }").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("data").is_none() || body["data"].is_null());
        assert_eq!(error_code(&body), "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_add_book_over_http() {
        let api = TestApi::new().await;
        api.add_author("Tolkien", None).await;
        let user = api.auth.create_user("mluukkai", "fantasy", None).await.unwrap();
        let token = api.auth.issue_token(&user).unwrap();

        let (_, body) = post_graphql(
            api.app(),
            Some(&format!("Bearer {token}")),
            r#"mutation { addBook(title: "The Hobbit", author: "Tolkien", genres: ["fantasy"]) { title author } }"#,
        )
        .await;

        assert_eq!(body["data"]["addBook"], json!({ "title": "The Hobbit", "author": "Tolkien" }));
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let api = TestApi::new().await;

        for (uri, expected) in [
            ("/healthz", json!("healthy")),
            ("/readyz", json!(true)),
        ] {
            let request = axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = api.app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            let field = if uri == "/healthz" { "status" } else { "ready" };
            assert_eq!(body[field], expected);
        }
    }

    #[tokio::test]
    async fn test_readiness_reports_catalog_counts() {
        let api = TestApi::new().await;
        api.add_author("Tolkien", None).await;

        let request = axum::http::Request::builder().uri("/readyz").body(Body::empty()).unwrap();
        let response = api.app().oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            body,
            json!({ "ready": true, "database": true, "catalog": { "authors": 1, "books": 0 } })
        );
    }

    #[tokio::test]
    async fn test_graphql_get_without_html_is_405() {
        let api = TestApi::new().await;
        let request = axum::http::Request::builder()
            .uri("/graphql")
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();

        let response = api.app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
