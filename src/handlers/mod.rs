pub mod posts;

use actix_web::web;

/// Largest request body accepted on create/update.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Mounts the post resource on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .service(
            web::resource("/posts")
                .route(web::get().to(posts::index))
                .route(web::post().to(posts::create)),
        )
        .service(
            web::resource("/posts/{post}")
                .route(web::get().to(posts::show))
                .route(web::put().to(posts::update))
                .route(web::patch().to(posts::update))
                .route(web::delete().to(posts::destroy)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{memory_pool, PostStore};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    macro_rules! spawn_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(PostStore::new(memory_pool().await)))
                    .service(web::scope("/api").configure(configure)),
            )
            .await
        };
    }

    macro_rules! create {
        ($app:expr, $body:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .set_json($body)
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let created: Value = test::read_body_json(resp).await;
            created
        }};
    }

    macro_rules! status_of {
        ($app:expr, $req:expr) => {
            test::call_service(&$app, $req.to_request()).await.status()
        };
    }

    #[actix_web::test]
    async fn create_show_delete_lifecycle() {
        let app = spawn_app!();
        let created = create!(app, json!({"title": "Hello", "body": "World"}));
        assert_eq!(created["id"], 1);
        assert_eq!(created["title"], "Hello");
        assert_eq!(created["body"], "World");
        assert!(created["created_at"].is_string());
        assert!(created["updated_at"].is_string());

        let req = test::TestRequest::get().uri("/api/posts/1").to_request();
        let shown: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(shown, created);

        let req = test::TestRequest::delete().uri("/api/posts/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(test::read_body(resp).await.is_empty());

        let get = test::TestRequest::get().uri("/api/posts/1");
        assert_eq!(status_of!(app, get), StatusCode::NOT_FOUND);
        let delete = test::TestRequest::delete().uri("/api/posts/1");
        assert_eq!(status_of!(app, delete), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn unknown_or_malformed_ids_are_not_found() {
        let app = spawn_app!();
        for uri in ["/api/posts/7", "/api/posts/abc", "/api/posts/-1"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({"message": "Not Found"}));
        }
    }

    #[actix_web::test]
    async fn create_drops_fields_outside_the_allow_list() {
        let app = spawn_app!();
        let created = create!(
            app,
            json!({
                "id": 500,
                "title": "t",
                "body": "b",
                "author": "mallory",
                "created_at": "1970-01-01T00:00:00Z"
            })
        );
        assert_eq!(created["id"], 1);
        assert!(created.get("author").is_none());
        assert_ne!(created["created_at"], "1970-01-01T00:00:00Z");
    }

    #[actix_web::test]
    async fn invalid_create_persists_nothing() {
        let app = spawn_app!();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"title": "x".repeat(256), "body": "b"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["errors"]["title"][0],
            "The title field must not be greater than 255 characters."
        );

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"title": "only a title"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "The body field is required.");
        assert!(body["errors"].get("title").is_none());

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let listing: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listing["total"], 0);
    }

    #[actix_web::test]
    async fn malformed_json_is_unprocessable() {
        let app = spawn_app!();
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"], json!({}));

        let req = test::TestRequest::post().uri("/api/posts").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            "The title field is required. (and 1 more error)"
        );
    }

    #[actix_web::test]
    async fn update_replaces_and_is_idempotent() {
        let app = spawn_app!();
        let created = create!(app, json!({"title": "draft", "body": "v1"}));

        let mut results = Vec::new();
        for _ in 0..2 {
            let req = test::TestRequest::put()
                .uri("/api/posts/1")
                .set_json(json!({"title": "final", "body": "v2"}))
                .to_request();
            let updated: Value = test::call_and_read_body_json(&app, req).await;
            results.push(updated);
        }
        for updated in &results {
            assert_eq!(updated["id"], 1);
            assert_eq!(updated["title"], "final");
            assert_eq!(updated["body"], "v2");
            assert_eq!(updated["created_at"], created["created_at"]);
        }

        let req = test::TestRequest::patch()
            .uri("/api/posts/1")
            .set_json(json!({"title": "patched", "body": "v3"}))
            .to_request();
        let patched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(patched["title"], "patched");
    }

    #[actix_web::test]
    async fn update_checks_existence_before_validation() {
        let app = spawn_app!();
        let missing = test::TestRequest::put()
            .uri("/api/posts/9")
            .set_json(json!({"title": ""}));
        assert_eq!(status_of!(app, missing), StatusCode::NOT_FOUND);

        create!(app, json!({"title": "keep", "body": "me"}));
        let invalid = test::TestRequest::put()
            .uri("/api/posts/1")
            .set_json(json!({"title": "changed"}));
        assert_eq!(status_of!(app, invalid), StatusCode::UNPROCESSABLE_ENTITY);

        let req = test::TestRequest::get().uri("/api/posts/1").to_request();
        let shown: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(shown["title"], "keep");
    }

    #[actix_web::test]
    async fn empty_listing_has_zero_total() {
        let app = spawn_app!();
        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let listing: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listing["data"], json!([]));
        assert_eq!(listing["total"], 0);
        assert_eq!(listing["current_page"], 1);
        assert_eq!(listing["last_page"], 1);
        assert_eq!(listing["per_page"], 3);
        assert_eq!(listing["from"], Value::Null);
        assert_eq!(listing["to"], Value::Null);
    }

    #[actix_web::test]
    async fn listing_pages_in_id_order() {
        let app = spawn_app!();
        for n in 1..=7 {
            create!(app, json!({"title": format!("post {n}"), "body": "text"}));
        }

        let req = test::TestRequest::get().uri("/api/posts?page=2").to_request();
        let listing: Value = test::call_and_read_body_json(&app, req).await;
        let ids: Vec<_> = listing["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert_eq!(listing["total"], 7);
        assert_eq!(listing["last_page"], 3);
        assert_eq!(listing["from"], 4);
        assert_eq!(listing["to"], 6);
        assert_eq!(listing["path"], "http://localhost:8080/api/posts");
        assert_eq!(
            listing["next_page_url"],
            "http://localhost:8080/api/posts?page=3"
        );
        assert_eq!(
            listing["prev_page_url"],
            "http://localhost:8080/api/posts?page=1"
        );

        let req = test::TestRequest::get().uri("/api/posts?page=2").to_request();
        let again: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(again, listing);

        let req = test::TestRequest::get().uri("/api/posts?page=junk").to_request();
        let fallback: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fallback["current_page"], 1);
        assert_eq!(fallback["data"][0]["id"], 1);
    }

    #[actix_web::test]
    async fn search_filters_title_or_body() {
        let app = spawn_app!();
        create!(app, json!({"title": "apple tart", "body": "sweet"}));
        create!(app, json!({"title": "bread", "body": "plain"}));
        create!(app, json!({"title": "cider", "body": "made from Apples"}));

        let req = test::TestRequest::get()
            .uri("/api/posts?search=apple")
            .to_request();
        let listing: Value = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<_> = listing["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["apple tart", "cider"]);
        assert_eq!(listing["total"], 2);
        assert_eq!(
            listing["first_page_url"],
            "http://localhost:8080/api/posts?search=apple&page=1"
        );
    }

    #[actix_web::test]
    async fn padded_or_blank_search_is_trimmed() {
        let app = spawn_app!();
        create!(app, json!({"title": "apple", "body": "fruit"}));
        create!(app, json!({"title": "banana", "body": "fruit"}));

        let req = test::TestRequest::get()
            .uri("/api/posts?search=%20apple%20")
            .to_request();
        let listing: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listing["total"], 1);
        assert_eq!(listing["data"][0]["title"], "apple");
        assert_eq!(
            listing["first_page_url"],
            "http://localhost:8080/api/posts?search=apple&page=1"
        );

        let req = test::TestRequest::get()
            .uri("/api/posts?search=%20%20%20")
            .to_request();
        let listing: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listing["total"], 2);
        assert_eq!(listing["first_page_url"], "http://localhost:8080/api/posts?page=1");
    }
}
