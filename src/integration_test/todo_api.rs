use super::test_util::{prepare_app_and_test, send};
use crate::api::test_util::{ErrorBody, deserialize_body};
use crate::dto;
use axum::body;
use axum::http::StatusCode;
use serde_json::json;

fn buy_milk() -> dto::NewTodo {
    dto::NewTodo {
        title: "Buy milk".to_owned(),
        description: "2% milk".to_owned(),
        priority: 3,
        complete: false,
    }
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn todo_lifecycle() {
    prepare_app_and_test(|app| async move {
        let created = send(&app, "POST", "/todo", Some(&buy_milk())).await;
        assert_eq!(StatusCode::CREATED, created.status());
        let created_body = body::to_bytes(created.into_body(), usize::MAX)
            .await
            .expect("Could not read creation body");
        assert!(created_body.is_empty());

        let fetched = send(&app, "GET", "/todo/1", None::<&()>).await;
        assert_eq!(StatusCode::OK, fetched.status());
        let fetched_todo: dto::Todo = deserialize_body(fetched.into_body()).await;
        assert_eq!(
            dto::Todo {
                id: 1,
                title: "Buy milk".to_owned(),
                description: "2% milk".to_owned(),
                priority: 3,
                complete: false,
            },
            fetched_todo
        );

        let update = json!({
            "title": "Buy milk",
            "description": "2% milk",
            "priority": 3,
            "complete": true,
        });
        let updated = send(&app, "PUT", "/todo/1", Some(&update)).await;
        assert_eq!(StatusCode::NO_CONTENT, updated.status());

        let fetched = send(&app, "GET", "/todo/1", None::<&()>).await;
        let fetched_todo: dto::Todo = deserialize_body(fetched.into_body()).await;
        assert!(fetched_todo.complete);

        let deleted = send(&app, "DELETE", "/todo/1", None::<&()>).await;
        assert_eq!(StatusCode::NO_CONTENT, deleted.status());

        let fetched = send(&app, "GET", "/todo/1", None::<&()>).await;
        assert_eq!(StatusCode::NOT_FOUND, fetched.status());
        let error: ErrorBody = deserialize_body(fetched.into_body()).await;
        assert_eq!("Todo not found.", error.error_description);

        let deleted_again = send(&app, "DELETE", "/todo/1", None::<&()>).await;
        assert_eq!(StatusCode::NOT_FOUND, deleted_again.status());
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn lists_todos_in_creation_order() {
    prepare_app_and_test(|app| async move {
        for title in ["First", "Second"] {
            let new_todo = dto::NewTodo {
                title: title.to_owned(),
                ..buy_milk()
            };
            let created = send(&app, "POST", "/todo", Some(&new_todo)).await;
            assert_eq!(StatusCode::CREATED, created.status());
        }

        let listed = send(&app, "GET", "/", None::<&()>).await;
        assert_eq!(StatusCode::OK, listed.status());
        let todos: Vec<dto::Todo> = deserialize_body(listed.into_body()).await;
        let titles: Vec<&str> = todos.iter().map(|todo| todo.title.as_str()).collect();
        assert_eq!(vec!["First", "Second"], titles);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn rejects_bad_requests_at_the_boundary() {
    prepare_app_and_test(|app| async move {
        let short_title = dto::NewTodo {
            title: "ab".to_owned(),
            ..buy_milk()
        };
        let response = send(&app, "POST", "/todo", Some(&short_title)).await;
        assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, response.status());

        let response = send(&app, "GET", "/todo/0", None::<&()>).await;
        assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, response.status());

        let response = send(&app, "GET", "/todo/abc", None::<&()>).await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        let error: ErrorBody = deserialize_body(response.into_body()).await;
        assert_eq!("invalid_path", error.error_code);

        let response = send(&app, "PUT", "/todo/7", Some(&json!({ "title": "Missing fields" }))).await;
        assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, response.status());
        let error: ErrorBody = deserialize_body(response.into_body()).await;
        assert_eq!("invalid_json", error.error_code);

        let listed = send(&app, "GET", "/", None::<&()>).await;
        let todos: Vec<dto::Todo> = deserialize_body(listed.into_body()).await;
        assert!(todos.is_empty());
    });
}
