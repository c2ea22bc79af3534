//! Artifact catalog endpoint integration tests

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use serial_test::serial;
use uuid::Uuid;

use crate::common::{anonymous_request, artifact_id, authed_request, parse_body, TestApp};

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect()
}

mod test_create_and_get {
    use super::*;

    #[tokio::test]
    async fn test_get_after_create_returns_input_with_id() {
        let app = TestApp::new().await.unwrap();
        let (email, token) = app.user("curator");

        let created = app
            .create_artifact(
                &token,
                json!({
                    "name": "Ming Vase",
                    "adderEmail": &email,
                    "period": "Ming",
                    "dimensions": {"height": 40}
                }),
            )
            .await;
        let id = artifact_id(&created);

        let resp = app
            .send(anonymous_request(Method::GET, &format!("/artifacts/{id}"), None))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched = parse_body(resp).await;

        assert_eq!(fetched["name"], "Ming Vase");
        assert_eq!(fetched["adderEmail"], email.as_str());
        assert_eq!(fetched["likes"], 0);
        assert_eq!(fetched["period"], "Ming");
        assert_eq!(fetched["dimensions"]["height"], 40);
        assert_eq!(fetched["id"], created["id"]);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_defaults_adder_email_to_caller() {
        let app = TestApp::new().await.unwrap();
        let (email, token) = app.user("curator");

        let created = app
            .create_artifact(&token, json!({"name": "Bronze Mirror"}))
            .await;

        assert_eq!(created["adderEmail"], email.as_str());
        assert_eq!(created["likes"], 0);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_get_missing_returns_null() {
        let app = TestApp::new().await.unwrap();

        let resp = app
            .send(anonymous_request(
                Method::GET,
                &format!("/artifacts/{}", Uuid::new_v4()),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(parse_body(resp).await, Value::Null);
    }
}

mod test_update_and_delete {
    use super::*;

    #[tokio::test]
    async fn test_update_merges_descriptive_fields() {
        let app = TestApp::new().await.unwrap();
        let (_, token) = app.user("curator");

        let created = app
            .create_artifact(
                &token,
                json!({"name": "Tang Horse", "period": "Tang", "material": "clay"}),
            )
            .await;
        let id = artifact_id(&created);

        let resp = app
            .send(authed_request(
                Method::PATCH,
                &format!("/artifacts/{id}"),
                &token,
                Some(json!({"name": "Sancai Tang Horse", "material": "glazed earthenware"})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated = parse_body(resp).await;

        assert_eq!(updated["name"], "Sancai Tang Horse");
        assert_eq!(updated["material"], "glazed earthenware");
        assert_eq!(updated["period"], "Tang");
        assert_eq!(updated["likes"], 0);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_or_delete() {
        let app = TestApp::new().await.unwrap();
        let (_, owner) = app.user("owner");
        let (_, intruder) = app.user("intruder");

        let created = app.create_artifact(&owner, json!({"name": "Jade Bi"})).await;
        let uri = format!("/artifacts/{}", artifact_id(&created));

        let resp = app
            .send(authed_request(
                Method::PATCH,
                &uri,
                &intruder,
                Some(json!({"name": "Mine now"})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = app
            .send(authed_request(Method::DELETE, &uri, &intruder, None))
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = app.send(anonymous_request(Method::GET, &uri, None)).await;
        assert_eq!(parse_body(resp).await["name"], "Jade Bi");

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_then_get_returns_null() {
        let app = TestApp::new().await.unwrap();
        let (_, token) = app.user("curator");

        let created = app.create_artifact(&token, json!({"name": "Oracle Bone"})).await;
        let uri = format!("/artifacts/{}", artifact_id(&created));

        let resp = app
            .send(authed_request(Method::DELETE, &uri, &token, None))
            .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app.send(anonymous_request(Method::GET, &uri, None)).await;
        assert_eq!(parse_body(resp).await, Value::Null);

        let resp = app
            .send(authed_request(Method::DELETE, &uri, &token, None))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(parse_body(resp).await, Value::Null);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_artifact_returns_null() {
        let app = TestApp::new().await.unwrap();
        let (_, token) = app.user("curator");

        let resp = app
            .send(authed_request(
                Method::PATCH,
                &format!("/artifacts/{}", Uuid::new_v4()),
                &token,
                Some(json!({"name": "Ghost"})),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(parse_body(resp).await, Value::Null);
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden_whatever_the_body() {
        let app = TestApp::new().await.unwrap();
        let (_, owner) = app.user("owner");
        let (_, intruder) = app.user("intruder");

        let created = app.create_artifact(&owner, json!({"name": "Bronze Ding"})).await;
        let uri = format!("/artifacts/{}", artifact_id(&created));

        let bodies = [
            json!({"likes": 100}),
            json!({"adderEmail": "intruder@histotrack.test"}),
            json!({"_id": "abc"}),
            json!({}),
        ];
        for body in bodies {
            let resp = app
                .send(authed_request(Method::PATCH, &uri, &intruder, Some(body.clone())))
                .await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{body}");
            assert_eq!(parse_body(resp).await["error"]["code"], "NOT_OWNER");
        }

        let resp = app.send(anonymous_request(Method::GET, &uri, None)).await;
        let fetched = parse_body(resp).await;
        assert_eq!(fetched["name"], "Bronze Ding");
        assert_eq!(fetched["likes"], 0);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_owner_update_of_protected_field_is_bad_request() {
        let app = TestApp::new().await.unwrap();
        let (_, token) = app.user("curator");

        let created = app.create_artifact(&token, json!({"name": "Jade Cong"})).await;
        let uri = format!("/artifacts/{}", artifact_id(&created));

        let resp = app
            .send(authed_request(Method::PATCH, &uri, &token, Some(json!({"likes": 100}))))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_stores_name_and_email_as_sent() {
        let app = TestApp::new().await.unwrap();
        let (_, token) = app.user("curator");
        let long_name = "Scroll ".repeat(40);

        let created = app
            .create_artifact(
                &token,
                json!({"name": &long_name, "adderEmail": "curator"}),
            )
            .await;
        assert_eq!(created["name"], long_name.as_str());
        assert_eq!(created["adderEmail"], "curator");

        sqlx::query("DELETE FROM artifacts WHERE id = $1")
            .bind(artifact_id(&created))
            .execute(&app.pool)
            .await
            .unwrap();
        app.cleanup().await.unwrap();
    }
}

mod test_listing {
    use super::*;

    #[tokio::test]
    #[serial]
    async fn test_search_is_case_insensitive_substring() {
        let app = TestApp::new().await.unwrap();
        let (_, token) = app.user("curator");
        let tag = Uuid::new_v4().simple().to_string();

        for name in [
            format!("Bronze {tag} Ding"),
            format!("BRONZE {} bell", tag.to_uppercase()),
            "Silk scroll".to_string(),
        ] {
            app.create_artifact(&token, json!({"name": name})).await;
        }

        let resp = app
            .send(anonymous_request(
                Method::GET,
                &format!("/artifacts?search=bronze%20{tag}"),
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let found = names(&parse_body(resp).await);

        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .all(|n| n.to_lowercase().contains(&format!("bronze {tag}"))));

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[serial]
    async fn test_search_wildcards_match_literally() {
        let app = TestApp::new().await.unwrap();
        let (_, token) = app.user("curator");
        let tag = Uuid::new_v4().simple().to_string();

        app.create_artifact(&token, json!({"name": format!("{tag} 100% silk")}))
            .await;
        app.create_artifact(&token, json!({"name": format!("{tag} 1000 silk")}))
            .await;

        let resp = app
            .send(anonymous_request(
                Method::GET,
                &format!("/artifacts?search={tag}%20100%25"),
                None,
            ))
            .await;
        let found = names(&parse_body(resp).await);

        assert_eq!(found, vec![format!("{tag} 100% silk")]);

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[serial]
    async fn test_email_filter_returns_only_callers_artifacts() {
        let app = TestApp::new().await.unwrap();
        let (alice, alice_token) = app.user("alice");
        let (_, bob_token) = app.user("bob");

        app.create_artifact(&alice_token, json!({"name": "Alice's amphora"}))
            .await;
        app.create_artifact(&bob_token, json!({"name": "Bob's brooch"}))
            .await;

        let resp = app
            .send(authed_request(
                Method::GET,
                &format!("/artifacts?email={alice}"),
                &alice_token,
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;

        assert_eq!(names(&body), vec!["Alice's amphora".to_string()]);
        assert!(body
            .as_array()
            .unwrap()
            .iter()
            .all(|a| a["adderEmail"] == alice.as_str()));

        let resp = app
            .send(authed_request(
                Method::GET,
                &format!("/artifacts?email={alice}"),
                &bob_token,
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(parse_body(resp).await["error"]["code"], "IDENTITY_MISMATCH");

        app.cleanup().await.unwrap();
    }

    #[tokio::test]
    #[serial]
    async fn test_sort_and_limit() {
        let app = TestApp::new().await.unwrap();
        let (email, token) = app.user("curator");

        for (name, likes, year) in [("Kylix", 2, -480), ("Krater", 7, -530), ("Lekythos", 4, -450)] {
            app.create_artifact(&token, json!({"name": name, "likes": likes, "year": year}))
                .await;
        }

        let resp = app
            .send(authed_request(
                Method::GET,
                &format!("/artifacts?email={email}&sort=likes&limit=2"),
                &token,
                None,
            ))
            .await;
        assert_eq!(
            names(&parse_body(resp).await),
            vec!["Krater".to_string(), "Lekythos".to_string()]
        );

        let resp = app
            .send(authed_request(
                Method::GET,
                &format!("/artifacts?email={email}&sort=year&limit=0"),
                &token,
                None,
            ))
            .await;
        assert_eq!(
            names(&parse_body(resp).await),
            vec![
                "Lekythos".to_string(),
                "Kylix".to_string(),
                "Krater".to_string()
            ]
        );

        let resp = app
            .send(authed_request(
                Method::GET,
                &format!("/artifacts?email={email}&sort=likes&limit=abc"),
                &token,
                None,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(names(&parse_body(resp).await).len(), 3);

        app.cleanup().await.unwrap();
    }
}
