use serde_json::json;

use crate::common::{TestApp, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn creator_gets_code_and_membership() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.register_user("papa@example.com").await;

        let res = app
            .post_with_token(
                routes::SEASONS,
                &json!({
                    "title": "Summer at the Lake 2025",
                    "location": "Lake Annecy, France",
                    "start_date": "2025-07-01",
                    "end_date": "2025-07-15",
                    "max_members": 6,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["created_by"], user_id);
        assert_eq!(res.body["member_count"], 1);
        let code = res.body["invitation_code"].as_str().unwrap();
        assert_eq!(code.len(), 6);

        let members = app
            .get_with_token(&routes::season_members(res.id()), &token)
            .await;
        assert_eq!(members.status, 200, "{}", members.text);
        assert_eq!(members.body.as_array().unwrap().len(), 1);
        assert_eq!(members.body[0]["role"], "creator");
    }

    #[tokio::test]
    async fn sibling_seasons_get_distinct_codes() {
        let app = TestApp::spawn().await;
        let (_, token) = app.register_user("papa@example.com").await;

        let a = app.create_season(&token, "Season A").await;
        let b = app.create_season(&token, "Season B").await;

        let code_a = app.invitation_code(a, &token).await;
        let code_b = app.invitation_code(b, &token).await;
        assert_ne!(code_a, code_b);
    }

    #[tokio::test]
    async fn reversed_dates_are_rejected() {
        let app = TestApp::spawn().await;
        let (_, token) = app.register_user("papa@example.com").await;

        let res = app
            .post_with_token(
                routes::SEASONS,
                &json!({
                    "title": "Backwards",
                    "location": "Nowhere",
                    "start_date": "2025-07-15",
                    "end_date": "2025-07-01",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn creating_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SEASONS,
                &json!({
                    "title": "Anonymous",
                    "location": "Nowhere",
                    "start_date": "2025-07-01",
                    "end_date": "2025-07-02",
                }),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn list_is_paginated_with_member_counts() {
        let app = TestApp::spawn().await;
        let (_, token) = app.register_user("papa@example.com").await;
        for i in 0..3 {
            app.create_season(&token, &format!("Season {i}")).await;
        }

        let res = app.get_with_token("/seasons?per_page=2", &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
        assert_eq!(res.body["data"][0]["member_count"], 1);
    }

    #[tokio::test]
    async fn unknown_season_is_404() {
        let app = TestApp::spawn().await;
        let (_, token) = app.register_user("papa@example.com").await;

        let res = app.get_with_token(&routes::season(4242), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod joining {
    use super::*;

    #[tokio::test]
    async fn family_member_joins_with_the_code() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let (maman_id, maman) = app.register_user("maman@example.com").await;
        let season_id = app.create_season(&papa, "Summer 2025").await;
        let code = app.invitation_code(season_id, &papa).await;

        let res = app.join_by_code(&code, &maman).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["season_id"], season_id);
        assert_eq!(res.body["user_id"], maman_id);
        assert_eq!(res.body["role"], "member");
        assert_eq!(res.body["total_points"], 0);
    }

    #[tokio::test]
    async fn code_lookup_is_case_insensitive() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let (_, maman) = app.register_user("maman@example.com").await;
        let season_id = app.create_season(&papa, "Summer 2025").await;
        let code = app.invitation_code(season_id, &papa).await;

        let res = app.join_by_code(&code.to_lowercase(), &maman).await;

        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn joining_twice_yields_already_member() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let (_, maman) = app.register_user("maman@example.com").await;
        let season_id = app.create_season(&papa, "Summer 2025").await;
        let code = app.invitation_code(season_id, &papa).await;

        let first = app.join_by_code(&code, &maman).await;
        assert_eq!(first.status, 201, "{}", first.text);

        let res = app.join_by_code(&code, &maman).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "ALREADY_MEMBER");
    }

    #[tokio::test]
    async fn the_creator_cannot_join_their_own_season_again() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let season_id = app.create_season(&papa, "Summer 2025").await;

        let res = app
            .post_with_token(&routes::season_join(season_id), &json!({}), &papa)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "ALREADY_MEMBER");
    }

    #[tokio::test]
    async fn unknown_code_is_404() {
        let app = TestApp::spawn().await;
        let (_, token) = app.register_user("papa@example.com").await;

        let res = app.join_by_code("ZZZZZZ", &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn full_season_rejects_new_members() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let (_, maman) = app.register_user("maman@example.com").await;

        let res = app
            .post_with_token(
                routes::SEASONS,
                &json!({
                    "title": "Tiny Season",
                    "location": "Lake Annecy",
                    "start_date": "2025-07-01",
                    "end_date": "2025-07-15",
                    "max_members": 1,
                }),
                &papa,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let code = res.body["invitation_code"].as_str().unwrap().to_string();

        let res = app.join_by_code(&code, &maman).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn members_list_is_for_members_only() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let (_, outsider) = app.register_user("visitor@example.com").await;
        let season_id = app.create_season(&papa, "Summer 2025").await;

        let res = app
            .get_with_token(&routes::season_members(season_id), &outsider)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod updating {
    use super::*;

    #[tokio::test]
    async fn creator_can_patch_fields() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let season_id = app.create_season(&papa, "Summer 2025").await;

        let res = app
            .patch_with_token(
                &routes::season(season_id),
                &json!({"title": "Renamed", "is_active": true}),
                &papa,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Renamed");
        assert_eq!(res.body["is_active"], true);
        // Untouched fields survive.
        assert_eq!(res.body["location"], "Lake Annecy, France");
    }

    #[tokio::test]
    async fn plain_member_cannot_patch() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let (_, maman) = app.register_user("maman@example.com").await;
        let season_id = app.create_season(&papa, "Summer 2025").await;
        let code = app.invitation_code(season_id, &papa).await;
        app.join_by_code(&code, &maman).await;

        let res = app
            .patch_with_token(&routes::season(season_id), &json!({"title": "Mine"}), &maman)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn date_ordering_is_checked_against_stored_values() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let season_id = app.create_season(&papa, "Summer 2025").await;

        // Stored range is 2025-07-01..2025-07-15; this end would precede it.
        let res = app
            .patch_with_token(
                &routes::season(season_id),
                &json!({"end_date": "2025-06-01"}),
                &papa,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn creator_deletes_and_children_cascade() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let season_id = app.create_season(&papa, "Summer 2025").await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;

        let res = app.delete_with_token(&routes::season(season_id), &papa).await;
        assert_eq!(res.status, 204, "{}", res.text);

        let res = app.get_with_token(&routes::season(season_id), &papa).await;
        assert_eq!(res.status, 404);

        let res = app.get_with_token(&routes::challenge(challenge_id), &papa).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn non_creator_cannot_delete() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;
        let (_, maman) = app.register_user("maman@example.com").await;
        let season_id = app.create_season(&papa, "Summer 2025").await;
        let code = app.invitation_code(season_id, &papa).await;
        app.join_by_code(&code, &maman).await;

        let res = app.delete_with_token(&routes::season(season_id), &maman).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}
