use serde_json::json;

use crate::common::{TestApp, routes};

/// Register two users, create a season with the first, join with the second.
/// Returns (creator token, member token, season id).
async fn family_season(app: &TestApp) -> (String, String, i32) {
    let (_, papa) = app.register_user("papa@example.com").await;
    let (_, maman) = app.register_user("maman@example.com").await;
    let season_id = app.create_season(&papa, "Summer 2025").await;
    let code = app.invitation_code(season_id, &papa).await;
    let joined = app.join_by_code(&code, &maman).await;
    assert_eq!(joined.status, 201, "{}", joined.text);
    (papa, maman, season_id)
}

mod crud {
    use super::*;

    #[tokio::test]
    async fn new_challenges_start_as_drafts_with_positions() {
        let app = TestApp::spawn().await;
        let (papa, _, season_id) = family_season(&app).await;

        let first = app
            .post_with_token(
                routes::CHALLENGES,
                &json!({
                    "season_id": season_id,
                    "title": "Sunset photo",
                    "description": "Catch the best sunset",
                    "challenge_type": "photo",
                    "points": 50,
                }),
                &papa,
            )
            .await;
        assert_eq!(first.status, 201, "{}", first.text);
        assert_eq!(first.body["status"], "draft");
        assert_eq!(first.body["position"], 0);
        assert_eq!(first.body["difficulty"], 1);

        let second = app
            .post_with_token(
                routes::CHALLENGES,
                &json!({
                    "season_id": season_id,
                    "title": "Lake quiz",
                    "description": "Ten questions about the lake",
                    "challenge_type": "quiz",
                    "points": 30,
                }),
                &papa,
            )
            .await;
        assert_eq!(second.status, 201, "{}", second.text);
        assert_eq!(second.body["position"], 1);
    }

    #[tokio::test]
    async fn plain_members_cannot_create_challenges() {
        let app = TestApp::spawn().await;
        let (_, maman, season_id) = family_season(&app).await;

        let res = app
            .post_with_token(
                routes::CHALLENGES,
                &json!({
                    "season_id": season_id,
                    "title": "Rogue challenge",
                    "description": "Should not exist",
                    "challenge_type": "text",
                    "points": 10,
                }),
                &maman,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn unknown_challenge_type_is_rejected() {
        let app = TestApp::spawn().await;
        let (papa, _, season_id) = family_season(&app).await;

        let res = app
            .post_with_token(
                routes::CHALLENGES,
                &json!({
                    "season_id": season_id,
                    "title": "Karaoke night",
                    "description": "Sing it",
                    "challenge_type": "karaoke",
                    "points": 10,
                }),
                &papa,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn drafts_are_invisible_to_plain_members() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;

        let draft = app
            .post_with_token(
                routes::CHALLENGES,
                &json!({
                    "season_id": season_id,
                    "title": "Surprise",
                    "description": "Not ready yet",
                    "challenge_type": "photo",
                    "points": 20,
                }),
                &papa,
            )
            .await;
        assert_eq!(draft.status, 201, "{}", draft.text);
        let draft_id = draft.id();
        app.create_published_challenge(season_id, &papa, "Visible", 20)
            .await;

        let as_member = app
            .get_with_token(&routes::challenges_in_season(season_id), &maman)
            .await;
        assert_eq!(as_member.status, 200, "{}", as_member.text);
        assert_eq!(as_member.body.as_array().unwrap().len(), 1);
        assert_eq!(as_member.body[0]["title"], "Visible");

        let as_creator = app
            .get_with_token(&routes::challenges_in_season(season_id), &papa)
            .await;
        assert_eq!(as_creator.body.as_array().unwrap().len(), 2);

        let res = app.get_with_token(&routes::challenge(draft_id), &maman).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn manager_can_publish_via_patch() {
        let app = TestApp::spawn().await;
        let (papa, _, season_id) = family_season(&app).await;
        let id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;

        let res = app.get_with_token(&routes::challenge(id), &papa).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "published");
    }
}

mod submissions {
    use super::*;

    #[tokio::test]
    async fn member_submits_and_sees_it_pending() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;

        let res = app
            .post_with_token(
                &routes::challenge_submissions(challenge_id),
                &json!({"content": "Here is my sunset!"}),
                &maman,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["status"], "pending");
        assert!(res.body["points_awarded"].is_null());
    }

    #[tokio::test]
    async fn second_submission_is_rejected() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;
        app.submit_text(challenge_id, &maman, "First try").await;

        let res = app
            .post_with_token(
                &routes::challenge_submissions(challenge_id),
                &json!({"content": "Second try"}),
                &maman,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "ALREADY_SUBMITTED");
    }

    #[tokio::test]
    async fn drafts_do_not_accept_submissions() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;

        let draft = app
            .post_with_token(
                routes::CHALLENGES,
                &json!({
                    "season_id": season_id,
                    "title": "Not yet",
                    "description": "Draft",
                    "challenge_type": "text",
                    "points": 10,
                }),
                &papa,
            )
            .await;
        let draft_id = draft.id();

        let res = app
            .post_with_token(
                &routes::challenge_submissions(draft_id),
                &json!({"content": "Too early"}),
                &maman,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn empty_submissions_are_rejected() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;

        let res = app
            .post_with_token(
                &routes::challenge_submissions(challenge_id),
                &json!({}),
                &maman,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn location_submissions_get_a_distance_annotation() {
        let app = TestApp::spawn().await;
        let (_, papa) = app.register_user("papa@example.com").await;

        let season = app
            .post_with_token(
                routes::SEASONS,
                &json!({
                    "title": "Geo Season",
                    "location": "Lake Annecy",
                    "latitude": 45.8992,
                    "longitude": 6.1294,
                    "start_date": "2025-07-01",
                    "end_date": "2025-07-15",
                }),
                &papa,
            )
            .await;
        assert_eq!(season.status, 201, "{}", season.text);
        let season_id = season.id();

        let challenge = app
            .post_with_token(
                routes::CHALLENGES,
                &json!({
                    "season_id": season_id,
                    "title": "Find the old lighthouse",
                    "description": "Walk there and check in",
                    "challenge_type": "location",
                    "points": 40,
                }),
                &papa,
            )
            .await;
        assert_eq!(challenge.status, 201, "{}", challenge.text);
        let challenge_id = challenge.id();
        app.patch_with_token(
            &routes::challenge(challenge_id),
            &json!({"status": "published"}),
            &papa,
        )
        .await;

        let res = app
            .post_with_token(
                &routes::challenge_submissions(challenge_id),
                &json!({
                    "content": "Checked in!",
                    "metadata": {"latitude": 45.9000, "longitude": 6.1300},
                }),
                &papa,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let distance = res.body["metadata"]["distance_km"]
            .as_f64()
            .expect("distance_km annotation");
        // The two points sit well under a kilometer apart.
        assert!(distance < 1.0, "distance was {distance} km");
    }

    #[tokio::test]
    async fn members_see_only_their_own_submissions() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;
        let (_, ado) = app.register_user("ado@example.com").await;
        let code = app.invitation_code(season_id, &papa).await;
        app.join_by_code(&code, &ado).await;

        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;
        app.submit_text(challenge_id, &maman, "Maman's sunset").await;
        app.submit_text(challenge_id, &ado, "Ado's sunset").await;

        let as_member = app
            .get_with_token(&routes::challenge_submissions(challenge_id), &maman)
            .await;
        assert_eq!(as_member.body.as_array().unwrap().len(), 1);
        assert_eq!(as_member.body[0]["content"], "Maman's sunset");

        let as_manager = app
            .get_with_token(&routes::challenge_submissions(challenge_id), &papa)
            .await;
        assert_eq!(as_manager.body.as_array().unwrap().len(), 2);
    }
}

mod review {
    use super::*;

    #[tokio::test]
    async fn approval_books_points_and_stats() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;
        let submission_id = app.submit_text(challenge_id, &maman, "My sunset").await;

        let res = app
            .post_with_token(
                &routes::submission_review(submission_id),
                &json!({"status": "approved", "feedback": "Beautiful!"}),
                &papa,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "approved");
        assert_eq!(res.body["points_awarded"], 50);
        assert_eq!(res.body["feedback"], "Beautiful!");

        let members = app
            .get_with_token(&routes::season_members(season_id), &papa)
            .await;
        let maman_row = members
            .body
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["role"] == "member")
            .expect("member row");
        // 50 challenge points plus the 5-point First Steps badge bonus.
        assert_eq!(maman_row["total_points"], 55);
        assert_eq!(maman_row["challenges_completed"], 1);
        assert_eq!(maman_row["badges_earned"], 1);
    }

    #[tokio::test]
    async fn approval_with_override_points() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;
        let submission_id = app.submit_text(challenge_id, &maman, "My sunset").await;

        let res = app
            .post_with_token(
                &routes::submission_review(submission_id),
                &json!({"status": "approved", "points_awarded": 30}),
                &papa,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["points_awarded"], 30);
    }

    #[tokio::test]
    async fn rejection_awards_nothing() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;
        let submission_id = app.submit_text(challenge_id, &maman, "Blurry").await;

        let res = app
            .post_with_token(
                &routes::submission_review(submission_id),
                &json!({"status": "rejected", "feedback": "Too blurry"}),
                &papa,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "rejected");

        let members = app
            .get_with_token(&routes::season_members(season_id), &papa)
            .await;
        let maman_row = members
            .body
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["role"] == "member")
            .unwrap();
        assert_eq!(maman_row["total_points"], 0);
        assert_eq!(maman_row["challenges_completed"], 0);
    }

    #[tokio::test]
    async fn members_cannot_review() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;
        let submission_id = app.submit_text(challenge_id, &maman, "My sunset").await;

        let res = app
            .post_with_token(
                &routes::submission_review(submission_id),
                &json!({"status": "approved"}),
                &maman,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn approved_submissions_cannot_be_rereviewed() {
        let app = TestApp::spawn().await;
        let (papa, maman, season_id) = family_season(&app).await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;
        let submission_id = app.submit_text(challenge_id, &maman, "My sunset").await;
        app.approve_submission(submission_id, &papa).await;

        let res = app
            .post_with_token(
                &routes::submission_review(submission_id),
                &json!({"status": "rejected"}),
                &papa,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
