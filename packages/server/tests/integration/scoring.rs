use serde_json::json;

use crate::common::{TestApp, routes};

async fn family_season(app: &TestApp) -> (String, String, i32, i32) {
    let (_, papa) = app.register_user("papa@example.com").await;
    let (maman_id, maman) = app.register_user("maman@example.com").await;
    let season_id = app.create_season(&papa, "Summer 2025").await;
    let code = app.invitation_code(season_id, &papa).await;
    let joined = app.join_by_code(&code, &maman).await;
    assert_eq!(joined.status, 201, "{}", joined.text);
    (papa, maman, maman_id, season_id)
}

mod award_points {
    use super::*;

    #[tokio::test]
    async fn manager_awards_manual_points() {
        let app = TestApp::spawn().await;
        let (papa, _, maman_id, season_id) = family_season(&app).await;

        let res = app
            .post_with_token(
                routes::AWARD_POINTS,
                &json!({
                    "user_id": maman_id,
                    "season_id": season_id,
                    "points": 25,
                    "description": "Helped set up the picnic",
                }),
                &papa,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["points"], 25);
        assert_eq!(res.body["score_type"], "manual");

        let members = app
            .get_with_token(&routes::season_members(season_id), &papa)
            .await;
        let maman_row = members
            .body
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["user_id"] == maman_id)
            .unwrap();
        assert_eq!(maman_row["total_points"], 25);
    }

    #[tokio::test]
    async fn penalties_subtract_points() {
        let app = TestApp::spawn().await;
        let (papa, _, maman_id, season_id) = family_season(&app).await;

        let award = json!({
            "user_id": maman_id,
            "season_id": season_id,
            "points": 30,
            "description": "Quiz win",
        });
        let res = app.post_with_token(routes::AWARD_POINTS, &award, &papa).await;
        assert_eq!(res.status, 201, "{}", res.text);

        let penalty = json!({
            "user_id": maman_id,
            "season_id": season_id,
            "points": -10,
            "score_type": "penalty",
            "description": "Splashed the referee",
        });
        let res = app
            .post_with_token(routes::AWARD_POINTS, &penalty, &papa)
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let board = app
            .get_with_token(&routes::leaderboard(season_id), &papa)
            .await;
        let maman_entry = board.body["entries"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["user_id"] == maman_id)
            .unwrap();
        assert_eq!(maman_entry["total_points"], 20);
    }

    #[tokio::test]
    async fn plain_members_cannot_award() {
        let app = TestApp::spawn().await;
        let (_, maman, maman_id, season_id) = family_season(&app).await;

        let res = app
            .post_with_token(
                routes::AWARD_POINTS,
                &json!({
                    "user_id": maman_id,
                    "season_id": season_id,
                    "points": 1000,
                    "description": "Self-service",
                }),
                &maman,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn awarding_to_a_non_member_is_404() {
        let app = TestApp::spawn().await;
        let (papa, _, _, season_id) = family_season(&app).await;
        let (outsider_id, _) = app.register_user("visitor@example.com").await;

        let res = app
            .post_with_token(
                routes::AWARD_POINTS,
                &json!({
                    "user_id": outsider_id,
                    "season_id": season_id,
                    "points": 10,
                    "description": "Not in this family",
                }),
                &papa,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod leaderboard {
    use super::*;

    #[tokio::test]
    async fn ranks_members_by_points() {
        let app = TestApp::spawn().await;
        let (papa, _, maman_id, season_id) = family_season(&app).await;
        let (ado_id, ado) = app.register_user("ado@example.com").await;
        let code = app.invitation_code(season_id, &papa).await;
        app.join_by_code(&code, &ado).await;

        for (user_id, points) in [(maman_id, 40), (ado_id, 70)] {
            let res = app
                .post_with_token(
                    routes::AWARD_POINTS,
                    &json!({
                        "user_id": user_id,
                        "season_id": season_id,
                        "points": points,
                        "description": "Warmup",
                    }),
                    &papa,
                )
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
        }

        let res = app
            .get_with_token(&routes::leaderboard(season_id), &papa)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total_participants"], 3);
        let entries = res.body["entries"].as_array().unwrap();
        assert_eq!(entries[0]["user_id"], ado_id);
        assert_eq!(entries[0]["rank"], 1);
        assert_eq!(entries[0]["total_points"], 70);
        assert_eq!(entries[1]["user_id"], maman_id);
        assert_eq!(entries[1]["rank"], 2);
    }

    #[tokio::test]
    async fn leaderboard_is_members_only() {
        let app = TestApp::spawn().await;
        let (_, _, _, season_id) = family_season(&app).await;
        let (_, outsider) = app.register_user("visitor@example.com").await;

        let res = app
            .get_with_token(&routes::leaderboard(season_id), &outsider)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn uses_profile_display_names() {
        let app = TestApp::spawn().await;
        let (papa, _, _, season_id) = family_season(&app).await;
        let create = app
            .post_with_token(
                routes::PROFILE_ME_PROFILE,
                &json!({"display_name": "Papa Aventurier"}),
                &papa,
            )
            .await;
        assert_eq!(create.status, 201, "{}", create.text);

        let res = app
            .get_with_token(&routes::leaderboard(season_id), &papa)
            .await;
        let names: Vec<&str> = res.body["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["display_name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"Papa Aventurier"), "names: {names:?}");
    }
}

mod stats {
    use super::*;

    #[tokio::test]
    async fn totals_and_streaks_reflect_the_ledger() {
        let app = TestApp::spawn().await;
        let (papa, maman, maman_id, season_id) = family_season(&app).await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;
        let submission_id = app.submit_text(challenge_id, &maman, "My sunset").await;
        app.approve_submission(submission_id, &papa).await;

        let res = app
            .get_with_token(
                &format!("{}?season_id={}", routes::user_stats(maman_id), season_id),
                &maman,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        // 50 challenge points + 5 First Steps badge bonus.
        assert_eq!(res.body["total_points"], 55);
        assert_eq!(res.body["season_points"], 55);
        assert_eq!(res.body["challenges_completed"], 1);
        assert_eq!(res.body["badges_earned"], 1);
        // Everything happened today, so the streak is one day.
        assert_eq!(res.body["current_streak"], 1);
        assert_eq!(res.body["longest_streak"], 1);
    }

    #[tokio::test]
    async fn stats_for_unknown_user_are_404() {
        let app = TestApp::spawn().await;
        let (_, token) = app.register_user("papa@example.com").await;

        let res = app.get_with_token(&routes::user_stats(4242), &token).await;

        assert_eq!(res.status, 404);
    }
}

mod badges {
    use super::*;

    #[tokio::test]
    async fn catalog_hides_hidden_badges_until_earned() {
        let app = TestApp::spawn().await;
        let (_, token) = app.register_user("papa@example.com").await;

        let res = app.get_with_token(routes::BADGES, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"First Steps"), "names: {names:?}");
        // "Unstoppable" is seeded hidden.
        assert!(!names.contains(&"Unstoppable"), "names: {names:?}");
    }

    #[tokio::test]
    async fn first_approved_challenge_earns_first_steps() {
        let app = TestApp::spawn().await;
        let (papa, maman, _, season_id) = family_season(&app).await;
        let challenge_id = app
            .create_published_challenge(season_id, &papa, "Sunset photo", 50)
            .await;
        let submission_id = app.submit_text(challenge_id, &maman, "My sunset").await;
        app.approve_submission(submission_id, &papa).await;

        let res = app.get_with_token(routes::MY_BADGES, &maman).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let earned = res.body.as_array().unwrap();
        assert_eq!(earned.len(), 1);
        assert_eq!(earned[0]["badge"]["name"], "First Steps");
        assert_eq!(earned[0]["season_id"], season_id);
    }

    #[tokio::test]
    async fn my_badges_starts_empty() {
        let app = TestApp::spawn().await;
        let (_, token) = app.register_user("papa@example.com").await;

        let res = app.get_with_token(routes::MY_BADGES, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn point_milestone_badge_unlocks_at_500() {
        let app = TestApp::spawn().await;
        let (papa, maman, maman_id, season_id) = family_season(&app).await;

        let res = app
            .post_with_token(
                routes::AWARD_POINTS,
                &json!({
                    "user_id": maman_id,
                    "season_id": season_id,
                    "points": 500,
                    "description": "Grand slam",
                }),
                &papa,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let earned = app.get_with_token(routes::MY_BADGES, &maman).await;
        let names: Vec<&str> = earned
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["badge"]["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"Point Collector"), "names: {names:?}");
    }
}
