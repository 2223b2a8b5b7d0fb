use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn account_endpoint_mirrors_auth_me() {
    let app = TestApp::spawn().await;
    let (user_id, token) = app.register_user("papa@example.com").await;

    let res = app.get_with_token(routes::PROFILE_ME, &token).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["user_id"], user_id);
    assert_eq!(res.body["email"], "papa@example.com");
}

#[tokio::test]
async fn username_can_be_set_later() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_user("papa@example.com").await;

    let res = app
        .put_with_token(
            routes::PROFILE_ME,
            &json!({"username": "papa_aventurier"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["username"], "papa_aventurier");
}

#[tokio::test]
async fn username_collisions_are_rejected() {
    let app = TestApp::spawn().await;
    let (_, papa) = app.register_user("papa@example.com").await;
    let (_, maman) = app.register_user("maman@example.com").await;
    let res = app
        .put_with_token(routes::PROFILE_ME, &json!({"username": "lakefan"}), &papa)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app
        .put_with_token(routes::PROFILE_ME, &json!({"username": "lakefan"}), &maman)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn profile_create_update_cycle() {
    let app = TestApp::spawn().await;
    let (user_id, token) = app.register_user("maman@example.com").await;

    let res = app
        .post_with_token(
            routes::PROFILE_ME_PROFILE,
            &json!({
                "display_name": "Maman Photographe",
                "bio": "Loves sunsets",
                "age": 45,
                "challenge_preferences": {"photo": true, "difficulty": "medium"},
            }),
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["user_id"], user_id);
    assert_eq!(res.body["display_name"], "Maman Photographe");
    assert_eq!(res.body["language"], "fr");
    assert_eq!(res.body["is_public"], true);

    let res = app
        .put_with_token(
            routes::PROFILE_ME_PROFILE,
            &json!({"display_name": "Maman Pro", "is_public": false}),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["display_name"], "Maman Pro");
    assert_eq!(res.body["is_public"], false);
    // Untouched fields survive.
    assert_eq!(res.body["bio"], "Loves sunsets");
}

#[tokio::test]
async fn creating_a_second_profile_fails() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_user("maman@example.com").await;
    let body = json!({"display_name": "Maman"});

    let first = app
        .post_with_token(routes::PROFILE_ME_PROFILE, &body, &token)
        .await;
    assert_eq!(first.status, 201, "{}", first.text);

    let res = app
        .post_with_token(routes::PROFILE_ME_PROFILE, &body, &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn updating_a_missing_profile_is_404() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_user("maman@example.com").await;

    let res = app
        .put_with_token(
            routes::PROFILE_ME_PROFILE,
            &json!({"display_name": "Ghost"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn private_profiles_are_hidden_from_others() {
    let app = TestApp::spawn().await;
    let (maman_id, maman) = app.register_user("maman@example.com").await;
    let (_, papa) = app.register_user("papa@example.com").await;

    let res = app
        .post_with_token(
            routes::PROFILE_ME_PROFILE,
            &json!({"display_name": "Maman", "is_public": false}),
            &maman,
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);

    let res = app.get_with_token(&routes::user(maman_id), &papa).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["user_id"], maman_id);
    assert!(res.body["profile"].is_null());
}

#[tokio::test]
async fn public_profiles_are_visible_to_others() {
    let app = TestApp::spawn().await;
    let (maman_id, maman) = app.register_user("maman@example.com").await;
    let (_, papa) = app.register_user("papa@example.com").await;

    app.post_with_token(
        routes::PROFILE_ME_PROFILE,
        &json!({"display_name": "Maman Photographe"}),
        &maman,
    )
    .await;

    let res = app.get_with_token(&routes::user(maman_id), &papa).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["profile"]["display_name"], "Maman Photographe");
}

#[tokio::test]
async fn unknown_user_is_404() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_user("papa@example.com").await;

    let res = app.get_with_token(&routes::user(4242), &token).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
