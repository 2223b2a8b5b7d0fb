use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_receives_both_tokens() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "email": "papa@example.com",
                    "username": "papa_aventurier",
                    "password": "TestPass123!",
                    "confirm_password": "TestPass123!",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["user_id"].is_number());
        assert_eq!(res.body["email"], "papa@example.com");
        assert_eq!(res.body["username"], "papa_aventurier");
        assert_eq!(res.body["token_type"], "bearer");
        assert!(res.body["access_token"].is_string());
        assert!(res.body["refresh_token"].is_string());
        assert_eq!(res.body["expires_in"], 30 * 60);
    }

    #[tokio::test]
    async fn mismatched_passwords_yield_400() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "email": "papa@example.com",
                    "password": "TestPass123!",
                    "confirm_password": "SomethingElse1!",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn duplicate_email_yields_400() {
        let app = TestApp::spawn().await;
        let body = json!({
            "email": "papa@example.com",
            "password": "TestPass123!",
            "confirm_password": "TestPass123!",
        });

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "{}", first.text);

        let res = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "EMAIL_REGISTERED");
    }

    #[tokio::test]
    async fn email_comparison_ignores_case() {
        let app = TestApp::spawn().await;
        app.register_user("papa@example.com").await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "email": "PAPA@example.com",
                    "password": "TestPass123!",
                    "confirm_password": "TestPass123!",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "EMAIL_REGISTERED");
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "email": "not-an-email",
                    "password": "TestPass123!",
                    "confirm_password": "TestPass123!",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "email": "papa@example.com",
                    "password": "short",
                    "confirm_password": "short",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_can_log_in() {
        let app = TestApp::spawn().await;
        app.register_user("papa@example.com").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "papa@example.com", "password": "TestPass123!"}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["access_token"].is_string());
        assert_eq!(res.body["email"], "papa@example.com");
    }

    #[tokio::test]
    async fn wrong_password_yields_401() {
        let app = TestApp::spawn().await;
        app.register_user("papa@example.com").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "papa@example.com", "password": "WrongPass123!"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_email_yields_401() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "nobody@example.com", "password": "TestPass123!"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod tokens {
    use super::*;

    #[tokio::test]
    async fn authenticated_me_returns_own_record() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.register_user("papa@example.com").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["user_id"], user_id);
        assert_eq!(res.body["email"], "papa@example.com");
        assert_eq!(res.body["is_active"], true);
    }

    #[tokio::test]
    async fn request_without_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-valid-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn refresh_token_cannot_be_used_as_bearer() {
        let app = TestApp::spawn().await;
        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "email": "papa@example.com",
                    "password": "TestPass123!",
                    "confirm_password": "TestPass123!",
                }),
            )
            .await;
        let refresh = res.body["refresh_token"].as_str().unwrap().to_string();

        let res = app.get_with_token(routes::ME, &refresh).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn refresh_endpoint_issues_a_new_pair() {
        let app = TestApp::spawn().await;
        let reg = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "email": "papa@example.com",
                    "password": "TestPass123!",
                    "confirm_password": "TestPass123!",
                }),
            )
            .await;
        let refresh = reg.body["refresh_token"].as_str().unwrap().to_string();

        let res = app
            .post_without_token(routes::REFRESH, &json!({"refresh_token": refresh}))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["access_token"].is_string());
        assert!(res.body["refresh_token"].is_string());
    }

    #[tokio::test]
    async fn access_token_is_rejected_by_refresh_endpoint() {
        let app = TestApp::spawn().await;
        let (_, access) = app.register_user("papa@example.com").await;

        let res = app
            .post_without_token(routes::REFRESH, &json!({"refresh_token": access}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn logout_confirms_and_requires_auth() {
        let app = TestApp::spawn().await;
        let (_, token) = app.register_user("papa@example.com").await;

        let res = app
            .post_with_token(routes::LOGOUT, &json!({}), &token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Logged out successfully");

        let res = app.post_without_token(routes::LOGOUT, &json!({})).await;
        assert_eq!(res.status, 401);
    }
}

mod request_validation {
    use super::*;

    #[tokio::test]
    async fn malformed_json_body_returns_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::REGISTER))
            .header("Content-Type", "application/json")
            .body("not valid json")
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_required_fields_return_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &json!({"email": "papa@example.com"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
