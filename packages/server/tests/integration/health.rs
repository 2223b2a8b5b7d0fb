use crate::common::{TestApp, routes};

#[tokio::test]
async fn health_reports_healthy() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::HEALTH).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["environment"], "test");
    assert!(res.body["version"].is_string());
}

#[tokio::test]
async fn readiness_includes_database_state() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::HEALTH_READY).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["status"], "ready");
    assert_eq!(res.body["database"], "connected");
}

#[tokio::test]
async fn liveness_answers_without_auth() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::HEALTH_LIVE).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["status"], "alive");
}
