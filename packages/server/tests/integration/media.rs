use crate::common::{TestApp, routes};

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

#[tokio::test]
async fn upload_then_download_round_trips() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_user("papa@example.com").await;

    let mut bytes = PNG_MAGIC.to_vec();
    bytes.extend_from_slice(b"fake image payload");

    let res = app
        .upload_with_token("sunset.png", bytes.clone(), &token)
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["category"], "image");
    assert_eq!(res.body["content_type"], "image/png");
    assert_eq!(res.body["filename"], "sunset.png");
    assert_eq!(res.body["size"], bytes.len());
    let id = res.body["id"].as_str().unwrap().to_string();
    assert_eq!(res.body["url"], format!("/media/{id}"));

    let download = app
        .client
        .get(format!("http://{}{}", app.addr, routes::media(&id)))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await
        .expect("download failed");

    assert_eq!(download.status().as_u16(), 200);
    assert_eq!(
        download
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
    let etag = download
        .headers()
        .get("etag")
        .and_then(|v| v.to_str().ok())
        .expect("etag header")
        .to_string();
    let downloaded = download.bytes().await.unwrap();
    assert_eq!(downloaded.as_ref(), bytes.as_slice());

    // A matching If-None-Match short-circuits to 304.
    let cached = app
        .client
        .get(format!("http://{}{}", app.addr, routes::media(&id)))
        .header("Authorization", format!("Bearer {token}"))
        .header("If-None-Match", etag)
        .send()
        .await
        .expect("conditional download failed");
    assert_eq!(cached.status().as_u16(), 304);
}

#[tokio::test]
async fn disallowed_extension_is_rejected() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_user("papa@example.com").await;

    let res = app
        .upload_with_token("malware.exe", b"MZ...".to_vec(), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn filenames_with_path_separators_are_rejected() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_user("papa@example.com").await;

    let res = app
        .upload_with_token("../escape.png", b"data".to_vec(), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_media_id_is_404() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_user("papa@example.com").await;

    let res = app
        .get_with_token(
            &routes::media("00000000-0000-7000-8000-000000000000"),
            &token,
        )
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn uploads_require_authentication() {
    let app = TestApp::spawn().await;

    let part = reqwest::multipart::Part::bytes(b"data".to_vec()).file_name("a.png");
    let form = reqwest::multipart::Form::new().part("file", part);
    let res = app
        .client
        .post(format!("http://{}{}", app.addr, routes::MEDIA))
        .multipart(form)
        .send()
        .await
        .expect("request failed");

    assert_eq!(res.status().as_u16(), 401);
}
