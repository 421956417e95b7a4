mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = reqwest::Client::new().get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK, "unexpected status: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    assert!(body.get("timestamp").is_some(), "missing timestamp: {}", body);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_rejected() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.get("/cashcards/99", ("random-user", "random-password")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(reqwest::header::WWW_AUTHENTICATE));

    let res = server.get("/cashcards/99", ("sarah1", "wrong-password")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = reqwest::Client::new().get(server.url("/cashcards")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn users_without_card_owner_role_are_forbidden() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.get("/cashcards/99", common::TIM).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.get("/cashcards", common::TIM).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .post("/cashcards", common::TIM)
        .json(&serde_json::json!({ "amount": 5.0 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
