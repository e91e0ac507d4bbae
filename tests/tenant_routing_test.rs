mod common;

use anyhow::Result;
use reqwest::StatusCode;
use uuid::Uuid;

use gym_api::auth::{encode_token, Claims, TokenKind};

fn mint_access_token() -> Result<String> {
    let claims = Claims::new(
        Uuid::new_v4(),
        "tester@gym.test",
        "admin",
        TokenKind::Access,
        1,
    );
    Ok(encode_token(&claims, common::TEST_SECRET)?)
}

#[tokio::test]
async fn unknown_gym_key_yields_structured_404() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = mint_access_token()?;

    let res = client
        .get(format!(
            "{}/api/members?gym=ghost_gym_that_does_not_exist",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;

    // Never a driver error or a fallback to the control-plane database
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("ghost_gym_that_does_not_exist"),
        "body: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn missing_gym_parameter_is_a_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = mint_access_token()?;

    let res = client
        .get(format!("{}/api/trainers", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "BAD_REQUEST", "body: {}", body);
    Ok(())
}

#[tokio::test]
async fn empty_gym_parameter_is_a_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = mint_access_token()?;

    let res = client
        .get(format!("{}/api/payments?gym=", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
