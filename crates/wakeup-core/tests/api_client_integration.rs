//! Integration tests for the challenge API client against a mock server.

use chrono::NaiveDate;
use mockito::Matcher;
use wakeup_core::{ApiError, ChallengeApiClient, ChallengeId, ChallengeSnapshot, ChallengeSource, ChallengeStatus};

const TWO_CHALLENGES: &str = r#"{
    "challenges": [
        {"id": 1, "challengeDate": "2025-08-09", "wakeUpTime": "06:00", "forfeitAmount": 100, "status": "PENDING", "isSuccessful": false},
        {"id": 2, "challengeDate": "2025-08-09", "wakeUpTime": "07:30", "forfeitAmount": 50, "status": "PROCESSED", "isSuccessful": true}
    ],
    "totalElements": 2
}"#;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 9).unwrap()
}

#[tokio::test]
async fn fetches_challenges_for_date_with_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/challenges/date/2025-08-09")
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TWO_CHALLENGES)
        .create_async()
        .await;

    let client = ChallengeApiClient::new(&server.url(), Some("secret-token".into())).unwrap();
    let records = client.challenges_for_date(date()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].status, ChallengeStatus::Processed);

    let snapshot = ChallengeSnapshot::from_records(records);
    assert_eq!(snapshot.challenges_for_date(date()).len(), 2);
}

#[tokio::test]
async fn single_challenge_response_is_accepted() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/challenges/date/2025-08-09")
        .with_status(200)
        .with_body(r#"{"challenge": {"id": 7, "challengeDate": "2025-08-09", "wakeUpTime": "06:15", "forfeitAmount": 20, "status": "ACTIVE"}}"#)
        .create_async()
        .await;

    let client = ChallengeApiClient::new(&server.url(), None).unwrap();
    let records = client.challenges_for_date(date()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, ChallengeId(7));
    assert!(records[0].status.is_pending());
}

#[tokio::test]
async fn lists_pages_with_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/challenges(\?.*)?$".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("size".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(TWO_CHALLENGES)
        .create_async()
        .await;

    let client = ChallengeApiClient::new(&format!("{}/", server.url()), None).unwrap();
    let records = client.list_challenges(1, 10).await.unwrap();
    mock.assert_async().await;
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn fetches_stats() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/challenges/stats")
        .with_status(200)
        .with_body(r#"{"totalChallenges":4,"successfulChallenges":3,"failedChallenges":1,"currentStreak":2,"longestStreak":3,"successRate":75.0}"#)
        .create_async()
        .await;

    let client = ChallengeApiClient::new(&server.url(), None).unwrap();
    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total_challenges, 4);
    assert_eq!(stats.current_streak, 2);
}

#[tokio::test]
async fn unauthorized_maps_to_login_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/challenges/status/PENDING")
        .with_status(401)
        .with_body(r#"{"error":"token expired"}"#)
        .create_async()
        .await;

    let client = ChallengeApiClient::new(&server.url(), Some("stale".into())).unwrap();
    let err = client.challenges_by_status(ChallengeStatus::Pending).await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Please login again");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn bad_request_surfaces_backend_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/challenges/date/2025-08-09")
        .with_status(400)
        .with_body(r#"{"error":"Date out of range"}"#)
        .create_async()
        .await;

    let client = ChallengeApiClient::new(&server.url(), None).unwrap();
    let err = client.challenges_for_date(date()).await.unwrap_err();
    assert_eq!(err.to_string(), "Date out of range (HTTP 400)");
}

#[tokio::test]
async fn malformed_body_is_reported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/challenges/stats")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = ChallengeApiClient::new(&server.url(), None).unwrap();
    assert!(matches!(client.stats().await, Err(ApiError::UnexpectedBody(_))));
}
