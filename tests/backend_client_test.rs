use fit_tracker::api::{ApiError, BackendClient};
use fit_tracker::config::ApiConfig;
use fit_tracker::metrics::MergeOutcome;
use fit_tracker::models::{DailyPlan, UserProfile, WorkoutLog, WorkoutPlan};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BackendClient {
    let config = ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    };
    BackendClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_login_holds_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "sam", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = client.login("sam", "secret").await.unwrap();

    assert_eq!(token, "tok-1");
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_bad_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.login("sam", "wrong").await;

    assert!(matches!(result, Err(ApiError::AuthenticationFailed(_))));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_rejected_session_clears_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("stale");
    let result = client.get_logs().await;

    assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    assert!(!client.is_authenticated());

    // the next call fails locally without reaching the server
    assert!(matches!(
        client.get_logs().await,
        Err(ApiError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_missing_profile_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    assert_eq!(client.get_profile().await.unwrap(), None);
}

#[tokio::test]
async fn test_profile_decodes_leniently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Sam",
            "age": "31",
            "weight": "abc",
            "height": 180,
            "goal": "weight-loss",
            "fitnessLevel": "advanced"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    let profile: UserProfile = client.get_profile().await.unwrap().unwrap();

    assert_eq!(profile.age, 31);
    assert_eq!(profile.weight, 0.0);
    assert!(profile.weight_history.is_empty());
}

#[tokio::test]
async fn test_logs_sorted_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "date": "2024-03-01T10:00:00Z", "title": "Legs", "duration": 40, "calories": 300},
            {"id": "b", "date": "2024-03-05T10:00:00Z", "title": "Run", "duration": "30", "calories": null},
            {"id": "c", "date": "2024-03-03T10:00:00Z", "title": "Push", "duration": 50, "calories": 350,
             "exercises": [{"type": "strength", "name": "Bench", "sets": [{"weight": 60, "reps": 8}]}]}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    let logs: Vec<WorkoutLog> = client.get_logs().await.unwrap();

    let ids: Vec<&str> = logs.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    assert_eq!(logs[0].duration, 30);
    assert_eq!(logs[0].calories, 0);
    assert_eq!(logs[1].set_count(), 1);
}

#[tokio::test]
async fn test_add_weight_posts_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/weight"))
        .and(header("Authorization", "Bearer tok"))
        .and(body_json(json!({"weight": 81.5})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    assert_ok!(client.add_weight(81.5).await);
}

#[tokio::test]
async fn test_server_error_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plan"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    let result = client.get_plan().await;

    assert!(matches!(result, Err(ApiError::ServerError(ref m)) if m == "maintenance"));
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_record_log_posts_incoming_not_merged() {
    let server = MockServer::start().await;
    let existing = WorkoutLog::new("Morning run", 30, 300);
    let incoming = WorkoutLog::new("Evening lift", 20, 150).with_notes("felt strong");

    Mock::given(method("POST"))
        .and(path("/logs"))
        .and(header("Authorization", "Bearer tok"))
        .and(body_partial_json(json!({
            "id": incoming.id,
            "title": "Evening lift",
            "duration": 20,
            "calories": 150
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    let mut logs = vec![existing.clone()];
    let outcome = client.record_log(&mut logs, incoming).await.unwrap();

    // the local copy mirrors the merge the server performs
    assert_eq!(outcome, MergeOutcome::Merged(0));
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].id, existing.id);
    assert_eq!(logs[0].duration, 50);
    assert_eq!(logs[0].calories, 450);
}

#[tokio::test]
async fn test_record_log_leaves_list_alone_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    let mut logs = vec![WorkoutLog::new("Morning run", 30, 300)];
    let result = client
        .record_log(&mut logs, WorkoutLog::new("Evening lift", 20, 150))
        .await;

    assert!(matches!(result, Err(ApiError::ServerError(_))));
    assert_eq!(logs[0].duration, 30);
}

#[tokio::test]
async fn test_save_profile_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/profile"))
        .and(body_partial_json(json!({
            "name": "Sam",
            "age": 31,
            "weight": 80.0,
            "fitnessLevel": "beginner"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    assert_ok!(client.save_profile(&UserProfile::new("Sam", 31, 80.0, 180.0)).await);
}

#[tokio::test]
async fn test_save_plan_posts_days() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/plan"))
        .and(body_partial_json(json!({
            "title": "Base building",
            "days": [{"day": "Monday", "duration": 40, "exercises": ["Run"]}]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let plan = WorkoutPlan {
        title: "Base building".to_string(),
        goal: "endurance".to_string(),
        days: vec![DailyPlan {
            day: "Monday".to_string(),
            focus: "Aerobic".to_string(),
            exercises: vec!["Run".to_string()],
            duration: 40,
            notes: String::new(),
        }],
    };

    let client = client_for(&server).with_token("tok");
    assert_ok!(client.save_plan(&plan).await);
}
