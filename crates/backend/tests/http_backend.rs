use std::time::Duration;

use backend::{BackendConfig, BackendError, HttpBackend, TrainerBackend};
use serde_json::json;
use backend::records::{GoalDraft, NewPet, SessionChanges};
use trainer_core::model::{BookId, MilestoneId, PetId, ReadingStatus, SessionId};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    let config = BackendConfig::new(&server.uri(), Duration::from_millis(500)).unwrap();
    HttpBackend::new(config).unwrap()
}

#[tokio::test]
async fn lists_sessions_and_notes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/training_sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "session_date": "2024-03-02",
                "duration_minutes": 60,
                "pet_id": 2,
                "pet": { "name": "Biscuit" },
                "training_focus": ["Recall"]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 9, "created_at": "2024-03-03T10:00:00.000Z", "pet_id": 2, "content": "good day" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let sessions = backend.list_sessions().await.unwrap();
    let notes = backend.list_notes().await.unwrap();

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].pet_id(), Some(PetId::new(2)));
    assert_eq!(notes[0].content, "good day");
    assert_eq!(notes[0].pet_id, Some(PetId::new(2)));
}

#[tokio::test]
async fn status_errors_carry_backend_messages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "errors": ["a", "b"] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/milestones"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);

    let err = backend.list_pets().await.unwrap_err();
    assert_eq!(err.to_string(), "a, b");
    assert!(!err.is_transient());

    let err = backend.list_milestones().await.unwrap_err();
    assert_eq!(err.to_string(), "API request failed");
    assert!(err.is_transient());
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/training/stats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server).stats().await.unwrap_err();

    assert!(matches!(err, BackendError::Timeout));
    assert_eq!(err.to_string(), "Request timeout");
}

#[tokio::test]
async fn malformed_bodies_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/training_sessions/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_hours": "lots" })))
        .mount(&server)
        .await;

    let err = backend_for(&server).summary().await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn missing_goal_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/certification_goal"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(backend_for(&server).certification_goal().await.unwrap().is_none());
}

#[tokio::test]
async fn books_map_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/my_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "Don't Shoot the Dog", "author": "Karen Pryor", "status": "read" },
            { "id": 2, "title": "The Other End of the Leash", "author": "Patricia McConnell" }
        ])))
        .mount(&server)
        .await;

    let books = backend_for(&server).my_books().await.unwrap();
    assert_eq!(books[0].status, ReadingStatus::Read);
    assert_eq!(books[1].status, ReadingStatus::NotStarted);
}

#[tokio::test]
async fn create_session_posts_wrapped_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/training_sessions"))
        .and(body_json(json!({
            "training_session": {
                "session_date": "2024-06-15",
                "duration_minutes": 90,
                "session_type": "training",
                "training_focus": []
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "session": { "id": 44, "session_date": "2024-06-15", "duration_minutes": 90 },
            "new_milestone": { "id": 3, "hours_reached": 100, "celebrated": false }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let new = backend::records::NewSession {
        pet_id: None,
        session_date: chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        duration_minutes: 90,
        session_type: "training".into(),
        notes: None,
        focus: Default::default(),
    };
    let created = backend_for(&server).create_session(&new).await.unwrap();

    assert_eq!(created.session.duration_minutes(), 90);
    assert_eq!(created.new_milestone.unwrap().id, MilestoneId::new(3));
}

#[tokio::test]
async fn celebrating_unknown_milestone_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/milestones/7/mark_celebrated"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .mark_milestone_celebrated(MilestoneId::new(7))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::NotFound));
}

#[tokio::test]
async fn stats_breakdown_keeps_backend_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/training/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "total_stats": { "total_hours": 3, "total_sessions": 4, "unique_dogs": 1 },
                "breakdown_by_type": { "scent_work": 2, "agility": "1.0" },
                "monthly_comparison": { "this_month": 3, "last_month": 0, "change_percentage": 100 }
            }"#,
        ))
        .mount(&server)
        .await;

    let stats = backend_for(&server).stats().await.unwrap();
    let keys: Vec<_> = stats.breakdown_by_type.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["scent_work", "agility"]);
}

#[tokio::test]
async fn unreadable_breakdown_value_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/training/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_stats": { "total_hours": 3, "total_sessions": 4, "unique_dogs": 1 },
            "breakdown_by_type": { "agility": "lots" },
            "monthly_comparison": { "this_month": 3, "last_month": 0, "change_percentage": 100 }
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server).stats().await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn session_edit_patches_only_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/training_sessions/12"))
        .and(body_json(json!({ "training_session": { "duration_minutes": 25 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12, "session_date": "2024-06-15", "duration_minutes": 25
        })))
        .expect(1)
        .mount(&server)
        .await;

    let changes = SessionChanges {
        duration_minutes: Some(25),
        ..SessionChanges::default()
    };
    let session = backend_for(&server)
        .update_session(SessionId::new(12), &changes)
        .await
        .unwrap();
    assert_eq!(session.duration_minutes(), 25);
}

#[tokio::test]
async fn reading_list_writes_hit_book_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/books/3/add_to_list"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 30, "title": "Don't Shoot the Dog", "author": "Karen Pryor", "status": "not_started"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/books/30"))
        .and(body_json(json!({ "book": { "status": "in_progress" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 30, "title": "Don't Shoot the Dog", "author": "Karen Pryor", "status": "in_progress"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/books/30"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let added = backend.add_book_to_list(BookId::new(3)).await.unwrap();
    assert_eq!(added.id, BookId::new(30));

    let updated = backend
        .update_book_status(added.id, ReadingStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(updated.status, ReadingStatus::InProgress);

    backend.remove_book(added.id).await.unwrap();
}

#[tokio::test]
async fn pet_writes_send_wrapped_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pets"))
        .and(body_json(json!({
            "pet": { "name": "Juniper", "spayed_neutered": true, "origin_trainer": true }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 8, "name": "Juniper", "spayed_neutered": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/pets/8/active"))
        .and(body_json(json!({ "active": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8, "name": "Juniper", "active": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let pet = backend
        .create_pet(&NewPet {
            name: "Juniper".into(),
            spayed_neutered: true,
            ..NewPet::default()
        })
        .await
        .unwrap();
    assert_eq!(pet.id, PetId::new(8));

    let pet = backend.set_pet_active(pet.id, false).await.unwrap();
    assert!(!pet.active);
}

#[tokio::test]
async fn goal_create_posts_and_update_patches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/certification_goal"))
        .and(body_json(json!({
            "certification_goal": {
                "certification_type": "CPDT-KA",
                "target_hours": 300.0,
                "weekly_goal_hours": 5.0
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "certification_type": "CPDT-KA", "target_hours": 300, "weekly_goal_hours": 5
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/certification_goal"))
        .and(body_json(json!({
            "certification_goal": {
                "certification_type": "CPDT-KA",
                "weekly_goal_hours": 7.0,
                "target_completion_date": "2025-01-31"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "certification_type": "CPDT-KA",
            "target_hours": "300.0",
            "weekly_goal_hours": "7.0",
            "target_completion_date": "2025-01-31"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let created = backend
        .create_goal(&GoalDraft {
            certification_type: "CPDT-KA".into(),
            target_hours: Some(300.0),
            weekly_goal_hours: 5.0,
            target_completion_date: None,
        })
        .await
        .unwrap();
    assert!((created.target_hours - 300.0).abs() < f64::EPSILON);

    let updated = backend
        .update_goal(&GoalDraft {
            certification_type: "CPDT-KA".into(),
            target_hours: None,
            weekly_goal_hours: 7.0,
            target_completion_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 31),
        })
        .await
        .unwrap();
    assert!((updated.weekly_goal_hours - 7.0).abs() < f64::EPSILON);
    assert_eq!(updated.target_completion_date.as_deref(), Some("2025-01-31"));
}
