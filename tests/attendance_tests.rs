use pretty_assertions::assert_eq;
use uuid::Uuid;

use attendance::database::models::{ApprovalStatus, AttendanceStatus, Role};
use attendance::error::AttendanceError;
use attendance::services::Actor;

mod common;

use common::{TestContext, at, north_of_office, office};

#[tokio::test]
async fn test_check_in_at_office_is_on_site() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();

    let record = ctx
        .state
        .attendance
        .check_in(worker, office(), false, None, at(3, 8, 55))
        .await
        .unwrap();

    assert_eq!(record.user_id, worker);
    assert_eq!(record.approval_status, ApprovalStatus::None);
    assert!(!record.is_remote);
    assert!(record.is_open());
    assert_eq!(record.check_in_distance_meters, Some(0.0));
    assert_eq!(record.allowed_radius_meters, Some(3000.0));
    assert_eq!(
        ctx.state.attendance.view(record).derived_status,
        AttendanceStatus::Present
    );
}

#[tokio::test]
async fn test_on_site_check_in_outside_radius_is_rejected() {
    let ctx = TestContext::new().await;

    let err = ctx
        .state
        .attendance
        .check_in(Uuid::new_v4(), north_of_office(3500.0), false, None, at(3, 9, 0))
        .await
        .unwrap_err();

    match err {
        AttendanceError::OutOfRange {
            distance_meters,
            allowed_radius_meters,
        } => {
            assert!((distance_meters - 3500.0).abs() < 1.0);
            assert_eq!(allowed_radius_meters, 3000.0);
        }
        other => panic!("expected OutOfRange, got {:?}", other),
    }
    assert!(ctx.records.is_empty());
}

#[tokio::test]
async fn test_remote_check_in_far_away_waits_for_approval() {
    let ctx = TestContext::new().await;

    let record = ctx
        .state
        .attendance
        .check_in(
            Uuid::new_v4(),
            north_of_office(20_000.0),
            true,
            Some("working from home".to_string()),
            at(3, 9, 0),
        )
        .await
        .unwrap();

    assert!(record.is_remote);
    assert_eq!(record.approval_status, ApprovalStatus::Pending);
    assert!(record.check_in_distance_meters.unwrap() > 19_000.0);
    assert_eq!(record.notes.as_deref(), Some("working from home"));
}

#[tokio::test]
async fn test_second_check_in_same_day_conflicts() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let service = &ctx.state.attendance;

    let first = service
        .check_in(worker, office(), false, None, at(3, 9, 0))
        .await
        .unwrap();

    // Still open
    let err = service
        .check_in(worker, office(), false, None, at(3, 10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::AlreadyCheckedIn));

    // Closed, but the day is used up
    service
        .check_out(worker, first.id, None, at(3, 17, 0))
        .await
        .unwrap();
    let err = service
        .check_in(worker, office(), false, None, at(3, 18, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::AlreadyCheckedIn));

    // Next day is fine
    service
        .check_in(worker, office(), false, None, at(4, 9, 0))
        .await
        .unwrap();
    assert_eq!(ctx.records.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_check_ins_create_one_record() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = ctx.state.attendance.clone();
            tokio::spawn(async move {
                service
                    .check_in(worker, office(), false, None, at(3, 9, 0))
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AttendanceError::AlreadyCheckedIn) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(ctx.records.len(), 1);
}

#[tokio::test]
async fn test_check_out_closes_session_and_derives_status() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let service = &ctx.state.attendance;

    let record = service
        .check_in(worker, office(), false, None, at(3, 9, 10))
        .await
        .unwrap();
    let closed = service
        .check_out(worker, record.id, Some(north_of_office(5000.0)), at(3, 17, 0))
        .await
        .unwrap();

    assert_eq!(closed.check_out_time, Some(at(3, 17, 0)));
    // Exit is not geofenced
    assert!(closed.check_out_location.is_some());
    assert_eq!(service.view(closed).derived_status, AttendanceStatus::Late);
}

#[tokio::test]
async fn test_short_session_is_half_day() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let service = &ctx.state.attendance;

    let record = service
        .check_in(worker, office(), false, None, at(3, 9, 0))
        .await
        .unwrap();
    let closed = service
        .check_out(worker, record.id, None, at(3, 13, 0))
        .await
        .unwrap();

    assert_eq!(service.view(closed).derived_status, AttendanceStatus::HalfDay);
}

#[tokio::test]
async fn test_check_out_twice_is_already_checked_out() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let service = &ctx.state.attendance;

    let record = service
        .check_in(worker, office(), false, None, at(3, 9, 0))
        .await
        .unwrap();
    service
        .check_out(worker, record.id, None, at(3, 17, 0))
        .await
        .unwrap();

    let err = service
        .check_out(worker, record.id, None, at(3, 18, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::AlreadyCheckedOut(id) if id == record.id));

    // The first check-out time is untouched
    let stored = service
        .get(&Actor::new(worker, Role::Employee), record.id)
        .await
        .unwrap();
    assert_eq!(stored.check_out_time, Some(at(3, 17, 0)));
}

#[tokio::test]
async fn test_check_out_not_after_check_in_is_rejected() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let service = &ctx.state.attendance;

    let record = service
        .check_in(worker, office(), false, None, at(3, 9, 0))
        .await
        .unwrap();

    for when in [at(3, 9, 0), at(3, 8, 0)] {
        let err = service
            .check_out(worker, record.id, None, when)
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::CheckOutBeforeCheckIn));
    }
}

#[tokio::test]
async fn test_check_out_unknown_or_foreign_record() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let service = &ctx.state.attendance;

    let err = service
        .check_out(worker, Uuid::new_v4(), None, at(3, 17, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound(_)));

    let record = service
        .check_in(worker, office(), false, None, at(3, 9, 0))
        .await
        .unwrap();
    let err = service
        .check_out(Uuid::new_v4(), record.id, None, at(3, 17, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::Unauthorized(_)));
}

#[tokio::test]
async fn test_check_out_open_session() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let service = &ctx.state.attendance;

    let err = service
        .check_out_open(worker, None, at(3, 17, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound(_)));

    let record = service
        .check_in(worker, office(), false, None, at(3, 9, 0))
        .await
        .unwrap();
    let closed = service
        .check_out_open(worker, None, at(3, 17, 0))
        .await
        .unwrap();
    assert_eq!(closed.id, record.id);
}

#[tokio::test]
async fn test_today_uses_office_day() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let service = &ctx.state.attendance;

    assert!(service.today(worker, at(3, 12, 0)).await.unwrap().is_none());

    let record = service
        .check_in(worker, office(), false, None, at(3, 9, 0))
        .await
        .unwrap();

    let today = service.today(worker, at(3, 12, 0)).await.unwrap();
    assert_eq!(today.map(|r| r.id), Some(record.id));
    assert!(service.today(worker, at(4, 12, 0)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_history_visibility() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let service = &ctx.state.attendance;

    for day in [3, 4, 5] {
        let record = service
            .check_in(worker, office(), false, None, at(day, 9, 0))
            .await
            .unwrap();
        service
            .check_out(worker, record.id, None, at(day, 17, 0))
            .await
            .unwrap();
    }

    let owner = Actor::new(worker, Role::Employee);
    let from = at(3, 0, 0).date_naive();
    let to = at(4, 0, 0).date_naive();

    let history = service.history(&owner, worker, from, to).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].work_date < history[1].work_date);

    let manager = ctx.manager_of(&[worker]);
    assert_eq!(
        service.history(&manager, worker, from, to).await.unwrap().len(),
        2
    );

    let stranger = ctx.manager_of(&[]);
    let err = service
        .history(&stranger, worker, from, to)
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::Unauthorized(_)));
}

#[tokio::test]
async fn test_history_rejects_reversed_or_oversized_ranges() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let owner = Actor::new(worker, Role::Employee);
    let service = &ctx.state.attendance;

    let err = service
        .history(&owner, worker, at(5, 0, 0).date_naive(), at(3, 0, 0).date_naive())
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::InvalidDateRange(_)));

    let to = at(3, 0, 0).date_naive();
    let err = service
        .history(&owner, worker, to - chrono::Duration::days(366), to)
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::InvalidDateRange(_)));

    let history = service
        .history(&owner, worker, to - chrono::Duration::days(365), to)
        .await
        .unwrap();
    assert!(history.is_empty());
}
