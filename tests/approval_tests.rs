use pretty_assertions::assert_eq;
use uuid::Uuid;

use attendance::database::models::{ApprovalDecision, ApprovalStatus, AttendanceRecord, Role};
use attendance::error::AttendanceError;
use attendance::services::Actor;

mod common;

use common::{TestContext, at, north_of_office, office};

async fn remote_check_in(ctx: &TestContext, worker: Uuid, day: u32) -> AttendanceRecord {
    ctx.state
        .attendance
        .check_in(worker, north_of_office(15_000.0), true, None, at(day, 9, 0))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_list_pending_is_scoped_to_team() {
    let ctx = TestContext::new().await;
    let mine = Uuid::new_v4();
    let other = Uuid::new_v4();
    let manager = ctx.manager_of(&[mine]);

    let pending = remote_check_in(&ctx, mine, 3).await;
    remote_check_in(&ctx, other, 3).await;
    // On-site sessions never show up
    ctx.state
        .attendance
        .check_in(Uuid::new_v4(), office(), false, None, at(3, 9, 0))
        .await
        .unwrap();

    let listed = ctx.state.approvals.list_pending(&manager).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, pending.id);
}

#[tokio::test]
async fn test_employee_cannot_list_or_resolve() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let record = remote_check_in(&ctx, worker, 3).await;
    let employee = Actor::new(Uuid::new_v4(), Role::Employee);

    let err = ctx.state.approvals.list_pending(&employee).await.unwrap_err();
    assert!(matches!(err, AttendanceError::Unauthorized(_)));

    let err = ctx
        .state
        .approvals
        .resolve(&employee, record.id, ApprovalDecision::Approved, None, at(3, 10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::Unauthorized(_)));
}

#[tokio::test]
async fn test_approve_records_the_decision() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let manager = ctx.manager_of(&[worker]);
    let record = remote_check_in(&ctx, worker, 3).await;

    let resolved = ctx
        .state
        .approvals
        .resolve(
            &manager,
            record.id,
            ApprovalDecision::Approved,
            Some("client site visit".to_string()),
            at(3, 10, 0),
        )
        .await
        .unwrap();

    assert_eq!(resolved.approval_status, ApprovalStatus::Approved);
    assert_eq!(resolved.resolved_by, Some(manager.user_id));
    assert_eq!(resolved.resolved_at, Some(at(3, 10, 0)));
    assert_eq!(resolved.resolution_notes.as_deref(), Some("client site visit"));
    // Session fields are left alone
    assert_eq!(resolved.check_in_time, record.check_in_time);
    assert!(resolved.counts_toward_attendance());

    assert!(ctx.state.approvals.list_pending(&manager).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_resolution_keeps_the_first() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let manager = ctx.manager_of(&[worker]);
    let record = remote_check_in(&ctx, worker, 3).await;

    ctx.state
        .approvals
        .resolve(&manager, record.id, ApprovalDecision::Rejected, None, at(3, 10, 0))
        .await
        .unwrap();

    let err = ctx
        .state
        .approvals
        .resolve(&manager, record.id, ApprovalDecision::Approved, None, at(3, 11, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::AlreadyResolved(id) if id == record.id));

    let stored = ctx.state.attendance.get(&manager, record.id).await.unwrap();
    assert_eq!(stored.approval_status, ApprovalStatus::Rejected);
    assert!(!stored.counts_toward_attendance());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolutions_have_one_winner() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let first = ctx.manager_of(&[worker]);
    let second = ctx.manager_of(&[worker]);
    let record_id = remote_check_in(&ctx, worker, 3).await.id;

    let a = {
        let approvals = ctx.state.approvals.clone();
        tokio::spawn(async move {
            approvals
                .resolve(&first, record_id, ApprovalDecision::Approved, None, at(3, 10, 0))
                .await
        })
    };
    let b = {
        let approvals = ctx.state.approvals.clone();
        tokio::spawn(async move {
            approvals
                .resolve(&second, record_id, ApprovalDecision::Rejected, None, at(3, 10, 0))
                .await
        })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(AttendanceError::AlreadyResolved(_))))
    );

    let stored = ctx.state.attendance.get(&first, record_id).await.unwrap();
    assert_eq!(stored.approval_status, winners[0].approval_status);
}

#[tokio::test]
async fn test_manager_outside_scope_or_own_record() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let stranger = ctx.manager_of(&[]);
    let record = remote_check_in(&ctx, worker, 3).await;

    let err = ctx
        .state
        .approvals
        .resolve(&stranger, record.id, ApprovalDecision::Approved, None, at(3, 10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::Unauthorized(_)));

    // A manager checking in remotely cannot sign off their own session
    let manager = ctx.manager_of(&[]);
    ctx.directory.assign(manager.user_id, manager.user_id);
    let own = remote_check_in(&ctx, manager.user_id, 3).await;
    let err = ctx
        .state
        .approvals
        .resolve(&manager, own.id, ApprovalDecision::Approved, None, at(3, 10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::Unauthorized(_)));
}

#[tokio::test]
async fn test_resolve_missing_or_on_site_record() {
    let ctx = TestContext::new().await;
    let worker = Uuid::new_v4();
    let manager = ctx.manager_of(&[worker]);

    let err = ctx
        .state
        .approvals
        .resolve(&manager, Uuid::new_v4(), ApprovalDecision::Approved, None, at(3, 10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound(_)));

    let on_site = ctx
        .state
        .attendance
        .check_in(worker, office(), false, None, at(3, 9, 0))
        .await
        .unwrap();
    let err = ctx
        .state
        .approvals
        .resolve(&manager, on_site.id, ApprovalDecision::Approved, None, at(3, 10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound(_)));
}
