use std::sync::Arc;

use chrono::{Days, NaiveDate};
use hrm_lite::model::attendance::{AttendanceStatus, MarkAttendance};
use hrm_lite::model::employee::CreateEmployee;
use hrm_lite::repo::{AttendanceRepository, InMemoryRepository};
use hrm_lite::{StoreError, Stores};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

async fn setup() -> (Stores, Arc<InMemoryRepository>, u64) {
    let repo = Arc::new(InMemoryRepository::new());
    let stores = Stores::build_with_clock(repo.clone(), false, Arc::new(today));
    let ann = stores
        .employees
        .create(CreateEmployee {
            employee_code: "E1".into(),
            full_name: "Ann Lee".into(),
            email: "ann@x.com".into(),
            department: "Eng".into(),
        })
        .await
        .unwrap();
    (stores, repo, ann.id)
}

fn mark(employee: u64, date: Option<NaiveDate>, status: &str) -> MarkAttendance {
    MarkAttendance {
        employee,
        date,
        status: status.to_string(),
        notes: None,
    }
}

#[actix_web::test]
async fn second_mark_updates_the_same_record() {
    let (stores, _, ann) = setup().await;
    assert_eq!(ann, 1);

    let first = stores
        .attendance
        .mark(mark(ann, Some(day(10)), "Present"))
        .await
        .unwrap();
    assert!(first.created);
    assert_eq!(first.attendance.status, AttendanceStatus::Present);

    let second = stores
        .attendance
        .mark(mark(ann, Some(day(10)), "Absent"))
        .await
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.attendance.id, first.attendance.id);
    assert_eq!(second.attendance.status, AttendanceStatus::Absent);
    assert_eq!(second.attendance.created_at, first.attendance.created_at);
    assert!(second.attendance.updated_at >= first.attendance.updated_at);

    let records = stores.attendance.list_for_employee(ann, None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, day(10));
    assert_eq!(records[0].status, AttendanceStatus::Absent);
}

#[actix_web::test]
async fn repeated_identical_mark_converges() {
    let (stores, _, ann) = setup().await;
    for _ in 0..3 {
        stores
            .attendance
            .mark(mark(ann, Some(day(3)), "Leave"))
            .await
            .unwrap();
    }
    let records = stores.attendance.list_for_employee(ann, None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, AttendanceStatus::Leave);
}

#[actix_web::test]
async fn date_defaults_to_today() {
    let (stores, _, ann) = setup().await;
    let outcome = stores.attendance.mark(mark(ann, None, "Present")).await.unwrap();
    assert_eq!(outcome.attendance.date, today());
}

#[actix_web::test]
async fn today_is_accepted_and_tomorrow_is_rejected() {
    let (stores, repo, ann) = setup().await;
    assert!(stores.attendance.mark(mark(ann, Some(today()), "Present")).await.is_ok());

    let tomorrow = today().checked_add_days(Days::new(1)).unwrap();
    let err = stores
        .attendance
        .mark(mark(ann, Some(tomorrow), "Present"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation { field: "date", .. }), "got {err:?}");
    assert!(repo.list_for_employee(ann, Some(tomorrow)).await.unwrap().is_empty());
}

#[actix_web::test]
async fn unknown_employee_is_rejected_without_storing() {
    let (stores, repo, _) = setup().await;
    let err = stores
        .attendance
        .mark(mark(999, Some(today()), "Present"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation { field: "employee", .. }), "got {err:?}");
    assert!(repo.list_for_employee(999, None).await.unwrap().is_empty());
}

#[actix_web::test]
async fn unknown_status_is_rejected() {
    let (stores, _, ann) = setup().await;
    let err = stores
        .attendance
        .mark(mark(ann, Some(day(2)), "Late"))
        .await
        .unwrap_err();
    match err {
        StoreError::Validation { field, reason } => {
            assert_eq!(field, "status");
            assert!(reason.contains("Present, Absent, Leave"));
        }
        other => panic!("expected status validation error, got {other:?}"),
    }
    assert!(stores.attendance.list_for_employee(ann, None).await.unwrap().is_empty());
}

#[actix_web::test]
async fn status_is_case_insensitive() {
    let (stores, _, ann) = setup().await;
    let outcome = stores.attendance.mark(mark(ann, Some(day(2)), "leave")).await.unwrap();
    assert_eq!(outcome.attendance.status, AttendanceStatus::Leave);
}

#[actix_web::test]
async fn notes_are_trimmed_and_overwritten() {
    let (stores, _, ann) = setup().await;
    let mut input = mark(ann, Some(day(4)), "Present");
    input.notes = Some("  client visit ".into());
    let first = stores.attendance.mark(input).await.unwrap();
    assert_eq!(first.attendance.notes.as_deref(), Some("client visit"));

    let mut input = mark(ann, Some(day(4)), "Present");
    input.notes = Some("   ".into());
    let second = stores.attendance.mark(input).await.unwrap();
    assert_eq!(second.attendance.notes, None);
}

#[actix_web::test]
async fn list_returns_every_date_newest_first() {
    let (stores, _, ann) = setup().await;
    for d in [3, 12, 1, 7, 15] {
        stores
            .attendance
            .mark(mark(ann, Some(day(d)), "Present"))
            .await
            .unwrap();
    }

    let dates: Vec<NaiveDate> = stores
        .attendance
        .list_for_employee(ann, None)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.date)
        .collect();
    assert_eq!(dates, vec![day(15), day(12), day(7), day(3), day(1)]);
}

#[actix_web::test]
async fn list_can_filter_by_date() {
    let (stores, _, ann) = setup().await;
    stores.attendance.mark(mark(ann, Some(day(3)), "Present")).await.unwrap();
    stores.attendance.mark(mark(ann, Some(day(4)), "Absent")).await.unwrap();

    let only = stores
        .attendance
        .list_for_employee(ann, Some(day(4)))
        .await
        .unwrap();
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].status, AttendanceStatus::Absent);

    assert!(stores
        .attendance
        .list_for_employee(ann, Some(day(5)))
        .await
        .unwrap()
        .is_empty());
}

#[actix_web::test]
async fn list_for_unknown_employee_is_not_found() {
    let (stores, _, _) = setup().await;
    let err = stores.attendance.list_for_employee(404, None).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[actix_web::test]
async fn records_are_kept_per_employee() {
    let (stores, _, ann) = setup().await;
    let bob = stores
        .employees
        .create(CreateEmployee {
            employee_code: "E2".into(),
            full_name: "Bob Stone".into(),
            email: "bob@x.com".into(),
            department: "Ops".into(),
        })
        .await
        .unwrap();

    let a = stores.attendance.mark(mark(ann, Some(day(9)), "Present")).await.unwrap();
    let b = stores.attendance.mark(mark(bob.id, Some(day(9)), "Leave")).await.unwrap();
    assert!(a.created && b.created);
    assert_ne!(a.attendance.id, b.attendance.id);
}

#[actix_web::test]
async fn views_carry_the_employee_checked_during_the_call() {
    let (stores, _, ann) = setup().await;

    let (view, created) = stores
        .attendance
        .mark_view(mark(ann, Some(day(12)), "Leave"))
        .await
        .unwrap();
    assert!(created);
    assert_eq!(view.employee, ann);
    assert_eq!(view.employee_code, "E1");
    assert_eq!(view.employee_name, "Ann Lee");
    assert_eq!(view.department, "Eng");
    assert_eq!(view.status, AttendanceStatus::Leave);

    let (again, created) = stores
        .attendance
        .mark_view(mark(ann, Some(day(12)), "Present"))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(again.id, view.id);

    let views = stores.attendance.list_views(ann, None).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].employee_name, "Ann Lee");
    assert_eq!(views[0].status, AttendanceStatus::Present);

    let err = stores.attendance.list_views(404, None).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    let err = stores
        .attendance
        .mark_view(mark(404, Some(day(12)), "Present"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation { field: "employee", .. }));
}

#[test]
fn concurrent_marks_for_one_day_store_a_single_record() {
    let (stores, repo, ann) = futures::executor::block_on(setup());

    let outcomes: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = stores.attendance.clone();
                scope.spawn(move || {
                    let status = if i % 2 == 0 { "Present" } else { "Absent" };
                    futures::executor::block_on(store.mark(mark(ann, Some(day(11)), status)))
                        .unwrap()
                        .created
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outcomes.iter().filter(|created| **created).count(), 1);
    let records = futures::executor::block_on(repo.list_for_employee(ann, None)).unwrap();
    assert_eq!(records.len(), 1);
}
