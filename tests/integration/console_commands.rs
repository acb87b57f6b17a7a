//! Integration tests for the console command surface.
//!
//! Drives roster, session, task and leaderboard commands through
//! [`Console`] the way a presentation layer would, including a store that
//! refuses to save.

use std::time::Duration;

use classroom::config::ConsoleConfig;
use classroom::console::{Console, ConsoleError};
use classroom::persistence::{AttendanceStore, InMemoryAttendanceStore, PersistenceError};
use classroom::roster::{RosterError, RosterStore};
use classroom::session::{
    AttendanceSession, ChannelScans, CheckIn, Countdown, SessionConfig, SimulatedScans,
    TickOutcome,
};
use classroom::tasks::{TaskError, TaskForm};
use classroom_proto::attendance::AttendanceRecord;
use classroom_proto::session::SessionStatus;
use classroom_proto::student::{Student, StudentId};
use classroom_proto::task::{AssignTo, TaskId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Store whose backend is always down.
struct FailingStore;

impl AttendanceStore for FailingStore {
    async fn save(&self, _record: &AttendanceRecord) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("connection refused".to_string()))
    }
}

fn make_console() -> Console<SimulatedScans, InMemoryAttendanceStore> {
    Console::from_config(
        &ConsoleConfig::default(),
        SimulatedScans::new(0.0),
        InMemoryAttendanceStore::new(),
    )
    .unwrap()
}

fn make_failing_console() -> Console<SimulatedScans, FailingStore> {
    Console::from_config(&ConsoleConfig::default(), SimulatedScans::new(0.0), FailingStore).unwrap()
}

async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

#[test]
fn toggling_absent_student_raises_present_count() {
    let mut console = make_console();
    assert_eq!(console.attendance_summary().present, 3);
    assert_eq!(console.attendance_summary().total, 5);

    assert!(console.toggle_attendance(StudentId::new(3)).unwrap());
    assert_eq!(console.attendance_summary().present, 4);
}

#[test]
fn toggle_twice_restores_roster() {
    let mut console = make_console();
    let before = console.roster().to_vec();
    console.toggle_attendance(StudentId::new(2)).unwrap();
    console.toggle_attendance(StudentId::new(2)).unwrap();
    assert_eq!(console.roster(), before.as_slice());
}

#[test]
fn toggle_unknown_student_changes_nothing() {
    let mut console = make_console();
    let before = console.roster().to_vec();
    let err = console.toggle_attendance(StudentId::new(99)).unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::Roster(RosterError::NotFound(id)) if id == StudentId::new(99)
    ));
    assert_eq!(console.roster(), before.as_slice());
}

#[test]
fn reset_discards_manual_edits() {
    let mut console = make_console();
    console.toggle_attendance(StudentId::new(1)).unwrap();
    console.toggle_attendance(StudentId::new(5)).unwrap();
    console.reset_roster();
    assert_eq!(console.attendance_summary().to_string(), "Present: 3/5");
}

#[test]
fn duplicate_roster_ids_are_rejected() {
    let config = ConsoleConfig {
        students: vec![
            Student::new(1, "Aarav Patel", true, 95),
            Student::new(1, "Bianca Singh", true, 88),
        ],
        ..ConsoleConfig::default()
    };
    let result = Console::from_config(&config, SimulatedScans::new(0.0), InMemoryAttendanceStore::new());
    assert!(matches!(result, Err(RosterError::DuplicateId(_))));
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_hands_record_to_store() {
    let mut console = make_console();
    console.toggle_attendance(StudentId::new(3)).unwrap();
    assert_eq!(console.save_attendance().await.unwrap(), 5);

    let saved = console.store().latest().await.unwrap().unwrap();
    assert_eq!(saved.section, "CS-201: Data Structures");
    assert_eq!(saved.participants(), 5);
    assert_eq!(saved.present_count(), 4);
}

#[tokio::test]
async fn failed_save_surfaces_and_keeps_state() {
    let mut console = make_failing_console();
    console.toggle_attendance(StudentId::new(3)).unwrap();

    let err = console.save_attendance().await.unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::Persistence(PersistenceError::Unavailable(_))
    ));
    assert_eq!(err.to_string(), "attendance store unavailable: connection refused");
    // The roster is untouched, so the save can be retried by the caller.
    assert_eq!(console.attendance_summary().present, 4);
}

// ---------------------------------------------------------------------------
// QR session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_uses_roster_size_as_bound() {
    let console = make_console();
    let snapshot = console.start_qr_session();
    assert_eq!(snapshot.status, SessionStatus::Active);
    assert_eq!(snapshot.remaining_secs, 300);
    assert_eq!(snapshot.roster_size, 5);
    assert!(console.session_timers_running());
    assert!(console.stop_qr_session());
    assert!(!console.session_timers_running());
}

#[tokio::test]
async fn manual_ticks_drive_expiry() {
    let config = ConsoleConfig {
        session: SessionConfig {
            countdown: Countdown::Manual,
            ..SessionConfig::default()
        },
        ..ConsoleConfig::default()
    };
    let console =
        Console::from_config(&config, SimulatedScans::new(0.0), InMemoryAttendanceStore::new())
            .unwrap();
    console.start_qr_session();
    for _ in 0..300 {
        console.tick();
    }
    let snapshot = console.session();
    assert_eq!(snapshot.status, SessionStatus::Expired);
    assert_eq!(snapshot.remaining_secs, 0);
    assert!(!console.session_timers_running());
}

#[tokio::test(start_paused = true)]
async fn console_tick_ignored_while_timer_runs() {
    let console = make_console();
    console.start_qr_session();
    assert_eq!(console.tick(), TickOutcome::Idle);
    assert_eq!(console.session().remaining_secs, 300);
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(console.session().remaining_secs, 298);
}

#[tokio::test(start_paused = true)]
async fn channel_check_ins_reach_console_session() {
    let (tx, source) = ChannelScans::new(16);
    let console = Console::new(
        "CS-201",
        RosterStore::new(classroom::roster::demo_roster()).unwrap(),
        AttendanceSession::new(SessionConfig::default(), source),
        InMemoryAttendanceStore::new(),
    );
    console.start_qr_session();
    settle().await;
    for _ in 0..7 {
        tx.send(CheckIn).await.unwrap();
    }
    settle().await;
    assert_eq!(console.session().scan_count, 5);

    tokio::time::sleep(Duration::from_millis(300_500)).await;
    assert_eq!(console.session().status, SessionStatus::Expired);
}

#[tokio::test(start_paused = true)]
async fn dropping_console_cancels_window() {
    let (tx, source) = ChannelScans::new(16);
    let console = Console::new(
        "CS-201",
        RosterStore::new(classroom::roster::demo_roster()).unwrap(),
        AttendanceSession::new(SessionConfig::default(), source),
        InMemoryAttendanceStore::new(),
    );
    console.start_qr_session();
    settle().await;
    drop(console);
    settle().await;
    assert!(tx.is_closed());
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[test]
fn homework_for_class_expects_every_student() {
    let mut console = make_console();
    let task = console.create_task(TaskForm {
        title: "HW1".to_string(),
        assign_to: AssignTo::WholeClass,
        ..TaskForm::default()
    });
    assert_eq!(task.total, 5);
    assert_eq!(task.submitted, 0);
    assert_eq!(console.tasks().len(), 1);
    assert_eq!(console.tasks()[0], task);
}

#[test]
fn task_ids_are_unique_and_newest_listed_first() {
    let mut console = make_console();
    let first = console.create_task(TaskForm::titled("HW1"));
    let second = console.create_task(TaskForm::titled("HW2"));
    let empty = console.create_task(TaskForm::default());
    assert_ne!(first.id, second.id);
    assert_ne!(second.id, empty.id);
    assert!(empty.title.is_empty());

    let recent: Vec<&str> = console.recent_tasks(2).map(|t| t.title.as_str()).collect();
    assert_eq!(recent, vec!["", "HW2"]);
}

#[test]
fn submissions_stop_at_total() {
    let mut console = make_console();
    let task = console.create_task(TaskForm::titled("Quiz"));
    for expected in 1..=5 {
        assert_eq!(console.record_submission(&task.id).unwrap(), expected);
    }
    let err = console.record_submission(&task.id).unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::Task(TaskError::SubmissionsComplete { total: 5, .. })
    ));
    assert!(console.tasks()[0].is_complete());
}

#[test]
fn submission_for_unknown_task_is_not_found() {
    let mut console = make_console();
    let err = console.record_submission(&TaskId::new()).unwrap_err();
    assert!(matches!(err, ConsoleError::Task(TaskError::NotFound(_))));
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

#[test]
fn leaderboard_follows_points() {
    let console = make_console();
    let board = console.leaderboard();
    let points: Vec<u32> = board.iter().map(|e| e.student.points).collect();
    assert_eq!(points, vec![95, 88, 81, 72, 65]);
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].student.name, "Aarav Patel");
    assert_eq!(board[2].student.name, "Disha Mehta");
}

#[test]
fn leaderboard_ignores_attendance() {
    let mut console = make_console();
    let before: Vec<StudentId> = console.leaderboard().iter().map(|e| e.student.id).collect();
    console.toggle_attendance(StudentId::new(1)).unwrap();
    let after: Vec<StudentId> = console.leaderboard().iter().map(|e| e.student.id).collect();
    assert_eq!(before, after);
}
