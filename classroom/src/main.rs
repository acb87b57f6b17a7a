//! `classroom`: line-oriented teacher console.
//!
//! Reads commands from stdin and prints dashboard views to stdout. The QR
//! check-in window runs in the background while the prompt stays usable.
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/classroom/config.toml`).
//!
//! ```bash
//! # Demo roster, 5 minute window
//! cargo run --bin classroom
//!
//! # Short window with fast ticks
//! cargo run --bin classroom -- --window-secs 30 --tick-millis 200
//! ```

use std::io;
use std::path::Path;

use chrono::NaiveDate;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_appender::non_blocking::WorkerGuard;

use classroom::config::{CliArgs, ConsoleConfig};
use classroom::console::Console;
use classroom::persistence::InMemoryAttendanceStore;
use classroom::session::SimulatedScans;
use classroom::tasks::TaskForm;
use classroom_proto::student::{Student, StudentId};
use classroom_proto::task::{AssignTo, TaskId};

/// Rows shown by `board` when no count is given.
const LEADERBOARD_PREVIEW: usize = 5;

type DemoConsole = Console<SimulatedScans, InMemoryAttendanceStore>;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ConsoleConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config: {e}");
            ConsoleConfig::default()
        }
    };

    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(section = %config.section, "classroom console starting");

    let mut console = match Console::from_config(
        &config,
        SimulatedScans::new(config.scan_probability),
        InMemoryAttendanceStore::new(),
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid roster: {e}");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
        }
    };

    println!("{}  ({})", console.section(), console.attendance_summary());
    println!("Type `help` for commands.");

    let result = run_console(&mut console).await;

    console.stop_qr_session();
    tracing::info!("classroom console exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs go to a file so they never interleave with the prompt. Returns a
/// [`WorkerGuard`] that must be held until shutdown to flush buffered
/// entries.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("classroom.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    Roster,
    Toggle(StudentId),
    Reset,
    Save,
    Start,
    Stop,
    Status,
    CheckIn(StudentId),
    Task(TaskForm),
    Submit(TaskId),
    Tasks,
    Board(usize),
    Json,
    Quit,
}

/// Parses one input line. `Ok(None)` means a blank line.
fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let command = match word {
        "help" | "?" => Command::Help,
        "roster" => Command::Roster,
        "toggle" => Command::Toggle(parse_student(rest)?),
        "reset" => Command::Reset,
        "save" => Command::Save,
        "start" => Command::Start,
        "stop" => Command::Stop,
        "status" => Command::Status,
        "checkin" => Command::CheckIn(parse_student(rest)?),
        "task" => Command::Task(parse_task_form(rest)?),
        "submit" => {
            let uuid = uuid::Uuid::parse_str(rest).map_err(|e| format!("bad task id: {e}"))?;
            Command::Submit(TaskId::from_uuid(uuid))
        }
        "tasks" => Command::Tasks,
        "board" | "leaderboard" => {
            if rest.is_empty() {
                Command::Board(LEADERBOARD_PREVIEW)
            } else {
                Command::Board(rest.parse().map_err(|e| format!("bad row count: {e}"))?)
            }
        }
        "json" => Command::Json,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(Some(command))
}

fn parse_student(arg: &str) -> Result<StudentId, String> {
    arg.parse()
        .map_err(|e| format!("expected a student id, got `{arg}`: {e}"))
}

/// `title | description | YYYY-MM-DD | class|<student id>`; trailing parts optional.
fn parse_task_form(arg: &str) -> Result<TaskForm, String> {
    let mut parts = arg.split('|').map(str::trim);
    let mut form = TaskForm::titled(parts.next().unwrap_or_default());

    if let Some(description) = parts.next() {
        form.description = description.to_string();
    }
    if let Some(deadline) = parts.next().filter(|d| !d.is_empty()) {
        form.deadline = Some(
            NaiveDate::parse_from_str(deadline, "%Y-%m-%d")
                .map_err(|e| format!("bad deadline `{deadline}`: {e}"))?,
        );
    }
    if let Some(assignee) = parts.next().filter(|a| !a.is_empty()) {
        form.assign_to = if assignee == "class" {
            AssignTo::WholeClass
        } else {
            AssignTo::Student(parse_student(assignee)?)
        };
    }
    Ok(form)
}

/// Reads commands until `quit` or end of input.
async fn run_console(console: &mut DemoConsole) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(console, command).await,
            Err(e) => println!("error: {e}"),
        }
    }
    Ok(())
}

async fn execute(console: &mut DemoConsole, command: Command) {
    match command {
        Command::Help => print_help(),
        Command::Roster => {
            for s in console.roster() {
                println!("{}", roster_line(s));
            }
            println!("{}", console.attendance_summary());
        }
        Command::Toggle(id) => match console.toggle_attendance(id) {
            Ok(present) => println!(
                "student {id} marked {}",
                if present { "present" } else { "absent" }
            ),
            Err(e) => println!("error: {e}"),
        },
        Command::Reset => {
            console.reset_roster();
            println!("roster reset ({})", console.attendance_summary());
        }
        Command::Save => match console.save_attendance().await {
            Ok(n) => println!("Attendance saved for {n} students"),
            Err(e) => println!("error: {e}"),
        },
        Command::Start => {
            let snapshot = console.start_qr_session();
            println!(
                "QR window open for {} (0/{} scanned)",
                snapshot.remaining_display(),
                snapshot.roster_size
            );
        }
        Command::Stop => {
            if console.stop_qr_session() {
                println!("QR window closed");
            } else {
                println!("no QR window open");
            }
        }
        Command::Status => {
            let snapshot = console.session();
            if snapshot.is_active() {
                println!(
                    "{}  {} left  {}/{} scanned",
                    snapshot.status,
                    snapshot.remaining_display(),
                    snapshot.scan_count,
                    snapshot.roster_size
                );
            } else {
                println!("{}  {} scanned", snapshot.status, snapshot.scan_count);
            }
        }
        Command::CheckIn(id) => match console.check_in(id) {
            Ok(true) => println!("student {id} checked in"),
            Ok(false) => println!("student {id} was already present"),
            Err(e) => println!("error: {e}"),
        },
        Command::Task(form) => {
            let task = console.create_task(form);
            println!("created task {} ({} submissions expected)", task.id, task.total);
        }
        Command::Submit(id) => match console.record_submission(&id) {
            Ok(submitted) => println!("task {id}: {submitted} submitted"),
            Err(e) => println!("error: {e}"),
        },
        Command::Tasks => {
            for task in console.recent_tasks(usize::MAX) {
                let deadline = task
                    .deadline
                    .map_or_else(|| "no deadline".to_string(), |d| d.to_string());
                println!(
                    "{}  {:<24} {}/{}  {}  [{}]",
                    task.id, task.title, task.submitted, task.total, deadline, task.assign_to
                );
            }
        }
        Command::Board(n) => {
            for entry in console.leaderboard_top(n) {
                println!(
                    "#{:<2} ({}) {:<20} {:>4} pts",
                    entry.rank,
                    entry.student.initial().unwrap_or('?'),
                    entry.student.name,
                    entry.student.points
                );
            }
        }
        Command::Json => print_json(console),
        Command::Quit => {}
    }
}

/// One roster row: presence mark, id, avatar initial, name and points.
fn roster_line(s: &Student) -> String {
    let mark = if s.present { "x" } else { " " };
    let initial = s.initial().unwrap_or('?');
    format!(
        "[{mark}] {:>3}  ({initial}) {:<20} {:>4} pts",
        s.id.get(),
        s.name,
        s.points
    )
}

fn print_json(console: &DemoConsole) {
    let summary = console.attendance_summary();
    let view = serde_json::json!({
        "section": console.section(),
        "present": summary.present,
        "total": summary.total,
        "session": console.session(),
        "tasks": console.tasks(),
        "leaderboard": console.leaderboard(),
    });
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("error: {e}"),
    }
}

fn print_help() {
    println!(
        "\
roster                     list students and attendance
toggle <id>                flip a student's attendance
reset                      discard unsaved attendance edits
save                       save attendance
start | stop | status      QR check-in window
checkin <id>               mark a student present through the QR window
task <title>[|desc|YYYY-MM-DD|class or id]
submit <task id>           count one submission
tasks                      list tasks, newest first
board [n]                  leaderboard preview
json                       dump the dashboard as JSON
quit"
    );
}
