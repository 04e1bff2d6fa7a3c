//! Plain-text rendering of the service views.

use std::fmt::Write as _;

use chrono::NaiveDate;

use backend::records::GoalRecord;
use services::{
    BooksView, DashboardView, LoggedSession, PetActivityView, PetSummary, PetsView, ProfileView,
    StatsView,
};
use trainer_core::model::{Book, TrainingSession};
use trainer_core::stats::hours_badge;
use trainer_core::{DateLabel, MilestoneState, TimelineEntry};

pub fn dashboard(view: &DashboardView, today: NaiveDate) -> String {
    let snapshot = &view.snapshot;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:.1} / {:.0} hours ({:.0}%)",
        snapshot.total_hours, snapshot.target_hours, snapshot.progress.percentage
    );
    if snapshot.progress.hours_over > 0.0 {
        let _ = writeln!(out, "{:.1} hours past the target", snapshot.progress.hours_over);
    } else {
        let _ = writeln!(out, "{:.1} hours to go", snapshot.progress.hours_remaining);
    }
    let _ = writeln!(
        out,
        "This week: {:.1} / {:.1} hours, {}",
        view.week_hours,
        view.week_goal,
        view.weekly.status_text()
    );
    let _ = writeln!(
        out,
        "Streak: {} days (best {})",
        snapshot.streaks.current_days, snapshot.streaks.longest_days
    );
    if let Some(date) = view.projected_completion {
        let _ = writeln!(out, "Projected completion: {}", date.format("%b %-d, %Y"));
    }
    if let Some(next) = &view.next_milestone {
        let _ = writeln!(out, "Next milestone: {} {}", next.badge, next.name);
    }
    if let Some(milestone) = &view.celebration {
        let _ = writeln!(
            out,
            "Milestone reached: {} hours! (id {})",
            milestone.hours_reached, milestone.id
        );
    }
    out.push_str(&milestones("Milestones", &snapshot.milestones));
    if !view.recent.is_empty() {
        out.push_str("Recent sessions:\n");
        out.push_str(&timeline(&view.recent, today));
    }
    out
}

pub fn logged(logged: &LoggedSession) -> String {
    let session = &logged.session;
    let mut out = format!(
        "Logged {} with {} ({})\n",
        hours_badge(session.duration_minutes()),
        session.subject().display_name(),
        session.date()
    );
    if let Some(milestone) = &logged.celebration {
        let _ = writeln!(
            out,
            "Milestone reached: {} hours! (id {})",
            milestone.hours_reached, milestone.id
        );
    }
    out
}

pub fn edited(session: &TrainingSession) -> String {
    format!(
        "Updated session {}: {} with {} ({})\n",
        session.id(),
        hours_badge(session.duration_minutes()),
        session.subject().display_name(),
        session.date()
    )
}

pub fn activity(view: &PetActivityView, today: NaiveDate) -> String {
    let mut out = format!(
        "{} sessions, {} notes, {:.1} hours\n",
        view.session_count, view.note_count, view.total_hours
    );
    if view.is_empty() {
        out.push_str("No activity yet.\n");
    } else {
        out.push_str(&timeline(&view.entries, today));
    }
    out
}

pub fn profile(view: &ProfileView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Level: {}", view.level);
    if let Some(goal) = &view.goal {
        let _ = writeln!(out, "Goal: {}", goal.certification_type);
    }
    let _ = writeln!(
        out,
        "{:.1} / {:.0} hours over {} sessions ({:.0}%)",
        view.total_hours, view.target_hours, view.total_sessions, view.progress.percentage
    );
    let _ = writeln!(
        out,
        "Streak: {} days (best {})",
        view.streaks.current_days, view.streaks.longest_days
    );
    out.push_str(&milestones("Hour milestones", &view.hour_milestones));
    let _ = writeln!(out, "Books read: {}", view.books_read);
    out.push_str(&milestones("Reading milestones", &view.book_milestones));
    out
}

pub fn stats(view: &StatsView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:.1} hours, {} sessions, {} dogs, {:.0} min average",
        view.total_hours, view.total_sessions, view.unique_dogs, view.average_session_minutes
    );
    let _ = writeln!(
        out,
        "This month {:.1}h, last month {:.1}h ({})",
        view.monthly.this_month,
        view.monthly.last_month,
        view.monthly.summary()
    );
    if !view.focus.is_empty() {
        out.push_str("Focus:\n");
        for share in &view.focus {
            let _ = writeln!(out, "  {:<20} {:>5.1}h {:>3}%", share.label, share.hours, share.percent);
        }
    }
    if !view.weekly_trend.is_empty() {
        out.push_str("Weekly trend:\n");
        for point in &view.weekly_trend {
            let _ = writeln!(out, "  {:<12} {:.1}h", point.week, point.hours);
        }
    }
    out
}

pub fn books(view: &BooksView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Categories: {} (showing {})",
        view.categories.join(", "),
        view.selected_category
    );
    for rec in &view.recommendations {
        let marker = if rec.on_my_list { "*" } else { " " };
        let _ = writeln!(out, " {marker} {} by {}", rec.book.title, rec.book.author);
    }
    let list = &view.my_list;
    for (heading, books) in [
        ("In Progress", &list.in_progress),
        ("Not Started", &list.not_started),
        ("Read", &list.read),
    ] {
        if books.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{heading} ({}):", books.len());
        for book in books {
            let _ = writeln!(out, "  {} by {}", book.title, book.author);
        }
    }
    out
}

pub fn pets(view: &PetsView) -> String {
    let mut out = String::new();
    for (heading, pets) in [("Active", &view.active), ("Inactive", &view.inactive)] {
        if pets.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{heading}:");
        for summary in pets {
            let age = summary
                .age_years
                .map_or_else(|| "age unknown".to_string(), |years| format!("{years}y"));
            let _ = writeln!(out, "  [{}] {} ({age})", summary.pet.id, summary.pet.name);
        }
    }
    if out.is_empty() {
        out.push_str("No pets yet.\n");
    }
    out
}

pub fn book(verb: &str, book: &Book) -> String {
    format!(
        "{verb} [{}] {} by {} ({})\n",
        book.id,
        book.title,
        book.author,
        book.status.label()
    )
}

pub fn pet_saved(summary: &PetSummary) -> String {
    let state = if summary.pet.active { "active" } else { "inactive" };
    format!("[{}] {} is {state}\n", summary.pet.id, summary.pet.name)
}

pub fn goal(goal: &GoalRecord) -> String {
    let mut out = format!(
        "Goal: {} at {:.0} hours, {:.1} hours a week\n",
        goal.certification_type, goal.target_hours, goal.weekly_goal_hours
    );
    if let Some(date) = &goal.target_completion_date {
        let _ = writeln!(out, "Target date: {date}");
    }
    out
}

fn milestones(heading: &str, states: &[MilestoneState]) -> String {
    let mut out = format!("{heading}:");
    for state in states {
        let mark = if state.unlocked { state.milestone.badge.as_str() } else { "·" };
        let _ = write!(out, " {mark} {}", state.milestone.threshold);
    }
    out.push('\n');
    out
}

fn timeline(entries: &[TimelineEntry], today: NaiveDate) -> String {
    let mut out = String::new();
    for entry in entries {
        let label = DateLabel::classify(entry.at(), today).to_string();
        match entry {
            TimelineEntry::Session { session, .. } => {
                let _ = writeln!(
                    out,
                    "  {label:<10} {} {}",
                    session.subject().display_name(),
                    hours_badge(session.duration_minutes())
                );
            }
            TimelineEntry::Note { note, .. } => {
                let _ = writeln!(out, "  {label:<10} note: {}", note.content);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trainer_core::model::{BookId, FocusTags, Note, NoteId, ReadingStatus, SessionId, Subject};
    use trainer_core::time::fixed_today;

    #[test]
    fn timeline_uses_relative_labels() {
        let session = TrainingSession::new(
            SessionId::new(1),
            "2024-06-15",
            Subject::Named("Rex".into()),
            None,
            90,
            FocusTags::new(),
        )
        .unwrap();
        let note = Note::new(NoteId::new(1), "2024-06-14T18:30:00", "Good recall");
        let entries = trainer_core::merge(&[session], &[note]).unwrap();

        let text = timeline(&entries, fixed_today());

        assert_eq!(
            text,
            "  Today      Rex +1.5h\n  Yesterday  note: Good recall\n"
        );
    }

    #[test]
    fn empty_roster_says_so() {
        assert_eq!(pets(&PetsView::default()), "No pets yet.\n");
    }

    #[test]
    fn book_lines_show_status() {
        let listed = Book::new(BookId::new(3), "Don't Shoot the Dog", "Karen Pryor")
            .with_status(ReadingStatus::InProgress);
        assert_eq!(
            book("Updated", &listed),
            "Updated [3] Don't Shoot the Dog by Karen Pryor (In Progress)\n"
        );
    }
}
