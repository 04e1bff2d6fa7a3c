//! JSON shapes of the REST backend and their mapping into domain records.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use trainer_core::Streaks;
use trainer_core::model::{
    Book, BookId, FocusTags, MilestoneId, MilestoneRecord, Note, NoteId, Pet, PetId,
    ReadingStatus, RecordError, SessionId, Subject, TrainingSession,
};
use trainer_core::stats::{MonthlyComparison, WeeklyTrendPoint};
use trainer_core::time::parse_date;

use crate::error::GENERIC_FAILURE;
use crate::records::{
    CreatedSession, DashboardRecord, GoalDraft, GoalRecord, NewPet, NewSession, SessionChanges,
    StatsRecord, SummaryRecord,
};

// Decimal columns come back as JSON strings ("12.5"), counters as numbers.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Lenient>::deserialize(deserializer).map(|n| n.map(|Lenient(n)| n))
}

#[derive(Deserialize)]
struct Lenient(#[serde(deserialize_with = "lenient_f64")] f64);

// A JSON object of per-key hours, kept in the order the backend sent it.
struct OrderedHours(Vec<(String, f64)>);

impl<'de> Deserialize<'de> for OrderedHours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedHoursVisitor)
    }
}

struct OrderedHoursVisitor;

impl<'de> Visitor<'de> for OrderedHoursVisitor {
    type Value = OrderedHours;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of hours keyed by type")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, Lenient(hours))) = map.next_entry::<String, Lenient>()? {
            entries.push((key, hours));
        }
        Ok(OrderedHours(entries))
    }
}

fn ordered_hours<'de, D>(deserializer: D) -> Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<OrderedHours>::deserialize(deserializer)
        .map(|hours| hours.map(|OrderedHours(entries)| entries).unwrap_or_default())
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    errors: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    /// `errors` joined, else `error`, else the generic failure text.
    pub(crate) fn message(self) -> String {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            return errors.join(", ");
        }
        self.error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string())
    }
}

//
// ─── SESSIONS & NOTES ──────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct PetRefDto {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionDto {
    id: u64,
    session_date: String,
    duration_minutes: u32,
    #[serde(default)]
    pet_id: Option<u64>,
    #[serde(default)]
    pet: Option<PetRefDto>,
    #[serde(default)]
    training_focus: Option<Vec<String>>,
}

impl SessionDto {
    pub(crate) fn into_session(self) -> Result<TrainingSession, RecordError> {
        let name = self.pet.and_then(|p| p.name);
        TrainingSession::new(
            SessionId::new(self.id),
            self.session_date,
            Subject::from_name(name.as_deref()),
            self.pet_id.map(PetId::new),
            self.duration_minutes,
            self.training_focus.unwrap_or_default().into_iter().collect(),
        )
    }
}

pub(crate) fn into_sessions(dtos: Vec<SessionDto>) -> Result<Vec<TrainingSession>, RecordError> {
    dtos.into_iter().map(SessionDto::into_session).collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteDto {
    id: u64,
    created_at: String,
    #[serde(default)]
    pet_id: Option<u64>,
    #[serde(default)]
    pet: Option<PetRefDto>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    training_focus: Option<Vec<String>>,
}

impl From<NoteDto> for Note {
    fn from(dto: NoteDto) -> Self {
        Note {
            id: NoteId::new(dto.id),
            created_at: dto.created_at,
            pet_id: dto.pet_id.map(PetId::new),
            pet_name: dto.pet.and_then(|p| p.name),
            content: dto.content,
            focus: dto
                .training_focus
                .unwrap_or_default()
                .into_iter()
                .collect::<FocusTags>(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewSessionBody<'a> {
    training_session: NewSessionDto<'a>,
}

#[derive(Debug, Serialize)]
struct NewSessionDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pet_id: Option<u64>,
    session_date: String,
    duration_minutes: u32,
    session_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
    training_focus: Vec<&'a str>,
}

impl<'a> NewSessionBody<'a> {
    pub(crate) fn from_new(session: &'a NewSession) -> Self {
        Self {
            training_session: NewSessionDto {
                pet_id: session.pet_id.map(|id| id.value()),
                session_date: session.session_date.format("%Y-%m-%d").to_string(),
                duration_minutes: session.duration_minutes,
                session_type: &session.session_type,
                notes: session.notes.as_deref(),
                training_focus: session.focus.iter().map(|t| t.as_str()).collect(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedSessionDto {
    session: SessionDto,
    #[serde(default)]
    new_milestone: Option<MilestoneDto>,
}

impl CreatedSessionDto {
    pub(crate) fn into_created(self) -> Result<CreatedSession, RecordError> {
        Ok(CreatedSession {
            session: self.session.into_session()?,
            new_milestone: self.new_milestone.map(MilestoneRecord::from),
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionChangesBody<'a> {
    training_session: SessionChangesDto<'a>,
}

#[derive(Debug, Serialize)]
struct SessionChangesDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    session_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    training_focus: Option<Vec<&'a str>>,
}

impl<'a> SessionChangesBody<'a> {
    pub(crate) fn from_changes(changes: &'a SessionChanges) -> Self {
        Self {
            training_session: SessionChangesDto {
                session_date: changes
                    .session_date
                    .map(|date| date.format("%Y-%m-%d").to_string()),
                duration_minutes: changes.duration_minutes,
                session_type: changes.session_type.as_deref(),
                notes: changes.notes.as_deref(),
                training_focus: changes
                    .focus
                    .as_ref()
                    .map(|focus| focus.iter().map(|t| t.as_str()).collect()),
            },
        }
    }
}

//
// ─── PETS, MILESTONES, BOOKS ───────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct PetDto {
    id: u64,
    name: String,
    #[serde(default)]
    birthdate: Option<String>,
    #[serde(default)]
    sex: Option<String>,
    #[serde(default)]
    spayed_neutered: bool,
    #[serde(default)]
    behavioral_notes: Option<String>,
    #[serde(default)]
    allergies: Option<String>,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default = "default_true")]
    origin_trainer: bool,
}

fn default_true() -> bool {
    true
}

impl From<PetDto> for Pet {
    fn from(dto: PetDto) -> Self {
        let birthdate = dto.birthdate.as_deref().and_then(|raw| match parse_date(raw) {
            Ok(date) => Some(date),
            Err(err) => {
                tracing::warn!(pet_id = dto.id, %err, "ignoring unreadable birthdate");
                None
            }
        });
        Pet {
            id: PetId::new(dto.id),
            name: dto.name,
            birthdate,
            sex: dto.sex,
            spayed_neutered: dto.spayed_neutered,
            behavioral_notes: dto.behavioral_notes,
            allergies: dto.allergies,
            active: dto.active,
            origin_trainer: dto.origin_trainer,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MilestoneDto {
    id: u64,
    hours_reached: u32,
    #[serde(default, alias = "achieved_at")]
    reached_at: Option<String>,
    #[serde(default)]
    celebrated: bool,
}

impl From<MilestoneDto> for MilestoneRecord {
    fn from(dto: MilestoneDto) -> Self {
        MilestoneRecord {
            id: MilestoneId::new(dto.id),
            hours_reached: dto.hours_reached,
            reached_at: dto.reached_at,
            celebrated: dto.celebrated,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookDto {
    id: u64,
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<BookDto> for Book {
    fn from(dto: BookDto) -> Self {
        Book {
            id: BookId::new(dto.id),
            title: dto.title,
            author: dto.author,
            category: dto.category,
            status: dto
                .status
                .as_deref()
                .map_or(ReadingStatus::NotStarted, ReadingStatus::from_wire),
            description: dto.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewPetBody<'a> {
    pet: NewPetDto<'a>,
}

#[derive(Debug, Serialize)]
struct NewPetDto<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    birthdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sex: Option<&'a str>,
    spayed_neutered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    behavioral_notes: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allergies: Option<&'a str>,
    origin_trainer: bool,
}

impl<'a> NewPetBody<'a> {
    pub(crate) fn from_new(pet: &'a NewPet) -> Self {
        Self {
            pet: NewPetDto {
                name: &pet.name,
                birthdate: pet.birthdate.map(|date| date.format("%Y-%m-%d").to_string()),
                sex: pet.sex.as_deref(),
                spayed_neutered: pet.spayed_neutered,
                behavioral_notes: pet.behavioral_notes.as_deref(),
                allergies: pet.allergies.as_deref(),
                origin_trainer: true,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ActiveBody {
    pub(crate) active: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct BookStatusBody {
    book: BookStatusDto,
}

#[derive(Debug, Serialize)]
struct BookStatusDto {
    status: &'static str,
}

impl BookStatusBody {
    pub(crate) fn new(status: ReadingStatus) -> Self {
        Self {
            book: BookStatusDto {
                status: status.as_wire(),
            },
        }
    }
}

//
// ─── AGGREGATES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct ProgressDto {
    #[serde(deserialize_with = "lenient_f64")]
    total_hours: f64,
    #[serde(deserialize_with = "lenient_f64")]
    target_hours: f64,
}

#[derive(Debug, Default, Deserialize)]
struct StreaksDto {
    #[serde(default)]
    current: u32,
    #[serde(default)]
    longest: u32,
}

#[derive(Debug, Deserialize)]
struct ThisWeekDto {
    #[serde(deserialize_with = "lenient_f64")]
    hours: f64,
    #[serde(deserialize_with = "lenient_f64")]
    goal: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardDto {
    progress: ProgressDto,
    #[serde(default)]
    streaks: StreaksDto,
    this_week: ThisWeekDto,
    #[serde(default)]
    projected_completion: Option<String>,
    #[serde(default)]
    recent_sessions: Vec<SessionDto>,
    #[serde(default)]
    uncelebrated_milestones: Vec<MilestoneDto>,
}

impl DashboardDto {
    pub(crate) fn into_record(self) -> Result<DashboardRecord, RecordError> {
        Ok(DashboardRecord {
            total_hours: self.progress.total_hours,
            target_hours: self.progress.target_hours,
            streaks: Streaks {
                current_days: self.streaks.current,
                longest_days: self.streaks.longest,
            },
            week_hours: self.this_week.hours,
            week_goal: self.this_week.goal,
            projected_completion: self.projected_completion,
            recent_sessions: into_sessions(self.recent_sessions)?,
            uncelebrated_milestones: self
                .uncelebrated_milestones
                .into_iter()
                .map(MilestoneRecord::from)
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryDto {
    #[serde(deserialize_with = "lenient_f64")]
    total_hours: f64,
    #[serde(default)]
    total_sessions: u32,
    #[serde(default)]
    current_streak: u32,
    #[serde(default)]
    longest_streak: u32,
}

impl From<SummaryDto> for SummaryRecord {
    fn from(dto: SummaryDto) -> Self {
        SummaryRecord {
            total_hours: dto.total_hours,
            total_sessions: dto.total_sessions,
            streaks: Streaks {
                current_days: dto.current_streak,
                longest_days: dto.longest_streak,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct TotalStatsDto {
    #[serde(deserialize_with = "lenient_f64")]
    total_hours: f64,
    #[serde(default)]
    total_sessions: u32,
    #[serde(default)]
    unique_dogs: u32,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    average_session_duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MonthlyDto {
    #[serde(deserialize_with = "lenient_f64")]
    this_month: f64,
    #[serde(deserialize_with = "lenient_f64")]
    last_month: f64,
    #[serde(deserialize_with = "lenient_f64")]
    change_percentage: f64,
}

#[derive(Debug, Deserialize)]
struct TrendDto {
    week: String,
    #[serde(deserialize_with = "lenient_f64")]
    hours: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsDto {
    total_stats: TotalStatsDto,
    #[serde(default, deserialize_with = "ordered_hours")]
    breakdown_by_type: Vec<(String, f64)>,
    monthly_comparison: MonthlyDto,
    #[serde(default)]
    weekly_trend: Vec<TrendDto>,
}

impl StatsDto {
    pub(crate) fn into_record(self) -> StatsRecord {
        StatsRecord {
            total_hours: self.total_stats.total_hours,
            total_sessions: self.total_stats.total_sessions,
            unique_dogs: self.total_stats.unique_dogs,
            average_session_minutes: self.total_stats.average_session_duration.unwrap_or(0.0),
            breakdown_by_type: self.breakdown_by_type,
            monthly: MonthlyComparison {
                this_month: self.monthly_comparison.this_month,
                last_month: self.monthly_comparison.last_month,
                change_percentage: self.monthly_comparison.change_percentage,
            },
            weekly_trend: self
                .weekly_trend
                .into_iter()
                .map(|t| WeeklyTrendPoint {
                    week: t.week,
                    hours: t.hours,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoalDto {
    #[serde(default)]
    certification_type: String,
    #[serde(deserialize_with = "lenient_f64")]
    target_hours: f64,
    #[serde(deserialize_with = "lenient_f64")]
    weekly_goal_hours: f64,
    #[serde(default)]
    target_completion_date: Option<String>,
}

impl GoalDto {
    pub(crate) fn into_record(self) -> GoalRecord {
        GoalRecord {
            certification_type: self.certification_type,
            target_hours: self.target_hours,
            weekly_goal_hours: self.weekly_goal_hours,
            target_completion_date: self.target_completion_date,
            hours_per_week_needed: None,
            projected_completion: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GoalBody<'a> {
    certification_goal: GoalDraftDto<'a>,
}

#[derive(Debug, Serialize)]
struct GoalDraftDto<'a> {
    certification_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_hours: Option<f64>,
    weekly_goal_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_completion_date: Option<String>,
}

impl<'a> GoalBody<'a> {
    pub(crate) fn from_draft(goal: &'a GoalDraft) -> Self {
        Self {
            certification_goal: GoalDraftDto {
                certification_type: &goal.certification_type,
                target_hours: goal.target_hours,
                weekly_goal_hours: goal.weekly_goal_hours,
                target_completion_date: goal
                    .target_completion_date
                    .map(|date| date.format("%Y-%m-%d").to_string()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoalEnvelopeDto {
    #[serde(default)]
    goal: Option<GoalDto>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    hours_per_week_needed: Option<f64>,
    #[serde(default)]
    projected_completion: Option<String>,
}

impl GoalEnvelopeDto {
    pub(crate) fn into_record(self) -> Option<GoalRecord> {
        let goal = self.goal?;
        Some(GoalRecord {
            hours_per_week_needed: self.hours_per_week_needed,
            projected_completion: self.projected_completion,
            ..goal.into_record()
        })
    }
}
