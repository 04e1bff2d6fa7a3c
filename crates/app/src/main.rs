use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;

use backend::config::{ConfigError, parse_timeout_ms};
use backend::records::{GoalDraft, NewPet, NewSession, SessionChanges};
use backend::BackendConfig;
use services::{AppServices, Clock, ServiceError, ServicesConfig};
use trainer_core::catalog::ALL_CATEGORIES;
use trainer_core::model::{
    BookId, FocusTags, MilestoneId, ParseStatusError, PetId, ReadingStatus, SessionId,
};
use trainer_core::time::parse_date;

mod render;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidId { flag: &'static str, raw: String },
    InvalidMinutes { raw: String },
    InvalidDate { flag: &'static str, raw: String },
    InvalidHours { flag: &'static str, raw: String },
    InvalidBool { flag: &'static str, raw: String },
    Status(ParseStatusError),
    Config(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidId { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidMinutes { raw } => write!(f, "invalid --minutes value: {raw}"),
            ArgsError::InvalidDate { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidHours { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidBool { flag, raw } => {
                write!(f, "invalid {flag} value: {raw} (expected true or false)")
            }
            ArgsError::Status(err) => write!(f, "{err}"),
            ArgsError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<ConfigError> for ArgsError {
    fn from(err: ConfigError) -> Self {
        ArgsError::Config(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_id(raw: String, flag: &'static str) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidId { flag, raw })
}

fn parse_day(raw: String, flag: &'static str) -> Result<NaiveDate, ArgsError> {
    parse_date(&raw).map_err(|_| ArgsError::InvalidDate { flag, raw })
}

fn parse_hours(raw: String, flag: &'static str) -> Result<f64, ArgsError> {
    match raw.trim().parse::<f64>() {
        Ok(hours) if hours.is_finite() => Ok(hours),
        _ => Err(ArgsError::InvalidHours { flag, raw }),
    }
}

fn parse_bool(raw: String, flag: &'static str) -> Result<bool, ArgsError> {
    match raw.trim() {
        "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        _ => Err(ArgsError::InvalidBool { flag, raw }),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  trainer [dashboard]");
    eprintln!("  trainer activity --pet-id <id> [--pet-name <name>]");
    eprintln!("  trainer profile");
    eprintln!("  trainer stats");
    eprintln!("  trainer books [--category <c>]");
    eprintln!("  trainer pets");
    eprintln!("  trainer log --minutes <n> [--pet-id <id>] [--date <YYYY-MM-DD>] [--type <t>] [--notes <text>]");
    eprintln!("  trainer edit --session-id <id> [--minutes <n>] [--date <YYYY-MM-DD>] [--type <t>] [--notes <text>]");
    eprintln!("  trainer celebrate --id <milestone id>");
    eprintln!("  trainer book-add --book-id <id>");
    eprintln!("  trainer book-status --book-id <id> --status <not_started|in_progress|read>");
    eprintln!("  trainer book-remove --book-id <id>");
    eprintln!("  trainer pet-add --name <name> [--birthdate <YYYY-MM-DD>] [--sex <s>] [--allergies <text>] [--notes <text>] [--spayed]");
    eprintln!("  trainer pet-active --pet-id <id> --active <true|false>");
    eprintln!("  trainer goal --type <certification> --weekly <hours> [--target <hours>] [--by <YYYY-MM-DD>]");
    eprintln!();
    eprintln!("Every command also accepts:");
    eprintln!("  --api-url <url>      backend base URL");
    eprintln!("  --timeout-ms <ms>    per-request timeout");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRAINER_API_URL, TRAINER_API_TIMEOUT_MS, TRAINER_TARGET_HOURS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Dashboard,
    Activity,
    Profile,
    Stats,
    Books,
    Pets,
    Log,
    Edit,
    Celebrate,
    BookAdd,
    BookStatus,
    BookRemove,
    PetAdd,
    PetActive,
    Goal,
}

impl CommandKind {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "dashboard" => Some(Self::Dashboard),
            "activity" => Some(Self::Activity),
            "profile" => Some(Self::Profile),
            "stats" => Some(Self::Stats),
            "books" => Some(Self::Books),
            "pets" => Some(Self::Pets),
            "log" => Some(Self::Log),
            "edit" => Some(Self::Edit),
            "celebrate" => Some(Self::Celebrate),
            "book-add" => Some(Self::BookAdd),
            "book-status" => Some(Self::BookStatus),
            "book-remove" => Some(Self::BookRemove),
            "pet-add" => Some(Self::PetAdd),
            "pet-active" => Some(Self::PetActive),
            "goal" => Some(Self::Goal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Dashboard,
    Activity {
        pet_id: PetId,
        pet_name: Option<String>,
    },
    Profile,
    Stats,
    Books {
        category: String,
    },
    Pets,
    Log {
        minutes: u32,
        pet_id: Option<PetId>,
        date: Option<NaiveDate>,
        session_type: String,
        notes: Option<String>,
    },
    Edit {
        id: SessionId,
        changes: SessionChanges,
    },
    Celebrate {
        id: MilestoneId,
    },
    BookAdd {
        id: BookId,
    },
    BookStatus {
        id: BookId,
        status: ReadingStatus,
    },
    BookRemove {
        id: BookId,
    },
    PetAdd(NewPet),
    PetActive {
        id: PetId,
        active: bool,
    },
    Goal(GoalDraft),
}

#[derive(Debug, Default)]
struct Connection {
    api_url: Option<String>,
    timeout: Option<Duration>,
}

#[derive(Debug)]
struct Args {
    command: Command,
    connection: Connection,
}

/// Outcome of reading the command line.
#[derive(Debug)]
enum Parsed {
    Help,
    Run(Args),
}

/// Flag values collected before the command is assembled.
#[derive(Debug, Default)]
struct Flags {
    pet_id: Option<PetId>,
    pet_name: Option<String>,
    category: Option<String>,
    minutes: Option<u32>,
    date: Option<NaiveDate>,
    kind: Option<String>,
    notes: Option<String>,
    milestone_id: Option<MilestoneId>,
    session_id: Option<SessionId>,
    book_id: Option<BookId>,
    status: Option<ReadingStatus>,
    name: Option<String>,
    birthdate: Option<NaiveDate>,
    sex: Option<String>,
    allergies: Option<String>,
    spayed: bool,
    active: Option<bool>,
    weekly: Option<f64>,
    target: Option<f64>,
    by: Option<NaiveDate>,
}

fn parse_args(argv: Vec<String>) -> Result<Parsed, ArgsError> {
    let mut argv = argv.into_iter().peekable();

    // No subcommand means the dashboard.
    let kind = match argv.peek().map(String::as_str) {
        None => CommandKind::Dashboard,
        Some(first) if first.starts_with('-') => CommandKind::Dashboard,
        Some(first) => {
            let kind = CommandKind::from_arg(first)
                .ok_or_else(|| ArgsError::UnknownCommand(first.to_string()))?;
            argv.next();
            kind
        }
    };

    Args::parse(kind, &mut argv)
}

impl Args {
    fn parse(kind: CommandKind, args: &mut impl Iterator<Item = String>) -> Result<Parsed, ArgsError> {
        use CommandKind as K;

        let mut connection = Connection::default();
        let mut flags = Flags::default();

        while let Some(arg) = args.next() {
            match (kind, arg.as_str()) {
                (_, "--help" | "-h") => return Ok(Parsed::Help),
                (_, "--api-url") => connection.api_url = Some(require_value(args, "--api-url")?),
                (_, "--timeout-ms") => {
                    let value = require_value(args, "--timeout-ms")?;
                    connection.timeout = Some(parse_timeout_ms(&value)?);
                }
                (K::Activity | K::Log | K::PetActive, "--pet-id") => {
                    let value = require_value(args, "--pet-id")?;
                    flags.pet_id = Some(PetId::new(parse_id(value, "--pet-id")?));
                }
                (K::Activity, "--pet-name") => {
                    flags.pet_name = Some(require_value(args, "--pet-name")?);
                }
                (K::Books, "--category") => {
                    flags.category = Some(require_value(args, "--category")?);
                }
                (K::Log | K::Edit, "--minutes") => {
                    let value = require_value(args, "--minutes")?;
                    let parsed = value
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidMinutes { raw: value.clone() })?;
                    flags.minutes = Some(parsed);
                }
                (K::Log | K::Edit, "--date") => {
                    flags.date = Some(parse_day(require_value(args, "--date")?, "--date")?);
                }
                (K::Log | K::Edit | K::Goal, "--type") => {
                    flags.kind = Some(require_value(args, "--type")?);
                }
                (K::Log | K::Edit | K::PetAdd, "--notes") => {
                    flags.notes = Some(require_value(args, "--notes")?);
                }
                (K::Edit, "--session-id") => {
                    let value = require_value(args, "--session-id")?;
                    flags.session_id = Some(SessionId::new(parse_id(value, "--session-id")?));
                }
                (K::Celebrate, "--id") => {
                    let value = require_value(args, "--id")?;
                    flags.milestone_id = Some(MilestoneId::new(parse_id(value, "--id")?));
                }
                (K::BookAdd | K::BookStatus | K::BookRemove, "--book-id") => {
                    let value = require_value(args, "--book-id")?;
                    flags.book_id = Some(BookId::new(parse_id(value, "--book-id")?));
                }
                (K::BookStatus, "--status") => {
                    let value = require_value(args, "--status")?;
                    flags.status = Some(value.parse().map_err(ArgsError::Status)?);
                }
                (K::PetAdd, "--name") => flags.name = Some(require_value(args, "--name")?),
                (K::PetAdd, "--birthdate") => {
                    let value = require_value(args, "--birthdate")?;
                    flags.birthdate = Some(parse_day(value, "--birthdate")?);
                }
                (K::PetAdd, "--sex") => flags.sex = Some(require_value(args, "--sex")?),
                (K::PetAdd, "--allergies") => {
                    flags.allergies = Some(require_value(args, "--allergies")?);
                }
                (K::PetAdd, "--spayed") => flags.spayed = true,
                (K::PetActive, "--active") => {
                    flags.active = Some(parse_bool(require_value(args, "--active")?, "--active")?);
                }
                (K::Goal, "--weekly") => {
                    flags.weekly = Some(parse_hours(require_value(args, "--weekly")?, "--weekly")?);
                }
                (K::Goal, "--target") => {
                    flags.target = Some(parse_hours(require_value(args, "--target")?, "--target")?);
                }
                (K::Goal, "--by") => flags.by = Some(parse_day(require_value(args, "--by")?, "--by")?),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Parsed::Run(Self {
            command: build_command(kind, flags)?,
            connection,
        }))
    }
}

fn build_command(kind: CommandKind, flags: Flags) -> Result<Command, ArgsError> {
    use CommandKind as K;

    let book_id = flags.book_id.ok_or(ArgsError::MissingFlag { flag: "--book-id" });
    let command = match kind {
        K::Dashboard => Command::Dashboard,
        K::Activity => Command::Activity {
            pet_id: flags.pet_id.ok_or(ArgsError::MissingFlag { flag: "--pet-id" })?,
            pet_name: flags.pet_name,
        },
        K::Profile => Command::Profile,
        K::Stats => Command::Stats,
        K::Books => Command::Books {
            category: flags.category.unwrap_or_else(|| ALL_CATEGORIES.to_string()),
        },
        K::Pets => Command::Pets,
        K::Log => Command::Log {
            minutes: flags.minutes.ok_or(ArgsError::MissingFlag { flag: "--minutes" })?,
            pet_id: flags.pet_id,
            date: flags.date,
            session_type: flags.kind.unwrap_or_else(|| "training".to_string()),
            notes: flags.notes,
        },
        K::Edit => Command::Edit {
            id: flags.session_id.ok_or(ArgsError::MissingFlag { flag: "--session-id" })?,
            changes: SessionChanges {
                session_date: flags.date,
                duration_minutes: flags.minutes,
                session_type: flags.kind,
                notes: flags.notes,
                focus: None,
            },
        },
        K::Celebrate => Command::Celebrate {
            id: flags.milestone_id.ok_or(ArgsError::MissingFlag { flag: "--id" })?,
        },
        K::BookAdd => Command::BookAdd { id: book_id? },
        K::BookStatus => Command::BookStatus {
            id: book_id?,
            status: flags.status.ok_or(ArgsError::MissingFlag { flag: "--status" })?,
        },
        K::BookRemove => Command::BookRemove { id: book_id? },
        K::PetAdd => Command::PetAdd(NewPet {
            name: flags.name.ok_or(ArgsError::MissingFlag { flag: "--name" })?,
            birthdate: flags.birthdate,
            sex: flags.sex,
            spayed_neutered: flags.spayed,
            behavioral_notes: flags.notes,
            allergies: flags.allergies,
        }),
        K::PetActive => Command::PetActive {
            id: flags.pet_id.ok_or(ArgsError::MissingFlag { flag: "--pet-id" })?,
            active: flags.active.ok_or(ArgsError::MissingFlag { flag: "--active" })?,
        },
        K::Goal => Command::Goal(GoalDraft {
            certification_type: flags.kind.ok_or(ArgsError::MissingFlag { flag: "--type" })?,
            target_hours: flags.target,
            weekly_goal_hours: flags.weekly.ok_or(ArgsError::MissingFlag { flag: "--weekly" })?,
            target_completion_date: flags.by,
        }),
    };
    Ok(command)
}

fn backend_config(connection: Connection) -> Result<BackendConfig, ConfigError> {
    let config = BackendConfig::from_env()?;
    let config = match connection.api_url {
        Some(url) => BackendConfig::new(&url, config.timeout())?,
        None => config,
    };
    Ok(match connection.timeout {
        Some(timeout) => config.with_timeout(timeout),
        None => config,
    })
}

/// Text printed for a failed run; transient backend failures get a retry hint.
fn exit_message(err: &(dyn std::error::Error + 'static)) -> String {
    match err.downcast_ref::<ServiceError>() {
        Some(service) if service.is_transient() => {
            format!("{err}\nThe backend may be waking up; try again in a moment.")
        }
        _ => err.to_string(),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = match parse_args(std::env::args().skip(1).collect()) {
        Ok(Parsed::Help) => {
            print_usage();
            return Ok(());
        }
        Ok(Parsed::Run(args)) => args,
        Err(err) => {
            print_usage();
            return Err(err.into());
        }
    };

    tracing::debug!(command = ?parsed.command, "running command");
    let clock = Clock::default_clock();
    let today = clock.today();
    let services = AppServices::http(
        backend_config(parsed.connection)?,
        ServicesConfig::from_env()?,
        clock,
    )?;

    let text = match parsed.command {
        Command::Dashboard => render::dashboard(&services.dashboard().load().await?, today),
        Command::Activity { pet_id, pet_name } => {
            let view = services
                .activity()
                .pet_activity(pet_id, pet_name.as_deref())
                .await?;
            render::activity(&view, today)
        }
        Command::Profile => render::profile(&services.profile().load().await?),
        Command::Stats => render::stats(&services.stats().load().await?),
        Command::Books { category } => render::books(&services.books().load(&category).await?),
        Command::Pets => render::pets(&services.pets().load().await?),
        Command::Log {
            minutes,
            pet_id,
            date,
            session_type,
            notes,
        } => {
            let session = NewSession {
                pet_id,
                session_date: date.unwrap_or(today),
                duration_minutes: minutes,
                session_type,
                notes,
                focus: FocusTags::new(),
            };
            render::logged(&services.dashboard().log_session(&session).await?)
        }
        Command::Edit { id, changes } => {
            render::edited(&services.dashboard().edit_session(id, &changes).await?)
        }
        Command::Celebrate { id } => {
            services.dashboard().celebrate(id).await?;
            format!("Milestone {id} celebrated.\n")
        }
        Command::BookAdd { id } => {
            render::book("Added", &services.books().add_to_list(id).await?)
        }
        Command::BookStatus { id, status } => {
            render::book("Updated", &services.books().set_status(id, status).await?)
        }
        Command::BookRemove { id } => {
            services.books().remove(id).await?;
            format!("Book {id} removed from your list.\n")
        }
        Command::PetAdd(pet) => render::pet_saved(&services.pets().add(&pet).await?),
        Command::PetActive { id, active } => {
            render::pet_saved(&services.pets().set_active(id, active).await?)
        }
        Command::Goal(draft) => render::goal(&services.profile().save_goal(&draft).await?),
    };
    print!("{text}");
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    if let Err(err) = run().await {
        eprintln!("{}", exit_message(err.as_ref()));
        std::process::exit(2);
    }
}
