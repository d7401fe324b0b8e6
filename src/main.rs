use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use asotobase::api::{self, logs::LogFilter};
use asotobase::config::{ConfigError, DEFAULT_API_URL, DEFAULT_STATE_DIR, ENV_API_URL, ENV_STATE_DIR};
use asotobase::forms::{EventForm, FieldErrors, GoalForm, LogForm, LoginForm, ProjectForm, RegisterForm, StepForm, parse_tags};
use asotobase::guard::{GuardDecision, Navigator, check};
use asotobase::models::{GoalCategory, GoalPatch, GoalStatus, LogVisibility, ProfilePatch, StepPatch, StepStatus};
use asotobase::pages::dashboard::DashboardPage;
use asotobase::storage::{FileTokenStore, FileUserStore, TokenStore};
use asotobase::{ApiClient, ApiError, ClientConfig, Session};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", .0.display_message(&.0.to_string()))]
    Api(#[from] ApiError),
    #[error("invalid input: {0}")]
    Form(#[from] FieldErrors),
    #[error("output encode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not logged in; run `asotobase login`")]
    NotLoggedIn,
}

impl CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_CONFIG",
            Self::Api(e) => e.error_code(),
            Self::Form(_) => "E_FORM",
            Self::Json(_) => "E_OUTPUT",
            Self::NotLoggedIn => "E_UNAUTHORIZED",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "asotobase", about = "asotobase goals, logs, events and projects from the terminal")]
struct Cli {
    #[arg(long, env = ENV_API_URL, default_value = DEFAULT_API_URL)]
    base_url: String,

    /// Directory holding the token cookie and the persisted session entry.
    #[arg(long, env = ENV_STATE_DIR, default_value = DEFAULT_STATE_DIR)]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ASOTOBASE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "ASOTOBASE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    /// Show where navigating to PATH would land given the stored token.
    Guard {
        path: String,
    },
    Dashboard {
        /// Use the server-side `/dashboard` aggregate instead of the four lists.
        #[arg(long, default_value_t = false)]
        aggregate: bool,
    },
    Goals(GoalsCommand),
    Steps(StepsCommand),
    Logs(LogsCommand),
    Events(EventsCommand),
    Projects(ProjectsCommand),
    Points(PointsCommand),
    Profile(ProfileCommand),
}

// =============================================================================
// RESOURCE SUBCOMMANDS
// =============================================================================

#[derive(Args, Debug)]
struct GoalsCommand {
    #[command(subcommand)]
    command: GoalsSubcommand,
}

#[derive(Subcommand, Debug)]
enum GoalsSubcommand {
    List,
    Show {
        goal_id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        due_date: String,
    },
    Update {
        goal_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<GoalCategory>,
        #[arg(long)]
        status: Option<GoalStatus>,
        #[arg(long, value_parser = clap::value_parser!(i32).range(0..=100))]
        progress: Option<i32>,
        #[arg(long)]
        due_date: Option<String>,
    },
    Delete {
        goal_id: String,
    },
}

#[derive(Args, Debug)]
struct StepsCommand {
    #[command(subcommand)]
    command: StepsSubcommand,
}

#[derive(Subcommand, Debug)]
enum StepsSubcommand {
    Create {
        goal_id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        order: String,
        #[arg(long, default_value = "")]
        estimated_minutes: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        due_date: String,
    },
    Update {
        step_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<StepStatus>,
        #[arg(long)]
        order: Option<i32>,
        #[arg(long)]
        actual_minutes: Option<i32>,
    },
    Complete {
        step_id: String,
    },
    Delete {
        step_id: String,
    },
}

#[derive(Args, Debug)]
struct LogsCommand {
    #[command(subcommand)]
    command: LogsSubcommand,
}

#[derive(Subcommand, Debug)]
enum LogsSubcommand {
    List {
        #[arg(long)]
        visibility: Option<LogVisibility>,
        #[arg(long)]
        tag: Option<String>,
    },
    Show {
        log_id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Comma-separated.
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "private")]
        visibility: String,
    },
    Delete {
        log_id: String,
    },
}

#[derive(Args, Debug)]
struct EventsCommand {
    #[command(subcommand)]
    command: EventsSubcommand,
}

#[derive(Subcommand, Debug)]
enum EventsSubcommand {
    List,
    Show {
        event_id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        start_date: String,
        #[arg(long, default_value = "offline")]
        location_type: String,
        #[arg(long, default_value = "")]
        end_date: String,
        #[arg(long, default_value = "")]
        location_detail: String,
        #[arg(long, default_value = "")]
        max_attendees: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        tags: String,
    },
    Join {
        event_id: String,
    },
    Leave {
        event_id: String,
    },
    Participants {
        event_id: String,
    },
    Delete {
        event_id: String,
    },
}

#[derive(Args, Debug)]
struct ProjectsCommand {
    #[command(subcommand)]
    command: ProjectsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProjectsSubcommand {
    List,
    Show {
        project_id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        start_date: String,
        #[arg(long, default_value = "offline")]
        location_type: String,
        #[arg(long, default_value = "")]
        end_date: String,
        #[arg(long, default_value = "")]
        frequency: String,
        #[arg(long, default_value = "")]
        location_detail: String,
        #[arg(long, default_value = "")]
        max_members: String,
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "")]
        visibility: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = false)]
        not_recruiting: bool,
    },
    Join {
        project_id: String,
    },
    Delete {
        project_id: String,
    },
}

#[derive(Args, Debug)]
struct PointsCommand {
    #[command(subcommand)]
    command: PointsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PointsSubcommand {
    Summary,
    History,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    /// Own profile, or USER_ID's.
    Show {
        user_id: Option<String>,
    },
    Update {
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
        /// Comma-separated.
        #[arg(long)]
        skills: Option<String>,
        /// Comma-separated.
        #[arg(long)]
        interests: Option<String>,
        /// Weekly available minutes.
        #[arg(long)]
        available_time: Option<i32>,
    },
}

// =============================================================================
// ENTRY
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error[{}]: {e}", e.error_code());
            if matches!(&e, CliError::Api(api) if api.is_unauthorized()) {
                eprintln!("hint: the stored token was cleared; run `asotobase login`");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = config_from(&cli, ClientConfig::from_env()?)?;
    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::in_dir(&config.state_dir));
    let users = Arc::new(FileUserStore::in_dir(&config.state_dir));
    let client = ApiClient::new(&config, tokens.clone())?;
    let session = Session::new(client.clone(), users);

    match cli.command {
        Command::Login { email, password } => {
            let creds = LoginForm { email, password }.validate()?;
            let user = session.login(&creds.email, &creds.password).await?;
            print_json(&user)
        }
        Command::Register { name, email, password } => {
            let form = RegisterForm { full_name: name, email, confirm_password: password.clone(), password };
            let request = form.validate()?;
            let user = session
                .register(&request.full_name, &request.email, &request.password)
                .await?;
            print_json(&user)
        }
        Command::Logout => {
            session.logout();
            print_json(&serde_json::json!({ "status": "logged_out" }))
        }
        Command::Whoami => match session.fetch_current_user().await {
            Some(user) => print_json(&user),
            None => Err(CliError::NotLoggedIn),
        },
        Command::Guard { path } => {
            let decision = check(&path, tokens.is_present());
            let landed = Navigator::new(tokens, &path).location();
            let redirected = matches!(decision, GuardDecision::Redirect(_));
            print_json(&serde_json::json!({ "path": path, "redirected": redirected, "location": landed }))
        }
        Command::Dashboard { aggregate: true } => print_json(&api::dashboard::fetch(&client).await?),
        Command::Dashboard { aggregate: false } => {
            let mut page = DashboardPage::new(client);
            page.load().await?;
            let summary = page.summary();
            print_json(&serde_json::json!({
                "summary": summary,
                "goals": page.goals,
                "logs": page.logs,
                "events": page.events,
                "projects": page.projects,
            }))
        }
        Command::Goals(cmd) => run_goals(&client, cmd.command).await,
        Command::Steps(cmd) => run_steps(&client, cmd.command).await,
        Command::Logs(cmd) => run_logs(&client, cmd.command).await,
        Command::Events(cmd) => run_events(&client, cmd.command).await,
        Command::Projects(cmd) => run_projects(&client, cmd.command).await,
        Command::Points(cmd) => run_points(&client, cmd.command).await,
        Command::Profile(cmd) => run_profile(&client, cmd.command).await,
    }
}

async fn run_goals(client: &ApiClient, command: GoalsSubcommand) -> Result<(), CliError> {
    use api::goals;
    match command {
        GoalsSubcommand::List => print_json(&goals::list(client).await?),
        GoalsSubcommand::Show { goal_id } => print_json(&goals::get(client, &goal_id).await?),
        GoalsSubcommand::Create { title, category, description, due_date } => {
            let goal = GoalForm { title, description, category, due_date }.validate()?;
            print_json(&goals::create(client, &goal).await?)
        }
        GoalsSubcommand::Update { goal_id, title, description, category, status, progress, due_date } => {
            let patch = GoalPatch { title, description, category, status, progress, due_date };
            print_json(&goals::update(client, &goal_id, &patch).await?)
        }
        GoalsSubcommand::Delete { goal_id } => {
            goals::delete(client, &goal_id).await?;
            print_json(&serde_json::json!({ "deleted": goal_id }))
        }
    }
}

async fn run_steps(client: &ApiClient, command: StepsSubcommand) -> Result<(), CliError> {
    use api::steps;
    match command {
        StepsSubcommand::Create { goal_id, title, order, estimated_minutes, description, due_date } => {
            let step = StepForm { title, description, order, estimated_minutes, due_date }.validate()?;
            print_json(&steps::create(client, &goal_id, &step).await?)
        }
        StepsSubcommand::Update { step_id, title, status, order, actual_minutes } => {
            let patch = StepPatch { title, status, order, actual_minutes, ..StepPatch::default() };
            print_json(&steps::update(client, &step_id, &patch).await?)
        }
        StepsSubcommand::Complete { step_id } => print_json(&steps::complete(client, &step_id).await?),
        StepsSubcommand::Delete { step_id } => {
            steps::delete(client, &step_id).await?;
            print_json(&serde_json::json!({ "deleted": step_id }))
        }
    }
}

async fn run_logs(client: &ApiClient, command: LogsSubcommand) -> Result<(), CliError> {
    use api::logs;
    match command {
        LogsSubcommand::List { visibility, tag } => {
            print_json(&logs::list_filtered(client, &LogFilter { visibility, tag }).await?)
        }
        LogsSubcommand::Show { log_id } => print_json(&logs::get(client, &log_id).await?),
        LogsSubcommand::Create { title, content, tags, visibility } => {
            let log = LogForm { title, content, tags, visibility }.validate()?;
            print_json(&logs::create(client, &log).await?)
        }
        LogsSubcommand::Delete { log_id } => {
            logs::delete(client, &log_id).await?;
            print_json(&serde_json::json!({ "deleted": log_id }))
        }
    }
}

async fn run_events(client: &ApiClient, command: EventsSubcommand) -> Result<(), CliError> {
    use api::events;
    match command {
        EventsSubcommand::List => print_json(&events::list(client).await?),
        EventsSubcommand::Show { event_id } => print_json(&events::get(client, &event_id).await?),
        EventsSubcommand::Create {
            title,
            start_date,
            location_type,
            end_date,
            location_detail,
            max_attendees,
            description,
            tags,
        } => {
            let form = EventForm {
                title,
                description,
                start_date,
                end_date,
                location_type,
                location_detail,
                max_attendees,
                tags,
            };
            print_json(&events::create(client, &form.validate()?).await?)
        }
        EventsSubcommand::Join { event_id } => print_json(&events::join(client, &event_id).await?),
        EventsSubcommand::Leave { event_id } => {
            events::leave(client, &event_id).await?;
            print_json(&serde_json::json!({ "left": event_id }))
        }
        EventsSubcommand::Participants { event_id } => print_json(&events::participants(client, &event_id).await?),
        EventsSubcommand::Delete { event_id } => {
            events::delete(client, &event_id).await?;
            print_json(&serde_json::json!({ "deleted": event_id }))
        }
    }
}

async fn run_projects(client: &ApiClient, command: ProjectsSubcommand) -> Result<(), CliError> {
    use api::projects;
    match command {
        ProjectsSubcommand::List => print_json(&projects::list(client).await?),
        ProjectsSubcommand::Show { project_id } => print_json(&projects::get(client, &project_id).await?),
        ProjectsSubcommand::Create {
            title,
            category,
            start_date,
            location_type,
            end_date,
            frequency,
            location_detail,
            max_members,
            skills,
            tags,
            visibility,
            description,
            not_recruiting,
        } => {
            let form = ProjectForm {
                title,
                description,
                category,
                start_date,
                end_date,
                frequency,
                location_type,
                location_detail,
                is_recruiting: !not_recruiting,
                max_members,
                required_skills: skills,
                tags,
                visibility,
            };
            print_json(&projects::create(client, &form.validate()?).await?)
        }
        ProjectsSubcommand::Join { project_id } => print_json(&projects::join(client, &project_id).await?),
        ProjectsSubcommand::Delete { project_id } => {
            projects::delete(client, &project_id).await?;
            print_json(&serde_json::json!({ "deleted": project_id }))
        }
    }
}

async fn run_points(client: &ApiClient, command: PointsSubcommand) -> Result<(), CliError> {
    match command {
        PointsSubcommand::Summary => print_json(&api::points::summary(client).await?),
        PointsSubcommand::History => print_json(&api::points::history(client).await?),
    }
}

async fn run_profile(client: &ApiClient, command: ProfileSubcommand) -> Result<(), CliError> {
    use api::users;
    match command {
        ProfileSubcommand::Show { user_id: None } => print_json(&users::my_profile(client).await?),
        ProfileSubcommand::Show { user_id: Some(user_id) } => print_json(&users::profile(client, &user_id).await?),
        ProfileSubcommand::Update { bio, avatar_url, skills, interests, available_time } => {
            let patch = ProfilePatch {
                bio,
                avatar_url,
                skills: skills.as_deref().map(parse_tags),
                interests: interests.as_deref().map(parse_tags),
                available_time,
            };
            print_json(&users::update_my_profile(client, &patch).await?)
        }
    }
}

/// Environment config with the clap-resolved base URL and state directory on top.
fn config_from(cli: &Cli, env: ClientConfig) -> Result<ClientConfig, ConfigError> {
    Ok(env.with_base_url(&cli.base_url)?.with_state_dir(cli.state_dir.clone()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
