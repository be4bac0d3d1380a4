mod backend;
mod config;
mod notice;
mod prefs;
mod services;
mod state;
mod study_loop;

use std::path::PathBuf;
use std::process::ExitCode;

use canvas::camera::FixedViewport;
use canvas::element::{ElementKind, ElementType};
use canvas::engine::EditorSettings;
use canvas::render::{RenderContext, render_element};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use study::card::{CardType, CountdownBehavior, Side};
use study::session::SessionOptions;
use time::OffsetDateTime;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::backend::BackendError;
use crate::config::AppConfig;
use crate::notice::{ErrorCode, Notice};
use crate::prefs::{PrefKey, PrefsError};
use crate::services::ai::InteractiveType;
use crate::services::editor::CardEditor;
use crate::services::org::Role;
use crate::services::{ServiceError, ai, cards, domain, import, org, push, sets, settings};
use crate::state::{AppState, StartupError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Startup(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Backend(e) => e.error_code(),
            Self::Prefs(e) => e.error_code(),
            Self::Io(_) => "E_IO",
            Self::Json(_) => "E_OUTPUT",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Service(e) => e.retryable(),
            Self::Backend(e) => e.retryable(),
            _ => false,
        }
    }
}

// =============================================================================
// COMMAND LINE
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "flashdeck", about = "Build and study flashcard decks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Auth(AuthCommand),
    Sets(SetsCommand),
    Cards(CardsCommand),
    /// Study a set interactively.
    Study(StudyArgs),
    /// Generate a card with AI and append it to a set.
    Generate(GenerateArgs),
    Translate {
        text: String,
        #[arg(long)]
        to: String,
    },
    Org(OrgCommand),
    /// Check an organization domain.
    Domain {
        domain: String,
    },
    Prefs(PrefsCommand),
    /// List the built-in card templates.
    Templates,
    /// Import a deck from an Anki package or a PDF.
    Import {
        path: PathBuf,
    },
    Push(PushCommand),
}

impl Command {
    /// Action name used in failure notices.
    fn action(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Sets(_) => "sets",
            Self::Cards(_) => "cards",
            Self::Study(_) => "study",
            Self::Generate(_) => "generate card",
            Self::Translate { .. } => "translate",
            Self::Org(_) => "organization",
            Self::Domain { .. } => "domain check",
            Self::Prefs(_) => "preferences",
            Self::Templates => "templates",
            Self::Import { .. } => "import",
            Self::Push(_) => "push registration",
        }
    }
}

#[derive(Args, Debug)]
struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
enum AuthSubcommand {
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FLASHDECK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FLASHDECK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    SignOut,
    Status,
}

#[derive(Args, Debug)]
struct SetsCommand {
    #[command(subcommand)]
    command: SetsSubcommand,
}

#[derive(Subcommand, Debug)]
enum SetsSubcommand {
    List {
        #[arg(long)]
        org: Option<Uuid>,
    },
    Show {
        set_id: Uuid,
    },
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        org: Option<Uuid>,
    },
    Update {
        set_id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        public: Option<bool>,
    },
    /// Always shuffle this set when studying.
    Shuffle {
        set_id: Uuid,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    Delete {
        set_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct CardsCommand {
    #[command(subcommand)]
    command: CardsSubcommand,
}

#[derive(Subcommand, Debug)]
enum CardsSubcommand {
    List {
        set_id: Uuid,
    },
    Create {
        set_id: Uuid,
        #[arg(long)]
        template: Option<String>,
        #[arg(long = "type", value_parser = parse_name::<CardType>, default_value = "normal")]
        card_type: CardType,
    },
    /// Add an element to one side of a card.
    AddElement {
        card_id: Uuid,
        element_type: ElementType,
        #[arg(long, value_parser = parse_name::<Side>, default_value = "front")]
        side: Side,
        #[arg(long, default_value_t = 50.0)]
        x: f64,
        #[arg(long, default_value_t = 50.0)]
        y: f64,
        /// Text for text, tts and fill-in-blank elements.
        #[arg(long)]
        content: Option<String>,
    },
    Configure(ConfigureArgs),
    /// Print one side as rendered element views.
    Render {
        card_id: Uuid,
        #[arg(long, value_parser = parse_name::<Side>, default_value = "front")]
        side: Side,
    },
    Reorder {
        set_id: Uuid,
        card_ids: Vec<Uuid>,
    },
    Delete {
        card_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct ConfigureArgs {
    card_id: Uuid,
    #[arg(long = "type", value_parser = parse_name::<CardType>)]
    card_type: Option<CardType>,
    #[arg(long)]
    countdown_front: Option<u32>,
    #[arg(long)]
    countdown_back: Option<u32>,
    #[arg(long, value_parser = parse_name::<CountdownBehavior>)]
    behavior_front: Option<CountdownBehavior>,
    #[arg(long, value_parser = parse_name::<CountdownBehavior>)]
    behavior_back: Option<CountdownBehavior>,
    #[arg(long)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct StudyArgs {
    set_id: Uuid,
    #[arg(long)]
    shuffle: bool,
    /// Allow previous/jump and wrap around at the ends.
    #[arg(long)]
    navigate: bool,
    #[arg(long)]
    no_timer: bool,
    /// Study only the cards due for review.
    #[arg(long)]
    review: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    set_id: Uuid,
    prompt: String,
    #[arg(long = "type", value_parser = parse_name::<CardType>, default_value = "normal")]
    card_type: CardType,
    #[arg(long, value_parser = parse_name::<InteractiveType>, default_value = "none")]
    interactive: InteractiveType,
}

#[derive(Args, Debug)]
struct OrgCommand {
    #[command(subcommand)]
    command: OrgSubcommand,
}

#[derive(Subcommand, Debug)]
enum OrgSubcommand {
    Create {
        name: String,
        #[arg(long)]
        domain: Option<String>,
    },
    List,
    Invite {
        org_id: Uuid,
        email: String,
        #[arg(long, value_parser = parse_name::<Role>, default_value = "member")]
        role: Role,
    },
    Invites {
        org_id: Uuid,
    },
    Revoke {
        invite_id: Uuid,
    },
    Accept {
        token: String,
    },
}

#[derive(Args, Debug)]
struct PrefsCommand {
    #[command(subcommand)]
    command: PrefsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PrefsSubcommand {
    List,
    Get { key: PrefKey },
    Set { key: PrefKey, value: String },
    Unset { key: PrefKey },
    /// Upload preferences to the account.
    Push,
    /// Replace local preferences with the account's.
    Pull,
}

#[derive(Args, Debug)]
struct PushCommand {
    #[command(subcommand)]
    command: PushSubcommand,
}

#[derive(Subcommand, Debug)]
enum PushSubcommand {
    Register {
        #[arg(long)]
        endpoint: String,
        #[arg(long)]
        p256dh: String,
        #[arg(long)]
        auth: String,
    },
}

/// Parse a kebab-case or lowercase name through the type's serde names.
fn parse_name<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|_| format!("unknown value: {s}"))
}

// =============================================================================
// ENTRY
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, ".env not loaded"),
    }

    let cli = Cli::parse();
    let action = cli.command.action();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", Notice::from_error(action, &e));
            ExitCode::FAILURE
        }
    }
}

fn app_state() -> Result<AppState, CliError> {
    let config = AppConfig::from_env().map_err(StartupError::from)?;
    Ok(AppState::from_config(config)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Domain { domain: name } => print_json(&domain::validate_domain(&name)?),
        Command::Templates => print_json(&canvas::template::builtin_templates()),
        Command::Import { path } => Ok(import::import_file(&path).map_err(ServiceError::from)?),
        Command::Auth(cmd) => run_auth(&app_state()?, cmd.command).await,
        Command::Sets(cmd) => run_sets(&app_state()?, cmd.command).await,
        Command::Cards(cmd) => run_cards(&app_state()?, cmd.command).await,
        Command::Study(args) => run_study(&app_state()?, args).await,
        Command::Generate(args) => {
            let state = app_state()?;
            let card = ai::generate_card(&state, args.set_id, &args.prompt, args.card_type, args.interactive).await?;
            print_json(&card)
        }
        Command::Translate { text, to } => {
            println!("{}", ai::translate(&app_state()?, &text, &to).await?);
            Ok(())
        }
        Command::Org(cmd) => run_org(&app_state()?, cmd.command).await,
        Command::Prefs(cmd) => run_prefs(&app_state()?, cmd.command).await,
        Command::Push(cmd) => match cmd.command {
            PushSubcommand::Register { endpoint, p256dh, auth } => {
                let subscription =
                    push::PushSubscription::new(&endpoint, &p256dh, &auth).map_err(ServiceError::from)?;
                push::register_push_subscription(&app_state()?, &subscription).await?;
                println!("registered");
                Ok(())
            }
        },
    }
}

async fn run_auth(state: &AppState, command: AuthSubcommand) -> Result<(), CliError> {
    match command {
        AuthSubcommand::SignIn { email, password } => {
            let session = state.backend.sign_in(email.trim(), &password).await?;
            state.persist_session().await?;
            println!("signed in as {}", session.user.email.as_deref().unwrap_or(email.trim()));
        }
        AuthSubcommand::SignUp { email, password } => match state.backend.sign_up(email.trim(), &password).await {
            Ok(session) => {
                state.persist_session().await?;
                println!("signed up as {}", session.user.email.as_deref().unwrap_or(email.trim()));
            }
            Err(BackendError::PendingConfirmation) => println!("check {} for a confirmation link", email.trim()),
            Err(e) => return Err(e.into()),
        },
        AuthSubcommand::SignOut => {
            state.backend.sign_out().await?;
            state.persist_session().await?;
            println!("signed out");
        }
        AuthSubcommand::Status => match state.backend.session() {
            Some(session) => println!("signed in as {}", session.user.email.as_deref().unwrap_or("unknown")),
            None => println!("signed out"),
        },
    }
    Ok(())
}

async fn run_sets(state: &AppState, command: SetsSubcommand) -> Result<(), CliError> {
    match command {
        SetsSubcommand::List { org: Some(org_id) } => print_json(&sets::list_organization_sets(state, org_id).await?),
        SetsSubcommand::List { org: None } => print_json(&sets::list_sets(state).await?),
        SetsSubcommand::Show { set_id } => {
            let set = sets::get_set(state, set_id).await?;
            let cards = cards::list_cards(state, set_id).await?;
            let due = study::review::due_count(&cards, OffsetDateTime::now_utc());
            print_json(&serde_json::json!({ "set": set, "cards": cards.len(), "due": due }))
        }
        SetsSubcommand::Create { title, description, org } => {
            print_json(&sets::create_set(state, &title, description.as_deref(), org).await?)
        }
        SetsSubcommand::Update { set_id, title, description, public } => {
            let patch = sets::SetPatch { title, description, is_public: public };
            print_json(&sets::update_set(state, set_id, patch).await?)
        }
        SetsSubcommand::Shuffle { set_id, enabled } => {
            print_json(&sets::set_permanent_shuffle(state, set_id, enabled).await?)
        }
        SetsSubcommand::Delete { set_id } => {
            let removed = sets::delete_set(state, set_id).await?;
            println!("deleted set and {removed} cards");
            Ok(())
        }
    }
}

async fn run_cards(state: &AppState, command: CardsSubcommand) -> Result<(), CliError> {
    match command {
        CardsSubcommand::List { set_id } => print_json(&cards::list_cards(state, set_id).await?),
        CardsSubcommand::Create { set_id, template, card_type } => {
            print_json(&cards::create_card(state, set_id, template.as_deref(), card_type).await?)
        }
        CardsSubcommand::AddElement { card_id, element_type, side, x, y, content } => {
            let mut editor =
                CardEditor::open(state, card_id, side, Box::new(FixedViewport(None)), EditorSettings::default()).await?;
            let id = editor.insert(with_content(element_type, content), x, y)?;
            editor.save(state).await?;
            println!("{id}");
            Ok(())
        }
        CardsSubcommand::Configure(args) => {
            let settings = cards::CardSettings {
                card_type: args.card_type,
                countdown_front: args.countdown_front,
                countdown_back: args.countdown_back,
                behavior_front: args.behavior_front,
                behavior_back: args.behavior_back,
                password: args.password,
            };
            print_json(&cards::configure_card(state, args.card_id, settings).await?)
        }
        CardsSubcommand::Render { card_id, side } => {
            let card = cards::get_card(state, card_id).await?;
            let elements = card.elements(side);
            let ctx = RenderContext {
                embeds: services::study::resolve_embeds(state, elements).await,
                ..RenderContext::default()
            };
            let views: Vec<_> = elements.iter().map(|el| render_element(el, &ctx)).collect();
            print_json(&views)
        }
        CardsSubcommand::Reorder { set_id, card_ids } => {
            let ordered = cards::reorder_cards(state, set_id, &card_ids).await?;
            for card in ordered {
                println!("{} {}", card.position, card.id);
            }
            Ok(())
        }
        CardsSubcommand::Delete { card_id } => {
            cards::delete_card(state, card_id).await?;
            println!("deleted");
            Ok(())
        }
    }
}

/// Empty payload of `element_type`, carrying `content` where the type has text.
fn with_content(element_type: ElementType, content: Option<String>) -> ElementKind {
    let mut kind = ElementKind::empty(element_type);
    if let Some(text) = content {
        match &mut kind {
            ElementKind::Text { content } | ElementKind::FillInBlank { content } | ElementKind::Tts { content, .. } => {
                *content = text;
            }
            _ => warn!(?element_type, "content ignored for this element type"),
        }
    }
    kind
}

async fn run_study(state: &AppState, args: StudyArgs) -> Result<(), CliError> {
    let options = SessionOptions { shuffle: args.shuffle, allow_navigation: args.navigate, countdown: !args.no_timer };
    let session = if args.review {
        services::study::start_review(state, args.set_id, options, OffsetDateTime::now_utc()).await?
    } else {
        services::study::start_session(state, args.set_id, options).await?
    };
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    study_loop::StudyScreen::new(state, session, args.review, std::io::stdout()).run(input).await?;
    Ok(())
}

async fn run_org(state: &AppState, command: OrgSubcommand) -> Result<(), CliError> {
    match command {
        OrgSubcommand::Create { name, domain } => {
            let created = org::create_organization(state, &name, domain.as_deref()).await?;
            for warning in &created.warnings {
                eprintln!("warning: {warning}");
            }
            print_json(&created.organization)
        }
        OrgSubcommand::List => print_json(&org::list_organizations(state).await?),
        OrgSubcommand::Invite { org_id, email, role } => {
            let sent = org::invite_member(state, org_id, &email, role).await?;
            if sent.outside_domain {
                eprintln!("warning: {} is outside the organization's domain", sent.invite.email);
            }
            if !sent.email_sent {
                eprintln!("warning: invite email not sent; share this token: {}", sent.invite.token);
            }
            print_json(&sent.invite)
        }
        OrgSubcommand::Invites { org_id } => print_json(&org::list_invites(state, org_id).await?),
        OrgSubcommand::Revoke { invite_id } => {
            org::revoke_invite(state, invite_id).await?;
            println!("revoked");
            Ok(())
        }
        OrgSubcommand::Accept { token } => print_json(&org::accept_invite(state, &token).await?),
    }
}

async fn run_prefs(state: &AppState, command: PrefsSubcommand) -> Result<(), CliError> {
    match command {
        PrefsSubcommand::List => {
            let prefs = state.prefs.lock().await;
            for (key, value) in prefs.user_entries() {
                println!("{} = {value}", key.as_str());
            }
        }
        PrefsSubcommand::Get { key } => match state.prefs.lock().await.get(user_key(key)?) {
            Some(value) => println!("{value}"),
            None => println!("(unset)"),
        },
        PrefsSubcommand::Set { key, value } => {
            let mut prefs = state.prefs.lock().await;
            prefs.set(user_key(key)?, value);
            prefs.save()?;
        }
        PrefsSubcommand::Unset { key } => {
            let mut prefs = state.prefs.lock().await;
            prefs.remove(user_key(key)?);
            prefs.save()?;
        }
        PrefsSubcommand::Push => println!("pushed {} preferences", settings::push_preferences(state).await?),
        PrefsSubcommand::Pull => println!("pulled {} preferences", settings::pull_preferences(state).await?),
    }
    Ok(())
}

/// The session key is managed by `auth`; everything else is user-editable.
fn user_key(key: PrefKey) -> Result<PrefKey, PrefsError> {
    if PrefKey::USER.contains(&key) { Ok(key) } else { Err(PrefsError::UnknownKey(key.as_str().to_string())) }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
