// Command handlers
use crate::application::dashboard_service::{DashboardController, FetchOutcome};
use crate::application::errors::{ServiceError, ValidationError};
use crate::application::notifications::Notified;
use crate::domain::comparison::PlantSelection;
use crate::domain::filters::{DashboardFilters, DateRange, FilterChange, KNOWN_PLANTS, PlantFilter};
use crate::domain::role::Role;
use crate::domain::session::{DEMO_ACCOUNTS, Session, demo_account};
use crate::presentation::app_state::AppState;
use crate::presentation::cli::FilterArgs;
use crate::presentation::render::{self, Output};
use crate::presentation::routes::{NavBar, Route};
use chrono::NaiveDate;
use futures::StreamExt;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::WatchStream;

#[derive(Serialize)]
struct LoginRequired {
    route: Route,
    message: &'static str,
}

/// Resolves the requested view against the session; without one the login view is shown.
async fn enter(state: &AppState, output: Output, route: Route) -> anyhow::Result<Session> {
    let session = state.session_gate.current().await;
    let shown = route.resolve(session.as_ref());

    match session {
        Some(session) if shown == route => {
            if !output.json {
                print!("{}", render::navbar(&NavBar::new(route, &session)));
            }
            Ok(session)
        }
        _ => {
            output.emit(
                &LoginRequired {
                    route: shown,
                    message: "Not logged in",
                },
                |_| render::login_view(),
            )?;
            Err(ValidationError::NotLoggedIn.into())
        }
    }
}

fn resolve_range(state: &AppState, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<DateRange, ValidationError> {
    let defaults = &state.config.dashboard;
    DateRange::new(start.unwrap_or(defaults.start), end.unwrap_or(defaults.end)).map_err(ValidationError::from)
}

/// Configured starting filters for the session's role, with command-line overrides on top.
fn resolve_filters(state: &AppState, session: &Session, args: &FilterArgs) -> Result<DashboardFilters, ValidationError> {
    let mut filters = state.config.dashboard.filters(args.role.unwrap_or(session.role))?;
    if let Some(plant) = &args.plant {
        filters.plant = plant.clone();
    }
    if args.start.is_some() || args.end.is_some() {
        filters.range = resolve_range(state, args.start, args.end)?;
    }
    if !filters.plant.is_known() {
        tracing::warn!(plant = filters.plant.as_str(), "plant is not one of the known plants");
    }

    Ok(filters)
}

pub async fn login(
    state: &AppState,
    output: Output,
    email: Option<String>,
    password: Option<String>,
    demo: Option<Role>,
) -> anyhow::Result<()> {
    let session = match (demo, email, password) {
        (Some(role), _, _) => state.session_gate.login_demo(demo_account(role)).await?,
        (None, Some(email), Some(password)) => state.session_gate.login(&email, &password).await?,
        _ => anyhow::bail!("email and password are required (or use --demo <role>)"),
    };

    output.emit(&session, |s| format!("Logged in as {} ({})\n", s.email, s.role.as_str()))
}

pub async fn logout(state: &AppState, output: Output) -> anyhow::Result<()> {
    state.session_gate.logout().await?;
    output.emit(&serde_json::json!({"status": "logged_out"}), |_| "Logged out\n".to_string())
}

pub async fn whoami(state: &AppState, output: Output) -> anyhow::Result<()> {
    let session = enter(state, output, Route::Dashboard).await?;
    output.emit(&session, |s| format!("{} ({})\n", s.email, s.role.as_str()))
}

pub async fn upload(state: &AppState, output: Output, file: &Path) -> anyhow::Result<()> {
    let session = enter(state, output, Route::Upload).await?;

    match state.upload_service.upload(&session.token, file).await {
        Ok(result) => output.emit(&result, render::upload_result),
        Err(e) => {
            if e.is_validation() && !output.json {
                print!("{}", render::expected_sheets());
            }
            Err(e.into())
        }
    }
}

pub async fn dashboard(state: &AppState, output: Output, args: &FilterArgs, interactive: bool) -> anyhow::Result<()> {
    let session = enter(state, output, Route::Dashboard).await?;
    let filters = resolve_filters(state, &session, args)?;

    let controller = Arc::new(DashboardController::new(
        state.dashboard_service.clone(),
        session.token.clone(),
        filters,
        state.notifier.clone(),
    ));

    if interactive {
        return run_interactive(controller, output).await;
    }

    let outcome = controller.refresh().await;
    let snapshot = controller.snapshot();
    match (outcome, snapshot.view) {
        (FetchOutcome::Applied, Some(view)) => output.emit(&view, render::dashboard),
        _ => Err(Notified(snapshot.error.unwrap_or_else(|| "no data".to_string())).into()),
    }
}

/// Whether the failure already reached the user as a notification, so it need not be printed again.
pub fn already_reported(err: &anyhow::Error) -> bool {
    err.is::<Notified>() || err.downcast_ref::<ServiceError>().is_some_and(ServiceError::was_notified)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InteractiveCommand {
    Change(FilterChange),
    Refresh,
    Help,
    Quit,
}

const INTERACTIVE_HELP: &str = "Commands: role <name> | plant <name|all> | range <start> <end> | refresh | help | quit";

fn parse_command(line: &str) -> Result<InteractiveCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(INTERACTIVE_HELP.to_string());
    };
    let rest: Vec<&str> = words.collect();

    match verb.to_ascii_lowercase().as_str() {
        "role" => rest
            .join(" ")
            .parse::<Role>()
            .map(|role| InteractiveCommand::Change(FilterChange::Role(role)))
            .map_err(|e| e.to_string()),
        "plant" if !rest.is_empty() => Ok(InteractiveCommand::Change(FilterChange::Plant(PlantFilter::from(
            rest.join(" "),
        )))),
        "range" if rest.len() == 2 => {
            let parse = |s: &str| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
            };
            let range = DateRange::new(parse(rest[0])?, parse(rest[1])?).map_err(|e| e.to_string())?;
            Ok(InteractiveCommand::Change(FilterChange::Range(range)))
        }
        "refresh" => Ok(InteractiveCommand::Refresh),
        "help" | "?" => Ok(InteractiveCommand::Help),
        "quit" | "exit" | "q" => Ok(InteractiveCommand::Quit),
        _ => Err(INTERACTIVE_HELP.to_string()),
    }
}

/// Renders every committed view while filter changes are read from stdin.
/// Changes are applied concurrently; the controller drops stale responses.
async fn run_interactive(controller: Arc<DashboardController>, output: Output) -> anyhow::Result<()> {
    let mut updates = WatchStream::new(controller.subscribe());
    let renderer = tokio::spawn(async move {
        while let Some(state) = updates.next().await {
            if state.loading {
                eprintln!("Loading {} dashboard...", state.filters.role.as_str());
            } else if let (Some(view), None) = (&state.view, &state.error) {
                if let Err(e) = output.emit(view, render::dashboard) {
                    tracing::error!(error = %e, "could not render dashboard");
                }
            }
        }
    });

    let initial = controller.clone();
    tokio::spawn(async move {
        initial.refresh().await;
    });

    eprintln!("{INTERACTIVE_HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(InteractiveCommand::Quit) => break,
            Ok(InteractiveCommand::Help) => eprintln!("{INTERACTIVE_HELP}"),
            Ok(InteractiveCommand::Refresh) => {
                let controller = controller.clone();
                tokio::spawn(async move {
                    controller.refresh().await;
                });
            }
            Ok(InteractiveCommand::Change(change)) => {
                let controller = controller.clone();
                tokio::spawn(async move {
                    if controller.apply(change).await == FetchOutcome::Unchanged {
                        tracing::info!("filter already set, nothing to fetch");
                    }
                });
            }
            Err(message) => eprintln!("{message}"),
        }
    }

    renderer.abort();
    Ok(())
}

/// Plant names as typed on the command line, snapped to their canonical spelling.
fn plant_selection(plants: &[String]) -> Result<PlantSelection, ValidationError> {
    let canonical: Vec<String> = plants
        .iter()
        .map(|p| PlantFilter::from(p.clone()).as_str().to_string())
        .collect();
    Ok(PlantSelection::from_names(&canonical)?)
}

pub async fn compare(
    state: &AppState,
    output: Output,
    plants: &[String],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let session = enter(state, output, Route::Dashboard).await?;
    let range = resolve_range(state, start, end)?;

    let selection = plant_selection(plants)?;

    let comparison = state
        .comparison_service
        .compare(&session.token, &selection, &range)
        .await?;
    output.emit(&comparison, render::comparison)
}

pub async fn prompts(state: &AppState, output: Output) -> anyhow::Result<()> {
    let prompts = state.insight_service.prompts().await;
    output.emit(&prompts, |p| render::prompts(p))
}

pub async fn ask(state: &AppState, output: Output, question: &str, args: &FilterArgs) -> anyhow::Result<()> {
    let session = enter(state, output, Route::Dashboard).await?;
    let filters = resolve_filters(state, &session, args)?;

    let response = state
        .insight_service
        .ask(&session.token, question, &filters)
        .await?;
    output.emit(&response, render::insight)
}

pub async fn send_report(
    state: &AppState,
    output: Output,
    email: &str,
    role: Option<Role>,
    plant: Option<PlantFilter>,
) -> anyhow::Result<()> {
    let session = enter(state, output, Route::Dashboard).await?;
    let role = role.unwrap_or(session.role);
    let plant = plant.unwrap_or_else(|| PlantFilter::from(state.config.dashboard.plant.clone()));

    let ack = state
        .report_service
        .send(&session.token, email, role, &plant)
        .await?;
    output.emit(&ack, |a| {
        format!(
            "{}\n",
            a.message
                .clone()
                .unwrap_or_else(|| format!("Report sent successfully to {}", email.trim()))
        )
    })
}

#[derive(Serialize)]
struct DemoUser {
    role: &'static str,
    email: &'static str,
}

#[derive(Serialize)]
struct AdminView {
    mode: &'static str,
    data_source: &'static str,
    plants: Vec<&'static str>,
    demo_users: Vec<DemoUser>,
    backend_url: String,
    token_path: String,
    default_range: DateRange,
}

fn admin_text(view: &AdminView) -> String {
    let mut out = format!(
        "Platform\n  Mode:         {}\n  Data source:  {}\n  Plants:       {}\n\nDemo users\n",
        view.mode,
        view.data_source,
        view.plants.join(", ")
    );
    for user in &view.demo_users {
        out.push_str(&format!("  {:<15} {}\n", user.role, user.email));
    }
    out.push_str(&format!(
        "\nClient\n  Backend:      {}\n  Token file:   {}\n  Date range:   {} to {}\n",
        view.backend_url,
        view.token_path,
        view.default_range.start_param(),
        view.default_range.end_param()
    ));
    out
}

pub async fn admin(state: &AppState, output: Output) -> anyhow::Result<()> {
    enter(state, output, Route::Admin).await?;

    let view = AdminView {
        mode: "Demo",
        data_source: "Excel upload (Production, Energy, Maintenance, Quality, Sales_Logistics, Finance)",
        plants: KNOWN_PLANTS.to_vec(),
        demo_users: DEMO_ACCOUNTS
            .iter()
            .map(|a| DemoUser {
                role: a.role.as_str(),
                email: a.email,
            })
            .collect(),
        backend_url: state.api_base.clone(),
        token_path: state.token_path.display().to_string(),
        default_range: resolve_range(state, None, None)?,
    };
    output.emit(&view, admin_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interactive_commands() {
        assert_eq!(
            parse_command("role plant head"),
            Ok(InteractiveCommand::Change(FilterChange::Role(Role::PlantHead)))
        );
        assert_eq!(
            parse_command("plant siliguri"),
            Ok(InteractiveCommand::Change(FilterChange::Plant(PlantFilter::Named(
                "Siliguri".to_string()
            ))))
        );
        assert_eq!(
            parse_command("plant all"),
            Ok(InteractiveCommand::Change(FilterChange::Plant(PlantFilter::All)))
        );
        assert_eq!(parse_command("REFRESH"), Ok(InteractiveCommand::Refresh));
        assert_eq!(parse_command("q"), Ok(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_range() {
        let Ok(InteractiveCommand::Change(FilterChange::Range(range))) = parse_command("range 2025-01-01 2025-03-31")
        else {
            panic!("range not parsed");
        };
        assert_eq!(range.end_param(), "2025-03-31");

        assert!(parse_command("range 2025-03-31 2025-01-01").is_err());
        assert!(parse_command("range 2025-13-01 2025-01-01").is_err());
        assert!(parse_command("range 2025-01-01").is_err());
    }

    #[test]
    fn test_same_plant_twice_is_reported_as_duplicate() {
        let plants = vec!["Sonapur".to_string(), "sonapur".to_string()];
        assert_eq!(
            plant_selection(&plants).unwrap_err().to_string(),
            "Sonapur is listed more than once"
        );

        let plants = vec!["siliguri".to_string(), "Guwahati".to_string()];
        assert!(plant_selection(&plants).unwrap().ready().is_ok());
    }

    #[test]
    fn test_toasted_failures_are_not_printed_twice() {
        assert!(already_reported(&Notified("Internal Server Error".to_string()).into()));
        assert!(already_reported(&ServiceError::from(ValidationError::InvalidEmail).into()));
        assert!(!already_reported(&ServiceError::Storage(anyhow::anyhow!("read-only")).into()));
        assert!(!already_reported(&ValidationError::NotLoggedIn.into()));
    }

    #[test]
    fn test_unknown_commands_show_help() {
        assert_eq!(parse_command("dance"), Err(INTERACTIVE_HELP.to_string()));
        assert!(parse_command("role ceo").is_err());
        assert!(parse_command("plant").is_err());
    }
}
