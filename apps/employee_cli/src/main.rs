mod render;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{ClientSettings, Dashboard, FormField, HttpEmployeeGateway, Intent, ViewState};
use shared::domain::EmployeeId;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "employee_cli",
    about = "Manage employees through the employee API"
)]
struct Args {
    /// Base address of the employee API, e.g. http://localhost:8080
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// Print the resulting employee list as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// List all employees.
    List,
    /// Create an employee.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        departments: String,
    },
    /// Update an employee. Omitted fields keep their current value.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        departments: Option<String>,
    },
    /// Delete an employee.
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = ClientSettings::load()?;
    if let Some(api_base) = args.api_base.as_deref() {
        settings = settings.with_api_base(api_base)?;
    }
    tracing::debug!(api_base = settings.api_base(), "using employee api");

    let mut dashboard = Dashboard::new(HttpEmployeeGateway::new(&settings)?);
    dashboard.load().await;

    match args.command {
        CliCommand::List => {}
        CliCommand::Create {
            name,
            email,
            departments,
        } => {
            for (field, value) in [
                (FormField::Name, name),
                (FormField::Email, email),
                (FormField::Departments, departments),
            ] {
                dashboard.handle(Intent::EditField(field, value)).await;
            }
            dashboard.handle(Intent::Submit).await;
        }
        CliCommand::Update {
            id,
            name,
            email,
            departments,
        } => {
            let id = EmployeeId::new(id);
            let target = dashboard
                .state()
                .employees()
                .iter()
                .find(|employee| employee.id == id)
                .cloned();
            let Some(employee) = target else {
                if ended_in_error(dashboard.state()) {
                    return report(dashboard.state(), args.json);
                }
                anyhow::bail!("no employee with id {id}");
            };
            dashboard.handle(Intent::BeginEdit(employee)).await;
            for (field, value) in [
                (FormField::Name, name),
                (FormField::Email, email),
                (FormField::Departments, departments),
            ] {
                if let Some(value) = value {
                    dashboard.handle(Intent::EditField(field, value)).await;
                }
            }
            dashboard.handle(Intent::Submit).await;
        }
        CliCommand::Delete { id } => {
            dashboard.handle(Intent::Delete(EmployeeId::new(id))).await;
        }
    }

    report(dashboard.state(), args.json)
}

/// Prints the last status message and the employee list.
fn report(state: &ViewState, json: bool) -> Result<ExitCode> {
    if let Some(status) = state.latest_status() {
        if status.is_error() {
            eprintln!("{}", render::status_line(status));
        } else {
            println!("{}", render::status_line(status));
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(state.employees())?);
    } else {
        print!("{}", render::employee_table(state.employees()));
    }

    Ok(exit_code(state))
}

/// Fails the process when the last status message is an error.
fn exit_code(state: &ViewState) -> ExitCode {
    if ended_in_error(state) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn ended_in_error(state: &ViewState) -> bool {
    state.latest_status().is_some_and(|s| s.is_error())
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use client_core::{FetchError, Outcome, STATUS_VISIBILITY};

    use super::*;

    fn listed_failure() -> Outcome {
        Outcome::Listed(Err(FetchError::Status { status: 500 }))
    }

    #[test]
    fn clean_listing_exits_successfully() {
        let mut state = ViewState::new();
        state.apply(Outcome::Listed(Ok(Vec::new())), Instant::now());
        assert_eq!(exit_code(&state), ExitCode::SUCCESS);
    }

    #[test]
    fn error_status_fails_the_process_even_after_it_expired() {
        let mut state = ViewState::new();
        let now = Instant::now();
        state.apply(listed_failure(), now);
        assert!(state.status(now + STATUS_VISIBILITY).is_none());
        assert_eq!(exit_code(&state), ExitCode::FAILURE);
        assert_eq!(report(&state, true).expect("report"), ExitCode::FAILURE);
    }

    #[test]
    fn info_status_exits_successfully() {
        let mut state = ViewState::new();
        let now = Instant::now();
        state.apply(listed_failure(), now);
        let deleted = Outcome::Deleted {
            id: EmployeeId::new("7"),
            result: Ok(()),
        };
        state.apply(deleted, now);
        assert_eq!(exit_code(&state), ExitCode::SUCCESS);
    }
}
