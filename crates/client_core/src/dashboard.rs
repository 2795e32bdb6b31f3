//! Intent → command → gateway call → outcome → state transition.
//!
//! [`ViewState::dispatch`] turns a user intent into at most one gateway
//! [`Command`]; [`execute`] runs it; [`ViewState::apply`] folds the resulting
//! [`Outcome`] back into the state and may ask for one follow-up command (the
//! list refresh after every successful mutation). The GUI runs these steps on
//! two threads; [`Dashboard`] runs them inline.

use std::time::Instant;

use shared::domain::{Employee, EmployeeForm, EmployeeId};
use tracing::debug;

use crate::{
    gateway::{EmployeeGateway, FetchError},
    store::{FormField, StatusKind, ViewState},
};

const LIST_FAILED: &str = "Failed to load employees";
const CREATE_FAILED: &str = "Failed to create employee";
const UPDATE_FAILED: &str = "Failed to update employee";
const DELETE_FAILED: &str = "Unable to delete employee";
const DELETED: &str = "Employee deleted";
const NAME_REQUIRED: &str = "Name is required";
const EMAIL_INVALID: &str = "Enter a valid email address";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Refresh,
    EditField(FormField, String),
    BeginEdit(Employee),
    CancelEdit,
    Submit,
    Delete(EmployeeId),
    DismissStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Create(EmployeeForm),
    Update(EmployeeId, EmployeeForm),
    Delete(EmployeeId),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::List => "list_employees",
            Command::Create(_) => "create_employee",
            Command::Update(..) => "update_employee",
            Command::Delete(_) => "delete_employee",
        }
    }

    /// The outcome this command would have produced had its request failed
    /// with `err`. Used when the command never reaches a gateway.
    pub fn into_failure(self, err: FetchError) -> Outcome {
        match self {
            Command::List => Outcome::Listed(Err(err)),
            Command::Create(_) => Outcome::Created(Err(err)),
            Command::Update(..) => Outcome::Updated(Err(err)),
            Command::Delete(id) => Outcome::Deleted {
                id,
                result: Err(err),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listed(Result<Vec<Employee>, FetchError>),
    Created(Result<Employee, FetchError>),
    Updated(Result<Employee, FetchError>),
    Deleted {
        id: EmployeeId,
        result: Result<(), FetchError>,
    },
}

/// Performs the gateway call behind a command.
pub async fn execute<G>(gateway: &G, command: Command) -> Outcome
where
    G: EmployeeGateway + ?Sized,
{
    debug!(command = command.name(), "executing gateway command");
    match command {
        Command::List => Outcome::Listed(gateway.list_employees().await),
        Command::Create(form) => Outcome::Created(gateway.create_employee(&form).await),
        Command::Update(id, form) => Outcome::Updated(gateway.update_employee(&id, &form).await),
        Command::Delete(id) => {
            let result = gateway.delete_employee(&id).await;
            Outcome::Deleted { id, result }
        }
    }
}

impl ViewState {
    /// Applies a user intent. Returns the gateway call to make, if any.
    pub fn dispatch(&mut self, intent: Intent, now: Instant) -> Option<Command> {
        match intent {
            Intent::Refresh => {
                self.set_loading(true);
                Some(Command::List)
            }
            Intent::EditField(field, value) => {
                self.set_field(field, value);
                None
            }
            Intent::BeginEdit(employee) => {
                self.begin_edit(&employee);
                None
            }
            Intent::CancelEdit => {
                self.reset_form();
                None
            }
            Intent::Submit => self.submit(now),
            Intent::Delete(id) => {
                self.clear_error();
                Some(Command::Delete(id))
            }
            Intent::DismissStatus => {
                self.clear_status();
                None
            }
        }
    }

    fn submit(&mut self, now: Instant) -> Option<Command> {
        if self.is_saving() {
            return None;
        }
        if let Err(problem) = validate(self.form()) {
            self.announce(StatusKind::Error, problem, now);
            return None;
        }

        self.clear_error();
        self.set_saving(true);
        let form = self.form().clone();
        Some(match self.editing() {
            Some(id) => Command::Update(id.clone(), form),
            None => Command::Create(form),
        })
    }

    /// Folds a finished gateway call into the state. Returns the follow-up
    /// call, which is always a single list refresh after a successful
    /// mutation.
    pub fn apply(&mut self, outcome: Outcome, now: Instant) -> Option<Command> {
        match outcome {
            Outcome::Listed(Ok(employees)) => {
                self.set_employees(employees);
                self.set_loading(false);
                None
            }
            Outcome::Listed(Err(_)) => {
                self.announce(StatusKind::Error, LIST_FAILED, now);
                self.set_loading(false);
                None
            }
            Outcome::Created(result) => self.saved(result, "Created", CREATE_FAILED, now),
            Outcome::Updated(result) => self.saved(result, "Updated", UPDATE_FAILED, now),
            Outcome::Deleted { id, result: Ok(()) } => {
                self.announce(StatusKind::Info, DELETED, now);
                if self.editing() == Some(&id) {
                    self.reset_form();
                }
                self.refresh()
            }
            Outcome::Deleted { result: Err(_), .. } => {
                self.announce(StatusKind::Error, DELETE_FAILED, now);
                None
            }
        }
    }

    fn saved(
        &mut self,
        result: Result<Employee, FetchError>,
        verb: &str,
        failure: &str,
        now: Instant,
    ) -> Option<Command> {
        self.set_saving(false);
        match result {
            Ok(employee) => {
                self.announce(StatusKind::Info, format!("{verb} {}", employee.name), now);
                self.reset_form();
                self.refresh()
            }
            Err(_) => {
                self.announce(StatusKind::Error, failure, now);
                None
            }
        }
    }

    fn refresh(&mut self) -> Option<Command> {
        self.set_loading(true);
        Some(Command::List)
    }
}

/// Shape checks only; the server has the final say.
fn validate(form: &EmployeeForm) -> Result<(), &'static str> {
    if form.name.trim().is_empty() {
        return Err(NAME_REQUIRED);
    }
    if !form.email.contains('@') {
        return Err(EMAIL_INVALID);
    }
    Ok(())
}

/// Owns a gateway and a view state and runs each intent to completion,
/// including the follow-up refresh.
pub struct Dashboard<G: EmployeeGateway> {
    gateway: G,
    state: ViewState,
}

impl<G: EmployeeGateway> Dashboard<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: ViewState::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn load(&mut self) {
        self.handle(Intent::Refresh).await;
    }

    pub async fn handle(&mut self, intent: Intent) {
        let mut next = self.state.dispatch(intent, Instant::now());
        while let Some(command) = next {
            let outcome = execute(&self.gateway, command).await;
            next = self.state.apply(outcome, Instant::now());
        }
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
