use std::{collections::HashSet, time::Duration};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::*;
use crate::store::{FormMode, STATUS_VISIBILITY};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List,
    Create(EmployeeForm),
    Update(EmployeeId, EmployeeForm),
    Delete(EmployeeId),
}

/// In-memory stand-in for the employee API that records every call.
#[derive(Default)]
struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    employees: Mutex<Vec<Employee>>,
    failing: Mutex<HashSet<&'static str>>,
    next_id: Mutex<u64>,
}

impl FakeGateway {
    fn seeded(employees: Vec<Employee>) -> Self {
        Self {
            employees: Mutex::new(employees),
            next_id: Mutex::new(7),
            ..Self::default()
        }
    }

    async fn fail(&self, operation: &'static str) {
        self.failing.lock().await.insert(operation);
    }

    async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn check(&self, operation: &'static str) -> Result<(), FetchError> {
        if self.failing.lock().await.contains(operation) {
            return Err(FetchError::Status { status: 500 });
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeGateway for FakeGateway {
    async fn list_employees(&self) -> Result<Vec<Employee>, FetchError> {
        self.calls.lock().await.push(Call::List);
        self.check("list").await?;
        Ok(self.employees.lock().await.clone())
    }

    async fn create_employee(&self, form: &EmployeeForm) -> Result<Employee, FetchError> {
        self.calls.lock().await.push(Call::Create(form.clone()));
        self.check("create").await?;
        let mut next_id = self.next_id.lock().await;
        let employee = form.clone().into_employee(EmployeeId(next_id.to_string()));
        *next_id += 1;
        self.employees.lock().await.push(employee.clone());
        Ok(employee)
    }

    async fn update_employee(
        &self,
        id: &EmployeeId,
        form: &EmployeeForm,
    ) -> Result<Employee, FetchError> {
        self.calls
            .lock()
            .await
            .push(Call::Update(id.clone(), form.clone()));
        self.check("update").await?;
        let updated = form.clone().into_employee(id.clone());
        for employee in self.employees.lock().await.iter_mut() {
            if &employee.id == id {
                *employee = updated.clone();
            }
        }
        Ok(updated)
    }

    async fn delete_employee(&self, id: &EmployeeId) -> Result<(), FetchError> {
        self.calls.lock().await.push(Call::Delete(id.clone()));
        self.check("delete").await?;
        self.employees
            .lock()
            .await
            .retain(|employee| &employee.id != id);
        Ok(())
    }
}

fn employee(id: &str, name: &str) -> Employee {
    Employee {
        id: EmployeeId::new(id),
        name: name.to_string(),
        email: format!("{}@co.com", name.to_ascii_lowercase()),
        departments: "Ops".to_string(),
    }
}

async fn fill_form(dashboard: &mut Dashboard<FakeGateway>, form: &EmployeeForm) {
    for (field, value) in [
        (FormField::Name, &form.name),
        (FormField::Email, &form.email),
        (FormField::Departments, &form.departments),
    ] {
        dashboard
            .handle(Intent::EditField(field, value.clone()))
            .await;
    }
}

async fn loaded(employees: Vec<Employee>) -> Dashboard<FakeGateway> {
    let mut dashboard = Dashboard::new(FakeGateway::seeded(employees));
    dashboard.load().await;
    dashboard
}

fn status_text(state: &ViewState) -> Option<String> {
    state
        .status(Instant::now())
        .map(|status| status.text.clone())
}

fn edit(field: FormField, value: &str) -> Intent {
    Intent::EditField(field, value.to_string())
}

fn list_failed(status: u16) -> Outcome {
    Outcome::Listed(Err(FetchError::Status { status }))
}

#[tokio::test]
async fn create_goes_to_collection_endpoint_then_refreshes_once() {
    let mut dashboard = Dashboard::new(FakeGateway::seeded(Vec::new()));
    let form = EmployeeForm::new("Jane Doe", "jane@co.com", "HR");
    fill_form(&mut dashboard, &form).await;

    dashboard.handle(Intent::Submit).await;

    assert_eq!(
        dashboard.gateway().calls().await,
        vec![Call::Create(form.clone()), Call::List]
    );
    let state = dashboard.state();
    assert_eq!(status_text(state).as_deref(), Some("Created Jane Doe"));
    assert!(state.form().is_empty());
    assert_eq!(state.mode(), FormMode::Create);
    assert!(!state.is_saving());
    assert!(!state.is_loading());
    assert_eq!(
        state.employees(),
        &[form.into_employee(EmployeeId::new("7"))]
    );
}

#[tokio::test]
async fn update_goes_to_item_endpoint_of_editing_target() {
    let bob = employee("3", "Bob");
    let mut dashboard = loaded(vec![bob.clone()]).await;

    dashboard.handle(Intent::BeginEdit(bob.clone())).await;
    assert_eq!(dashboard.state().form(), &EmployeeForm::from(&bob));
    assert_eq!(dashboard.state().editing(), Some(&bob.id));

    dashboard.handle(edit(FormField::Name, "Robert")).await;
    dashboard.handle(Intent::Submit).await;

    let expected_form = EmployeeForm::new("Robert", "bob@co.com", "Ops");
    assert_eq!(
        dashboard.gateway().calls().await,
        vec![
            Call::List,
            Call::Update(bob.id.clone(), expected_form.clone()),
            Call::List
        ]
    );
    let state = dashboard.state();
    assert_eq!(status_text(state).as_deref(), Some("Updated Robert"));
    assert_eq!(state.editing(), None);
    assert!(state.form().is_empty());
    assert_eq!(state.employees(), &[expected_form.into_employee(bob.id)]);
}

#[tokio::test]
async fn failed_create_keeps_form_and_skips_refresh() {
    let mut dashboard = loaded(Vec::new()).await;
    dashboard.gateway().fail("create").await;
    let form = EmployeeForm::new("Jane Doe", "jane@co.com", "");
    fill_form(&mut dashboard, &form).await;

    dashboard.handle(Intent::Submit).await;

    assert_eq!(
        dashboard.gateway().calls().await,
        vec![Call::List, Call::Create(form.clone())]
    );
    let state = dashboard.state();
    assert_eq!(state.form(), &form);
    assert_eq!(state.mode(), FormMode::Create);
    assert!(!state.is_saving());
    let status = state.status(Instant::now()).expect("error banner");
    assert!(status.is_error());
    assert_eq!(status.text, "Failed to create employee");
}

#[tokio::test]
async fn failed_update_keeps_editing_target() {
    let bob = employee("3", "Bob");
    let mut dashboard = loaded(vec![bob.clone()]).await;
    dashboard.gateway().fail("update").await;

    dashboard.handle(Intent::BeginEdit(bob.clone())).await;
    dashboard
        .handle(edit(FormField::Email, "bob@corp.com"))
        .await;
    dashboard.handle(Intent::Submit).await;

    let state = dashboard.state();
    assert_eq!(state.editing(), Some(&bob.id));
    assert_eq!(state.form().email, "bob@corp.com");
    assert_eq!(
        status_text(state).as_deref(),
        Some("Failed to update employee")
    );
    assert_eq!(state.employees(), &[bob]);
}

#[tokio::test]
async fn deleting_the_editing_target_resets_the_form() {
    let bob = employee("3", "Bob");
    let mut dashboard = loaded(vec![bob.clone(), employee("4", "Amy")]).await;
    dashboard.handle(Intent::BeginEdit(bob.clone())).await;

    dashboard.handle(Intent::Delete(bob.id.clone())).await;

    assert_eq!(
        dashboard.gateway().calls().await,
        vec![Call::List, Call::Delete(bob.id.clone()), Call::List]
    );
    let state = dashboard.state();
    assert_eq!(status_text(state).as_deref(), Some("Employee deleted"));
    assert_eq!(state.mode(), FormMode::Create);
    assert!(state.form().is_empty());
    assert_eq!(state.employees(), &[employee("4", "Amy")]);
}

#[tokio::test]
async fn deleting_another_employee_leaves_the_form_alone() {
    let bob = employee("3", "Bob");
    let amy = employee("4", "Amy");
    let mut dashboard = loaded(vec![bob.clone(), amy.clone()]).await;
    dashboard.handle(Intent::BeginEdit(bob.clone())).await;

    dashboard.handle(Intent::Delete(amy.id.clone())).await;

    let state = dashboard.state();
    assert_eq!(state.editing(), Some(&bob.id));
    assert_eq!(state.form(), &EmployeeForm::from(&bob));
    assert_eq!(state.employees(), &[bob]);
}

#[tokio::test]
async fn failed_delete_reports_and_does_not_refresh() {
    let bob = employee("3", "Bob");
    let mut dashboard = loaded(vec![bob.clone()]).await;
    dashboard.gateway().fail("delete").await;

    dashboard.handle(Intent::Delete(bob.id.clone())).await;

    assert_eq!(
        dashboard.gateway().calls().await,
        vec![Call::List, Call::Delete(bob.id.clone())]
    );
    assert_eq!(
        status_text(dashboard.state()).as_deref(),
        Some("Unable to delete employee")
    );
    assert_eq!(dashboard.state().employees(), &[bob]);
}

#[tokio::test]
async fn failed_refresh_keeps_the_stale_list() {
    let bob = employee("3", "Bob");
    let mut dashboard = loaded(vec![bob.clone()]).await;
    dashboard.gateway().fail("list").await;

    dashboard.handle(Intent::Refresh).await;

    let state = dashboard.state();
    assert_eq!(state.employees(), &[bob]);
    assert!(!state.is_loading());
    assert_eq!(
        status_text(state).as_deref(),
        Some("Failed to load employees")
    );
}

#[tokio::test]
async fn invalid_form_is_rejected_without_a_request() {
    let mut dashboard = loaded(Vec::new()).await;

    dashboard.handle(Intent::Submit).await;
    assert_eq!(
        status_text(dashboard.state()).as_deref(),
        Some("Name is required")
    );

    dashboard.handle(edit(FormField::Name, "Jane")).await;
    dashboard
        .handle(edit(FormField::Email, "jane.co.com"))
        .await;
    dashboard.handle(Intent::Submit).await;
    assert_eq!(
        status_text(dashboard.state()).as_deref(),
        Some("Enter a valid email address")
    );

    assert_eq!(dashboard.gateway().calls().await, vec![Call::List]);
    assert_eq!(dashboard.state().form().name, "Jane");
}

#[test]
fn submit_is_ignored_while_saving() {
    let now = Instant::now();
    let mut state = ViewState::new();
    state.dispatch(edit(FormField::Name, "Jane"), now);
    state.dispatch(edit(FormField::Email, "jane@co.com"), now);

    assert!(matches!(
        state.dispatch(Intent::Submit, now),
        Some(Command::Create(_))
    ));
    assert!(state.is_saving());
    assert_eq!(state.dispatch(Intent::Submit, now), None);
}

#[test]
fn every_successful_mutation_asks_for_exactly_one_refresh() {
    let now = Instant::now();
    let jane = employee("7", "Jane");
    let outcomes = [
        Outcome::Created(Ok(jane.clone())),
        Outcome::Updated(Ok(jane.clone())),
        Outcome::Deleted {
            id: jane.id.clone(),
            result: Ok(()),
        },
    ];

    for outcome in outcomes {
        let mut state = ViewState::new();
        assert_eq!(state.apply(outcome, now), Some(Command::List));
        assert!(state.is_loading());
        assert_eq!(
            state.apply(Outcome::Listed(Ok(vec![jane.clone()])), now),
            None
        );
    }
}

#[test]
fn failed_mutations_ask_for_nothing() {
    let now = Instant::now();
    let err = FetchError::Transport("connection refused".to_string());
    let outcomes = [
        Outcome::Listed(Err(err.clone())),
        Outcome::Created(Err(err.clone())),
        Outcome::Updated(Err(err.clone())),
        Outcome::Deleted {
            id: EmployeeId::new("3"),
            result: Err(err),
        },
    ];

    for outcome in outcomes {
        let mut state = ViewState::new();
        assert_eq!(state.apply(outcome, now), None);
        assert!(state.status(now).expect("error banner").is_error());
    }
}

#[test]
fn banner_clears_after_window_and_is_superseded_by_newer_messages() {
    let start = Instant::now();
    let mut state = ViewState::new();
    state.apply(Outcome::Created(Ok(employee("7", "Jane"))), start);
    assert_eq!(
        state.status(start).map(|s| s.text.as_str()),
        Some("Created Jane")
    );

    let later = start + Duration::from_secs(2);
    state.apply(list_failed(503), later);
    assert_eq!(
        state.status(later).map(|s| s.text.as_str()),
        Some("Failed to load employees")
    );

    assert!(state.status(start + STATUS_VISIBILITY).is_some());
    assert!(state.status(later + STATUS_VISIBILITY).is_none());
}

#[test]
fn starting_a_submit_clears_a_visible_error_but_not_an_info() {
    let now = Instant::now();
    let mut state = ViewState::new();
    state.apply(list_failed(500), now);
    state.dispatch(edit(FormField::Name, "Jane"), now);
    state.dispatch(edit(FormField::Email, "jane@co.com"), now);

    state.dispatch(Intent::Submit, now);
    assert!(state.status(now).is_none());

    let mut state = ViewState::new();
    state.apply(
        Outcome::Deleted {
            id: EmployeeId::new("1"),
            result: Ok(()),
        },
        now,
    );
    state.dispatch(Intent::Delete(EmployeeId::new("2")), now);
    assert_eq!(
        state.status(now).map(|s| s.text.as_str()),
        Some("Employee deleted")
    );
}

#[test]
fn dismiss_and_cancel_edit_are_local() {
    let now = Instant::now();
    let mut state = ViewState::new();
    state.apply(list_failed(500), now);
    assert_eq!(state.dispatch(Intent::DismissStatus, now), None);
    assert!(state.status(now).is_none());

    assert_eq!(
        state.dispatch(Intent::BeginEdit(employee("3", "Bob")), now),
        None
    );
    assert_eq!(state.dispatch(Intent::CancelEdit, now), None);
    assert_eq!(state.mode(), FormMode::Create);
    assert!(state.form().is_empty());
}

#[test]
fn undelivered_submit_fails_like_a_rejected_request() {
    let now = Instant::now();
    let mut state = ViewState::new();
    state.dispatch(edit(FormField::Name, "Jane Doe"), now);
    state.dispatch(edit(FormField::Email, "jane@co.com"), now);
    let command = state.dispatch(Intent::Submit, now).expect("create command");
    assert!(state.is_saving());

    let outcome = command.into_failure(FetchError::Transport("worker gone".to_string()));
    assert_eq!(state.apply(outcome, now), None);
    assert!(!state.is_saving());
    assert_eq!(
        state.status(now).map(|s| s.text.as_str()),
        Some("Failed to create employee")
    );
    assert_eq!(FormField::Name.value(state.form()), "Jane Doe");
}
