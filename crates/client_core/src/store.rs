//! View state owned by whichever controller drives the dashboard.
//!
//! Fields are read through accessors; the only writers are the intent and
//! outcome transitions in [`crate::dashboard`].

use std::time::{Duration, Instant};

use shared::domain::{Employee, EmployeeForm, EmployeeId};

/// How long a status message stays visible unless superseded.
pub const STATUS_VISIBILITY: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub expires_at: Instant,
}

impl StatusMessage {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Departments,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Departments => "Departments",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            FormField::Name => "Jane Doe",
            FormField::Email => "jane@company.com",
            FormField::Departments => "HR, Finance",
        }
    }

    pub fn value(self, form: &EmployeeForm) -> &str {
        match self {
            FormField::Name => &form.name,
            FormField::Email => &form.email,
            FormField::Departments => &form.departments,
        }
    }

    fn slot(self, form: &mut EmployeeForm) -> &mut String {
        match self {
            FormField::Name => &mut form.name,
            FormField::Email => &mut form.email,
            FormField::Departments => &mut form.departments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<'a> {
    Create,
    Edit(&'a EmployeeId),
}

#[derive(Debug, Clone)]
pub struct ViewState {
    employees: Vec<Employee>,
    form: EmployeeForm,
    editing: Option<EmployeeId>,
    status: Option<StatusMessage>,
    loading: bool,
    saving: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Starts in the loading state: the dashboard lists employees on start-up.
    pub fn new() -> Self {
        Self {
            employees: Vec::new(),
            form: EmployeeForm::default(),
            editing: None,
            status: None,
            loading: true,
            saving: false,
        }
    }

    /// Employees in the order the server returned them.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn form(&self) -> &EmployeeForm {
        &self.form
    }

    pub fn editing(&self) -> Option<&EmployeeId> {
        self.editing.as_ref()
    }

    pub fn mode(&self) -> FormMode<'_> {
        match &self.editing {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Create,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// The visible status message, if any has not yet expired at `now`.
    pub fn status(&self, now: Instant) -> Option<&StatusMessage> {
        self.status
            .as_ref()
            .filter(|status| !status.is_expired(now))
    }

    /// The most recent status message, even if its window has passed.
    pub fn latest_status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// When the current status message disappears.
    pub fn status_deadline(&self) -> Option<Instant> {
        self.status.as_ref().map(|status| status.expires_at)
    }

    /// Drops an expired status message. Returns whether anything changed.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        if self.status.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.status = None;
            return true;
        }
        false
    }

    pub(crate) fn set_employees(&mut self, employees: Vec<Employee>) {
        self.employees = employees;
    }

    pub(crate) fn set_field(&mut self, field: FormField, value: String) {
        *field.slot(&mut self.form) = value;
    }

    pub(crate) fn begin_edit(&mut self, employee: &Employee) {
        self.form = EmployeeForm::from(employee);
        self.editing = Some(employee.id.clone());
    }

    pub(crate) fn reset_form(&mut self) {
        self.form = EmployeeForm::default();
        self.editing = None;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub(crate) fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    /// Replaces whatever message is showing and restarts the visibility
    /// window.
    pub(crate) fn announce(&mut self, kind: StatusKind, text: impl Into<String>, now: Instant) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
            expires_at: now + STATUS_VISIBILITY,
        });
    }

    pub(crate) fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn clear_error(&mut self) {
        if self.status.as_ref().is_some_and(StatusMessage::is_error) {
            self.status = None;
        }
    }
}
