use async_trait::async_trait;
use reqwest::Client;
use shared::domain::{Employee, EmployeeForm, EmployeeId};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ClientSettings, SettingsError};

const COLLECTION: &str = "employees";

/// Any failed exchange with the employee API. Callers render these uniformly;
/// the variant only feeds logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("could not reach employee api: {0}")]
    Transport(String),
    #[error("employee api responded with status {status}")]
    Status { status: u16 },
    #[error("employee api returned an unreadable body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// The four CRUD calls the dashboard makes. Each call is an independent
/// request/response cycle with no retries.
#[async_trait]
pub trait EmployeeGateway: Send + Sync {
    async fn list_employees(&self) -> Result<Vec<Employee>, FetchError>;
    async fn create_employee(&self, form: &EmployeeForm) -> Result<Employee, FetchError>;
    async fn update_employee(
        &self,
        id: &EmployeeId,
        form: &EmployeeForm,
    ) -> Result<Employee, FetchError>;
    async fn delete_employee(&self, id: &EmployeeId) -> Result<(), FetchError>;
}

pub struct HttpEmployeeGateway {
    http: Client,
    api_base: Url,
}

impl HttpEmployeeGateway {
    pub fn new(settings: &ClientSettings) -> Result<Self, SettingsError> {
        Ok(Self::with_client(Client::new(), settings.api_base_url()?))
    }

    pub fn with_client(http: Client, api_base: Url) -> Self {
        Self { http, api_base }
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn collection_url(&self) -> Url {
        self.url_for(None)
    }

    fn item_url(&self, id: &EmployeeId) -> Url {
        self.url_for(Some(id))
    }

    fn url_for(&self, id: Option<&EmployeeId>) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(COLLECTION);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }
}

#[async_trait]
impl EmployeeGateway for HttpEmployeeGateway {
    async fn list_employees(&self) -> Result<Vec<Employee>, FetchError> {
        let url = self.collection_url();
        debug!(%url, "GET employees");
        let result = async {
            let employees = self
                .http
                .get(url.clone())
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<Employee>>()
                .await?;
            Ok::<_, reqwest::Error>(employees)
        }
        .await;
        logged("list_employees", result)
    }

    async fn create_employee(&self, form: &EmployeeForm) -> Result<Employee, FetchError> {
        let url = self.collection_url();
        debug!(%url, "POST employee");
        let result = async {
            self.http
                .post(url.clone())
                .json(form)
                .send()
                .await?
                .error_for_status()?
                .json::<Employee>()
                .await
        }
        .await;
        logged("create_employee", result)
    }

    async fn update_employee(
        &self,
        id: &EmployeeId,
        form: &EmployeeForm,
    ) -> Result<Employee, FetchError> {
        let url = self.item_url(id);
        debug!(%url, "PUT employee");
        let result = async {
            self.http
                .put(url.clone())
                .json(form)
                .send()
                .await?
                .error_for_status()?
                .json::<Employee>()
                .await
        }
        .await;
        logged("update_employee", result)
    }

    async fn delete_employee(&self, id: &EmployeeId) -> Result<(), FetchError> {
        let url = self.item_url(id);
        debug!(%url, "DELETE employee");
        let result = async {
            self.http
                .delete(url.clone())
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, reqwest::Error>(())
        }
        .await;
        logged("delete_employee", result)
    }
}

fn logged<T>(operation: &'static str, result: Result<T, reqwest::Error>) -> Result<T, FetchError> {
    result.map_err(|err| {
        let err = FetchError::from(err);
        warn!(operation, error = %err, "employee api request failed");
        err
    })
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
