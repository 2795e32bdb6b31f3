use shared::{
    domain::{Employee, EmployeeForm, EmployeeId},
    error::ApiError,
};
use storage::Storage;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_employees(ctx: &ApiContext) -> Result<Vec<Employee>, ApiError> {
    info!("fetching all employees");
    ctx.storage.list_employees().await.map_err(internal)
}

pub async fn get_employee(ctx: &ApiContext, id: &EmployeeId) -> Result<Employee, ApiError> {
    info!(employee_id = %id, "fetching employee");
    ctx.storage
        .employee(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found(id))
}

/// Stores a new employee. Any id the caller may have sent is never consulted;
/// the storage layer assigns one.
pub async fn create_employee(ctx: &ApiContext, form: &EmployeeForm) -> Result<Employee, ApiError> {
    info!("creating employee");
    ctx.storage.create_employee(form).await.map_err(internal)
}

pub async fn update_employee(
    ctx: &ApiContext,
    id: &EmployeeId,
    form: &EmployeeForm,
) -> Result<Employee, ApiError> {
    info!(employee_id = %id, "updating employee");
    let Some(updated) = ctx
        .storage
        .update_employee(id, form)
        .await
        .map_err(internal)?
    else {
        warn!(employee_id = %id, "employee not found for update");
        return Err(not_found(id));
    };
    info!(employee_id = %id, name = %updated.name, "updated employee");
    Ok(updated)
}

/// Deleting an unknown id is not an error.
pub async fn delete_employee(ctx: &ApiContext, id: &EmployeeId) -> Result<(), ApiError> {
    info!(employee_id = %id, "deleting employee");
    let removed = ctx.storage.delete_employee(id).await.map_err(internal)?;
    if !removed {
        warn!(employee_id = %id, "delete requested for unknown employee");
    }
    Ok(())
}

fn not_found(id: &EmployeeId) -> ApiError {
    ApiError::not_found(format!("employee {id} not found"))
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::internal(format!("{err:#}"))
}
