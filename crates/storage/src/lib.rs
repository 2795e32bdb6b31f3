use anyhow::{Context, Result};
use shared::domain::{Employee, EmployeeForm, EmployeeId};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        // Every pooled connection to `:memory:` would open its own empty database.
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            5
        };
        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run employee migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Inserts a new employee under a freshly generated id.
    pub async fn create_employee(&self, form: &EmployeeForm) -> Result<Employee> {
        let id = EmployeeId(Uuid::new_v4().to_string());
        sqlx::query("INSERT INTO employees (id, name, email, departments) VALUES (?, ?, ?, ?)")
            .bind(id.as_str())
            .bind(&form.name)
            .bind(&form.email)
            .bind(&form.departments)
            .execute(&self.pool)
            .await
            .context("failed to insert employee")?;
        debug!(employee_id = %id, "stored employee");
        Ok(form.clone().into_employee(id))
    }

    /// All employees in insertion order.
    pub async fn list_employees(&self) -> Result<Vec<Employee>> {
        let rows = sqlx::query("SELECT id, name, email, departments FROM employees ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .context("failed to list employees")?;
        rows.iter().map(employee_from_row).collect()
    }

    pub async fn employee(&self, id: &EmployeeId) -> Result<Option<Employee>> {
        let row = sqlx::query("SELECT id, name, email, departments FROM employees WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load employee {id}"))?;
        row.as_ref().map(employee_from_row).transpose()
    }

    /// Overwrites the editable fields of an existing employee. Returns `None`
    /// when no employee has the given id.
    pub async fn update_employee(
        &self,
        id: &EmployeeId,
        form: &EmployeeForm,
    ) -> Result<Option<Employee>> {
        let result =
            sqlx::query("UPDATE employees SET name = ?, email = ?, departments = ? WHERE id = ?")
                .bind(&form.name)
                .bind(&form.email)
                .bind(&form.departments)
                .bind(id.as_str())
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed to update employee {id}"))?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(form.clone().into_employee(id.clone())))
    }

    /// Removes an employee. Returns whether a row was actually deleted.
    pub async fn delete_employee(&self, id: &EmployeeId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete employee {id}"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn employee_from_row(row: &SqliteRow) -> Result<Employee> {
    Ok(Employee {
        id: EmployeeId(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        departments: row.try_get("departments")?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.contains(":memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
