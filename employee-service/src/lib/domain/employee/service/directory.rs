use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::EmployeePage;
use crate::domain::employee::models::ListEmployeesQuery;
use crate::domain::employee::ports::DirectoryQueryServicePort;
use crate::domain::employee::ports::EmployeeRepository;

/// Read-only, paginated view of the live directory.
pub struct DirectoryQueryService<R>
where
    R: EmployeeRepository,
{
    repository: Arc<R>,
}

impl<R> DirectoryQueryService<R>
where
    R: EmployeeRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> DirectoryQueryServicePort for DirectoryQueryService<R>
where
    R: EmployeeRepository,
{
    async fn list(&self, query: ListEmployeesQuery) -> Result<EmployeePage, EmployeeError> {
        let total = self
            .repository
            .count_filtered(&query.filter)
            .await
            .map_err(|e| EmployeeError::from_repository("failed to count employees", e))?;

        let employees = self
            .repository
            .query_page(&query.filter, &query.page)
            .await
            .map_err(|e| EmployeeError::from_repository("failed to list employees", e))?;

        tracing::debug!(
            total,
            returned = employees.len(),
            page = query.page.page(),
            page_size = query.page.page_size(),
            "Directory page loaded"
        );

        Ok(EmployeePage { total, employees })
    }
}
