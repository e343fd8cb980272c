use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auth::Claims;
use auth::JwtIssuer;
use auth::PasswordHasher;
use chrono::Utc;
use employee_service::domain::employee::errors::RepositoryError;
use employee_service::domain::employee::errors::UniqueField;
use employee_service::domain::employee::models::DirectoryFilter;
use employee_service::domain::employee::models::EmailAddress;
use employee_service::domain::employee::models::Employee;
use employee_service::domain::employee::models::EmployeeId;
use employee_service::domain::employee::models::EmployeeNo;
use employee_service::domain::employee::models::Mobile;
use employee_service::domain::employee::models::NewEmployee;
use employee_service::domain::employee::models::PageRequest;
use employee_service::domain::employee::ports::EmployeeRepository;
use employee_service::domain::employee::service::AuthenticationService;
use employee_service::domain::employee::service::DirectoryQueryService;
use employee_service::domain::employee::service::RegistrationService;
use employee_service::inbound::http::router::create_router;
use employee_service::inbound::http::router::AppState;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const JWT_ISSUER: &str = "employee-system";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryEmployeeRepository>,
    pub api_client: reqwest::Client,
    pub token_issuer: JwtIssuer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryEmployeeRepository::default());
        let hasher = Arc::new(PasswordHasher::new());
        let token_issuer = Arc::new(
            JwtIssuer::new(JWT_SECRET, JWT_ISSUER, chrono::Duration::hours(24))
                .expect("Failed to create token issuer"),
        );

        let state = AppState {
            registration_service: Arc::new(RegistrationService::new(
                Arc::clone(&store),
                Arc::clone(&hasher),
            )),
            authentication_service: Arc::new(AuthenticationService::new(
                Arc::clone(&store),
                hasher,
                token_issuer,
            )),
            directory_service: Arc::new(DirectoryQueryService::new(Arc::clone(&store))),
        };

        let router = create_router(state, Duration::from_secs(30));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            store,
            api_client: reqwest::Client::new(),
            token_issuer: JwtIssuer::new(JWT_SECRET, JWT_ISSUER, chrono::Duration::hours(24))
                .expect("Failed to create token issuer"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Register an employee, overriding fields of a valid default body.
    pub async fn register(&self, overrides: Value) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&registration_body(overrides))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, login_id: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "login_id": login_id, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list(&self, query: &str) -> reqwest::Response {
        self.get(&format!("/api/employees{}", query))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub fn verify_token(&self, token: &str) -> Claims {
        self.token_issuer
            .verify(token)
            .expect("Token should verify")
    }
}

/// A valid registration body for E001/Alice with `overrides` merged in.
pub fn registration_body(overrides: Value) -> Value {
    let mut body = json!({
        "employee_no": "E001",
        "name": "Alice",
        "password": "pw123",
        "mobile": "13800000000",
        "department": "Eng",
        "position": "SWE",
        "salary": 10000
    });
    if let (Some(base), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
        for (key, value) in extra {
            if value.is_null() {
                base.remove(key);
            } else {
                base.insert(key.clone(), value.clone());
            }
        }
    }
    body
}

/// Directory store kept in process memory.
///
/// Mirrors the Postgres adapter: uniqueness only among live rows, reads skip
/// soft-deleted rows, pages are newest first.
#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    rows: Mutex<Vec<Employee>>,
}

impl InMemoryEmployeeRepository {
    /// Mark a row deleted the way an out-of-band process would.
    pub fn soft_delete(&self, employee_no: &str) {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut() {
            if row.employee_no.as_str() == employee_no && row.deleted_at.is_none() {
                row.deleted_at = Some(Utc::now());
            }
        }
    }

    fn live(&self) -> Vec<Employee> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.deleted_at.is_none())
            .cloned()
            .collect()
    }

    fn find(&self, predicate: impl Fn(&Employee) -> bool) -> Option<Employee> {
        self.live().into_iter().find(|e| predicate(e))
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_by_employee_no(
        &self,
        employee_no: &EmployeeNo,
    ) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.find(|e| &e.employee_no == employee_no))
    }

    async fn find_by_mobile(&self, mobile: &Mobile) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.find(|e| &e.mobile == mobile))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.find(|e| e.email.as_ref() == Some(email)))
    }

    async fn find_by_login_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Employee>, RepositoryError> {
        let rank = |e: &Employee| {
            if e.employee_no.as_str() == identifier {
                Some(0)
            } else if e.mobile.as_str() == identifier {
                Some(1)
            } else if e.email.as_ref().map(|m| m.as_str()) == Some(identifier) {
                Some(2)
            } else {
                None
            }
        };

        Ok(self
            .live()
            .into_iter()
            .filter_map(|e| rank(&e).map(|r| (r, e.id, e)))
            .min_by_key(|(r, id, _)| (*r, *id))
            .map(|(_, _, e)| e))
    }

    async fn insert(&self, employee: NewEmployee) -> Result<Employee, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter().filter(|e| e.deleted_at.is_none()) {
            if row.employee_no == employee.employee_no {
                return Err(RepositoryError::DuplicateKey(UniqueField::EmployeeNo));
            }
            if row.mobile == employee.mobile {
                return Err(RepositoryError::DuplicateKey(UniqueField::Mobile));
            }
            if employee.email.is_some() && row.email == employee.email {
                return Err(RepositoryError::DuplicateKey(UniqueField::Email));
            }
        }

        let now = Utc::now();
        let stored = Employee {
            id: EmployeeId(rows.len() as i64 + 1),
            employee_no: employee.employee_no,
            name: employee.name,
            password_hash: employee.password_hash,
            gender: employee.gender,
            age: employee.age,
            email: employee.email,
            mobile: employee.mobile,
            department: employee.department,
            position: employee.position,
            rank: employee.rank,
            work_status: employee.work_status,
            salary: employee.salary,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn count_filtered(&self, filter: &DirectoryFilter) -> Result<i64, RepositoryError> {
        Ok(self.live().iter().filter(|e| filter.matches(e)).count() as i64)
    }

    async fn query_page(
        &self,
        filter: &DirectoryFilter,
        page: &PageRequest,
    ) -> Result<Vec<Employee>, RepositoryError> {
        let mut matching: Vec<Employee> = self
            .live()
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}
