//! Sink REST client implementing the `TaskSink` port.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::errors::SyncError;
use crate::domain::models::{NewProject, NewTask, SinkConfig, SinkProject, SinkTask, TaskStatus};
use crate::domain::ports::{SinkError, TaskSink};
use crate::infrastructure::sink::wire::{
    encode_status, CreateProjectBody, CreateTaskBody, PatchStatusBody, ProjectList, TaskList,
    WireProject,
};

/// HTTP adapter for the sink task service.
pub struct SinkClient {
    http: Client,
    base_url: String,
    token: String,
}

impl SinkClient {
    pub fn new(config: &SinkConfig) -> Result<Self, SyncError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::Configuration(format!("failed to build sink client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// One request/response, no retry. Non-2xx surfaces as a typed error
    /// carrying method, endpoint, and status; a 404 on a GET becomes
    /// `SinkError::NotFound` for callers probing optional data.
    async fn send(
        &self,
        method: Method,
        method_name: &'static str,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, SinkError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.request(method.clone(), &url).bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| SinkError::Transport {
            method: method_name,
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        debug!(method = method_name, endpoint, status = status.as_u16(), "sink API call");

        if status == StatusCode::NOT_FOUND && method == Method::GET {
            return Err(SinkError::NotFound {
                method: method_name,
                endpoint: endpoint.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(method = method_name, endpoint, %body, "sink error response body");
            return Err(SinkError::Api {
                method: method_name,
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, SinkError> {
        let response = self.send(Method::GET, "GET", endpoint, None).await?;
        let body = response.text().await.map_err(|e| SinkError::Transport {
            method: "GET",
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| SinkError::Decode {
            method: "GET",
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    fn to_body<T: serde::Serialize>(
        payload: &T,
        method: &'static str,
        endpoint: &str,
    ) -> Result<serde_json::Value, SinkError> {
        serde_json::to_value(payload).map_err(|e| SinkError::Decode {
            method,
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TaskSink for SinkClient {
    async fn list_projects(&self) -> Result<Vec<SinkProject>, SinkError> {
        let list: ProjectList = self.get_json("/projects?status=all").await?;
        Ok(list.into_projects())
    }

    async fn list_tasks(&self) -> Result<Vec<SinkTask>, SinkError> {
        let list: TaskList = self.get_json("/tasks?type=all").await?;
        Ok(list.into_tasks())
    }

    async fn create_project(&self, project: &NewProject) -> Result<SinkProject, SinkError> {
        let endpoint = "/project";
        let body = Self::to_body(&CreateProjectBody::from(project), "POST", endpoint)?;
        let response = self.send(Method::POST, "POST", endpoint, Some(body)).await?;
        let text = response.text().await.map_err(|e| SinkError::Transport {
            method: "POST",
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
        let created: WireProject = serde_json::from_str(&text).map_err(|e| SinkError::Decode {
            method: "POST",
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
        Ok(created.into_project())
    }

    async fn create_task(&self, task: &NewTask) -> Result<(), SinkError> {
        let endpoint = "/task";
        let body = Self::to_body(&CreateTaskBody::from(task), "POST", endpoint)?;
        self.send(Method::POST, "POST", endpoint, Some(body)).await?;
        Ok(())
    }

    async fn update_task_status(
        &self,
        task_id: i64,
        status: TaskStatus,
    ) -> Result<(), SinkError> {
        let endpoint = format!("/task/{task_id}");
        let body = Self::to_body(
            &PatchStatusBody {
                status: encode_status(status),
            },
            "PATCH",
            &endpoint,
        )?;
        self.send(Method::PATCH, "PATCH", &endpoint, Some(body)).await?;
        Ok(())
    }
}
