use std::time::Duration;

use habita_shared::{
    Error,
    api::{ApplyRequest, ApplyResponse, AssignmentPatch, CreatedTask, NewTask, PreviewRequest},
    plan::{Plan, PlanPreview},
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::PlanApi;

const USER_AGENT: &str = concat!("habita/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct HttpOptions {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

/// [`PlanApi`] over the backend's JSON endpoints.
#[derive(Clone)]
pub struct HttpPlanApi {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpPlanApi {
    pub fn new(options: HttpOptions) -> habita_shared::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let base_url = Url::parse(&options.base_url).map_err(|e| {
            Error::User(format!("invalid api base url {}: {e}", options.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            habita_shared::user!("invalid api base url {}", options.base_url);
        }

        Ok(Self {
            client,
            base_url,
            token: options.token.filter(|t| !t.is_empty()),
        })
    }

    /// Joins path segments onto the base url, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();

        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!(%method, %url, "plan api request");

        let builder = self.client.request(method, url);

        match self.token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> habita_shared::Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response).await;
        tracing::debug!(status = status.as_u16(), %message, "plan api error");

        Err(Error::Remote {
            status: status.as_u16(),
            message,
        })
    }

    /// A body that arrives but does not decode is reported as
    /// [`Error::Unknown`], not as a network failure.
    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> habita_shared::Result<T> {
        let body = self
            .send(builder)
            .await?
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(error = %e, "plan api response did not decode");
            Error::from(e)
        })
    }
}

/// Pulls `error` or `message` out of a JSON error body, falling back to the
/// raw text.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let from_json = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|field| value.get(*field)?.as_str().map(str::to_owned))
        });

    match from_json {
        Some(message) => message,
        None if !text.trim().is_empty() => text.trim().to_owned(),
        None => status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_owned(),
    }
}

#[async_trait::async_trait]
impl PlanApi for HttpPlanApi {
    async fn preview(&self, request: &PreviewRequest) -> habita_shared::Result<PlanPreview> {
        let builder = self.request(Method::POST, &["api", "ai", "preview-plan"]).json(request);

        match self.json(builder).await {
            Err(Error::Remote { status: 503, .. }) => Err(Error::ServiceUnavailable),
            Err(Error::Remote {
                status: 400,
                message,
            }) => Err(Error::NoEligibleTasks(message)),
            other => other,
        }
    }

    async fn apply(&self, request: &ApplyRequest) -> habita_shared::Result<ApplyResponse> {
        let builder = self.request(Method::POST, &["api", "ai", "apply-plan"]).json(request);

        self.json(builder).await
    }

    async fn discard(&self, plan_id: &str) -> habita_shared::Result<()> {
        let builder = self.request(Method::DELETE, &["api", "plans", plan_id]);
        self.send(builder).await?;

        Ok(())
    }

    async fn patch_assignments(
        &self,
        plan_id: &str,
        patch: &AssignmentPatch,
    ) -> habita_shared::Result<()> {
        let builder = self
            .request(Method::PATCH, &["api", "plans", plan_id, "assignments"])
            .json(patch);
        self.send(builder).await?;

        Ok(())
    }

    async fn fetch_plan(&self, plan_id: &str) -> habita_shared::Result<Plan> {
        let builder = self.request(Method::GET, &["api", "plans", plan_id]);

        self.json(builder).await
    }

    async fn create_task(&self, task: &NewTask) -> habita_shared::Result<CreatedTask> {
        let builder = self.request(Method::POST, &["api", "tasks"]).json(task);

        self.json(builder).await
    }
}
