use serde::Deserialize;

use crate::error::AppError;
use crate::models::Submission;

/// Upper bound on submissions fetched per list request.
pub const SUBMISSIONS_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct FormSummary {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Client for the hosted forms API. One request per call, no retries.
pub struct FormsClient {
    client: reqwest::Client,
    api_base: String,
    site_id: String,
    token: String,
}

impl FormsClient {
    pub fn new(api_base: &str, site_id: &str, token: &str) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| format!("Failed to build forms API client: {e}"))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            site_id: site_id.to_string(),
            token: token.to_string(),
        })
    }

    /// Resolve a form's id by exact name. First match wins.
    pub async fn find_form_id(&self, form_name: &str) -> Result<Option<String>, AppError> {
        let forms: Vec<FormSummary> = self
            .get_json(&format!("/sites/{}/forms", self.site_id))
            .await?;

        Ok(forms
            .into_iter()
            .find(|f| f.name.as_deref() == Some(form_name))
            .and_then(|f| f.id))
    }

    pub async fn list_submissions(&self, form_id: &str) -> Result<Vec<Submission>, AppError> {
        let mut submissions: Vec<Submission> = self
            .get_json(&format!(
                "/forms/{form_id}/submissions?per_page={SUBMISSIONS_PAGE_SIZE}"
            ))
            .await?;
        submissions.truncate(SUBMISSIONS_PAGE_SIZE);
        Ok(submissions)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let resp = self
            .client
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        serde_json::from_slice::<T>(&body).map_err(|e| {
            tracing::warn!("Unexpected forms API payload from {path}: {e}");
            AppError::Upstream {
                status: 502,
                body: "unexpected response body".to_string(),
            }
        })
    }
}
