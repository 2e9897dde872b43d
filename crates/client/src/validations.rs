use reqwest::{Response, StatusCode, Url};
use serde::Serialize;
use tracing::info;

use crate::{expect_status, ApiClient, ClientError};

pub const RUNS_PATH: &str = "/api/validation-runs";

impl ApiClient {
    /// Starts a validation run. Only 202 Accepted is success; the body
    /// carries the run id.
    pub async fn start<T: Serialize + ?Sized>(
        &self,
        validation: &T,
    ) -> Result<Response, ClientError> {
        let resp = self
            .http
            .post(self.url(RUNS_PATH))
            .json(validation)
            .send()
            .await?;
        let resp = expect_status("start validation run", resp, &[StatusCode::ACCEPTED])?;
        info!("validation run accepted");
        Ok(resp)
    }

    /// Fetches the current status of run `id`. Only 200 OK is success.
    pub async fn track(&self, id: &str) -> Result<Response, ClientError> {
        let resp = self.http.get(self.run_url(id)?).send().await?;
        expect_status("track validation run", resp, &[StatusCode::OK])
    }

    /// `{base}/api/validation-runs/{id}` with `id` percent-encoded as one segment.
    fn run_url(&self, id: &str) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.url(RUNS_PATH)).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.push(id);
        Ok(url)
    }
}
