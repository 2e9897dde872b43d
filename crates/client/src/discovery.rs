use conformance_core::{DiscoveryProblem, DiscoveryValidation};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::{expect_status, ApiClient, ClientError};

pub const VALIDATE_PATH: &str = "/api/discovery-model/validate";

impl ApiClient {
    /// Submits a discovery model for validation.
    ///
    /// 200 means valid. 400 carries the problems in the body's `error` field;
    /// a 400 without that field is reported as valid. Any other status is an
    /// [`ClientError::UnexpectedStatus`].
    pub async fn validate_discovery_config<T: Serialize + ?Sized>(
        &self,
        model: &T,
    ) -> Result<DiscoveryValidation, ClientError> {
        let resp = self
            .http
            .post(self.url(VALIDATE_PATH))
            .json(model)
            .send()
            .await?;
        let resp = expect_status(
            "validate discovery model",
            resp,
            &[StatusCode::OK, StatusCode::BAD_REQUEST],
        )?;

        if resp.status() == StatusCode::BAD_REQUEST {
            let body = resp.bytes().await?;
            let json: Value = serde_json::from_slice(&body)?;
            match json.get("error") {
                Some(problems) if !problems.is_null() => {
                    let problems: Vec<DiscoveryProblem> =
                        serde_json::from_value(problems.clone())?;
                    return Ok(DiscoveryValidation::invalid(problems));
                }
                _ => warn!("400 response without `error` field; treating model as valid"),
            }
        }
        Ok(DiscoveryValidation::valid())
    }
}
