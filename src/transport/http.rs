use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::error::FormError;
use crate::transport::transport_model::{FormRequest, SubmitOutcome, Transport};

/// Posts forms over HTTP with a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self, FormError> {
        let mut builder = reqwest::blocking::Client::builder().timeout(timeout);
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_string());
        }
        let client = builder.build().map_err(FormError::HttpClient)?;
        Ok(HttpTransport { client })
    }

    /// Use a preconfigured client (proxy, TLS, redirect settings).
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        HttpTransport { client }
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, request: &FormRequest) -> SubmitOutcome {
        let response = match self
            .client
            .post(&request.url)
            .header(CONTENT_TYPE, request.content_type)
            .header("X-Requested-With", "XMLHttpRequest")
            .body(request.body.clone())
            .send()
        {
            Ok(r) => r,
            Err(e) => return SubmitOutcome::network(e),
        };

        let status = response.status().as_u16();
        match response.text() {
            Ok(body) => SubmitOutcome::from_status(status, body),
            Err(e) => SubmitOutcome::network(format!("Failed to read response body: {}", e)),
        }
    }
}
