use anyhow::{anyhow, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

use super::types::{ParameterValue, ReportMetadata, RunOptions};
use super::DEFAULT_PORTAL_URL;
use crate::settings::ReportingSettings;

#[derive(Deserialize, Debug)]
struct ServiceEnvelope<T> {
    response: T,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RunTokenRequest<'a> {
    portal_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RunTokenResponse {
    run_token: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TemplateRef<'a> {
    item_id: &'a str,
    portal_url: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RunJobRequest<'a> {
    template: TemplateRef<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<&'a BTreeMap<String, ParameterValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result_file_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    culture: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dpi: Option<&'a Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
struct RunJobResponse {
    ticket: String,
}

#[derive(Deserialize, Debug)]
struct JobResult {
    status: String,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the VertiGIS Studio Reporting service.
pub struct ReportingClient {
    client: Client,
    service_url: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl ReportingClient {
    pub fn new(settings: &ReportingSettings) -> Result<Self> {
        if settings.max_polls == 0 {
            return Err(anyhow!("reporting.max_polls must be at least 1"));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::USER_AGENT, settings.user_agent.parse()?);
        headers.insert(reqwest::header::ACCEPT, "application/json".parse()?);

        Ok(Self {
            client: Client::builder().default_headers(headers).build()?,
            service_url: settings.service_url.clone(),
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            max_polls: settings.max_polls,
        })
    }

    /// Exchanges an ArcGIS token (or none, for public content) for a run token.
    pub async fn get_run_token(
        &self,
        service_url: &str,
        portal_url: &str,
        token: Option<&str>,
    ) -> Result<String> {
        let url = endpoint(service_url, "service/auth/token/run");
        tracing::debug!(%url, portal_url, "Requesting report run token");

        let req = self.client.post(&url).json(&RunTokenRequest {
            portal_url,
            access_token: token,
        });
        let body: RunTokenResponse = send(req, "run token").await?;
        Ok(body.run_token)
    }

    pub async fn get_metadata(
        &self,
        item_id: &str,
        portal_url: &str,
        service_url: &str,
        run_token: Option<&str>,
    ) -> Result<ReportMetadata> {
        let url = endpoint(service_url, "service/job/metadata");
        tracing::debug!(%url, item_id, portal_url, "Fetching report metadata");

        let req = with_run_token(
            self.client
                .get(&url)
                .query(&[("itemId", item_id), ("portalUrl", portal_url)]),
            run_token,
        );
        send(req, "report metadata").await
    }

    /// Submits a report job and waits for it, returning the artifact URL.
    pub async fn run(&self, item_id: &str, options: &RunOptions) -> Result<String> {
        let portal_url = options.portal_url.as_deref().unwrap_or(DEFAULT_PORTAL_URL);

        let run_token = match options.token.as_deref() {
            Some(token) => Some(
                self.get_run_token(&self.service_url, portal_url, Some(token))
                    .await?,
            ),
            None => None,
        };

        let url = endpoint(&self.service_url, "service/job/run");
        tracing::info!(%url, item_id, portal_url, "Submitting report job");

        let req = with_run_token(
            self.client.post(&url).json(&RunJobRequest {
                template: TemplateRef {
                    item_id,
                    portal_url,
                },
                parameters: options.parameters.as_ref(),
                result_file_name: options.result_file_name.as_deref(),
                culture: options.culture.as_deref(),
                dpi: options.dpi.as_ref(),
                format: options.format.as_deref(),
            }),
            run_token.as_deref(),
        );
        let job: RunJobResponse = send(req, "run report").await?;

        let tag = self.wait_for_job(&job.ticket, run_token.as_deref()).await?;
        artifact_url(&self.service_url, &job.ticket, &tag)
    }

    async fn wait_for_job(&self, ticket: &str, run_token: Option<&str>) -> Result<String> {
        let url = endpoint(&self.service_url, "service/job/result");

        for attempt in 1..=self.max_polls {
            let req = with_run_token(self.client.get(&url).query(&[("ticket", ticket)]), run_token);
            let result: JobResult = send(req, "report job status").await?;

            match result.status.as_str() {
                "complete" => {
                    return result
                        .tag
                        .ok_or_else(|| anyhow!("Report job {} completed without a result tag", ticket));
                }
                "failed" => {
                    return Err(anyhow!(
                        "Report job {} failed: {}",
                        ticket,
                        result.message.unwrap_or_else(|| "unknown error".to_string())
                    ));
                }
                status => {
                    tracing::debug!(ticket, attempt, status, "Report job still running");
                    if attempt < self.max_polls {
                        tokio::time::sleep(self.poll_interval).await;
                    }
                }
            }
        }

        Err(anyhow!(
            "Report job {} did not complete after {} status checks",
            ticket,
            self.max_polls
        ))
    }
}

fn endpoint(service_url: &str, path: &str) -> String {
    format!("{}/{}", service_url.trim_end_matches('/'), path)
}

fn artifact_url(service_url: &str, ticket: &str, tag: &str) -> Result<String> {
    let url = Url::parse_with_params(
        &endpoint(service_url, "service/job/artifacts"),
        &[("ticket", ticket), ("tag", tag)],
    )?;
    Ok(url.to_string())
}

fn with_run_token(req: RequestBuilder, run_token: Option<&str>) -> RequestBuilder {
    match run_token {
        Some(token) => req.bearer_auth(token),
        None => req,
    }
}

async fn send<T: DeserializeOwned>(req: RequestBuilder, context: &str) -> Result<T> {
    let response = req.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!(
            "Reporting service returned {} ({}): {}",
            status,
            context,
            body
        ));
    }

    let envelope: ServiceEnvelope<T> = response.json().await?;
    Ok(envelope.response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ReportingClient {
        ReportingClient::new(&ReportingSettings {
            service_url: format!("{}/reporting/", server.uri()),
            poll_interval_ms: 1,
            max_polls: 3,
            user_agent: "ReportingWorker/test".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn endpoint_does_not_double_slashes() {
        assert_eq!(
            endpoint("https://apps.vertigisstudio.com/reporting/", "service/job/run"),
            "https://apps.vertigisstudio.com/reporting/service/job/run"
        );
        assert_eq!(
            endpoint("https://apps.vertigisstudio.com/reporting", "service/job/run"),
            "https://apps.vertigisstudio.com/reporting/service/job/run"
        );
    }

    #[test]
    fn artifact_url_escapes_query_values() {
        let url = artifact_url("https://host/reporting", "t 1", "a&b").unwrap();
        assert_eq!(
            url,
            "https://host/reporting/service/job/artifacts?ticket=t+1&tag=a%26b"
        );
    }

    #[tokio::test]
    async fn get_run_token_posts_portal_and_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reporting/service/auth/token/run"))
            .and(body_json(json!({
                "portalUrl": "https://www.arcgis.com",
                "accessToken": "abc"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": { "runToken": "xyz-run-token" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = client
            .get_run_token(
                &format!("{}/reporting", server.uri()),
                "https://www.arcgis.com",
                Some("abc"),
            )
            .await
            .unwrap();

        assert_eq!(token, "xyz-run-token");
    }

    #[tokio::test]
    async fn get_metadata_sends_run_token_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reporting/service/job/metadata"))
            .and(query_param("itemId", "abc123"))
            .and(query_param("portalUrl", "https://portal.example.com"))
            .and(header("authorization", "Bearer run-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {
                    "controls": [
                        { "controlType": "Table", "purpose": "detail", "height": 10, "width": 20 }
                    ],
                    "parameters": [{ "name": "city", "value": "Seattle" }]
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let metadata = client
            .get_metadata(
                "abc123",
                "https://portal.example.com",
                &format!("{}/reporting/", server.uri()),
                Some("run-1"),
            )
            .await
            .unwrap();

        assert_eq!(metadata.controls.len(), 1);
        assert_eq!(metadata.parameters[0].name, "city");
    }

    #[tokio::test]
    async fn non_success_status_surfaces_service_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reporting/service/job/metadata"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Item not found"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .get_metadata(
                "missing",
                "https://www.arcgis.com",
                &format!("{}/reporting", server.uri()),
                None,
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Item not found"));
    }

    #[tokio::test]
    async fn run_exchanges_token_submits_job_and_polls_until_complete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reporting/service/auth/token/run"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": { "runToken": "run-1" } })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/reporting/service/job/run"))
            .and(header("authorization", "Bearer run-1"))
            .and(body_json(json!({
                "template": { "itemId": "abc123", "portalUrl": "https://www.arcgis.com" },
                "parameters": { "city": "Seattle", "copies": 2 },
                "dpi": 96,
                "format": "png"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "response": { "ticket": "t-1" } })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/reporting/service/job/result"))
            .and(query_param("ticket", "t-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": { "status": "running" } })),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/reporting/service/job/result"))
            .and(query_param("ticket", "t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "response": { "status": "complete", "tag": "result.png" } }),
            ))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut parameters = BTreeMap::new();
        parameters.insert("city".to_string(), ParameterValue::from("Seattle"));
        parameters.insert("copies".to_string(), ParameterValue::from(2));
        let url = client
            .run(
                "abc123",
                &RunOptions {
                    token: Some("arcgis-token".to_string()),
                    parameters: Some(parameters),
                    dpi: Some(96.into()),
                    format: Some("png".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            url,
            format!(
                "{}/reporting/service/job/artifacts?ticket=t-1&tag=result.png",
                server.uri()
            )
        );
    }

    #[tokio::test]
    async fn run_reports_failed_jobs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reporting/service/job/run"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "response": { "ticket": "t-2" } })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/reporting/service/job/result"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "response": { "status": "failed", "message": "Template error" } }),
            ))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.run("abc123", &RunOptions::default()).await.unwrap_err();

        assert!(err.to_string().contains("Template error"));
    }

    #[tokio::test]
    async fn run_gives_up_after_max_polls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reporting/service/job/run"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "response": { "ticket": "t-3" } })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/reporting/service/job/result"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": { "status": "running" } })),
            )
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.run("abc123", &RunOptions::default()).await.unwrap_err();

        assert!(err.to_string().contains("did not complete after 3"));
    }

    #[tokio::test]
    async fn gives_up_without_sleeping_after_the_last_poll() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/reporting/service/job/run"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "response": { "ticket": "t-4" } })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/reporting/service/job/result"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": { "status": "running" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ReportingClient::new(&ReportingSettings {
            service_url: format!("{}/reporting", server.uri()),
            poll_interval_ms: 60_000,
            max_polls: 1,
            user_agent: "ReportingWorker/test".to_string(),
        })
        .unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(10),
            client.run("abc123", &RunOptions::default()),
        )
        .await
        .expect("client slept after its final status check");

        assert!(result.unwrap_err().to_string().contains("did not complete after 1"));
    }

    #[test]
    fn zero_max_polls_is_rejected() {
        let err = ReportingClient::new(&ReportingSettings {
            service_url: "https://host/reporting".to_string(),
            poll_interval_ms: 1,
            max_polls: 0,
            user_agent: "ReportingWorker/test".to_string(),
        })
        .err()
        .unwrap();

        assert!(err.to_string().contains("max_polls"));
    }

    #[tokio::test]
    async fn connection_errors_propagate() {
        let client = ReportingClient::new(&ReportingSettings {
            service_url: "http://127.0.0.1:1/reporting".to_string(),
            poll_interval_ms: 1,
            max_polls: 1,
            user_agent: "ReportingWorker/test".to_string(),
        })
        .unwrap();

        assert!(client
            .get_run_token("http://127.0.0.1:1/reporting", DEFAULT_PORTAL_URL, None)
            .await
            .is_err());
        assert!(client.run("abc123", &RunOptions::default()).await.is_err());
    }
}
