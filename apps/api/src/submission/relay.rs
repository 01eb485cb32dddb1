use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::schema::application::ids;
use crate::submission::{SubmissionAdapter, SubmissionDraft, SubmissionError};

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a BTreeMap<&'static str, String>,
}

/// Sends the application as a templated email through the relay.
///
/// The relay caps payload size, so file fields are described by name and size only;
/// the images themselves are never sent.
pub struct EmailRelayAdapter {
    client: Client,
    config: RelayConfig,
}

impl EmailRelayAdapter {
    pub fn new(client: Client, config: RelayConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl SubmissionAdapter for EmailRelayAdapter {
    async fn submit(&self, draft: &SubmissionDraft) -> Result<String, SubmissionError> {
        let params = template_params(draft, &self.config.recipient_name);
        let body = RelayRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: &params,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            let reason = if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or(status.as_str())
                    .to_string()
            } else {
                text.trim().to_string()
            };
            warn!("Email relay returned {status}: {reason}");
            return Err(SubmissionError::Relay(reason));
        }

        let reference = Uuid::new_v4().to_string();
        info!(
            "Application from {} dispatched through email relay (ref {reference})",
            draft.text(ids::EMAIL)
        );
        Ok(reference)
    }

    fn backend(&self) -> &'static str {
        "email"
    }
}

/// Flat template parameters for the relay's message template.
pub fn template_params(
    draft: &SubmissionDraft,
    recipient_name: &str,
) -> BTreeMap<&'static str, String> {
    let file_info = |field: &str| {
        draft
            .file(field)
            .map(|f| f.describe())
            .unwrap_or_else(|| "Not provided".to_string())
    };

    let address = format!(
        "{}, {}, {} {}",
        draft.text(ids::ADDRESS),
        draft.text(ids::CITY),
        draft.text(ids::STATE),
        draft.text(ids::ZIP)
    );
    let linkedin = draft
        .optional_text(ids::RESUME)
        .unwrap_or("Not provided")
        .to_string();
    let additional_info = draft
        .optional_text(ids::ADDITIONAL_INFO)
        .unwrap_or("None")
        .to_string();
    let dl_front = file_info(ids::DL_FRONT);
    let dl_back = file_info(ids::DL_BACK);

    let message = format!(
        "Position Applied For: {position}\n\
         Experience: {experience}\n\
         Availability: {availability}\n\
         \n\
         Contact Information:\n\
         Phone: {phone}\n\
         Age: {age}\n\
         Address: {street}\n\
         City: {city}\n\
         State: {state}\n\
         Zip: {zip}\n\
         \n\
         Identity Documents:\n\
         Driver's License - Front: {dl_front}\n\
         Driver's License - Back: {dl_back}\n\
         \n\
         Additional Information:\n\
         LinkedIn/Portfolio: {linkedin}\n\
         Notes: {additional_info}\n",
        position = draft.text(ids::POSITION),
        experience = draft.text(ids::EXPERIENCE),
        availability = draft.text(ids::AVAILABILITY),
        phone = draft.text(ids::PHONE),
        age = draft.text(ids::AGE),
        street = draft.text(ids::ADDRESS),
        city = draft.text(ids::CITY),
        state = draft.text(ids::STATE),
        zip = draft.text(ids::ZIP),
    );

    BTreeMap::from([
        ("from_name", draft.text(ids::NAME).to_string()),
        ("from_email", draft.text(ids::EMAIL).to_string()),
        ("phone_number", draft.text(ids::PHONE).to_string()),
        ("age", draft.text(ids::AGE).to_string()),
        ("ssn", draft.text(ids::SSN).to_string()),
        ("address", address),
        ("position_type", draft.text(ids::POSITION).to_string()),
        ("experience", draft.text(ids::EXPERIENCE).to_string()),
        ("availability", draft.text(ids::AVAILABILITY).to_string()),
        ("linkedin", linkedin),
        ("additional_info", additional_info),
        ("dl_front", dl_front),
        ("dl_back", dl_back),
        ("to_name", recipient_name.to_string()),
        ("message", message),
    ])
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};

    use super::*;
    use crate::testing::draft_with_files;

    fn relay_config(endpoint: String) -> RelayConfig {
        RelayConfig {
            endpoint,
            service_id: "service_test".to_string(),
            template_id: "template_test".to_string(),
            public_key: "public_test".to_string(),
            recipient_name: "AKG Consulting".to_string(),
        }
    }

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/send")
    }

    #[test]
    fn test_template_params_describe_files_not_contents() {
        let params = template_params(&draft_with_files(&[ids::DL_FRONT]), "AKG Consulting");
        assert_eq!(params["dl_front"], "front.jpg (1.5 KB)");
        assert_eq!(params["dl_back"], "Not provided");
        assert!(params["message"].contains("Driver's License - Front: front.jpg (1.5 KB)"));
    }

    #[test]
    fn test_template_params_fallbacks_and_address() {
        let params = template_params(&draft_with_files(&[]), "AKG Consulting");
        assert_eq!(params["from_name"], "Jane Doe");
        assert_eq!(params["address"], "12 Main Street, Columbus, Ohio 43004");
        assert_eq!(params["linkedin"], "Not provided");
        assert_eq!(params["additional_info"], "None");
        assert_eq!(params["to_name"], "AKG Consulting");
        assert!(params["message"].starts_with("Position Applied For: Logistics\n"));
    }

    #[tokio::test]
    async fn test_submit_succeeds_on_explicit_ok() {
        let router = Router::new().route(
            "/send",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["service_id"], "service_test");
                assert_eq!(body["user_id"], "public_test");
                assert_eq!(body["template_params"]["from_email"], "jane@example.com");
                "OK"
            }),
        );
        let adapter = EmailRelayAdapter::new(Client::new(), relay_config(serve(router).await));

        let reference = adapter.submit(&draft_with_files(&[])).await.unwrap();
        assert!(Uuid::parse_str(&reference).is_ok());
    }

    #[tokio::test]
    async fn test_submit_surfaces_relay_status_text() {
        let router = Router::new().route(
            "/send",
            post(|| async { (AxumStatus::BAD_REQUEST, "The template ID is invalid") }),
        );
        let adapter = EmailRelayAdapter::new(Client::new(), relay_config(serve(router).await));

        let err = adapter.submit(&draft_with_files(&[])).await.unwrap_err();
        assert!(matches!(&err, SubmissionError::Relay(m) if m == "The template ID is invalid"));
    }

    #[tokio::test]
    async fn test_non_ok_success_status_is_not_success() {
        let router = Router::new().route("/send", post(|| async { AxumStatus::ACCEPTED }));
        let adapter = EmailRelayAdapter::new(Client::new(), relay_config(serve(router).await));

        let err = adapter.submit(&draft_with_files(&[])).await.unwrap_err();
        assert_eq!(err.to_string(), "Accepted");
    }
}
