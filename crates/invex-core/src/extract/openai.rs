//! Extraction through an OpenAI-compatible chat completion endpoint.

use std::time::Duration;

use serde_json::{Value, json};
use tracing::{debug, info};

use super::{Document, InvoiceExtractor, Result};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{ExtractedInvoice, MAX_DESCRIPTION_LEN};

/// Pull the embedded text out of a PDF document.
pub fn document_text(document: &Document) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(&document.bytes).map_err(|e| {
        ExtractionError::Pdf {
            document: document.name.clone(),
            reason: e.to_string(),
        }
    })?;

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyDocument(document.name.clone()));
    }

    Ok(text)
}

/// Strict JSON schema of one invoice record.
pub fn invoice_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string" },
            "date": { "type": "string", "description": "Issue date, YYYY-MM-DD" },
            "description": { "type": "string" },
            "tax_rate": { "type": ["number", "null"] },
            "total_amount": { "type": "number" },
            "currency": { "type": "string", "description": "ISO 4217 code" },
            "supplier_name": { "type": "string" },
            "invoice_language": { "type": "string" },
            "variabilni_symbol": { "type": ["string", "null"] }
        },
        "required": [
            "id", "date", "description", "tax_rate", "total_amount",
            "currency", "supplier_name", "invoice_language", "variabilni_symbol"
        ],
        "additionalProperties": false
    })
}

/// Read the invoice record out of a chat completion reply body.
pub fn parse_completion(document: &str, body: &str) -> Result<ExtractedInvoice> {
    let malformed = |reason: String| ExtractionError::Malformed {
        document: document.to_string(),
        reason,
    };

    let json: Value = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;
    let message = json
        .pointer("/choices/0/message")
        .ok_or_else(|| malformed("no choices in reply".to_string()))?;

    if let Some(refusal) = message.get("refusal").and_then(Value::as_str) {
        return Err(malformed(format!("model refused: {}", refusal)));
    }

    let content = message
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("reply has no content".to_string()))?;

    serde_json::from_str(content).map_err(|e| malformed(e.to_string()))
}

/// Extractor calling a chat model once per document.
pub struct OpenAiExtractor {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    own_company: Option<String>,
}

impl OpenAiExtractor {
    pub fn new(config: &ExtractionConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("invex/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExtractionError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            own_company: config.own_company.clone(),
        })
    }

    fn instructions(&self) -> String {
        let mut prompt = format!(
            "You extract data from tax invoices.\n\
             Write dates in ISO format (YYYY-MM-DD) and currencies as 3-letter codes.\n\
             Keep the description under {} characters.\n\
             Only Czech invoices carry a variabilni symbol, which is a number; \
             leave it null for invoices in other languages.\n",
            MAX_DESCRIPTION_LEN
        );
        if let Some(company) = &self.own_company {
            prompt.push_str(&format!("{} is the customer and never the supplier.\n", company));
        }
        prompt
    }

    async fn extract_one(&self, document: &Document) -> Result<ExtractedInvoice> {
        let text = document_text(document)?;
        debug!("Extracted {} characters from {}", text.len(), document.name);

        let request = json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": self.instructions() },
                { "role": "user", "content": text }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": "invoice", "strict": true, "schema": invoice_schema() }
            }
        });

        let request_error = |e: reqwest::Error| ExtractionError::Request {
            document: document.name.clone(),
            reason: e.to_string(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(ExtractionError::Status {
                document: document.name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&document.name, &body)
    }
}

impl InvoiceExtractor for OpenAiExtractor {
    async fn extract(&self, documents: &[Document]) -> Result<Vec<ExtractedInvoice>> {
        let mut invoices = Vec::with_capacity(documents.len());
        for document in documents {
            info!("Extracting {}", document.name);
            invoices.push(self.extract_one(document).await?);
        }
        Ok(invoices)
    }
}
