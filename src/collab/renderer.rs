use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;

/// Invoice rendering collaborator: structured invoice data in, document
/// bytes out.
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    async fn render(&self, invoice: &Value) -> anyhow::Result<Vec<u8>>;
}

pub struct HttpInvoiceRenderer {
    http: reqwest::Client,
    render_url: String,
}

impl HttpInvoiceRenderer {
    pub fn new(render_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            render_url,
        }
    }
}

#[async_trait]
impl InvoiceRenderer for HttpInvoiceRenderer {
    async fn render(&self, invoice: &Value) -> anyhow::Result<Vec<u8>> {
        let bytes = self
            .http
            .post(&self.render_url)
            .json(invoice)
            .send()
            .await
            .context("invoice render request failed")?
            .error_for_status()
            .context("renderer rejected the invoice data")?
            .bytes()
            .await
            .context("failed to read rendered document")?;

        Ok(bytes.to_vec())
    }
}
