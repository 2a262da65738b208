use crate::{
    audit,
    collab::MailAttachment,
    dto::invoices::SendInvoiceRequest,
    error::{AppError, AppResult},
    response::Message,
    state::AppState,
};

/// Renders the invoice document and mails it to the recipient as a PDF
/// attachment.
pub async fn send_invoice(state: &AppState, payload: SendInvoiceRequest) -> AppResult<Message> {
    let pdf = match state.renderer.render(&payload.invoice_data).await {
        Ok(pdf) => pdf,
        Err(err) => {
            tracing::error!(error = %err, "invoice rendering failed");
            return Err(AppError::Collaborator("Error generating invoice".to_string()));
        }
    };

    let attachment = MailAttachment {
        filename: "invoice.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: pdf,
    };

    if let Err(err) = state
        .mailer
        .send(
            &payload.email,
            "Your Invoice",
            "Please find your invoice attached.",
            Some(attachment),
        )
        .await
    {
        tracing::error!(error = %err, "invoice mail failed");
        return Err(AppError::Collaborator("Error sending email".to_string()));
    }

    audit::record(
        &state.pool,
        None,
        "invoice_sent",
        Some("invoices"),
        Some(serde_json::json!({ "recipient": payload.email })),
    )
    .await;

    Ok(Message::new("Email sent successfully"))
}
