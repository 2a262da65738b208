use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, LoginResult, RegisterRequest, VerifyEmailRequest},
        images::UploadResponse,
        inventory::{CreateItemRequest, OwnedItemRequest, TotalSum, UpdateItemRequest, WeeklySum},
        invoices::SendInvoiceRequest,
        payments::{
            CreatePaymentRequest, PaymentSummary, UpdatePaymentRequest,
            UpdatePaymentStatusRequest,
        },
    },
    models::{
        Client, ContactMessage, ImageRecord, InventoryItem, ItemWithClient, Payment,
        PaymentStatus, UserPublic,
    },
    response::{Message, StatusMessage},
    routes::{clients, contacts, health, images, invoices, items, payments, users},
    session::SESSION_COOKIE,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        items::list_items,
        items::create_item,
        items::update_item,
        items::delete_item,
        items::total_sum,
        items::weekly_sum,
        items::sold_yesterday,
        users::register,
        users::verify_email,
        users::login,
        users::profile,
        users::logout,
        clients::list_clients,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        payments::create_payment,
        payments::list_payments,
        payments::payments_for_client,
        payments::update_payment,
        payments::delete_payment,
        payments::update_payment_status,
        payments::payment_summary,
        contacts::list_messages,
        contacts::create_message,
        images::upload,
        images::list_images,
        invoices::send_invoice
    ),
    components(
        schemas(
            UserPublic,
            Client,
            InventoryItem,
            ItemWithClient,
            Payment,
            PaymentStatus,
            ContactMessage,
            ImageRecord,
            RegisterRequest,
            VerifyEmailRequest,
            LoginRequest,
            LoginResult,
            LoginResponse,
            CreateItemRequest,
            UpdateItemRequest,
            OwnedItemRequest,
            TotalSum,
            WeeklySum,
            CreatePaymentRequest,
            UpdatePaymentRequest,
            UpdatePaymentStatusRequest,
            PaymentSummary,
            UploadResponse,
            SendInvoiceRequest,
            clients::ClientRequest,
            contacts::ContactRequest,
            health::HealthData,
            StatusMessage,
            Message
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Inventory", description = "Inventory items and sales figures"),
        (name = "Users", description = "Accounts, verification and sessions"),
        (name = "Clients", description = "Client records"),
        (name = "Payments", description = "Payments and their summary"),
        (name = "Contacts", description = "Contact messages"),
        (name = "Images", description = "Image uploads"),
        (name = "Invoices", description = "Invoice rendering and delivery"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
