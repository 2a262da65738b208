use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{Request, header};
use sea_orm::{ConnectionTrait, Statement};
use serde_json::json;
use uuid::Uuid;

use axum_billing_api::{
    collab::{BlobStore, InvoiceRenderer, MailAttachment, Mailer, StoredBlob},
    db::{create_orm_conn, create_pool},
    dto::{
        auth::{LoginRequest, RegisterRequest, VerifyEmailRequest},
        inventory::{CreateItemRequest, UpdateItemRequest},
        invoices::SendInvoiceRequest,
        payments::{CreatePaymentRequest, UpdatePaymentStatusRequest},
    },
    error::AppError,
    middleware::auth::AuthSession,
    models::PaymentStatus,
    routes::{clients::ClientRequest, contacts::ContactRequest},
    services::{
        client_service, contact_service, image_service, inventory_service, invoice_service,
        payment_service, user_service,
    },
    session::{SessionKeys, SessionStore},
    state::AppState,
};

#[derive(Debug, Clone)]
struct SentMail {
    to: String,
    subject: String,
    has_attachment: bool,
}

/// Records every send instead of talking to an SMTP host.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().expect("mailer lock").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        _body: &str,
        attachment: Option<MailAttachment>,
    ) -> anyhow::Result<()> {
        self.sent.lock().expect("mailer lock").push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            has_attachment: attachment.is_some(),
        });
        Ok(())
    }
}

struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(
        &self,
        _to: &str,
        _subject: &str,
        _body: &str,
        _attachment: Option<MailAttachment>,
    ) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("smtp connection refused"))
    }
}

/// Answers every upload with a fixed durable URL.
struct StaticBlobStore;

#[async_trait]
impl BlobStore for StaticBlobStore {
    async fn upload(&self, _path: &std::path::Path) -> anyhow::Result<StoredBlob> {
        Ok(StoredBlob {
            url: "https://blobs.example/stored.png".to_string(),
        })
    }
}

struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn upload(&self, _path: &std::path::Path) -> anyhow::Result<StoredBlob> {
        Err(anyhow::anyhow!("blob host unreachable"))
    }
}

struct StaticRenderer;

#[async_trait]
impl InvoiceRenderer for StaticRenderer {
    async fn render(&self, _invoice: &serde_json::Value) -> anyhow::Result<Vec<u8>> {
        Ok(b"%PDF-1.4 rendered".to_vec())
    }
}

fn database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

// All tests in this binary share one database; each takes the lock for its
// whole run so a truncate in one cannot swallow rows another just wrote.
static DB_LOCK: Mutex<()> = Mutex::new(());

fn db_lock() -> std::sync::MutexGuard<'static, ()> {
    DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn build_state(database_url: &str, mailer: Arc<dyn Mailer>) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let upload_dir = std::env::temp_dir().join(format!("billing-test-{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&upload_dir).await?;

    Ok(AppState {
        pool: pool.clone(),
        orm,
        keys: SessionKeys::new("integration-test-secret"),
        sessions: SessionStore::new(pool),
        mailer,
        blob: Arc::new(StaticBlobStore),
        renderer: Arc::new(StaticRenderer),
        upload_dir,
    })
}

async fn truncate_all(state: &AppState) -> anyhow::Result<()> {
    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE session_tokens, audit_logs, inventory_items, payments, \
             contact_messages, images, clients, users RESTART IDENTITY CASCADE",
        ))
        .await?;
    Ok(())
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        first_name: "Arif".to_string(),
        last_name: "Mohammad".to_string(),
        email: email.to_string(),
        mobile: "9990001111".to_string(),
        address: "12 Market Road".to_string(),
        password: "pass-word-1".to_string(),
        dob: chrono::NaiveDate::from_ymd_opt(1996, 7, 3).expect("dob"),
        gender: "male".to_string(),
    }
}

fn client_request(name: &str, email: &str) -> ClientRequest {
    ClientRequest {
        name: name.to_string(),
        address: "4 Lake View".to_string(),
        zip: "827013".to_string(),
        city: "Bokaro".to_string(),
        country: "India".to_string(),
        email: email.to_string(),
    }
}

// When the verification mail cannot be delivered, registration must fail
// without leaving a user row behind.
#[tokio::test]
async fn failed_verification_mail_leaves_no_user() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests.");
        return Ok(());
    };
    let _db = db_lock();
    let state = build_state(&url, Arc::new(FailingMailer)).await?;

    let email = format!("nomail-{}@example.com", Uuid::new_v4());
    let result = user_service::register(&state, register_request(&email)).await;
    assert!(matches!(result, Err(AppError::Collaborator(_))));

    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(count.0, 0, "no user row may exist after a failed mail");

    Ok(())
}

// Two registrations can both pass the uniqueness lookup before either row
// lands; the unique index then decides, and the loser is told the email is
// taken rather than handed a server error.
#[tokio::test]
async fn simultaneous_registration_keeps_email_unique() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests.");
        return Ok(());
    };
    let _db = db_lock();
    let state = build_state(&url, Arc::new(RecordingMailer::default())).await?;

    let email = format!("race-{}@example.com", Uuid::new_v4());
    let (first, second) = tokio::join!(
        user_service::register(&state, register_request(&email)),
        user_service::register(&state, register_request(&email)),
    );

    let (winner, loser) = match (first, second) {
        (Ok(resp), Err(err)) | (Err(err), Ok(resp)) => (resp, err),
        other => panic!("expected one winner and one refusal, got {other:?}"),
    };
    assert_eq!(winner.status, 201);
    assert!(
        matches!(loser, AppError::Conflict(_)),
        "loser reports the duplicate email, got {loser:?}"
    );

    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(count.0, 1);

    Ok(())
}

// The whole surface in one pass: registration and sessions, then clients,
// inventory with its sums, payments and contact messages.
#[tokio::test]
async fn full_billing_flow() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests.");
        return Ok(());
    };
    let _db = db_lock();
    let mailer = Arc::new(RecordingMailer::default());
    let state = build_state(&url, mailer.clone()).await?;
    truncate_all(&state).await?;

    // Empty collections sum to zero, never an error.
    assert_eq!(inventory_service::total_sum(&state).await?, 0.0);
    assert_eq!(inventory_service::weekly_sum(&state).await?, 0.0);
    assert_eq!(payment_service::payment_summary(&state).await?, 0.0);

    // Registration sends the code and stores an unverified account.
    let email = "arif@example.com";
    let resp = user_service::register(&state, register_request(email)).await?;
    assert_eq!(resp.status, 201);
    let mails = mailer.sent();
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].to, email);
    assert_eq!(mails[0].subject, "Verify your email address");
    assert!(!mails[0].has_attachment);

    // A second registration under the same email is refused.
    let dup = user_service::register(&state, register_request(email)).await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));
    let count: (i64,) = sqlx::query_as("SELECT count(*) FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(count.0, 1);

    // Credentials alone are not enough while the email is unverified.
    let early = user_service::login(
        &state,
        LoginRequest {
            email: email.to_string(),
            password: "pass-word-1".to_string(),
        },
    )
    .await;
    assert!(
        matches!(early, Err(AppError::Unauthorized(ref msg)) if msg == "Email not verified")
    );

    // Wrong code is refused, the mailed code flips the flag.
    let (stored_code,): (String,) =
        sqlx::query_as("SELECT verification_code FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&state.pool)
            .await?;
    let wrong = user_service::verify_email(
        &state,
        VerifyEmailRequest {
            email: email.to_string(),
            verification_code: "XXXXXXXX".to_string(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::Validation(_))));
    user_service::verify_email(
        &state,
        VerifyEmailRequest {
            email: email.to_string(),
            verification_code: stored_code,
        },
    )
    .await?;

    // Unknown email and wrong password fail identically.
    let bad_password = user_service::login(
        &state,
        LoginRequest {
            email: email.to_string(),
            password: "wrong".to_string(),
        },
    )
    .await;
    let bad_email = user_service::login(
        &state,
        LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "pass-word-1".to_string(),
        },
    )
    .await;
    match (bad_password, bad_email) {
        (Err(AppError::Unauthorized(a)), Err(AppError::Unauthorized(b))) => assert_eq!(a, b),
        other => panic!("expected two unauthorized errors, got {other:?}"),
    }

    let login = user_service::login(
        &state,
        LoginRequest {
            email: email.to_string(),
            password: "pass-word-1".to_string(),
        },
    )
    .await?;
    assert_eq!(login.status, 200);
    assert_eq!(login.result.user.email, email);
    assert!(login.result.user.is_verified);
    let token = login.result.token.clone();
    let user_id = login.result.user.id;

    // Logins in the same second mint byte-identical tokens, so putting one
    // into the token set twice must be a silent no-op, and a back-to-back
    // second login must succeed either way.
    state.sessions.add(user_id, &token).await?;
    assert!(state.sessions.contains(user_id, &token).await?);
    let relogin = user_service::login(
        &state,
        LoginRequest {
            email: email.to_string(),
            password: "pass-word-1".to_string(),
        },
    )
    .await?;
    assert_eq!(relogin.status, 200);

    // The token in the cookie unlocks the session extractor...
    let request = Request::builder()
        .uri("/profile")
        .header(header::COOKIE, format!("session={token}"))
        .body(())?;
    let (mut parts, _) = request.into_parts();
    let session = AuthSession::from_request_parts(&mut parts, &state)
        .await
        .expect("cookie session accepted");
    assert_eq!(session.user_id, user_id);

    // ...and so does the same token as a bearer header.
    let request = Request::builder()
        .uri("/profile")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(())?;
    let (mut parts, _) = request.into_parts();
    let bearer_session = AuthSession::from_request_parts(&mut parts, &state)
        .await
        .expect("bearer session accepted");
    assert_eq!(bearer_session.user_id, user_id);

    let profile = user_service::profile(&state, &session).await?;
    assert_eq!(profile.email, email);

    // Logout revokes server-side: the very same cookie is dead afterwards.
    user_service::logout(&state, &session).await?;
    assert!(!state.sessions.contains(user_id, &token).await?);
    let request = Request::builder()
        .uri("/profile")
        .header(header::COOKIE, format!("session={token}"))
        .body(())?;
    let (mut parts, _) = request.into_parts();
    let revoked = AuthSession::from_request_parts(&mut parts, &state).await;
    assert!(matches!(revoked, Err(AppError::Unauthorized(_))));

    // Clients.
    let client_a = client_service::create_client(
        &state,
        client_request("Acme Traders", "billing@acme.example"),
    )
    .await?;
    let client_b = client_service::create_client(
        &state,
        client_request("Sunrise Stores", "accounts@sunrise.example"),
    )
    .await?;
    assert_eq!(client_service::list_clients(&state).await?.len(), 2);

    // Inventory create derives the amounts server-side.
    let item = inventory_service::create_item(
        &state,
        CreateItemRequest {
            item_code: "IT-1001".to_string(),
            item_name: "A4 Paper Ream".to_string(),
            mrp: 100.0,
            discount_pct: 10.0,
            qty: 2.0,
            client_id: client_a.id,
        },
    )
    .await?;
    assert_eq!(item.discount_amount, 20.0);
    assert_eq!(item.rate, 200.0);
    assert_eq!(item.total, 180.0);
    assert_eq!(inventory_service::total_sum(&state).await?, 180.0);

    // A mutation claiming the wrong owner hits nothing.
    let foreign_update = inventory_service::update_item(
        &state,
        item.id,
        UpdateItemRequest {
            item_code: "HIJACK".to_string(),
            item_name: "Hijacked".to_string(),
            mrp: 1.0,
            discount_pct: 0.0,
            qty: 1.0,
            client_id: client_b.id,
        },
    )
    .await;
    assert!(matches!(foreign_update, Err(AppError::NotFound)));
    let items = inventory_service::list_items(&state).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item_code, "IT-1001");
    assert_eq!(items[0].total, 180.0);

    let foreign_delete = inventory_service::delete_item(&state, item.id, client_b.id).await;
    assert!(matches!(foreign_delete, Err(AppError::NotFound)));
    assert_eq!(inventory_service::list_items(&state).await?.len(), 1);

    // The owner updates with the same derivation rules as create.
    let updated = inventory_service::update_item(
        &state,
        item.id,
        UpdateItemRequest {
            item_code: "IT-1001".to_string(),
            item_name: "A4 Paper Ream".to_string(),
            mrp: 100.0,
            discount_pct: 20.0,
            qty: 3.0,
            client_id: client_a.id,
        },
    )
    .await?;
    assert_eq!(updated.discount_amount, 60.0);
    assert_eq!(updated.rate, 300.0);
    assert_eq!(updated.total, 240.0);

    // Fresh items are in neither report window.
    assert!(inventory_service::sold_yesterday(&state).await?.is_empty());
    assert_eq!(inventory_service::weekly_sum(&state).await?, 0.0);

    // Moved back one day, the item shows up in yesterday's report with its
    // owning client attached.
    sqlx::query("UPDATE inventory_items SET created_at = now() - interval '1 day' WHERE id = $1")
        .bind(item.id)
        .execute(&state.pool)
        .await?;
    let yesterday = inventory_service::sold_yesterday(&state).await?;
    assert_eq!(yesterday.len(), 1);
    assert_eq!(yesterday[0].item.id, item.id);
    let embedded = yesterday[0].client.as_ref().expect("client embedded");
    assert_eq!(embedded.id, client_a.id);
    assert_eq!(inventory_service::weekly_sum(&state).await?, 0.0);

    // Moved back a week, it leaves yesterday's report and enters the weekly
    // sum.
    sqlx::query("UPDATE inventory_items SET created_at = now() - interval '7 days' WHERE id = $1")
        .bind(item.id)
        .execute(&state.pool)
        .await?;
    assert!(inventory_service::sold_yesterday(&state).await?.is_empty());
    assert_eq!(inventory_service::weekly_sum(&state).await?, 240.0);

    // Deleting a client never cascades into its rows.
    client_service::delete_client(&state, client_b.id).await?;
    assert!(matches!(
        client_service::delete_client(&state, client_b.id).await,
        Err(AppError::NotFound)
    ));
    assert_eq!(inventory_service::list_items(&state).await?.len(), 1);

    // Payments.
    let paid = payment_service::create_payment(
        &state,
        CreatePaymentRequest {
            invoice_number: "INV-2024-001".to_string(),
            amount: 1000.0,
            status: PaymentStatus::Paid,
            date: chrono::Utc::now(),
            client_id: client_a.id,
        },
    )
    .await?;
    let due = payment_service::create_payment(
        &state,
        CreatePaymentRequest {
            invoice_number: "INV-2024-002".to_string(),
            amount: 620.0,
            status: PaymentStatus::Due,
            date: chrono::Utc::now(),
            client_id: client_a.id,
        },
    )
    .await?;
    payment_service::create_payment(
        &state,
        CreatePaymentRequest {
            invoice_number: "INV-2024-003".to_string(),
            amount: 380.0,
            status: PaymentStatus::Due,
            date: chrono::Utc::now(),
            // The deleted client's id still works: references may dangle.
            client_id: client_b.id,
        },
    )
    .await?;

    assert_eq!(payment_service::list_payments(&state).await?.len(), 3);
    assert_eq!(
        payment_service::list_payments_for_client(&state, client_a.id)
            .await?
            .len(),
        2
    );
    assert_eq!(payment_service::payment_summary(&state).await?, 2000.0);

    let settled = payment_service::update_payment_status(
        &state,
        due.id,
        UpdatePaymentStatusRequest {
            status: PaymentStatus::Paid,
        },
    )
    .await?;
    assert_eq!(settled.status, PaymentStatus::Paid);

    assert!(matches!(
        payment_service::update_payment_status(
            &state,
            Uuid::new_v4(),
            UpdatePaymentStatusRequest {
                status: PaymentStatus::Due,
            },
        )
        .await,
        Err(AppError::NotFound)
    ));

    payment_service::delete_payment(&state, paid.id).await?;
    assert!(matches!(
        payment_service::delete_payment(&state, paid.id).await,
        Err(AppError::NotFound)
    ));
    assert_eq!(payment_service::payment_summary(&state).await?, 1000.0);

    // Contact messages.
    let contact = contact_service::create_message(
        &state,
        ContactRequest {
            name: "Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            message: "Do you deliver to Bokaro?".to_string(),
        },
    )
    .await?;
    let messages = contact_service::list_messages(&state).await?;
    assert!(messages.iter().any(|m| m.id == contact.id));

    Ok(())
}

// Upload spools to disk, hands off to blob storage and cleans up; invoices
// are rendered and mailed as attachments.
#[tokio::test]
async fn upload_and_invoice_flow() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests.");
        return Ok(());
    };
    let _db = db_lock();
    let mailer = Arc::new(RecordingMailer::default());
    let state = build_state(&url, mailer.clone()).await?;

    let image = image_service::store_profile_picture(&state, "avatar.png", b"PNGDATA").await?;
    assert_eq!(image.image_name, "avatar.png");
    assert_eq!(image.image_url, "https://blobs.example/stored.png");
    let listed = image_service::list_images(&state).await?;
    assert!(listed.iter().any(|i| i.id == image.id));

    // The scratch copy is gone once the blob host has it.
    let mut entries = tokio::fs::read_dir(&state.upload_dir).await?;
    assert!(entries.next_entry().await?.is_none());

    // Path components in the client file name are not honored.
    let traversal =
        image_service::store_profile_picture(&state, "../../escape.png", b"PNGDATA").await?;
    assert_eq!(traversal.image_name, "escape.png");

    let resp = invoice_service::send_invoice(
        &state,
        SendInvoiceRequest {
            email: "customer@example.com".to_string(),
            invoice_data: json!({
                "sender": { "company": "Acme Traders" },
                "client": { "company": "Sunrise Stores" },
                "products": [{ "description": "A4 Paper Ream", "price": 450.0 }],
            }),
        },
    )
    .await?;
    assert_eq!(resp.message, "Email sent successfully");

    let mails = mailer.sent();
    let invoice_mail = mails.last().expect("invoice mail recorded");
    assert_eq!(invoice_mail.to, "customer@example.com");
    assert_eq!(invoice_mail.subject, "Your Invoice");
    assert!(invoice_mail.has_attachment);

    Ok(())
}

// The scratch copy never outlives the request, however far it got.
#[tokio::test]
async fn failed_blob_upload_removes_scratch_file() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests.");
        return Ok(());
    };
    let _db = db_lock();
    let mut state = build_state(&url, Arc::new(RecordingMailer::default())).await?;
    state.blob = Arc::new(FailingBlobStore);

    let rejected = image_service::store_profile_picture(&state, "rejected.png", b"PNGDATA").await;
    assert!(matches!(rejected, Err(AppError::Collaborator(_))));
    let mut entries = tokio::fs::read_dir(&state.upload_dir).await?;
    assert!(
        entries.next_entry().await?.is_none(),
        "scratch file must not survive a failed blob transfer"
    );

    // When even the local write fails, the error surfaces and nothing leaks.
    state.upload_dir = state.upload_dir.join("not-created");
    let unwritable =
        image_service::store_profile_picture(&state, "rejected.png", b"PNGDATA").await;
    assert!(matches!(unwritable, Err(AppError::Internal(_))));

    Ok(())
}
