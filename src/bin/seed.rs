use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use axum_billing_api::{
    config::AppConfig,
    db::create_pool,
    services::inventory_service::price_item,
    session::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_id = ensure_demo_user(&pool, "demo@example.com", "demo123").await?;
    let client_id = ensure_client(
        &pool,
        "Acme Traders",
        "12 Market Road",
        "834001",
        "Ranchi",
        "India",
        "billing@acme-traders.example",
    )
    .await?;
    let second_client = ensure_client(
        &pool,
        "Sunrise Stores",
        "4 Lake View",
        "827013",
        "Bokaro",
        "India",
        "accounts@sunrise-stores.example",
    )
    .await?;
    seed_items(&pool, client_id).await?;
    seed_payments(&pool, client_id, second_client).await?;

    println!("Seed completed. Demo user: {user_id}, clients: {client_id}, {second_client}");
    Ok(())
}

/// Inserts an already-verified account so the demo login works without a
/// mail round-trip.
async fn ensure_demo_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    if let Some((id,)) = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?
    {
        println!("Demo user {email} already present");
        return Ok(id);
    }

    let password_hash = hash_password(password)?;
    let dob = NaiveDate::from_ymd_opt(1995, 4, 12)
        .ok_or_else(|| anyhow::anyhow!("invalid seed date of birth"))?;
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO users
            (id, first_name, last_name, email, mobile, address, dob, gender,
             password_hash, verification_code, is_verified)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, TRUE)
        "#,
    )
    .bind(id)
    .bind("Demo")
    .bind("User")
    .bind(email)
    .bind("9990001111")
    .bind("1 Demo Lane")
    .bind(dob)
    .bind("other")
    .bind(password_hash)
    .bind("SEEDED00")
    .execute(pool)
    .await?;

    println!("Created demo user {email}");
    Ok(id)
}

async fn ensure_client(
    pool: &sqlx::PgPool,
    name: &str,
    address: &str,
    zip: &str,
    city: &str,
    country: &str,
    email: &str,
) -> anyhow::Result<Uuid> {
    if let Some((id,)) = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM clients WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?
    {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO clients (id, name, address, zip, city, country, email)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(address)
    .bind(zip)
    .bind(city)
    .bind(country)
    .bind(email)
    .execute(pool)
    .await?;

    println!("Created client {name}");
    Ok(id)
}

async fn seed_items(pool: &sqlx::PgPool, client_id: Uuid) -> anyhow::Result<()> {
    let items = vec![
        ("IT-1001", "A4 Paper Ream", 450.0, 5.0, 20.0),
        ("IT-1002", "Ballpoint Pen Box", 120.0, 10.0, 15.0),
        ("IT-1003", "Stapler", 260.0, 0.0, 6.0),
        ("IT-1004", "Ink Cartridge", 1899.0, 12.5, 4.0),
    ];

    for (item_code, item_name, mrp, discount_pct, qty) in items {
        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM inventory_items WHERE item_code = $1")
                .bind(item_code)
                .fetch_optional(pool)
                .await?;
        if exists.is_some() {
            continue;
        }

        let pricing = price_item(mrp, discount_pct, qty)?;
        sqlx::query(
            r#"
            INSERT INTO inventory_items
                (id, item_code, item_name, mrp, discount_pct, discount_amount,
                 rate, qty, total, client_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(item_code)
        .bind(item_name)
        .bind(mrp)
        .bind(discount_pct)
        .bind(pricing.discount_amount)
        .bind(pricing.rate)
        .bind(qty)
        .bind(pricing.total)
        .bind(client_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded inventory items");
    Ok(())
}

async fn seed_payments(
    pool: &sqlx::PgPool,
    client_id: Uuid,
    second_client: Uuid,
) -> anyhow::Result<()> {
    let payments = vec![
        ("INV-2024-001", 8550.0, "paid", client_id),
        ("INV-2024-002", 1620.0, "due", client_id),
        ("INV-2024-003", 7596.0, "due", second_client),
    ];

    for (invoice_number, amount, status, owner) in payments {
        sqlx::query(
            r#"
            INSERT INTO payments (id, invoice_number, amount, status, date, client_id)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE NOT EXISTS (SELECT 1 FROM payments WHERE invoice_number = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(invoice_number)
        .bind(amount)
        .bind(status)
        .bind(Utc::now())
        .bind(owner)
        .execute(pool)
        .await?;
    }

    println!("Seeded payments");
    Ok(())
}
