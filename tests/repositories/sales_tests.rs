//! Order, customer and analytics repositories

use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use recruit_sales_api::domain::{
    AnalyticsRepository, CustomerDraft, CustomerRepository, DateRange, LineDraft, OrderDraft,
    OrderRepository, OrderUpdate, ProductDraft, ProductRepository,
};
use recruit_sales_api::infrastructure::repositories::{
    PgAnalyticsRepository, PgCustomerRepository, PgOrderRepository, PgProductRepository,
};

fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap()
}

async fn customer(pool: &PgPool, name: &str) -> i64 {
    PgCustomerRepository::new(pool.clone())
        .create(&CustomerDraft {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
        })
        .await
        .unwrap()
        .customer
        .id
}

async fn product(pool: &PgPool, name: &str, price: &str) -> i64 {
    PgProductRepository::new(pool.clone())
        .create(&ProductDraft {
            name: name.into(),
            price: dec(price),
        })
        .await
        .unwrap()
        .id
}

async fn order(pool: &PgPool, customer_id: i64, items: &[(i64, i32)]) -> i64 {
    PgOrderRepository::new(pool.clone())
        .create(&OrderDraft {
            customer_id,
            items: items
                .iter()
                .map(|&(product_id, quantity)| LineDraft {
                    product_id,
                    quantity,
                })
                .collect(),
        })
        .await
        .unwrap()
}

async fn backdate(pool: &PgPool, order_id: i64, at: DateTime<Utc>) {
    sqlx::query("UPDATE orders SET order_date = $1 WHERE id = $2")
        .bind(at)
        .bind(order_id)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn order_total_follows_product_prices(pool: PgPool) {
    let ann = customer(&pool, "Ann").await;
    let pen = product(&pool, "Pen", "2.50").await;
    let pad = product(&pool, "Pad", "4.00").await;
    let id = order(&pool, ann, &[(pen, 4), (pad, 1)]).await;

    let stored = PgOrderRepository::new(pool.clone())
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.lines.len(), 2);
    assert_eq!(stored.total_price(), dec("14.00"));

    let summary = PgCustomerRepository::new(pool)
        .find_by_id(ann)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.total_spent, dec("14.00"));
    assert_eq!(summary.order_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn failed_line_insert_leaves_no_order(pool: PgPool) {
    let ann = customer(&pool, "Ann").await;
    let pen = product(&pool, "Pen", "2.50").await;

    let result = PgOrderRepository::new(pool.clone())
        .create(&OrderDraft {
            customer_id: ann,
            items: vec![
                LineDraft {
                    product_id: pen,
                    quantity: 1,
                },
                LineDraft {
                    product_id: pen + 1000,
                    quantity: 1,
                },
            ],
        })
        .await;
    assert!(result.is_err());

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orders, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn replacing_items_swaps_the_whole_list(pool: PgPool) {
    let ann = customer(&pool, "Ann").await;
    let pen = product(&pool, "Pen", "2.50").await;
    let pad = product(&pool, "Pad", "4.00").await;
    let id = order(&pool, ann, &[(pen, 1), (pad, 1)]).await;
    let repo = PgOrderRepository::new(pool.clone());

    repo.update(
        id,
        &OrderUpdate {
            customer_id: ann,
            items: Some(vec![LineDraft {
                product_id: pad,
                quantity: 3,
            }]),
        },
    )
    .await
    .unwrap();

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.lines.len(), 1);
    assert_eq!(stored.total_price(), dec("12.00"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn top_customers_rank_by_spend(pool: PgPool) {
    let a = customer(&pool, "Alice").await;
    let b = customer(&pool, "Bob").await;
    let tenner = product(&pool, "Tenner", "10.00").await;
    order(&pool, a, &[(tenner, 10)]).await;
    order(&pool, b, &[(tenner, 15)]).await;

    let top = PgAnalyticsRepository::new(pool)
        .top_customers(&DateRange::unbounded(), 5)
        .await
        .unwrap();

    let ranked: Vec<(i64, Decimal)> = top.iter().map(|c| (c.id, c.total_spent)).collect();
    assert_eq!(ranked, vec![(b, dec("150.00")), (a, dec("100.00"))]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn ties_break_by_id(pool: PgPool) {
    let first = product(&pool, "Zeta", "1.00").await;
    let second = product(&pool, "Alpha", "1.00").await;
    let ann = customer(&pool, "Ann").await;
    order(&pool, ann, &[(second, 2), (first, 2)]).await;

    let top = PgAnalyticsRepository::new(pool)
        .top_products(&DateRange::unbounded(), 5)
        .await
        .unwrap();

    let ids: Vec<i64> = top.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn date_range_bounds_are_inclusive(pool: PgPool) {
    let ann = customer(&pool, "Ann").await;
    let pen = product(&pool, "Pen", "1.00").await;

    let before = order(&pool, ann, &[(pen, 1)]).await;
    let first_day = order(&pool, ann, &[(pen, 2)]).await;
    let last_day = order(&pool, ann, &[(pen, 4)]).await;
    let after = order(&pool, ann, &[(pen, 8)]).await;

    backdate(&pool, before, Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()).await;
    backdate(&pool, first_day, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()).await;
    backdate(&pool, last_day, Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()).await;
    backdate(&pool, after, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()).await;

    let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
    let summary = PgAnalyticsRepository::new(pool)
        .sales_summary(&range)
        .await
        .unwrap();

    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.total_products_sold, 6);
    assert_eq!(summary.total_sales, dec("6.00"));
    assert_eq!(summary.total_customers, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn equal_spenders_rank_by_id_and_stop_at_five(pool: PgPool) {
    let pen = product(&pool, "Pen", "5.00").await;
    let mut ids = Vec::new();
    for name in ["Zoe", "Yan", "Xia", "Wes", "Val", "Uma"] {
        let id = customer(&pool, name).await;
        order(&pool, id, &[(pen, 2)]).await;
        ids.push(id);
    }

    let top = PgAnalyticsRepository::new(pool)
        .top_customers(&DateRange::unbounded(), 5)
        .await
        .unwrap();

    let ranked: Vec<i64> = top.iter().map(|c| c.id).collect();
    assert_eq!(ranked, ids[..5].to_vec());
    assert!(top.iter().all(|c| c.total_spent == dec("10.00")));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn datetime_upper_bound_includes_that_instant(pool: PgPool) {
    let ann = customer(&pool, "Ann").await;
    let bob = customer(&pool, "Bob").await;
    let pen = product(&pool, "Pen", "1.00").await;

    let on_time = order(&pool, ann, &[(pen, 3)]).await;
    let late = order(&pool, bob, &[(pen, 7)]).await;
    backdate(&pool, on_time, Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()).await;
    backdate(&pool, late, Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 1).unwrap()).await;

    let range = DateRange::parse(None, Some("2024-03-10T12:00:00Z")).unwrap();
    let repo = PgAnalyticsRepository::new(pool);

    let summary = repo.sales_summary(&range).await.unwrap();
    assert_eq!(summary.total_orders, 1);
    assert_eq!(summary.total_sales, dec("3.00"));

    let top = repo.top_customers(&range, 5).await.unwrap();
    let ranked: Vec<i64> = top.iter().map(|c| c.id).collect();
    assert_eq!(ranked, vec![ann]);
}
