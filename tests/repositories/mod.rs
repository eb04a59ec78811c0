//! PostgreSQL repository tests
//!
//! Need `DATABASE_URL` pointing at a server where `#[sqlx::test]` may create
//! scratch databases. Run with `cargo test -- --ignored`.

mod recruiting_tests;
mod sales_tests;
