use diesel::{prelude::*, r2d2};

pub mod actions;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod schema;

pub use handlers::configure;

pub type DbPool = r2d2::Pool<r2d2::ConnectionManager<PgConnection>>;

/// Build the shared connection pool from `DATABASE_URL`.
pub fn initialize_db_pool() -> DbPool {
    let conn_spec = std::env::var("DATABASE_URL").expect("DATABASE_URL should be set");
    let manager = r2d2::ConnectionManager::<PgConnection>::new(conn_spec);
    r2d2::Pool::builder()
        .build(manager)
        .expect("DATABASE_URL should be a valid Postgres connection string")
}
