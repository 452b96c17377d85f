use actix_web::{middleware, web, App, HttpServer};

use conference_manager::{actions, configure, initialize_db_pool};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // initialize DB pool outside of `HttpServer::new` so that it is shared across all workers
    let pool = initialize_db_pool();

    // the tables must exist before the first request can touch them
    let mut conn = pool.get().expect("database should be reachable at startup");
    actions::ensure_schema(&mut conn).expect("schema creation should succeed");
    drop(conn);

    log::info!("starting HTTP server at http://localhost:8080");

    HttpServer::new(move || {
        App::new()
            // add DB pool handle to app data; enables use of `web::Data<DbPool>` extractor
            .app_data(web::Data::new(pool.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
