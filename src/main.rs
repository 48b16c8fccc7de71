mod auth;
mod config;
mod errors;
mod messaging;
mod models;
mod routes;
mod store;

use crate::config::Config;
use crate::routes::{
    auth as auth_routes, companies as companies_routes, messages as messages_routes,
    reviews as reviews_routes, users as users_routes,
};
use crate::store::Store;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer, web};
use env_logger::Env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Init logger to show info by default, but can be overridden by RUST_LOG
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cfg = Config::load();

    // Everything is served from one seeded in-memory store; restarting the
    // process resets the demo.
    let store = Store::with_demo_data();
    log::info!("Starting server at {}", cfg.listen);

    let listen_addr = cfg.listen.clone();
    HttpServer::new(move || {
        let cors = Cors::permissive()
            .allowed_methods(vec!["GET", "POST", "PATCH", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(Data::new(cfg.clone()))
            .app_data(Data::new(store.clone()))
            .service(
                web::scope("/api")
                    .service(web::scope("/auth")
                        .route("/signup", web::post().to(auth_routes::signup))
                        .route("/login", web::post().to(auth_routes::login))
                        .route("/logout", web::post().to(auth_routes::logout))
                    )
                    .service(web::scope("/users")
                        .route("", web::get().to(users_routes::list_users))
                        .route("/me", web::get().to(users_routes::me))
                        .route("/me", web::patch().to(users_routes::update_me))
                        .route("/me/password", web::put().to(users_routes::change_password))
                        .route("/{id}", web::get().to(users_routes::get_user))
                    )
                    .service(web::scope("/companies")
                        .route("", web::get().to(companies_routes::list_companies))
                        .route("", web::post().to(companies_routes::create_company))
                        .route("/{id}", web::get().to(companies_routes::get_company))
                        .route("/{id}/reviews", web::get().to(reviews_routes::list_reviews))
                        .route("/{id}/reviews", web::post().to(reviews_routes::post_review))
                    )
                    .service(
                        web::scope("/messages")
                            .route("/conversations", web::get().to(messages_routes::list_conversations))
                            .route("/with/{id}", web::get().to(messages_routes::get_thread))
                            .route("/with/{id}", web::post().to(messages_routes::send_message))
                    )
                    .route("/health", web::get().to(routes::health::health_check))
            )
    })
    .bind(listen_addr)?
    .run()
    .await
}
