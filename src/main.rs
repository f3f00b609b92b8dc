use actix_web::{middleware::Logger, web, App, HttpServer};

use quizfy_server::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(err) => {
            log::error!("Failed to initialize application state: {}", err);
            std::process::exit(1);
        }
    };

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(handlers::health_check)
            .service(handlers::create_quiz)
            .service(handlers::get_quiz_by_code)
            .service(handlers::start_attempt)
            .service(handlers::submit_attempt)
            .service(handlers::expire_attempt)
            .service(handlers::get_attempt)
            .service(handlers::individual_report)
            .service(handlers::group_report)
            .service(handlers::report_card)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
