use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use tour_pricing_api::routes;
use tour_pricing_api::services::payment::sandbox::SandboxPaymentProcessor;
use tour_pricing_api::services::payment_service::PaymentConfig;
use tour_pricing_api::store::pricing_store::PricingStore;
use tour_pricing_api::store::seed;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    println!("Logger initialized");

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let pricing_store = web::Data::new(PricingStore::new());
    if std::env::var("SEED_DEMO_TOUR").as_deref() == Ok("1") {
        seed::seed_demo_tour(&pricing_store);
    }
    let payment_config = web::Data::new(PaymentConfig::from_env());
    let payment_processor = web::Data::new(SandboxPaymentProcessor::new());

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(pricing_store.clone())
            .app_data(payment_config.clone())
            .app_data(payment_processor.clone())
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/tours/{tour_id}")
                            .route(
                                "/pricing",
                                web::get().to(routes::pricing::get_pricing_configuration),
                            )
                            .route(
                                "/pricing/seasonal-periods",
                                web::put().to(routes::pricing::update_seasonal_pricing),
                            )
                            .route(
                                "/pricing/dynamic-rules",
                                web::put().to(routes::pricing::update_dynamic_rules),
                            )
                            .route(
                                "/pricing/group-discounts",
                                web::put().to(routes::pricing::update_group_discounts),
                            )
                            .route(
                                "/pricing/early-bird-last-minute",
                                web::put().to(routes::pricing::update_early_bird_last_minute),
                            )
                            .route(
                                "/pricing/blackout-periods",
                                web::put().to(routes::pricing::update_blackout_period),
                            )
                            .route(
                                "/pricing/blackout-periods/{period_id}",
                                web::delete().to(routes::pricing::delete_blackout_period),
                            )
                            .route(
                                "/pricing/capacity",
                                web::put().to(routes::pricing::update_capacity_settings),
                            )
                            .route(
                                "/pricing/quote",
                                web::post().to(routes::pricing::calculate_price),
                            )
                            .route(
                                "/pricing/calendar",
                                web::get().to(routes::pricing::get_price_calendar),
                            )
                            .route(
                                "/pricing/analytics",
                                web::get().to(routes::pricing::get_pricing_analytics),
                            )
                            .route(
                                "/pricing/history",
                                web::get().to(routes::pricing::get_price_history),
                            )
                            .route("/bookings", web::post().to(routes::pricing::record_booking)),
                    )
                    .route(
                        "/pricing/bulk-updates",
                        web::post().to(routes::pricing::apply_bulk_pricing_update),
                    )
                    .service(web::scope("/bookings").route(
                        "/payment-amounts",
                        web::post().to(routes::payment::calculate_payment_amounts),
                    ))
                    .service(
                        web::scope("/payment")
                            .route(
                                "/payment-intent",
                                web::post().to(routes::payment::create_payment_intent),
                            )
                            .route("/confirm", web::post().to(routes::payment::confirm_payment)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
