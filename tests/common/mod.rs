use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use tour_pricing_api::models::configuration::{BasePricing, PricingConfiguration};
use tour_pricing_api::models::pricing_rules::{
    CapacitySetting, DynamicPricingRule, GroupDiscountTier, OccupancyThreshold, SeasonalPeriod,
};
use tour_pricing_api::routes;
use tour_pricing_api::services::payment::sandbox::SandboxPaymentProcessor;
use tour_pricing_api::services::payment_service::PaymentConfig;
use tour_pricing_api::store::pricing_store::PricingStore;

pub const TEST_TOUR: &str = "tour-atlas-trek";

pub struct TestApp {
    pub store: web::Data<PricingStore>,
    pub payment_config: web::Data<PaymentConfig>,
    pub payment_processor: web::Data<SandboxPaymentProcessor>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = web::Data::new(PricingStore::new());
        store.insert_tour(test_tour_config());
        Self {
            store,
            payment_config: web::Data::new(PaymentConfig::default()),
            payment_processor: web::Data::new(SandboxPaymentProcessor::new()),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(self.store.clone())
            .app_data(self.payment_config.clone())
            .app_data(self.payment_processor.clone())
            .route("/health", web::get().to(|| async { "OK" }))
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
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// In the seeded high season (today+30 .. today+90), multiplier 1.4.
pub fn high_season_date() -> NaiveDate {
    today() + Duration::days(45)
}

/// A tour with a 1.4x high season, demand brackets (1.0 / 1.1 / 1.3) and the
/// standard 4-6 / 7-12 / 13+ group tiers. No early-bird rule and no
/// days-to-departure brackets, so date-relative tests stay predictable.
fn test_tour_config() -> PricingConfiguration {
    let mut config = PricingConfiguration::new(
        TEST_TOUR,
        BasePricing {
            base_price: 2500.0,
            currency: "USD".to_string(),
            deposit_percentage: 20.0,
        },
    );

    config.seasonal_periods = vec![SeasonalPeriod {
        id: Uuid::new_v4(),
        name: "High season".to_string(),
        start_date: today() + Duration::days(30),
        end_date: today() + Duration::days(90),
        price_multiplier: 1.4,
        description: None,
        color: None,
    }];

    config.dynamic_rules = vec![DynamicPricingRule {
        id: Uuid::new_v4(),
        name: "Demand pricing".to_string(),
        is_active: true,
        base_price: 2500.0,
        occupancy_thresholds: vec![
            OccupancyThreshold {
                min_occupancy: 0.0,
                max_occupancy: 50.0,
                price_multiplier: 1.0,
            },
            OccupancyThreshold {
                min_occupancy: 50.0,
                max_occupancy: 75.0,
                price_multiplier: 1.1,
            },
            OccupancyThreshold {
                min_occupancy: 75.0,
                max_occupancy: 100.0,
                price_multiplier: 1.3,
            },
        ],
        days_to_departure_rules: vec![],
        tour_ids: vec![],
    }];

    config.group_discounts = vec![
        GroupDiscountTier {
            id: Uuid::new_v4(),
            name: "Small group".to_string(),
            min_group_size: 4,
            max_group_size: Some(6),
            discount_percentage: 5.0,
            price_per_person: None,
            description: None,
        },
        GroupDiscountTier {
            id: Uuid::new_v4(),
            name: "Medium group".to_string(),
            min_group_size: 7,
            max_group_size: Some(12),
            discount_percentage: 10.0,
            price_per_person: None,
            description: None,
        },
        GroupDiscountTier {
            id: Uuid::new_v4(),
            name: "Large group".to_string(),
            min_group_size: 13,
            max_group_size: None,
            discount_percentage: 15.0,
            price_per_person: None,
            description: None,
        },
    ];

    config.capacity_settings = Some(CapacitySetting {
        id: Uuid::new_v4(),
        tour_id: TEST_TOUR.to_string(),
        min_capacity: 4,
        max_capacity: 20,
        preferred_capacity: Some(16),
        auto_release_date: None,
        blocked_seats: None,
        buffer_capacity: None,
    });

    config
}
