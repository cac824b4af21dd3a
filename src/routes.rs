use crate::{
    api::{attendance, employee, health},
    config::Config,
    error::StoreError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{guard, middleware::Condition, web};
use std::sync::Arc;

type Limiter = Condition<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

// Helper to build a per-route limiter; 0 requests per minute turns it off.
fn build_limiter(requests_per_min: u32) -> Limiter {
    let burst = requests_per_min.max(1);
    let per_ms = 60_000 / burst as u64;
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Condition::new(requests_per_min > 0, Governor::new(&cfg))
}

/// Extractor failures answer with the same error body as store failures.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| StoreError::validation("body", err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| StoreError::validation("query", err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| StoreError::validation("path", err.to_string()).into()),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let write_limiter = Arc::new(build_limiter(config.rate_write_per_min));
    let read_limiter = Arc::new(build_limiter(config.rate_read_per_min));

    extractor_configs(cfg);
    cfg.service(health::health_check);

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .guard(guard::Post())
                            .wrap(write_limiter.clone())
                            .route(web::post().to(employee::create_employee)),
                    )
                    .service(
                        web::resource("")
                            .wrap(read_limiter.clone())
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .guard(guard::Delete())
                            .wrap(write_limiter.clone())
                            .route(web::delete().to(employee::delete_employee)),
                    )
                    .service(
                        web::resource("/{id}")
                            .wrap(read_limiter.clone())
                            .route(web::get().to(employee::get_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .wrap(write_limiter)
                            .route(web::post().to(attendance::mark_attendance)),
                    )
                    // /attendance/{employee_id}
                    .service(
                        web::resource("/{employee_id}")
                            .wrap(read_limiter)
                            .route(web::get().to(attendance::list_attendance)),
                    ),
            ),
    );
}
