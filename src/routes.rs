use crate::{api::payroll, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use crate::error::PayrollError;
use actix_web::{HttpRequest, error::JsonPayloadError, web};

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_limit_per_min))
            .service(web::scope("/payroll").configure(payroll_routes)),
    );
}

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %err, path = %req.path(), "Malformed payroll form");
    PayrollError::InvalidPayload(err.to_string()).into()
}

/// Payroll history, payslip and CSV export routes, relative to `/payroll`.
pub fn payroll_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        // /payroll
        .service(
            web::resource("")
                .route(web::post().to(payroll::create_payroll))
                .route(web::get().to(payroll::list_payrolls))
                .route(web::delete().to(payroll::clear_history)),
        )
        // /payroll/export.csv, ahead of /{id}
        .service(
            web::resource("/export.csv").route(web::get().to(payroll::export_history_csv)),
        )
        // /payroll/{id}
        .service(web::resource("/{id}").route(web::get().to(payroll::get_payroll)))
        // /payroll/{id}/payslip
        .service(
            web::resource("/{id}/payslip").route(web::get().to(payroll::download_payslip)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::history::PayrollHistory;
    use crate::payroll::exporter::PayslipExporter;
    use actix_web::http::StatusCode;
    use actix_web::web::Data;
    use actix_web::{App, test};
    use std::net::SocketAddr;

    #[actix_web::test]
    async fn api_prefix_scopes_payroll_routes() {
        let config = Config {
            api_prefix: "/v1".to_string(),
            ..Config::default()
        };
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(PayrollHistory::default()))
                .app_data(Data::new(PayslipExporter::from_config(&config)))
                .configure(|cfg| configure(cfg, &config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/payroll")
            .peer_addr(peer)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/payroll")
            .peer_addr(peer)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn limiter_rejects_requests_past_the_burst() {
        let config = Config {
            rate_limit_per_min: 2,
            ..Config::default()
        };
        let peer: SocketAddr = "127.0.0.1:40001".parse().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(PayrollHistory::default()))
                .app_data(Data::new(PayslipExporter::from_config(&config)))
                .configure(|cfg| configure(cfg, &config)),
        )
        .await;

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let req = test::TestRequest::get()
                .uri("/api/payroll")
                .peer_addr(peer)
                .to_request();
            // the limiter answers with an error carrying its 429 response
            let status = match test::try_call_service(&app, req).await {
                Ok(resp) => resp.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            statuses.push(status);
        }
        assert_eq!(
            statuses,
            [StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }
}
