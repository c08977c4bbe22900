use actix_web::web;

pub mod backend_health;
pub mod matches;
pub mod reports;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    // Reads are public, writes carry the AuthMiddleware on their route
    cfg.service(matches::create_match)
        .service(matches::get_all_matches)
        .service(matches::get_match)
        .service(matches::report_result)
        .service(matches::get_match_result)
        .service(matches::get_match_report)
        .service(matches::delete_match);

    cfg.service(reports::get_all_match_reports)
        .service(reports::get_standings)
        .service(reports::get_top_scorers);
}
