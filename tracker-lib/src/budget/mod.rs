use actix_web::{web, Scope};

mod handlers;

pub fn budget_service() -> Scope {
    web::scope("/budget")
        .service(handlers::get_balance)
        .service(handlers::set_budget)
        .service(handlers::deduct)
        .service(handlers::restore)
}
