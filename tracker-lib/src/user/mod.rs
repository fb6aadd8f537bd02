use actix_web::{web, Scope};

mod handlers;

pub fn user_service() -> Scope {
    web::scope("/user")
        .service(handlers::get_profile)
        .service(handlers::update_profile)
        .service(handlers::change_password)
        .service(handlers::delete_user)
}
