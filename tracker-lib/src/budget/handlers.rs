use crate::auth::authorize;
use crate::error::HandlerError;
use actix_web::{web, HttpResponse, Responder};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracker_repo::budget_repo::BudgetRepo;
use tracker_repo::UserId;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBudgetRequest {
    pub amount: Decimal,
    pub user_id: UserId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductRequest {
    pub user_id: UserId,
    pub expense: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRequest {
    pub user_id: UserId,
    pub restore_amount: Decimal,
}

#[get("/{user_id}")]
pub async fn get_balance(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    authenticated: web::ReqData<UserId>,
    user_id: web::Path<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    authorize(&authenticated, user_id)?;

    let balance = budget_repo.get_balance(user_id).await?;
    Ok(HttpResponse::Ok().json(balance))
}

#[post("")]
pub async fn set_budget(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    authenticated: web::ReqData<UserId>,
    request: web::Json<SetBudgetRequest>,
) -> Result<impl Responder, HandlerError> {
    authorize(&authenticated, request.user_id)?;

    budget_repo.set_budget(request.user_id, request.amount).await?;
    Ok(HttpResponse::Ok().body("Budget saved successfully"))
}

/// Lowers the available balance without logging a transaction.
#[post("/deduct")]
pub async fn deduct(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    authenticated: web::ReqData<UserId>,
    request: web::Json<DeductRequest>,
) -> Result<impl Responder, HandlerError> {
    authorize(&authenticated, request.user_id)?;

    budget_repo.deduct(request.user_id, request.expense).await?;
    Ok(HttpResponse::Ok().body("Budget deducted"))
}

#[post("/restore")]
pub async fn restore(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    authenticated: web::ReqData<UserId>,
    request: web::Json<RestoreRequest>,
) -> Result<impl Responder, HandlerError> {
    authorize(&authenticated, request.user_id)?;

    budget_repo
        .restore(request.user_id, request.restore_amount)
        .await?;
    Ok(HttpResponse::Ok().body("Budget restored"))
}
