use crate::auth::authorize;
use crate::error::HandlerError;
use actix_web::{web, HttpResponse, Responder};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracker_repo::transaction_repo::{Filter, NewTransaction, TransactionKind, TransactionRepo};
use tracker_repo::UserId;

#[derive(Deserialize)]
pub struct TransactionQuery {
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub user_id: UserId,
    pub amount: Decimal,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: Option<String>,
}

#[get("/{user_id}")]
pub async fn get_all_transactions(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    authenticated: web::ReqData<UserId>,
    user_id: web::Path<UserId>,
    query: web::Query<TransactionQuery>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    authorize(&authenticated, user_id)?;

    let filter = Filter {
        kind: query.into_inner().kind,
    };
    let transactions = transaction_repo
        .get_all_transactions(user_id, filter)
        .await?;
    Ok(HttpResponse::Ok().json(transactions))
}

#[post("")]
pub async fn create_new_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    authenticated: web::ReqData<UserId>,
    request: web::Json<CreateTransactionRequest>,
) -> Result<impl Responder, HandlerError> {
    let request = request.into_inner();
    authorize(&authenticated, request.user_id)?;

    let new_transaction = NewTransaction::new(
        request.amount,
        request.description,
        request.kind,
        request.category,
    );
    transaction_repo
        .record_transaction(request.user_id, new_transaction)
        .await?;
    Ok(HttpResponse::Ok().body("Transaction added successfully"))
}

#[delete("/{transaction_id}")]
pub async fn delete_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    transaction_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    transaction_repo
        .delete_transaction(user_id.into_inner(), transaction_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().body("Transaction deleted"))
}
