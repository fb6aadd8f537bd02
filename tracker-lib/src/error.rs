use crate::auth::credentials::CredentialError;
use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;
use tracker_repo::budget_repo::BudgetRepoError;
use tracker_repo::transaction_repo::TransactionRepoError;
use tracker_repo::user_repo::UserRepoError;
use tracker_repo::UserId;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    UserRepo(#[from] UserRepoError),
    #[error(transparent)]
    BudgetRepo(#[from] BudgetRepoError),
    #[error(transparent)]
    TransactionRepo(#[from] TransactionRepoError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("Unable to create token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    /// The authenticated user asked for another user's data.
    #[error("Not allowed to access user {0}")]
    Forbidden(UserId),
    #[error("Signups are disabled")]
    SignupsDisabled,
    #[error("{0}")]
    Unauthorized(&'static str),
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::UserRepo(UserRepoError::UserNotFound(_)) => StatusCode::NOT_FOUND,
            HandlerError::UserRepo(UserRepoError::EmailAlreadyExists(_)) => StatusCode::CONFLICT,
            HandlerError::BudgetRepo(BudgetRepoError::NoBudget(_))
            | HandlerError::BudgetRepo(BudgetRepoError::UserNotFound(_)) => StatusCode::NOT_FOUND,
            HandlerError::BudgetRepo(BudgetRepoError::InvalidAmount(_))
            | HandlerError::BudgetRepo(BudgetRepoError::OutOfRange(_)) => StatusCode::BAD_REQUEST,
            HandlerError::TransactionRepo(TransactionRepoError::TransactionNotFound(_))
            | HandlerError::TransactionRepo(TransactionRepoError::UserNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            HandlerError::TransactionRepo(TransactionRepoError::InvalidTransaction(_)) => {
                StatusCode::BAD_REQUEST
            }
            HandlerError::Credential(CredentialError::NotFound) => StatusCode::NOT_FOUND,
            HandlerError::Credential(CredentialError::InvalidCredentials) => {
                StatusCode::UNAUTHORIZED
            }
            HandlerError::Credential(CredentialError::DuplicateEmail(_)) => StatusCode::CONFLICT,
            HandlerError::Forbidden(_) | HandlerError::SignupsDisabled => StatusCode::FORBIDDEN,
            HandlerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = ?self, "Request failed");
            return HttpResponse::InternalServerError().body("Server error");
        }
        HttpResponse::build(status).body(self.to_string())
    }
}
