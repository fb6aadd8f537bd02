use fake::faker::lorem::en::Sentence;
use fake::Fake;
use rand::Rng;
use rust_decimal::Decimal;
use tracker_repo::transaction_repo::{NewTransaction, TransactionKind};

#[allow(dead_code)]
pub fn generate_amount() -> Decimal {
    Decimal::new(rand::thread_rng().gen_range(1..100_000), 2)
}

#[allow(dead_code)]
pub fn generate_description() -> String {
    Sentence(1..4).fake()
}

#[allow(dead_code)]
pub fn generate_new_transaction(kind: TransactionKind) -> NewTransaction {
    NewTransaction::new(generate_amount(), generate_description(), kind, None)
}

#[allow(dead_code)]
pub fn generate_expense_with_amount(amount: Decimal) -> NewTransaction {
    NewTransaction::expense(amount, generate_description())
}
