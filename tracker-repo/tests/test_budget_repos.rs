mod utils;

use rstest::rstest;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracker_repo::budget_repo::{Balance, BudgetRepoError};
use utils::test_user::TestUser;
use utils::RepoType;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_balance_without_budget(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;

    assert_eq!(repos.budgets.get_current_budget(user.id).await.unwrap(), None);
    assert_eq!(
        repos.budgets.get_balance(user.id).await.unwrap(),
        Balance::default()
    );

    user.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_set_budget(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;

    let budget = repos
        .budgets
        .set_budget(user.id, Decimal::from(1000))
        .await
        .unwrap();
    assert_eq!(budget.user_id, user.id);
    assert_eq!(budget.total, Decimal::from(1000));
    assert_eq!(budget.available, Decimal::from(1000));

    assert_eq!(
        repos.budgets.get_balance(user.id).await.unwrap(),
        Balance {
            total: Decimal::from(1000),
            available: Decimal::from(1000),
        }
    );

    user.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_latest_budget_is_current(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;

    let first = repos
        .budgets
        .set_budget(user.id, Decimal::from(1000))
        .await
        .unwrap();
    let second = repos
        .budgets
        .set_budget(user.id, dec("250.50"))
        .await
        .unwrap();
    assert!(second.id > first.id);

    let current = repos
        .budgets
        .get_current_budget(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current, second);

    user.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_budgets_are_per_user(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user1 = TestUser::new(&repos.users).await;
    let user2 = TestUser::new(&repos.users).await;

    repos
        .budgets
        .set_budget(user1.id, Decimal::from(100))
        .await
        .unwrap();
    repos
        .budgets
        .set_budget(user2.id, Decimal::from(200))
        .await
        .unwrap();
    repos
        .budgets
        .deduct(user1.id, Decimal::from(40))
        .await
        .unwrap();

    assert_eq!(
        repos.budgets.get_balance(user1.id).await.unwrap().available,
        Decimal::from(60)
    );
    assert_eq!(
        repos.budgets.get_balance(user2.id).await.unwrap().available,
        Decimal::from(200)
    );

    user1.delete().await;
    user2.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_deduct_and_restore(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;
    repos
        .budgets
        .set_budget(user.id, Decimal::from(1000))
        .await
        .unwrap();

    let budget = repos
        .budgets
        .deduct(user.id, dec("199.99"))
        .await
        .unwrap();
    assert_eq!(budget.total, Decimal::from(1000));
    assert_eq!(budget.available, dec("800.01"));

    let budget = repos
        .budgets
        .restore(user.id, dec("99.99"))
        .await
        .unwrap();
    assert_eq!(budget.available, Decimal::from(900));

    user.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_available_can_go_negative(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;
    repos
        .budgets
        .set_budget(user.id, Decimal::from(10))
        .await
        .unwrap();

    let budget = repos
        .budgets
        .deduct(user.id, Decimal::from(25))
        .await
        .unwrap();
    assert_eq!(budget.available, Decimal::from(-15));

    user.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_adjust_without_budget(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;

    let result = repos.budgets.deduct(user.id, Decimal::from(5)).await;
    assert!(matches!(result, Err(BudgetRepoError::NoBudget(id)) if id == user.id));
    let result = repos.budgets.restore(user.id, Decimal::from(5)).await;
    assert!(matches!(result, Err(BudgetRepoError::NoBudget(_))));

    user.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_negative_amounts_rejected(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;

    let result = repos.budgets.set_budget(user.id, Decimal::from(-1)).await;
    assert!(matches!(result, Err(BudgetRepoError::InvalidAmount(_))));
    assert_eq!(repos.budgets.get_current_budget(user.id).await.unwrap(), None);

    repos
        .budgets
        .set_budget(user.id, Decimal::ZERO)
        .await
        .unwrap();
    let result = repos.budgets.deduct(user.id, Decimal::from(-1)).await;
    assert!(matches!(result, Err(BudgetRepoError::InvalidAmount(_))));

    user.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_set_budget_for_unknown_user(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };

    let result = repos.budgets.set_budget(-1, Decimal::from(10)).await;
    assert!(matches!(result, Err(BudgetRepoError::UserNotFound(-1))));
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_amounts_rounded_to_cents(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;

    let budget = repos
        .budgets
        .set_budget(user.id, dec("100.005"))
        .await
        .unwrap();
    assert_eq!(budget.total, dec("100.01"));
    assert_eq!(budget.available, dec("100.01"));

    user.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_amounts_beyond_storage_rejected(
    #[case] repo_type: RepoType,
    #[values("100000000", "99999999.995", "79228162514264337593543950335")] amount: &str,
) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;

    let result = repos.budgets.set_budget(user.id, dec(amount)).await;
    assert!(matches!(result, Err(BudgetRepoError::InvalidAmount(_))));
    assert_eq!(repos.budgets.get_current_budget(user.id).await.unwrap(), None);

    repos.budgets.set_budget(user.id, dec("10")).await.unwrap();
    let result = repos.budgets.restore(user.id, dec(amount)).await;
    assert!(matches!(result, Err(BudgetRepoError::InvalidAmount(_))));
    let result = repos.budgets.deduct(user.id, dec(amount)).await;
    assert!(matches!(result, Err(BudgetRepoError::InvalidAmount(_))));

    user.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_available_overflow_leaves_repo_usable(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;
    let largest = dec("99999999.99");

    repos.budgets.set_budget(user.id, largest).await.unwrap();
    let result = repos.budgets.restore(user.id, dec("1")).await;
    assert!(matches!(result, Err(BudgetRepoError::OutOfRange(id)) if id == user.id));

    assert_eq!(
        repos.budgets.get_balance(user.id).await.unwrap(),
        Balance {
            total: largest,
            available: largest,
        }
    );
    assert!(repos.users.get_user(user.id).await.is_ok());

    let budget = repos.budgets.deduct(user.id, largest).await.unwrap();
    assert_eq!(budget.available, Decimal::ZERO);

    user.delete().await;
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_amounts_keep_two_decimal_places(#[case] repo_type: RepoType) {
    let Some(repos) = utils::build_repos(repo_type).await else {
        return;
    };
    let user = TestUser::new(&repos.users).await;

    let balance = repos.budgets.get_balance(user.id).await.unwrap();
    assert_eq!(balance.total.to_string(), "0.00");
    assert_eq!(balance.available.to_string(), "0.00");

    repos
        .budgets
        .set_budget(user.id, Decimal::from(1000))
        .await
        .unwrap();
    let budget = repos.budgets.deduct(user.id, dec("2.5")).await.unwrap();
    assert_eq!(budget.total.to_string(), "1000.00");
    assert_eq!(budget.available.to_string(), "997.50");

    user.delete().await;
}
