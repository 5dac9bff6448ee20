use super::*;
use crate::fake_api::{employee, ApiCall, FakeApi};
use shared::protocol::{PAGINATED_TRANSACTIONS_ROUTE, TRANSACTIONS_BY_EMPLOYEE_ROUTE};

fn coordinator() -> (Arc<FakeApi>, ViewCoordinator) {
    let api = Arc::new(FakeApi::three_pages());
    let coordinator = ViewCoordinator::new(api.clone());
    (api, coordinator)
}

fn ids(transactions: &[Transaction]) -> Vec<&str> {
    transactions.iter().map(|tx| tx.id.as_str()).collect()
}

#[tokio::test]
async fn bootstrap_loads_employees_and_first_page_once() {
    let (api, mut coordinator) = coordinator();

    assert!(coordinator.bootstrap().await.expect("bootstrap"));
    assert_eq!(coordinator.employees().map(<[Employee]>::len), Some(2));
    assert_eq!(ids(coordinator.transactions()), vec!["t1", "t2"]);

    assert!(!coordinator.bootstrap().await.expect("bootstrap"));
    assert_eq!(
        api.calls().await,
        vec![ApiCall::Employees, ApiCall::Page(Some(0))]
    );
}

#[tokio::test]
async fn load_all_runs_steps_in_order() {
    let (api, mut coordinator) = coordinator();
    coordinator
        .load_transactions_by_employee(&EmployeeId::new("E2"))
        .await
        .expect("by employee");

    coordinator.load_all_transactions().await.expect("load all");
    assert_eq!(
        api.calls().await,
        vec![
            ApiCall::ByEmployee(EmployeeId::new("E2")),
            ApiCall::Employees,
            ApiCall::Page(Some(0)),
        ]
    );
}

#[tokio::test]
async fn pages_concatenate_in_fetch_order_without_duplicates() {
    let (_api, mut coordinator) = coordinator();
    coordinator.load_all_transactions().await.expect("page 1");
    coordinator.load_all_transactions().await.expect("page 2");
    coordinator.load_all_transactions().await.expect("page 3");
    // Exhausted: further loads are no-ops for the list.
    coordinator.load_all_transactions().await.expect("no more");

    assert_eq!(
        ids(coordinator.transactions()),
        vec!["t1", "t2", "t3", "t4", "t5"]
    );
    assert!(!coordinator.has_more_pages());
}

#[tokio::test]
async fn view_more_twice_grows_by_page_two_then_page_three() {
    let (_api, mut coordinator) = coordinator();
    coordinator.bootstrap().await.expect("bootstrap");
    assert!(coordinator.has_more_pages());

    assert!(coordinator.load_more(1).await.expect("page 2"));
    assert_eq!(coordinator.transactions().len(), 4);
    assert_eq!(ids(&coordinator.transactions()[2..]), vec!["t3", "t4"]);

    assert!(coordinator.load_more(2).await.expect("page 3"));
    assert_eq!(coordinator.transactions().len(), 5);
    assert_eq!(ids(&coordinator.transactions()[4..]), vec!["t5"]);
    assert!(!coordinator.has_more_pages());
}

#[tokio::test]
async fn stale_load_more_is_discarded() {
    let (api, mut coordinator) = coordinator();
    coordinator.bootstrap().await.expect("bootstrap");

    assert!(coordinator.load_more(1).await.expect("page 2"));
    // A second click issued from the same snapshot still expects page 1.
    assert!(!coordinator.load_more(1).await.expect("stale"));
    assert_eq!(coordinator.transactions().len(), 4);
    assert_eq!(
        api.calls()
            .await
            .iter()
            .filter(|call| matches!(call, ApiCall::Page(_)))
            .count(),
        2
    );
}

#[tokio::test]
async fn selecting_employee_replaces_displayed_list() {
    let (api, mut coordinator) = coordinator();
    coordinator.bootstrap().await.expect("bootstrap");
    coordinator.load_more(1).await.expect("page 2");

    coordinator
        .on_employee_selected(&employee("E1"))
        .await
        .expect("select");

    assert_eq!(ids(coordinator.transactions()), vec!["t1", "t3", "t5"]);
    assert_eq!(
        coordinator.mode(),
        &QueryMode::ByEmployee(EmployeeId::new("E1"))
    );
    assert!(!coordinator.has_more_pages());
    assert_eq!(
        api.calls().await.last(),
        Some(&ApiCall::ByEmployee(EmployeeId::new("E1")))
    );
}

#[tokio::test]
async fn reselecting_all_employees_restarts_pagination_from_first_page() {
    let (api, mut coordinator) = coordinator();
    coordinator.bootstrap().await.expect("bootstrap");
    coordinator.load_more(1).await.expect("page 2");
    coordinator
        .on_employee_selected(&employee("E2"))
        .await
        .expect("select");

    coordinator
        .on_employee_selected(&Employee::all_employees())
        .await
        .expect("all");

    assert_eq!(ids(coordinator.transactions()), vec!["t1", "t2"]);
    assert_eq!(coordinator.mode(), &QueryMode::AllTransactions);
    assert!(coordinator.has_more_pages());
    assert_eq!(coordinator.snapshot().next_page, Some(1));
    assert_eq!(api.calls().await.last(), Some(&ApiCall::Page(Some(0))));
}

#[tokio::test]
async fn load_more_after_switching_to_employee_is_ignored() {
    let (_api, mut coordinator) = coordinator();
    coordinator.bootstrap().await.expect("bootstrap");
    coordinator
        .on_employee_selected(&employee("E1"))
        .await
        .expect("select");

    assert!(!coordinator.load_more(1).await.expect("stale"));
    assert_eq!(ids(coordinator.transactions()), vec!["t1", "t3", "t5"]);
}

#[tokio::test]
async fn view_more_hidden_when_last_page_is_empty_even_with_cursor() {
    let e1 = employee("E1");
    let api = Arc::new(FakeApi::new(
        vec![e1.clone()],
        vec![Vec::new(), vec![crate::fake_api::tx("t1", &e1)]],
    ));
    let mut coordinator = ViewCoordinator::new(api);
    coordinator.bootstrap().await.expect("bootstrap");

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.next_page, Some(1));
    assert!(!snapshot.has_more_pages);
}

#[tokio::test]
async fn failed_page_fetch_keeps_list_and_surfaces_dismissible_error() {
    let (api, mut coordinator) = coordinator();
    coordinator.bootstrap().await.expect("bootstrap");

    api.set_failing(PAGINATED_TRANSACTIONS_ROUTE, true).await;
    coordinator.load_more(1).await.expect_err("should fail");

    let snapshot = coordinator.snapshot();
    assert_eq!(ids(&snapshot.transactions), vec!["t1", "t2"]);
    assert!(!snapshot.paginated_loading);
    assert!(snapshot.has_more_pages);
    assert!(snapshot
        .error
        .as_deref()
        .is_some_and(|message| message.contains("simulated outage")));

    coordinator.dismiss_error();
    assert!(coordinator.error().is_none());

    api.set_failing(PAGINATED_TRANSACTIONS_ROUTE, false).await;
    assert!(coordinator.load_more(1).await.expect("retry"));
    assert_eq!(coordinator.transactions().len(), 4);
}

#[tokio::test]
async fn failed_employee_fetch_keeps_current_list() {
    let (api, mut coordinator) = coordinator();
    coordinator.bootstrap().await.expect("bootstrap");
    assert!(coordinator.load_more(1).await.expect("page 2"));

    api.set_failing(TRANSACTIONS_BY_EMPLOYEE_ROUTE, true).await;
    coordinator
        .on_employee_selected(&employee("E1"))
        .await
        .expect_err("should fail");

    assert_eq!(ids(coordinator.transactions()), vec!["t1", "t2", "t3", "t4"]);
    assert!(!coordinator.snapshot().by_employee_loading);
    assert!(coordinator.error().is_some());
    assert_eq!(coordinator.mode(), &QueryMode::AllTransactions);
    assert!(coordinator.has_more_pages());
    assert_eq!(coordinator.snapshot().next_page, Some(2));
}

#[tokio::test]
async fn paging_resumes_after_failed_employee_fetch() {
    let (api, mut coordinator) = coordinator();
    coordinator.bootstrap().await.expect("bootstrap");
    assert!(coordinator.load_more(1).await.expect("page 2"));

    api.set_failing(TRANSACTIONS_BY_EMPLOYEE_ROUTE, true).await;
    coordinator
        .on_employee_selected(&employee("E1"))
        .await
        .expect_err("should fail");

    assert!(coordinator.load_more(2).await.expect("page 3"));
    assert_eq!(
        ids(coordinator.transactions()),
        vec!["t1", "t2", "t3", "t4", "t5"]
    );
    assert!(coordinator.error().is_none());
    assert!(!coordinator.has_more_pages());
}

#[tokio::test]
async fn subscribers_observe_loading_flags_and_final_state() {
    let (_api, mut coordinator) = coordinator();
    let mut rx = coordinator.subscribe();
    assert!(rx.borrow_and_update().transactions.is_empty());

    coordinator.bootstrap().await.expect("bootstrap");

    assert!(rx.has_changed().expect("sender alive"));
    let latest = rx.borrow_and_update().clone();
    assert_eq!(latest.transactions.len(), 2);
    assert!(!latest.employees_loading);
    assert!(!latest.transactions_loading());
    assert!(latest.has_more_pages);
}

#[tokio::test]
async fn approval_updates_displayed_row_in_place() {
    let (api, mut coordinator) = coordinator();
    coordinator.bootstrap().await.expect("bootstrap");

    coordinator
        .set_transaction_approval(&TransactionId::new("t2"), true)
        .await
        .expect("approve");

    assert!(coordinator.transactions()[1].approved);
    assert!(!coordinator.transactions()[0].approved);
    assert_eq!(
        api.calls().await.last(),
        Some(&ApiCall::Approval(TransactionId::new("t2"), true))
    );
}
