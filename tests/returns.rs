mod support;

use rental_store::{
    model::ReturnResult,
    notify::Severity,
    returns::{self, ReturnsError, Selection},
    ApiError,
};
use support::{rental, MockApi};

fn api_with_rentals() -> MockApi {
    let api = MockApi::default();
    api.rentals
        .lock()
        .unwrap()
        .insert(9, vec![rental(11, 1), rental(12, 2), rental(13, 3)]);
    api
}

#[tokio::test]
async fn blank_customer_is_rejected_locally() {
    let api = api_with_rentals();

    let error = returns::lookup(&api, "   ").await.unwrap_err();

    assert_eq!(error, ReturnsError::Validation("enter a customer id".into()));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn lookup_lists_active_rentals() {
    let api = api_with_rentals();

    let rentals = returns::lookup(&api, "9").await.unwrap();

    let ids: Vec<_> = rentals.iter().map(|rental| rental.rental_id).collect();
    assert_eq!(ids, [11, 12, 13]);
    assert_eq!(rentals[0].rented_on_label(), "2005-05-24");
}

#[tokio::test]
async fn lookup_failure_is_reported_as_customer_error() {
    let api = MockApi {
        lookup_error: Some(ApiError::Status {
            status: 404,
            message: "Cliente no encontrado".into(),
        }),
        ..MockApi::default()
    };

    let error = returns::lookup(&api, "9").await.unwrap_err();

    assert!(matches!(error, ReturnsError::CustomerNotFound(_)));
    assert_eq!(error.notification().severity, Severity::Error);
}

#[tokio::test]
async fn empty_selection_makes_no_request() {
    let api = api_with_rentals();

    let error = returns::submit(&api, "9", &Selection::default())
        .await
        .unwrap_err();

    assert!(matches!(error, ReturnsError::Validation(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn return_refreshes_the_active_list() {
    let api = api_with_rentals();
    let mut selection = Selection::default();
    selection.toggle(13);
    selection.toggle(11);

    let returned = returns::submit(&api, "9", &selection).await.unwrap();

    assert_eq!(*api.returned.lock().unwrap(), [vec![13, 11]]);
    assert_eq!(returned.result.updated_count, Some(2));
    let remaining: Vec<_> = returned
        .rentals
        .unwrap()
        .iter()
        .map(|rental| rental.rental_id)
        .collect();
    assert_eq!(remaining, [12]);
    assert_eq!(api.calls(), ["returns", "rentals 9"]);
}

#[tokio::test]
async fn rejected_return_keeps_the_message() {
    let api = MockApi {
        return_result: Some(Ok(ReturnResult {
            success: false,
            message: Some("rental 11 already returned".into()),
            updated_count: Some(0),
        })),
        ..api_with_rentals()
    };
    let mut selection = Selection::default();
    selection.toggle(11);

    let error = returns::submit(&api, "9", &selection).await.unwrap_err();

    assert_eq!(
        error,
        ReturnsError::Return("rental 11 already returned".into())
    );
    assert_eq!(api.count("rentals"), 0);
}

#[tokio::test]
async fn transport_failure_during_return() {
    let api = MockApi {
        return_result: Some(Err(ApiError::Timeout)),
        ..api_with_rentals()
    };
    let mut selection = Selection::default();
    selection.toggle(12);

    let error = returns::submit(&api, "9", &selection).await.unwrap_err();

    assert!(matches!(error, ReturnsError::Return(message) if message.contains("timed out")));
}

#[tokio::test]
async fn failed_refresh_still_reports_the_return() {
    let api = MockApi {
        lookup_error: Some(ApiError::Connection("refused".into())),
        ..api_with_rentals()
    };
    let mut selection = Selection::default();
    selection.toggle(12);

    let returned = returns::submit(&api, "9", &selection).await.unwrap();

    assert!(returned.rentals.is_none());
    assert_eq!(returned.notification().severity, Severity::Success);
}

#[test]
fn selection_forgets_returned_rentals() {
    let mut selection = Selection::default();
    selection.toggle(11);
    selection.toggle(12);

    selection.retain_active(&[rental(12, 2), rental(13, 3)]);

    assert_eq!(selection.ids(), [12]);
}
