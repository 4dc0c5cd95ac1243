use std::time::{Duration, Instant};

use loancalc::prelude::*;
use rust_decimal_macros::dec;

fn controller() -> FormController {
    FormController::new(ControllerConfig::default()).unwrap()
}

fn type_into(c: &mut FormController, field: FieldId, value: &str) {
    // Keystrokes first, then the committed value.
    let mut typed = String::new();
    for ch in value.chars() {
        typed.push(ch);
        c.input(field, typed.clone());
    }
    c.change(field, value);
}

fn fill_happy_path(c: &mut FormController) {
    type_into(c, FieldId::StartDate, "2024-01-10");
    type_into(c, FieldId::EndDate, "2024-06-10");
    type_into(c, FieldId::FirstPaymentDate, "2024-01-15");
    type_into(c, FieldId::LoanAmount, "10000");
    type_into(c, FieldId::InterestRate, "2");
}

#[test]
fn test_happy_path_payload() {
    let mut c = controller();
    fill_happy_path(&mut c);

    assert!(c.submit_enabled());
    assert!(c.form().fields().all(|f| f.state == FieldState::Valid));

    let request = c.begin_submit().unwrap();
    assert_eq!(request.start_date, "2024-01-10");
    assert_eq!(request.end_date, "2024-06-10");
    assert_eq!(request.first_payment_date, "2024-01-15");
    assert_eq!(request.loan_amount, dec!(10000));
    assert_eq!(request.interest_rate, dec!(2));
    assert_eq!(request.installment_count, None);

    let body = request.to_json(WireFormat::Standard);
    assert_eq!(
        body,
        serde_json::json!({
            "startDate": "2024-01-10",
            "endDate": "2024-06-10",
            "firstPaymentDate": "2024-01-15",
            "loanAmount": 10000.0,
            "interestRate": 2.0
        })
    );
}

#[test]
fn test_end_before_start_disables_submit() {
    let mut c = controller();
    c.change(FieldId::StartDate, "2024-01-10");
    c.change(FieldId::EndDate, "2024-01-05");

    let end = c.field(FieldId::EndDate).unwrap();
    assert_eq!(end.state, FieldState::Invalid);
    assert_eq!(end.error.as_deref(), Some(messages::END_BEFORE_START));
    assert!(!c.submit_enabled());

    // Fill the rest; the gate stays closed.
    c.change(FieldId::FirstPaymentDate, "2024-01-15");
    c.change(FieldId::LoanAmount, "10000");
    c.change(FieldId::InterestRate, "2");
    assert!(!c.submit_enabled());

    // Correcting the end date reopens it.
    c.change(FieldId::EndDate, "2024-06-10");
    assert_eq!(c.field(FieldId::EndDate).unwrap().state, FieldState::Valid);
    assert_eq!(c.field(FieldId::EndDate).unwrap().error, None);
    assert!(c.submit_enabled());
}

#[test]
fn test_first_payment_outside_range() {
    let mut c = controller();
    fill_happy_path(&mut c);

    c.change(FieldId::FirstPaymentDate, "2024-01-10");
    let first = c.field(FieldId::FirstPaymentDate).unwrap();
    assert_eq!(first.state, FieldState::Invalid);
    assert_eq!(first.error.as_deref(), Some(messages::FIRST_PAYMENT_OUT_OF_RANGE));
    assert!(!c.submit_enabled());

    // Equal to the end date is allowed.
    c.change(FieldId::FirstPaymentDate, "2024-06-10");
    assert!(c.submit_enabled());
}

#[test]
fn test_business_failure_alert_hides_after_five_seconds() {
    let mut c = controller();
    fill_happy_path(&mut c);
    let t0 = Instant::now();
    c.begin_submit().unwrap();
    assert!(c.is_loading());

    let response: CalculationResponse =
        serde_json::from_str(r#"{"success": false, "message": "insufficient data"}"#).unwrap();
    c.finish_submit(Ok(response), t0);

    assert!(!c.is_loading());
    assert_eq!(c.alerts().visible(), AlertKind::Error);
    assert_eq!(c.alerts().message(), Some("insufficient data"));
    assert!(!c.results().visible);

    c.tick(t0 + Duration::from_millis(4999));
    assert_eq!(c.alerts().visible(), AlertKind::Error);
    c.tick(t0 + Duration::from_millis(5000));
    assert_eq!(c.alerts().visible(), AlertKind::None);

    // The form is still usable.
    assert!(c.submit_enabled());
}

#[test]
fn test_business_failure_without_message_uses_fallback() {
    let mut c = controller();
    fill_happy_path(&mut c);
    let t0 = Instant::now();
    c.begin_submit().unwrap();
    c.finish_submit(Ok(serde_json::from_str(r#"{"success": false}"#).unwrap()), t0);
    assert_eq!(c.alerts().message(), Some(messages::CALCULATION_FAILED));
}

#[test]
fn test_no_response_shows_connection_message() {
    let mut c = controller();
    fill_happy_path(&mut c);
    let t0 = Instant::now();
    c.begin_submit().unwrap();
    c.finish_submit(Err(TransportFailure::no_response("connection refused")), t0);

    assert!(!c.is_loading());
    assert_eq!(c.alerts().visible(), AlertKind::Error);
    assert_eq!(c.alerts().message(), Some(messages::CONNECTION_FAILED));
}

#[test]
fn test_http_error_message_classification() {
    let mut c = controller();
    fill_happy_path(&mut c);
    let t0 = Instant::now();

    c.begin_submit().unwrap();
    c.finish_submit(
        Err(TransportFailure::with_status(
            400,
            "Bad Request",
            Some(r#"{"success":false,"message":"rate too high"}"#.to_string()),
        )),
        t0,
    );
    assert_eq!(c.alerts().message(), Some("rate too high"));

    c.begin_submit().unwrap();
    c.finish_submit(
        Err(TransportFailure::with_status(500, "Internal Server Error", None)),
        t0,
    );
    assert_eq!(c.alerts().message(), Some("Error 500: Internal Server Error"));
}

#[test]
fn test_reset_after_failed_validation() {
    let mut c = controller();
    c.change(FieldId::StartDate, "2024-01-10");
    c.change(FieldId::EndDate, "2024-01-05");
    c.change(FieldId::LoanAmount, "-3");

    let err = c.begin_submit().unwrap_err();
    assert!(matches!(err, LoanError::InvalidForm { .. }));
    assert!(!c.is_loading());

    c.reset();
    for field in c.form().fields() {
        assert_eq!(field.value, "");
        assert_eq!(field.state, FieldState::Pristine);
        assert_eq!(field.error, None);
    }
    assert!(!c.results().visible);
    assert!(c.results().rows.is_empty());
    assert_eq!(c.alerts().visible(), AlertKind::None);
    assert!(!c.submit_enabled());
}

#[test]
fn test_reset_hides_results_and_success_alert() {
    let mut c = controller();
    fill_happy_path(&mut c);
    let t0 = Instant::now();
    c.begin_submit().unwrap();
    c.finish_submit(Ok(CalculationResponse::succeeded(vec![ScheduleRow::default()])), t0);
    assert!(c.results().visible);

    c.reset();
    assert!(!c.results().visible);
    assert_eq!(c.alerts().visible(), AlertKind::None);
}

#[test]
fn test_submit_reports_every_invalid_field() {
    let mut c = controller();
    let err = c.begin_submit().unwrap_err();
    assert_eq!(
        err,
        LoanError::InvalidForm {
            fields: FormLayout::Basic.fields().to_vec()
        }
    );
    for field in c.form().fields() {
        assert_eq!(field.error.as_deref(), Some(messages::REQUIRED));
    }
}

#[test]
fn test_installment_layout() {
    let config = ControllerConfig::default().with_layout(FormLayout::with_installments());
    let mut c = FormController::new(config).unwrap();
    fill_happy_path(&mut c);
    assert!(c.submit_enabled());

    c.change(FieldId::InstallmentCount, "1.5");
    assert_eq!(
        c.field(FieldId::InstallmentCount).unwrap().error.as_deref(),
        Some(messages::NOT_A_WHOLE_NUMBER)
    );
    assert!(!c.submit_enabled());

    c.change(FieldId::InstallmentCount, "6");
    let request = c.begin_submit().unwrap();
    assert_eq!(request.installment_count, Some(6));
    assert_eq!(request.to_json(WireFormat::Standard)["installmentCount"], 6);
}

#[test]
fn test_basic_layout_ignores_installment_events() {
    let mut c = controller();
    c.change(FieldId::InstallmentCount, "12");
    assert!(c.field(FieldId::InstallmentCount).is_none());
}
