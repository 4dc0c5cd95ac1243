use std::time::Instant;

use loancalc::prelude::*;
use loancalc::dates::format_competence_date;
use rust_decimal_macros::dec;

fn filled_controller() -> FormController {
    let mut c = FormController::new(ControllerConfig::default()).unwrap();
    c.change(FieldId::StartDate, "2024-01-10");
    c.change(FieldId::EndDate, "2024-06-10");
    c.change(FieldId::FirstPaymentDate, "2024-01-15");
    c.change(FieldId::LoanAmount, "10000");
    c.change(FieldId::InterestRate, "2");
    c
}

#[test]
fn test_server_rows_render_in_column_order() {
    let body = r#"{
        "success": true,
        "rows": [
            {
                "competenceDate": "2024-01-10",
                "loanAmount": 10000,
                "outstandingBalance": 10000,
                "consolidatedFlag": null,
                "total": 0,
                "amortization": 0,
                "balance": 10000,
                "provision": 0,
                "accruedInterest": 0,
                "paid": 0
            },
            {
                "competenceDate": [2024, 3, 1],
                "loanAmount": 0,
                "outstandingBalance": 8342.18,
                "consolidatedFlag": "01/2024",
                "total": 1689.9,
                "amortization": 1657.83,
                "balance": 8342.17,
                "provision": 32.07,
                "accruedInterest": 32.07,
                "paid": 1689.9
            }
        ]
    }"#;
    let response: CalculationResponse = serde_json::from_str(body).unwrap();

    let mut c = filled_controller();
    let t0 = Instant::now();
    c.begin_submit().unwrap();
    c.finish_submit(Ok(response), t0);

    assert!(c.results().visible);
    assert!(c.take_scroll_request());
    assert_eq!(c.alerts().visible(), AlertKind::Success);

    let rows = &c.results().rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].competence(), "10/01/2024");
    assert_eq!(rows[0].cells[3], "");
    assert_eq!(rows[0].cells[4], "R$ 0,00");

    assert_eq!(
        rows[1].cells,
        [
            "01/03/2024",
            "R$ 0,00",
            "R$ 8.342,18",
            "01/2024",
            "R$ 1.689,90",
            "R$ 1.657,83",
            "R$ 8.342,17",
            "R$ 32,07",
            "R$ 32,07",
            "R$ 1.689,90",
        ]
        .map(String::from)
    );
}

#[test]
fn test_legacy_rows_render() {
    let body = r#"{
        "success": true,
        "rows": [{
            "dataCompetencia": [2024, 2, 29],
            "valorEmprestimo": 5000.5,
            "saldoDevedor": null,
            "consolidada": "Sim",
            "total": 12.3,
            "amortizacao": 0,
            "saldo": 0,
            "provisao": 0,
            "jurosAcumulado": 0,
            "pago": 0
        }]
    }"#;
    let response: CalculationResponse = serde_json::from_str(body).unwrap();
    let rows = response.rows.unwrap();

    let rendered = loancalc::format::render_rows(&rows, &BrlFormatter::new().unwrap());
    assert_eq!(rendered[0].competence(), "29/02/2024");
    assert_eq!(rendered[0].cells[1], "R$ 5.000,50");
    assert_eq!(rendered[0].cells[2], "R$ 0,00");
    assert_eq!(rendered[0].cells[3], "Sim");
}

#[test]
fn test_competence_date_never_shifts_a_day() {
    for text in ["2024-03-01", "2024-03-01T00:00:00", "2024-03-01T00:00:00-03:00"] {
        let date = CompetenceDate::Text(text.to_string());
        assert_eq!(format_competence_date(Some(&date)), "01/03/2024", "{text}");
    }
    let triplet = CompetenceDate::Triplet(2024, 3, 1);
    assert_eq!(format_competence_date(Some(&triplet)), "01/03/2024");
}

#[test]
fn test_unusable_competence_date() {
    assert_eq!(format_competence_date(None), messages::INVALID_DATE);
    let bogus = CompetenceDate::Triplet(2024, 13, 1);
    assert_eq!(format_competence_date(Some(&bogus)), messages::INVALID_DATE);
}

#[test]
fn test_zero_currency_literal() {
    let brl = BrlFormatter::new().unwrap();
    assert_eq!(brl.format_currency(None), "R$ 0,00");
    assert_eq!(brl.format_currency(Some(dec!(0))), "R$ 0,00");
    assert!(!brl.format_currency(Some(dec!(0))).contains("NaN"));
}

#[test]
fn test_schedule_columns() {
    assert_eq!(SCHEDULE_COLUMNS.len(), 10);
    assert_eq!(SCHEDULE_COLUMNS[0], "Competence");
    assert_eq!(SCHEDULE_COLUMNS[9], "Paid");
}

#[test]
fn test_odd_server_cells_keep_the_table() {
    let body = r#"{
        "success": true,
        "rows": [
            {"competenceDate": 20240301, "loanAmount": 10},
            {"competenceDate": [2024, 3], "loanAmount": 1e30, "paid": 5}
        ]
    }"#;
    let response: CalculationResponse = serde_json::from_str(body).unwrap();

    let mut c = filled_controller();
    c.begin_submit().unwrap();
    c.finish_submit(Ok(response), Instant::now());

    assert_eq!(c.alerts().visible(), AlertKind::Success);
    let rows = &c.results().rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].competence(), messages::INVALID_DATE);
    assert_eq!(rows[0].cells[1], "R$ 10,00");
    assert_eq!(rows[1].competence(), messages::INVALID_DATE);
    assert_eq!(rows[1].cells[1], "R$ 0,00");
    assert_eq!(rows[1].cells[9], "R$ 5,00");
}
