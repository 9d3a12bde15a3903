mod common;

use billing_engine::{export, BillingError, StaffKind, NurseLevel};
use common::{datetime, october, World};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn test_salary_combines_hours_rate_and_bonuses() {
    let world = World::new();
    let doctor = world.add_doctor("Dr. Amina Hassan", dec!(120)).await;
    let patient = world.add_patient("John Doe", "2023-10-01").await;
    let intubation = world.add_intervention_type("Intubation", dec!(150)).await;

    world
        .staff_costs
        .shifts()
        .add_shift(
            doctor,
            Some(patient),
            datetime("2023-10-01 08:00:00"),
            datetime("2023-10-01 16:00:00"),
        )
        .await
        .unwrap();
    world
        .staff_costs
        .interventions()
        .add_event(doctor, patient, common::date("2023-10-01"), intubation)
        .await
        .unwrap();

    let statement = world
        .staff_costs
        .calculate_salary(doctor, &october())
        .await
        .unwrap();
    assert_eq!(statement.total_hours, dec!(8.00));
    assert_eq!(statement.base_salary, dec!(960));
    assert_eq!(statement.total_bonus, dec!(150));
    assert_eq!(statement.total_salary, dec!(1110));
    assert_eq!(
        statement.total_salary,
        statement.base_salary + statement.total_bonus
    );

    assert_eq!(statement.shift_details.len(), 1);
    assert_eq!(
        statement.shift_details[0].patient.as_deref(),
        Some("John Doe")
    );
    assert_eq!(statement.intervention_details.len(), 1);
    assert_eq!(statement.intervention_details[0].intervention, "Intubation");
}

#[tokio::test]
async fn test_unknown_staff_member_is_an_error_not_zero() {
    let world = World::new();
    let err = world
        .staff_costs
        .calculate_salary(Uuid::new_v4(), &october())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BillingError::NotFound {
            kind: "staff member",
            ..
        }
    ));
}

#[tokio::test]
async fn test_salary_sheet_rows_match_the_statement() {
    let world = World::new();
    let nurse = world
        .add_nurse("Nurse Lena Fischer", NurseLevel::Icu, dec!(45))
        .await;
    world
        .staff_costs
        .shifts()
        .add_shift(
            nurse,
            None,
            datetime("2023-10-03 20:00:00"),
            datetime("2023-10-04 06:00:00"),
        )
        .await
        .unwrap();

    let statement = world
        .staff_costs
        .calculate_salary(nurse, &october())
        .await
        .unwrap();
    let mut buffer = export::RowBuffer::default();
    export::salary_sheet(&statement, &october(), &mut buffer).unwrap();

    assert_eq!(buffer.rows[0], vec!["Nurse Salary Sheet".to_string()]);
    let total_row = buffer
        .rows
        .iter()
        .find(|r| r.first().map(String::as_str) == Some("Total Salary:"))
        .unwrap();
    assert_eq!(total_row[1], "$450.00");
    let shift_row = buffer
        .rows
        .iter()
        .find(|r| r.first().map(String::as_str) == Some("2023-10-03 20:00:00"))
        .unwrap();
    assert_eq!(shift_row[2], "N/A");
}

#[tokio::test]
async fn test_payment_snapshot_and_mark_paid() {
    let world = World::new();
    let doctor = world.add_doctor("Dr. Omar Said", dec!(100)).await;
    world
        .staff_costs
        .shifts()
        .add_shift(
            doctor,
            None,
            datetime("2023-10-02 08:00:00"),
            datetime("2023-10-02 12:00:00"),
        )
        .await
        .unwrap();

    let payment = world
        .staff_costs
        .record_payment(doctor, &october())
        .await
        .unwrap();
    assert_eq!(payment.record.total_salary, dec!(400));
    assert!(!payment.record.paid);
    assert!(payment.record.paid_date.is_none());

    world.staff_costs.mark_paid(payment.id).await.unwrap();
    let history = world.staff_costs.payments_for(doctor).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].record.paid);
    assert!(history[0].record.paid_date.is_some());

    let err = world.staff_costs.mark_paid(payment.id).await.unwrap_err();
    assert!(matches!(err, BillingError::Validation(_)));
}

#[tokio::test]
async fn test_removing_staff_cascades_to_their_records() {
    let world = World::new();
    let doctor = world.add_doctor("Dr. Yusuf Khan", dec!(110)).await;
    let patient = world.add_patient("Mary Poppins", "2023-10-01").await;
    let suture = world.add_intervention_type("Suture", dec!(80)).await;

    world
        .staff_costs
        .shifts()
        .add_shift(
            doctor,
            Some(patient),
            datetime("2023-10-05 08:00:00"),
            datetime("2023-10-05 16:00:00"),
        )
        .await
        .unwrap();
    world
        .staff_costs
        .interventions()
        .add_event(doctor, patient, common::date("2023-10-05"), suture)
        .await
        .unwrap();
    world
        .staff_costs
        .record_payment(doctor, &october())
        .await
        .unwrap();

    world.staff_costs.remove_staff(doctor).await.unwrap();

    assert!(world
        .staff_costs
        .shifts()
        .shifts_in_window(doctor, &october())
        .await
        .unwrap()
        .is_empty());
    assert!(world
        .staff_costs
        .interventions()
        .events_in_window(doctor, &october())
        .await
        .unwrap()
        .is_empty());
    assert!(world.staff_costs.payments_for(doctor).await.unwrap().is_empty());

    // The patient's attribution no longer sees the removed doctor's time.
    let attribution = world
        .staff_costs
        .attributed_cost(patient, StaffKind::Doctor, &october())
        .await
        .unwrap();
    assert_eq!(attribution.total_cost, dec!(0));
}
