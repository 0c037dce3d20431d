use super::*;

#[test]
fn insufficient_stock_carries_medication_into_api_error() {
    let err = CabinetError::InsufficientStock(MedicationId::new("antibiotic"));
    let api: ApiError = err.into();

    assert_eq!(api.code, ErrorCode::InsufficientStock);
    assert_eq!(api.medication_id, Some(MedicationId::new("antibiotic")));
    assert!(api.message.contains("antibiotic"));
}

#[test]
fn error_codes_serialize_as_snake_case() {
    let api = ApiError::new(ErrorCode::AlreadyProcessing, "busy");
    let json = serde_json::to_value(&api).expect("json");

    assert_eq!(json["code"], "already_processing");
    assert!(json.get("medication_id").is_none());
}

#[test]
fn actuator_and_concurrency_errors_are_not_locally_recoverable() {
    assert!(!CabinetError::ActuatorError("jammed".into()).is_recoverable());
    assert!(!CabinetError::AlreadyProcessing.is_recoverable());
    assert!(CabinetError::NoMatch.is_recoverable());
    assert!(CabinetError::EmptySelection.is_recoverable());
}
