use crate::sim::SimTime;

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_micros(1), SimTime(1_000));
    assert_eq!(SimTime::from_millis(1), SimTime(1_000_000));
    assert_eq!(SimTime::from_secs(1), SimTime(1_000_000_000));
    assert_eq!(SimTime::from_secs_f64(1.5), SimTime::from_millis(1500));
    assert_eq!(SimTime::from_millis(2500).as_secs_f64(), 2.5);
}

#[test]
fn sim_time_unit_conversions_saturate_on_overflow() {
    assert_eq!(SimTime::from_micros(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_millis(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_secs(u64::MAX), SimTime(u64::MAX));
    assert!(SimTime::from_secs_f64(1e300).is_never());
}

#[test]
fn negative_or_nan_seconds_clamp_to_zero() {
    assert_eq!(SimTime::from_secs_f64(-3.0), SimTime::ZERO);
    assert_eq!(SimTime::from_secs_f64(f64::NAN), SimTime::ZERO);
}

#[test]
fn arithmetic_saturates_and_never_stays_never() {
    assert_eq!(SimTime::from_secs(1) - SimTime::from_secs(2), SimTime::ZERO);
    assert_eq!(SimTime::NEVER + SimTime::from_secs(1), SimTime::NEVER);
    assert_eq!(SimTime::from_millis(1500).mul_f64(1.0 / 1.5), SimTime::from_secs(1));
}
