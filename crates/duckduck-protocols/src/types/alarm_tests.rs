use super::*;
use crate::types::Weekday;

fn sample_json() -> serde_json::Value {
    serde_json::json!({
        "id": "1",
        "active": true,
        "wakeTime": {"h": 7, "m": 0},
        "bedTime": {"h": 22, "m": 0},
        "repeatDays": ["mon", "tue", "wed", "thu", "fri", "sat", "sun"],
        "sunrise": null
    })
}

#[test]
fn test_parse_sample_alarm() {
    let payload = serde_json::to_vec(&sample_json()).unwrap();
    let alarm = Alarm::from_json(&payload).unwrap();

    assert_eq!(alarm.id, "1");
    assert!(alarm.active);
    assert_eq!(alarm.wake_time, TimeOfDay::new(7, 0).unwrap());
    assert_eq!(alarm.bed_time, TimeOfDay::new(22, 0).unwrap());
    assert!(alarm.repeat_days.is_full_week());
    assert!(alarm.sunrise.is_none());
}

#[test]
fn test_parse_numeric_id() {
    let mut json = sample_json();
    json["id"] = serde_json::json!(17);
    let alarm: Alarm = serde_json::from_value(json).unwrap();
    assert_eq!(alarm.id, "17");
}

#[test]
fn test_parse_with_sunrise() {
    let mut json = sample_json();
    json["sunrise"] = serde_json::json!({
        "startTime": {"h": 6, "m": 0},
        "peakTime": {"h": 6, "m": 30}
    });
    let alarm: Alarm = serde_json::from_value(json).unwrap();
    let sunrise = alarm.sunrise.unwrap();
    assert_eq!(sunrise.start_time, TimeOfDay::new(6, 0).unwrap());
    assert_eq!(sunrise.peak_time, TimeOfDay::new(6, 30).unwrap());
}

#[test]
fn test_sunrise_requires_both_times() {
    let mut json = sample_json();
    json["sunrise"] = serde_json::json!({"startTime": {"h": 6, "m": 0}});
    let result = serde_json::from_value::<Alarm>(json);
    assert!(result.is_err());
}

#[test]
fn test_missing_bed_time_is_malformed() {
    let mut json = sample_json();
    json.as_object_mut().unwrap().remove("bedTime");
    let payload = serde_json::to_vec(&json).unwrap();

    let result = Alarm::from_json(&payload);
    assert!(matches!(result, Err(AlarmError::Malformed(_))));
}

#[test]
fn test_active_alarm_needs_repeat_days() {
    let mut json = sample_json();
    json["repeatDays"] = serde_json::json!([]);
    let payload = serde_json::to_vec(&json).unwrap();

    let result = Alarm::from_json(&payload);
    assert!(matches!(result, Err(AlarmError::EmptyRepeatDays { .. })));
}

#[test]
fn test_inactive_alarm_may_have_no_days() {
    let mut json = sample_json();
    json["repeatDays"] = serde_json::json!([]);
    json["active"] = serde_json::json!(false);
    let payload = serde_json::to_vec(&json).unwrap();

    let alarm = Alarm::from_json(&payload).unwrap();
    assert!(!alarm.active);
}

#[test]
fn test_repeat_days_order_preserved() {
    let mut json = sample_json();
    json["repeatDays"] = serde_json::json!(["fri", "mon"]);
    let alarm: Alarm = serde_json::from_value(json).unwrap();
    assert_eq!(alarm.repeat_days.days(), &[Weekday::Fri, Weekday::Mon]);
}

#[test]
fn test_alarm_ref_accepts_number() {
    let parsed: AlarmRef = serde_json::from_str(r#"{"id": 5}"#).unwrap();
    assert_eq!(parsed.id, "5");

    let parsed: AlarmRef = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
    assert_eq!(parsed.id, "abc");
}

#[test]
fn test_serialize_camel_case() {
    let alarm: Alarm = serde_json::from_value(sample_json()).unwrap();
    let json = serde_json::to_value(&alarm).unwrap();
    assert!(json.get("wakeTime").is_some());
    assert!(json.get("repeatDays").is_some());
    assert!(json.get("sunrise").is_none());
}
