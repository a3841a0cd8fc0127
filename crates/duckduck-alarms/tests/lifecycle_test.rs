//! Alarm lifecycle driven through a manually clocked scheduler.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;
use serde_json::{Value, json};

use duckduck_alarms::{AlarmManager, JobContext, SweetDreams, SweetDreamsConfig};
use duckduck_protocols::{
    Alarm, IlluminationClient, IlluminationError, NotificationPublisher, PublishError,
};
use duckduck_scheduler::{JobScheduler, ManualTimeSource};

#[derive(Default)]
struct Lamp {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl IlluminationClient for Lamp {
    async fn set_hsl(&self, data: Value) -> Result<String, IlluminationError> {
        self.calls.lock().push(format!("hsl {}", data));
        Ok(String::new())
    }

    async fn set_cct(&self, data: Value) -> Result<String, IlluminationError> {
        self.calls.lock().push(format!("cct {}", data));
        Ok(String::new())
    }

    async fn set_power(&self, on: bool) -> Result<String, IlluminationError> {
        self.calls.lock().push(format!("power {}", on));
        Ok(String::new())
    }

    async fn dim(&self) -> Result<String, IlluminationError> {
        self.calls.lock().push("dim".to_string());
        Ok(String::new())
    }

    async fn start_sunrise(&self, time_unit: f64) -> Result<String, IlluminationError> {
        self.calls.lock().push(format!("sunrise {:.2}", time_unit));
        Ok(String::new())
    }
}

#[derive(Default)]
struct Outbox {
    messages: Mutex<Vec<(String, Value)>>,
}

impl NotificationPublisher for Outbox {
    fn publish(&self, topic: &str, payload: Value) -> Result<(), PublishError> {
        self.messages.lock().push((topic.to_string(), payload));
        Ok(())
    }
}

struct Agent {
    clock: Arc<ManualTimeSource>,
    manager: AlarmManager,
    lamp: Arc<Lamp>,
    outbox: Arc<Outbox>,
}

impl Agent {
    fn new(start: DateTime<Local>, sweet_dreams: SweetDreamsConfig) -> Self {
        let clock = Arc::new(ManualTimeSource::new(start));
        let scheduler = Arc::new(JobScheduler::with_time_source(clock.clone()));
        let lamp = Arc::new(Lamp::default());
        let outbox = Arc::new(Outbox::default());
        let context = Arc::new(JobContext::new(
            lamp.clone(),
            outbox.clone(),
            SweetDreams::new(sweet_dreams),
        ));
        Self {
            clock,
            manager: AlarmManager::new(scheduler, context),
            lamp,
            outbox,
        }
    }

    /// Move the clock to `at` and run every job due then.
    async fn run_at(&self, at: DateTime<Local>) -> Vec<String> {
        self.clock.set(at);
        let mut fired = Vec::new();
        for job in self.manager.scheduler().tick() {
            job.handle.await.unwrap();
            fired.push(job.job_id);
        }
        fired.sort();
        fired
    }

    fn lamp_calls(&self) -> Vec<String> {
        std::mem::take(&mut *self.lamp.calls.lock())
    }

    fn messages(&self) -> Vec<(String, Value)> {
        std::mem::take(&mut *self.outbox.messages.lock())
    }
}

fn at(d: u32, h: u32, m: u32) -> DateTime<Local> {
    // January 2024: the 1st is a Monday, the 7th a Sunday.
    Local.with_ymd_and_hms(2024, 1, d, h, m, 0).single().unwrap()
}

fn alarm(value: Value) -> Alarm {
    Alarm::from_json(&serde_json::to_vec(&value).unwrap()).unwrap()
}

#[tokio::test]
async fn test_full_night_for_sample_alarm() {
    let agent = Agent::new(
        at(1, 12, 0),
        SweetDreamsConfig {
            lullaby: Some("songs/brahms.mp3".to_string()),
            ..Default::default()
        },
    );
    agent
        .manager
        .create(&alarm(json!({
            "id": "1",
            "active": true,
            "wakeTime": {"h": 7, "m": 0},
            "bedTime": {"h": 22, "m": 0},
            "repeatDays": "*",
            "sunrise": null
        })))
        .unwrap();

    assert_eq!(agent.run_at(at(1, 21, 59)).await, vec!["d1"]);
    assert_eq!(agent.lamp_calls(), vec!["dim"]);
    assert_eq!(
        agent.messages(),
        vec![(
            "sweet-dreams".to_string(),
            json!({"current_lullaby_song_path": "songs/brahms.mp3"})
        )]
    );

    assert_eq!(agent.run_at(at(1, 22, 0)).await, vec!["o1"]);
    assert_eq!(agent.lamp_calls(), vec!["power false"]);
    assert_eq!(agent.messages(), vec![("sweet-dreams".to_string(), json!({}))]);

    assert_eq!(agent.run_at(at(2, 7, 0)).await, vec!["w1"]);
    assert!(agent.lamp_calls().is_empty());
    assert_eq!(
        agent.messages(),
        vec![("alarm-triggered".to_string(), json!({"id": "1"}))]
    );
}

#[tokio::test]
async fn test_sunrise_and_wraparound_dim() {
    let agent = Agent::new(
        at(1, 12, 0),
        SweetDreamsConfig {
            dim_minutes: 15,
            ..Default::default()
        },
    );
    // Bed at 00:05 on Tuesdays, so dimming happens at 23:50 on Mondays.
    agent
        .manager
        .create(&alarm(json!({
            "id": 42,
            "active": true,
            "wakeTime": {"h": 6, "m": 30},
            "bedTime": {"h": 0, "m": 5},
            "repeatDays": ["tue"],
            "sunrise": {"startTime": {"h": 6, "m": 0}, "peakTime": {"h": 6, "m": 30}}
        })))
        .unwrap();

    assert_eq!(agent.run_at(at(1, 23, 50)).await, vec!["d42"]);
    assert_eq!(agent.run_at(at(2, 0, 5)).await, vec!["o42"]);
    assert_eq!(agent.run_at(at(2, 6, 0)).await, vec!["s42"]);
    assert_eq!(agent.run_at(at(2, 6, 30)).await, vec!["w42"]);
    assert_eq!(
        agent.lamp_calls(),
        vec!["dim", "power false", "sunrise 9.73"]
    );

    // Nothing fires on Wednesday.
    assert!(agent.run_at(at(3, 6, 30)).await.is_empty());
}

#[tokio::test]
async fn test_deleted_alarm_stops_firing() {
    let agent = Agent::new(at(1, 12, 0), SweetDreamsConfig::default());
    let a = alarm(json!({
        "id": "7",
        "active": true,
        "wakeTime": {"h": 7, "m": 0},
        "bedTime": {"h": 22, "m": 0},
        "repeatDays": ["mon", "tue"]
    }));
    agent.manager.create(&a).unwrap();
    assert_eq!(agent.run_at(at(1, 22, 0)).await, vec!["o7"]);

    agent.manager.delete("7");
    assert!(agent.run_at(at(2, 22, 0)).await.is_empty());
    assert!(agent.manager.scheduler().is_empty());
}

#[tokio::test]
async fn test_resync_swaps_alarms() {
    let agent = Agent::new(at(1, 12, 0), SweetDreamsConfig::default());
    let first = alarm(json!({
        "id": "A",
        "active": true,
        "wakeTime": {"h": 7, "m": 0},
        "bedTime": {"h": 22, "m": 0},
        "repeatDays": "*"
    }));
    let second = alarm(json!({
        "id": "B",
        "active": true,
        "wakeTime": {"h": 8, "m": 0},
        "bedTime": {"h": 23, "m": 0},
        "repeatDays": "*"
    }));

    agent.manager.resync(&[first, second.clone()]);
    agent.manager.resync(&[second]);

    assert!(agent.run_at(at(2, 7, 0)).await.is_empty());
    assert_eq!(agent.run_at(at(2, 8, 0)).await, vec!["wB"]);
}
