//! Offline subcommands: `check-config` and `preview-alarm`.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use duckduck_alarms::{DEFAULT_DIM_MINUTES, DerivedJobSet, JobAction, derive_jobs};
use duckduck_config::{ConfigLoader, ConfigValidator, DeviceConfig, ValidationResult};
use duckduck_protocols::Alarm;
use duckduck_scheduler::cron_expression;

pub(crate) fn check_config(path: &Path) -> Result<()> {
    let config = ConfigLoader::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    let validation = ConfigValidator::validate(&config);
    print!("{}", render_config_report(path, &config, &validation));
    validation.into_result()?;
    Ok(())
}

pub(crate) fn preview_alarm(config_path: &Path, file: &Path, dim_minutes: Option<u32>) -> Result<()> {
    let payload =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let alarm = Alarm::from_json(&payload)
        .with_context(|| format!("Invalid alarm in {}", file.display()))?;

    let dim_minutes = dim_minutes
        .or_else(|| {
            ConfigLoader::load(config_path)
                .ok()
                .map(|config| config.sweet_dreams.dim_minutes)
        })
        .unwrap_or(DEFAULT_DIM_MINUTES);

    let jobs = derive_jobs(&alarm, dim_minutes);
    print!("{}", render_preview(&alarm, dim_minutes, &jobs));
    Ok(())
}

fn render_config_report(path: &Path, config: &DeviceConfig, validation: &ValidationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Config: {}", path.display());
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out, "Device:        {}", config.device_code);
    let _ = writeln!(
        out,
        "Broker:        {}:{}{}",
        config.mqtt_host,
        config.mqtt_port,
        if config.mqtt_tls { " (tls)" } else { "" }
    );
    let _ = writeln!(out, "Illumination:  {}", config.illumination_service);
    let _ = writeln!(
        out,
        "Backend:       {}",
        config.backend_url.as_deref().unwrap_or("(none, resync disabled)")
    );
    let _ = writeln!(
        out,
        "Notifications: {}/{}/<topic>",
        config.notification_prefix.trim_end_matches('/'),
        config.device_code
    );
    let _ = writeln!(out, "Log dir:       {}", config.log_dir().display());

    for error in &validation.errors {
        let _ = writeln!(out, "error: {}: {}", error.path, error.message);
    }
    for warning in &validation.warnings {
        let _ = writeln!(out, "warning: {}: {}", warning.path, warning.message);
    }
    let _ = writeln!(
        out,
        "\n{}",
        if validation.is_valid() { "Config is valid" } else { "Config is INVALID" }
    );
    out
}

fn render_preview(alarm: &Alarm, dim_minutes: u32, jobs: &DerivedJobSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Alarm {} (dim {} min before bed time)", alarm.id, dim_minutes);

    if jobs.is_empty() {
        let _ = writeln!(out, "Inactive, no jobs scheduled.");
        return out;
    }

    let _ = writeln!(out, "{:<10} {:<10} {:<6} {:<28} {}", "ID", "ROLE", "TIME", "CRON", "ACTION");
    let _ = writeln!(out, "{}", "-".repeat(80));
    for job in jobs.jobs() {
        let _ = writeln!(
            out,
            "{:<10} {:<10} {:<6} {:<28} {}",
            job.id,
            job.role,
            job.time,
            cron_expression(&job.weekdays, job.time),
            describe(&job.action)
        );
    }
    out
}

fn describe(action: &JobAction) -> String {
    match action {
        JobAction::WakeTrigger { alarm_id } => format!("publish alarm-triggered {{\"id\": \"{}\"}}", alarm_id),
        JobAction::Dim => "dim, publish sweet-dreams".to_string(),
        JobAction::PowerOff => "power off, publish sweet-dreams".to_string(),
        JobAction::Sunrise { time_unit } => format!("sunrise, time_unit {:.3}s", time_unit),
    }
}
