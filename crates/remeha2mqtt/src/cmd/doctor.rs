use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use chrono::Local;
use serde::Serialize;

use remeha2mqtt_bus::CanBus;

use crate::cmd::DoctorArgs;
use crate::config::{self, BridgeConfig};
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

const BROKER_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, config_path: &Path, format: OutputFormat) -> CliResult<i32> {
    let config = config::load(config_path);

    let checks = vec![
        config_file_check(config_path, &config),
        can_interface_check(config.as_ref().ok()),
        broker_reachable_check(config.as_ref().ok()),
        local_timezone_check(),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput { checks, overall };
    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn config_file_check(
    path: &Path,
    config: &Result<BridgeConfig, config::ConfigError>,
) -> CheckResult {
    match config {
        Ok(config) => CheckResult {
            name: "config_file".to_string(),
            status: CheckStatus::Pass,
            detail: format!(
                "{} loaded (broker {}:{}, interface {})",
                path.display(),
                config.broker.host,
                config.broker.port,
                config.can_interface
            ),
        },
        Err(err) => CheckResult {
            name: "config_file".to_string(),
            status: CheckStatus::Fail,
            detail: err.to_string(),
        },
    }
}

fn can_interface_check(config: Option<&BridgeConfig>) -> CheckResult {
    let Some(config) = config else {
        return CheckResult {
            name: "can_interface".to_string(),
            status: CheckStatus::Skip,
            detail: "configuration unavailable".to_string(),
        };
    };

    match CanBus::open(&config.can_interface) {
        Ok(_) => CheckResult {
            name: "can_interface".to_string(),
            status: CheckStatus::Pass,
            detail: format!("{} opened", config.can_interface),
        },
        Err(err) => CheckResult {
            name: "can_interface".to_string(),
            status: CheckStatus::Fail,
            detail: err.to_string(),
        },
    }
}

fn broker_reachable_check(config: Option<&BridgeConfig>) -> CheckResult {
    let Some(config) = config else {
        return CheckResult {
            name: "broker_reachable".to_string(),
            status: CheckStatus::Skip,
            detail: "configuration unavailable".to_string(),
        };
    };

    let endpoint = format!("{}:{}", config.broker.host, config.broker.port);
    let addr = match (config.broker.host.as_str(), config.broker.port).to_socket_addrs() {
        Ok(mut addrs) => addrs.next(),
        Err(err) => {
            return CheckResult {
                name: "broker_reachable".to_string(),
                status: CheckStatus::Fail,
                detail: format!("{endpoint} did not resolve: {err}"),
            }
        }
    };
    let Some(addr) = addr else {
        return CheckResult {
            name: "broker_reachable".to_string(),
            status: CheckStatus::Fail,
            detail: format!("{endpoint} resolved to no addresses"),
        };
    };

    match TcpStream::connect_timeout(&addr, BROKER_PROBE_TIMEOUT) {
        Ok(_) => CheckResult {
            name: "broker_reachable".to_string(),
            status: CheckStatus::Pass,
            detail: format!("{endpoint} accepts TCP connections"),
        },
        Err(err) => CheckResult {
            name: "broker_reachable".to_string(),
            status: CheckStatus::Fail,
            detail: format!("{endpoint} unreachable: {err}"),
        },
    }
}

/// The bridge stamps boiler datetimes with the host zone, so doctor reports
/// which offset that is right now.
fn local_timezone_check() -> CheckResult {
    let now = Local::now();
    CheckResult {
        name: "local_timezone".to_string(),
        status: CheckStatus::Info,
        detail: format!("UTC offset {}", now.format("%:z")),
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("remeha2mqtt doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<18} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_output_has_overall_status() {
        let checks = vec![CheckResult {
            name: "x".to_string(),
            status: CheckStatus::Pass,
            detail: "ok".to_string(),
        }];
        let output = DoctorOutput {
            checks,
            overall: "pass",
        };
        let json = serde_json::to_string(&output).expect("doctor output should serialize");
        assert!(json.contains("\"overall\":\"pass\""));
        assert!(json.contains("\"status\":\"pass\""));
    }

    #[test]
    fn missing_config_skips_dependent_checks() {
        let check = can_interface_check(None);
        assert!(matches!(check.status, CheckStatus::Skip));
        let check = broker_reachable_check(None);
        assert!(matches!(check.status, CheckStatus::Skip));
    }

    #[test]
    fn timezone_check_reports_offset() {
        let check = local_timezone_check();
        assert!(matches!(check.status, CheckStatus::Info));
        assert!(check.detail.starts_with("UTC offset "));
    }
}
