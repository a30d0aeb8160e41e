use bargainer_core::config::{AppConfig, LoadOptions};
use bargainer_core::{evaluate, AspirationNegotiator, DefaultNegotiator, ItemSet, Verdict};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::{CommandResult, EXIT_CONFIG};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { EXIT_CONFIG };

    if json_output {
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult { exit_code, output };
    }

    CommandResult { exit_code, output: render_human(&report) }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            match AspirationNegotiator::with_target_fraction(config.negotiation.target_fraction) {
                Ok(negotiator) => {
                    checks.push(DoctorCheck {
                        name: "negotiator_construction",
                        status: CheckStatus::Pass,
                        details: format!("target fraction {}", negotiator.target_fraction()),
                    });
                    checks.push(check_probe_proposal(&negotiator));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "negotiator_construction",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(skipped("probe_proposal", "negotiator could not be built"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("negotiator_construction", "configuration did not load"));
            checks.push(skipped("probe_proposal", "configuration did not load"));
        }
    }
    checks.push(check_tolerance_band());

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: format!("skipped because {reason}"),
    }
}

fn check_probe_proposal(negotiator: &DefaultNegotiator) -> DoctorCheck {
    let probe = ItemSet::new(&[7, 4, 1], &[45, 72, 33])
        .and_then(|items| negotiator.propose(&items, None).map(|allocation| (items, allocation)));

    match probe {
        Ok((items, allocation)) if allocation.is_partition_of(items.quantities()) => DoctorCheck {
            name: "probe_proposal",
            status: CheckStatus::Pass,
            details: format!(
                "kept {:?} worth {} of {}",
                allocation.allocation_self, allocation.self_value, allocation.total_value
            ),
        },
        Ok(_) => DoctorCheck {
            name: "probe_proposal",
            status: CheckStatus::Fail,
            details: "proposal did not partition the probe items".to_string(),
        },
        Err(error) => {
            DoctorCheck { name: "probe_proposal", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

/// 152 sits exactly on 95% of 160 and must be accepted; 151 must not.
fn check_tolerance_band() -> DoctorCheck {
    let counter = Decimal::new(160, 0);
    let at_boundary = evaluate(Decimal::new(152, 0), counter, counter);
    let below = evaluate(Decimal::new(151, 0), counter, counter);

    match (at_boundary, below) {
        (Ok(at), Ok(under)) if at.action == Verdict::Accept && under.action == Verdict::Reject => {
            DoctorCheck {
                name: "tolerance_band",
                status: CheckStatus::Pass,
                details: "152/160 accepted and 151/160 rejected".to_string(),
            }
        }
        (Ok(at), Ok(under)) => DoctorCheck {
            name: "tolerance_band",
            status: CheckStatus::Fail,
            details: format!("unexpected verdicts {} and {}", at.action, under.action),
        },
        (Err(error), _) | (_, Err(error)) => {
            DoctorCheck { name: "tolerance_band", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
