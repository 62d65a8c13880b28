use serde::Serialize;
use upsell_catalog::CatalogCache;
use upsell_core::config::{AppConfig, LoadOptions};
use upsell_core::domain::vehicle::VehicleCategory;
use upsell_core::offer::catalog::Catalog;
use upsell_core::offer::protection::PROTECTION_TIER_COUNT;

use crate::commands::{CommandResult, EXIT_CATALOG, EXIT_CONFIG};

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
    let exit_code = exit_code_for(&report);

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
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

            let cache = CatalogCache::new(config.catalog.cache_dir.clone());
            match cache.load() {
                Ok(catalog) => {
                    checks.push(DoctorCheck {
                        name: "catalog_cache",
                        status: CheckStatus::Pass,
                        details: format!(
                            "loaded {} vehicles and {} protection tiers from `{}`",
                            catalog.vehicles().len(),
                            catalog.protections().len(),
                            cache.dir().display()
                        ),
                    });
                    checks.push(check_vehicle_pools(&catalog));
                    checks.push(check_protection_tiers(&catalog));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "catalog_cache",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.extend(skipped(
                        &["vehicle_pools", "protection_tiers"],
                        "skipped because the catalog cache did not load",
                    ));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.extend(skipped(
                &["catalog_cache", "vehicle_pools", "protection_tiers"],
                "skipped because configuration did not load",
            ));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn skipped(names: &[&'static str], reason: &str) -> Vec<DoctorCheck> {
    names
        .iter()
        .map(|&name| DoctorCheck {
            name,
            status: CheckStatus::Skipped,
            details: reason.to_string(),
        })
        .collect()
}

fn check_vehicle_pools(catalog: &Catalog) -> DoctorCheck {
    let comparable = catalog.pool_len(VehicleCategory::Comparable);
    let upsell = catalog.pool_len(VehicleCategory::Upsell);
    let status = if comparable > 0 && upsell > 0 { CheckStatus::Pass } else { CheckStatus::Fail };

    DoctorCheck {
        name: "vehicle_pools",
        status,
        details: format!("{comparable} comparable and {upsell} upsell vehicles"),
    }
}

fn check_protection_tiers(catalog: &Catalog) -> DoctorCheck {
    let tiers = catalog.protections().len();
    let status = if tiers == PROTECTION_TIER_COUNT { CheckStatus::Pass } else { CheckStatus::Fail };

    DoctorCheck {
        name: "protection_tiers",
        status,
        details: format!("{tiers} tiers (expected {PROTECTION_TIER_COUNT})"),
    }
}

fn exit_code_for(report: &DoctorReport) -> u8 {
    let failed = |name: &str| {
        report.checks.iter().any(|check| check.name == name && check.status == CheckStatus::Fail)
    };

    if failed("config_validation") {
        EXIT_CONFIG
    } else if report.overall_status == CheckStatus::Fail {
        EXIT_CATALOG
    } else {
        0
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
