use std::path::Path;

use crate::runner::BenchmarkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns None if the file doesn't exist
/// or does not parse.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(baseline) => Some(baseline),
        Err(e) => {
            log::warn!("Ignoring baseline {}: {}", path.display(), e);
            None
        }
    }
}

/// Save a baseline to a JSON file.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// One scene that got slower than the baseline allows.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub scene_name: String,
    pub phase: &'static str,
    pub pct_change: f64,
}

/// Compare current results against a baseline, phase by phase. A scene is
/// only compared when its dimensions and seed match the baseline's.
pub fn compare(current: &[BenchmarkResult], baseline: &Baseline, threshold_pct: f64) -> Vec<Regression> {
    let mut regressions = Vec::new();

    for result in current {
        let Some(base) = baseline.results.iter().find(|b| b.scene_name == result.scene_name) else {
            continue;
        };
        if base.dimensions != result.dimensions || base.seed != result.seed {
            log::warn!("Scene '{}' changed shape since the baseline, skipping", result.scene_name);
            continue;
        }
        if base.fingerprint != result.fingerprint {
            log::warn!(
                "Scene '{}' generates a different world than the baseline ({} vs {})",
                result.scene_name,
                result.fingerprint,
                base.fingerprint
            );
        }
        let phases = [
            ("generation", result.timings.generation.mean_ms, base.timings.generation.mean_ms),
            ("meshing", result.timings.meshing.mean_ms, base.timings.meshing.mean_ms),
            ("total", result.timings.total.mean_ms, base.timings.total.mean_ms),
        ];
        for (phase, now, before) in phases {
            if before <= 0.0 {
                continue;
            }
            let pct_change = (now - before) / before * 100.0;
            if pct_change > threshold_pct {
                regressions.push(Regression {
                    scene_name: result.scene_name.clone(),
                    phase,
                    pct_change,
                });
            }
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Chunks | Trees | Triangles | Gen (ms) | Mesh (ms) | Total (ms) | Edit p95 (ms) |\n");
    out.push_str("|-------|--------|-------|-----------|----------|-----------|------------|---------------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.3} |\n",
            r.scene_name,
            r.chunk_count,
            r.tree_count,
            r.triangle_count,
            r.timings.generation.mean_ms,
            r.timings.meshing.mean_ms,
            r.timings.total.mean_ms,
            r.timings.edit.p95_ms,
        ));
    }

    out
}

/// Format the per-block counts of every scene.
pub fn format_block_counts(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    for r in results {
        out.push_str(&format!("\n### {} ({})\n\n", r.scene_name, r.fingerprint));
        out.push_str("| Block | Count |\n|-------|-------|\n");
        for (id, count) in &r.block_counts {
            out.push_str(&format!("| {} | {} |\n", id, count));
        }
    }
    out
}

/// Format a comparison report showing regressions.
pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = String::new();
    out.push_str(&format!("REGRESSIONS DETECTED (>{:.0}% threshold):\n", threshold_pct));
    for r in regressions {
        out.push_str(&format!("  - {} ({}): +{:.1}%\n", r.scene_name, r.phase, r.pct_change));
    }
    out
}
