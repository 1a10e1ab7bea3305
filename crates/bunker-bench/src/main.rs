use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use bunker_blocks::{load_data_dir, TextureAtlas};
use bunker_bench::report;
use bunker_bench::runner::BenchmarkRunner;
use bunker_bench::scenes::{self, SceneConfig};
use bunker_world::WorldGenSettings;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut settings_path: Option<PathBuf> = None;
    let mut data_dir = PathBuf::from("data");
    let mut texture_dir: Option<PathBuf> = None;
    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut batch: Option<usize> = None;
    let mut runs = 3u32;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if matches!(flag, "--help" | "-h") {
            print_usage();
            process::exit(0);
        }
        i += 1;
        let Some(value) = args.get(i) else {
            fail(&format!("Missing value for {}", flag));
        };
        match flag {
            "--settings" => settings_path = Some(PathBuf::from(value)),
            "--data" => data_dir = PathBuf::from(value),
            "--textures" => texture_dir = Some(PathBuf::from(value)),
            "--baseline" => baseline_path = Some(PathBuf::from(value)),
            "--output" => output_path = Some(PathBuf::from(value)),
            "--regression-threshold" => regression_threshold = parse_or_fail(flag, value),
            "--batch" => batch = Some(parse_or_fail(flag, value)),
            "--runs" => runs = parse_or_fail(flag, value),
            other => fail(&format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    let game_data = load_data_dir(&data_dir).unwrap_or_else(|e| fail(&format!("Failed to load data: {}", e)));
    let registry = Arc::new(game_data.registry);

    let atlas = match &texture_dir {
        Some(dir) => TextureAtlas::from_registry(&registry, dir)
            .unwrap_or_else(|e| fail(&format!("Failed to build texture atlas: {}", e))),
        None => TextureAtlas::empty(),
    };
    log::info!("Texture atlas: {} textures, {}px", atlas.len(), atlas.size());

    let scene_configs = match &settings_path {
        Some(path) => {
            let src = std::fs::read_to_string(path)
                .unwrap_or_else(|e| fail(&format!("Failed to read {}: {}", path.display(), e)));
            let settings = WorldGenSettings::from_ron_str(&src).unwrap_or_else(|e| fail(&e.to_string()));
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "custom".to_string());
            vec![SceneConfig::new(&name, settings)]
        }
        None => scenes::standard_scenes(&WorldGenSettings::default()),
    };

    let runner = BenchmarkRunner::new(registry, game_data.ore_configs, Arc::new(atlas), runs, batch);
    let mut results = Vec::new();
    for config in &scene_configs {
        match runner.run_scene(config) {
            Ok(result) => results.push(result),
            Err(e) => fail(&format!("Scene '{}' failed: {}", config.name, e)),
        }
    }

    // Print markdown summary
    println!("\n## World Generation Results\n");
    println!("{}", report::format_markdown(&results));
    println!("{}", report::format_block_counts(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: run_timestamp(),
            results: results.clone(),
        };
        match report::save_baseline(path, &baseline) {
            Ok(()) => log::info!("Saved baseline to {}", path.display()),
            Err(e) => fail(&format!("Failed to save baseline: {}", e)),
        }
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!("{}", report::format_comparison(&regressions, regression_threshold));
            if !regressions.is_empty() {
                eprintln!("ERROR: {} regressions detected, exiting with code 1", regressions.len());
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}

fn print_usage() {
    eprintln!("Usage: worldgen-bench [OPTIONS]");
    eprintln!("  --settings <path>              World generation settings (RON); default runs the standard scenes");
    eprintln!("  --data <dir>                   Block and ore data root (default: data)");
    eprintln!("  --textures <dir>               Texture directory for the atlas");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
    eprintln!("  --batch <n>                    Build through the batched builder, n columns per call");
    eprintln!("  --runs <n>                     Builds per scene (default: 3)");
}

fn parse_or_fail<T: std::str::FromStr>(flag: &str, value: &str) -> T {
    value
        .parse()
        .unwrap_or_else(|_| fail(&format!("Invalid {} value: {}", flag, value)))
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

/// Run label built from the seconds since the Unix epoch.
fn run_timestamp() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("bench-{}", secs)
}
