//! `pepil doctor`: Diagnose configuration and datasets.

use pepil_config::AppConfig;
use pepil_knowledge::{DatasetKind, DatasetSource, DirectorySource, assemble};
use pepil_providers::build_from_config;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 페필이 Doctor: System Diagnostics");
    println!("===================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found at {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults and environment");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  Cannot check datasets without a valid configuration.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ API key configured");
    } else {
        println!("  ⚠️  No API key configured, set PEPIL_API_KEY or OPENAI_API_KEY");
        issues += 1;
    }

    let router = build_from_config(&config);
    for (name, healthy) in router.health_check_all().await {
        let marker = if name == router.default_name() { " (default)" } else { "" };
        if healthy {
            println!("  ✅ Provider {name}{marker} reachable");
        } else {
            println!("  ❌ Provider {name}{marker} unreachable or rejected the API key");
            issues += 1;
        }
    }

    let source = DirectorySource::new(config.knowledge.data_dir.clone());
    if source.dir().is_dir() {
        println!("  ✅ Dataset directory {}", source.dir().display());
    } else {
        println!("  ❌ Dataset directory {} does not exist", source.dir().display());
        issues += 1;
    }

    for kind in DatasetKind::ALL {
        if source.path_of(kind).is_file() {
            println!("     • {kind}");
        }
    }

    match source.load() {
        Ok(kb) => {
            println!(
                "  ✅ Datasets valid: {} rules, {} doctors, {} procedures, {} overrides, {} team procedures, {} releases",
                kb.rules.len(),
                kb.doctors.len(),
                kb.procedures.len(),
                kb.overrides.len(),
                kb.ancillary.len(),
                kb.patch_notes.len()
            );
            match assemble(&kb) {
                Ok(document) => println!("  ✅ Knowledge base compiles ({} bytes)", document.len()),
                Err(e) => {
                    println!("  ❌ Knowledge base does not compile: {e}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ {} dataset problem(s):", e.problems.len());
            for problem in &e.problems {
                println!("     - {problem}");
            }
            issues += e.problems.len();
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
