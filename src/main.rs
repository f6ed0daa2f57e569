// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use std::env;
use std::sync::Arc;
use std::time::Instant;

use nitrate_pipeline::artifacts::{ArtifactLayout, ArtifactRegistry, MapKind, RunArtifacts};
use nitrate_pipeline::backends::local::LocalGeoprocessor;
use nitrate_pipeline::config::{load_config, PipelineConfig};
use nitrate_pipeline::engine::Pipeline;
use nitrate_pipeline::model::dataset::{load_boundary, load_samples, load_zones};
use nitrate_pipeline::model::DecayExponent;
use nitrate_pipeline::observability::{init_tracing, TracingProgressSink};

const DEFAULT_LOG_LEVEL: &str = "info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let (config_file, k_text, locate_only) = match args.as_slice() {
        [_, config, flag, k] if flag == "--locate" => (config, k, true),
        [_, config, k] => (config, k, false),
        _ => {
            eprintln!("Usage: {} <config.yaml> <K>", args[0]);
            eprintln!("       {} <config.yaml> --locate <K>", args[0]);
            eprintln!("Example: {} configs/nitrate.yaml 2", args[0]);
            std::process::exit(1);
        }
    };

    let config = load_config(config_file)
        .with_context(|| format!("loading configuration from {}", config_file))?;
    let level = config.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
    if let Err(e) = init_tracing(level) {
        eprintln!("⚠️  Logging disabled: {}", e);
    }

    if locate_only {
        let k: DecayExponent = k_text.parse()?;
        locate(&config, &k)
    } else {
        run(&config, k_text).await
    }
}

async fn run(config: &PipelineConfig, k_text: &str) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let samples = load_samples(&config.inputs.samples)?;
    let mut zones = load_zones(&config.inputs.zones)?;
    let boundary = load_boundary(&config.inputs.boundary)?;
    if zones.id_field != config.fields.zone_id {
        bail!(
            "zone dataset {} is keyed by '{}' but the configuration expects '{}'",
            config.inputs.zones.display(),
            zones.id_field,
            config.fields.zone_id
        );
    }

    println!("🚰 Nitrate / Cancer Analysis");
    println!("═══════════════════════════");
    println!("K: {}", k_text);
    println!("Workspace: {}", config.workspace_root.display());
    println!("Samples: {}  Zones: {}", samples.len(), zones.len());
    println!();

    let pipeline = Pipeline::new(
        Arc::new(LocalGeoprocessor::new()),
        ArtifactLayout::new(&config.workspace_root),
    )
    .with_settings(config.settings())
    .with_progress(Arc::new(TracingProgressSink));

    let artifacts = pipeline
        .run_and_save_zones(k_text, &samples, &mut zones, &boundary, &config.inputs.zones)
        .await?;

    print_artifacts(pipeline.registry().layout(), &artifacts);
    println!("\n⏱️  Total Time: {:?}", start_time.elapsed());
    Ok(())
}

fn locate(config: &PipelineConfig, k: &DecayExponent) -> anyhow::Result<()> {
    let registry = ArtifactRegistry::new(ArtifactLayout::new(&config.workspace_root));
    match registry.locate(k) {
        Some(artifacts) => {
            print_artifacts(registry.layout(), &artifacts);
            Ok(())
        }
        None => bail!("no completed run with K = {} in {}", k, config.workspace_root.display()),
    }
}

fn print_artifacts(layout: &ArtifactLayout, artifacts: &RunArtifacts) {
    println!("\n📊 Artifacts for K = {}:", artifacts.k);
    println!("   Surface:           {}", artifacts.surface.display());
    println!("   Regression layer:  {}", artifacts.regression_layer.display());
    println!("   Regression report: {}", artifacts.regression_report.display());
    match &artifacts.autocorrelation_report {
        Some(path) => println!("   Moran's I report:  {}", path.display()),
        None => println!("   Moran's I report:  [not generated]"),
    }
    if let Some(statistic) = &artifacts.morans_i {
        println!(
            "   Moran's I:         {:.4} (z = {:.3}, p = {:.4})",
            statistic.index, statistic.z_score, statistic.p_value
        );
    }
    println!(
        "   Map images:        {}, {}",
        layout.map_image_path(MapKind::Idw, &artifacts.k).display(),
        layout.map_image_path(MapKind::Ols, &artifacts.k).display()
    );

    if !artifacts.warnings.is_empty() {
        println!("\n⚠️  {} zones had no mean value:", artifacts.warnings.len());
        for zone_id in artifacts.missing_zone_ids() {
            println!("   • {}", zone_id);
        }
    }
}
