//! orient optimize command - search for the best print orientation.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use print_orient::{
    OrientOptions, OrientationMode, OrientationResult, apply_orientation, compute_orientation,
};
use serde::Serialize;

use crate::{Cli, OutputFormat, mesh_io, output};

/// Flags of the optimize subcommand.
pub struct OptimizeArgs<'a> {
    pub mode: OrientationMode,
    pub direction_samples: Option<usize>,
    pub vertex_samples: Option<usize>,
    pub max_duration_ms: Option<f64>,
    pub config: Option<&'a Path>,
    pub parallel: bool,
    pub output: Option<&'a Path>,
}

#[derive(Serialize)]
struct OptimizeReport {
    input: String,
    mode: String,
    /// Quaternion as `[w, x, y, z]`.
    rotation: [f64; 4],
    /// Rotation as roll, pitch, yaw in degrees.
    euler_degrees: [f64; 3],
    up: [f64; 3],
    metrics: MetricsInfo,
    timed_out: bool,
    source: String,
    candidates_evaluated: usize,
    candidates_total: usize,
    elapsed_ms: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    alternatives: Vec<AlternativeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
}

#[derive(Serialize)]
struct MetricsInfo {
    support_volume: f64,
    support_weight: f64,
    height: f64,
    footprint_area: f64,
    contact_area: f64,
    /// `null` for an empty mesh.
    score: Option<f64>,
}

#[derive(Serialize)]
struct AlternativeInfo {
    up: [f64; 3],
    score: f64,
    support_volume: f64,
    height: f64,
}

fn build_options(args: &OptimizeArgs<'_>) -> Result<OrientOptions> {
    let mut options = match args.config {
        Some(path) => OrientOptions::from_toml_file(path)
            .with_context(|| format!("Failed to load options from {:?}", path))?,
        None => OrientOptions::default(),
    };

    if let Some(n) = args.direction_samples {
        options.direction_samples = n;
    }
    if let Some(n) = args.vertex_samples {
        options.vertex_samples = n;
    }
    if let Some(ms) = args.max_duration_ms {
        options.max_duration_ms = Some(ms);
    }
    if args.parallel {
        options.parallel = true;
    }
    Ok(options)
}

fn report(input: &Path, mode: OrientationMode, result: &OrientationResult, elapsed_ms: f64) -> OptimizeReport {
    let q = result.rotation.quaternion();
    let (roll, pitch, yaw) = result.rotation.euler_angles();
    let m = &result.metrics;

    OptimizeReport {
        input: input.display().to_string(),
        mode: mode.to_string(),
        rotation: [q.w, q.i, q.j, q.k],
        euler_degrees: [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()],
        up: [result.up.x, result.up.y, result.up.z],
        metrics: MetricsInfo {
            support_volume: m.support_volume,
            support_weight: m.support_weight,
            height: m.height,
            footprint_area: m.footprint_area,
            contact_area: m.contact_area,
            score: m.score.is_finite().then_some(m.score),
        },
        timed_out: result.timed_out,
        source: result.source.to_string(),
        candidates_evaluated: result.candidates_evaluated,
        candidates_total: result.candidates_total,
        elapsed_ms,
        alternatives: result
            .alternatives
            .iter()
            .map(|alt| AlternativeInfo {
                up: [alt.up.x, alt.up.y, alt.up.z],
                score: alt.metrics.score,
                support_volume: alt.metrics.support_volume,
                height: alt.metrics.height,
            })
            .collect(),
        output: None,
    }
}

pub fn run(input: &Path, args: OptimizeArgs<'_>, cli: &Cli) -> Result<()> {
    let mesh = mesh_io::load_mesh(input)?;
    let options = build_options(&args)?;

    output::info(
        &format!(
            "Optimizing orientation ({} vertices, {} triangles)...",
            mesh.vertex_count(),
            mesh.triangle_count()
        ),
        cli.format,
        cli.quiet,
    );

    let start = Instant::now();
    let result = compute_orientation(&mesh, args.mode, &options);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let mut summary = report(input, args.mode, &result, elapsed_ms);

    if let Some(path) = args.output {
        let oriented = apply_orientation(&mesh, &result);
        mesh_io::save_mesh(path, &oriented)?;
        summary.output = Some(path.display().to_string());
    }

    if result.timed_out {
        output::warn(
            &format!(
                "time budget ran out after {} of {} candidates; using height-only fallback",
                result.candidates_evaluated, result.candidates_total
            ),
            cli.quiet,
        );
    }

    match cli.format {
        OutputFormat::Json => {
            output::print(&summary, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                print_text(&summary);
                if let Some(ref path) = summary.output {
                    output::success(&format!("Oriented mesh saved to {}", path), cli.format, cli.quiet);
                }
            }
        }
    }

    Ok(())
}

fn print_text(summary: &OptimizeReport) {
    let m = &summary.metrics;
    println!("{}", "Orientation".bold().underline());
    println!("  {}: {}", "File".cyan(), summary.input);
    println!("  {}: {}", "Mode".cyan(), summary.mode);
    println!("  {}: {}", "Up direction".cyan(), output::vec3(summary.up));
    println!(
        "  {}: w={:.6} x={:.6} y={:.6} z={:.6}",
        "Quaternion".cyan(),
        summary.rotation[0],
        summary.rotation[1],
        summary.rotation[2],
        summary.rotation[3]
    );
    println!(
        "  {}: roll {:.2}°, pitch {:.2}°, yaw {:.2}°",
        "Euler".cyan(),
        summary.euler_degrees[0],
        summary.euler_degrees[1],
        summary.euler_degrees[2]
    );
    println!("  {}: {:.2} mm", "Height".cyan(), m.height);
    println!("  {}: {:.2} mm²", "Footprint".cyan(), m.footprint_area);
    println!("  {}: {:.2} mm²", "Bed contact".cyan(), m.contact_area);
    println!(
        "  {}: {:.2} mm³ ({:.2} g)",
        "Support".cyan(),
        m.support_volume,
        m.support_weight
    );
    match m.score {
        Some(score) => println!("  {}: {:.4}", "Score".cyan(), score),
        None => println!("  {}: {}", "Score".cyan(), "n/a (empty mesh)".dimmed()),
    }

    let status = if summary.timed_out {
        "timed out".yellow()
    } else {
        "complete".green()
    };
    println!(
        "  {}: {} ({}, {}/{} candidates in {:.1} ms)",
        "Search".cyan(),
        status,
        summary.source,
        summary.candidates_evaluated,
        summary.candidates_total,
        summary.elapsed_ms
    );

    if !summary.alternatives.is_empty() {
        println!("  {}:", "Runners-up".cyan());
        for alt in &summary.alternatives {
            println!(
                "    {} score {:.4}, support {:.2} mm³, height {:.2} mm",
                output::vec3(alt.up),
                alt.score,
                alt.support_volume,
                alt.height
            );
        }
    }
}
