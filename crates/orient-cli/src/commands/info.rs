//! orient info command - display mesh statistics and principal axes.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use print_orient::{JacobiParams, analyze_principal_axes, sample_vertices};
use serde::Serialize;

use crate::{Cli, OutputFormat, mesh_io, output};

/// Matches the optimizer's default vertex sample cap.
const INFO_VERTEX_SAMPLES: usize = 5_000;

#[derive(Serialize)]
struct MeshInfo {
    path: String,
    vertices: usize,
    triangles: usize,
    indexed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
    sampled_vertices: usize,
    principal_axes: Vec<AxisInfo>,
    solver_sweeps: usize,
    solver_converged: bool,
}

#[derive(Serialize)]
struct BoundsInfo {
    min: [f64; 3],
    max: [f64; 3],
    dimensions: [f64; 3],
}

#[derive(Serialize)]
struct AxisInfo {
    direction: [f64; 3],
    variance: f64,
}

pub fn run(input: &Path, cli: &Cli) -> Result<()> {
    let mesh = mesh_io::load_mesh(input)?;

    let bounds = mesh.bounds().map(|(min, max)| {
        let dims = max - min;
        BoundsInfo {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
            dimensions: [dims.x, dims.y, dims.z],
        }
    });

    let sample = sample_vertices(&mesh.vertices, INFO_VERTEX_SAMPLES);
    let axes = analyze_principal_axes(&sample, &JacobiParams::default());

    let info = MeshInfo {
        path: input.display().to_string(),
        vertices: mesh.vertex_count(),
        triangles: mesh.triangle_count(),
        indexed: mesh.indices.is_some(),
        bounds,
        sampled_vertices: sample.len(),
        principal_axes: axes
            .axes
            .iter()
            .zip(&axes.eigenvalues)
            .map(|(a, &variance)| AxisInfo {
                direction: [a.x, a.y, a.z],
                variance,
            })
            .collect(),
        solver_sweeps: axes.sweeps,
        solver_converged: axes.converged,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Mesh Information".bold().underline());
                println!("  {}: {}", "File".cyan(), info.path);
                println!("  {}: {}", "Vertices".cyan(), info.vertices);
                println!(
                    "  {}: {} ({})",
                    "Triangles".cyan(),
                    info.triangles,
                    if info.indexed { "indexed" } else { "soup" }
                );

                if let Some(ref b) = info.bounds {
                    println!(
                        "  {}: {:.2} x {:.2} x {:.2} mm",
                        "Dimensions".cyan(),
                        b.dimensions[0],
                        b.dimensions[1],
                        b.dimensions[2]
                    );
                    println!("  {}: {}", "Min bounds".cyan(), output::vec3(b.min));
                    println!("  {}: {}", "Max bounds".cyan(), output::vec3(b.max));
                }

                if info.principal_axes.is_empty() {
                    println!("  {}: {}", "Principal axes".cyan(), "none (no spread)".dimmed());
                } else {
                    println!(
                        "  {} ({} of {} vertices sampled):",
                        "Principal axes".cyan(),
                        info.sampled_vertices,
                        info.vertices
                    );
                    for axis in &info.principal_axes {
                        println!(
                            "    {} variance {:.4}",
                            output::vec3(axis.direction),
                            axis.variance
                        );
                    }
                    if !info.solver_converged {
                        output::warn(
                            &format!("eigen-solver stopped after {} sweeps without converging", info.solver_sweeps),
                            cli.quiet,
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
