//! orient overhangs command - overhang and bed-contact report for one rotation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use print_orient::{OrientOptions, OrientationMode, detect_overhangs, evaluate_orientation, rotation_to_up};
use serde::Serialize;

use crate::{Cli, OutputFormat, mesh_io, output};

#[derive(Serialize)]
struct OverhangReport {
    input: String,
    rotation: [f64; 4],
    threshold_degrees: f64,
    triangles: usize,
    overhang_count: usize,
    contact_count: usize,
    support_area: f64,
    support_volume: f64,
    support_weight: f64,
    contact_area: f64,
    bed_height: f64,
    height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    overhang_triangles: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_triangles: Option<Vec<usize>>,
}

/// Parse `N` comma-separated floats.
fn parse_floats<const N: usize>(text: &str, what: &str) -> Result<[f64; N]> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != N {
        bail!("{} needs {} comma-separated numbers, got {:?}", what, N, text);
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .with_context(|| format!("invalid number {:?} in {}", part, what))?;
    }
    Ok(out)
}

fn parse_rotation(quaternion: Option<&str>, up: Option<&str>) -> Result<UnitQuaternion<f64>> {
    match (quaternion, up) {
        (Some(q), _) => {
            let [w, x, y, z] = parse_floats::<4>(q, "--quaternion")?;
            let q = Quaternion::new(w, x, y, z);
            if q.norm() < f64::EPSILON {
                bail!("--quaternion must be non-zero");
            }
            Ok(UnitQuaternion::from_quaternion(q))
        }
        (None, Some(u)) => {
            let [x, y, z] = parse_floats::<3>(u, "--up")?;
            let dir = Vector3::new(x, y, z);
            if dir.norm() < f64::EPSILON {
                bail!("--up must be non-zero");
            }
            Ok(rotation_to_up(&dir))
        }
        (None, None) => bail!("one of --quaternion or --up is required"),
    }
}

pub fn run(
    input: &Path,
    quaternion: Option<&str>,
    up: Option<&str>,
    threshold: f64,
    list: bool,
    cli: &Cli,
) -> Result<()> {
    let mesh = mesh_io::load_mesh(input)?;
    let rotation = parse_rotation(quaternion, up)?;

    let result = detect_overhangs(&mesh, &rotation, threshold);
    let options = OrientOptions::default().with_overhang_threshold(threshold);
    let metrics = evaluate_orientation(&mesh, &rotation, OrientationMode::Upright, &options);

    let q = rotation.quaternion();
    let report = OverhangReport {
        input: input.display().to_string(),
        rotation: [q.w, q.i, q.j, q.k],
        threshold_degrees: threshold,
        triangles: mesh.triangle_count(),
        overhang_count: result.overhang_triangles.len(),
        contact_count: result.contact_triangles.len(),
        support_area: result.support_area,
        support_volume: result.support_volume,
        support_weight: result.support_weight,
        contact_area: result.contact_area,
        bed_height: result.bed_height,
        height: metrics.height,
        overhang_triangles: list.then(|| result.overhang_triangles.clone()),
        contact_triangles: list.then(|| result.contact_triangles.clone()),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&report, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Overhang Analysis".bold().underline());
                println!("  {}: {}", "File".cyan(), report.input);
                println!("  {}: {:.1}°", "Threshold".cyan(), report.threshold_degrees);
                println!("  {}: {:.2} mm", "Height".cyan(), report.height);

                let overhangs = format!("{} of {} triangles", report.overhang_count, report.triangles);
                if report.overhang_count > 0 {
                    println!("  {}: {}", "Overhangs".cyan(), overhangs.yellow());
                } else {
                    println!("  {}: {}", "Overhangs".cyan(), overhangs.green());
                }
                println!("  {}: {:.2} mm²", "Support area".cyan(), report.support_area);
                println!(
                    "  {}: {:.2} mm³ ({:.2} g)",
                    "Support".cyan(),
                    report.support_volume,
                    report.support_weight
                );
                println!(
                    "  {}: {:.2} mm² ({} triangles)",
                    "Bed contact".cyan(),
                    report.contact_area,
                    report.contact_count
                );

                if let Some(ref tris) = report.overhang_triangles {
                    println!("  {}: {:?}", "Overhang triangles".cyan(), tris);
                }
                if let Some(ref tris) = report.contact_triangles {
                    println!("  {}: {:?}", "Contact triangles".cyan(), tris);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_up() {
        let rot = parse_rotation(None, Some("0, 0, -1")).unwrap();
        let mapped = rot * Vector3::new(0.0, 0.0, -1.0);
        assert!((mapped.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_quaternion_normalizes() {
        let rot = parse_rotation(Some("2,0,0,0"), None).unwrap();
        assert_eq!(rot, UnitQuaternion::identity());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_rotation(None, Some("1,2")).is_err());
        assert!(parse_rotation(None, Some("0,0,0")).is_err());
        assert!(parse_rotation(Some("1,a,0,0"), None).is_err());
    }

    #[test]
    fn test_missing_rotation_is_error() {
        assert!(parse_rotation(None, None).is_err());
    }
}
