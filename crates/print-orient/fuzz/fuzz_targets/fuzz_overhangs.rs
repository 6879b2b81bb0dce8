#![no_main]

use libfuzzer_sys::fuzz_target;
use nalgebra::{Point3, UnitQuaternion};
use print_orient::{Mesh, detect_overhangs};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    // Byte 0: threshold, bytes 1..4: euler angles, rest: quantized vertices
    let threshold = f64::from(data[0]) * 90.0 / 255.0;
    let angle = |b: u8| f64::from(b) / 255.0 * std::f64::consts::TAU;
    let rotation = UnitQuaternion::from_euler_angles(angle(data[1]), angle(data[2]), angle(data[3]));

    let vertices: Vec<Point3<f64>> = data[4..]
        .chunks_exact(3)
        .map(|c| Point3::new(f64::from(c[0]), f64::from(c[1]), f64::from(c[2])))
        .collect();
    let mesh = Mesh::triangle_soup(vertices);

    let result = detect_overhangs(&mesh, &rotation, threshold);
    assert!(result.support_volume >= 0.0);
    assert!(result.contact_area >= 0.0);
    assert!(result.overhang_triangles.len() + result.contact_triangles.len() <= mesh.triangle_count());
});
