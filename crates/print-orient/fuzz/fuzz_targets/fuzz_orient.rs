#![no_main]

use libfuzzer_sys::fuzz_target;
use print_orient::{Mesh, OrientOptions, OrientationMode, compute_orientation};

fuzz_target!(|data: &[u8]| {
    // First byte picks the layout, the rest is read as little-endian f32/u32 words.
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let words: Vec<[u8; 4]> = rest
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect();

    let split = words.len() * 3 / 4;
    let positions: Vec<f32> = words[..split].iter().map(|w| f32::from_le_bytes(*w)).collect();
    let indices: Vec<u32> = words[split..].iter().map(|w| u32::from_le_bytes(*w) % 64).collect();
    let indices = ((flags & 1) == 1).then_some(indices.as_slice());

    // Malformed buffers are rejected, never panic
    let Ok(mesh) = Mesh::from_flat(&positions, indices) else {
        return;
    };

    let mode = if (flags & 2) == 0 {
        OrientationMode::Upright
    } else {
        OrientationMode::Flat
    };
    let options = OrientOptions::default()
        .with_direction_samples(usize::from(flags >> 2))
        .with_parallel((flags & 0x80) != 0);

    let result = compute_orientation(&mesh, mode, &options);
    if !mesh.is_empty() {
        assert!(result.metrics.height >= 0.0);
        assert!(result.metrics.support_volume >= 0.0);
        assert!(result.metrics.contact_area >= 0.0);
    }
});
