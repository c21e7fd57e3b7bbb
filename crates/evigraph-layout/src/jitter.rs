use evigraph_model::Position;

use crate::config::LayoutConfig;

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Scattered fallback position for a node the solver did not place.
///
/// Seeded from the node id: scattered, but stable between runs.
pub(crate) fn jitter_position(id: &str, config: &LayoutConfig) -> Position {
    let hash = fnv1a64(id.as_bytes());
    let fx = (hash & 0xffff_ffff) as f64 / u32::MAX as f64;
    let fy = (hash >> 32) as f64 / u32::MAX as f64;
    Position::new(fx * config.node_width * 4.0, fy * config.node_height * 4.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_is_bounded_and_stable() {
        let config = LayoutConfig::default();
        let a = jitter_position("ark:1", &config);
        assert_eq!(a, jitter_position("ark:1", &config));
        assert_ne!(a, jitter_position("ark:2", &config));
        assert!((0.0..=720.0).contains(&a.x));
        assert!((0.0..=360.0).contains(&a.y));
    }
}
