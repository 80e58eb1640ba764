/// Shared frame buffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Bodies: max_bodies × 12 floats]
/// [Decor: max_decor × 12 floats]
/// [Rings: max_rings × 12 floats]
/// [Lights: max_lights × 8 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::config::EngineConfig;
use crate::scene::instance::{BodyInstance, DecorInstance, RingInstance};
use crate::scene::lighting::PointLight;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_MAX_BODIES: usize = 3;
pub const HEADER_BODY_COUNT: usize = 4;
pub const HEADER_MAX_DECOR: usize = 5;
pub const HEADER_DECOR_COUNT: usize = 6;
pub const HEADER_MAX_RINGS: usize = 7;
pub const HEADER_RING_COUNT: usize = 8;
pub const HEADER_MAX_LIGHTS: usize = 9;
pub const HEADER_LIGHT_COUNT: usize = 10;
pub const HEADER_SIM_TIME: usize = 11;
/// Body-instance index of the focused body (evaluation order), -1 for the origin.
pub const HEADER_FOCUS_INDEX: usize = 12;
pub const HEADER_FOCUS_X: usize = 13;
pub const HEADER_FOCUS_Y: usize = 14;
pub const HEADER_FOCUS_Z: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per point light: x, y, z, r, g, b, intensity, pad.
pub const LIGHT_FLOATS: usize = PointLight::FLOATS;

pub const DEFAULT_MAX_LIGHTS: usize = 4;

/// Orbit lines plus one band per body.
pub const RINGS_PER_BODY: usize = 2;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub max_bodies: usize,
    pub max_decor: usize,
    pub max_rings: usize,
    pub max_lights: usize,

    /// Size of body data section in floats.
    pub body_data_floats: usize,
    /// Size of decor data section in floats.
    pub decor_data_floats: usize,
    /// Size of ring data section in floats.
    pub ring_data_floats: usize,
    /// Size of light data section in floats.
    pub light_data_floats: usize,

    /// Offset (in floats) where body data begins.
    pub body_data_offset: usize,
    /// Offset (in floats) where decor data begins.
    pub decor_data_offset: usize,
    /// Offset (in floats) where ring data begins.
    pub ring_data_offset: usize,
    /// Offset (in floats) where light data begins.
    pub light_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl FrameLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_bodies: usize, max_decor: usize, max_rings: usize, max_lights: usize) -> Self {
        let body_data_floats = max_bodies * BodyInstance::FLOATS;
        let decor_data_floats = max_decor * DecorInstance::FLOATS;
        let ring_data_floats = max_rings * RingInstance::FLOATS;
        let light_data_floats = max_lights * LIGHT_FLOATS;

        let body_data_offset = HEADER_FLOATS;
        let decor_data_offset = body_data_offset + body_data_floats;
        let ring_data_offset = decor_data_offset + decor_data_floats;
        let light_data_offset = ring_data_offset + ring_data_floats;

        let buffer_total_floats = light_data_offset + light_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_bodies,
            max_decor,
            max_rings,
            max_lights,
            body_data_floats,
            decor_data_floats,
            ring_data_floats,
            light_data_floats,
            body_data_offset,
            decor_data_offset,
            ring_data_offset,
            light_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from an EngineConfig.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.max_bodies,
            config.max_decor,
            config.max_bodies * RINGS_PER_BODY,
            DEFAULT_MAX_LIGHTS,
        )
    }

    /// Header with the capacity fields filled in.
    pub fn header(&self) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MAX_BODIES] = self.max_bodies as f32;
        header[HEADER_MAX_DECOR] = self.max_decor as f32;
        header[HEADER_MAX_RINGS] = self.max_rings as f32;
        header[HEADER_MAX_LIGHTS] = self.max_lights as f32;
        header[HEADER_FOCUS_INDEX] = -1.0;
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = FrameLayout::from_config(&EngineConfig::default());

        assert_eq!(layout.max_bodies, 64);
        assert_eq!(layout.max_decor, 512);
        assert_eq!(layout.max_rings, 128);
        assert_eq!(layout.max_lights, DEFAULT_MAX_LIGHTS);

        assert_eq!(layout.body_data_floats, 64 * 12);
        assert_eq!(layout.decor_data_floats, 512 * 12);
        assert_eq!(layout.ring_data_floats, 128 * 12);
        assert_eq!(layout.light_data_floats, DEFAULT_MAX_LIGHTS * 8);

        let expected_total = HEADER_FLOATS + 64 * 12 + 512 * 12 + 128 * 12 + DEFAULT_MAX_LIGHTS * 8;
        assert_eq!(layout.buffer_total_floats, expected_total);
        assert_eq!(layout.buffer_total_bytes, expected_total * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = FrameLayout::new(10, 20, 30, 2);

        assert_eq!(layout.body_data_offset, HEADER_FLOATS);
        assert_eq!(layout.decor_data_offset, layout.body_data_offset + layout.body_data_floats);
        assert_eq!(layout.ring_data_offset, layout.decor_data_offset + layout.decor_data_floats);
        assert_eq!(layout.light_data_offset, layout.ring_data_offset + layout.ring_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.light_data_offset + layout.light_data_floats);
    }

    #[test]
    fn header_carries_capacities() {
        let layout = FrameLayout::new(19, 121, 38, 1);
        let header = layout.header();
        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(header[HEADER_MAX_BODIES], 19.0);
        assert_eq!(header[HEADER_MAX_DECOR], 121.0);
        assert_eq!(header[HEADER_MAX_RINGS], 38.0);
        assert_eq!(header[HEADER_MAX_LIGHTS], 1.0);
        assert_eq!(header[HEADER_BODY_COUNT], 0.0);
        assert_eq!(header[HEADER_FOCUS_INDEX], -1.0);
    }

    #[test]
    fn header_indices_are_distinct_and_in_bounds() {
        let indices = [
            HEADER_LOCK,
            HEADER_FRAME_COUNTER,
            HEADER_PROTOCOL_VERSION,
            HEADER_MAX_BODIES,
            HEADER_BODY_COUNT,
            HEADER_MAX_DECOR,
            HEADER_DECOR_COUNT,
            HEADER_MAX_RINGS,
            HEADER_RING_COUNT,
            HEADER_MAX_LIGHTS,
            HEADER_LIGHT_COUNT,
            HEADER_SIM_TIME,
            HEADER_FOCUS_INDEX,
            HEADER_FOCUS_X,
            HEADER_FOCUS_Y,
            HEADER_FOCUS_Z,
        ];
        let mut seen = [false; HEADER_FLOATS];
        for i in indices {
            assert!(i < HEADER_FLOATS);
            assert!(!seen[i], "duplicate header index {i}");
            seen[i] = true;
        }
    }
}
