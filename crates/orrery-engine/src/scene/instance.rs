use bytemuck::{Pod, Zeroable};

/// Per-body render data read by the TypeScript renderer.
/// 12 floats = 48 bytes per instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
    pub spin: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Glow strength; 0 for bodies that are only lit.
    pub emissive: f32,
    /// Index into the texture table, -1 when tinted only.
    pub texture_slot: f32,
    /// 1 for the focused body.
    pub focused: f32,
    /// 0 star, 1 planet, 2 moon.
    pub kind: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Per-rock (or comet) render data.
/// 12 floats = 48 bytes per instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DecorInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,
    pub spin: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Unit tail direction in the orbital plane (comet only).
    pub tail_x: f32,
    pub tail_z: f32,
    pub tail_length: f32,
    /// 0 asteroid, 1 comet.
    pub kind: f32,
}

impl DecorInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// A circle in the y = 0 plane: an orbit line (inner == outer) or a flat band.
/// 12 floats = 48 bytes per instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RingInstance {
    pub cx: f32,
    pub cy: f32,
    pub cz: f32,
    pub inner: f32,
    pub outer: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub opacity: f32,
    /// 0 orbit line, 1 band.
    pub kind: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl RingInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Fixed-capacity instance list exposed to the renderer by pointer.
/// Pushes beyond capacity are dropped so the pointer never moves.
pub struct InstanceBuffer<T: Pod> {
    instances: Vec<T>,
    capacity: usize,
    dropped: usize,
}

impl<T: Pod> InstanceBuffer<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.dropped = 0;
    }

    /// Returns false if the buffer was full.
    pub fn push(&mut self, instance: T) -> bool {
        if self.instances.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Instances rejected since the last clear.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[T] {
        &self.instances
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}
