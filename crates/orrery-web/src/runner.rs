use orrery_engine::bridge::protocol::*;
use orrery_engine::scene::PointLight;
use orrery_engine::{
    BodyInstance, CameraRig, DecorInstance, FocusState, FocusTarget, FrameLayout, InstanceBuffer,
    OrbitCamera, Orrery, OrreryError, PanelBridge, RingInstance, SceneView, TextureTable,
};

/// Drives an [`Orrery`] from the browser's animation frame and keeps the
/// flat buffers the TypeScript renderer reads.
///
/// Each app creates a `thread_local!` OrreryRunner and exports free functions
/// via `#[wasm_bindgen]` (see [`export_orrery!`](crate::export_orrery)).
pub struct OrreryRunner {
    orrery: Orrery,
    panel: PanelBridge,
    layout: FrameLayout,
    header: [f32; HEADER_FLOATS],
    bodies: InstanceBuffer<BodyInstance>,
    decor: InstanceBuffer<DecorInstance>,
    rings: InstanceBuffer<RingInstance>,
    lights: InstanceBuffer<PointLight>,
    ambient: [f32; 3],
    textures: TextureTable,
    camera: OrbitCamera,
    camera_uniform: [f32; 20],
}

impl OrreryRunner {
    pub fn new(orrery: Orrery) -> Self {
        let layout = FrameLayout::from_config(orrery.config());
        let textures = TextureTable::build(orrery.registry(), orrery.config().backdrop.as_ref());
        let panel = PanelBridge::new(orrery.registry().clone(), orrery.params());

        Self {
            header: layout.header(),
            bodies: InstanceBuffer::with_capacity(layout.max_bodies),
            decor: InstanceBuffer::with_capacity(layout.max_decor),
            rings: InstanceBuffer::with_capacity(layout.max_rings),
            lights: InstanceBuffer::with_capacity(layout.max_lights),
            ambient: [0.0; 3],
            layout,
            textures,
            panel,
            camera_uniform: bytemuck::cast(OrbitCamera::default().uniform()),
            camera: OrbitCamera::default(),
            orrery,
        }
    }

    /// Run one frame: advance the clock, evaluate, and refill the buffers.
    ///
    /// Recoverable errors skip the frame; fatal ones panic so the panic hook
    /// reports them.
    pub fn tick(&mut self, dt: f32) {
        if let Err(err) = self.step(dt as f64) {
            recover("frame skipped", err);
        }
    }

    fn step(&mut self, dt: f64) -> Result<(), OrreryError> {
        let frame = self.orrery.tick(dt)?;
        let view = SceneView::compose(&frame, self.orrery.registry(), self.orrery.config())?;

        view.write_instances(&self.textures, &mut self.bodies, &mut self.decor, &mut self.rings);
        self.lights.clear();
        for light in &view.lighting.lights {
            self.lights.push(*light);
        }
        self.ambient = view.lighting.ambient;

        let dropped = self.bodies.dropped() + self.decor.dropped() + self.rings.dropped() + self.lights.dropped();
        if dropped > 0 {
            log::warn!("frame {}: {dropped} instances over capacity", frame.index);
        }

        if frame.publish(&mut self.camera) {
            self.refresh_camera();
        }
        self.write_header(frame.index, frame.time, &frame.focus);
        Ok(())
    }

    fn write_header(&mut self, index: u64, time: f64, focus: &FocusState) {
        let h = &mut self.header;
        h[HEADER_FRAME_COUNTER] = index as f32;
        h[HEADER_BODY_COUNT] = self.bodies.instance_count() as f32;
        h[HEADER_DECOR_COUNT] = self.decor.instance_count() as f32;
        h[HEADER_RING_COUNT] = self.rings.instance_count() as f32;
        h[HEADER_LIGHT_COUNT] = self.lights.instance_count() as f32;
        h[HEADER_SIM_TIME] = time as f32;
        h[HEADER_FOCUS_INDEX] = match &focus.target {
            FocusTarget::Origin => -1.0,
            FocusTarget::Body(id) => self
                .orrery
                .registry()
                .evaluation_index(id.as_str())
                .map_or(-1.0, |i| i as f32),
        };
        let p = focus.world_position.as_vec3();
        h[HEADER_FOCUS_X] = p.x;
        h[HEADER_FOCUS_Y] = p.y;
        h[HEADER_FOCUS_Z] = p.z;
    }

    // ---- Interaction ----

    /// Focus a body by id. Returns false (and keeps the old focus) when the
    /// id is unknown.
    pub fn select(&mut self, id: &str) -> bool {
        match self.orrery.select(id) {
            Ok(state) => {
                self.camera.retarget(&state);
                self.refresh_camera();
                true
            }
            Err(err) => {
                recover("select", err);
                false
            }
        }
    }

    /// Focus the body drawn at a body-instance index (a pick result), the
    /// same index space as the header's focus index.
    pub fn select_index(&mut self, index: usize) -> bool {
        let Some(id) = self.orrery.registry().evaluation_body(index).map(|b| b.id.clone()) else {
            log::warn!("select: no body at index {index}");
            return false;
        };
        self.select(id.as_str())
    }

    pub fn clear_selection(&mut self) {
        let state = self.orrery.clear_selection();
        self.camera.retarget(&state);
        self.refresh_camera();
    }

    /// Apply a control panel edit (JSON `ParamEdit`) and return the outcome as JSON.
    pub fn apply_edit(&mut self, json: &str) -> String {
        match self.panel.apply_json(json) {
            Ok(outcome) => outcome.to_json(),
            Err(err) => {
                log::warn!("apply_edit: {err}");
                serde_json::json!({ "status": "invalid", "error": err.to_string() }).to_string()
            }
        }
    }

    pub fn control_layout(&self) -> String {
        match self.panel.layout() {
            Ok(layout) => layout.to_json(),
            Err(err) => {
                log::warn!("control_layout: {err}");
                "{}".into()
            }
        }
    }

    pub fn reset_params(&mut self) {
        self.orrery.params().reset_all();
    }

    pub fn focus_info(&self) -> String {
        serde_json::to_string(&self.orrery.focus_info()).unwrap_or_else(|_| "{}".into())
    }

    pub fn texture_table(&self) -> String {
        serde_json::to_string(&self.textures.paths().collect::<Vec<_>>()).unwrap_or_else(|_| "[]".into())
    }

    pub fn set_time_scale(&mut self, scale: f64) -> bool {
        self.orrery.clock_mut().set_time_scale(scale).is_ok()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.orrery.clock_mut().toggle_pause();
        self.orrery.clock().is_paused()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
        self.refresh_camera();
    }

    fn refresh_camera(&mut self) {
        self.camera_uniform = bytemuck::cast(self.camera.uniform());
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header(&self) -> &[f32; HEADER_FLOATS] {
        &self.header
    }

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn bodies_ptr(&self) -> *const f32 {
        self.bodies.instances_ptr()
    }

    pub fn body_instances(&self) -> &[BodyInstance] {
        self.bodies.as_slice()
    }

    pub fn body_count(&self) -> u32 {
        self.bodies.instance_count() as u32
    }

    pub fn decor_ptr(&self) -> *const f32 {
        self.decor.instances_ptr()
    }

    pub fn decor_count(&self) -> u32 {
        self.decor.instance_count() as u32
    }

    pub fn rings_ptr(&self) -> *const f32 {
        self.rings.instances_ptr()
    }

    pub fn ring_count(&self) -> u32 {
        self.rings.instance_count() as u32
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.lights.instances_ptr()
    }

    pub fn light_count(&self) -> u32 {
        self.lights.instance_count() as u32
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }

    /// View-projection matrix (16 floats, column-major) followed by the eye position.
    pub fn camera_ptr(&self) -> *const f32 {
        self.camera_uniform.as_ptr()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn sim_time(&self) -> f32 {
        self.header[HEADER_SIM_TIME]
    }

    pub fn focus_x(&self) -> f32 {
        self.header[HEADER_FOCUS_X]
    }

    pub fn focus_y(&self) -> f32 {
        self.header[HEADER_FOCUS_Y]
    }

    pub fn focus_z(&self) -> f32 {
        self.header[HEADER_FOCUS_Z]
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_bodies(&self) -> u32 {
        self.layout.max_bodies as u32
    }

    pub fn max_decor(&self) -> u32 {
        self.layout.max_decor as u32
    }

    pub fn max_rings(&self) -> u32 {
        self.layout.max_rings as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }

    pub fn teardown(self) {
        self.orrery.teardown();
    }
}

/// Fatal engine errors panic so the panic hook reports them; the rest are
/// logged and the caller carries on.
fn recover(context: &str, err: OrreryError) {
    if err.is_fatal() {
        panic!("orrery: {err}");
    }
    log::warn!("{context}: {err}");
}
