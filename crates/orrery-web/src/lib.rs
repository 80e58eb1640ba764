pub mod runner;

pub use runner::OrreryRunner;

/// Generate all `#[wasm_bindgen]` exports for an orrery app.
///
/// Generates:
/// - `thread_local!` storage for the OrreryRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (init, tick, selection, control panel, buffer accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// fn build() -> orrery_engine::OrreryResult<orrery_engine::Orrery> {
///     orrery_engine::Orrery::solar_system()
/// }
///
/// orrery_web::export_orrery!(build, "solar-system");
/// ```
///
/// # Arguments
///
/// - `$build`: A function returning `OrreryResult<Orrery>`
/// - `$app_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_orrery {
    ($build:path, $app_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::OrreryRunner>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::OrreryRunner) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Orrery not initialized. Call orrery_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn orrery_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let orrery = match $build() {
                Ok(orrery) => orrery,
                Err(err) => panic!("{}: failed to build engine: {}", $app_name, err),
            };
            let runner = $crate::OrreryRunner::new(orrery);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("{}: initialized", $app_name);
        }

        #[wasm_bindgen]
        pub fn orrery_teardown() {
            let runner = RUNNER.with(|cell| cell.borrow_mut().take());
            if let Some(runner) = runner {
                runner.teardown();
            }
        }

        #[wasm_bindgen]
        pub fn orrery_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        // ---- Interaction ----

        #[wasm_bindgen]
        pub fn orrery_select(id: &str) -> bool {
            with_runner(|r| r.select(id))
        }

        #[wasm_bindgen]
        pub fn orrery_select_index(index: u32) -> bool {
            with_runner(|r| r.select_index(index as usize))
        }

        #[wasm_bindgen]
        pub fn orrery_clear_selection() {
            with_runner(|r| r.clear_selection());
        }

        #[wasm_bindgen]
        pub fn orrery_apply_edit(json: &str) -> String {
            with_runner(|r| r.apply_edit(json))
        }

        #[wasm_bindgen]
        pub fn orrery_reset_params() {
            with_runner(|r| r.reset_params());
        }

        #[wasm_bindgen]
        pub fn orrery_set_time_scale(scale: f64) -> bool {
            with_runner(|r| r.set_time_scale(scale))
        }

        #[wasm_bindgen]
        pub fn orrery_toggle_pause() -> bool {
            with_runner(|r| r.toggle_pause())
        }

        #[wasm_bindgen]
        pub fn orrery_resize(width: f32, height: f32) {
            with_runner(|r| r.resize(width, height));
        }

        // ---- JSON accessors ----

        #[wasm_bindgen]
        pub fn get_control_layout() -> String {
            with_runner(|r| r.control_layout())
        }

        #[wasm_bindgen]
        pub fn get_focus_info() -> String {
            with_runner(|r| r.focus_info())
        }

        #[wasm_bindgen]
        pub fn get_texture_table() -> String {
            with_runner(|r| r.texture_table())
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_header_ptr() -> *const f32 {
            with_runner(|r| r.header_ptr())
        }

        #[wasm_bindgen]
        pub fn get_bodies_ptr() -> *const f32 {
            with_runner(|r| r.bodies_ptr())
        }

        #[wasm_bindgen]
        pub fn get_body_count() -> u32 {
            with_runner(|r| r.body_count())
        }

        #[wasm_bindgen]
        pub fn get_decor_ptr() -> *const f32 {
            with_runner(|r| r.decor_ptr())
        }

        #[wasm_bindgen]
        pub fn get_decor_count() -> u32 {
            with_runner(|r| r.decor_count())
        }

        #[wasm_bindgen]
        pub fn get_rings_ptr() -> *const f32 {
            with_runner(|r| r.rings_ptr())
        }

        #[wasm_bindgen]
        pub fn get_ring_count() -> u32 {
            with_runner(|r| r.ring_count())
        }

        #[wasm_bindgen]
        pub fn get_camera_ptr() -> *const f32 {
            with_runner(|r| r.camera_ptr())
        }

        #[wasm_bindgen]
        pub fn get_sim_time() -> f32 {
            with_runner(|r| r.sim_time())
        }

        #[wasm_bindgen]
        pub fn get_focus_x() -> f32 {
            with_runner(|r| r.focus_x())
        }

        #[wasm_bindgen]
        pub fn get_focus_y() -> f32 {
            with_runner(|r| r.focus_y())
        }

        #[wasm_bindgen]
        pub fn get_focus_z() -> f32 {
            with_runner(|r| r.focus_z())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_bodies() -> u32 {
            with_runner(|r| r.max_bodies())
        }

        #[wasm_bindgen]
        pub fn get_max_decor() -> u32 {
            with_runner(|r| r.max_decor())
        }

        #[wasm_bindgen]
        pub fn get_max_rings() -> u32 {
            with_runner(|r| r.max_rings())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }

        // ---- Lighting accessors ----

        #[wasm_bindgen]
        pub fn get_lights_ptr() -> *const f32 {
            with_runner(|r| r.lights_ptr())
        }

        #[wasm_bindgen]
        pub fn get_light_count() -> u32 {
            with_runner(|r| r.light_count())
        }

        #[wasm_bindgen]
        pub fn get_max_lights() -> u32 {
            with_runner(|r| r.max_lights())
        }

        #[wasm_bindgen]
        pub fn get_ambient_r() -> f32 {
            with_runner(|r| r.ambient()[0])
        }

        #[wasm_bindgen]
        pub fn get_ambient_g() -> f32 {
            with_runner(|r| r.ambient()[1])
        }

        #[wasm_bindgen]
        pub fn get_ambient_b() -> f32 {
            with_runner(|r| r.ambient()[2])
        }
    };
}
