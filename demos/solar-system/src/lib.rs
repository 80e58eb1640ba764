use wasm_bindgen::prelude::*;

mod setup;

orrery_web::export_orrery!(setup::build, "solar-system");
