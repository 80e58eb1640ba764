use glam::DVec3;

use crate::api::config::EngineConfig;
use crate::api::engine::Frame;
use crate::api::error::{OrreryError, OrreryResult};
use crate::api::types::{BodyId, BodyKind, Rgb, TextureRef};
use crate::catalog::registry::BodyRegistry;
use crate::decor::DecorFrame;
use crate::focus::FocusState;
use crate::scene::instance::{BodyInstance, DecorInstance, InstanceBuffer, RingInstance};
use crate::scene::lighting::Lighting;

/// Text anchor above a body.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: DVec3,
    pub color: Rgb,
}

/// A flat ring band around a body (Saturn), in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub inner: f64,
    pub outer: f64,
    pub color: Rgb,
    pub opacity: f32,
}

/// Everything needed to draw one catalog body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDraw {
    pub id: BodyId,
    pub kind: BodyKind,
    pub position: DVec3,
    pub spin: f64,
    pub size: f64,
    pub tint: Rgb,
    pub texture: Option<TextureRef>,
    pub emissive: Option<Rgb>,
    pub label: Label,
    pub band: Option<Band>,
    pub focused: bool,
}

/// An orbit path: a circle in the y = 0 plane.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitRing {
    pub owner: BodyId,
    pub center: DVec3,
    pub radius: f64,
    pub color: Rgb,
}

impl OrbitRing {
    /// Line-strip points for drawing the ring.
    pub fn points(&self, segments: usize) -> Vec<DVec3> {
        ring_points(self.center, self.radius, segments)
    }
}

/// The view layer's input for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneView {
    pub time: f64,
    /// Catalog bodies in evaluation order.
    pub bodies: Vec<BodyDraw>,
    pub orbits: Vec<OrbitRing>,
    pub decor: DecorFrame,
    pub lighting: Lighting,
    pub focus: FocusState,
    pub backdrop: Option<TextureRef>,
    /// Line segments per orbit ring.
    pub ring_segments: usize,
}

/// Draws a composed scene. Implemented by the view layer.
pub trait SceneComposer {
    fn draw(&mut self, view: &SceneView);
}

impl SceneView {
    /// Build draw records from one evaluated frame.
    ///
    /// Sizes, tints and orbit radii come from the frame's own parameter
    /// snapshot, so the scene matches the positions exactly.
    pub fn compose(frame: &Frame, registry: &BodyRegistry, config: &EngineConfig) -> OrreryResult<Self> {
        let focused_id = frame.focus.target.body();
        let mut bodies = Vec::with_capacity(registry.len());
        let mut orbits = Vec::with_capacity(registry.len());

        for body in registry.evaluation_order() {
            let id = body.id.as_str();
            let pose = frame
                .positions
                .get(id)
                .ok_or_else(|| OrreryError::MissingPose(id.to_string()))?;
            let params = frame.params.require(id)?;

            let lift = match body.kind {
                BodyKind::Moon => config.label_lift.moon,
                _ => config.label_lift.planet,
            };
            let line_color = body.orbit_color.unwrap_or(params.tint);

            match (body.kind, body.parent.as_ref()) {
                (BodyKind::Planet, _) => orbits.push(OrbitRing {
                    owner: body.id.clone(),
                    center: DVec3::ZERO,
                    radius: params.radius,
                    color: line_color,
                }),
                (BodyKind::Moon, Some(parent)) => {
                    let center = frame.positions.position(parent.as_str()).ok_or_else(|| {
                        OrreryError::HierarchyResolution {
                            body: id.to_string(),
                            parent: parent.to_string(),
                        }
                    })?;
                    let parent_size = frame.params.require(parent.as_str())?.visual_size;
                    orbits.push(OrbitRing {
                        owner: body.id.clone(),
                        center,
                        radius: parent_size + params.radius,
                        color: line_color,
                    });
                }
                _ => {}
            }

            bodies.push(BodyDraw {
                id: body.id.clone(),
                kind: body.kind,
                position: pose.position,
                spin: pose.spin,
                size: params.visual_size,
                tint: params.tint,
                texture: body.texture.clone(),
                emissive: body.emissive,
                label: Label {
                    text: body.id.to_string(),
                    position: pose.position + DVec3::Y * (params.visual_size + lift),
                    color: line_color,
                },
                band: body.rings.map(|hint| Band {
                    inner: hint.inner * params.visual_size,
                    outer: hint.outer * params.visual_size,
                    color: hint.color,
                    opacity: hint.opacity,
                }),
                focused: focused_id == Some(&body.id),
            });
        }

        let star_id = registry.star().id.as_str();
        let star_position = frame
            .positions
            .position(star_id)
            .ok_or_else(|| OrreryError::MissingPose(star_id.to_string()))?;

        Ok(Self {
            time: frame.time,
            bodies,
            orbits,
            decor: frame.decor.clone(),
            lighting: Lighting::star_lit(&config.lighting, star_position),
            focus: frame.focus.clone(),
            backdrop: config.backdrop.clone(),
            ring_segments: config.ring_segments,
        })
    }

    pub fn body(&self, id: &str) -> Option<&BodyDraw> {
        self.bodies.iter().find(|b| b.id.as_str() == id)
    }

    pub fn orbit_of(&self, id: &str) -> Option<&OrbitRing> {
        self.orbits.iter().find(|o| o.owner.as_str() == id)
    }

    /// Flatten the scene into the renderer's instance buffers.
    pub fn write_instances(
        &self,
        textures: &TextureTable,
        bodies: &mut InstanceBuffer<BodyInstance>,
        decor: &mut InstanceBuffer<DecorInstance>,
        rings: &mut InstanceBuffer<RingInstance>,
    ) {
        bodies.clear();
        decor.clear();
        rings.clear();

        for body in &self.bodies {
            let [r, g, b] = body.tint.to_f32();
            let p = body.position.as_vec3();
            bodies.push(BodyInstance {
                x: p.x,
                y: p.y,
                z: p.z,
                radius: body.size as f32,
                spin: body.spin as f32,
                r,
                g,
                b,
                emissive: if body.emissive.is_some() { 1.0 } else { 0.0 },
                texture_slot: body
                    .texture
                    .as_ref()
                    .and_then(|t| textures.slot(t))
                    .map_or(-1.0, |slot| slot as f32),
                focused: if body.focused { 1.0 } else { 0.0 },
                kind: body.kind.depth() as f32,
            });
            if let Some(band) = body.band {
                let [r, g, b] = band.color.to_f32();
                rings.push(RingInstance {
                    cx: p.x,
                    cy: p.y,
                    cz: p.z,
                    inner: band.inner as f32,
                    outer: band.outer as f32,
                    r,
                    g,
                    b,
                    opacity: band.opacity,
                    kind: 1.0,
                    ..Default::default()
                });
            }
        }

        for orbit in &self.orbits {
            let [r, g, b] = orbit.color.to_f32();
            let c = orbit.center.as_vec3();
            rings.push(RingInstance {
                cx: c.x,
                cy: c.y,
                cz: c.z,
                inner: orbit.radius as f32,
                outer: orbit.radius as f32,
                r,
                g,
                b,
                opacity: 1.0,
                kind: 0.0,
                ..Default::default()
            });
        }

        for rock in &self.decor.asteroids {
            let [r, g, b] = rock.tint.to_f32();
            let p = rock.position.as_vec3();
            decor.push(DecorInstance {
                x: p.x,
                y: p.y,
                z: p.z,
                size: rock.size as f32,
                spin: rock.spin as f32,
                r,
                g,
                b,
                kind: 0.0,
                ..Default::default()
            });
        }
        if let Some(pose) = self.decor.comet {
            let [r, g, b] = pose.color.to_f32();
            let p = pose.position.as_vec3();
            decor.push(DecorInstance {
                x: p.x,
                y: p.y,
                z: p.z,
                size: pose.size as f32,
                spin: 0.0,
                r,
                g,
                b,
                tail_x: pose.tail_direction.x as f32,
                tail_z: pose.tail_direction.z as f32,
                tail_length: pose.tail_length as f32,
                kind: 1.0,
            });
        }

    }
}

/// Points along a closed circle in the y = 0 plane; the last point repeats
/// the first so the result can be drawn as a line strip.
pub fn ring_points(center: DVec3, radius: f64, segments: usize) -> Vec<DVec3> {
    (0..=segments)
        .map(|i| {
            let angle = i as f64 / segments as f64 * std::f64::consts::TAU;
            center + DVec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
        })
        .collect()
}

/// Stable slot numbers for every texture the view layer must load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureTable {
    textures: Vec<TextureRef>,
}

impl TextureTable {
    /// Body textures in catalog order, then the backdrop.
    pub fn build(registry: &BodyRegistry, backdrop: Option<&TextureRef>) -> Self {
        let mut textures: Vec<TextureRef> = Vec::new();
        let all = registry.bodies().iter().filter_map(|b| b.texture.as_ref()).chain(backdrop);
        for texture in all {
            if !textures.contains(texture) {
                textures.push(texture.clone());
            }
        }
        Self { textures }
    }

    pub fn slot(&self, texture: &TextureRef) -> Option<usize> {
        self.textures.iter().position(|t| t == texture)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.textures.iter().map(TextureRef::as_str)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
