//! Model parsing and display.
//!
//! Converts a GLB payload into Bevy meshes and owns the reference to the
//! currently displayed model, which is replaced wholesale on each
//! successful load.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use plinth::{Error, Result};

/// Half-extent the displayed model is scaled to fit.
const DISPLAY_EXTENT: f32 = 1.0;

/// A triangle primitive extracted from the payload, ready for GPU upload.
pub struct PreparedPrimitive {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, when the payload carries them.
    pub normals: Option<Vec<[f32; 3]>>,
    /// Texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
    /// Base color factor of the primitive's material (linear RGBA).
    pub base_color: [f32; 4],
}

/// A parsed model: its primitives plus the bounds used to frame it.
pub struct PreparedModel {
    /// Triangle primitives of the model.
    pub primitives: Vec<PreparedPrimitive>,
    /// Axis-aligned bounds over all primitives.
    pub bounds_min: Vec3,
    /// Axis-aligned bounds over all primitives.
    pub bounds_max: Vec3,
}

/// Parse a GLB payload into mesh data.
///
/// Any structural problem in the payload is reported as
/// [`Error::ModelParse`], which feeds back into the load sequence's
/// fallback policy.
pub fn parse_glb(payload: &[u8]) -> Result<PreparedModel> {
    let (document, buffers, _images) =
        gltf::import_slice(payload).map_err(|e| Error::ModelParse {
            message: e.to_string(),
        })?;

    let mut primitives = Vec::new();
    let mut bounds_min = Vec3::splat(f32::MAX);
    let mut bounds_max = Vec3::splat(f32::MIN);

    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }

            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| &b.0[..]));

            let Some(position_reader) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = position_reader.collect();
            for p in &positions {
                bounds_min = bounds_min.min(Vec3::from_array(*p));
                bounds_max = bounds_max.max(Vec3::from_array(*p));
            }

            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);

            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map_or_else(|| vec![[0.0, 0.0]; positions.len()], |t| t.into_f32().collect());

            #[allow(clippy::cast_possible_truncation)]
            let indices: Vec<u32> = reader
                .read_indices()
                .map_or_else(|| (0..positions.len() as u32).collect(), |i| i.into_u32().collect());

            let base_color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            primitives.push(PreparedPrimitive {
                positions,
                normals,
                uvs,
                indices,
                base_color,
            });
        }
    }

    if primitives.is_empty() {
        return Err(Error::ModelParse {
            message: "no triangle primitives in payload".to_string(),
        });
    }

    Ok(PreparedModel {
        primitives,
        bounds_min,
        bounds_max,
    })
}

/// The currently displayed model.
///
/// Owned here so each successful load can replace the previous model
/// wholesale; the old entities are despawned on replacement.
#[derive(Resource, Default)]
pub struct CurrentModel {
    root: Option<Entity>,
    /// Transform that centers the model and fits it to the display extent.
    pub base: Transform,
}

/// Marker component for the displayed model's root entity.
#[derive(Component)]
pub struct ModelRoot;

/// Replace the displayed model with `prepared`.
pub fn swap_displayed_model(
    commands: &mut Commands,
    current: &mut CurrentModel,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    prepared: &PreparedModel,
) {
    if let Some(previous) = current.root.take() {
        commands.entity(previous).despawn();
    }

    let base = fit_transform(prepared.bounds_min, prepared.bounds_max);

    let root = commands
        .spawn((ModelRoot, base, Visibility::default()))
        .with_children(|parent| {
            for primitive in &prepared.primitives {
                let mesh = meshes.add(to_mesh(primitive));
                let material = materials.add(StandardMaterial {
                    base_color: Color::linear_rgba(
                        primitive.base_color[0],
                        primitive.base_color[1],
                        primitive.base_color[2],
                        primitive.base_color[3],
                    ),
                    perceptual_roughness: 0.6,
                    ..Default::default()
                });
                parent.spawn((Mesh3d(mesh), MeshMaterial3d(material)));
            }
        })
        .id();

    current.root = Some(root);
    current.base = base;

    tracing::debug!(
        primitives = prepared.primitives.len(),
        "displayed model replaced"
    );
}

/// Convert a prepared primitive to a Bevy mesh.
fn to_mesh(primitive: &PreparedPrimitive) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, primitive.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, primitive.uvs.clone());
    mesh.insert_indices(Indices::U32(primitive.indices.clone()));

    match &primitive.normals {
        Some(normals) => mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals.clone()),
        None => mesh.compute_smooth_normals(),
    }

    mesh
}

/// Center the model at the origin and scale it to fit the display extent.
fn fit_transform(min: Vec3, max: Vec3) -> Transform {
    let center = (min + max) * 0.5;
    let size = max - min;
    let max_dim = size.x.max(size.y).max(size.z);
    let scale = if max_dim > 1e-6 {
        2.0 * DISPLAY_EXTENT / max_dim
    } else {
        1.0
    };

    Transform::from_scale(Vec3::splat(scale)).with_translation(-center * scale)
}
