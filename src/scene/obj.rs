//! Wavefront OBJ import.

use std::io::BufRead;
use std::path::Path;

use crate::error::LoadError;
use crate::scene::geometry::BufferGeometry;

/// One object of an OBJ file.
#[derive(Debug, Clone)]
pub struct ObjModel {
    pub name: String,
    pub geometry: BufferGeometry,
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Loads every object of an OBJ file as indexed buffer geometry.
/// Material libraries are ignored.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Vec<ObjModel>, LoadError> {
    let (models, _materials) = tobj::load_obj(path.as_ref(), &load_options())?;
    convert(models)
}

/// Same as [`load_obj`], reading OBJ text from `reader`.
pub fn load_obj_from_reader(reader: &mut impl BufRead) -> Result<Vec<ObjModel>, LoadError> {
    let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Ok((Vec::new(), Default::default()))
    })?;
    convert(models)
}

fn convert(models: Vec<tobj::Model>) -> Result<Vec<ObjModel>, LoadError> {
    let converted: Vec<ObjModel> = models
        .into_iter()
        .filter(|model| !model.mesh.positions.is_empty())
        .map(|model| {
            let mesh = model.mesh;
            let non_empty = |v: Vec<f32>| (!v.is_empty()).then_some(v);
            let geometry = BufferGeometry {
                position: Some(mesh.positions),
                normal: non_empty(mesh.normals),
                color: non_empty(mesh.vertex_color),
                uv: non_empty(mesh.texcoords),
                index: (!mesh.indices.is_empty()).then_some(mesh.indices),
                ..BufferGeometry::default()
            };
            log::debug!(
                "loaded OBJ object '{}' with {} vertices",
                model.name,
                geometry.vertex_count()
            );
            ObjModel {
                name: model.name,
                geometry,
            }
        })
        .collect();

    if converted.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(converted)
}
