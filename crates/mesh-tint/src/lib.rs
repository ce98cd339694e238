//! Category-tinted mesh to GLB conversion.
//!
//! This crate loads triangle meshes, paints them with the color of a part
//! category and writes them out as binary glTF:
//!
//! - **Loading**: STL, OBJ, 3MF, PLY, OFF and glTF/GLB
//! - **Tinting**: one uniform face color per geometry, looked up by category
//! - **Export**: GLB, either the whole model or one file per geometry
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use mesh_tint::{convert, split_convert};
//!
//! // One GLB for the whole file
//! convert(Path::new("bracket.stl"), Path::new("bracket.glb"), "supports").unwrap();
//!
//! // One GLB per object in a multi-part file
//! let records = split_convert(Path::new("kit.3mf"), Path::new("kit"), "connectors").unwrap();
//! for record in &records {
//!     println!("{} -> {}", record.name, record.file);
//! }
//! ```

mod error;
mod types;

pub mod color;
pub mod convert;
pub mod glb;
pub mod io;

// Re-export core types at crate root
pub use error::{MeshError, MeshResult};
pub use types::{Mesh, Model, Scene, Vertex};

// Re-export commonly used functions
pub use color::{apply_color, resolve_color, Category, Rgba, DEFAULT_CATEGORY};
pub use convert::{apply_color_to_model, convert, split_convert, ConversionRecord};
pub use glb::{encode_mesh, encode_model, export_mesh, export_model};
pub use io::{load_model, MeshFormat};

// Convenience methods on Model
impl Model {
    /// Load a model from a file, auto-detecting format from extension.
    pub fn load(path: impl AsRef<std::path::Path>) -> MeshResult<Self> {
        io::load_model(path.as_ref())
    }

    /// Save the model as GLB.
    pub fn save_glb(&self, path: impl AsRef<std::path::Path>) -> MeshResult<()> {
        glb::export_model(self, path.as_ref())
    }

    /// Tint every geometry with the color of `category`.
    pub fn tint(&mut self, category: &str) {
        convert::apply_color_to_model(self, category)
    }
}
