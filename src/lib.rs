//! Skymarch procedural sky renderer
//!
//! Per-pixel raymarcher producing an HDR image of a procedural sky, terrain
//! and volumetric cloud layer from a camera pose and a simulation time, plus
//! a second pass converting the HDR buffer to a displayable 8-bit image with
//! a selectable tone-mapping operator. Outputs PNG and EXR with optional TEV
//! viewer integration.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod clouds;
pub mod integrator;
pub mod interval;
pub mod lighting;
pub mod noise;
pub mod output;
pub mod ray;
pub mod sky;
pub mod terrain;
pub mod tonemap;
