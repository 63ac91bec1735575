//! # raster-draw
//!
//! CPU vector drawing core: fills and strokes paths made of lines and
//! Bezier curves into in-memory pixel buffers.
//!
//! - Anti-aliased scanline rasterization with the non-zero winding rule
//! - Strokes with butt, square and round caps, miter, round and bevel joins,
//!   and dash patterns
//! - Solid and pattern brushes
//! - Porter-Duff composition combined with color blend functions
//! - Seven pixel encodings from 8-bit gray to f32 RGBA
//!
//! ## Architecture
//!
//! A draw call runs a short pipeline:
//!
//! 1. **Path**: lines, quadratic and cubic segments grouped into subpaths
//! 2. **Flattener**: curves become polylines within a tolerance
//! 3. **Stroker**: (strokes only) polylines become closed outline polygons
//! 4. **Rasterizer**: polygons become per-pixel coverage spans
//! 5. **Compositor**: brush colors are blended into the buffer by coverage
//!
//! [`fill_region`] and [`stroke_path`] drive the whole pipeline. They
//! validate every input before touching the buffer.
//!
//! ## Features
//!
//! - `multithreading`: render row bands in parallel with rayon.

// Foundation types & math
pub mod basics;
pub mod color;
pub mod error;
pub mod math;

// Geometry
pub mod curves;
pub mod path;

// Stroking
pub mod dash;
pub mod math_stroke;
pub mod stroke;
pub mod vertex_sequence;

// Rasterizing & compositing
pub mod brush;
pub mod compositor;
pub mod options;
pub mod pixel_buffer;
pub mod rasterizer;
pub mod renderer;

pub use brush::{Brush, PatternBrush};
pub use color::{Bgra8, Gray16, Gray8, Pixel, Rgb8, Rgba, Rgba16, Rgba8, RgbaF32};
pub use compositor::{blend, AlphaCompositionMode, BlendMode, ColorBlendingMode};
pub use error::{DrawError, Result};
pub use math_stroke::{LineCap, LineJoin};
pub use options::{GraphicsOptions, DEFAULT_ANTIALIAS_SAMPLES, DEFAULT_TOLERANCE};
pub use path::{Path, Segment, SubPath};
pub use pixel_buffer::{ImageBuffer, Region};
pub use renderer::{fill_region, stroke_path};
pub use stroke::{stroke, Outline, StrokeStyle};

pub use basics::PointD;
