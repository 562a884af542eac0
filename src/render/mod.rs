//! Graph renderer
//!
//! Lays out a [`Graph`] and rasterizes it into an in-memory image:
//! - [`dot`]: format policy (labels, colors, ports, left-to-right ranks)
//! - [`engine`]: the external layout engine ([`Graphviz`]) behind [`LayoutEngine`]
//! - [`raster`]: PNG decoding into [`RasterImage`]
//! - [`errors`]: [`RenderError`]
//!
//! Each call renders from scratch; nothing is kept between passes.

pub mod dot;
pub mod engine;
pub mod errors;
pub mod raster;

pub use engine::{Graphviz, LayoutEngine};
pub use errors::RenderError;
pub use raster::RasterImage;

use crate::graph::{build_graph, Classifier, Graph};
use crate::snapshot::StackSnapshot;
use std::path::PathBuf;
use std::time::Instant;

/// Per-pass rendering options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pixel box to compress the layout into; natural size when `None`
    pub size: Option<(u32, u32)>,
}

impl RenderOptions {
    pub fn fit(width: u32, height: u32) -> Self {
        RenderOptions {
            size: Some((width, height)),
        }
    }
}

/// Where a visualization should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderTarget {
    /// Decoded image returned to the caller
    Image,
    /// Named output file (unsupported)
    File(PathBuf),
}

/// Renders graphs through a layout engine
pub struct GraphRenderer<E: LayoutEngine = Graphviz> {
    engine: E,
}

impl<E: LayoutEngine> GraphRenderer<E> {
    pub fn new(engine: E) -> Self {
        GraphRenderer { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Lay out and rasterize one graph
    pub fn render(&self, graph: &Graph, options: RenderOptions) -> Result<RasterImage, RenderError> {
        let started = Instant::now();
        let source = dot::to_dot(graph, options.size);
        let png = self.engine.layout_png(&source)?;
        let image = RasterImage::decode_png(&png)?;
        tracing::debug!(
            nodes = graph.nodes.len(),
            width = image.width(),
            height = image.height(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered graph"
        );
        Ok(image)
    }
}

/// Build and render the graph for one snapshot.
///
/// Only [`RenderTarget::Image`] is supported; asking for a file target fails
/// with [`RenderError::UnsupportedTarget`] before any work is done.
pub fn visualize_frame<E: LayoutEngine>(
    snapshot: &StackSnapshot,
    target: &RenderTarget,
    renderer: &GraphRenderer<E>,
    classifier: Classifier,
    options: RenderOptions,
) -> Result<RasterImage, RenderError> {
    if let RenderTarget::File(path) = target {
        return Err(RenderError::UnsupportedTarget { path: path.clone() });
    }
    let graph = build_graph(snapshot, classifier);
    renderer.render(&graph, options)
}
