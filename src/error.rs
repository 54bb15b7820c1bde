// Engine faults
//
// Data-shape problems never show up here: bad numbers become 0, bad colors fall
// back to the palette, and an empty payload is a regular plan. These are the
// conditions the engine cannot lay anything out for.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("canvas size {width}x{height} is not a finite positive size")]
    InvalidCanvas { width: f64, height: f64 },
}
