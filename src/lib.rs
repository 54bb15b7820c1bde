// Library exports for dashviz

pub mod config;
pub mod error;
pub mod graph;
pub mod palette;
pub mod parser;
pub mod payload;
pub mod runtime;
pub mod sample;

// Layout engine
pub mod ir;
pub mod metrics;
pub mod text;
pub mod transform;
pub mod scale;
pub mod legend;
pub mod compiler;
