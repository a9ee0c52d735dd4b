pub mod analyzer;
pub mod buffer;
pub mod capture;
pub mod chunker;
pub mod ring_buffer;
pub mod wav;

// Public API
pub use analyzer::{AnalysisBlocks, BlockAnalyzer};
pub use buffer::CaptureBuffer;
pub use capture::{CaptureThread, DeviceConfig};
pub use chunker::{AudioChunk, AudioChunker, ChunkerConfig};
pub use ring_buffer::AudioRingBuffer;
