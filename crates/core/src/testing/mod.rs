//! Testing utilities and mock implementations.
//!
//! Mocks for every external collaborator of the conversion pipeline, so the
//! whole flow can be exercised without yt-dlp or ffmpeg installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use tubetape_core::testing::{MockConverter, MockFetcher, MockTagWriter};
//!
//! let fetcher = Arc::new(MockFetcher::new());
//! fetcher.set_title("Some Video").await;
//!
//! let converter = Arc::new(MockConverter::new());
//! converter.set_duration_secs(60.0).await;
//!
//! let pipeline = ConversionPipeline::new(fetcher, converter, Arc::new(MockTagWriter::new()), scratch, 192);
//! ```

mod mock_converter;
mod mock_fetcher;
mod mock_tag_writer;

pub use mock_converter::MockConverter;
pub use mock_fetcher::{MockFetcher, MOCK_AUDIO};
pub use mock_tag_writer::{MockTagWriter, RecordedTagWrite};
