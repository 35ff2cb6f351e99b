pub mod http_client;
pub mod mock_client;
pub mod transport;

pub use http_client::{HttpAnalysisClient, UploadProtocol};
pub use mock_client::MockAnalysisClient;
pub use transport::{AnalysisRequest, AnalysisTransport};
