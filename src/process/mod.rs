pub mod conversion;
pub mod definition;
pub mod flow;
pub mod ids;
pub mod metadata;
pub mod node;

pub use conversion::*;
pub use definition::*;
pub use flow::*;
pub use ids::*;
pub use metadata::*;
pub use node::*;
