pub mod context;
pub mod evaluator;
pub mod ingest;
pub mod resolver;

pub use context::{ContextExtractor, RawClick};
pub use evaluator::ValidityEvaluator;
pub use ingest::{ClickIngestService, IngestOutcome};
pub use resolver::{LinkResolver, MemoryResolver, SeaOrmResolver};
