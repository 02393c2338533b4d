pub mod config;
pub mod descriptor;
pub mod error;
pub mod features;
pub mod image;
pub mod io;
pub mod pipeline;
pub mod representative;
pub mod signature;
pub mod sinogram;

pub use config::PipelineConfig;
pub use descriptor::{LIP_COUNT, LipDescriptor};
pub use error::{LipError, LipResult};
pub use features::{AggregationMode, FeatureAssembler, LocalFeatureAggregator, Statistic, StatisticSet};
pub use pipeline::{
    FeatureInput, FeatureSummary, FeatureWorkflow, SignatureFiles, SignatureSummary,
    SignatureWorkflow,
};
pub use representative::{RepresentativeSelection, SelectorConfig, select_representative_indices};
pub use signature::{Alignment, Direction, MirrorMode, ObjectSignatures, SignatureBundle};
pub use sinogram::{RadonTransform, Sinogram, SinogramTransform, projection_angles};
