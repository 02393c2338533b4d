pub mod features;
pub mod signature;

pub use features::{FeatureInput, FeatureSummary, FeatureWorkflow, orientation_merit};
pub use signature::{SignatureFiles, SignatureSummary, SignatureWorkflow};
