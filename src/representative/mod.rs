//! Frequency-domain compression of a signature to a handful of positions.

pub mod extrema;
pub mod selector;
pub mod spectrum;

pub use extrema::{ExtremaConfig, Plateau, SignalFeatures, detect_signal_features, local_maxima};
pub use selector::{RepresentativeSelection, SelectorConfig, select_representative_indices};
pub use spectrum::{dominant_frequencies, reconstruct_from_frequencies};
