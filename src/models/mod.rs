pub mod feature;
pub mod loaders;
pub mod prediction;
pub mod profile;

pub use feature::{FeatureField, FeatureRecord};
pub use loaders::{load_all_profiles, load_profile};
pub use prediction::{PredictResponse, Prediction};
pub use profile::{PlayerProfile, RawValue};
