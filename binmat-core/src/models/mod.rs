pub mod feature;
pub mod feature_groups;

// re-export for cleaner imports
pub use self::feature::{Feature, Strand};
pub use self::feature_groups::FeatureGroups;
