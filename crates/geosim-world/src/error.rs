//! Error types for the `geosim-world` crate.

/// Errors raised while building a [`RegionCatalog`].
///
/// All of them are configuration errors: the simulator cannot start
/// without a valid catalog.
///
/// [`RegionCatalog`]: crate::region::RegionCatalog
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The catalog has no regions.
    #[error("region catalog is empty")]
    EmptyCatalog,

    /// Two regions share a name.
    #[error("duplicate region name: {0}")]
    DuplicateRegion(String),

    /// A region radius is zero, negative, or not finite.
    #[error("region {name} has invalid radius {radius}")]
    InvalidRadius {
        /// The offending region.
        name: String,
        /// The rejected radius.
        radius: f64,
    },

    /// A region center has a NaN or infinite component.
    #[error("region {0} has a non-finite center")]
    InvalidCenter(String),
}
