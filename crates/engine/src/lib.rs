//! # Vanpack Engine
//!
//! Placement strategies and pack orchestration for the vanpack 3D
//! bin-packing engine.
//!
//! The engine loads axis-aligned parcels into axis-aligned cargo areas while
//! a pluggable constraint chain enforces geometric, weight, support and
//! center-of-gravity rules. Two strategies are provided:
//!
//! - **Greedy (LBB)**: first feasible pivot wins; fast but corner-biased.
//! - **Multi-anchor**: scores candidates generated from floor corners, the
//!   floor center, neighbours of recent placements and their mirror
//!   reflections, committing only the best one.
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use vanpack_engine::{
//!     BinModel, ConstraintRegistry, Item, PackConfig, Packer, Strategy, BUILTIN_CONSTRAINTS,
//! };
//!
//! let mut packer = Packer::new();
//! packer.set_default_bin(BinModel::from_dims("van", dec!(1.87), dec!(2.172), dec!(4.07), dec!(1400)));
//! packer.add_batch([
//!     Item::new("parcel-1", dec!(0.4), dec!(0.4), dec!(0.4), dec!(80)).with_priority(5),
//!     Item::new("parcel-2", dec!(0.5), dec!(0.5), dec!(0.5), dec!(3)),
//! ]);
//!
//! let registry = ConstraintRegistry::with_builtins();
//! let config = PackConfig::new()
//!     .with_constraints(registry.resolve(&BUILTIN_CONSTRAINTS).unwrap())
//!     .with_strategy(Strategy::MultiAnchor);
//!
//! packer.pack(&config).unwrap();
//! assert_eq!(packer.unfitted_items().len(), 0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod greedy;
pub mod multi_anchor;
pub mod packer;

// Re-exports
pub use multi_anchor::{DEFAULT_COMPACT_WEIGHT, DEFAULT_HEIGHT_WEIGHT, NEIGHBOR_WINDOW};
pub use packer::{PackConfig, PackStatistics, Packer, Strategy};
pub use vanpack_core::{
    base_constraints, oriented_dimensions, quantize, set_decimal_precision, vec3, Bin, BinModel,
    Constraint, ConstraintParams, ConstraintRegistry, ConstraintSet, Decimal, Error, Item,
    Result, Vector3, Volume, BUILTIN_CONSTRAINTS, ORIENTATIONS,
};
