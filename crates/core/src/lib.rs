//! # Vanpack Core
//!
//! Core model and constraint system for the vanpack 3D bin-packing engine.
//!
//! This crate provides the foundational types shared by the placement
//! strategies: exact-decimal geometry primitives, the item/bin model and the
//! pluggable constraint registry with its center-of-gravity balance test.
//!
//! ## Core Components
//!
//! - **Scalar precision**: process-wide decimal quantization with banker's
//!   rounding ([`scalar`])
//! - **Geometry**: vectors, axis-aligned volumes, strict intersection tests
//!   ([`space`])
//! - **Model**: [`Item`], [`BinModel`] and loadable [`Bin`] instances
//! - **Constraints**: named, weighted predicates evaluated in ascending
//!   weight order ([`constraint`])
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod bin;
pub mod constraint;
pub mod error;
pub mod item;
pub mod scalar;
pub mod space;

// Re-exports
pub use bin::{Bin, BinModel};
pub use constraint::{
    base_constraints, Constraint, ConstraintParams, ConstraintRegistry, ConstraintSet,
    BUILTIN_CONSTRAINTS, FITS_INSIDE_BIN, IS_SUPPORTED, MAINTAIN_CENTER_OF_GRAVITY, NO_OVERLAP,
    WEIGHT_WITHIN_LIMIT,
};
pub use error::{Error, Result};
pub use item::{oriented_dimensions, Item, ORIENTATIONS};
pub use scalar::{
    decimal_precision, quantize, quantize_vector, set_decimal_precision,
    DEFAULT_DECIMAL_PRECISION,
};
pub use space::{vec3, Vector3, Volume, AXIS_X, AXIS_Y, AXIS_Z};

pub use rust_decimal::Decimal;
