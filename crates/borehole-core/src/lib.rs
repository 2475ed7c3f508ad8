//! Borehole Core Types and Definitions
//!
//! This crate provides the foundational types shared by the borehole survey
//! pipeline and its command-line front end. It includes:
//!
//! - **Geometry**: Planar and spatial coordinates ([`geometry`] module)
//! - **Entities**: Flattened drawing entity records ([`entity`] module)
//! - **Identifiers**: Numerically ordered borehole identifiers ([`identifier::BoreholeId`])
//! - **Boreholes**: The resolved borehole record ([`borehole::Borehole`])

pub mod borehole;
pub mod entity;
pub mod geometry;
pub mod identifier;
