//! Display abstraction traits and shared types for Vitrine
//!
//! This crate provides:
//! - `PanelTransport` trait for the panel/bus driver (pixel push, write bracketing)
//! - `TouchSource` trait for polled touch controllers
//! - `SceneRenderer` trait for the GUI toolkit's software renderer
//! - `TimerHost` trait for the toolkit's timer/animation oracle
//! - Pixel encodings, geometry types and damage-region bookkeeping
//!
//! # Architecture
//!
//! The presentation loop in `vitrine-platform` only ever talks to hardware and
//! to the GUI toolkit through these traits. Panel drivers implement
//! `PanelTransport` with their bus-specific code (SPI, parallel, DSI); the
//! toolkit integration implements `SceneRenderer` and `TimerHost`; the loop
//! stays identical across all of them.

#![no_std]
#![deny(unsafe_code)]

pub mod geometry;
pub mod input;
pub mod panel;
pub mod pixel;
pub mod scene;

// Re-export key types
pub use geometry::{LogicalPosition, PhysicalPosition, PhysicalRect, PhysicalSize, Rotation};
pub use input::{PointerEvent, TouchSample, TouchSource};
pub use panel::PanelTransport;
pub use pixel::{PanelPixel, Rgb565Pixel, Rgb888Pixel};
pub use scene::{DamageRegion, LineProcessor, RepaintBuffer, SceneRenderer, TimerHost};
