//! Trait seams for hilo contestants

mod strategy;

pub use strategy::Strategy;
