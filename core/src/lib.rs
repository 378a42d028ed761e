//! protoclass Core Types
//!
//! This crate provides the foundational types shared by the class engine:
//! - Identity types (ClassId, InstanceId)
//! - The reserved property-bag vocabulary (ReservedKey, SysVar)
//! - The error taxonomy (ClassError)
//! - Common diagnostic strings

mod error;
mod id;
pub mod messages;
mod reserved;

pub use error::*;
pub use id::*;
pub use reserved::*;
