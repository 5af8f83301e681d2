//! Patient modelling
//!
//! This module contains the patient entity, the per-patient diagnosis
//! threshold ladder, the ward length-of-stay table and the pathway process
//! that carries a patient from arrival to discharge.

pub mod diagnosis;
pub mod length_of_stay;
pub mod pathway;
#[allow(clippy::module_inception)]
pub mod patient;

pub use diagnosis::*;
pub use length_of_stay::*;
pub use pathway::*;
pub use patient::*;
