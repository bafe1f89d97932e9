//! Guillotine cutting of rectangular pieces from identical stock plates.
//!
//! ```
//! use plate_cut::packer::Packer;
//! use plate_cut::types::{CutRequest, PackOptions, StockPlate};
//!
//! let packer = Packer::new(StockPlate::new(1200, 3000), PackOptions::default());
//! let result = packer.pack(&[CutRequest::new(1, 600, 1000, 5)]);
//! assert_eq!(result.summary.plates_required, 1);
//! assert!(result.unplaced.is_empty());
//! ```

pub mod error;
pub mod expand;
pub mod guillotine;
pub mod packer;
pub mod render;
pub mod request;
pub mod stats;
pub mod types;
