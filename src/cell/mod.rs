#[allow(clippy::module_inception)]
mod cell;
mod grid5k;
mod mdgid;
mod memory;
mod provider;
mod registry;

pub use cell::{Cell, CellBuilder, CellZone, EditInfo};
pub use grid5k::{
    CONFIG_KEY_PART_NUMBERING, CONFIG_KEY_PROVIDER, GRID5K_TYPE, Grid5k, PartNumbering,
    coords_5k_sheet, mdgid_part,
};
pub use mdgid::Mdgid;
pub use memory::{MEMORY_TYPE, MemoryProvider};
pub use provider::{CellProvider, CellSize};
pub use registry::{InitFn, Providers, Registry};
