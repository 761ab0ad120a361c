pub mod ancestry;
pub mod coi;
pub mod engine;
pub mod error;
pub mod pedigree;
pub mod store;

pub use engine::{
    calculate_inbreeding_coefficient, calculate_pairing_inbreeding, explain_pairing_inbreeding,
    PairingExplanation, DEFAULT_COI_GENERATIONS, DEFAULT_PAIRING_GENERATIONS,
};
pub use error::{GenealogyError, Result};
pub use store::{AnimalRecord, AnimalStore, MemoryStore};
