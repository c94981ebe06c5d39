pub mod child_process;
pub mod keysym_lookup;
pub mod modmask_lookup;
pub mod watches;
