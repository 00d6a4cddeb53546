// Models module
// Entity records shared by the store, resolver and persistence layers

pub mod event;
pub mod goal;
pub mod task;
