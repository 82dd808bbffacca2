//! Configuration and storage kinds
//!
//! ConfigMaps, Secrets, PersistentVolumeClaims, PersistentVolumes and
//! StorageClasses.

pub mod configmaps;
pub mod pvcs;
pub mod pvs;
pub mod secrets;
pub mod storageclasses;
