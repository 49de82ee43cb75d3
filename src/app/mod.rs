// console-attach - app/mod.rs
//
// Application layer: the console shim service object and its process-wide
// instance.

pub mod shim;
