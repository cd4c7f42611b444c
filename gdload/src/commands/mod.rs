pub mod bundles;
pub mod load;
