mod bvh;

pub use bvh::Bvh;
