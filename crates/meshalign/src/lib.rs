#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use meshalign_linalg as linalg;

#[doc(inline)]
pub use meshalign_3d as k3d;

#[doc(inline)]
pub use meshalign_icp as icp;
