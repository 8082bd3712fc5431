pub mod prism;
pub mod prism_kernel;
pub mod traits;
pub mod types;

pub use prism::PrismSolid;
pub use prism_kernel::PrismKernel;
pub use traits::PlateKernel;
pub use types::{Face, KernelError, SolidHandle, SurfacePatch};
