// MOV extractors (component G). Each submodule computes one Model
// Output Variable (or a closely related family) from the per-frame
// intermediates produced by the ear model, spreading, adaptation, and
// modulation-pattern stages.

pub mod bandwidth;
pub mod ehs;
pub mod loudness;
pub mod moddiff;
pub mod nmr;
pub mod noise_loudness;
pub mod pd;

pub use bandwidth::bandwidth;
pub use ehs::EhsComputer;
pub use loudness::loudness;
pub use moddiff::mod_diff;
pub use nmr::{mask_offset, nmr};
pub use noise_loudness::noise_loudness;
pub use pd::pd;
