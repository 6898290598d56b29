//! Statistical validation of fitted models.


pub use residual_tests::{ljung_box, LjungBoxResult};
