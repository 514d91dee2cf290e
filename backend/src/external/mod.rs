//! Clients for external collaborators: the live forecast provider, the
//! generative AI model, and the out-of-process ML predictor.

pub mod gemini;
pub mod ml_process;
pub mod weather;
