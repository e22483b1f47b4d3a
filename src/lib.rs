//! Adaptive learning rate gradient steps for training the feature weights of a
//! stochastic random walk model.
//!
//! The weights live in a [`storage::ParameterStore`], the per feature squared gradient
//! history in [`storage::SquaredGradients`]. An [`optimization::OptimizerState`] combines
//! the history with a learning rate policy (AdaGrad or a fixed rate) and applies
//! gradients; a [`training::Trainer`] drives the model collaborators for each example.
//! Many trainers may share the same weights and history and train concurrently.

pub mod config;
pub mod initialization;
pub mod optimization;
pub mod storage;
pub mod synthetic;
pub mod training;
