pub mod actor;
pub mod critic;
pub mod init;
pub mod multi_layer_perceptron;
