pub mod network_generator;
